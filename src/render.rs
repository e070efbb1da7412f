// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The dispatcher and its workers.
//!
//! A render spawns exactly `threads` workers inside a crossbeam scope.
//! In row mode each worker owns one precomputed block of rows; in tile
//! mode every worker keeps leasing tiles from the shared cursor until
//! it comes back empty.  The scope joins every worker before `render`
//! returns, so callers only ever see a finished framebuffer.

use log::{debug, info};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::framebuffer::{Framebuffer, PixelRegion};
use crate::params::{ImageParams, Partition};
use crate::tiles::{row_blocks, TileCursor};

/// Receives start and stop notices from workers.  Called at most
/// twice per worker and never from inside the pixel loop.
pub trait WorkerLog: Sync {
    /// Worker `worker` is about to start drawing.
    fn started(&self, worker: usize);
    /// Worker `worker` finished after `elapsed_ms` milliseconds.
    fn stopped(&self, worker: usize, elapsed_ms: f64);
}

/// Prints worker timings, one message at a time, to a writer.
/// Failed writes are dropped; they never stop a render.
pub struct ConsoleLog<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleLog<io::Stdout> {
    /// A log that prints to standard output.
    pub fn stdout() -> Self {
        ConsoleLog::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleLog<W> {
    /// A log that writes to `out`.
    pub fn new(out: W) -> Self {
        ConsoleLog {
            out: Mutex::new(out),
        }
    }

    /// Hands back the writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, message: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{}", message).and_then(|_| out.flush());
    }
}

impl<W: Write + Send> WorkerLog for ConsoleLog<W> {
    fn started(&self, worker: usize) {
        self.emit(&format!("Thread-< {} > started.", worker));
    }

    fn stopped(&self, worker: usize, elapsed_ms: f64) {
        self.emit(&format!(
            "Thread-< {} > stopped.\nThread-< {} > execution time was(millis): < {:.6} >.",
            worker, worker, elapsed_ms
        ));
    }
}

/// Something a worker thread runs to completion.
pub trait RenderUnit {
    /// The worker's number, from zero.
    fn id(&self) -> usize;
    /// Draws until there is no work left.
    fn run(self);
}

enum WorkSource<'w, 'fb> {
    Block(PixelRegion<'fb>),
    Tiles {
        cursor: &'w TileCursor,
        slots: &'w [Mutex<Option<PixelRegion<'fb>>>],
    },
}

/// One render thread's share of the job.
pub struct Worker<'w, 'fb, F: 'w> {
    id: usize,
    source: WorkSource<'w, 'fb>,
    shade: &'w F,
}

impl<'w, 'fb, F> RenderUnit for Worker<'w, 'fb, F>
where
    F: Fn(usize, usize) -> [u8; 3],
{
    fn id(&self) -> usize {
        self.id
    }

    fn run(self) {
        let shade = self.shade;
        match self.source {
            WorkSource::Block(mut region) => region.fill(shade),
            WorkSource::Tiles { cursor, slots } => loop {
                let tile = cursor.next_tile();
                if !tile.can_draw {
                    break;
                }
                let index = tile.tile_y * cursor.max_tiles_x() + tile.tile_x;
                // Each lease is unique, so the slot is always full and
                // the lock is never contended.
                let region = slots[index]
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                if let Some(mut region) = region {
                    region.fill(shade);
                }
            },
        }
    }
}

/// Wraps a unit with start/stop timing.  The inner unit's drawing
/// is untouched; only the call around it is timed.
pub struct Logged<'l, U> {
    inner: U,
    log: &'l dyn WorkerLog,
}

impl<'l, U: RenderUnit> Logged<'l, U> {
    /// Times `inner`, reporting to `log`.
    pub fn new(inner: U, log: &'l dyn WorkerLog) -> Self {
        Logged { inner, log }
    }
}

impl<'l, U: RenderUnit> RenderUnit for Logged<'l, U> {
    fn id(&self) -> usize {
        self.inner.id()
    }

    fn run(self) {
        let id = self.inner.id();
        self.log.started(id);
        let start = Instant::now();
        self.inner.run();
        self.log.stopped(id, start.elapsed().as_secs_f64() * 1000.0);
    }
}

/// Owns the thread pool for a single render.
pub struct Dispatcher<'p> {
    params: &'p ImageParams,
    log: Option<&'p dyn WorkerLog>,
}

impl<'p> Dispatcher<'p> {
    /// A dispatcher without worker logging.
    pub fn new(params: &'p ImageParams) -> Self {
        Dispatcher { params, log: None }
    }

    /// Report each worker's start and stop to `log`.
    pub fn with_log(self, log: &'p dyn WorkerLog) -> Self {
        Dispatcher {
            log: Some(log),
            ..self
        }
    }

    /// Fills `framebuffer` with the image described by the parameters.
    /// Blocks until every worker has finished.  In tile mode this
    /// drains the parameters' cursor, so each `ImageParams` renders
    /// once.
    pub fn render(&self, framebuffer: &mut Framebuffer) {
        let params = self.params;
        info!(
            "Rendering {}x{}, {} iterations, {} threads",
            params.width(),
            params.height(),
            params.iterations,
            params.threads
        );
        let start = Instant::now();
        self.render_with(framebuffer, &|x, y| params.shade(x, y));
        info!("Render finished in {:?}", start.elapsed());
    }

    /// `render`, with the per-pixel computation supplied by the caller.
    pub fn render_with<F>(&self, framebuffer: &mut Framebuffer, shade: &F)
    where
        F: Fn(usize, usize) -> [u8; 3] + Sync,
    {
        let params = self.params;
        assert!(
            framebuffer.width() == params.width() && framebuffer.height() == params.height(),
            "framebuffer is {}x{}, parameters describe {}x{}",
            framebuffer.width(),
            framebuffer.height(),
            params.width(),
            params.height()
        );

        match params.partition {
            Partition::Rows => {
                let blocks = row_blocks(params.height(), params.threads);
                debug!("Row blocks: {:?}", blocks);
                let workers = framebuffer
                    .row_regions(&blocks)
                    .into_iter()
                    .enumerate()
                    .map(|(id, region)| Worker {
                        id,
                        source: WorkSource::Block(region),
                        shade,
                    })
                    .collect();
                self.spawn(workers);
            }
            Partition::Tiles {
                width,
                height,
                ref cursor,
            } => {
                debug!(
                    "{} tiles of {}x{} ({} across, {} down)",
                    cursor.len(),
                    width,
                    height,
                    cursor.max_tiles_x(),
                    cursor.max_tiles_y()
                );
                let slots: Vec<Mutex<Option<PixelRegion>>> = framebuffer
                    .tile_regions(width, height)
                    .into_iter()
                    .map(|region| Mutex::new(Some(region)))
                    .collect();
                let workers = (0..params.threads)
                    .map(|id| Worker {
                        id,
                        source: WorkSource::Tiles {
                            cursor,
                            slots: &slots,
                        },
                        shade,
                    })
                    .collect();
                self.spawn(workers);
            }
        }
    }

    fn spawn<F>(&self, workers: Vec<Worker<F>>)
    where
        F: Fn(usize, usize) -> [u8; 3] + Sync,
    {
        let log = self.log;
        let joined = crossbeam::scope(|spawner| {
            for worker in workers {
                spawner.spawn(move |_| match log {
                    Some(log) => Logged::new(worker, log).run(),
                    None => worker.run(),
                });
            }
        });
        if let Err(panic) = joined {
            std::panic::resume_unwind(panic);
        }
    }
}

/// Renders `params` into `framebuffer` without worker logging.
pub fn render(params: &ImageParams, framebuffer: &mut Framebuffer) {
    Dispatcher::new(params).render(framebuffer)
}
