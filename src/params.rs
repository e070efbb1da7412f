// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render configuration.  `RenderConfig` is the raw shape filled in
//! by the command line; `ImageParams` is the checked, read-only
//! version the workers share.  Apart from the tile cursor nothing in
//! `ImageParams` changes once it has been built.

use crate::color::Palette;
use crate::errors::ParamsError;
use crate::escape::{escape_time, PixelResult};
use crate::planes::{Pixel, Viewport};
use crate::tiles::TileCursor;

/// Everything needed to describe one render, unchecked.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Left edge of the complex window.
    pub x_min: f64,
    /// Right edge of the complex window.
    pub x_max: f64,
    /// Bottom edge of the complex window.
    pub y_min: f64,
    /// Top edge of the complex window.
    pub y_max: f64,
    /// Iteration budget per pixel.
    pub iterations: u32,
    /// Number of worker threads.
    pub threads: usize,
    /// Pull tiles from a shared cursor instead of fixed row blocks.
    pub tiled: bool,
    /// Tile width in pixels, used when `tiled`.
    pub tile_width: usize,
    /// Tile height in pixels, used when `tiled`.
    pub tile_height: usize,
    /// Color mapping.
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 512,
            height: 512,
            x_min: -2.0,
            x_max: 2.0,
            y_min: -2.0,
            y_max: 2.0,
            iterations: 1000,
            threads: 1,
            tiled: true,
            tile_width: 8,
            tile_height: 8,
            palette: Palette::Banded,
        }
    }
}

/// How the image is split up among the workers.
#[derive(Debug)]
pub enum Partition {
    /// Worker `i` draws the `i`-th block of `tiles::row_blocks`.
    Rows,
    /// Workers pull `width` x `height` tiles from `cursor`.
    Tiles {
        /// Tile width in pixels.
        width: usize,
        /// Tile height in pixels.
        height: usize,
        /// The shared source of tiles.
        cursor: TileCursor,
    },
}

/// A validated render description, shared read-only by the workers.
#[derive(Debug)]
pub struct ImageParams {
    /// The pixel to complex plane mapping.
    pub viewport: Viewport,
    /// Iteration budget per pixel.
    pub iterations: u32,
    /// Number of worker threads.
    pub threads: usize,
    /// Color mapping.
    pub palette: Palette,
    /// Row blocks or tiles.
    pub partition: Partition,
}

impl ImageParams {
    /// Checks a configuration and builds the shared parameters,
    /// including a fresh tile cursor when tiling is requested.
    pub fn new(config: RenderConfig) -> Result<Self, ParamsError> {
        let RenderConfig {
            width,
            height,
            x_min,
            x_max,
            y_min,
            y_max,
            ..
        } = config;

        if width == 0 || height == 0 {
            return Err(ParamsError::EmptyImage(width, height));
        }
        if config.iterations == 0 {
            return Err(ParamsError::NoIterations);
        }
        if config.threads == 0 {
            return Err(ParamsError::NoThreads);
        }
        if ![x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite()) {
            return Err(ParamsError::NonFiniteBounds);
        }
        if x_max <= x_min {
            return Err(ParamsError::InvertedReal(x_min, x_max));
        }
        if y_max <= y_min {
            return Err(ParamsError::InvertedImaginary(y_min, y_max));
        }

        let partition = if config.tiled {
            let (tw, th) = (config.tile_width, config.tile_height);
            if tw == 0 || th == 0 {
                return Err(ParamsError::EmptyTile(tw, th));
            }
            if width % tw != 0 || height % th != 0 {
                return Err(ParamsError::UnevenTiles {
                    tile_width: tw,
                    tile_height: th,
                    width,
                    height,
                });
            }
            Partition::Tiles {
                width: tw,
                height: th,
                cursor: TileCursor::new(width / tw, height / th),
            }
        } else {
            Partition::Rows
        };

        Ok(ImageParams {
            viewport: Viewport::new(width, height, x_min, x_max, y_min, y_max),
            iterations: config.iterations,
            threads: config.threads,
            palette: config.palette,
            partition,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.viewport.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.viewport.height
    }

    /// Escape-time iteration count for the pixel at column `x`, row `y`.
    #[inline]
    pub fn evaluate(&self, x: usize, y: usize) -> u32 {
        escape_time(self.viewport.pixel_to_point(Pixel(x, y)), self.iterations)
    }

    /// Iteration count and its normalized fraction for one pixel.
    pub fn pixel_result(&self, x: usize, y: usize) -> PixelResult {
        PixelResult::new(self.evaluate(x, y), self.iterations)
    }

    /// The final color of the pixel at column `x`, row `y`.
    #[inline]
    pub fn shade(&self, x: usize, y: usize) -> [u8; 3] {
        self.palette.color_of(self.evaluate(x, y), self.iterations)
    }
}
