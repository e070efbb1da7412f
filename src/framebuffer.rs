// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The RGB framebuffer and its partition into work units.
//!
//! Workers never share a slice.  Before any thread starts the buffer
//! is cut into one `PixelRegion` per work unit, each holding mutable
//! borrows of exactly the bytes it covers, so pixel writes need no
//! locking at all.

use itertools::iproduct;
use std::ops::Range;

/// Bytes per pixel.
pub const CHANNELS: usize = 3;

/// A row-major, RGB-interleaved, top-row-first image.
#[derive(Clone, Debug, PartialEq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// A black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            pixels: vec![0 as u8; width * height * CHANNELS],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw bytes, ready for an encoder.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Gives up the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    /// The color at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let offset = (y * self.width + x) * CHANNELS;
        [
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ]
    }

    /// One region per row range.  The ranges must be contiguous,
    /// ascending and start at row zero, as `tiles::row_blocks` makes
    /// them.
    pub fn row_regions(&mut self, blocks: &[Range<usize>]) -> Vec<PixelRegion> {
        let stride = self.width * CHANNELS;
        let mut rest: &mut [u8] = &mut self.pixels;
        let mut regions = Vec::with_capacity(blocks.len());
        for block in blocks {
            let taken = rest;
            let (head, tail) = taken.split_at_mut(block.len() * stride);
            rest = tail;
            regions.push(PixelRegion {
                left: 0,
                top: block.start,
                rows: if stride == 0 { vec![] } else { head.chunks_mut(stride).collect() },
            });
        }
        regions
    }

    /// One region per tile, in raster order of the tile grid, so that
    /// tile `(tx, ty)` lives at index `ty * tiles_across + tx`.  The
    /// tile size must evenly divide the image.
    pub fn tile_regions(&mut self, tile_width: usize, tile_height: usize) -> Vec<PixelRegion> {
        let across = self.width / tile_width;
        let down = self.height / tile_height;
        let mut regions: Vec<PixelRegion> = iproduct!(0..down, 0..across)
            .map(|(ty, tx)| PixelRegion {
                left: tx * tile_width,
                top: ty * tile_height,
                rows: Vec::with_capacity(tile_height),
            })
            .collect();

        for (y, row) in self.pixels.chunks_mut(self.width * CHANNELS).enumerate() {
            let ty = y / tile_height;
            for (tx, segment) in row.chunks_mut(tile_width * CHANNELS).enumerate() {
                regions[ty * across + tx].rows.push(segment);
            }
        }
        regions
    }
}

/// A rectangle of the framebuffer, borrowed row by row.  `rows[0]`
/// is image row `top`, starting at column `left`.
#[derive(Debug)]
pub struct PixelRegion<'a> {
    left: usize,
    top: usize,
    rows: Vec<&'a mut [u8]>,
}

impl<'a> PixelRegion<'a> {
    /// Number of pixels covered.
    pub fn len(&self) -> usize {
        self.rows.iter().map(|r| r.len() / CHANNELS).sum()
    }

    /// True if the region covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes `shade(x, y)` into every pixel of the region, with `x`
    /// and `y` in image coordinates.
    pub fn fill<F>(&mut self, shade: &F)
    where
        F: Fn(usize, usize) -> [u8; 3],
    {
        let (left, top) = (self.left, self.top);
        for (dy, row) in self.rows.iter_mut().enumerate() {
            for (dx, pixel) in row.chunks_mut(CHANNELS).enumerate() {
                pixel.copy_from_slice(&shade(left + dx, top + dy));
            }
        }
    }
}
