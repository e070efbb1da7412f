// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! the top left corner, and a rectangle on the complex plane bounded
//! by `x_min..x_max` on the real axis and `y_min..y_max` on the
//! imaginary axis.
//!
//! Row 0 of the image is the *top* of the picture, so it maps to
//! `y_max`; the imaginary axis runs against the row index.
use num::Complex;

/// The column and row of a pixel.  Column first, like x, y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of a `width` x `height` image onto a window of the
/// complex plane.
#[derive(Copy, Clone, Debug)]
pub struct Viewport {
    /// Width of the integral plane, in pixels.
    pub width: usize,
    /// Height of the integral plane, in pixels.
    pub height: usize,
    /// Left edge of the complex window.
    pub x_min: f64,
    /// Right edge of the complex window.
    pub x_max: f64,
    /// Bottom edge of the complex window.
    pub y_min: f64,
    /// Top edge of the complex window.
    pub y_max: f64,
    // Complex distance covered by a single pixel, horizontally and
    // vertically.
    pixel_size: (f64, f64),
}

impl Viewport {
    /// Builds the mapping.  Callers are expected to have checked that
    /// the window is well-formed; `ImageParams::new` does so.
    pub fn new(width: usize, height: usize, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Viewport {
            width,
            height,
            x_min,
            x_max,
            y_min,
            y_max,
            pixel_size: (
                (x_max - x_min) / (width as f64),
                (y_max - y_min) / (height as f64),
            ),
        }
    }

    /// The total number of pixels in the integral plane.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Given a pixel, return the complex number at the *centre* of
    /// the area that pixel covers.
    #[inline]
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        Complex::new(
            self.x_min + (pixel.0 as f64 + 0.5) * self.pixel_size.0,
            self.y_max - (pixel.1 as f64 + 0.5) * self.pixel_size.1,
        )
    }
}
