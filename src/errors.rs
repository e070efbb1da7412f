// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Configuration errors.  Once an `ImageParams` exists the renderer
//! itself cannot fail, so this is the only error type in the crate.

/// Reasons a `RenderConfig` is refused.
#[derive(Debug, Fail, PartialEq)]
pub enum ParamsError {
    /// Width or height was zero.
    #[fail(display = "Image dimensions must be positive, got {}x{}", _0, _1)]
    EmptyImage(usize, usize),

    /// The iteration budget was zero.
    #[fail(display = "Iteration count must be positive")]
    NoIterations,

    /// The thread count was zero.
    #[fail(display = "Thread count must be at least 1")]
    NoThreads,

    /// One of the viewport bounds is NaN or infinite.
    #[fail(display = "Viewport bounds must be finite numbers")]
    NonFiniteBounds,

    /// `x_max` is not to the right of `x_min`.
    #[fail(display = "The left edge {} is not to the left of the right edge {}", _0, _1)]
    InvertedReal(f64, f64),

    /// `y_max` is not above `y_min`.
    #[fail(display = "The bottom edge {} is not below the top edge {}", _0, _1)]
    InvertedImaginary(f64, f64),

    /// A tile dimension was zero.
    #[fail(display = "Tile dimensions must be positive, got {}x{}", _0, _1)]
    EmptyTile(usize, usize),

    /// The tile size does not evenly divide the image.
    #[fail(
        display = "Tile size {}x{} does not evenly divide image size {}x{}",
        tile_width, tile_height, width, height
    )]
    UnevenTiles {
        /// Requested tile width.
        tile_width: usize,
        /// Requested tile height.
        tile_height: usize,
        /// Image width.
        width: usize,
        /// Image height.
        height: usize,
    },
}
