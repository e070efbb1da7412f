#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tiled Mandelbrot renderer
//!
//! Every pixel of the image is mapped to a point `c` on the complex
//! plane, and `c` is fed through `z = z² + c` starting at zero.  The
//! number of steps it takes `z` to leave the circle of radius 2
//! (its "velocity") decides the pixel's color; points that never
//! leave within the iteration budget are the Mandelbrot set itself.
//!
//! The work is shared among a fixed number of threads.  The image is
//! either cut into one block of rows per thread ahead of time, or
//! into small tiles that threads take from a shared cursor as they
//! go, which keeps fast threads busy while slow ones are still deep
//! inside the set.  Either way, each thread writes into its own
//! disjoint piece of the framebuffer and no pixel is ever written
//! twice.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
extern crate log;
extern crate num;

pub mod color;
pub mod errors;
pub mod escape;
pub mod framebuffer;
pub mod params;
pub mod planes;
pub mod render;
pub mod tiles;

pub use color::Palette;
pub use errors::ParamsError;
pub use framebuffer::Framebuffer;
pub use params::{ImageParams, RenderConfig};
pub use render::{render, ConsoleLog, Dispatcher, WorkerLog};
