// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.
//!
//! Starting from zero, a point `c` of the complex plane is pushed
//! through a recurrence until the orbit leaves the disc of radius 2
//! or the iteration budget runs out.  The number of steps taken is
//! what gets colored.
//!
//! Exactly one recurrence is compiled in.  The default is the
//! classic `z² + c`; building with the `exponential` feature swaps in
//! `z² + c·exp(-z)`, which draws a different (and not comparable)
//! picture.

use num::Complex;

/// The outcome of iterating one point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PixelResult {
    /// Steps taken before the orbit escaped, or the full budget if it
    /// never did.
    pub iterations: u32,
    /// `iterations / budget`, in `[0, 1]`.
    pub fraction: f64,
}

impl PixelResult {
    /// Wraps an iteration count together with its normalized value.
    pub fn new(iterations: u32, budget: u32) -> Self {
        PixelResult {
            iterations,
            fraction: f64::from(iterations) / f64::from(budget),
        }
    }

    /// True when the orbit stayed bounded for the whole budget.
    pub fn is_inside(&self) -> bool {
        self.fraction >= 1.0
    }
}

#[cfg(not(feature = "exponential"))]
#[inline]
fn step(z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
    z * z + c
}

#[cfg(feature = "exponential")]
#[inline]
fn step(z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
    z * z + c * (-z).exp()
}

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// The two halves of the `and` expression are false when the point
/// lies in the main cardioid or in the period-2 bulb, both of which
/// are inside the Mandelbrot set.  A `true` guarantees nothing; the
/// point still has to be iterated.
pub fn maybe_outside(point: Complex<f64>) -> bool {
    let y = point.im * point.im;
    let q = y + (point.re - D4) * (point.re - D4);
    q * (q + point.re - D4) > (y * D4) && (point.re + 1.0) * (point.re + 1.0) + y > D16
}

/// Number of steps before the orbit of `c` reaches `|z| ≥ 2`.  An
/// orbit still bounded after `limit` steps reports `limit`, including
/// one that escapes on exactly the last step.
pub fn escape_time(c: Complex<f64>, limit: u32) -> u32 {
    #[cfg(not(feature = "exponential"))]
    {
        if !maybe_outside(c) {
            return limit;
        }
    }

    let mut z = Complex::new(0.0_f64, 0.0_f64);
    for i in 0..limit {
        if z.norm_sqr() >= 4.0 {
            return i;
        }
        z = step(z, c);
    }
    limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), 500), 500);
    }

    #[test]
    fn far_points_escape_after_one_step() {
        assert_eq!(escape_time(Complex::new(3.0, 3.0), 100), 1);
        assert_eq!(escape_time(Complex::new(-1.5, 1.5), 10), 1);
    }

    #[test]
    fn zero_budget_reports_zero() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), 0), 0);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let c = Complex::new(-0.7453, 0.1127);
        let first = escape_time(c, 2000);
        for _ in 0..10 {
            assert_eq!(escape_time(c, 2000), first);
        }
    }

    #[test]
    fn pixel_result_fraction() {
        let r = PixelResult::new(25, 100);
        assert_eq!(r.fraction, 0.25);
        assert!(!r.is_inside());
        assert!(PixelResult::new(100, 100).is_inside());
    }

    #[cfg(not(feature = "exponential"))]
    #[test]
    fn cardioid_and_bulb_are_inside() {
        assert!(!maybe_outside(Complex::new(0.0, 0.0)));
        assert!(!maybe_outside(Complex::new(-0.5, 0.5)));
        assert!(!maybe_outside(Complex::new(-1.0, 0.0)));
        assert!(maybe_outside(Complex::new(0.5, 0.5)));
        assert!(maybe_outside(Complex::new(-2.0, 0.0)));
    }

    #[cfg(not(feature = "exponential"))]
    #[test]
    fn shortcut_agrees_with_full_iteration() {
        fn iterate(c: Complex<f64>, limit: u32) -> u32 {
            let mut z = Complex::new(0.0, 0.0);
            for i in 0..limit {
                if z.norm_sqr() >= 4.0 {
                    return i;
                }
                z = z * z + c;
            }
            limit
        }
        let points = [
            Complex::new(-0.1, 0.1),
            Complex::new(0.2, 0.3),
            Complex::new(-1.1, 0.05),
            Complex::new(0.5, -0.5),
            Complex::new(-0.75, 0.2),
        ];
        for p in points.iter() {
            assert_eq!(escape_time(*p, 200), iterate(*p, 200), "{:?}", p);
        }
    }

    #[cfg(not(feature = "exponential"))]
    #[test]
    fn escape_counts_for_known_points() {
        // 0.5 + 0.5i: |z|² runs 0.5, 1.25, 2.3125, 2.91, 12.6
        assert_eq!(escape_time(Complex::new(0.5, 0.5), 100), 5);
        // -2 stays on the boundary at 2 forever and counts as escaped.
        assert_eq!(escape_time(Complex::new(-2.0, 0.0), 100), 1);
    }
}
