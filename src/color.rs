// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns iteration counts into RGB triples.

use std::str::FromStr;

/// Colors per channel.
const N: u32 = 256;
/// The whole 24-bit color space.
const N3: u32 = N * N * N;

/// How an escape count is mapped onto a color.  Both palettes send a
/// count of zero to black and the full budget (inside the set) to
/// white.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Palette {
    /// Spreads the normalized count over the 256³ color space and
    /// reads the three bytes back out.  Produces hard bands.
    Banded,
    /// Raises the normalized count to a different power per channel
    /// (0.4, 0.7, 0.3) for a continuous gradient.
    Smooth,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::Banded
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "banded" => Ok(Palette::Banded),
            "smooth" => Ok(Palette::Smooth),
            _ => Err(format!("Unknown palette '{}'", s)),
        }
    }
}

impl Palette {
    /// The color for a point that took `iterations` of `budget` steps.
    #[inline]
    pub fn color_of(self, iterations: u32, budget: u32) -> [u8; 3] {
        let t = (f64::from(iterations) / f64::from(budget)).min(1.0).max(0.0);
        match self {
            Palette::Banded => banded(t),
            Palette::Smooth => smooth(t),
        }
    }
}

fn banded(t: f64) -> [u8; 3] {
    let v = ((t * f64::from(N3)) as u32).min(N3 - 1);
    let b = v / (N * N);
    let r = (v / N) % N;
    let g = v % N;
    [r as u8, g as u8, b as u8]
}

fn smooth(t: f64) -> [u8; 3] {
    let channel = |power: f64| (t.powf(power) * 255.0).round() as u8;
    [channel(0.4), channel(0.7), channel(0.3)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_and_boundary_differ() {
        for palette in [Palette::Banded, Palette::Smooth].iter() {
            let inside = palette.color_of(1000, 1000);
            let boundary = palette.color_of(0, 1000);
            assert_eq!(inside, [255, 255, 255]);
            assert_eq!(boundary, [0, 0, 0]);
            assert_ne!(inside, boundary);
        }
    }

    #[test]
    fn colors_are_deterministic() {
        for i in 0..=50 {
            assert_eq!(Palette::Banded.color_of(i, 50), Palette::Banded.color_of(i, 50));
            assert_eq!(Palette::Smooth.color_of(i, 50), Palette::Smooth.color_of(i, 50));
        }
    }

    #[test]
    fn banded_decomposes_into_bytes() {
        // Half the budget lands exactly on 128 * 65536.
        assert_eq!(Palette::Banded.color_of(1, 2), [0, 0, 128]);
        // A quarter lands on 64 * 65536.
        assert_eq!(Palette::Banded.color_of(1, 4), [0, 0, 64]);
    }

    #[test]
    fn smooth_channels_rise_at_different_rates() {
        let [r, g, b] = Palette::Smooth.color_of(1, 4);
        assert!(b > r && r > g);
    }

    #[test]
    fn palettes_parse_from_names() {
        assert_eq!("banded".parse::<Palette>(), Ok(Palette::Banded));
        assert_eq!("smooth".parse::<Palette>(), Ok(Palette::Smooth));
        assert!("plaid".parse::<Palette>().is_err());
    }
}
