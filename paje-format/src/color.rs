// Copyright (C) 2025 Category Labs, Inc.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Categorical colors for entity values.

/// RGB triple, one channel per component, nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Maps a hue in `[0, 1]` onto the six-segment color wheel.
    ///
    /// The last segment keeps the historical `1 - 5(x - 1/6)` blue ramp so
    /// existing traces keep their palette.
    pub fn from_hue(x: f64) -> Self {
        let d = 1.0 / 6.0;
        if x < d {
            Color::new(1.0, 6.0 * x, 0.0)
        } else if x < 2.0 * d {
            Color::new(1.0 - 6.0 * (x - d), 1.0, 0.0)
        } else if x < 3.0 * d {
            Color::new(0.0, 1.0, 6.0 * (x - 2.0 * d))
        } else if x < 4.0 * d {
            Color::new(0.0, 1.0 - 6.0 * (x - 3.0 * d), 1.0)
        } else if x < 5.0 * d {
            Color::new(6.0 * (x - 4.0 * d), 0.0, 1.0)
        } else {
            Color::new(1.0, 0.0, 1.0 - 5.0 * (x - d))
        }
    }

    /// Stable color derived from a name.
    pub fn for_name(name: &str) -> Self {
        Self::from_hue(hue_for_name(name))
    }
}

/// Hashes `name` into a hue in `[0, 1]`.
///
/// The hash is folded to 32 bits before normalization. It does not depend on
/// process state, so the same name gets the same hue in every run.
pub fn hue_for_name(name: &str) -> f64 {
    let mut hash = fxhash::hash64(name);
    hash ^= hash >> 32;
    let folded = hash as u32;
    f64::from(folded) / f64::from(u32::MAX)
}
