// Hiragana Cards – Flashcards for learning hiragana
// Copyright (C) 2023  Neil Roberts
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

/// Returns a random number in the range [0, max). `max` must not be
/// zero.
#[cfg(target_arch = "wasm32")]
pub fn random_range(max: usize) -> usize {
    assert!(max > 0);
    // Math.random() is in [0, 1) but guard against rounding anyway
    ((js_sys::Math::random() * max as f64) as usize).min(max - 1)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn random_range(max: usize) -> usize {
    use rand::Rng;

    assert!(max > 0);
    rand::thread_rng().gen_range(0..max)
}

/// Fisher–Yates shuffle using `pick` to choose an index in [0, n).
pub fn shuffle_with<T, F>(values: &mut [T], mut pick: F)
where
    F: FnMut(usize) -> usize,
{
    for i in (1..values.len()).rev() {
        let j = pick(i + 1);
        values.swap(i, j);
    }
}

pub fn shuffle<T>(values: &mut [T]) {
    shuffle_with(values, random_range);
}
