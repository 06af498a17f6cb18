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

pub const LANG: &str = "ja-JP";
// Slightly slower and higher than the platform default of 1.0
pub const RATE: f32 = 0.8;
pub const PITCH: f32 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: &'static str,
    pub rate: f32,
    pub pitch: f32,
}

impl Utterance {
    pub fn new(text: &str) -> Utterance {
        Utterance {
            text: text.to_string(),
            lang: LANG,
            rate: RATE,
            pitch: PITCH,
        }
    }
}

/// Something that can say an utterance out loud. Speaking replaces
/// whatever was being said before. Implementations without a voice
/// silently do nothing.
pub trait Speech {
    fn speak(&mut self, utterance: &Utterance);
}

pub struct Silent;

impl Speech for Silent {
    fn speak(&mut self, _utterance: &Utterance) {
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parameters() {
        let utterance = Utterance::new("えほん");

        assert_eq!(utterance.text, "えほん");
        assert_eq!(utterance.lang, "ja-JP");
        assert!(utterance.rate < 1.0);
        assert!(utterance.pitch > 1.0);

        Silent.speak(&utterance);
    }
}
