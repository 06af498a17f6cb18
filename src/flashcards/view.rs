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

//! What each region of the page should show, independent of the DOM.

use super::catalog::ImageRef;
use super::hiragana;
use super::logic::Logic;
use super::progress::KeyValueStore;

pub const NO_DATA_MESSAGE: &str = "データがありません";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavButton {
    pub symbol: char,
    pub disabled: bool,
    pub learned: bool,
    pub active: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CardImage<'a> {
    Image { src: &'a str, alt: &'a str },
    Glyph(&'a str),
}

#[derive(Debug, PartialEq, Eq)]
pub struct CardView<'a> {
    pub index: usize,
    pub reading: &'a str,
    pub image: CardImage<'a>,
    pub shown: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CardGrid<'a> {
    NoData,
    Cards(Vec<CardView<'a>>),
}

pub fn navigation<S: KeyValueStore>(
    logic: &Logic<S>,
) -> impl Iterator<Item = NavButton> + '_ {
    hiragana::ALPHABET.iter().map(move |&symbol| {
        NavButton {
            symbol,
            disabled: !logic.catalog().is_implemented(symbol),
            learned: logic.progress().is_learned(symbol),
            active: symbol == logic.current(),
        }
    })
}

pub fn card_grid<S: KeyValueStore>(logic: &Logic<S>) -> CardGrid<'_> {
    if logic.n_cards() == 0 {
        return CardGrid::NoData;
    }

    CardGrid::Cards(logic.cards().map(|card| {
        let image = match card.word.image {
            ImageRef::Path(ref src) => CardImage::Image {
                src,
                alt: &card.word.reading,
            },
            ImageRef::Placeholder => CardImage::Glyph(card.word.glyph()),
        };

        CardView {
            index: card.index,
            reading: &card.word.reading,
            image,
            shown: card.shown,
        }
    }).collect())
}

/// CSS width for the progress bar fill.
pub fn progress_width<S: KeyValueStore>(logic: &Logic<S>) -> String {
    format!("{}%", logic.progress_percent())
}
