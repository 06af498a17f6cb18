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

use std::fmt;
use serde::Deserialize;
use super::hiragana;

/// Image strings starting with this are not real images and the
/// fallback glyph is shown instead.
pub const PLACEHOLDER_PREFIX: &str = "placeholder:";

/// Glyph used when a placeholder word has no glyph of its own.
pub const DEFAULT_GLYPH: &str = "🖼️";

static BUILTIN_DATA: &str = include_str!("../../data/words.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Path(String),
    Placeholder,
}

impl ImageRef {
    pub fn parse(s: &str) -> ImageRef {
        if s.is_empty() || s.starts_with(PLACEHOLDER_PREFIX) {
            ImageRef::Placeholder
        } else {
            ImageRef::Path(s.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub reading: String,
    pub image: ImageRef,
    pub fallback_glyph: Option<String>,
}

impl WordEntry {
    pub fn new(
        reading: &str,
        image: ImageRef,
        fallback_glyph: Option<&str>,
    ) -> WordEntry {
        WordEntry {
            reading: reading.to_string(),
            image,
            fallback_glyph: fallback_glyph.map(str::to_string),
        }
    }

    /// The glyph to show when there is no image to display.
    pub fn glyph(&self) -> &str {
        match self.fallback_glyph.as_deref() {
            Some(glyph) if !glyph.is_empty() => glyph,
            _ => DEFAULT_GLYPH,
        }
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Json(serde_json::Error),
    BadCharacter(String),
    DuplicateCharacter(char),
    EmptyReading(char),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogError::Json(e) => write!(f, "Invalid word data: {}", e),
            CatalogError::BadCharacter(s) => {
                write!(f, "“{}” is not a hiragana symbol", s)
            },
            CatalogError::DuplicateCharacter(ch) => {
                write!(f, "“{}” appears more than once", ch)
            },
            CatalogError::EmptyReading(ch) => {
                write!(f, "A word for “{}” has an empty reading", ch)
            },
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> CatalogError {
        CatalogError::Json(e)
    }
}

#[derive(Deserialize)]
struct RawEntry {
    character: String,
    #[serde(default)]
    words: Vec<RawWord>,
}

#[derive(Deserialize)]
struct RawWord {
    reading: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    emoji: Option<String>,
}

pub struct Catalog {
    entries: Vec<(char, Vec<WordEntry>)>,
}

impl Catalog {
    pub fn new(entries: Vec<(char, Vec<WordEntry>)>) -> Catalog {
        Catalog { entries }
    }

    /// The word data that is compiled into the program.
    pub fn builtin() -> Result<Catalog, CatalogError> {
        Catalog::from_json(BUILTIN_DATA)
    }

    pub fn from_json(source: &str) -> Result<Catalog, CatalogError> {
        let raw_entries: Vec<RawEntry> = serde_json::from_str(source)?;

        let mut entries = Vec::<(char, Vec<WordEntry>)>::with_capacity(
            raw_entries.len()
        );

        for raw_entry in raw_entries {
            let Some(ch) = hiragana::single_char(&raw_entry.character)
                .filter(|&ch| hiragana::is_symbol(ch))
            else {
                return Err(CatalogError::BadCharacter(raw_entry.character));
            };

            if entries.iter().any(|&(other, _)| other == ch) {
                return Err(CatalogError::DuplicateCharacter(ch));
            }

            let mut words = Vec::with_capacity(raw_entry.words.len());

            for raw_word in raw_entry.words {
                if raw_word.reading.is_empty() {
                    return Err(CatalogError::EmptyReading(ch));
                }

                let image = match raw_word.image {
                    Some(image) => ImageRef::parse(&image),
                    None => ImageRef::Placeholder,
                };

                words.push(WordEntry {
                    reading: raw_word.reading,
                    image,
                    fallback_glyph: raw_word.emoji,
                });
            }

            entries.push((ch, words));
        }

        Ok(Catalog { entries })
    }

    pub fn get(&self, ch: char) -> Option<&[WordEntry]> {
        self.entries.iter()
            .find(|&&(entry_ch, _)| entry_ch == ch)
            .map(|(_, words)| words.as_slice())
    }

    pub fn implemented_characters(
        &self
    ) -> impl Iterator<Item = char> + '_ {
        self.entries.iter().map(|&(ch, _)| ch)
    }

    pub fn is_implemented(&self, ch: char) -> bool {
        self.entries.iter().any(|&(entry_ch, _)| entry_ch == ch)
    }

    pub fn n_implemented(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builtin() {
        let catalog = Catalog::builtin().unwrap();

        assert_eq!(
            catalog.implemented_characters().collect::<Vec<_>>(),
            vec!['え', 'の'],
        );

        let words = catalog.get('え').unwrap();
        assert_eq!(words.len(), 8);
        assert_eq!(words[1].reading, "えほん");
        assert_eq!(words[1].image, ImageRef::Placeholder);
        assert_eq!(words[1].glyph(), "📖");

        assert_eq!(catalog.get('の').unwrap().len(), 5);
        assert!(catalog.get('あ').is_none());
        assert!(!catalog.is_implemented('あ'));
    }

    #[test]
    fn image_refs() {
        assert_eq!(ImageRef::parse("placeholder:"), ImageRef::Placeholder);
        assert_eq!(ImageRef::parse("placeholder:ehon"), ImageRef::Placeholder);
        assert_eq!(ImageRef::parse(""), ImageRef::Placeholder);
        assert_eq!(
            ImageRef::parse("images/e/ehon.png"),
            ImageRef::Path("images/e/ehon.png".to_string()),
        );
    }

    #[test]
    fn missing_glyph() {
        let word = WordEntry::new("えき", ImageRef::Placeholder, None);
        assert_eq!(word.glyph(), DEFAULT_GLYPH);

        let word = WordEntry::new("えき", ImageRef::Placeholder, Some(""));
        assert_eq!(word.glyph(), DEFAULT_GLYPH);
    }

    #[test]
    fn order_preserved() {
        let catalog = Catalog::from_json(
            "[{\"character\": \"の\", \"words\": []}, \
             {\"character\": \"あ\", \
              \"words\": [{\"reading\": \"あめ\", \
                           \"image\": \"images/a/ame.png\"}]}]"
        ).unwrap();

        assert_eq!(
            catalog.implemented_characters().collect::<Vec<_>>(),
            vec!['の', 'あ'],
        );
        assert_eq!(catalog.get('の').unwrap().len(), 0);

        let word = &catalog.get('あ').unwrap()[0];
        assert_eq!(word.image, ImageRef::Path("images/a/ame.png".to_string()));
        assert_eq!(word.fallback_glyph, None);
    }

    #[test]
    fn errors() {
        assert!(matches!(
            Catalog::from_json("{"),
            Err(CatalogError::Json(_)),
        ));
        assert!(matches!(
            Catalog::from_json("[{\"character\": \"のり\"}]"),
            Err(CatalogError::BadCharacter(s)) if s == "のり",
        ));
        assert!(matches!(
            Catalog::from_json("[{\"character\": \"A\"}]"),
            Err(CatalogError::BadCharacter(_)),
        ));
        assert!(matches!(
            Catalog::from_json(
                "[{\"character\": \"の\"}, {\"character\": \"の\"}]"
            ),
            Err(CatalogError::DuplicateCharacter('の')),
        ));
        assert!(matches!(
            Catalog::from_json(
                "[{\"character\": \"の\", \"words\": [{\"reading\": \"\"}]}]"
            ),
            Err(CatalogError::EmptyReading('の')),
        ));

        assert_eq!(
            CatalogError::DuplicateCharacter('の').to_string(),
            "“の” appears more than once",
        );
    }
}
