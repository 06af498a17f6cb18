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

use std::collections::VecDeque;
use std::fmt;
use super::catalog::{Catalog, WordEntry};
use super::progress::{KeyValueStore, ProgressStore, ProgressEvent};
use super::speech::Utterance;
use super::random;

/// Something the user asked for by clicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectCharacter(char),
    ToggleCard(usize),
    Speak(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    NavigationChanged,
    CardsChanged,
    CardToggled(usize),
    ProgressChanged,
    Speak(Utterance),
    StorageFailed(String),
}

#[derive(Debug)]
pub enum ConfigError {
    NoImplementedCharacters,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::NoImplementedCharacters => {
                write!(f, "The word data has no characters")
            },
        }
    }
}

struct Card {
    // Index into the catalog’s word list for the displayed character
    word: usize,
    shown: bool,
}

pub struct CardState<'a> {
    pub index: usize,
    pub word: &'a WordEntry,
    pub shown: bool,
}

pub struct Logic<S: KeyValueStore> {
    catalog: Catalog,
    progress: ProgressStore<S>,
    current: char,
    // None until the first render
    displayed: Option<char>,
    cards: Vec<Card>,
    events: VecDeque<Event>,
}

impl<S: KeyValueStore> Logic<S> {
    pub fn new(catalog: Catalog, store: S) -> Result<Logic<S>, ConfigError> {
        let Some(current) = catalog.implemented_characters().next()
        else {
            return Err(ConfigError::NoImplementedCharacters);
        };

        Ok(Logic {
            catalog,
            progress: ProgressStore::load(store),
            current,
            displayed: None,
            cards: Vec::new(),
            events: VecDeque::new(),
        })
    }

    /// Queues the initial render of everything.
    pub fn start(&mut self) {
        self.events.push_back(Event::NavigationChanged);
        self.render_cards(self.current);
        self.events.push_back(Event::ProgressChanged);
    }

    pub fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::SelectCharacter(ch) => self.select_character(ch),
            Intent::ToggleCard(index) => self.toggle_card(index),
            Intent::Speak(text) => self.speak(&text),
        }
    }

    pub fn select_character(&mut self, ch: char) {
        if !self.catalog.is_implemented(ch) {
            return;
        }

        self.current = ch;
        self.events.push_back(Event::NavigationChanged);
        self.render_cards(ch);
    }

    fn render_cards(&mut self, ch: char) {
        self.displayed = Some(ch);
        self.cards.clear();

        if let Some(words) = self.catalog.get(ch) {
            let mut order = (0..words.len()).collect::<Vec<usize>>();

            random::shuffle(&mut order);

            self.cards.extend(order.into_iter().map(|word| {
                Card { word, shown: false }
            }));
        }

        self.events.push_back(Event::CardsChanged);
    }

    pub fn toggle_card(&mut self, index: usize) {
        let Some(card) = self.cards.get_mut(index)
        else {
            return;
        };

        card.shown = !card.shown;

        self.events.push_back(Event::CardToggled(index));

        if !card.shown {
            return;
        }

        let word = card.word;

        let Some(ch) = self.displayed
        else {
            return;
        };

        if let Some(entry) = self.catalog.get(ch).and_then(|w| w.get(word)) {
            self.events.push_back(Event::Speak(Utterance::new(&entry.reading)));
        }

        self.mark_learned(ch);
    }

    pub fn speak(&mut self, text: &str) {
        self.events.push_back(Event::Speak(Utterance::new(text)));
    }

    fn mark_learned(&mut self, ch: char) {
        if let Err(e) = self.progress.mark_learned(ch) {
            self.events.push_back(Event::StorageFailed(e));
        }

        while let Some(event) = self.progress.get_event() {
            match event {
                ProgressEvent::Changed => {
                    self.events.push_back(Event::NavigationChanged);
                    self.events.push_back(Event::ProgressChanged);
                },
            }
        }
    }

    pub fn get_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn current(&self) -> char {
        self.current
    }

    /// The character shown in the centre, or None before the first
    /// render.
    pub fn displayed(&self) -> Option<char> {
        self.displayed
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> &ProgressStore<S> {
        &self.progress
    }

    pub fn n_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn card(&self, index: usize) -> Option<CardState<'_>> {
        let card = self.cards.get(index)?;
        let words = self.catalog.get(self.displayed?)?;

        Some(CardState {
            index,
            word: words.get(card.word)?,
            shown: card.shown,
        })
    }

    pub fn cards(&self) -> CardIter<'_, S> {
        CardIter { logic: self, index: 0 }
    }

    /// Percentage of the implemented characters that have been
    /// learned. Learned characters without word data don’t count.
    pub fn progress_percent(&self) -> f64 {
        let total = self.catalog.n_implemented();

        if total == 0 {
            return 0.0;
        }

        let learned = self.catalog.implemented_characters()
            .filter(|&ch| self.progress.is_learned(ch))
            .count();

        learned as f64 / total as f64 * 100.0
    }
}

pub struct CardIter<'a, S: KeyValueStore> {
    logic: &'a Logic<S>,
    index: usize,
}

impl<'a, S: KeyValueStore> Iterator for CardIter<'a, S> {
    type Item = CardState<'a>;

    fn next(&mut self) -> Option<CardState<'a>> {
        let card = self.logic.card(self.index)?;
        self.index += 1;
        Some(card)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::catalog::ImageRef;
    use super::super::progress::{MemoryStore, STORAGE_KEY};

    fn make_logic() -> Logic<MemoryStore> {
        let mut logic = Logic::new(
            Catalog::builtin().unwrap(),
            MemoryStore::new(),
        ).unwrap();

        logic.start();

        logic
    }

    fn events<S: KeyValueStore>(logic: &mut Logic<S>) -> Vec<Event> {
        let mut events = Vec::new();

        while let Some(event) = logic.get_event() {
            events.push(event);
        }

        events
    }

    fn readings<S: KeyValueStore>(logic: &Logic<S>) -> Vec<String> {
        logic.cards().map(|c| c.word.reading.clone()).collect()
    }

    #[test]
    fn empty_catalog() {
        assert!(matches!(
            Logic::new(Catalog::new(Vec::new()), MemoryStore::new()),
            Err(ConfigError::NoImplementedCharacters),
        ));
    }

    #[test]
    fn initial_state() {
        let mut logic = Logic::new(
            Catalog::builtin().unwrap(),
            MemoryStore::new(),
        ).unwrap();

        assert_eq!(logic.current(), 'え');
        assert_eq!(logic.displayed(), None);
        assert_eq!(logic.n_cards(), 0);
        assert_eq!(logic.progress_percent(), 0.0);
        assert_eq!(logic.get_event(), None);

        logic.start();

        assert_eq!(logic.displayed(), Some('え'));
        assert_eq!(logic.n_cards(), 8);
        assert!(logic.cards().all(|c| !c.shown));
        assert_eq!(
            events(&mut logic),
            vec![
                Event::NavigationChanged,
                Event::CardsChanged,
                Event::ProgressChanged,
            ],
        );
    }

    #[test]
    fn cards_are_shuffled_copy() {
        let mut logic = make_logic();

        let mut shown = readings(&logic);
        shown.sort();

        let mut expected = logic.catalog().get('え').unwrap()
            .iter()
            .map(|w| w.reading.clone())
            .collect::<Vec<_>>();
        let catalog_order = expected.clone();
        expected.sort();

        assert_eq!(shown, expected);

        // Reselecting reshuffles without touching the catalog
        for _ in 0..10 {
            logic.select_character('え');
        }

        assert_eq!(
            logic.catalog().get('え').unwrap()
                .iter()
                .map(|w| w.reading.clone())
                .collect::<Vec<_>>(),
            catalog_order,
        );
    }

    #[test]
    fn select_unimplemented() {
        let mut logic = make_logic();
        events(&mut logic);

        let before = readings(&logic);

        logic.dispatch(Intent::SelectCharacter('あ'));
        logic.dispatch(Intent::SelectCharacter('x'));

        assert_eq!(logic.current(), 'え');
        assert_eq!(logic.displayed(), Some('え'));
        assert_eq!(readings(&logic), before);
        assert_eq!(logic.get_event(), None);
    }

    #[test]
    fn select_implemented() {
        let mut logic = make_logic();
        events(&mut logic);

        logic.dispatch(Intent::SelectCharacter('の'));

        assert_eq!(logic.current(), 'の');
        assert_eq!(logic.displayed(), Some('の'));
        assert_eq!(logic.n_cards(), 5);
        assert!(logic.cards().all(|c| c.word.reading.starts_with('の')));
        assert_eq!(
            events(&mut logic),
            vec![Event::NavigationChanged, Event::CardsChanged],
        );
    }

    #[test]
    fn reveal_marks_learned() {
        let mut logic = make_logic();
        events(&mut logic);

        let reading = logic.card(0).unwrap().word.reading.clone();

        logic.dispatch(Intent::ToggleCard(0));

        assert!(logic.card(0).unwrap().shown);
        assert!(logic.progress().is_learned('え'));
        assert_eq!(logic.progress_percent(), 50.0);
        assert_eq!(
            events(&mut logic),
            vec![
                Event::CardToggled(0),
                Event::Speak(Utterance::new(&reading)),
                Event::NavigationChanged,
                Event::ProgressChanged,
            ],
        );
        assert_eq!(
            logic.progress().store().get(STORAGE_KEY).as_deref(),
            Some("[\"え\"]"),
        );

        // Revealing another card doesn’t count twice
        logic.dispatch(Intent::ToggleCard(1));
        assert_eq!(logic.progress_percent(), 50.0);
        assert_eq!(
            logic.progress().store().get(STORAGE_KEY).as_deref(),
            Some("[\"え\"]"),
        );
    }

    #[test]
    fn hide_does_nothing_else() {
        let mut logic = make_logic();

        logic.toggle_card(2);
        events(&mut logic);

        logic.toggle_card(2);

        assert!(!logic.card(2).unwrap().shown);
        assert_eq!(events(&mut logic), vec![Event::CardToggled(2)]);

        // Every reveal speaks again
        logic.toggle_card(2);
        let events = events(&mut logic);
        assert!(events.iter().any(|e| matches!(e, Event::Speak(_))));
    }

    #[test]
    fn toggle_out_of_range() {
        let mut logic = make_logic();
        events(&mut logic);

        logic.toggle_card(8);

        assert_eq!(logic.get_event(), None);
        assert!(!logic.progress().is_learned('え'));
    }

    #[test]
    fn speak_only_speaks() {
        let mut logic = make_logic();
        events(&mut logic);

        logic.dispatch(Intent::Speak("えき".to_string()));

        assert_eq!(
            events(&mut logic),
            vec![Event::Speak(Utterance::new("えき"))],
        );
        assert!(logic.cards().all(|c| !c.shown));
        assert!(!logic.progress().is_learned('え'));
    }

    #[test]
    fn progress_monotonic() {
        let mut logic = make_logic();
        let mut last = logic.progress_percent();

        for step in 0..20 {
            if step % 3 == 0 {
                let ch = if step % 2 == 0 { 'の' } else { 'え' };
                logic.select_character(ch);
            }

            logic.toggle_card(step % logic.n_cards());

            let percent = logic.progress_percent();
            assert!(percent >= last);
            last = percent;
        }

        assert_eq!(last, 100.0);
    }

    #[test]
    fn stale_progress_ignored() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "[\"あ\", \"ん\", \"の\"]").unwrap();

        let logic = Logic::new(Catalog::builtin().unwrap(), store).unwrap();

        assert!(logic.progress().is_learned('あ'));
        assert_eq!(logic.progress_percent(), 50.0);
    }

    #[test]
    fn no_data() {
        let catalog = Catalog::new(vec![
            ('の', Vec::new()),
            (
                'え',
                vec![WordEntry::new("えき", ImageRef::Placeholder, None)],
            ),
        ]);

        let mut logic = Logic::new(catalog, MemoryStore::new()).unwrap();
        logic.start();

        assert_eq!(logic.displayed(), Some('の'));
        assert_eq!(logic.n_cards(), 0);
        assert!(logic.card(0).is_none());

        logic.select_character('え');
        assert_eq!(logic.n_cards(), 1);
    }
}
