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

use std::collections::{BTreeSet, HashMap};
use super::hiragana;

pub const STORAGE_KEY: &str = "hiragana-learned";

/// A persistent string slot store such as the browser’s localStorage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), String>;
}

#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    Changed,
}

pub struct ProgressStore<S: KeyValueStore> {
    store: S,
    learned: BTreeSet<char>,
    changed_queued: bool,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Reads the learned set out of `store`. Anything that can’t be
    /// understood is treated as no progress.
    pub fn load(store: S) -> ProgressStore<S> {
        let learned = store.get(STORAGE_KEY)
            .map(|value| parse_learned(&value))
            .unwrap_or_default();

        ProgressStore {
            store,
            learned,
            changed_queued: false,
        }
    }

    pub fn is_learned(&self, ch: char) -> bool {
        self.learned.contains(&ch)
    }

    pub fn learned(&self) -> impl Iterator<Item = char> + '_ {
        self.learned.iter().copied()
    }

    /// Adds `ch` to the learned set and returns whether it was new.
    /// The set is only written back to the store when it changes but
    /// a change notification is queued either way. If the write fails
    /// the character still counts as learned for this session.
    pub fn mark_learned(&mut self, ch: char) -> Result<bool, String> {
        self.changed_queued = true;

        if !self.learned.insert(ch) {
            return Ok(false);
        }

        let value = serialize_learned(&self.learned)?;

        self.store.set(STORAGE_KEY, &value)?;

        Ok(true)
    }

    pub fn get_event(&mut self) -> Option<ProgressEvent> {
        if self.changed_queued {
            self.changed_queued = false;
            Some(ProgressEvent::Changed)
        } else {
            None
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn parse_learned(value: &str) -> BTreeSet<char> {
    match serde_json::from_str::<Vec<String>>(value) {
        Ok(symbols) => {
            symbols.iter()
                .filter_map(|s| hiragana::single_char(s))
                .collect()
        },
        Err(_) => BTreeSet::new(),
    }
}

fn serialize_learned(learned: &BTreeSet<char>) -> Result<String, String> {
    let symbols = learned.iter()
        .map(char::to_string)
        .collect::<Vec<String>>();

    serde_json::to_string(&symbols).map_err(|e| e.to_string())
}
