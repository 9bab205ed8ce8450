// src/watch/detector.rs
use std::collections::HashMap;

/// What an observation meant relative to the cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Observation {
    /// Nothing cached yet: the value becomes the baseline, no alert.
    First,
    Unchanged,
    Changed { previous: String },
}

/// Last extracted value per target name. Lives as long as the process.
#[derive(Debug, Default)]
pub struct FileCache {
    files: HashMap<String, String>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Record `value` for `name` and classify it. Exact string equality.
    pub fn observe(&mut self, name: &str, value: &str) -> Observation {
        match self.files.get_mut(name) {
            None => {
                self.files.insert(s!(name), s!(value));
                Observation::First
            }
            Some(cached) if cached == value => Observation::Unchanged,
            Some(cached) => {
                let previous = std::mem::replace(cached, s!(value));
                Observation::Changed { previous }
            }
        }
    }
}
