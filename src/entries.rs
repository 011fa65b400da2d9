use serde::{Deserialize, Serialize};

/// Ordered list of free-text entries (email addresses or phone numbers).
///
/// Insertion order is display order. Every mutator reports whether the list
/// changed; invalid input (blank values, stale indices) is a no-op rather
/// than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryStore {
    items: Vec<String>,
}

/// Whether a store accepts a value that is already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryPolicy {
    /// Exact duplicates are dropped before append (profile panel).
    #[default]
    Unique,
    /// Every non-blank value is appended (contact form).
    AllowDuplicates,
}

impl EntryStore {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|item| item == value)
    }

    /// True when another entry holds the same text as the one at `index`.
    pub fn is_repeated(&self, index: usize) -> bool {
        match self.items.get(index) {
            Some(value) => self
                .items
                .iter()
                .enumerate()
                .any(|(i, item)| i != index && item == value),
            None => false,
        }
    }

    /// Append the trimmed value. Blank input is ignored.
    pub fn append(&mut self, value: &str) -> bool {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.items.push(trimmed.to_string());
        true
    }

    /// Like [`append`](Self::append), but skips values already in the list.
    pub fn append_unique(&mut self, value: &str) -> bool {
        let trimmed = value.trim();
        if trimmed.is_empty() || self.contains(trimmed) {
            return false;
        }
        self.items.push(trimmed.to_string());
        true
    }

    /// Append according to `policy`.
    pub fn push_with(&mut self, value: &str, policy: EntryPolicy) -> bool {
        match policy {
            EntryPolicy::Unique => self.append_unique(value),
            EntryPolicy::AllowDuplicates => self.append(value),
        }
    }

    /// Replace the entry at `index` verbatim (inline edits keep whatever the
    /// user typed). Out-of-range indices are ignored.
    pub fn update_at(&mut self, index: usize, value: &str) -> bool {
        match self.items.get_mut(index) {
            Some(slot) => {
                if slot == value {
                    return false;
                }
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove the entry at `index`, shifting later entries down.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        true
    }
}

impl<'a> FromIterator<&'a str> for EntryStore {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(str::to_string).collect(),
        }
    }
}
