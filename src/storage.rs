//! Key-value persistence for the profile.
//!
//! The profile lives in a single named slot as a JSON document. Any backend
//! that can get/set a string under a key works; the binary uses SQLite under
//! the data directory, tests use `MemoryStore`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use rusqlite::{params, Connection, OptionalExtension};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::profile::Profile;

pub const DEFAULT_SLOT_KEY: &str = "profile-config";
const DB_FILE_NAME: &str = "storage.db";

/// String key-value store with last-writer-wins semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

// =============================================================================
// SQLite backend
// =============================================================================

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create storage dir: {}", parent.display())
                })?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open storage at {}", path.display()))?;
        let mut store = Self { conn };
        store.setup()?;
        Ok(store)
    }

    fn setup(&mut self) -> Result<()> {
        self.conn.pragma_update(None, "journal_mode", "WAL")?;
        self.conn.pragma_update(None, "synchronous", "FULL")?;

        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS slots (
              key        TEXT PRIMARY KEY,
              value      TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );
        "#,
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .with_context(|| format!("failed to read slot `{}`", key))?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let updated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .context("failed to format timestamp")?;
        self.conn
            .execute(
                "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = excluded.updated_at",
                params![key, value, updated_at],
            )
            .with_context(|| format!("failed to write slot `{}`", key))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key = ?1", params![key])
            .with_context(|| format!("failed to remove slot `{}`", key))?;
        Ok(())
    }
}

/// `<data_dir>/namo/storage.db`
pub fn default_path() -> Result<PathBuf> {
    let base = BaseDirs::new().context("unable to determine data directories")?;
    Ok(base.data_dir().join("namo").join(DB_FILE_NAME))
}

// =============================================================================
// In-memory backend
// =============================================================================

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

// =============================================================================
// Profile slot
// =============================================================================

/// Result of reading the profile slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotRead {
    Absent,
    Present(Profile),
    /// Something is stored under the key but it is not a profile document.
    Corrupt(String),
}

/// The named slot holding the serialized profile.
#[derive(Debug, Clone)]
pub struct ProfileSlot {
    key: String,
}

impl ProfileSlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn read(&self, store: &dyn KeyValueStore) -> Result<SlotRead> {
        let Some(raw) = store.get(&self.key)? else {
            return Ok(SlotRead::Absent);
        };
        match serde_json::from_str::<Profile>(&raw) {
            Ok(profile) => Ok(SlotRead::Present(profile)),
            Err(err) => {
                tracing::warn!(slot = %self.key, error = %err, "stored profile is not valid JSON");
                Ok(SlotRead::Corrupt(err.to_string()))
            }
        }
    }

    pub fn write(&self, store: &mut dyn KeyValueStore, profile: &Profile) -> Result<()> {
        let raw = serde_json::to_string(profile).context("failed to serialize profile")?;
        store.set(&self.key, &raw)
    }

    pub fn clear(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        store.remove(&self.key)
    }
}

impl Default for ProfileSlot {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntryStore;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn sample_profile() -> Profile {
        let mut profile = Profile::default();
        profile.name = "Ada Lovelace".into();
        profile.primary_email = "ada@example.com".into();
        profile.additional_emails.append("ada@work.example");
        profile.additional_emails.append("countess@example.org");
        profile.phone_numbers.append("+44 20 7946 0000");
        profile
    }

    fn arbitrary_entries() -> impl Strategy<Value = EntryStore> {
        prop::collection::vec("\\PC{1,16}", 0..5)
            .prop_map(|items| items.iter().map(String::as_str).collect())
    }

    fn arbitrary_profile() -> impl Strategy<Value = Profile> {
        (
            "\\PC{0,24}",
            "\\PC{1,24}",
            arbitrary_entries(),
            arbitrary_entries(),
        )
            .prop_map(|(name, primary_email, additional_emails, phone_numbers)| Profile {
                name,
                primary_email,
                additional_emails,
                phone_numbers,
            })
    }

    proptest! {
        #[test]
        fn prop_round_trip_through_memory_store(profile in arbitrary_profile()) {
            let mut store = MemoryStore::new();
            let slot = ProfileSlot::default();

            slot.write(&mut store, &profile).unwrap();
            prop_assert_eq!(slot.read(&store).unwrap(), SlotRead::Present(profile));
        }

        #[test]
        fn prop_later_write_replaces_earlier(
            first in arbitrary_profile(),
            second in arbitrary_profile()
        ) {
            let mut store = MemoryStore::new();
            let slot = ProfileSlot::new("work");

            slot.write(&mut store, &first).unwrap();
            slot.write(&mut store, &second).unwrap();
            prop_assert_eq!(slot.read(&store).unwrap(), SlotRead::Present(second));
        }
    }

    #[test]
    fn test_absent_slot() {
        let store = MemoryStore::new();
        let slot = ProfileSlot::new("missing");
        assert_eq!(slot.read(&store).unwrap(), SlotRead::Absent);
    }

    #[test]
    fn test_corrupt_slot_is_reported() {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_SLOT_KEY, "{not json").unwrap();
        let slot = ProfileSlot::default();
        assert!(matches!(slot.read(&store).unwrap(), SlotRead::Corrupt(_)));

        // Valid JSON with the wrong shape is corrupt too
        store.set(DEFAULT_SLOT_KEY, r#"{"additionalEmails": 3}"#).unwrap();
        assert!(matches!(slot.read(&store).unwrap(), SlotRead::Corrupt(_)));
    }

    #[test]
    fn test_slots_are_independent() {
        let mut store = MemoryStore::new();
        let first = ProfileSlot::new("first");
        let second = ProfileSlot::new("second");
        first.write(&mut store, &sample_profile()).unwrap();
        assert_eq!(second.read(&store).unwrap(), SlotRead::Absent);
    }

    #[test]
    fn test_sqlite_store_last_writer_wins_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.set("k", "one").unwrap();
            store.set("k", "two").unwrap();
            assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        }

        let mut reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("two"));
        reopened.remove("k").unwrap();
        assert_eq!(reopened.get("k").unwrap(), None);
    }

    #[test]
    fn test_sqlite_profile_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = SqliteStore::open(&dir.path().join("storage.db")).unwrap();
        let slot = ProfileSlot::default();
        let profile = sample_profile();

        slot.write(&mut store, &profile).unwrap();
        assert_eq!(slot.read(&store).unwrap(), SlotRead::Present(profile));

        slot.clear(&mut store).unwrap();
        assert_eq!(slot.read(&store).unwrap(), SlotRead::Absent);
    }
}
