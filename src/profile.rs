use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entries::{EntryPolicy, EntryStore};
use crate::storage::{KeyValueStore, ProfileSlot, SlotRead};

/// The user's own contact details, stored as a single JSON document.
///
/// Field names on disk are camelCase (`primaryEmail`, `additionalEmails`,
/// `phoneNumbers`) so existing saved data keeps loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub primary_email: String,
    pub additional_emails: EntryStore,
    pub phone_numbers: EntryStore,
}

impl Profile {
    pub fn has_content(&self) -> bool {
        !self.name.is_empty()
            || !self.primary_email.is_empty()
            || !self.additional_emails.is_empty()
            || !self.phone_numbers.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    PrimaryEmail,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Primary email is required")]
    MissingPrimaryEmail,
}

/// What [`ProfileEditor::load`] found in the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Empty,
    /// The slot held unreadable data; the editor kept its defaults.
    Corrupt(String),
}

/// Editing state for the profile panel: the working copy plus the snapshot
/// it was last saved as (or loaded from).
#[derive(Debug, Clone, Default)]
pub struct ProfileEditor {
    current: Profile,
    last_saved: Option<Profile>,
    policy: EntryPolicy,
}

impl ProfileEditor {
    pub fn new(policy: EntryPolicy) -> Self {
        Self {
            current: Profile::default(),
            last_saved: None,
            policy,
        }
    }

    pub fn current(&self) -> &Profile {
        &self.current
    }

    pub fn last_saved(&self) -> Option<&Profile> {
        self.last_saved.as_ref()
    }

    pub fn load(&mut self, slot: &ProfileSlot, store: &dyn KeyValueStore) -> Result<LoadOutcome> {
        let outcome = match slot.read(store)? {
            SlotRead::Present(profile) => {
                self.current = profile.clone();
                self.last_saved = Some(profile);
                LoadOutcome::Loaded
            }
            SlotRead::Absent => LoadOutcome::Empty,
            SlotRead::Corrupt(reason) => LoadOutcome::Corrupt(reason),
        };
        tracing::debug!(slot = slot.key(), ?outcome, "profile loaded");
        Ok(outcome)
    }

    /// Persist the working copy. Rejected while the primary email is blank;
    /// in that case neither the slot nor the snapshot changes.
    pub fn save(&mut self, slot: &ProfileSlot, store: &mut dyn KeyValueStore) -> Result<()> {
        self.validate()?;
        slot.write(store, &self.current)?;
        self.last_saved = Some(self.current.clone());
        tracing::info!(slot = slot.key(), "profile saved");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.current.primary_email.trim().is_empty() {
            return Err(ProfileError::MissingPrimaryEmail);
        }
        Ok(())
    }

    /// Drop unsaved changes. Returns false when there is nothing to go back to.
    pub fn cancel(&mut self) -> bool {
        match &self.last_saved {
            Some(saved) => {
                self.current = saved.clone();
                true
            }
            None => false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        match &self.last_saved {
            Some(saved) => *saved != self.current,
            None => self.current != Profile::default(),
        }
    }

    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.current.name,
            ProfileField::PrimaryEmail => &self.current.primary_email,
        }
    }

    pub fn set_field(&mut self, field: ProfileField, value: &str) {
        let target = match field {
            ProfileField::Name => &mut self.current.name,
            ProfileField::PrimaryEmail => &mut self.current.primary_email,
        };
        *target = value.to_string();
    }

    pub fn add_email(&mut self, value: &str) -> bool {
        self.current.additional_emails.push_with(value, self.policy)
    }

    pub fn add_phone(&mut self, value: &str) -> bool {
        self.current.phone_numbers.push_with(value, self.policy)
    }

    pub fn update_email(&mut self, index: usize, value: &str) -> bool {
        self.current.additional_emails.update_at(index, value)
    }

    pub fn update_phone(&mut self, index: usize, value: &str) -> bool {
        self.current.phone_numbers.update_at(index, value)
    }

    /// Whether the email at `index` repeats another one while duplicates are
    /// not allowed.
    pub fn email_repeated(&self, index: usize) -> bool {
        self.policy == EntryPolicy::Unique && self.current.additional_emails.is_repeated(index)
    }

    pub fn phone_repeated(&self, index: usize) -> bool {
        self.policy == EntryPolicy::Unique && self.current.phone_numbers.is_repeated(index)
    }

    pub fn remove_email(&mut self, index: usize) -> bool {
        self.current.additional_emails.remove_at(index)
    }

    pub fn remove_phone(&mut self, index: usize) -> bool {
        self.current.phone_numbers.remove_at(index)
    }
}
