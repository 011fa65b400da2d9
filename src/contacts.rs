use thiserror::Error;
use uuid::Uuid;

/// A person in the directory, separate from the profile owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("Name is required")]
    MissingName,
    #[error("Email is required")]
    MissingEmail,
}

/// Contents of the add/edit contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactDraft {
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    pub fn from_contact(contact: &Contact) -> Self {
        Self::new(&contact.name, &contact.email, &contact.phone)
    }

    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingName);
        }
        if self.email.trim().is_empty() {
            return Err(ContactError::MissingEmail);
        }
        Ok(())
    }
}

/// Session-only contacts list. Nothing here is persisted.
#[derive(Debug, Default)]
pub struct ContactDirectory {
    contacts: Vec<Contact>,
}

impl ContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    pub fn at(&self, index: usize) -> Option<&Contact> {
        self.contacts.get(index)
    }

    /// Append a new contact built from `draft` under a fresh id.
    pub fn create(&mut self, draft: &ContactDraft) -> Result<&Contact, ContactError> {
        draft.validate()?;
        let contact = Contact {
            id: next_id(),
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
        };
        tracing::info!(id = %contact.id, "contact created");
        self.contacts.push(contact);
        let index = self.contacts.len() - 1;
        Ok(&self.contacts[index])
    }

    /// Replace the fields of contact `id`, keeping its id and position.
    /// Returns `Ok(false)` when no such contact exists.
    pub fn update(&mut self, id: &str, draft: &ContactDraft) -> Result<bool, ContactError> {
        draft.validate()?;
        let Some(contact) = self.contacts.iter_mut().find(|contact| contact.id == id) else {
            return Ok(false);
        };
        contact.name = draft.name.trim().to_string();
        contact.email = draft.email.trim().to_string();
        contact.phone = draft.phone.trim().to_string();
        tracing::info!(id, "contact updated");
        Ok(true)
    }

    pub fn remove_by_id(&mut self, id: &str) -> bool {
        let before = self.contacts.len();
        self.contacts.retain(|contact| contact.id != id);
        let removed = self.contacts.len() != before;
        if removed {
            tracing::info!(id, "contact removed");
        }
        removed
    }
}

/// Time-ordered id (UUID v7); later contacts sort after earlier ones.
fn next_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_create_requires_name_and_email() {
        let mut directory = ContactDirectory::new();

        let err = directory
            .create(&ContactDraft::new("", "a@b.com", "555"))
            .unwrap_err();
        assert_eq!(err, ContactError::MissingName);

        let err = directory
            .create(&ContactDraft::new("Jo", "  ", "555"))
            .unwrap_err();
        assert_eq!(err, ContactError::MissingEmail);

        assert!(directory.is_empty());
    }

    #[test]
    fn test_create_without_phone_succeeds() {
        let mut directory = ContactDirectory::new();
        let contact = directory
            .create(&ContactDraft::new("Jo", "jo@x.com", ""))
            .unwrap()
            .clone();

        assert!(!contact.id.is_empty());
        assert_eq!(contact.name, "Jo");
        assert_eq!(contact.phone, "");
        assert_eq!(directory.at(0), Some(&contact));
    }

    #[test]
    fn test_ids_are_unique_and_order_is_kept() {
        let mut directory = ContactDirectory::new();
        for i in 0..50 {
            directory
                .create(&ContactDraft::new(&format!("P{i}"), "p@x.com", ""))
                .unwrap();
        }
        let ids: HashSet<&str> = directory.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 50);

        let names: Vec<&str> = directory.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names[0], "P0");
        assert_eq!(names[49], "P49");
    }

    #[test]
    fn test_remove_by_id() {
        let mut directory = ContactDirectory::new();
        let first = directory
            .create(&ContactDraft::new("A", "a@x.com", ""))
            .unwrap()
            .id
            .clone();
        directory
            .create(&ContactDraft::new("B", "b@x.com", ""))
            .unwrap();

        assert!(!directory.remove_by_id("no-such-id"));
        assert_eq!(directory.len(), 2);

        assert!(directory.remove_by_id(&first));
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.at(0).map(|c| c.name.as_str()), Some("B"));
        assert!(!directory.remove_by_id(&first));
    }

    #[test]
    fn test_update_keeps_id_and_position() {
        let mut directory = ContactDirectory::new();
        directory
            .create(&ContactDraft::new("A", "a@x.com", ""))
            .unwrap();
        let id = directory
            .create(&ContactDraft::new("B", "b@x.com", ""))
            .unwrap()
            .id
            .clone();

        let updated = directory
            .update(&id, &ContactDraft::new(" Bea ", "bea@x.com", "555"))
            .unwrap();
        assert!(updated);
        let contact = directory.at(1).unwrap();
        assert_eq!(contact.id, id);
        assert_eq!(contact.name, "Bea");
        assert_eq!(contact.phone, "555");

        assert_eq!(
            directory.update(&id, &ContactDraft::new("", "x@x.com", "")),
            Err(ContactError::MissingName)
        );
        assert_eq!(
            directory.update("missing", &ContactDraft::new("C", "c@x.com", "")),
            Ok(false)
        );
    }

    #[test]
    fn test_draft_round_trip_from_contact() {
        let mut directory = ContactDirectory::new();
        let contact = directory
            .create(&ContactDraft::new("Jo", "jo@x.com", "555"))
            .unwrap()
            .clone();
        let draft = ContactDraft::from_contact(&contact);
        assert_eq!(draft, ContactDraft::new("Jo", "jo@x.com", "555"));
    }
}
