use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use time::OffsetDateTime;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;
use tui_widgets::popup::PopupState;

use crate::config::{Config, UiColors};
use crate::contacts::{Contact, ContactDirectory, ContactDraft};
use crate::focus::{EditFocus, EntryKind};
use crate::overview::{AgentSettings, AgentToggle};
use crate::profile::{LoadOutcome, Profile, ProfileEditor, ProfileError, ProfileField};
use crate::storage::{KeyValueStore, ProfileSlot};

use super::draw;
use super::edit::{EditTarget, InlineEditor};
use super::panes::Tab;

/// One selectable line of the profile panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileRow {
    Field(ProfileField),
    Entry(EntryKind, usize),
    AddEntry(EntryKind),
}

impl ProfileRow {
    pub fn kind(self) -> Option<EntryKind> {
        match self {
            ProfileRow::Field(_) => None,
            ProfileRow::Entry(kind, _) | ProfileRow::AddEntry(kind) => Some(kind),
        }
    }
}

/// Rows in display order: basic fields, emails, phone numbers.
pub fn profile_rows(profile: &Profile) -> Vec<ProfileRow> {
    let mut rows = vec![
        ProfileRow::Field(ProfileField::Name),
        ProfileRow::Field(ProfileField::PrimaryEmail),
    ];
    rows.extend((0..profile.additional_emails.len()).map(|i| ProfileRow::Entry(EntryKind::Email, i)));
    rows.push(ProfileRow::AddEntry(EntryKind::Email));
    rows.extend((0..profile.phone_numbers.len()).map(|i| ProfileRow::Entry(EntryKind::Phone, i)));
    rows.push(ProfileRow::AddEntry(EntryKind::Phone));
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Phone,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Phone];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name *",
            FormField::Email => "Email *",
            FormField::Phone => "Phone",
        }
    }

    fn index(self) -> usize {
        match self {
            FormField::Name => 0,
            FormField::Email => 1,
            FormField::Phone => 2,
        }
    }

    fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Phone,
            FormField::Phone => FormField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Phone,
            FormField::Email => FormField::Name,
            FormField::Phone => FormField::Email,
        }
    }
}

/// Add/edit contact form. `editing` holds the id of the contact being
/// edited, `None` when adding.
pub struct ContactForm {
    pub editing: Option<String>,
    pub field: FormField,
    inputs: [Input; 3],
}

impl ContactForm {
    fn new() -> Self {
        Self::from_draft(None, &ContactDraft::default())
    }

    fn from_draft(editing: Option<String>, draft: &ContactDraft) -> Self {
        Self {
            editing,
            field: FormField::Name,
            inputs: [
                Input::new(draft.name.clone()),
                Input::new(draft.email.clone()),
                Input::new(draft.phone.clone()),
            ],
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Contact"
        } else {
            "Add New Contact"
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        self.inputs[field.index()].value()
    }

    pub fn cursor(&self, field: FormField) -> usize {
        self.inputs[field.index()].visual_cursor()
    }

    pub fn draft(&self) -> ContactDraft {
        ContactDraft::new(
            self.value(FormField::Name),
            self.value(FormField::Email),
            self.value(FormField::Phone),
        )
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        self.inputs[self.field.index()].handle_event(&Event::Key(key));
    }
}

/// Blocking notification, dismissed with a key press.
#[derive(Debug, Clone)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: &'static str,
    pub entries: Vec<HelpEntry>,
}

#[derive(Debug, Clone)]
pub struct HelpEntry {
    pub action: &'static str,
    pub keys: String,
}

pub struct App<'a> {
    config: &'a Config,
    store: &'a mut dyn KeyValueStore,
    slot: ProfileSlot,
    pub active_tab: Tab,
    pub profile: ProfileEditor,
    pub profile_row: usize,
    pub focus: EditFocus,
    pub editor: InlineEditor,
    pub contacts: ContactDirectory,
    pub contact_selected: usize,
    pub contact_form: Option<ContactForm>,
    pub agent: AgentSettings,
    pub agent_selected: usize,
    pub status: Option<String>,
    pub notice: Option<Notice>,
    pub modal_popup: PopupState,
    pub show_help: bool,
    pub last_activity: OffsetDateTime,
}

impl<'a> App<'a> {
    pub fn new(config: &'a Config, store: &'a mut dyn KeyValueStore) -> Result<Self> {
        let slot = ProfileSlot::new(config.slot_key.clone());
        let mut profile = ProfileEditor::new(config.profile.entry_policy());
        let outcome = profile.load(&slot, &*store)?;

        let mut app = Self {
            config,
            store,
            slot,
            active_tab: Tab::default(),
            profile,
            profile_row: 0,
            focus: EditFocus::default(),
            editor: InlineEditor::default(),
            contacts: ContactDirectory::new(),
            contact_selected: 0,
            contact_form: None,
            agent: AgentSettings::from(config.agent),
            agent_selected: 0,
            status: None,
            notice: None,
            modal_popup: PopupState::default(),
            show_help: false,
            last_activity: OffsetDateTime::now_utc(),
        };

        match outcome {
            LoadOutcome::Loaded => app.set_status("Profile loaded"),
            LoadOutcome::Empty => {}
            LoadOutcome::Corrupt(reason) => app.show_notice(
                "Profile unreadable",
                format!(
                    "The saved profile could not be read ({}). Starting with an empty profile; saving will replace it.",
                    reason
                ),
            ),
        }
        Ok(app)
    }

    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop<B>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        B: ratatui::backend::Backend,
    {
        loop {
            draw::render(terminal, self)?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Route a key press. Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            return Ok(true);
        }

        if self.notice.is_some() {
            if self.key_matches_any(&key, &self.config.keys.modal.dismiss) {
                self.notice = None;
            }
            return Ok(false);
        }

        if self.show_help {
            if self.key_matches_any(&key, &self.config.keys.modal.dismiss)
                || self.key_matches_any(&key, &self.config.keys.global.help)
            {
                self.show_help = false;
            }
            return Ok(false);
        }

        if self.editor.active {
            self.handle_editor_key(key);
            return Ok(false);
        }

        if self.contact_form.is_some() {
            self.handle_form_key(key);
            return Ok(false);
        }

        let config = self.config;
        let global = &config.keys.global;
        if self.key_matches_any(&key, &global.quit) {
            return Ok(true);
        }
        if self.key_matches_any(&key, &global.help) {
            self.show_help = true;
            return Ok(false);
        }
        if self.key_matches_any(&key, &global.tab_next) {
            self.active_tab = self.active_tab.next();
            return Ok(false);
        }
        if self.key_matches_any(&key, &global.tab_prev) {
            self.active_tab = self.active_tab.prev();
            return Ok(false);
        }
        if let KeyCode::Char(digit) = key.code {
            if let Some(tab) = Tab::from_digit(digit) {
                self.active_tab = tab;
                return Ok(false);
            }
        }

        match self.active_tab {
            Tab::Overview => self.handle_overview_key(key),
            Tab::Profile => self.handle_profile_key(key),
            Tab::Contacts => self.handle_contacts_key(key),
        }
        Ok(false)
    }

    // =========================================================================
    // Overview
    // =========================================================================

    fn handle_overview_key(&mut self, key: KeyEvent) {
        let config = self.config;
        let list = &config.keys.list;
        if self.key_matches_any(&key, &list.next) {
            self.agent_selected = (self.agent_selected + 1).min(AgentToggle::ALL.len() - 1);
        } else if self.key_matches_any(&key, &list.prev) {
            self.agent_selected = self.agent_selected.saturating_sub(1);
        } else if self.key_matches_any(&key, &list.toggle) || self.key_matches_any(&key, &list.edit) {
            let toggle = AgentToggle::ALL[self.agent_selected];
            let enabled = self.agent.toggle(toggle);
            tracing::debug!(?toggle, enabled, "agent setting changed");
            self.set_status(format!(
                "{} {}",
                toggle.title(),
                if enabled { "enabled" } else { "disabled" }
            ));
        }
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub fn profile_rows(&self) -> Vec<ProfileRow> {
        profile_rows(self.profile.current())
    }

    fn selected_profile_row(&self) -> Option<ProfileRow> {
        self.profile_rows().get(self.profile_row).copied()
    }

    fn clamp_profile_row(&mut self) {
        let len = self.profile_rows().len();
        if self.profile_row >= len {
            self.profile_row = len.saturating_sub(1);
        }
    }

    fn select_profile_row(&mut self, row: ProfileRow) {
        if let Some(index) = self.profile_rows().iter().position(|r| *r == row) {
            self.profile_row = index;
        }
    }

    fn handle_profile_key(&mut self, key: KeyEvent) {
        let config = self.config;
        let list = &config.keys.list;
        let rows_len = self.profile_rows().len();

        if self.key_matches_any(&key, &list.next) {
            self.profile_row = (self.profile_row + 1).min(rows_len.saturating_sub(1));
        } else if self.key_matches_any(&key, &list.prev) {
            self.profile_row = self.profile_row.saturating_sub(1);
        } else if self.key_matches_any(&key, &list.edit) {
            if let Some(row) = self.selected_profile_row() {
                self.begin_row_edit(row);
            }
        } else if self.key_matches_any(&key, &list.add) {
            let kind = self
                .selected_profile_row()
                .and_then(ProfileRow::kind)
                .unwrap_or(EntryKind::Email);
            self.select_profile_row(ProfileRow::AddEntry(kind));
            self.begin_row_edit(ProfileRow::AddEntry(kind));
        } else if self.key_matches_any(&key, &list.delete) {
            if let Some(ProfileRow::Entry(kind, index)) = self.selected_profile_row() {
                self.remove_entry(kind, index);
            }
        } else if self.key_matches_any(&key, &list.save) {
            self.save_profile();
        } else if self.key_matches_any(&key, &list.revert) {
            if self.profile.cancel() {
                self.clamp_profile_row();
                self.touch();
                self.set_status("Changes discarded");
            } else {
                self.set_status("Nothing saved yet");
            }
        }
    }

    fn begin_row_edit(&mut self, row: ProfileRow) {
        match row {
            ProfileRow::Field(field) => {
                let current = self.profile.field(field).to_string();
                self.editor.start(&current, EditTarget::Field(field));
            }
            ProfileRow::Entry(kind, index) => {
                let current = self.entry_value(kind, index).unwrap_or_default().to_string();
                self.focus.begin(kind, index);
                self.editor.start(&current, EditTarget::Entry(kind, index));
            }
            ProfileRow::AddEntry(kind) => {
                self.editor.start("", EditTarget::NewEntry(kind));
            }
        }
    }

    fn entry_value(&self, kind: EntryKind, index: usize) -> Option<&str> {
        let profile = self.profile.current();
        match kind {
            EntryKind::Email => profile.additional_emails.get(index),
            EntryKind::Phone => profile.phone_numbers.get(index),
        }
    }

    fn remove_entry(&mut self, kind: EntryKind, index: usize) {
        let removed = match kind {
            EntryKind::Email => self.profile.remove_email(index),
            EntryKind::Phone => self.profile.remove_phone(index),
        };
        if removed {
            self.focus.entry_removed(kind, index);
            self.clamp_profile_row();
            self.touch();
            self.set_status(format!("{} removed", kind.label()));
        }
    }

    /// Write the editor's text into its target as the user types.
    fn apply_live_edit(&mut self, target: EditTarget, value: &str) {
        match target {
            EditTarget::Field(field) => self.profile.set_field(field, value),
            EditTarget::Entry(EntryKind::Email, index) => {
                self.profile.update_email(index, value);
            }
            EditTarget::Entry(EntryKind::Phone, index) => {
                self.profile.update_phone(index, value);
            }
            EditTarget::NewEntry(_) => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let Some(target) = self.editor.target() else {
            self.editor.cancel();
            return;
        };
        let config = self.config;
        let editor_keys = &config.keys.editor;

        if self.key_matches_any(&key, &editor_keys.cancel) {
            let original = self.editor.original().to_string();
            self.apply_live_edit(target, &original);
            self.editor.cancel();
            self.focus.blur();
            self.set_status("Edit cancelled");
            return;
        }

        if self.key_matches_any(&key, &editor_keys.confirm) {
            match target {
                EditTarget::NewEntry(kind) => self.commit_new_entry(kind),
                EditTarget::Entry(kind, index) => self.commit_entry_edit(kind, index),
                EditTarget::Field(_) => {
                    self.editor.cancel();
                    self.focus.commit();
                    self.set_status("Field updated");
                }
            }
            return;
        }

        if self.editor.handle_key_event(key) {
            let value = self.editor.value().to_string();
            self.apply_live_edit(target, &value);
            if !matches!(target, EditTarget::NewEntry(_)) {
                self.touch();
            }
        }
    }

    /// Settle an edited entry: blank rows are removed, and a value that now
    /// repeats another entry falls back to what the row held before.
    fn commit_entry_edit(&mut self, kind: EntryKind, index: usize) {
        let target = EditTarget::Entry(kind, index);
        let value = self.editor.value().trim().to_string();
        if value.is_empty() {
            self.editor.cancel();
            self.remove_entry(kind, index);
            return;
        }

        self.apply_live_edit(target, &value);
        let repeated = match kind {
            EntryKind::Email => self.profile.email_repeated(index),
            EntryKind::Phone => self.profile.phone_repeated(index),
        };
        if repeated {
            let original = self.editor.original().to_string();
            self.apply_live_edit(target, &original);
            self.set_status(format!("{} already listed", kind.label()));
        } else {
            self.set_status(format!("{} updated", kind.label()));
        }
        self.editor.cancel();
        self.focus.commit();
    }

    fn commit_new_entry(&mut self, kind: EntryKind) {
        let value = self.editor.value().to_string();
        if value.trim().is_empty() {
            self.editor.cancel();
            return;
        }
        let added = match kind {
            EntryKind::Email => self.profile.add_email(&value),
            EntryKind::Phone => self.profile.add_phone(&value),
        };
        if added {
            self.editor.cancel();
            self.select_profile_row(ProfileRow::AddEntry(kind));
            self.touch();
            self.set_status(format!("{} added", kind.label()));
        } else {
            self.set_status(format!("{} already listed", kind.label()));
        }
    }

    fn save_profile(&mut self) {
        match self.profile.save(&self.slot, &mut *self.store) {
            Ok(()) => {
                self.touch();
                self.show_notice("Profile", "Profile saved");
            }
            Err(err) => match err.downcast_ref::<ProfileError>() {
                Some(validation) => {
                    let message = validation.to_string();
                    self.show_notice("Profile", message);
                }
                None => {
                    tracing::error!(error = %err, "profile save failed");
                    self.show_notice("Save failed", format!("{:#}", err));
                }
            },
        }
    }

    // =========================================================================
    // Contacts
    // =========================================================================

    pub fn selected_contact(&self) -> Option<&Contact> {
        self.contacts.at(self.contact_selected)
    }

    fn handle_contacts_key(&mut self, key: KeyEvent) {
        let config = self.config;
        let list = &config.keys.list;

        if self.key_matches_any(&key, &list.next) {
            self.contact_selected =
                (self.contact_selected + 1).min(self.contacts.len().saturating_sub(1));
        } else if self.key_matches_any(&key, &list.prev) {
            self.contact_selected = self.contact_selected.saturating_sub(1);
        } else if self.key_matches_any(&key, &list.add) {
            self.contact_form = Some(ContactForm::new());
        } else if self.key_matches_any(&key, &list.edit) {
            let form = self
                .selected_contact()
                .map(|contact| {
                    ContactForm::from_draft(
                        Some(contact.id.clone()),
                        &ContactDraft::from_contact(contact),
                    )
                })
                .unwrap_or_else(ContactForm::new);
            self.contact_form = Some(form);
        } else if self.key_matches_any(&key, &list.delete) {
            if let Some(id) = self.selected_contact().map(|c| c.id.clone()) {
                if self.contacts.remove_by_id(&id) {
                    self.contact_selected = self
                        .contact_selected
                        .min(self.contacts.len().saturating_sub(1));
                    self.touch();
                    self.set_status("Contact removed");
                }
            }
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.contact_form.as_mut() else {
            return;
        };
        let config = self.config;
        let keys = &config.keys.form;

        if key_matches_any(&key, &keys.cancel) {
            self.contact_form = None;
            self.set_status("Cancelled");
        } else if key_matches_any(&key, &keys.next_field) {
            form.field = form.field.next();
        } else if key_matches_any(&key, &keys.prev_field) {
            form.field = form.field.prev();
        } else if key_matches_any(&key, &keys.submit) {
            self.submit_contact_form();
        } else {
            form.handle_key_event(key);
        }
    }

    fn submit_contact_form(&mut self) {
        let Some(form) = self.contact_form.as_ref() else {
            return;
        };
        let draft = form.draft();
        let editing = form.editing.clone();
        let creating = editing.is_none();
        let result = match editing {
            Some(id) => self.contacts.update(&id, &draft).map(|found| {
                if found {
                    "Contact updated"
                } else {
                    "Contact no longer exists"
                }
            }),
            None => self.contacts.create(&draft).map(|_| "Contact added"),
        };

        match result {
            Ok(message) => {
                if creating {
                    self.contact_selected = self.contacts.len().saturating_sub(1);
                }
                self.contact_form = None;
                self.touch();
                self.set_status(message);
            }
            // Form stays open so the user can fill in the missing field
            Err(err) => self.set_status(err.to_string()),
        }
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    fn touch(&mut self) {
        self.last_activity = OffsetDateTime::now_utc();
    }

    fn set_status<S: Into<String>>(&mut self, message: S) {
        self.status = Some(message.into());
    }

    fn show_notice(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notice = Some(Notice {
            title: title.into(),
            message: message.into(),
        });
        self.modal_popup = PopupState::default();
    }

    pub fn ui_colors(&self) -> &UiColors {
        &self.config.ui.colors
    }

    pub fn slot_key(&self) -> &str {
        self.slot.key()
    }

    /// Check if the key event matches any of the bindings in the list
    fn key_matches_any(&self, event: &KeyEvent, bindings: &[String]) -> bool {
        key_matches_any(event, bindings)
    }

    /// Generate help content from current keybindings configuration
    pub fn help_entries(&self) -> Vec<HelpSection> {
        let keys = &self.config.keys;
        let entry = |action: &'static str, bindings: &[String]| HelpEntry {
            action,
            keys: bindings.join(", "),
        };

        vec![
            HelpSection {
                title: "Global",
                entries: vec![
                    entry("Quit", &keys.global.quit),
                    entry("Help", &keys.global.help),
                    entry("Next section", &keys.global.tab_next),
                    entry("Previous section", &keys.global.tab_prev),
                    HelpEntry {
                        action: "Jump to section",
                        keys: "1, 2, 3".to_string(),
                    },
                ],
            },
            HelpSection {
                title: "Panels",
                entries: vec![
                    entry("Down", &keys.list.next),
                    entry("Up", &keys.list.prev),
                    entry("Edit / open", &keys.list.edit),
                    entry("Add", &keys.list.add),
                    entry("Remove", &keys.list.delete),
                    entry("Toggle setting", &keys.list.toggle),
                    entry("Save profile", &keys.list.save),
                    entry("Revert to last saved", &keys.list.revert),
                ],
            },
            HelpSection {
                title: "Contact form",
                entries: vec![
                    entry("Next field", &keys.form.next_field),
                    entry("Previous field", &keys.form.prev_field),
                    entry("Submit", &keys.form.submit),
                    entry("Cancel", &keys.form.cancel),
                ],
            },
            HelpSection {
                title: "Inline editor",
                entries: vec![
                    entry("Done", &keys.editor.confirm),
                    entry("Undo edit", &keys.editor.cancel),
                ],
            },
        ]
    }
}

/// Check if the key event matches any of the bindings in the list
pub fn key_matches_any(event: &KeyEvent, bindings: &[String]) -> bool {
    bindings.iter().any(|b| key_matches_single(event, b))
}

/// Check if the key event matches a single binding string
fn key_matches_single(event: &KeyEvent, binding: &str) -> bool {
    let trimmed = binding.trim();
    if trimmed.is_empty() {
        return false;
    }

    // Ctrl/Alt/Super combinations are not bindable
    let disallowed = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER;
    if event.modifiers.intersects(disallowed) {
        return false;
    }

    let lower = trimmed.to_ascii_lowercase();
    let expected = match lower.as_str() {
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backtab" | "shift+tab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "pageup" | "page_up" => KeyCode::PageUp,
        "pagedown" | "page_down" => KeyCode::PageDown,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "delete" | "del" => KeyCode::Delete,
        name if name.len() > 1 && name.starts_with('f') => match name[1..].parse::<u8>() {
            Ok(n @ 1..=12) => KeyCode::F(n),
            _ => return false,
        },
        // Single character - case-sensitive (m != M, since M requires Shift)
        _ => {
            let mut chars = trimmed.chars();
            match (chars.next(), chars.next()) {
                (Some(first), None) => KeyCode::Char(first),
                _ => return false,
            }
        }
    };
    event.code == expected
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::storage::MemoryStore;

    fn test_config() -> Config {
        let mut config = Config::defaults(PathBuf::from("/tmp/namo-test/config.toml"))
            .expect("default config");
        config.storage_path = PathBuf::from("/tmp/namo-test/storage.db");
        config
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_key_matching() {
        let bindings = vec!["j".to_string(), "Down".to_string(), "F5".to_string()];
        assert!(key_matches_any(&press(KeyCode::Char('j')), &bindings));
        assert!(key_matches_any(&press(KeyCode::Down), &bindings));
        assert!(key_matches_any(&press(KeyCode::F(5)), &bindings));
        assert!(!key_matches_any(&press(KeyCode::Char('J')), &bindings));
        assert!(!key_matches_any(
            &KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL),
            &bindings
        ));
        assert!(!key_matches_single(&press(KeyCode::Char('f')), "f13"));
    }

    #[test]
    fn test_profile_rows_layout() {
        let mut profile = Profile::default();
        profile.additional_emails.append("a@x.com");
        profile.phone_numbers.append("1");
        profile.phone_numbers.append("2");

        assert_eq!(
            profile_rows(&profile),
            vec![
                ProfileRow::Field(ProfileField::Name),
                ProfileRow::Field(ProfileField::PrimaryEmail),
                ProfileRow::Entry(EntryKind::Email, 0),
                ProfileRow::AddEntry(EntryKind::Email),
                ProfileRow::Entry(EntryKind::Phone, 0),
                ProfileRow::Entry(EntryKind::Phone, 1),
                ProfileRow::AddEntry(EntryKind::Phone),
            ]
        );
    }

    #[test]
    fn test_save_without_primary_email_shows_notice() {
        let config = test_config();
        let mut store = MemoryStore::new();
        let mut app = App::new(&config, &mut store).unwrap();

        app.handle_key(press(KeyCode::Char('2'))).unwrap();
        assert_eq!(app.active_tab, Tab::Profile);
        app.handle_key(press(KeyCode::Char('s'))).unwrap();

        let notice = app.notice.clone().expect("notice");
        assert_eq!(notice.message, "Primary email is required");

        // Keys are swallowed until the notice is dismissed
        app.handle_key(press(KeyCode::Char('1'))).unwrap();
        assert_eq!(app.active_tab, Tab::Profile);
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert!(app.notice.is_none());
        drop(app);

        assert_eq!(store.get(&config.slot_key).unwrap(), None);
    }

    #[test]
    fn test_edit_and_save_profile_through_keys() {
        let config = test_config();
        let mut store = MemoryStore::new();
        let mut app = App::new(&config, &mut store).unwrap();
        app.handle_key(press(KeyCode::Char('2'))).unwrap();

        // Primary email row
        app.handle_key(press(KeyCode::Char('j'))).unwrap();
        app.handle_key(press(KeyCode::Char('e'))).unwrap();
        type_text(&mut app, "me@example.com");
        assert_eq!(app.profile.current().primary_email, "me@example.com");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert!(!app.editor.active);

        // Add the same email twice: the second one is dropped
        for _ in 0..2 {
            app.handle_key(press(KeyCode::Char('a'))).unwrap();
            type_text(&mut app, "alt@example.com");
            app.handle_key(press(KeyCode::Enter)).unwrap();
        }
        assert_eq!(
            app.profile.current().additional_emails.as_slice(),
            ["alt@example.com"]
        );
        app.handle_key(press(KeyCode::Esc)).unwrap();
        assert!(!app.editor.active);

        app.handle_key(press(KeyCode::Char('s'))).unwrap();
        assert_eq!(app.notice.as_ref().map(|n| n.message.as_str()), Some("Profile saved"));
        assert!(!app.profile.is_dirty());
        drop(app);

        let raw = store.get(&config.slot_key).unwrap().expect("saved");
        assert!(raw.contains("\"primaryEmail\":\"me@example.com\""));
    }

    #[test]
    fn test_inline_entry_edit_tracks_focus_and_escape_restores() {
        let config = test_config();
        let mut store = MemoryStore::new();
        let mut app = App::new(&config, &mut store).unwrap();
        app.profile.add_phone("555-0100");
        app.active_tab = Tab::Profile;
        app.profile_row = 3; // Name, Primary, AddEmail, Phone 0

        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert!(app.focus.is_editing(EntryKind::Phone, 0));
        type_text(&mut app, "9");
        assert_eq!(app.profile.current().phone_numbers.get(0), Some("555-01009"));

        app.handle_key(press(KeyCode::Esc)).unwrap();
        assert_eq!(app.focus, EditFocus::Idle);
        assert_eq!(app.profile.current().phone_numbers.get(0), Some("555-0100"));
    }

    fn erase(app: &mut App, count: usize) {
        for _ in 0..count {
            app.handle_key(press(KeyCode::Backspace)).unwrap();
        }
    }

    #[test]
    fn test_confirming_entry_edit_drops_blank_and_rejects_repeat() {
        let config = test_config();
        let mut store = MemoryStore::new();
        let mut app = App::new(&config, &mut store).unwrap();
        app.profile.set_field(ProfileField::PrimaryEmail, "me@x.com");
        for email in ["a@x.com", "b@x.com", "c@x.com"] {
            app.profile.add_email(email);
        }
        app.active_tab = Tab::Profile;

        // Erasing a row and confirming removes it
        app.profile_row = 3; // Name, Primary, Email 0, Email 1
        app.handle_key(press(KeyCode::Enter)).unwrap();
        erase(&mut app, 7);
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert!(!app.editor.active);
        assert_eq!(app.focus, EditFocus::Idle);
        assert_eq!(
            app.profile.current().additional_emails.as_slice(),
            ["a@x.com", "c@x.com"]
        );

        // Turning a row into a copy of another puts the old value back
        app.profile_row = 3;
        app.handle_key(press(KeyCode::Enter)).unwrap();
        erase(&mut app, 7);
        type_text(&mut app, "a@x.com");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(app.status.as_deref(), Some("Email already listed"));
        assert_eq!(app.focus, EditFocus::Idle);
        assert_eq!(
            app.profile.current().additional_emails.as_slice(),
            ["a@x.com", "c@x.com"]
        );

        // Surrounding whitespace is trimmed on confirm
        app.handle_key(press(KeyCode::Enter)).unwrap();
        erase(&mut app, 7);
        type_text(&mut app, " d@x.com ");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(
            app.profile.current().additional_emails.as_slice(),
            ["a@x.com", "d@x.com"]
        );

        app.handle_key(press(KeyCode::Char('s'))).unwrap();
        drop(app);
        let raw = store.get(&config.slot_key).unwrap().expect("saved");
        assert!(raw.contains(r#""additionalEmails":["a@x.com","d@x.com"]"#));
    }

    #[test]
    fn test_revert_restores_loaded_profile() {
        let config = test_config();
        let mut store = MemoryStore::new();
        let mut seed = ProfileEditor::default();
        seed.set_field(ProfileField::PrimaryEmail, "saved@example.com");
        seed.add_email("one@example.com");
        seed.save(&ProfileSlot::new(config.slot_key.clone()), &mut store)
            .unwrap();

        let mut app = App::new(&config, &mut store).unwrap();
        assert_eq!(app.profile.current().primary_email, "saved@example.com");
        app.active_tab = Tab::Profile;
        app.profile_row = 2;
        app.handle_key(press(KeyCode::Char('x'))).unwrap();
        assert!(app.profile.current().additional_emails.is_empty());

        app.handle_key(press(KeyCode::Char('u'))).unwrap();
        assert_eq!(
            app.profile.current().additional_emails.as_slice(),
            ["one@example.com"]
        );
    }

    #[test]
    fn test_corrupt_profile_shows_notice() {
        let config = test_config();
        let mut store = MemoryStore::new();
        store.set(&config.slot_key, "not json").unwrap();
        let app = App::new(&config, &mut store).unwrap();
        assert!(app.notice.is_some());
        assert_eq!(app.profile.current(), &Profile::default());
    }

    #[test]
    fn test_contact_form_create_edit_delete() {
        let config = test_config();
        let mut store = MemoryStore::new();
        let mut app = App::new(&config, &mut store).unwrap();
        app.handle_key(press(KeyCode::Char('3'))).unwrap();

        // Missing name keeps the form open
        app.handle_key(press(KeyCode::Char('a'))).unwrap();
        app.handle_key(press(KeyCode::Tab)).unwrap();
        type_text(&mut app, "jo@x.com");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert!(app.contact_form.is_some());
        assert_eq!(app.status.as_deref(), Some("Name is required"));
        assert!(app.contacts.is_empty());

        app.handle_key(press(KeyCode::BackTab)).unwrap();
        type_text(&mut app, "Jo");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert!(app.contact_form.is_none());
        assert_eq!(app.contacts.len(), 1);
        let id = app.contacts.at(0).unwrap().id.clone();
        assert!(!id.is_empty());

        // Edit keeps the id
        app.handle_key(press(KeyCode::Char('e'))).unwrap();
        type_text(&mut app, "anna");
        app.handle_key(press(KeyCode::Enter)).unwrap();
        let contact = app.contacts.at(0).unwrap();
        assert_eq!(contact.id, id);
        assert_eq!(contact.name, "Joanna");

        app.handle_key(press(KeyCode::Char('x'))).unwrap();
        assert!(app.contacts.is_empty());
    }

    #[test]
    fn test_agent_toggle() {
        let config = test_config();
        let mut store = MemoryStore::new();
        let mut app = App::new(&config, &mut store).unwrap();
        assert_eq!(app.active_tab, Tab::Overview);

        app.handle_key(press(KeyCode::Char(' '))).unwrap();
        assert!(app.agent.phone_access);
        app.handle_key(press(KeyCode::Char('j'))).unwrap();
        app.handle_key(press(KeyCode::Char('j'))).unwrap();
        app.handle_key(press(KeyCode::Char('j'))).unwrap();
        app.handle_key(press(KeyCode::Char(' '))).unwrap();
        assert!(!app.agent.notifications);
    }

    #[test]
    fn test_quit_keys() {
        let config = test_config();
        let mut store = MemoryStore::new();
        let mut app = App::new(&config, &mut store).unwrap();
        assert!(app.handle_key(press(KeyCode::Char('q'))).unwrap());
        assert!(app
            .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap());
    }
}
