use crossterm::event::{Event, KeyEvent};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::focus::EntryKind;
use crate::profile::ProfileField;

/// What the inline editor is writing into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Field(ProfileField),
    Entry(EntryKind, usize),
    /// The "add another" row under a list
    NewEntry(EntryKind),
}

/// Single-line text editor shared by every editable row of the profile
/// panel. Only one row is edited at a time.
#[derive(Default)]
pub struct InlineEditor {
    pub active: bool,
    target: Option<EditTarget>,
    original: String,
    input: Input,
}

impl InlineEditor {
    pub fn start(&mut self, current: &str, target: EditTarget) {
        self.active = true;
        self.target = Some(target);
        self.original = current.to_string();
        self.input = Input::new(current.to_string());
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.target = None;
        self.original.clear();
        self.input.reset();
    }

    pub fn target(&self) -> Option<EditTarget> {
        self.target
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Text the row held when editing started
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn visual_cursor(&self) -> usize {
        self.input.visual_cursor()
    }

    /// Feed a key to the text input. Returns true when the value changed.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        self.input
            .handle_event(&Event::Key(key))
            .map(|change| change.value)
            .unwrap_or(false)
    }
}
