/// Which list an inline-edited entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Email,
    Phone,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Email => "Email",
            EntryKind::Phone => "Phone",
        }
    }
}

/// Tracks the single entry in inline-edit mode.
///
/// Starting an edit on another entry replaces the current one without a
/// commit step: the underlying list already holds the live value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditFocus {
    #[default]
    Idle,
    Editing { kind: EntryKind, index: usize },
}

impl EditFocus {
    pub fn begin(&mut self, kind: EntryKind, index: usize) {
        *self = EditFocus::Editing { kind, index };
    }

    pub fn commit(&mut self) {
        *self = EditFocus::Idle;
    }

    pub fn blur(&mut self) {
        self.commit();
    }

    pub fn current(&self) -> Option<(EntryKind, usize)> {
        match *self {
            EditFocus::Idle => None,
            EditFocus::Editing { kind, index } => Some((kind, index)),
        }
    }

    pub fn is_editing(&self, kind: EntryKind, index: usize) -> bool {
        self.current() == Some((kind, index))
    }

    /// Keep the focus pointing at the same entry after `kind[index]` was
    /// removed from its list.
    pub fn entry_removed(&mut self, kind: EntryKind, index: usize) {
        if let EditFocus::Editing {
            kind: focused_kind,
            index: focused,
        } = *self
        {
            if focused_kind != kind {
                return;
            }
            if focused == index {
                *self = EditFocus::Idle;
            } else if focused > index {
                *self = EditFocus::Editing {
                    kind,
                    index: focused - 1,
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_replaces_previous_focus() {
        let mut focus = EditFocus::default();
        assert_eq!(focus, EditFocus::Idle);

        focus.begin(EntryKind::Email, 2);
        focus.begin(EntryKind::Phone, 0);
        assert_eq!(
            focus,
            EditFocus::Editing {
                kind: EntryKind::Phone,
                index: 0
            }
        );
        assert!(!focus.is_editing(EntryKind::Email, 2));
        assert!(focus.is_editing(EntryKind::Phone, 0));
    }

    #[test]
    fn test_commit_and_blur_return_to_idle() {
        let mut focus = EditFocus::default();
        focus.begin(EntryKind::Email, 0);
        focus.commit();
        assert_eq!(focus, EditFocus::Idle);

        focus.begin(EntryKind::Phone, 1);
        focus.blur();
        assert_eq!(focus.current(), None);
    }

    #[test]
    fn test_entry_removed_adjusts_focus() {
        let mut focus = EditFocus::default();
        focus.begin(EntryKind::Email, 2);

        // Other list: untouched
        focus.entry_removed(EntryKind::Phone, 0);
        assert!(focus.is_editing(EntryKind::Email, 2));

        // Earlier entry removed: index shifts
        focus.entry_removed(EntryKind::Email, 0);
        assert!(focus.is_editing(EntryKind::Email, 1));

        // Later entry removed: unchanged
        focus.entry_removed(EntryKind::Email, 4);
        assert!(focus.is_editing(EntryKind::Email, 1));

        // Focused entry removed: idle
        focus.entry_removed(EntryKind::Email, 1);
        assert_eq!(focus, EditFocus::Idle);
    }
}
