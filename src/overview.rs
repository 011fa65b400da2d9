//! Values shown on the overview panel.

use time::macros::format_description;
use time::OffsetDateTime;

use crate::config::AgentDefaults;
use crate::profile::ProfileEditor;

pub const GETTING_STARTED: [&str; 4] = [
    "Complete your profile with contact details",
    "Add people to your contacts directory",
    "Configure agent permissions and settings",
    "Enable phone agent to access your data",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentToggle {
    PhoneAccess,
    DataSharing,
    Notifications,
}

impl AgentToggle {
    pub const ALL: [AgentToggle; 3] = [
        AgentToggle::PhoneAccess,
        AgentToggle::DataSharing,
        AgentToggle::Notifications,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AgentToggle::PhoneAccess => "Phone Agent Access",
            AgentToggle::DataSharing => "Data Sharing",
            AgentToggle::Notifications => "Notifications",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AgentToggle::PhoneAccess => "Allow the agent to place and receive calls on your behalf",
            AgentToggle::DataSharing => "Share context data to improve agent responses",
            AgentToggle::Notifications => "Receive alerts for agent activity and call summaries",
        }
    }
}

/// Agent switches. Nothing reads them yet; they only hold the user's choice
/// for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSettings {
    pub phone_access: bool,
    pub data_sharing: bool,
    pub notifications: bool,
}

impl AgentSettings {
    pub fn get(&self, toggle: AgentToggle) -> bool {
        match toggle {
            AgentToggle::PhoneAccess => self.phone_access,
            AgentToggle::DataSharing => self.data_sharing,
            AgentToggle::Notifications => self.notifications,
        }
    }

    /// Flip `toggle` and return its new value.
    pub fn toggle(&mut self, toggle: AgentToggle) -> bool {
        let flag = match toggle {
            AgentToggle::PhoneAccess => &mut self.phone_access,
            AgentToggle::DataSharing => &mut self.data_sharing,
            AgentToggle::Notifications => &mut self.notifications,
        };
        *flag = !*flag;
        *flag
    }
}

impl From<AgentDefaults> for AgentSettings {
    fn from(defaults: AgentDefaults) -> Self {
        Self {
            phone_access: defaults.phone_access,
            data_sharing: defaults.data_sharing,
            notifications: defaults.notifications,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStatus {
    Complete,
    Unsaved,
    Incomplete,
}

impl ProfileStatus {
    /// Complete once a profile with a primary email has been saved.
    pub fn of(editor: &ProfileEditor) -> Self {
        match editor.last_saved() {
            Some(saved) if !saved.primary_email.trim().is_empty() => {
                if editor.is_dirty() {
                    ProfileStatus::Unsaved
                } else {
                    ProfileStatus::Complete
                }
            }
            _ => ProfileStatus::Incomplete,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ProfileStatus::Complete => "Complete",
            ProfileStatus::Unsaved => "Unsaved",
            ProfileStatus::Incomplete => "Incomplete",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ProfileStatus::Complete => "Your profile is complete",
            ProfileStatus::Unsaved => "You have unsaved profile changes",
            ProfileStatus::Incomplete => "Add a primary email and save",
        }
    }
}

/// Human-readable age of `then` relative to `now`.
pub fn relative_time(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let elapsed = (now - then).whole_seconds().max(0);
    match elapsed {
        0..=59 => "Just now".to_string(),
        60..=3_599 => format!("{} min ago", elapsed / 60),
        3_600..=86_399 => format!("{} h ago", elapsed / 3_600),
        _ => then
            .format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|_| "Long ago".to_string()),
    }
}
