/// Dashboard sections listed in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Overview,
    Profile,
    Contacts,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Profile, Tab::Contacts];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Profile => "My Profile",
            Tab::Contacts => "Contacts",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Tab::Overview => "Dashboard overview",
            Tab::Profile => "Your contact information",
            Tab::Contacts => "Manage contacts directory",
        }
    }

    pub fn digit(self) -> char {
        match self {
            Tab::Overview => '1',
            Tab::Profile => '2',
            Tab::Contacts => '3',
        }
    }

    pub fn from_digit(digit: char) -> Option<Self> {
        Tab::ALL.into_iter().find(|tab| tab.digit() == digit)
    }

    /// Next tab, wrapping around
    pub fn next(self) -> Self {
        match self {
            Tab::Overview => Tab::Profile,
            Tab::Profile => Tab::Contacts,
            Tab::Contacts => Tab::Overview,
        }
    }

    /// Previous tab, wrapping around
    pub fn prev(self) -> Self {
        match self {
            Tab::Overview => Tab::Contacts,
            Tab::Profile => Tab::Overview,
            Tab::Contacts => Tab::Profile,
        }
    }
}
