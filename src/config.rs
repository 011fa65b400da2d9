use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::BaseDirs;
use serde::de::Deserializer;
use serde::Deserialize;

use crate::entries::EntryPolicy;
use crate::storage::{self, DEFAULT_SLOT_KEY};

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_NAME: &str = "namo";

#[derive(Debug, Clone)]
pub struct Config {
    /// Where the configuration was (or would have been) read from
    pub config_path: PathBuf,
    pub storage_path: PathBuf,
    pub slot_key: String,
    pub profile: ProfileConfig,
    pub agent: AgentDefaults,
    pub keys: Keys,
    pub ui: UiConfig,
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn defaults(config_path: PathBuf) -> Result<Self> {
        ConfigFile::default().into_config(config_path)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileConfig {
    /// Accept duplicate additional emails / phone numbers
    pub allow_duplicate_entries: bool,
}

impl ProfileConfig {
    pub fn entry_policy(&self) -> EntryPolicy {
        if self.allow_duplicate_entries {
            EntryPolicy::AllowDuplicates
        } else {
            EntryPolicy::Unique
        }
    }
}

/// Initial state of the agent toggles on the overview panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentDefaults {
    pub phone_access: bool,
    pub data_sharing: bool,
    pub notifications: bool,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            phone_access: false,
            data_sharing: false,
            notifications: true,
        }
    }
}

/// Expand ~ to home directory in paths
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = home::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub colors: UiColors,
}

#[derive(Debug, Clone)]
pub struct UiColors {
    pub border: RgbColor,
    pub selection_bg: RgbColor,
    pub selection_fg: RgbColor,
    pub accent: RgbColor,
    pub muted: RgbColor,
    pub status_fg: RgbColor,
    pub status_bg: RgbColor,
}

#[derive(Debug, Clone, Copy)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

// =============================================================================
// Key Bindings - Context-aware with multiple bindings per action
// =============================================================================

/// All key bindings organized by context
#[derive(Debug, Clone, Default)]
pub struct Keys {
    /// Keys that work outside text input
    pub global: GlobalKeys,
    /// Keys for moving through rows of the active panel
    pub list: ListKeys,
    /// Keys for the add/edit contact form
    pub form: FormKeys,
    /// Keys for inline editing
    pub editor: EditorKeys,
    /// Keys for notification popups
    pub modal: ModalKeys,
}

#[derive(Debug, Clone)]
pub struct GlobalKeys {
    pub quit: Vec<String>,
    pub help: Vec<String>,
    pub tab_next: Vec<String>,
    pub tab_prev: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ListKeys {
    pub next: Vec<String>,
    pub prev: Vec<String>,
    pub edit: Vec<String>,
    pub add: Vec<String>,
    pub delete: Vec<String>,
    pub toggle: Vec<String>,
    pub save: Vec<String>,
    pub revert: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FormKeys {
    pub next_field: Vec<String>,
    pub prev_field: Vec<String>,
    pub submit: Vec<String>,
    pub cancel: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EditorKeys {
    pub cancel: Vec<String>,
    pub confirm: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ModalKeys {
    pub dismiss: Vec<String>,
}

// =============================================================================
// Default implementations
// =============================================================================

impl Default for GlobalKeys {
    fn default() -> Self {
        Self {
            quit: vec!["q".into()],
            help: vec!["F1".into(), "?".into()],
            tab_next: vec!["l".into(), "Right".into()],
            tab_prev: vec!["h".into(), "Left".into()],
        }
    }
}

impl Default for ListKeys {
    fn default() -> Self {
        Self {
            next: vec!["j".into(), "Down".into()],
            prev: vec!["k".into(), "Up".into()],
            edit: vec!["e".into(), "Enter".into()],
            add: vec!["a".into()],
            delete: vec!["x".into()],
            toggle: vec!["Space".into()],
            save: vec!["s".into()],
            revert: vec!["u".into()],
        }
    }
}

impl Default for FormKeys {
    fn default() -> Self {
        Self {
            next_field: vec!["Tab".into(), "Down".into()],
            prev_field: vec!["Backtab".into(), "Up".into()],
            submit: vec!["Enter".into()],
            cancel: vec!["Escape".into()],
        }
    }
}

impl Default for EditorKeys {
    fn default() -> Self {
        Self {
            cancel: vec!["Escape".into()],
            confirm: vec!["Enter".into()],
        }
    }
}

impl Default for ModalKeys {
    fn default() -> Self {
        Self {
            dismiss: vec!["Enter".into(), "Escape".into(), "q".into()],
        }
    }
}

// =============================================================================
// Serde deserialization types (support both single string and array)
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum KeyBinding {
    Single(String),
    Multiple(Vec<String>),
}

impl KeyBinding {
    fn into_vec(self) -> Vec<String> {
        match self {
            KeyBinding::Single(s) => vec![s],
            KeyBinding::Multiple(v) => v,
        }
    }
}

impl Default for KeyBinding {
    fn default() -> Self {
        KeyBinding::Multiple(vec![])
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct KeysFile {
    global: GlobalKeysFile,
    list: ListKeysFile,
    form: FormKeysFile,
    editor: EditorKeysFile,
    modal: ModalKeysFile,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct GlobalKeysFile {
    quit: KeyBinding,
    help: KeyBinding,
    tab_next: KeyBinding,
    tab_prev: KeyBinding,
}

impl Default for GlobalKeysFile {
    fn default() -> Self {
        let defaults = GlobalKeys::default();
        Self {
            quit: KeyBinding::Multiple(defaults.quit),
            help: KeyBinding::Multiple(defaults.help),
            tab_next: KeyBinding::Multiple(defaults.tab_next),
            tab_prev: KeyBinding::Multiple(defaults.tab_prev),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ListKeysFile {
    next: KeyBinding,
    prev: KeyBinding,
    edit: KeyBinding,
    add: KeyBinding,
    delete: KeyBinding,
    toggle: KeyBinding,
    save: KeyBinding,
    revert: KeyBinding,
}

impl Default for ListKeysFile {
    fn default() -> Self {
        let defaults = ListKeys::default();
        Self {
            next: KeyBinding::Multiple(defaults.next),
            prev: KeyBinding::Multiple(defaults.prev),
            edit: KeyBinding::Multiple(defaults.edit),
            add: KeyBinding::Multiple(defaults.add),
            delete: KeyBinding::Multiple(defaults.delete),
            toggle: KeyBinding::Multiple(defaults.toggle),
            save: KeyBinding::Multiple(defaults.save),
            revert: KeyBinding::Multiple(defaults.revert),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FormKeysFile {
    next_field: KeyBinding,
    prev_field: KeyBinding,
    submit: KeyBinding,
    cancel: KeyBinding,
}

impl Default for FormKeysFile {
    fn default() -> Self {
        let defaults = FormKeys::default();
        Self {
            next_field: KeyBinding::Multiple(defaults.next_field),
            prev_field: KeyBinding::Multiple(defaults.prev_field),
            submit: KeyBinding::Multiple(defaults.submit),
            cancel: KeyBinding::Multiple(defaults.cancel),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct EditorKeysFile {
    cancel: KeyBinding,
    confirm: KeyBinding,
}

impl Default for EditorKeysFile {
    fn default() -> Self {
        let defaults = EditorKeys::default();
        Self {
            cancel: KeyBinding::Multiple(defaults.cancel),
            confirm: KeyBinding::Multiple(defaults.confirm),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ModalKeysFile {
    dismiss: KeyBinding,
}

impl Default for ModalKeysFile {
    fn default() -> Self {
        let defaults = ModalKeys::default();
        Self {
            dismiss: KeyBinding::Multiple(defaults.dismiss),
        }
    }
}

// =============================================================================
// Conversion from file types to runtime types
// =============================================================================

impl From<KeysFile> for Keys {
    fn from(file: KeysFile) -> Self {
        Self {
            global: GlobalKeys {
                quit: file.global.quit.into_vec(),
                help: file.global.help.into_vec(),
                tab_next: file.global.tab_next.into_vec(),
                tab_prev: file.global.tab_prev.into_vec(),
            },
            list: ListKeys {
                next: file.list.next.into_vec(),
                prev: file.list.prev.into_vec(),
                edit: file.list.edit.into_vec(),
                add: file.list.add.into_vec(),
                delete: file.list.delete.into_vec(),
                toggle: file.list.toggle.into_vec(),
                save: file.list.save.into_vec(),
                revert: file.list.revert.into_vec(),
            },
            form: FormKeys {
                next_field: file.form.next_field.into_vec(),
                prev_field: file.form.prev_field.into_vec(),
                submit: file.form.submit.into_vec(),
                cancel: file.form.cancel.into_vec(),
            },
            editor: EditorKeys {
                cancel: file.editor.cancel.into_vec(),
                confirm: file.editor.confirm.into_vec(),
            },
            modal: ModalKeys {
                dismiss: file.modal.dismiss.into_vec(),
            },
        }
    }
}

// =============================================================================
// Key binding validation
// =============================================================================

/// Normalize a key binding string to a canonical form for collision detection.
/// Single characters preserve case (since 'M' means Shift+m, different from 'm').
/// Multi-character key names are case-insensitive (Enter, ENTER, enter are the same).
fn normalize_binding(binding: &str) -> String {
    let trimmed = binding.trim();
    if trimmed.chars().count() == 1 {
        trimmed.to_string()
    } else {
        match trimmed.to_ascii_lowercase().as_str() {
            "esc" => "escape".to_string(),
            "shift+tab" => "backtab".to_string(),
            "page_up" => "pageup".to_string(),
            "page_down" => "pagedown".to_string(),
            other => other.to_string(),
        }
    }
}

/// Check for collisions within a single context
fn check_context_collisions(bindings: &[(&str, &[String])], context_name: &str) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();

    for (action_name, keys) in bindings {
        for key in *keys {
            let normalized = normalize_binding(key);
            if normalized.is_empty() {
                continue;
            }
            if let Some(existing_action) = seen.get(&normalized) {
                bail!(
                    "key binding collision in [keys.{}]: '{}' is bound to both '{}' and '{}'",
                    context_name,
                    key,
                    existing_action,
                    action_name
                );
            }
            seen.insert(normalized, action_name);
        }
    }

    Ok(())
}

/// Validate all key bindings for collisions within each context.
///
/// Global keys are checked together with the list keys since both are live
/// while a panel has focus.
fn validate_key_bindings(keys: &Keys) -> Result<()> {
    check_context_collisions(
        &[
            ("quit", &keys.global.quit),
            ("help", &keys.global.help),
            ("tab_next", &keys.global.tab_next),
            ("tab_prev", &keys.global.tab_prev),
            ("next", &keys.list.next),
            ("prev", &keys.list.prev),
            ("edit", &keys.list.edit),
            ("add", &keys.list.add),
            ("delete", &keys.list.delete),
            ("toggle", &keys.list.toggle),
            ("save", &keys.list.save),
            ("revert", &keys.list.revert),
        ],
        "list",
    )?;

    check_context_collisions(
        &[
            ("next_field", &keys.form.next_field),
            ("prev_field", &keys.form.prev_field),
            ("submit", &keys.form.submit),
            ("cancel", &keys.form.cancel),
        ],
        "form",
    )?;

    check_context_collisions(
        &[
            ("cancel", &keys.editor.cancel),
            ("confirm", &keys.editor.confirm),
        ],
        "editor",
    )?;

    Ok(())
}

// =============================================================================
// Config file structure
// =============================================================================

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    storage: Option<PathBuf>,
    slot_key: Option<String>,
    profile: ProfileFile,
    agent: AgentFile,
    keys: KeysFile,
    ui: UiFile,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ProfileFile {
    allow_duplicate_entries: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct AgentFile {
    phone_access: bool,
    data_sharing: bool,
    notifications: bool,
}

impl Default for AgentFile {
    fn default() -> Self {
        let defaults = AgentDefaults::default();
        Self {
            phone_access: defaults.phone_access,
            data_sharing: defaults.data_sharing,
            notifications: defaults.notifications,
        }
    }
}

impl ConfigFile {
    fn into_config(self, config_path: PathBuf) -> Result<Config> {
        let storage_path = match self.storage {
            Some(path) => expand_tilde(&path),
            None => storage::default_path()?,
        };

        let slot_key = self
            .slot_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .unwrap_or(DEFAULT_SLOT_KEY)
            .to_string();

        let keys: Keys = self.keys.into();
        validate_key_bindings(&keys)?;

        Ok(Config {
            config_path,
            storage_path,
            slot_key,
            profile: ProfileConfig {
                allow_duplicate_entries: self.profile.allow_duplicate_entries,
            },
            agent: AgentDefaults {
                phone_access: self.agent.phone_access,
                data_sharing: self.agent.data_sharing,
                notifications: self.agent.notifications,
            },
            keys,
            ui: self.ui.into(),
        })
    }
}

fn config_root() -> Result<PathBuf> {
    let base = BaseDirs::new().context("unable to determine base directories")?;
    let dir = base.config_dir().join(APP_NAME);
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_root()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from `path`, or from the default location.
/// A missing file yields the built-in defaults.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => expand_tilde(path),
        None => config_path()?,
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Config::defaults(path);
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read configuration file at {}", path.display()))?;
    parse(&raw, path)
}

fn parse(raw: &str, path: PathBuf) -> Result<Config> {
    let value: toml::Value = toml::from_str(raw)
        .with_context(|| format!("failed to parse {} as TOML", path.display()))?;

    warn_unknown_keys(&value);

    let cfg_file: ConfigFile = value
        .try_into()
        .with_context(|| format!("failed to deserialize config from {}", path.display()))?;

    cfg_file.into_config(path)
}

// =============================================================================
// Unknown key warnings
// =============================================================================

fn warn_unknown_keys(value: &toml::Value) {
    let Some(table) = value.as_table() else {
        return;
    };

    let known = HashSet::from(["storage", "slot_key", "profile", "agent", "keys", "ui"]);

    for key in table.keys() {
        if !known.contains(key.as_str()) {
            eprintln!("warning: unknown configuration key `{}`", key);
        }
    }

    if let Some(profile_val) = table.get("profile") {
        warn_unknown_in_section(profile_val, "profile", &["allow_duplicate_entries"]);
    }

    if let Some(agent_val) = table.get("agent") {
        warn_unknown_in_section(
            agent_val,
            "agent",
            &["phone_access", "data_sharing", "notifications"],
        );
    }

    if let Some(keys_val) = table.get("keys") {
        warn_unknown_keys_section(keys_val);
    }

    if let Some(ui_val) = table.get("ui") {
        warn_unknown_in_section(ui_val, "ui", &["colors"]);
        if let Some(colors_val) = ui_val.get("colors") {
            warn_unknown_in_section(
                colors_val,
                "ui.colors",
                &[
                    "border",
                    "selection_bg",
                    "selection_fg",
                    "accent",
                    "muted",
                    "status_fg",
                    "status_bg",
                ],
            );
        }
    }
}

fn warn_unknown_keys_section(value: &toml::Value) {
    let Some(table) = value.as_table() else {
        return;
    };

    for (context, entries) in table {
        let known: &[&str] = match context.as_str() {
            "global" => &["quit", "help", "tab_next", "tab_prev"],
            "list" => &[
                "next", "prev", "edit", "add", "delete", "toggle", "save", "revert",
            ],
            "form" => &["next_field", "prev_field", "submit", "cancel"],
            "editor" => &["cancel", "confirm"],
            "modal" => &["dismiss"],
            _ => {
                eprintln!("warning: unknown keys context `{}`", context);
                continue;
            }
        };
        warn_unknown_in_section(entries, &format!("keys.{}", context), known);
    }
}

fn warn_unknown_in_section(value: &toml::Value, section: &str, known: &[&str]) {
    let Some(table) = value.as_table() else {
        return;
    };

    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            eprintln!("warning: unknown {} entry `{}`", section, key);
        }
    }
}

// =============================================================================
// UI config types
// =============================================================================

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct UiFile {
    colors: UiColorsFile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct UiColorsFile {
    border: RgbColor,
    selection_bg: RgbColor,
    selection_fg: RgbColor,
    accent: RgbColor,
    muted: RgbColor,
    status_fg: RgbColor,
    status_bg: RgbColor,
}

impl Default for UiColorsFile {
    fn default() -> Self {
        Self {
            border: RgbColor::new(96, 165, 250),
            selection_bg: RgbColor::new(96, 165, 250),
            selection_fg: RgbColor::new(0, 0, 0),
            accent: RgbColor::new(96, 165, 250),
            muted: RgbColor::new(140, 140, 140),
            status_fg: RgbColor::new(96, 165, 250),
            status_bg: RgbColor::new(0, 0, 0),
        }
    }
}

impl From<UiFile> for UiConfig {
    fn from(file: UiFile) -> Self {
        Self {
            colors: UiColors {
                border: file.colors.border,
                selection_bg: file.colors.selection_bg,
                selection_fg: file.colors.selection_fg,
                accent: file.colors.accent,
                muted: file.colors.muted,
                status_fg: file.colors.status_fg,
                status_bg: file.colors.status_bg,
            },
        }
    }
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl<'de> serde::Deserialize<'de> for RgbColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            Array([u8; 3]),
            Map { r: u8, g: u8, b: u8 },
        }

        let helper = Helper::deserialize(deserializer)?;
        let (r, g, b) = match helper {
            Helper::Array(values) => (values[0], values[1], values[2]),
            Helper::Map { r, g, b } => (r, g, b),
        };
        Ok(RgbColor { r, g, b })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(raw: &str) -> Result<Config> {
        parse(raw, PathBuf::from("/tmp/namo-test/config.toml"))
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_str("").unwrap();
        assert_eq!(config.slot_key, DEFAULT_SLOT_KEY);
        assert!(!config.profile.allow_duplicate_entries);
        assert_eq!(config.profile.entry_policy(), EntryPolicy::Unique);
        assert_eq!(config.agent, AgentDefaults::default());
        assert_eq!(config.keys.global.quit, vec!["q".to_string()]);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = parse_str(
            r#"
            storage = "/tmp/namo-test/store.db"
            slot_key = "  my-profile "

            [profile]
            allow_duplicate_entries = true

            [agent]
            phone_access = true

            [keys.global]
            quit = "Q"

            [ui.colors]
            accent = { r = 1, g = 2, b = 3 }
            muted = [4, 5, 6]
            "#,
        )
        .unwrap();

        assert_eq!(config.storage_path, PathBuf::from("/tmp/namo-test/store.db"));
        assert_eq!(config.slot_key, "my-profile");
        assert_eq!(config.profile.entry_policy(), EntryPolicy::AllowDuplicates);
        assert!(config.agent.phone_access);
        assert!(config.agent.notifications);
        assert_eq!(config.keys.global.quit, vec!["Q".to_string()]);
        assert_eq!(config.keys.global.help, vec!["F1".to_string(), "?".to_string()]);
        let accent = config.ui.colors.accent;
        assert_eq!((accent.r, accent.g, accent.b), (1, 2, 3));
        let muted = config.ui.colors.muted;
        assert_eq!((muted.r, muted.g, muted.b), (4, 5, 6));
    }

    #[test]
    fn test_blank_slot_key_falls_back_to_default() {
        let config = parse_str(r#"slot_key = "   ""#).unwrap();
        assert_eq!(config.slot_key, DEFAULT_SLOT_KEY);
    }

    #[test]
    fn test_key_collision_is_rejected() {
        let err = parse_str(
            r#"
            [keys.list]
            save = "q"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("collision"), "{err}");
    }

    #[test]
    fn test_key_collision_is_case_insensitive_for_names() {
        let err = parse_str(
            r#"
            [keys.editor]
            cancel = "ESC"
            confirm = "escape"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("[keys.editor]"), "{err}");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(parse_str("storage = ").is_err());
    }

    #[test]
    fn test_normalize_binding() {
        assert_eq!(normalize_binding("M"), "M");
        assert_eq!(normalize_binding("m"), "m");
        assert_eq!(normalize_binding("Enter"), "enter");
        assert_eq!(normalize_binding("Esc"), "escape");
        assert_eq!(normalize_binding("Shift+Tab"), "backtab");
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        let path = Path::new("/var/lib/namo.db");
        assert_eq!(expand_tilde(path), path.to_path_buf());
    }
}
