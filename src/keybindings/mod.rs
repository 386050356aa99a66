//! Customizable keybindings
//!
//! - [`Action`] - All bindable actions
//! - [`KeybindingMode`] - Modes with their own keybinding sets
//! - [`Keybindings`] - The complete keybinding configuration (backed by keybinds-rs)
//!
//! # Configuration
//!
//! Keybindings are configured in TOML, organized by mode:
//!
//! ```toml
//! [keybindings.Normal]
//! "Ctrl+s" = "EnterDocSearch"
//!
//! [keybindings.DocSearch]
//! "Tab" = "NextMatch"
//! "Shift+Tab" = "PrevMatch"
//! ```

mod action;
mod defaults;

pub use action::Action;

use crossterm::event::KeyEvent;
use keybinds::Keybinds;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Modes that have their own keybinding sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum KeybindingMode {
    /// Reading the document
    Normal,
    /// Help popup is shown
    Help,
    /// The find bar has focus
    DocSearch,
}

impl KeybindingMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            KeybindingMode::Normal => "Normal",
            KeybindingMode::Help => "Help",
            KeybindingMode::DocSearch => "Find",
        }
    }
}

/// Complete keybinding configuration
#[derive(Debug)]
pub struct Keybindings {
    bindings: HashMap<KeybindingMode, Keybinds<Action>>,
}

impl Default for Keybindings {
    fn default() -> Self {
        defaults::default_keybindings()
    }
}

impl Keybindings {
    /// Create empty keybindings
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Get the action for a key event in a specific mode
    pub fn dispatch(&mut self, mode: KeybindingMode, event: KeyEvent) -> Option<Action> {
        self.bindings
            .get_mut(&mode)
            .and_then(|kb| kb.dispatch(event).copied())
    }

    /// Reset any in-progress key sequences (call when switching modes)
    pub fn reset_sequences(&mut self) {
        for kb in self.bindings.values_mut() {
            kb.reset();
        }
    }

    pub fn get_mode_keybinds(&self, mode: KeybindingMode) -> Option<&Keybinds<Action>> {
        self.bindings.get(&mode)
    }

    /// Bind a key sequence to an action in a mode
    pub fn bind(
        &mut self,
        mode: KeybindingMode,
        key_sequence: &str,
        action: Action,
    ) -> Result<(), keybinds::Error> {
        self.bindings
            .entry(mode)
            .or_default()
            .bind(key_sequence, action)
    }

    /// All keys bound to an action in a mode
    pub fn keys_for_action(&self, mode: KeybindingMode, action: Action) -> Vec<String> {
        self.bindings
            .get(&mode)
            .map(|kb| {
                kb.as_slice()
                    .iter()
                    .filter(|bind| bind.action == action)
                    .map(|bind| format_key_sequence(&bind.seq))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Help entries for a mode, grouped by category
    pub fn help_entries(&self, mode: KeybindingMode) -> Vec<(Action, Vec<String>)> {
        let mut action_keys: HashMap<Action, Vec<String>> = HashMap::new();

        if let Some(kb) = self.bindings.get(&mode) {
            for bind in kb.as_slice() {
                action_keys
                    .entry(bind.action)
                    .or_default()
                    .push(format_key_sequence(&bind.seq));
            }
        }

        let mut entries: Vec<_> = action_keys.into_iter().collect();
        entries.sort_by(|a, b| {
            a.0.category()
                .cmp(b.0.category())
                .then(a.0.description().cmp(b.0.description()))
        });
        entries
    }

    /// Merge user bindings over these (user bindings take precedence).
    /// Invalid keys are skipped and returned as messages.
    pub fn merge(&mut self, other: &KeybindingsConfig) -> Vec<String> {
        let mut errors = Vec::new();
        for (mode, mode_bindings) in &other.0 {
            let kb = self.bindings.entry(*mode).or_default();
            for (key_str, action) in mode_bindings {
                if let Err(e) = kb.bind(key_str, *action) {
                    errors.push(format!("Invalid key '{}': {}", key_str, e));
                }
            }
        }
        errors
    }
}

fn format_key_sequence(seq: &keybinds::KeySeq) -> String {
    seq.as_slice()
        .iter()
        .map(format_key_input)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_key_input(input: &keybinds::KeyInput) -> String {
    let mut parts = Vec::new();

    let mods = input.mods();
    if mods.contains(keybinds::Mods::CTRL) {
        parts.push("C");
    }
    if mods.contains(keybinds::Mods::ALT) {
        parts.push("A");
    }
    if mods.contains(keybinds::Mods::SHIFT) {
        parts.push("S");
    }

    let key_str = format_key(input.key());
    parts.push(&key_str);

    if parts.len() == 1 {
        key_str
    } else {
        parts.join("-")
    }
}

fn format_key(key: keybinds::Key) -> String {
    use keybinds::Key;
    match key {
        Key::Char(' ') => "Spc".to_string(),
        Key::Char(c) => c.to_string(),
        Key::Enter => "Ret".to_string(),
        Key::Esc => "Esc".to_string(),
        Key::Tab => "Tab".to_string(),
        Key::Backspace => "BS".to_string(),
        Key::Up => "↑".to_string(),
        Key::Down => "↓".to_string(),
        Key::PageUp => "PgU".to_string(),
        Key::PageDown => "PgD".to_string(),
        Key::Home => "Home".to_string(),
        Key::End => "End".to_string(),
        _ => "?".to_string(),
    }
}

/// User keybindings as written in the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeybindingsConfig(pub HashMap<KeybindingMode, HashMap<String, Action>>);

impl KeybindingsConfig {
    /// Defaults with the user's bindings applied
    pub fn to_keybindings(&self) -> Keybindings {
        let mut keybindings = Keybindings::default();
        for error in keybindings.merge(self) {
            tracing::warn!("{}", error);
        }
        keybindings
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventKind, KeyEventState, KeyModifiers};

    fn make_key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_user_binding_overrides_default() {
        let mut user = HashMap::new();
        user.insert("Tab".to_string(), Action::NextMatch);
        let mut config = KeybindingsConfig::default();
        config.0.insert(KeybindingMode::DocSearch, user);

        let mut kb = config.to_keybindings();
        assert_eq!(
            kb.dispatch(
                KeybindingMode::DocSearch,
                make_key_event(KeyCode::Tab, KeyModifiers::NONE)
            ),
            Some(Action::NextMatch)
        );
        // Defaults survive the merge
        assert_eq!(
            kb.dispatch(
                KeybindingMode::DocSearch,
                make_key_event(KeyCode::Esc, KeyModifiers::NONE)
            ),
            Some(Action::ExitMode)
        );
    }

    #[test]
    fn test_invalid_user_key_is_reported() {
        let mut user = HashMap::new();
        user.insert("Ctrl+NoSuchKey".to_string(), Action::Quit);
        let mut config = KeybindingsConfig::default();
        config.0.insert(KeybindingMode::Normal, user);

        let mut kb = Keybindings::default();
        assert_eq!(kb.merge(&config).len(), 1);
    }

    #[test]
    fn test_keys_for_action() {
        let kb = Keybindings::default();
        let keys = kb.keys_for_action(KeybindingMode::Normal, Action::EnterDocSearch);
        assert!(keys.contains(&"/".to_string()));
        assert!(keys.contains(&"C-f".to_string()));
    }

    #[test]
    fn test_help_entries_grouped() {
        let kb = Keybindings::default();
        let entries = kb.help_entries(KeybindingMode::DocSearch);
        let categories: Vec<&str> = entries.iter().map(|(a, _)| a.category()).collect();
        let mut sorted = categories.clone();
        sorted.sort();
        assert_eq!(categories, sorted);
        assert!(entries.iter().any(|(a, _)| *a == Action::PrevMatch));
    }

    #[test]
    fn test_config_from_toml() {
        let config: KeybindingsConfig = toml::from_str(
            r#"
            [DocSearch]
            "Tab" = "NextMatch"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.0[&KeybindingMode::DocSearch].get("Tab"),
            Some(&Action::NextMatch)
        );
    }
}
