//! Built-in keybindings, in keybinds-rs key string syntax.

use super::{Action, KeybindingMode, Keybindings};

pub fn default_keybindings() -> Keybindings {
    let mut kb = Keybindings::new();
    add_normal_mode(&mut kb);
    add_help_mode(&mut kb);
    add_doc_search_mode(&mut kb);
    kb
}

fn bind(kb: &mut Keybindings, mode: KeybindingMode, key: &str, action: Action) {
    if let Err(e) = kb.bind(mode, key, action) {
        tracing::error!(key, ?mode, "invalid built-in keybinding: {}", e);
    }
}

fn add_normal_mode(kb: &mut Keybindings) {
    use Action::*;
    use KeybindingMode::Normal;

    // Navigation
    bind(kb, Normal, "j", Next);
    bind(kb, Normal, "Down", Next);
    bind(kb, Normal, "k", Previous);
    bind(kb, Normal, "Up", Previous);
    bind(kb, Normal, "g g", First);
    bind(kb, Normal, "Home", First);
    bind(kb, Normal, "G", Last);
    bind(kb, Normal, "End", Last);
    bind(kb, Normal, "d", PageDown);
    bind(kb, Normal, "PageDown", PageDown);
    bind(kb, Normal, "u", PageUp);
    bind(kb, Normal, "PageUp", PageUp);

    // Outline
    bind(kb, Normal, "Tab", ToggleFocus);
    bind(kb, Normal, "Enter", ToggleFold);
    bind(kb, Normal, "Space", ToggleFold);
    bind(kb, Normal, "w", ToggleOutline);
    bind(kb, Normal, "z", ToggleDetails);

    // Find
    bind(kb, Normal, "/", EnterDocSearch);
    bind(kb, Normal, "Ctrl+f", EnterDocSearch);
    bind(kb, Normal, "Escape", ExitMode);

    // View
    bind(kb, Normal, "t", CycleTheme);
    bind(kb, Normal, "?", ToggleHelp);

    // Application
    bind(kb, Normal, "q", Quit);
    bind(kb, Normal, "Ctrl+c", Quit);
}

fn add_help_mode(kb: &mut Keybindings) {
    use Action::*;
    use KeybindingMode::Help;

    bind(kb, Help, "j", HelpScrollDown);
    bind(kb, Help, "Down", HelpScrollDown);
    bind(kb, Help, "k", HelpScrollUp);
    bind(kb, Help, "Up", HelpScrollUp);

    bind(kb, Help, "?", ToggleHelp);
    bind(kb, Help, "Escape", ToggleHelp);

    bind(kb, Help, "q", Quit);
    bind(kb, Help, "Ctrl+c", Quit);
}

/// Printable keys are not bound here; they go to the query.
fn add_doc_search_mode(kb: &mut Keybindings) {
    use Action::*;
    use KeybindingMode::DocSearch;

    bind(kb, DocSearch, "Escape", ExitMode);
    bind(kb, DocSearch, "Ctrl+f", EnterDocSearch);

    bind(kb, DocSearch, "Enter", NextMatch);
    bind(kb, DocSearch, "Down", NextMatch);
    bind(kb, DocSearch, "Ctrl+n", NextMatch);
    bind(kb, DocSearch, "Shift+Enter", PrevMatch);
    bind(kb, DocSearch, "Alt+Enter", PrevMatch);
    bind(kb, DocSearch, "Up", PrevMatch);
    bind(kb, DocSearch, "Ctrl+p", PrevMatch);

    bind(kb, DocSearch, "Backspace", SearchBackspace);
    bind(kb, DocSearch, "Ctrl+u", ClearSearch);

    bind(kb, DocSearch, "Ctrl+c", Quit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_default_normal_mode() {
        let mut kb = default_keybindings();
        let normal = KeybindingMode::Normal;

        assert_eq!(
            kb.dispatch(normal, key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(Action::Next)
        );
        assert_eq!(
            kb.dispatch(normal, key(KeyCode::Char('/'), KeyModifiers::NONE)),
            Some(Action::EnterDocSearch)
        );
        assert_eq!(
            kb.dispatch(normal, key(KeyCode::Char('f'), KeyModifiers::CONTROL)),
            Some(Action::EnterDocSearch)
        );
        assert_eq!(
            kb.dispatch(normal, key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_doc_search_mode() {
        let mut kb = default_keybindings();
        let mode = KeybindingMode::DocSearch;

        assert_eq!(
            kb.dispatch(mode, key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::ExitMode)
        );
        assert_eq!(
            kb.dispatch(mode, key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Action::NextMatch)
        );
        assert_eq!(
            kb.dispatch(mode, key(KeyCode::Enter, KeyModifiers::SHIFT)),
            Some(Action::PrevMatch)
        );
        assert_eq!(
            kb.dispatch(mode, key(KeyCode::Char('f'), KeyModifiers::CONTROL)),
            Some(Action::EnterDocSearch)
        );
        assert_eq!(
            kb.dispatch(mode, key(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(Action::SearchBackspace)
        );
        assert_eq!(
            kb.dispatch(mode, key(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(Action::ClearSearch)
        );
    }

    #[test]
    fn test_doc_search_leaves_letters_unbound() {
        let mut kb = default_keybindings();
        for c in ['q', 'j', 'n', '/', '?'] {
            assert_eq!(
                kb.dispatch(
                    KeybindingMode::DocSearch,
                    key(KeyCode::Char(c), KeyModifiers::NONE)
                ),
                None,
                "{c} should reach the query"
            );
        }
    }

    #[test]
    fn test_all_modes_have_bindings() {
        let kb = default_keybindings();
        for mode in [
            KeybindingMode::Normal,
            KeybindingMode::Help,
            KeybindingMode::DocSearch,
        ] {
            let binds = kb.get_mode_keybinds(mode);
            assert!(
                binds.is_some_and(|b| !b.as_slice().is_empty()),
                "Mode {:?} has no bindings",
                mode
            );
        }
    }
}
