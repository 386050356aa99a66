//! Bindable actions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// All bindable actions in mdseek
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase")]
pub enum Action {
    // === Navigation ===
    /// Move to next heading in the outline, or scroll down in the content
    Next,
    /// Move to previous heading in the outline, or scroll up in the content
    Previous,
    First,
    Last,
    PageDown,
    PageUp,

    // === Outline ===
    /// Switch focus between outline and content
    ToggleFocus,
    /// Fold or unfold the selected section
    ToggleFold,
    ToggleOutline,
    /// Open or close every `<details>` block
    ToggleDetails,

    // === Find ===
    /// Open the find bar
    EnterDocSearch,
    /// Close the find bar, or leave the current mode
    ExitMode,
    NextMatch,
    PrevMatch,
    /// Delete the character before the cursor in the find bar
    SearchBackspace,
    /// Empty the find bar
    ClearSearch,

    // === View ===
    CycleTheme,
    ToggleHelp,
    HelpScrollDown,
    HelpScrollUp,

    // === Application ===
    Quit,
}

impl Action {
    /// Human-readable description for the help popup
    pub fn description(&self) -> &'static str {
        match self {
            Action::Next => "Next heading / scroll down",
            Action::Previous => "Previous heading / scroll up",
            Action::First => "Jump to top",
            Action::Last => "Jump to bottom",
            Action::PageDown => "Page down",
            Action::PageUp => "Page up",

            Action::ToggleFocus => "Switch focus (outline/content)",
            Action::ToggleFold => "Fold/unfold section",
            Action::ToggleOutline => "Toggle outline",
            Action::ToggleDetails => "Expand/collapse details blocks",

            Action::EnterDocSearch => "Find in document",
            Action::ExitMode => "Close find bar",
            Action::NextMatch => "Next match",
            Action::PrevMatch => "Previous match",
            Action::SearchBackspace => "Delete character",
            Action::ClearSearch => "Clear query",

            Action::CycleTheme => "Next theme",
            Action::ToggleHelp => "Toggle help",
            Action::HelpScrollDown => "Scroll help down",
            Action::HelpScrollUp => "Scroll help up",

            Action::Quit => "Quit",
        }
    }

    /// Group heading in the help popup
    pub fn category(&self) -> &'static str {
        match self {
            Action::Next
            | Action::Previous
            | Action::First
            | Action::Last
            | Action::PageDown
            | Action::PageUp => "Navigation",

            Action::ToggleFocus
            | Action::ToggleFold
            | Action::ToggleOutline
            | Action::ToggleDetails => "Outline",

            Action::EnterDocSearch
            | Action::ExitMode
            | Action::NextMatch
            | Action::PrevMatch
            | Action::SearchBackspace
            | Action::ClearSearch => "Find",

            Action::CycleTheme
            | Action::ToggleHelp
            | Action::HelpScrollDown
            | Action::HelpScrollUp => "View",

            Action::Quit => "Application",
        }
    }
}
