//! Keyboard navigation over the suggestion panel.

use crate::{model::PlaceCandidate, suggest::SuggestionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    /// Anything else; text editing is handled by the input owner.
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Move the highlight; `None` means nothing highlighted.
    Navigate(Option<usize>),
    Commit(PlaceCandidate),
    CommitRawQuery,
    Dismiss,
    Ignore,
}

/// Decide what a key press means for the current panel. Never wraps around.
pub fn on_key(key: Key, state: &SuggestionState) -> Action {
    let items = state.items();
    if !state.is_visible() || items.is_empty() {
        return match key {
            Key::Enter => Action::CommitRawQuery,
            _ => Action::Ignore,
        };
    }

    let last = items.len() - 1;
    match key {
        Key::ArrowDown => Action::Navigate(Some(match state.highlighted() {
            None => 0,
            Some(i) => (i + 1).min(last),
        })),
        Key::ArrowUp => Action::Navigate(match state.highlighted() {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        }),
        Key::Enter => match state.highlighted_item() {
            Some(candidate) => Action::Commit(candidate.clone()),
            None => Action::CommitRawQuery,
        },
        Key::Escape => Action::Dismiss,
        Key::Other => Action::Ignore,
    }
}
