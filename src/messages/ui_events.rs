//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::state::ViewState;

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Session
    Connect,
    Disconnect,
    RefreshBalance,

    // Panel navigation
    NextPanel,
    PrevPanel,

    // Input editing (transfer form)
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Friends list
    NextFriend,
    PrevFriend,
    SelectFriend,

    // Add-friend popup
    OpenAddFriend,
    FriendChar(char),
    FriendBackspace,
    FriendNextField,
    SaveFriend,
    CancelAddFriend,

    // Transfer
    SubmitTransfer,
    DismissConfirmation,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Focusable panel on the connected screen
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Panel {
    #[default]
    Friends,
    Recipient,
    Amount,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Friends => Panel::Recipient,
            Panel::Recipient => Panel::Amount,
            Panel::Amount => Panel::Friends,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Friends => Panel::Amount,
            Panel::Recipient => Panel::Friends,
            Panel::Amount => Panel::Recipient,
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, Panel::Recipient | Panel::Amount)
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Field being edited in the add-friend popup
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum FriendField {
    #[default]
    Name,
    Address,
}

impl FriendField {
    pub fn toggle(&self) -> FriendField {
        match self {
            FriendField::Name => FriendField::Address,
            FriendField::Address => FriendField::Name,
        }
    }
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    view: ViewState,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match view {
        ViewState::Disconnected => match key.code {
            KeyCode::Char('c') | KeyCode::Enter => Some(UiEvent::Connect),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('q') => Some(UiEvent::Quit),
            _ => None,
        },
        ViewState::ConnectedWithPopup => match key.code {
            KeyCode::Esc => Some(UiEvent::CancelAddFriend),
            KeyCode::Enter => Some(UiEvent::SaveFriend),
            KeyCode::Tab | KeyCode::BackTab => Some(UiEvent::FriendNextField),
            KeyCode::Backspace => Some(UiEvent::FriendBackspace),
            KeyCode::Char(c) => Some(UiEvent::FriendChar(c)),
            _ => None,
        },
        ViewState::ConnectedWithConfirmation => match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('o') => Some(UiEvent::DismissConfirmation),
            KeyCode::Char('q') => Some(UiEvent::Quit),
            _ => None,
        },
        ViewState::ConnectedIdle => handle_idle_keys(key, active_panel, input_mode),
    }
}

fn handle_idle_keys(key: KeyEvent, active_panel: Panel, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Tab => Some(UiEvent::NextPanel),
            KeyCode::BackTab => Some(UiEvent::PrevPanel),
            KeyCode::Char('a') => Some(UiEvent::OpenAddFriend),
            KeyCode::Char('r') => Some(UiEvent::RefreshBalance),
            KeyCode::Char('d') => Some(UiEvent::Disconnect),
            KeyCode::Char('s') => Some(UiEvent::SubmitTransfer),
            KeyCode::Up if active_panel == Panel::Friends => Some(UiEvent::PrevFriend),
            KeyCode::Down if active_panel == Panel::Friends => Some(UiEvent::NextFriend),
            KeyCode::Enter if active_panel == Panel::Friends => Some(UiEvent::SelectFriend),
            KeyCode::Char('e') | KeyCode::Enter if active_panel.is_editable() => {
                Some(UiEvent::StartEditing)
            }
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            KeyCode::Enter if active_panel == Panel::Amount => Some(UiEvent::SubmitTransfer),
            KeyCode::Enter | KeyCode::Tab => Some(UiEvent::StopEditing),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_disconnected_connects() {
        let ev = key_to_ui_event(
            press(KeyCode::Char('c')),
            ViewState::Disconnected,
            Panel::Friends,
            InputMode::Normal,
            false,
        );
        assert_eq!(ev, Some(UiEvent::Connect));
    }

    #[test]
    fn test_popup_captures_typing() {
        let ev = key_to_ui_event(
            press(KeyCode::Char('q')),
            ViewState::ConnectedWithPopup,
            Panel::Friends,
            InputMode::Normal,
            false,
        );
        assert_eq!(ev, Some(UiEvent::FriendChar('q')));
    }

    #[test]
    fn test_enter_on_amount_submits_while_editing() {
        let ev = key_to_ui_event(
            press(KeyCode::Enter),
            ViewState::ConnectedIdle,
            Panel::Amount,
            InputMode::Editing,
            false,
        );
        assert_eq!(ev, Some(UiEvent::SubmitTransfer));
    }

    #[test]
    fn test_enter_on_friends_selects() {
        let ev = key_to_ui_event(
            press(KeyCode::Enter),
            ViewState::ConnectedIdle,
            Panel::Friends,
            InputMode::Normal,
            false,
        );
        assert_eq!(ev, Some(UiEvent::SelectFriend));
    }

    #[test]
    fn test_help_swallows_next_key() {
        let ev = key_to_ui_event(
            press(KeyCode::Char('s')),
            ViewState::ConnectedIdle,
            Panel::Friends,
            InputMode::Normal,
            true,
        );
        assert_eq!(ev, Some(UiEvent::CloseHelp));
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let ev = key_to_ui_event(key, ViewState::ConnectedWithPopup, Panel::Amount, InputMode::Editing, false);
        assert_eq!(ev, Some(UiEvent::Quit));
    }
}
