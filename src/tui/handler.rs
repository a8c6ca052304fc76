use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::InputMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    NextPage,
    PrevPage,
    GoToPage(usize),
    NextCategory,
    PrevCategory,
    ToggleLanguage,
    Refresh,
    OpenInBrowser,
    ShowHelp,
    HideHelp,
    // Search input actions
    SearchStart,
    SearchChar(char),
    SearchBackspace,
    SearchSubmit,
    SearchCancel,
    // Date range popover actions
    CalendarToggle,
    CalendarClose,
    CalendarMove(i64),
    CalendarSelect,
    CalendarPrevMonth,
    CalendarNextMonth,
    CalendarPrevYear,
    CalendarNextYear,
    CalendarToday,
    CalendarConfirm,
    CalendarClear,
}

pub fn handle_key_event(key: KeyEvent, mode: InputMode) -> Option<AppAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(AppAction::Quit);
    }

    match mode {
        // Any key closes help
        InputMode::Help => Some(AppAction::HideHelp),

        InputMode::Search => match key.code {
            KeyCode::Enter => Some(AppAction::SearchSubmit),
            KeyCode::Esc => Some(AppAction::SearchCancel),
            KeyCode::Backspace => Some(AppAction::SearchBackspace),
            KeyCode::Char(c) => Some(AppAction::SearchChar(c)),
            _ => None,
        },

        InputMode::Calendar => match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(AppAction::CalendarMove(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some(AppAction::CalendarMove(1)),
            KeyCode::Up | KeyCode::Char('k') => Some(AppAction::CalendarMove(-7)),
            KeyCode::Down | KeyCode::Char('j') => Some(AppAction::CalendarMove(7)),
            KeyCode::Enter | KeyCode::Char(' ') => Some(AppAction::CalendarSelect),
            KeyCode::Char('[') => Some(AppAction::CalendarPrevMonth),
            KeyCode::Char(']') => Some(AppAction::CalendarNextMonth),
            KeyCode::Char('{') => Some(AppAction::CalendarPrevYear),
            KeyCode::Char('}') => Some(AppAction::CalendarNextYear),
            KeyCode::Char('t') => Some(AppAction::CalendarToday),
            KeyCode::Char('c') => Some(AppAction::CalendarConfirm),
            KeyCode::Char('x') => Some(AppAction::CalendarClear),
            KeyCode::Esc | KeyCode::Char('d') => Some(AppAction::CalendarClose),
            _ => None,
        },

        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(AppAction::Quit),

            KeyCode::Char('n') | KeyCode::Right => Some(AppAction::NextPage),
            KeyCode::Char('p') | KeyCode::Left => Some(AppAction::PrevPage),
            KeyCode::Char(c @ '1'..='9') => c
                .to_digit(10)
                .map(|page| AppAction::GoToPage(page as usize)),

            KeyCode::Char('c') => Some(AppAction::NextCategory),
            KeyCode::Char('C') => Some(AppAction::PrevCategory),
            KeyCode::Char('l') => Some(AppAction::ToggleLanguage),
            KeyCode::Char('d') => Some(AppAction::CalendarToggle),
            KeyCode::Char('/') => Some(AppAction::SearchStart),

            KeyCode::Char('r') => Some(AppAction::Refresh),
            KeyCode::Char('o') => Some(AppAction::OpenInBrowser),
            KeyCode::Char('?') => Some(AppAction::ShowHelp),

            _ => None,
        },
    }
}
