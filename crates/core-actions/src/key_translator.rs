//! Key -> Action translation.
//!
//! Stateless: the meaning of a key depends only on the mounted screen.
//! Ctrl/Alt chords other than the ones listed here are ignored so they never
//! end up as field text.

use crate::{Action, EditKind, FocusMove};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_model::Screen;

pub fn translate_key(screen: &Screen, key: &KeyEvent) -> Option<Action> {
    if key.mods.contains(KeyModifiers::CTRL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }
    if key.mods.contains(KeyModifiers::ALT) {
        return None;
    }
    match screen {
        Screen::Login(_) => translate_login(key.code),
        Screen::Home => translate_home(key.code),
    }
}

/// Bracketed paste appends to the focused field on the login screen and is
/// ignored elsewhere.
pub fn translate_paste(screen: &Screen, text: &str) -> Option<Action> {
    match screen {
        Screen::Login(_) if !text.is_empty() => {
            Some(Action::Edit(EditKind::InsertText(text.to_string())))
        }
        _ => None,
    }
}

fn translate_login(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Char(c) => Action::Edit(EditKind::InsertChar(c)),
        KeyCode::Backspace => Action::Edit(EditKind::Backspace),
        KeyCode::Tab | KeyCode::Down => Action::Focus(FocusMove::Next),
        KeyCode::BackTab | KeyCode::Up => Action::Focus(FocusMove::Prev),
        KeyCode::Enter => Action::Submit,
        KeyCode::Esc => Action::Quit,
    };
    Some(action)
}

fn translate_home(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Enter | KeyCode::Char('l') => Some(Action::Logout),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_form::LoginForm;
    use core_model::{Focus, LoginScreen};

    fn login() -> Screen {
        Screen::Login(LoginScreen {
            form: LoginForm::default(),
            focus: Focus::Email,
        })
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    #[test]
    fn printable_keys_edit_on_login() {
        assert_eq!(
            translate_key(&login(), &key(KeyCode::Char('q'))),
            Some(Action::Edit(EditKind::InsertChar('q')))
        );
        // Shifted characters arrive already uppercased.
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(
            translate_key(&login(), &shifted),
            Some(Action::Edit(EditKind::InsertChar('A')))
        );
    }

    #[test]
    fn navigation_and_submit_on_login() {
        let s = login();
        assert_eq!(
            translate_key(&s, &key(KeyCode::Tab)),
            Some(Action::Focus(FocusMove::Next))
        );
        assert_eq!(
            translate_key(&s, &key(KeyCode::BackTab)),
            Some(Action::Focus(FocusMove::Prev))
        );
        assert_eq!(translate_key(&s, &key(KeyCode::Enter)), Some(Action::Submit));
        assert_eq!(translate_key(&s, &key(KeyCode::Esc)), Some(Action::Quit));
    }

    #[test]
    fn home_keys() {
        let s = Screen::Home;
        assert_eq!(translate_key(&s, &key(KeyCode::Enter)), Some(Action::Logout));
        assert_eq!(translate_key(&s, &key(KeyCode::Char('l'))), Some(Action::Logout));
        assert_eq!(translate_key(&s, &key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(translate_key(&s, &key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn paste_only_edits_on_login() {
        assert_eq!(
            translate_paste(&login(), "a@b"),
            Some(Action::Edit(EditKind::InsertText("a@b".into())))
        );
        assert_eq!(translate_paste(&login(), ""), None);
        assert_eq!(translate_paste(&Screen::Home, "a@b"), None);
    }

    #[test]
    fn control_chords_never_become_text() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CTRL);
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CTRL);
        let alt_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(translate_key(&login(), &ctrl_c), Some(Action::Quit));
        assert_eq!(translate_key(&login(), &ctrl_a), None);
        assert_eq!(translate_key(&login(), &alt_x), None);
        assert_eq!(translate_key(&Screen::Home, &ctrl_c), Some(Action::Quit));
    }
}
