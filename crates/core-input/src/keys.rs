use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key event into the shell's `KeyEvent`.
///
/// Releases and keys the shell has no use for map to `None`.
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let code = match event.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::BackTab => KeyCode::BackTab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        _ => return None,
    };
    Some(KeyEvent {
        code,
        mods: map_mods(event.modifiers),
    })
}

pub(crate) fn map_mods(m: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

/// True for the Ctrl-C chord, surfaced as `InputEvent::CtrlC`.
pub(crate) fn is_ctrl_c(event: &CKeyEvent) -> bool {
    matches!(event.code, CKeyCode::Char('c')) && event.modifiers.contains(CKeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState as CKeyEventState;

    fn key_event(code: CKeyCode, modifiers: CKeyModifiers, kind: CKeyEventKind) -> CKeyEvent {
        CKeyEvent {
            code,
            modifiers,
            kind,
            state: CKeyEventState::empty(),
        }
    }

    #[test]
    fn maps_basic_char() {
        let ev = key_event(
            CKeyCode::Char('a'),
            CKeyModifiers::NONE,
            CKeyEventKind::Press,
        );
        let key = map_key_event(&ev).expect("char should map");
        assert_eq!(key.code, KeyCode::Char('a'));
        assert!(key.mods.is_empty());
    }

    #[test]
    fn maps_back_tab_and_modifiers() {
        let ev = key_event(CKeyCode::BackTab, CKeyModifiers::SHIFT, CKeyEventKind::Press);
        let key = map_key_event(&ev).expect("backtab should map");
        assert_eq!(key.code, KeyCode::BackTab);
        assert!(key.mods.contains(KeyModifiers::SHIFT));
    }

    #[test]
    fn repeat_maps_release_does_not() {
        let repeat = key_event(
            CKeyCode::Char('j'),
            CKeyModifiers::NONE,
            CKeyEventKind::Repeat,
        );
        assert!(map_key_event(&repeat).is_some());
        let release = key_event(
            CKeyCode::Char('j'),
            CKeyModifiers::NONE,
            CKeyEventKind::Release,
        );
        assert!(map_key_event(&release).is_none());
    }

    #[test]
    fn unsupported_keys_return_none() {
        let ev = key_event(CKeyCode::F(5), CKeyModifiers::NONE, CKeyEventKind::Press);
        assert!(map_key_event(&ev).is_none());
    }

    #[test]
    fn detects_ctrl_c() {
        let ev = key_event(
            CKeyCode::Char('c'),
            CKeyModifiers::CONTROL,
            CKeyEventKind::Press,
        );
        assert!(is_ctrl_c(&ev));
        let plain = key_event(CKeyCode::Char('c'), CKeyModifiers::NONE, CKeyEventKind::Press);
        assert!(!is_ctrl_c(&plain));
    }
}
