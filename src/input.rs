use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::snake::Direction;

/// What a key press means to the scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Turn(Direction),
    Confirm,
    Back,
    Quit,
}

/// Maps a key event, or returns `None` for keys nobody listens to.
pub fn map_key(key: &KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if is_ctrl_c(key) {
        return Some(Input::Quit);
    }

    let input = match key.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Input::Turn(Direction::Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Input::Turn(Direction::Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Input::Turn(Direction::Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Input::Turn(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Input::Confirm,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Input::Back,
        _ => return None,
    };

    Some(input)
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_turn() {
        assert_eq!(map_key(&press(KeyCode::Up)), Some(Input::Turn(Direction::Up)));
        assert_eq!(map_key(&press(KeyCode::Left)), Some(Input::Turn(Direction::Left)));
        assert_eq!(map_key(&press(KeyCode::Char('s'))), Some(Input::Turn(Direction::Down)));
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT)),
            Some(Input::Turn(Direction::Right))
        );
    }

    #[test]
    fn menu_keys() {
        assert_eq!(map_key(&press(KeyCode::Enter)), Some(Input::Confirm));
        assert_eq!(map_key(&press(KeyCode::Char(' '))), Some(Input::Confirm));
        assert_eq!(map_key(&press(KeyCode::Esc)), Some(Input::Back));
        assert_eq!(map_key(&press(KeyCode::Char('q'))), Some(Input::Back));
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ev), Some(Input::Quit));
        assert_eq!(map_key(&press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn only_presses_count() {
        let mut ev = press(KeyCode::Up);
        ev.kind = KeyEventKind::Release;
        assert_eq!(map_key(&ev), None);
    }
}
