use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use maze_chase::{Command, Dir};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Steer(Dir),
    Command(Command),
}

/// Maps a key press to a game action. Releases are ignored; held keys
/// repeat as steering.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Command(Command::Quit));
    }
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => Action::Steer(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Action::Steer(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Action::Steer(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Action::Steer(Dir::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Action::Command(Command::Start),
        KeyCode::Esc => Action::Command(Command::ReturnToMenu),
        KeyCode::Char('m') => Action::Command(Command::ToggleMute),
        KeyCode::Char('q') => Action::Command(Command::Quit),
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn steering_keys() {
        assert_eq!(action_for(press(KeyCode::Up)), Some(Action::Steer(Dir::Up)));
        assert_eq!(action_for(press(KeyCode::Char('j'))), Some(Action::Steer(Dir::Down)));
        assert_eq!(action_for(press(KeyCode::Char('a'))), Some(Action::Steer(Dir::Left)));
        assert_eq!(action_for(press(KeyCode::Char('l'))), Some(Action::Steer(Dir::Right)));
    }

    #[test]
    fn command_keys() {
        assert_eq!(
            action_for(press(KeyCode::Enter)),
            Some(Action::Command(Command::Start))
        );
        assert_eq!(
            action_for(press(KeyCode::Esc)),
            Some(Action::Command(Command::ReturnToMenu))
        );
        assert_eq!(
            action_for(press(KeyCode::Char('m'))),
            Some(Action::Command(Command::ToggleMute))
        );
        assert_eq!(
            action_for(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Command(Command::Quit))
        );
        assert_eq!(action_for(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(action_for(release), None);
    }
}
