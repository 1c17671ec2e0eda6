use crate::difficulty::Difficulty;
use crate::game::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Steer(Direction),
    Start,
    TogglePause,
    Restart,
    SetDifficulty(Difficulty),
    NextDifficulty,
    PrevDifficulty,
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if (ev.modifiers, ev.code) == (KeyModifiers::CONTROL, KeyCode::Char('c')) {
            return Some(Command::Quit);
        }
        match ev.code {
            KeyCode::Enter => Some(Command::Start),
            KeyCode::Tab => Some(Command::NextDifficulty),
            KeyCode::BackTab => Some(Command::PrevDifficulty),
            KeyCode::Up => Some(Command::Steer(Direction::Up)),
            KeyCode::Down => Some(Command::Steer(Direction::Down)),
            KeyCode::Left => Some(Command::Steer(Direction::Left)),
            KeyCode::Right => Some(Command::Steer(Direction::Right)),
            KeyCode::Char(c) if normal_modifiers.contains(ev.modifiers) => match c {
                'w' | 'k' => Some(Command::Steer(Direction::Up)),
                's' | 'j' => Some(Command::Steer(Direction::Down)),
                'a' | 'h' => Some(Command::Steer(Direction::Left)),
                'd' | 'l' => Some(Command::Steer(Direction::Right)),
                'p' | ' ' => Some(Command::TogglePause),
                'r' | 'R' => Some(Command::Restart),
                '1' => Some(Command::SetDifficulty(Difficulty::Easy)),
                '2' => Some(Command::SetDifficulty(Difficulty::Medium)),
                '3' => Some(Command::SetDifficulty(Difficulty::Hard)),
                'q' => Some(Command::Quit),
                _ => None,
            },
            _ => None,
        }
    }
}
