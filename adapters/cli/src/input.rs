//! Keyboard mapping for raw-mode terminal input.
//!
//! Key presses are read one at a time with `crossterm`, so no key needs to be
//! followed by Enter.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use grid_tactics_core::{Direction, InputEvent, SkillSlot};

/// Help line shown beneath the grid.
pub(crate) const KEY_HELP: &str =
    "arrows or i/j/k/l move  a/b/c skill  space or enter confirm  q quit";

/// Translates a key press into a game input, if it has a binding.
pub(crate) fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(InputEvent::Quit);
    }
    match key.code {
        KeyCode::Up => Some(InputEvent::Move(Direction::Up)),
        KeyCode::Down => Some(InputEvent::Move(Direction::Down)),
        KeyCode::Left => Some(InputEvent::Move(Direction::Left)),
        KeyCode::Right => Some(InputEvent::Move(Direction::Right)),
        KeyCode::Enter => Some(InputEvent::Confirm),
        KeyCode::Esc => Some(InputEvent::Quit),
        KeyCode::Char(character) => map_char(character),
        _ => None,
    }
}

fn map_char(raw: char) -> Option<InputEvent> {
    let event = match raw.to_ascii_lowercase() {
        'i' => InputEvent::Move(Direction::Up),
        'k' => InputEvent::Move(Direction::Down),
        'j' => InputEvent::Move(Direction::Left),
        'l' => InputEvent::Move(Direction::Right),
        ' ' | '.' => InputEvent::Confirm,
        'a' => InputEvent::SelectSkill(SkillSlot::A),
        'b' => InputEvent::SelectSkill(SkillSlot::B),
        'c' => InputEvent::SelectSkill(SkillSlot::C),
        'q' => InputEvent::Quit,
        _ => return None,
    };
    Some(event)
}

/// Blocking stream of game inputs read from the terminal.
///
/// Events without a binding, such as resizes or unbound keys, are skipped.
#[derive(Debug, Default)]
pub(crate) struct TerminalKeys;

impl Iterator for TerminalKeys {
    type Item = Result<InputEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match event::read().context("failed to read terminal event") {
                Ok(Event::Key(key)) => {
                    if let Some(input) = map_key(key) {
                        return Some(Ok(input));
                    }
                }
                Ok(_) => {}
                Err(error) => return Some(Err(error)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_letters_move_the_cursor() {
        assert_eq!(map_key(key(KeyCode::Left)), Some(InputEvent::Move(Direction::Left)));
        assert_eq!(map_key(key(KeyCode::Down)), Some(InputEvent::Move(Direction::Down)));
        assert_eq!(
            map_key(key(KeyCode::Char('I'))),
            Some(InputEvent::Move(Direction::Up))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('l'))),
            Some(InputEvent::Move(Direction::Right))
        );
    }

    #[test]
    fn space_and_enter_confirm() {
        assert_eq!(map_key(key(KeyCode::Enter)), Some(InputEvent::Confirm));
        assert_eq!(map_key(key(KeyCode::Char(' '))), Some(InputEvent::Confirm));
    }

    #[test]
    fn skills_and_quit_are_bound() {
        assert_eq!(
            map_key(key(KeyCode::Char('b'))),
            Some(InputEvent::SelectSkill(SkillSlot::B))
        );
        assert_eq!(map_key(key(KeyCode::Char('q'))), Some(InputEvent::Quit));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(InputEvent::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputEvent::Quit)
        );
    }

    #[test]
    fn releases_and_unbound_keys_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(release), None);
        assert_eq!(map_key(key(KeyCode::Char('x'))), None);
        assert_eq!(map_key(key(KeyCode::Tab)), None);
    }
}
