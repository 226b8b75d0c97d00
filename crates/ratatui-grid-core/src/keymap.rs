use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;
use crate::navigation::NavCommand;
use crate::navigation::NavInput;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyEvent>,
    pub help_key: String,
    pub help_desc: String,
}

impl Binding {
    pub fn new(
        help_key: impl Into<String>,
        help_desc: impl Into<String>,
        keys: Vec<KeyEvent>,
    ) -> Self {
        Self {
            keys,
            help_key: help_key.into(),
            help_desc: help_desc.into(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys.iter().any(|k| key_event_matches(k, event))
    }
}

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && modifiers_match(pattern.modifiers, event.modifiers)
}

fn modifiers_match(pattern: KeyModifiers, event: KeyModifiers) -> bool {
    pattern.shift == event.shift && pattern.ctrl == event.ctrl && pattern.alt == event.alt
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers::ctrl())
}

/// Maps keys to navigation commands.
///
/// Named keys accept any ctrl/shift combination and forward those modifiers in the
/// [`NavInput`]. Vim keys only match without modifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavBindings {
    pub vim_keys: bool,
}

impl Default for NavBindings {
    fn default() -> Self {
        Self { vim_keys: true }
    }
}

impl NavBindings {
    pub fn input_for(&self, key: &KeyEvent) -> Option<NavInput> {
        let mods = key.modifiers;
        if mods.alt {
            return None;
        }
        let command = match &key.code {
            KeyCode::Up => NavCommand::Up,
            KeyCode::Down => NavCommand::Down,
            KeyCode::Left => NavCommand::Left,
            KeyCode::Right => NavCommand::Right,
            KeyCode::Home => NavCommand::Home,
            KeyCode::End => NavCommand::End,
            KeyCode::PageUp => NavCommand::PageUp,
            KeyCode::PageDown => NavCommand::PageDown,
            KeyCode::Tab if mods.shift => NavCommand::ShiftTab,
            KeyCode::Tab => NavCommand::Tab,
            KeyCode::BackTab => NavCommand::ShiftTab,
            KeyCode::Enter => NavCommand::Enter,
            KeyCode::Esc => NavCommand::Escape,
            KeyCode::Char(' ') if !mods.ctrl => NavCommand::Space,
            KeyCode::Char(c) if self.vim_keys && !mods.ctrl && !mods.shift => match c {
                'h' => NavCommand::Left,
                'j' => NavCommand::Down,
                'k' => NavCommand::Up,
                'l' => NavCommand::Right,
                _ => return None,
            },
            _ => return None,
        };
        // Tab direction already encodes shift.
        let shift = mods.shift && !matches!(command, NavCommand::Tab | NavCommand::ShiftTab);
        Some(NavInput {
            command,
            ctrl: mods.ctrl,
            shift,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionCommand {
    Copy,
    SelectAll,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionBindings {
    pub copy: Binding,
    pub select_all: Binding,
}

impl Default for SelectionBindings {
    fn default() -> Self {
        Self {
            copy: Binding::new("y", "copy selection", vec![key_char('y'), key_ctrl('c')]),
            select_all: Binding::new("C-a", "select all", vec![key_ctrl('a')]),
        }
    }
}

impl SelectionBindings {
    pub fn command_for(&self, key: &KeyEvent) -> Option<SelectionCommand> {
        if self.copy.matches(key) {
            return Some(SelectionCommand::Copy);
        }
        if self.select_all.matches(key) {
            return Some(SelectionCommand::SelectAll);
        }
        None
    }

    pub fn help(&self) -> Vec<(&str, &str)> {
        [&self.copy, &self.select_all]
            .into_iter()
            .map(|b| (b.help_key.as_str(), b.help_desc.as_str()))
            .collect()
    }
}
