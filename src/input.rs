use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::app::Screen;
use crate::config::KeyBindings;

/// Frames a press counts as held when the terminal never reports releases.
/// Long enough to bridge the auto-repeat delay of most terminals.
pub const HOLD_FRAMES: u32 = 30;

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Gameplay key went down, by key name ("W", "J", ...)
    KeyDown(String),
    KeyUp(String),
    /// Letter typed on the title screen
    MenuKey(String),
    StartGame,
    ProceedToBoss,
    Restart,
    Pause,
    Resume,
    Quit,
}

/// Manages input polling and translates raw key events into game actions
pub struct InputManager {
    keys: KeyBindings,
    /// Whether the terminal sends key release events
    reports_releases: bool,
    /// Frames left before a press without a release lapses
    lapsing: BTreeMap<String, u32>,
    actions: Vec<InputAction>,
}

impl InputManager {
    pub fn new(keys: KeyBindings, reports_releases: bool) -> Self {
        Self {
            keys,
            reports_releases,
            lapsing: BTreeMap::new(),
            actions: Vec::new(),
        }
    }

    /// Polls for all input events and queues the resulting actions.
    /// Should be called once per frame before [`InputManager::get_actions`].
    pub fn poll_events(&mut self, screen: Screen) -> color_eyre::Result<()> {
        self.expire_held();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, screen);
            }
        }

        Ok(())
    }

    /// Drains the actions queued since the last call.
    pub fn get_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent, screen: Screen) {
        match key_event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.handle_key_press(key_event, screen),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
        }
    }

    /// Translates a key code to the key name the game uses. Arrows and space
    /// alias to the movement and fire bindings.
    pub fn key_name(&self, code: KeyCode) -> Option<String> {
        match code {
            KeyCode::Char(' ') => Some(self.keys.fire.clone()),
            KeyCode::Char(c) if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase().to_string()),
            KeyCode::Up => Some(self.keys.up.clone()),
            KeyCode::Left => Some(self.keys.left.clone()),
            KeyCode::Down => Some(self.keys.down.clone()),
            KeyCode::Right => Some(self.keys.right.clone()),
            _ => None,
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, screen: Screen) {
        let code = key_event.code;
        if code == KeyCode::Esc
            || (code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.actions.push(InputAction::Quit);
            return;
        }

        let name = self.key_name(code);
        match screen {
            Screen::Menu => {
                if code == KeyCode::Enter {
                    self.actions.push(InputAction::StartGame);
                } else if let Some(name) = name {
                    self.actions.push(InputAction::MenuKey(name));
                }
            }
            Screen::Paused => match name.as_deref() {
                Some("P") => self.actions.push(InputAction::Resume),
                Some("Q") => self.actions.push(InputAction::Quit),
                _ => {}
            },
            Screen::Playing => match name {
                Some(name) if name == "P" => self.actions.push(InputAction::Pause),
                Some(name) if name == "Q" => self.actions.push(InputAction::Quit),
                Some(name) if name == "B" => self.actions.push(InputAction::ProceedToBoss),
                Some(name) if name == "R" => self.actions.push(InputAction::Restart),
                Some(name) => {
                    if !self.reports_releases {
                        self.lapsing.insert(name.clone(), HOLD_FRAMES);
                    }
                    self.actions.push(InputAction::KeyDown(name));
                }
                None => {}
            },
        }
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        if let Some(name) = self.key_name(code) {
            self.lapsing.remove(&name);
            self.actions.push(InputAction::KeyUp(name));
        }
    }

    /// Counts down presses that will never see a release event.
    fn expire_held(&mut self) {
        let mut expired = Vec::new();
        for (name, frames) in self.lapsing.iter_mut() {
            *frames = frames.saturating_sub(1);
            if *frames == 0 {
                expired.push(name.clone());
            }
        }
        for name in expired {
            self.lapsing.remove(&name);
            self.actions.push(InputAction::KeyUp(name));
        }
    }
}
