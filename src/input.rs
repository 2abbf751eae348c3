use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

use crate::simulation::GameState;

/// How long a press counts as held when the terminal never reports releases
const KEY_HOLD: Duration = Duration::from_millis(250);

/// Input sampled once per frame and handed to the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl InputState {
    /// -1.0, 0.0 or 1.0 depending on the held direction keys.
    pub fn horizontal(&self) -> f64 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// One-shot actions handled by the app rather than the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Restart,
    Quit,
}

/// Time of the last press for each key that can be held down
#[derive(Debug, Default)]
struct KeyState {
    left: Option<Instant>,
    right: Option<Instant>,
    fire: Option<Instant>,
}

/// Manages input polling and translates raw key events into game input
pub struct InputManager {
    key_state: KeyState,
    oneshot_actions: Vec<InputAction>,
    /// Whether the terminal sends key release events
    reports_release: bool,
}

impl InputManager {
    pub fn new(reports_release: bool) -> Self {
        Self {
            key_state: KeyState::default(),
            oneshot_actions: Vec::new(),
            reports_release,
        }
    }

    /// Polls for all pending events without blocking.
    /// Should be called once per frame before sampling.
    pub fn poll_events(&mut self, game_state: GameState) -> color_eyre::Result<()> {
        self.oneshot_actions.clear();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, game_state, Instant::now());
            }
        }

        Ok(())
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent, game_state: GameState, now: Instant) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, game_state, now),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
            _ => {}
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, game_state: GameState, now: Instant) {
        // Quit works in any state
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        match game_state {
            GameState::GameOver => {
                // Any other key restarts
                self.oneshot_actions.push(InputAction::Restart);
            }
            GameState::Running => match key_event.code {
                KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                    self.key_state.left = Some(now);
                    self.key_state.right = None;
                }
                KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                    self.key_state.right = Some(now);
                    self.key_state.left = None;
                }
                KeyCode::Char(' ') => {
                    self.key_state.fire = Some(now);
                }
                _ => {}
            },
        }
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left = None;
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right = None;
            }
            KeyCode::Char(' ') => {
                self.key_state.fire = None;
            }
            _ => {}
        }
    }

    fn is_held(&self, pressed_at: Option<Instant>, now: Instant) -> bool {
        match pressed_at {
            Some(at) => self.reports_release || now.saturating_duration_since(at) < KEY_HOLD,
            None => false,
        }
    }

    /// Held-key state at `now`.
    pub fn sample(&self, now: Instant) -> InputState {
        InputState {
            left: self.is_held(self.key_state.left, now),
            right: self.is_held(self.key_state.right, now),
            fire: self.is_held(self.key_state.fire, now),
        }
    }

    /// One-shot actions collected by the last poll.
    pub fn actions(&self) -> &[InputAction] {
        &self.oneshot_actions
    }

    /// Drops all held keys, e.g. after a restart.
    pub fn release_all(&mut self) {
        self.key_state = KeyState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_horizontal_direction() {
        let mut input = InputState::default();
        assert_eq!(input.horizontal(), 0.0);
        input.left = true;
        assert_eq!(input.horizontal(), -1.0);
        input.right = true;
        assert_eq!(input.horizontal(), 0.0);
        input.left = false;
        assert_eq!(input.horizontal(), 1.0);
    }

    #[test]
    fn test_press_and_release_with_release_events() {
        let mut manager = InputManager::new(true);
        let now = Instant::now();
        manager.handle_key_event(press(KeyCode::Left), GameState::Running, now);
        manager.handle_key_event(press(KeyCode::Char(' ')), GameState::Running, now);

        let later = now + Duration::from_secs(5);
        let input = manager.sample(later);
        assert!(input.left);
        assert!(input.fire);
        assert!(!input.right);

        manager.handle_key_event(release(KeyCode::Left), GameState::Running, later);
        assert!(!manager.sample(later).left);
    }

    #[test]
    fn test_press_expires_without_release_events() {
        let mut manager = InputManager::new(false);
        let now = Instant::now();
        manager.handle_key_event(press(KeyCode::Char('d')), GameState::Running, now);
        assert!(manager.sample(now + Duration::from_millis(100)).right);
        assert!(!manager.sample(now + Duration::from_millis(300)).right);
    }

    #[test]
    fn test_opposite_direction_replaces_held_key() {
        let mut manager = InputManager::new(true);
        let now = Instant::now();
        manager.handle_key_event(press(KeyCode::Char('a')), GameState::Running, now);
        manager.handle_key_event(press(KeyCode::Char('d')), GameState::Running, now);
        let input = manager.sample(now);
        assert!(!input.left);
        assert!(input.right);
    }

    #[test]
    fn test_quit_in_any_state() {
        let mut manager = InputManager::new(true);
        let now = Instant::now();
        manager.handle_key_event(press(KeyCode::Esc), GameState::Running, now);
        manager.handle_key_event(press(KeyCode::Char('q')), GameState::GameOver, now);
        assert_eq!(manager.actions(), &[InputAction::Quit, InputAction::Quit]);
    }

    #[test]
    fn test_any_key_restarts_after_game_over() {
        let mut manager = InputManager::new(true);
        let now = Instant::now();
        manager.handle_key_event(press(KeyCode::Char('x')), GameState::GameOver, now);
        assert_eq!(manager.actions(), &[InputAction::Restart]);
        assert_eq!(manager.sample(now), InputState::default());
    }

    #[test]
    fn test_running_keys_do_not_restart() {
        let mut manager = InputManager::new(true);
        let now = Instant::now();
        manager.handle_key_event(press(KeyCode::Char('x')), GameState::Running, now);
        assert!(manager.actions().is_empty());
    }
}
