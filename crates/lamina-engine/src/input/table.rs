use std::collections::HashSet;

use super::types::{Action, Key, Modifiers, MouseButton};

/// Polled input state for a single window.
///
/// Holds "is down" information, the cursor position, and modifier state.
/// Press transitions are additionally recorded into sticky per-interval sets
/// so that a press followed by a release inside one event pump still reads as
/// `Press` when polled afterwards. An interval spans from one `begin_interval`
/// call to the next; the surface opens a new interval at each event pump.
#[derive(Debug, Default)]
pub struct InputTable {
    modifiers: Modifiers,
    focused: bool,

    /// Cursor position in physical pixels, top-left origin.
    cursor: (f64, f64),

    keys_down: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,

    /// Keys pressed since the last `begin_interval`.
    keys_pressed: HashSet<Key>,

    /// Buttons pressed since the last `begin_interval`.
    buttons_pressed: HashSet<MouseButton>,
}

impl InputTable {
    /// Opens a new polling interval, forgetting sticky presses from the
    /// previous one. Held keys and buttons are unaffected.
    pub fn begin_interval(&mut self) {
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
    }

    pub fn apply_key(&mut self, key: Key, action: Action) {
        match action {
            Action::Press | Action::Repeat => {
                self.keys_down.insert(key);
                self.keys_pressed.insert(key);
            }
            Action::Release => {
                self.keys_down.remove(&key);
            }
        }
    }

    pub fn apply_button(&mut self, button: MouseButton, action: Action) {
        match action {
            Action::Press | Action::Repeat => {
                self.buttons_down.insert(button);
                self.buttons_pressed.insert(button);
            }
            Action::Release => {
                self.buttons_down.remove(&button);
            }
        }
    }

    pub fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Records a focus change. On focus loss the down-sets are cleared so
    /// keys released outside the window do not stay stuck; sticky presses
    /// from the current interval are kept.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.keys_down.clear();
            self.buttons_down.clear();
        }
    }

    /// Polled key state.
    ///
    /// Reports `Press` while the key is held and for any key pressed during
    /// the current interval, even if it was released before the poll.
    /// Never reports `Repeat`; repeats are a callback-only signal.
    pub fn key_action(&self, key: Key) -> Action {
        if self.keys_down.contains(&key) || self.keys_pressed.contains(&key) {
            Action::Press
        } else {
            Action::Release
        }
    }

    /// Polled mouse button state, with the same sticky rule as keys.
    pub fn mouse_action(&self, button: MouseButton) -> Action {
        if self.buttons_down.contains(&button) || self.buttons_pressed.contains(&button) {
            Action::Press
        } else {
            Action::Release
        }
    }

    /// Cursor position in physical pixels, top-left origin.
    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn focused(&self) -> bool {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── sticky presses ────────────────────────────────────────────────────

    #[test]
    fn held_key_reads_press() {
        let mut table = InputTable::default();
        table.apply_key(Key::W, Action::Press);
        assert_eq!(table.key_action(Key::W), Action::Press);
    }

    #[test]
    fn press_release_within_interval_still_reads_press() {
        let mut table = InputTable::default();
        table.begin_interval();
        table.apply_key(Key::Space, Action::Press);
        table.apply_key(Key::Space, Action::Release);
        assert_eq!(table.key_action(Key::Space), Action::Press);
    }

    #[test]
    fn sticky_press_cleared_by_next_interval() {
        let mut table = InputTable::default();
        table.begin_interval();
        table.apply_key(Key::Space, Action::Press);
        table.apply_key(Key::Space, Action::Release);
        table.begin_interval();
        assert_eq!(table.key_action(Key::Space), Action::Release);
    }

    #[test]
    fn held_key_survives_interval_boundary() {
        let mut table = InputTable::default();
        table.begin_interval();
        table.apply_key(Key::A, Action::Press);
        table.begin_interval();
        assert_eq!(table.key_action(Key::A), Action::Press);
    }

    #[test]
    fn repeat_counts_as_held() {
        let mut table = InputTable::default();
        table.apply_key(Key::A, Action::Repeat);
        // Queries never surface Repeat.
        assert_eq!(table.key_action(Key::A), Action::Press);
    }

    #[test]
    fn buttons_follow_the_same_sticky_rule() {
        let mut table = InputTable::default();
        table.begin_interval();
        table.apply_button(MouseButton::Left, Action::Press);
        table.apply_button(MouseButton::Left, Action::Release);
        assert_eq!(table.mouse_action(MouseButton::Left), Action::Press);
        table.begin_interval();
        assert_eq!(table.mouse_action(MouseButton::Left), Action::Release);
    }

    // ── focus ─────────────────────────────────────────────────────────────

    #[test]
    fn focus_flag_tracks_the_last_report() {
        let mut table = InputTable::default();
        assert!(!table.focused());
        table.set_focused(true);
        assert!(table.focused());
        table.set_focused(false);
        assert!(!table.focused());
    }

    #[test]
    fn focus_loss_clears_down_sets() {
        let mut table = InputTable::default();
        table.begin_interval();
        table.apply_key(Key::A, Action::Press);
        table.apply_button(MouseButton::Right, Action::Press);
        table.set_focused(false);
        table.begin_interval();
        assert!(!table.focused());
        assert_eq!(table.key_action(Key::A), Action::Release);
        assert_eq!(table.mouse_action(MouseButton::Right), Action::Release);
    }

    #[test]
    fn focus_loss_keeps_sticky_presses_for_the_current_interval() {
        let mut table = InputTable::default();
        table.begin_interval();
        table.apply_key(Key::A, Action::Press);
        table.set_focused(false);
        // The press happened inside this interval; it is still observable.
        assert_eq!(table.key_action(Key::A), Action::Press);
    }

    // ── cursor & modifiers ────────────────────────────────────────────────

    #[test]
    fn cursor_tracks_last_position() {
        let mut table = InputTable::default();
        table.set_cursor(12.5, 40.0);
        assert_eq!(table.cursor(), (12.5, 40.0));
    }

    #[test]
    fn modifiers_round_trip() {
        let mut table = InputTable::default();
        let mods = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        table.set_modifiers(mods);
        assert_eq!(table.modifiers(), mods);
        assert!(table.modifiers().any());
    }
}
