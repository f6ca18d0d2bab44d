#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadButton {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Attack,
    Start,
}

const BUTTON_COUNT: usize = 7;

impl PadButton {
    const fn index(self) -> usize {
        match self {
            PadButton::Left => 0,
            PadButton::Right => 1,
            PadButton::Up => 2,
            PadButton::Down => 3,
            PadButton::Jump => 4,
            PadButton::Attack => 5,
            PadButton::Start => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ButtonStates {
    down: [bool; BUTTON_COUNT],
}

impl ButtonStates {
    pub(crate) fn set(&mut self, button: PadButton, is_down: bool) {
        self.down[button.index()] = is_down;
    }

    pub(crate) fn is_down(&self, button: PadButton) -> bool {
        self.down[button.index()]
    }
}

/// Per-tick controller state. `is_down` reports the held level of a button;
/// `just_pressed` reports the press edge and is true for exactly one tick per
/// physical press.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    held: ButtonStates,
    pressed: ButtonStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(quit_requested: bool, held: ButtonStates, pressed: ButtonStates) -> Self {
        Self {
            quit_requested,
            held,
            pressed,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, button: PadButton) -> bool {
        self.held.is_down(button)
    }

    pub fn just_pressed(&self, button: PadButton) -> bool {
        self.pressed.is_down(button)
    }

    pub fn with_button_down(mut self, button: PadButton, is_down: bool) -> Self {
        self.held.set(button, is_down);
        self
    }

    /// Marks a press edge. A physical press always comes with the held level,
    /// so the held state is set too.
    pub fn with_button_pressed(mut self, button: PadButton) -> Self {
        self.pressed.set(button, true);
        self.held.set(button, true);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_nothing_down() {
        let snapshot = InputSnapshot::empty();
        for button in [
            PadButton::Left,
            PadButton::Right,
            PadButton::Up,
            PadButton::Down,
            PadButton::Jump,
            PadButton::Attack,
            PadButton::Start,
        ] {
            assert!(!snapshot.is_down(button));
            assert!(!snapshot.just_pressed(button));
        }
        assert!(!snapshot.quit_requested());
    }

    #[test]
    fn with_button_down_sets_held_but_not_edge() {
        let snapshot = InputSnapshot::empty().with_button_down(PadButton::Right, true);
        assert!(snapshot.is_down(PadButton::Right));
        assert!(!snapshot.just_pressed(PadButton::Right));
    }

    #[test]
    fn with_button_pressed_sets_edge_and_held() {
        let snapshot = InputSnapshot::empty().with_button_pressed(PadButton::Jump);
        assert!(snapshot.just_pressed(PadButton::Jump));
        assert!(snapshot.is_down(PadButton::Jump));
        assert!(!snapshot.just_pressed(PadButton::Attack));
    }

    #[test]
    fn buttons_do_not_alias_each_other() {
        let snapshot = InputSnapshot::empty()
            .with_button_down(PadButton::Left, true)
            .with_button_down(PadButton::Attack, true);
        assert!(snapshot.is_down(PadButton::Left));
        assert!(snapshot.is_down(PadButton::Attack));
        assert!(!snapshot.is_down(PadButton::Right));
        assert!(!snapshot.is_down(PadButton::Jump));
    }
}
