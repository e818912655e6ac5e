#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Run,
    Attack,
    Interact,
    Sleep,
    Quit,
}

const ACTION_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
    pressed: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn set_pressed(&mut self, action: InputAction, pressed: bool) {
        self.pressed[action.index()] = pressed;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed[action.index()]
    }
}

impl InputAction {
    pub const MOVEMENT: [InputAction; 4] = [
        InputAction::MoveUp,
        InputAction::MoveDown,
        InputAction::MoveLeft,
        InputAction::MoveRight,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Run => 4,
            InputAction::Attack => 5,
            InputAction::Interact => 6,
            InputAction::Sleep => 7,
            InputAction::Quit => 8,
        }
    }
}

/// One tick of player intent. Held state comes from `is_down`; edge-triggered
/// signals (interact, sleep toggle) come from `was_pressed` and are true only
/// on the tick the key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.actions.was_pressed(action)
    }

    pub fn any_movement_down(&self) -> bool {
        InputAction::MOVEMENT
            .iter()
            .any(|action| self.is_down(*action))
    }

    pub fn quit_requested(&self) -> bool {
        self.is_down(InputAction::Quit) || self.was_pressed(InputAction::Quit)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    /// Marks `action` as pressed this tick; a press also counts as held.
    pub fn with_action_pressed(mut self, action: InputAction, pressed: bool) -> Self {
        self.actions.set_pressed(action, pressed);
        if pressed {
            self.actions.set(action, true);
        }
        self
    }

    /// Per-axis intent in {-1, 0, +1}; y grows downward.
    pub fn axis_intent(&self) -> (i8, i8) {
        let mut x = 0i8;
        let mut y = 0i8;
        if self.is_down(InputAction::MoveRight) {
            x += 1;
        }
        if self.is_down(InputAction::MoveLeft) {
            x -= 1;
        }
        if self.is_down(InputAction::MoveDown) {
            y += 1;
        }
        if self.is_down(InputAction::MoveUp) {
            y -= 1;
        }
        (x, y)
    }
}
