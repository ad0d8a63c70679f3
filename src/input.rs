use macroquad::{
    input::{
        get_keys_down, get_keys_pressed, is_mouse_button_down, is_mouse_button_pressed,
        is_mouse_button_released, mouse_position, KeyCode, MouseButton,
    },
    math::Vec2,
};
use std::collections::HashSet;

/// Input state captured once per frame.
#[derive(Clone, Default, Debug)]
pub struct Input {
    /// Keys that went down this frame.
    pub pressed: HashSet<KeyCode>,
    /// Keys currently held.
    pub held: HashSet<KeyCode>,
    pub mouse: Vec2,
    pub mouse_pressed: bool,
    pub mouse_released: bool,
    pub mouse_down: bool,
}

impl Input {
    pub fn poll() -> Self {
        Self {
            pressed: get_keys_pressed(),
            held: get_keys_down(),
            mouse: Vec2::from(mouse_position()),
            mouse_pressed: is_mouse_button_pressed(MouseButton::Left),
            mouse_released: is_mouse_button_released(MouseButton::Left),
            mouse_down: is_mouse_button_down(MouseButton::Left),
        }
    }

    pub fn key(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn any_key(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.pressed.contains(k))
    }

    pub fn held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Position of a left click that started this frame.
    pub fn click(&self) -> Option<Vec2> {
        if self.mouse_pressed {
            Some(self.mouse)
        } else {
            None
        }
    }

    pub fn with_keys(keys: &[KeyCode]) -> Self {
        Self {
            pressed: keys.iter().copied().collect(),
            held: keys.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn with_click(pos: Vec2) -> Self {
        Self {
            mouse: pos,
            mouse_pressed: true,
            mouse_down: true,
            ..Default::default()
        }
    }
}
