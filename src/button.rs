use crate::{
    icon::Icon,
    input::Input,
    layout,
    text::{Align, Label},
};
use macroquad::{
    color::{self, Color},
    math::Rect,
    shapes::{draw_rectangle, draw_rectangle_lines},
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum ButtonState {
    #[default]
    Up,
    Hover,
    Down,
}

#[derive(Clone, Copy, Debug)]
pub struct ButtonStyle {
    pub text_color: Color,
    pub fill_color: Color,
    pub hover_color: Color,
    pub down_color: Color,
    pub border_color: Color,
    pub border_width: f32,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            text_color: color::WHITE,
            fill_color: Color::new(0.1, 0.1, 0.12, 1.0),
            hover_color: Color::new(0.18, 0.18, 0.22, 1.0),
            down_color: Color::new(0.26, 0.26, 0.32, 1.0),
            border_color: color::GRAY,
            border_width: 4.0,
        }
    }
}

/// Push button. Clicks when the mouse is pressed and released over it.
#[derive(Clone, Default, Debug)]
pub struct Button {
    state: ButtonState,
    pressed: bool,
}

impl Button {
    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn update(&mut self, rect: Rect, input: &Input) -> bool {
        let mut clicked = false;
        self.state = if rect.contains(input.mouse) {
            if input.mouse_pressed {
                self.pressed = true;
            }
            if self.pressed && input.mouse_released {
                clicked = true;
                self.pressed = false;
            }
            if self.pressed && input.mouse_down {
                ButtonState::Down
            } else {
                ButtonState::Hover
            }
        } else {
            if !input.mouse_down {
                self.pressed = false;
            }
            ButtonState::Up
        };
        clicked
    }

    /// Draws an icon with a caption below it. `focused` adds a keyboard focus frame.
    pub fn draw(&self, rect: Rect, icon: &Icon, label: &Label, style: &ButtonStyle, focused: bool) {
        let fill = match self.state {
            ButtonState::Up => style.fill_color,
            ButtonState::Hover => style.hover_color,
            ButtonState::Down => style.down_color,
        };
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, fill);

        let icon_size = rect.size().min_element() / 2.0;
        icon.draw(Rect::new(
            rect.center().x - icon_size / 2.0,
            rect.center().y - icon_size * 0.65,
            icon_size,
            icon_size,
        ));
        label.draw(rect.center().x, rect.bottom() - label.size * 0.75, Align::Center);

        if focused || self.state != ButtonState::Up {
            let frame = layout::shrink(rect, style.border_width);
            draw_rectangle_lines(
                frame.x,
                frame.y,
                frame.w,
                frame.h,
                style.border_width,
                style.border_color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::Vec2;

    const RECT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 10.0,
        h: 10.0,
    };

    fn mouse(pos: Vec2, pressed: bool, down: bool, released: bool) -> Input {
        Input {
            mouse: pos,
            mouse_pressed: pressed,
            mouse_down: down,
            mouse_released: released,
            ..Default::default()
        }
    }

    #[test]
    fn press_and_release_inside_clicks() {
        let inside = Vec2::new(5.0, 5.0);
        let mut button = Button::default();
        assert!(!button.update(RECT, &mouse(inside, false, false, false)));
        assert_eq!(button.state(), ButtonState::Hover);
        assert!(!button.update(RECT, &mouse(inside, true, true, false)));
        assert_eq!(button.state(), ButtonState::Down);
        assert!(button.update(RECT, &mouse(inside, false, false, true)));
        assert_eq!(button.state(), ButtonState::Hover);
    }

    #[test]
    fn release_outside_does_not_click() {
        let mut button = Button::default();
        button.update(RECT, &mouse(Vec2::new(5.0, 5.0), true, true, false));
        assert!(!button.update(RECT, &mouse(Vec2::new(50.0, 5.0), false, false, true)));
        assert_eq!(button.state(), ButtonState::Up);
        assert!(!button.update(RECT, &mouse(Vec2::new(5.0, 5.0), false, false, true)));
    }

    #[test]
    fn release_without_press_does_not_click() {
        let mut button = Button::default();
        assert!(!button.update(RECT, &mouse(Vec2::new(5.0, 5.0), false, false, true)));
    }
}
