use crate::{
    config::Config,
    input::Input,
    layout,
    text::{Align, Label},
    GameBuilder,
};
use board::Pos;
use macroquad::{
    color::{self, Color},
    input::KeyCode,
    math::Rect,
    miniquad::date,
    shapes::{draw_circle, draw_circle_lines, draw_rectangle, draw_rectangle_lines},
    text::Font,
};

pub mod board;
pub mod click_lines;
pub mod lines;
pub mod snake;
pub mod tetris;

/// Ball and block colors shared by the games.
pub const PALETTE: [Color; 7] = [
    color::RED,
    color::GREEN,
    color::BLUE,
    color::YELLOW,
    color::MAGENTA,
    color::SKYBLUE,
    color::ORANGE,
];

/// Keys that pause and resume the timed games.
pub const PAUSE_KEYS: [KeyCode; 2] = [KeyCode::P, KeyCode::Pause];

/// Height of the score header relative to the game area.
const HEADER: f32 = 0.08;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum Phase {
    #[default]
    Playing,
    Paused,
    Over,
}

pub fn all(config: &Config) -> Vec<Box<dyn GameBuilder>> {
    vec![
        Box::new(lines::Builder::new(config.lines.clone())),
        Box::new(snake::Builder::new(config.snake.clone())),
        Box::new(tetris::Builder::new(config.tetris.clone())),
        Box::new(click_lines::Builder::new(config.click_lines.clone())),
    ]
}

/// Fresh seed for a new game.
pub fn seed() -> u64 {
    (date::now() * 1e6) as u64
}

/// Splits a game area into the score header and the playing field.
pub fn split_header(rect: Rect) -> (Rect, Rect) {
    layout::split_top(rect, rect.h * HEADER)
}

pub fn draw_header(rect: Rect, left: &str, right: &str, font: Option<&Font>) {
    let size = rect.h * 0.6;
    let y = rect.center().y;
    Label::new(left, size, font).draw(rect.x + size / 2.0, y, Align::Left);
    Label::new(right, size, font)
        .color(color::LIGHTGRAY)
        .draw(rect.right() - size / 2.0, y, Align::Right);
}

/// Dims the area and writes a message over it.
pub fn draw_banner(rect: Rect, title: &str, hint: &str, font: Option<&Font>) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, Color::new(0.0, 0.0, 0.0, 0.6));
    let size = rect.size().min_element() / 8.0;
    let (x, y) = (rect.center().x, rect.center().y);
    Label::new(title, size, font).draw(x, y - size / 2.0, Align::Center);
    Label::new(hint, size / 3.0, font)
        .color(color::LIGHTGRAY)
        .draw(x, y + size / 2.0, Align::Center);
}

pub fn draw_ball(cell: Rect, color: Color, selected: bool) {
    let r = cell.w.min(cell.h) * 0.4;
    draw_circle(cell.center().x, cell.center().y, r, color);
    if selected {
        draw_circle_lines(cell.center().x, cell.center().y, r, r / 5.0, color::WHITE);
    }
}

pub fn draw_cursor(cell: Rect) {
    draw_rectangle_lines(cell.x, cell.y, cell.w, cell.h, 3.0, color::LIGHTGRAY);
}

/// Moves a board cursor with the arrow keys, keeping it inside `width` x `height`.
pub fn step_cursor(input: &Input, cursor: Pos, width: usize, height: usize) -> Pos {
    let mut cursor = cursor;
    for (key, dir) in [
        (KeyCode::Up, Pos::UP),
        (KeyCode::Down, Pos::DOWN),
        (KeyCode::Left, Pos::LEFT),
        (KeyCode::Right, Pos::RIGHT),
    ] {
        let next = cursor + dir;
        if input.key(key)
            && (0..width as i32).contains(&next.x)
            && (0..height as i32).contains(&next.y)
        {
            cursor = next;
        }
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_stays_on_board() {
        let input = Input::with_keys(&[KeyCode::Left, KeyCode::Down]);
        assert_eq!(step_cursor(&input, Pos::new(0, 0), 3, 3), Pos::new(0, 1));
        assert_eq!(step_cursor(&input, Pos::new(2, 2), 3, 3), Pos::new(1, 2));
    }

    #[test]
    fn builders_have_distinct_names() {
        let builders = all(&Config::default());
        assert_eq!(builders.len(), 4);
        let mut names: Vec<_> = builders.iter().map(|b| b.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);
    }
}
