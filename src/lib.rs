pub mod button;
pub mod config;
pub mod games;
pub mod icon;
pub mod input;
pub mod launcher;
pub mod layout;
pub mod logging;
pub mod menu;
pub mod text;

use icon::Icon;
use input::Input;
use macroquad::{math::Rect, text::Font};
use std::time::Duration;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum Status {
    #[default]
    Running,
    /// The game is done and control goes back to the menu.
    Finished,
}

/// A running game together with its view.
pub trait Game {
    /// Advances the game by one frame. `rect` is the area the game is drawn into.
    fn update(&mut self, input: &Input, rect: Rect, dt: Duration) -> Status;
    fn draw(&self, rect: Rect, font: Option<&Font>);
}

/// Menu entry that knows how to start a fresh game of one kind.
pub trait GameBuilder {
    fn name(&self) -> &str;
    fn icon(&self) -> Icon;
    fn build(&self) -> Box<dyn Game>;
}
