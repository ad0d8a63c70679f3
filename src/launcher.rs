//! Menu and game switching.
//!
//! The launcher owns every registered [`GameBuilder`] and at most one running [`Game`].
//! While no game runs the menu is shown; choosing an entry builds that game and hides
//! the menu until the game reports [`Status::Finished`].

use crate::{
    icon::Icon,
    input::Input,
    layout,
    menu::Menu,
    text::{Align, Label},
    Game, GameBuilder, Status,
};
use anyhow::{anyhow, Error};
use macroquad::{
    color::Color,
    math::Rect,
    shapes::draw_rectangle,
    text::Font,
};
use std::time::Duration;

/// Title bar height relative to the window height.
const TITLE_BAR: f32 = 0.06;

struct ActiveGame {
    /// Index of the builder that produced the game.
    index: usize,
    game: Box<dyn Game>,
}

pub struct Launcher {
    builders: Vec<Box<dyn GameBuilder>>,
    menu: Menu,
    active: Option<ActiveGame>,
    default_icon: Icon,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Launcher {
    pub fn new() -> Self {
        Self {
            builders: Vec::new(),
            menu: Menu::new(),
            active: None,
            default_icon: Icon::launcher(),
        }
    }

    pub fn register(&mut self, builder: Box<dyn GameBuilder>) {
        log::debug!("Registered game \"{}\"", builder.name());
        self.menu.push(builder.name(), builder.icon());
        self.builders.push(builder);
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    pub fn games(&self) -> impl Iterator<Item = &str> {
        self.builders.iter().map(|b| b.name())
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Builds and starts the game registered under `index`.
    ///
    /// # Panics
    ///
    /// If a game is already running or `index` is out of range.
    pub fn launch(&mut self, index: usize) {
        assert!(
            self.active.is_none(),
            "Cannot launch a game while another one is running"
        );
        let builder = &self.builders[index];
        log::info!("Launching \"{}\"", builder.name());
        self.active = Some(ActiveGame {
            index,
            game: builder.build(),
        });
    }

    /// Launches the game whose name matches `name`, ignoring case.
    pub fn launch_by_name(&mut self, name: &str) -> Result<(), Error> {
        match self
            .builders
            .iter()
            .position(|b| b.name().eq_ignore_ascii_case(name))
        {
            Some(index) => {
                self.launch(index);
                Ok(())
            }
            None => Err(anyhow!(
                "Game not found: \"{name}\"\nAvailable games: {:?}",
                self.games().collect::<Vec<_>>()
            )),
        }
    }

    /// Drops the running game, if any, and shows the menu again.
    pub fn return_to_menu(&mut self) {
        if let Some(active) = self.active.take() {
            log::info!("\"{}\" finished", self.builders[active.index].name());
        }
    }

    pub fn is_menu_visible(&self) -> bool {
        self.active.is_none()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active
            .as_ref()
            .map(|a| self.builders[a.index].name())
    }

    pub fn default_title(&self) -> String {
        format!("Multigame {} in 1", self.builders.len())
    }

    pub fn title(&self) -> String {
        match self.active_name() {
            Some(name) => name.to_owned(),
            None => self.default_title(),
        }
    }

    pub fn icon(&self) -> Icon {
        match &self.active {
            Some(active) => self.builders[active.index].icon(),
            None => self.default_icon,
        }
    }

    /// Splits the window into the title bar and the content area.
    pub fn split(viewport: Rect) -> (Rect, Rect) {
        layout::split_top(viewport, viewport.h * TITLE_BAR)
    }

    pub fn update(&mut self, input: &Input, viewport: Rect, dt: Duration) {
        let (_, content) = Self::split(viewport);
        if let Some(active) = &mut self.active {
            if active.game.update(input, content, dt) == Status::Finished {
                self.return_to_menu();
            }
        } else if let Some(index) = self.menu.update(input, content) {
            self.launch(index);
        }
    }

    pub fn draw(&self, viewport: Rect, font: Option<&Font>) {
        let (bar, content) = Self::split(viewport);
        draw_rectangle(bar.x, bar.y, bar.w, bar.h, Color::new(0.2, 0.2, 0.24, 1.0));
        let pad = bar.h * 0.15;
        self.icon()
            .draw(Rect::new(bar.x + pad, bar.y + pad, bar.h - 2.0 * pad, bar.h - 2.0 * pad));
        Label::new(self.title(), bar.h * 0.6, font).draw(
            bar.x + bar.h + pad,
            bar.center().y,
            Align::Left,
        );

        match &self.active {
            Some(active) => active.game.draw(content, font),
            None => self.menu.draw(content, font),
        }
    }
}
