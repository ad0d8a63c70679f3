use crate::{
    button::{Button, ButtonStyle},
    icon::Icon,
    input::Input,
    layout,
    text::Label,
};
use macroquad::{input::KeyCode, math::Rect, text::Font};

/// Aspect ratio of a menu entry (icon above caption).
const ENTRY_ASPECT: f32 = 1.0;

#[derive(Clone, Debug)]
pub struct Entry {
    pub name: String,
    pub icon: Icon,
    button: Button,
}

/// Grid of game buttons. Selection by mouse or by arrow keys + Enter.
#[derive(Clone, Default, Debug)]
pub struct Menu {
    entries: Vec<Entry>,
    focus: usize,
    style: ButtonStyle,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, icon: Icon) {
        self.entries.push(Entry {
            name: name.to_owned(),
            icon,
            button: Button::default(),
        });
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn layout(&self, rect: Rect) -> Vec<Rect> {
        layout::grid(rect, self.entries.len(), ENTRY_ASPECT)
    }

    /// Returns the index of the entry chosen this frame, if any.
    pub fn update(&mut self, input: &Input, rect: Rect) -> Option<usize> {
        let boxes = self.layout(rect);
        let mut chosen = None;
        for (i, (entry, rect)) in self.entries.iter_mut().zip(&boxes).enumerate() {
            if entry.button.update(*rect, input) {
                chosen = Some(i);
            }
        }
        if let Some(i) = chosen {
            self.focus = i;
            return chosen;
        }

        let n = self.entries.len();
        if n == 0 {
            return None;
        }
        let columns = layout::best_fit(rect.size(), n, ENTRY_ASPECT).columns;
        if input.key(KeyCode::Right) {
            self.focus = (self.focus + 1) % n;
        }
        if input.key(KeyCode::Left) {
            self.focus = (self.focus + n - 1) % n;
        }
        if input.key(KeyCode::Down) && self.focus + columns < n {
            self.focus += columns;
        }
        if input.key(KeyCode::Up) && self.focus >= columns {
            self.focus -= columns;
        }
        self.focus = self.focus.min(n - 1);
        if input.any_key(&[KeyCode::Enter, KeyCode::KpEnter, KeyCode::Space]) {
            return Some(self.focus);
        }
        None
    }

    pub fn draw(&self, rect: Rect, font: Option<&Font>) {
        for (i, (entry, rect)) in self.entries.iter().zip(self.layout(rect)).enumerate() {
            let label = Label::new(&entry.name, rect.size().min_element() / 10.0, font)
                .color(self.style.text_color);
            entry
                .button
                .draw(rect, &entry.icon, &label, &self.style, i == self.focus);
        }
    }
}
