use macroquad::{
    color::{self, Color},
    text::{camera_font_scale, draw_text_ex, measure_text, Font, TextDimensions, TextParams},
};

/// Horizontal anchor of a [`Label`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    /// Left edge of a `width` wide line anchored at `x`.
    pub fn start(self, x: f32, width: f32) -> f32 {
        match self {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        }
    }
}

/// Single line of colored text, positioned by its vertical center.
#[derive(Clone, Debug)]
pub struct Label<'a> {
    pub text: String,
    pub size: f32,
    pub color: Color,
    pub font: Option<&'a Font>,
}

impl<'a> Label<'a> {
    pub fn new(text: impl Into<String>, size: f32, font: Option<&'a Font>) -> Self {
        Self {
            text: text.into(),
            size,
            color: color::WHITE,
            font,
        }
    }

    pub fn color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub fn dimensions(&self) -> TextDimensions {
        let (font_size, font_scale, font_aspect) = camera_font_scale(self.size);
        let mut dims = measure_text(&self.text, self.font, font_size, font_scale);
        dims.width *= font_aspect;
        dims
    }

    pub fn draw(&self, x: f32, y: f32, align: Align) {
        let (font_size, font_scale, font_scale_aspect) = camera_font_scale(self.size);
        let dims = self.dimensions();
        draw_text_ex(
            &self.text,
            align.start(x, dims.width),
            y + dims.offset_y / 2.0,
            TextParams {
                font: self.font,
                font_size,
                font_scale,
                font_scale_aspect,
                color: self.color,
                ..Default::default()
            },
        );
    }
}
