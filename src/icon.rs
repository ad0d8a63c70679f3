use macroquad::{
    color::{self, Color},
    math::Rect,
    shapes::{draw_circle, draw_rectangle, draw_rectangle_lines},
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum IconShape {
    /// Four small squares, used for the launcher itself.
    Tiles,
    /// A diagonal row of balls.
    Balls,
    /// A cluster of balls touching each other.
    Cluster,
    Snake,
    Blocks,
}

/// Vector icon drawn into a square.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Icon {
    pub shape: IconShape,
    pub color: Color,
}

impl Icon {
    pub const fn new(shape: IconShape, color: Color) -> Self {
        Self { shape, color }
    }

    pub fn launcher() -> Self {
        Self::new(IconShape::Tiles, color::LIGHTGRAY)
    }

    pub fn draw(&self, rect: Rect) {
        let s = rect.w.min(rect.h);
        let (x, y) = (rect.center().x - s / 2.0, rect.center().y - s / 2.0);
        let c = self.color;
        match self.shape {
            IconShape::Tiles => {
                let q = s / 2.0;
                let gap = s / 16.0;
                for (i, j) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
                    draw_rectangle(x + i * q + gap, y + j * q + gap, q - 2.0 * gap, q - 2.0 * gap, c);
                }
            }
            IconShape::Balls => {
                let r = s / 8.0;
                for i in 0..4 {
                    let t = (2 * i + 1) as f32 * s / 8.0;
                    draw_circle(x + t, y + s - t, r * 0.9, c);
                }
            }
            IconShape::Cluster => {
                let r = s / 6.0;
                let cells = [(1, 1), (2, 1), (1, 2), (3, 2), (2, 2)];
                for (i, j) in cells {
                    draw_circle(x + i as f32 * s / 4.0, y + j as f32 * s / 4.0 + r / 2.0, r * 0.9, c);
                }
            }
            IconShape::Snake => {
                let q = s / 5.0;
                let cells = [(0, 3), (1, 3), (2, 3), (2, 2), (2, 1), (3, 1)];
                for (i, j) in cells {
                    draw_rectangle(x + i as f32 * q + q / 2.0, y + j as f32 * q, q * 0.9, q * 0.9, c);
                }
                draw_circle(x + 4.0 * q + q / 2.0, y + q + q / 2.0, q / 3.0, color::RED);
            }
            IconShape::Blocks => {
                let q = s / 4.0;
                let cells = [(0, 3), (1, 3), (2, 3), (3, 3), (1, 2), (1, 1), (2, 1)];
                for (i, j) in cells {
                    let (bx, by) = (x + i as f32 * q, y + j as f32 * q);
                    draw_rectangle(bx, by, q, q, c);
                    draw_rectangle_lines(bx, by, q, q, s / 32.0, color::BLACK);
                }
            }
        }
    }
}
