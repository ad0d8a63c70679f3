use crate::games::board::Pos;
use macroquad::math::{Rect, Vec2};

/// Column and row counts of a grid together with the size of one cell.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GridFit {
    pub columns: usize,
    pub rows: usize,
    pub cell: Vec2,
}

impl GridFit {
    fn new(size: Vec2, columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cell: Vec2::new(size.x / columns as f32, size.y / rows as f32),
        }
    }
}

/// Smallest grid over `size` with room for `n` cells, adding a column while
/// the cells are wider than `aspect` (width / height) and a row otherwise.
pub fn best_fit(size: Vec2, n: usize, aspect: f32) -> GridFit {
    let mut fit = GridFit::new(size, 1, 1);
    while fit.columns * fit.rows < n {
        fit = if fit.cell.x >= fit.cell.y * aspect {
            GridFit::new(size, fit.columns + 1, fit.rows)
        } else {
            GridFit::new(size, fit.columns, fit.rows + 1)
        };
    }
    fit
}

/// Splits `area` into `n` equal cells laid out by [`best_fit`], row by row.
pub fn grid(area: Rect, n: usize, aspect: f32) -> Vec<Rect> {
    let GridFit { columns, cell, .. } = best_fit(area.size(), n, aspect);
    (0..n)
        .map(|i| {
            let (ix, iy) = (i % columns, i / columns);
            Rect::new(
                area.x + cell.x * ix as f32,
                area.y + cell.y * iy as f32,
                cell.x,
                cell.y,
            )
        })
        .collect()
}

/// Largest rect of the given aspect centered inside `area`.
pub fn fit(area: Rect, aspect: f32) -> Rect {
    let (w, h) = if area.w > area.h * aspect {
        (area.h * aspect, area.h)
    } else {
        (area.w, area.w / aspect)
    };
    Rect::new(
        area.center().x - w / 2.0,
        area.center().y - h / 2.0,
        w,
        h,
    )
}

/// Cuts a strip of `height` off the top of `area`, returning `(strip, rest)`.
pub fn split_top(area: Rect, height: f32) -> (Rect, Rect) {
    let height = height.min(area.h);
    (
        Rect::new(area.x, area.y, area.w, height),
        Rect::new(area.x, area.y + height, area.w, area.h - height),
    )
}

pub fn shrink(area: Rect, margin: f32) -> Rect {
    let margin = margin.min(area.w / 2.0).min(area.h / 2.0);
    Rect::new(
        area.x + margin,
        area.y + margin,
        area.w - 2.0 * margin,
        area.h - 2.0 * margin,
    )
}

/// Geometry of a board of `width` x `height` square cells fitted into an area.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BoardView {
    pub rect: Rect,
    pub width: usize,
    pub height: usize,
}

impl BoardView {
    pub fn fit(area: Rect, width: usize, height: usize) -> Self {
        Self {
            rect: fit(area, width as f32 / height as f32),
            width,
            height,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.rect.w / self.width as f32
    }

    pub fn cell_rect(&self, pos: Pos) -> Rect {
        let s = self.cell_size();
        Rect::new(
            self.rect.x + s * pos.x as f32,
            self.rect.y + s * pos.y as f32,
            s,
            s,
        )
    }

    pub fn cell_at(&self, point: Vec2) -> Option<Pos> {
        if !self.rect.contains(point) {
            return None;
        }
        let s = self.cell_size();
        let rel = (point - self.rect.point()) / s;
        let pos = Pos::new(rel.x as i32, rel.y as i32);
        if (pos.x as usize) < self.width && (pos.y as usize) < self.height {
            Some(pos)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn grid_square() {
        let boxes = grid(Rect::new(0.0, 0.0, 100.0, 100.0), 4, 1.0);
        assert_eq!(
            boxes,
            vec![
                Rect::new(0.0, 0.0, 50.0, 50.0),
                Rect::new(50.0, 0.0, 50.0, 50.0),
                Rect::new(0.0, 50.0, 50.0, 50.0),
                Rect::new(50.0, 50.0, 50.0, 50.0),
            ]
        );
    }

    #[test]
    fn grid_wide_row() {
        let boxes = grid(Rect::new(10.0, 20.0, 300.0, 100.0), 3, 1.0);
        assert_eq!(boxes.len(), 3);
        for (i, rect) in boxes.iter().enumerate() {
            assert_abs_diff_eq!(rect.x, 10.0 + 100.0 * i as f32);
            assert_abs_diff_eq!(rect.y, 20.0);
            assert_abs_diff_eq!(rect.w, 100.0);
            assert_abs_diff_eq!(rect.h, 100.0);
        }
    }

    #[test]
    fn best_fit_follows_aspect() {
        let fit = best_fit(Vec2::new(400.0, 100.0), 5, 1.0);
        assert_eq!((fit.columns, fit.rows), (5, 1));
        assert_abs_diff_eq!(fit.cell.x, 80.0);
        assert_abs_diff_eq!(fit.cell.y, 100.0);

        let fit = best_fit(Vec2::new(100.0, 300.0), 3, 1.0);
        assert_eq!((fit.columns, fit.rows), (1, 3));

        let fit = best_fit(Vec2::new(100.0, 100.0), 0, 1.0);
        assert_eq!((fit.columns, fit.rows), (1, 1));
    }

    #[test]
    fn grid_empty() {
        assert!(grid(Rect::new(0.0, 0.0, 100.0, 100.0), 0, 1.0).is_empty());
    }

    #[test]
    fn fit_keeps_aspect() {
        let rect = fit(Rect::new(0.0, 0.0, 200.0, 100.0), 1.0);
        assert_abs_diff_eq!(rect.x, 50.0);
        assert_abs_diff_eq!(rect.w, 100.0);
        assert_abs_diff_eq!(rect.h, 100.0);

        let rect = fit(Rect::new(0.0, 0.0, 100.0, 300.0), 0.5);
        assert_abs_diff_eq!(rect.y, 50.0);
        assert_abs_diff_eq!(rect.w, 100.0);
        assert_abs_diff_eq!(rect.h, 200.0);
    }

    #[test]
    fn board_cells() {
        let view = BoardView::fit(Rect::new(0.0, 0.0, 90.0, 90.0), 9, 9);
        assert_abs_diff_eq!(view.cell_size(), 10.0);
        assert_eq!(view.cell_at(Vec2::new(15.0, 85.0)), Some(Pos::new(1, 8)));
        assert_eq!(view.cell_at(Vec2::new(95.0, 5.0)), None);
        assert_eq!(view.cell_rect(Pos::new(2, 3)), Rect::new(20.0, 30.0, 10.0, 10.0));
    }
}
