use derive_more::derive::{Add, AddAssign, From, Into, Neg, Sub};
use std::ops::{Index, IndexMut};

#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Default, Debug, From, Into, Add, AddAssign, Sub, Neg,
)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const UP: Self = Self::new(0, -1);
    pub const DOWN: Self = Self::new(0, 1);
    pub const LEFT: Self = Self::new(-1, 0);
    pub const RIGHT: Self = Self::new(1, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn neighbors(self) -> [Self; 4] {
        [Self::UP, Self::DOWN, Self::LEFT, Self::RIGHT].map(|d| self + d)
    }
}

/// Rectangular board of cells, row-major.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![T::default(); width * height],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(T::default());
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn offset(&self, pos: Pos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, pos: Pos) -> Option<&T> {
        self.offset(pos).map(|i| &self.cells[i])
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..h).flat_map(move |y| (0..w).map(move |x| Pos::new(x, y)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, &T)> {
        self.positions().zip(self.cells.iter())
    }
}

impl<T> Grid<Option<T>> {
    pub fn empty_cells(&self) -> Vec<Pos> {
        self.iter()
            .filter_map(|(pos, cell)| if cell.is_none() { Some(pos) } else { None })
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

impl<T> Index<Pos> for Grid<T> {
    type Output = T;
    fn index(&self, pos: Pos) -> &T {
        match self.offset(pos) {
            Some(i) => &self.cells[i],
            None => panic!("{pos:?} is outside of {}x{} grid", self.width, self.height),
        }
    }
}

impl<T> IndexMut<Pos> for Grid<T> {
    fn index_mut(&mut self, pos: Pos) -> &mut T {
        match self.offset(pos) {
            Some(i) => &mut self.cells[i],
            None => panic!("{pos:?} is outside of {}x{} grid", self.width, self.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        let grid = Grid::<Option<u8>>::new(3, 2);
        assert!(grid.contains(Pos::new(2, 1)));
        assert!(!grid.contains(Pos::new(3, 1)));
        assert!(!grid.contains(Pos::new(0, -1)));
        assert_eq!(grid.get(Pos::new(0, 2)), None);
        assert_eq!(grid.positions().count(), 6);
    }

    #[test]
    fn row_major() {
        let mut grid = Grid::<Option<u8>>::new(3, 2);
        grid[Pos::new(1, 1)] = Some(7);
        assert_eq!(
            grid.iter().position(|(_, c)| c.is_some()),
            Some(4),
        );
        assert_eq!(grid.empty_cells().len(), 5);
        assert!(!grid.is_empty());
        assert!(!grid.is_full());
    }
}
