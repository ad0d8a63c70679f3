use super::{
    board::{Grid, Pos},
    draw_ball, draw_banner, draw_cursor, draw_header, seed, split_header, step_cursor, PALETTE,
};
use crate::{
    config::LinesConfig,
    icon::{Icon, IconShape},
    input::Input,
    layout::BoardView,
    Game, GameBuilder, Status,
};
use derive_more::derive::{Deref, DerefMut};
use itertools::Itertools;
use macroquad::{
    color::{self, Color},
    input::KeyCode,
    math::Rect,
    shapes::{draw_rectangle, draw_rectangle_lines},
    text::Font,
};
use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};
use std::{collections::VecDeque, time::Duration};

/// Line directions, each checked both ways.
const DIRECTIONS: [Pos; 4] = [
    Pos::new(1, 0),
    Pos::new(0, 1),
    Pos::new(1, 1),
    Pos::new(1, -1),
];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Ball(pub u8);

impl Ball {
    pub fn color(self) -> Color {
        PALETTE[self.0 as usize % PALETTE.len()]
    }
}

/// Result of clicking a cell.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Turn {
    Selected(Pos),
    Deselected,
    /// The selected ball travelled along `path`; `removed` balls were cleared by lines.
    Moved { path: Vec<Pos>, removed: usize },
    NoPath,
    Ignored,
}

/// Board state and rules of Color Lines.
#[derive(Clone, Debug)]
pub struct Lines {
    rules: LinesConfig,
    board: Grid<Option<Ball>>,
    next: Vec<Ball>,
    selected: Option<Pos>,
    score: u32,
    over: bool,
    rng: SmallRng,
}

impl Lines {
    pub fn new(rules: LinesConfig, seed: u64) -> Self {
        let mut game = Self {
            board: Grid::new(rules.size, rules.size),
            next: Vec::new(),
            selected: None,
            score: 0,
            over: false,
            rng: SmallRng::seed_from_u64(seed),
            rules,
        };
        game.next = game.roll(game.rules.initial);
        game.spawn();
        game
    }

    pub fn board(&self) -> &Grid<Option<Ball>> {
        &self.board
    }
    pub fn next(&self) -> &[Ball] {
        &self.next
    }
    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn is_over(&self) -> bool {
        self.over
    }

    fn roll(&mut self, n: usize) -> Vec<Ball> {
        let colors = self.rules.colors.max(1);
        (0..n)
            .map(|_| Ball(self.rng.gen_range(0..colors) as u8))
            .collect()
    }

    /// Puts the preview balls on random free cells and rolls a new preview.
    fn spawn(&mut self) -> usize {
        let balls = std::mem::take(&mut self.next);
        let mut placed = Vec::new();
        for ball in balls {
            let Some(&pos) = self.board.empty_cells().choose(&mut self.rng) else {
                break;
            };
            self.board[pos] = Some(ball);
            placed.push(pos);
        }
        let removed = self.remove_lines(&placed);
        self.next = self.roll(self.rules.spawn);
        if self.board.is_full() {
            self.over = true;
        }
        removed
    }

    pub fn click(&mut self, pos: Pos) -> Turn {
        if self.over || !self.board.contains(pos) {
            return Turn::Ignored;
        }
        if self.board[pos].is_some() {
            if self.selected == Some(pos) {
                self.selected = None;
                return Turn::Deselected;
            }
            self.selected = Some(pos);
            return Turn::Selected(pos);
        }
        let Some(from) = self.selected else {
            return Turn::Ignored;
        };
        let Some(path) = self.path(from, pos) else {
            return Turn::NoPath;
        };
        self.board[pos] = self.board[from].take();
        self.selected = None;
        let removed = self.remove_lines(&[pos]);
        if removed == 0 {
            self.spawn();
        }
        Turn::Moved { path, removed }
    }

    /// Shortest path through free cells, including both ends.
    pub fn path(&self, from: Pos, to: Pos) -> Option<Vec<Pos>> {
        if !self.board.contains(to) || self.board[to].is_some() {
            return None;
        }
        let mut prev = Grid::<Option<Pos>>::new(self.board.width(), self.board.height());
        let mut queue = VecDeque::from([from]);
        prev[from] = Some(from);
        while let Some(pos) = queue.pop_front() {
            if pos == to {
                let mut path = vec![to];
                let mut cur = to;
                while cur != from {
                    cur = prev[cur]?;
                    path.push(cur);
                }
                path.reverse();
                return Some(path);
            }
            for next in pos.neighbors() {
                if self.board.get(next) == Some(&None) && prev[next].is_none() {
                    prev[next] = Some(pos);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Cells of all lines long enough to be removed that pass through `pos`.
    pub fn lines_through(&self, pos: Pos) -> Vec<Pos> {
        let Some(Some(ball)) = self.board.get(pos) else {
            return Vec::new();
        };
        let same = |p: Pos| self.board.get(p) == Some(&Some(*ball));
        let mut cells = Vec::new();
        for dir in DIRECTIONS {
            let mut run = vec![pos];
            for step in [dir, -dir] {
                let mut p = pos + step;
                while same(p) {
                    run.push(p);
                    p += step;
                }
            }
            if run.len() >= self.rules.line {
                cells.extend(run);
            }
        }
        cells.into_iter().unique().collect()
    }

    fn remove_lines(&mut self, origins: &[Pos]) -> usize {
        let cells: Vec<_> = origins
            .iter()
            .flat_map(|&p| self.lines_through(p))
            .unique()
            .collect();
        for &p in &cells {
            self.board[p] = None;
        }
        let n = cells.len();
        self.score += (n * n.saturating_sub(3)) as u32;
        n
    }
}

#[derive(Deref, DerefMut)]
pub struct LinesGame {
    #[deref]
    #[deref_mut]
    lines: Lines,
    cursor: Pos,
}

impl LinesGame {
    pub fn new(rules: LinesConfig, seed: u64) -> Self {
        let center = (rules.size / 2) as i32;
        Self {
            lines: Lines::new(rules, seed),
            cursor: Pos::new(center, center),
        }
    }

    fn view(&self, rect: Rect) -> BoardView {
        let (_, field) = split_header(rect);
        BoardView::fit(field, self.board.width(), self.board.height())
    }
}

impl Game for LinesGame {
    fn update(&mut self, input: &Input, rect: Rect, _dt: Duration) -> Status {
        if input.key(KeyCode::Escape) {
            return Status::Finished;
        }
        if self.is_over() {
            if input.key(KeyCode::Enter) {
                let rules = self.lines.rules.clone();
                self.lines = Lines::new(rules, seed());
            }
            return Status::Running;
        }
        self.cursor = step_cursor(input, self.cursor, self.board.width(), self.board.height());
        if input.any_key(&[KeyCode::Enter, KeyCode::Space]) {
            let cursor = self.cursor;
            self.click(cursor);
        }
        if let Some(pos) = input.click().and_then(|p| self.view(rect).cell_at(p)) {
            self.cursor = pos;
            self.click(pos);
        }
        Status::Running
    }

    fn draw(&self, rect: Rect, font: Option<&Font>) {
        let (header, _) = split_header(rect);
        draw_header(header, &format!("Score: {}", self.score()), "Next:", font);
        let size = header.h * 0.8;
        for (i, ball) in self.next().iter().enumerate() {
            let x = header.center().x + (i as f32 - self.next().len() as f32 / 2.0) * size;
            draw_ball(
                Rect::new(x, header.center().y - size / 2.0, size, size),
                ball.color(),
                false,
            );
        }

        let view = self.view(rect);
        for (pos, cell) in self.board.iter() {
            let r = view.cell_rect(pos);
            draw_rectangle(r.x, r.y, r.w, r.h, Color::new(0.15, 0.15, 0.18, 1.0));
            draw_rectangle_lines(r.x, r.y, r.w, r.h, 2.0, color::BLACK);
            if let Some(ball) = cell {
                draw_ball(r, ball.color(), self.selected() == Some(pos));
            }
        }
        draw_cursor(view.cell_rect(self.cursor));

        if self.is_over() {
            draw_banner(
                view.rect,
                &format!("Game over: {}", self.score()),
                "Enter to play again, Esc for menu",
                font,
            );
        }
    }
}

pub struct Builder {
    rules: LinesConfig,
}

impl Builder {
    pub fn new(rules: LinesConfig) -> Self {
        Self { rules }
    }
}

impl GameBuilder for Builder {
    fn name(&self) -> &str {
        "Color Lines"
    }
    fn icon(&self) -> Icon {
        Icon::new(IconShape::Balls, color::RED)
    }
    fn build(&self) -> Box<dyn Game> {
        Box::new(LinesGame::new(self.rules.clone(), seed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Lines {
        let mut game = Lines::new(LinesConfig::default(), 1);
        game.board.clear();
        game
    }

    fn count(game: &Lines) -> usize {
        game.board.iter().filter(|(_, c)| c.is_some()).count()
    }

    #[test]
    fn initial_board() {
        let rules = LinesConfig::default();
        let game = Lines::new(rules.clone(), 42);
        assert_eq!(count(&game), rules.initial);
        assert_eq!(game.next().len(), rules.spawn);
        assert_eq!(game.score(), 0);
        assert!(!game.is_over());
    }

    #[test]
    fn horizontal_line_removed() {
        let mut game = empty();
        for x in 0..4 {
            game.board[Pos::new(x, 0)] = Some(Ball(0));
        }
        game.board[Pos::new(4, 5)] = Some(Ball(0));

        assert_eq!(game.click(Pos::new(4, 5)), Turn::Selected(Pos::new(4, 5)));
        match game.click(Pos::new(4, 0)) {
            Turn::Moved { path, removed } => {
                assert_eq!(removed, 5);
                assert_eq!(path.first(), Some(&Pos::new(4, 5)));
                assert_eq!(path.last(), Some(&Pos::new(4, 0)));
                assert_eq!(path.len(), 6);
            }
            turn => panic!("unexpected {turn:?}"),
        }
        assert_eq!(game.score(), 10);
        assert_eq!(count(&game), 0);
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn long_diagonal_scores_more() {
        let mut game = empty();
        for i in [0, 1, 2, 4, 5] {
            game.board[Pos::new(i, i)] = Some(Ball(3));
        }
        game.board[Pos::new(3, 8)] = Some(Ball(3));
        game.click(Pos::new(3, 8));
        assert!(matches!(
            game.click(Pos::new(3, 3)),
            Turn::Moved { removed: 6, .. }
        ));
        assert_eq!(game.score(), 18);
    }

    #[test]
    fn different_colors_do_not_form_line() {
        let mut game = empty();
        for x in 0..4 {
            game.board[Pos::new(x, 0)] = Some(Ball(0));
        }
        game.board[Pos::new(4, 5)] = Some(Ball(1));
        game.click(Pos::new(4, 5));
        assert!(matches!(
            game.click(Pos::new(4, 0)),
            Turn::Moved { removed: 0, .. }
        ));
        assert_eq!(game.board[Pos::new(4, 0)], Some(Ball(1)));
    }

    #[test]
    fn move_without_line_spawns() {
        let mut game = empty();
        game.board[Pos::new(0, 0)] = Some(Ball(2));
        game.click(Pos::new(0, 0));
        assert!(matches!(
            game.click(Pos::new(8, 8)),
            Turn::Moved { removed: 0, .. }
        ));
        assert_eq!(count(&game), 1 + LinesConfig::default().spawn);
        assert_eq!(game.next().len(), LinesConfig::default().spawn);
    }

    #[test]
    fn blocked_target() {
        let mut game = empty();
        game.board[Pos::new(1, 0)] = Some(Ball(0));
        game.board[Pos::new(0, 1)] = Some(Ball(1));
        game.board[Pos::new(5, 5)] = Some(Ball(2));
        game.click(Pos::new(5, 5));
        assert_eq!(game.path(Pos::new(5, 5), Pos::new(0, 0)), None);
        assert_eq!(game.click(Pos::new(0, 0)), Turn::NoPath);
        assert_eq!(game.selected(), Some(Pos::new(5, 5)));
        assert_eq!(count(&game), 3);
    }

    #[test]
    fn reselect_and_deselect() {
        let mut game = empty();
        game.board[Pos::new(1, 1)] = Some(Ball(0));
        game.board[Pos::new(2, 2)] = Some(Ball(1));
        assert_eq!(game.click(Pos::new(2, 2)), Turn::Selected(Pos::new(2, 2)));
        assert_eq!(game.click(Pos::new(1, 1)), Turn::Selected(Pos::new(1, 1)));
        assert_eq!(game.click(Pos::new(1, 1)), Turn::Deselected);
        assert_eq!(game.click(Pos::new(4, 4)), Turn::Ignored);
    }

    #[test]
    fn full_board_ends_game() {
        let mut game = empty();
        fill_pattern(&mut game, |pos| pos == Pos::new(0, 0));
        game.click(Pos::new(1, 0));
        assert!(matches!(
            game.click(Pos::new(0, 0)),
            Turn::Moved { removed: 0, .. }
        ));
        assert!(game.is_over());
        assert_eq!(game.click(Pos::new(2, 0)), Turn::Ignored);
    }

    /// Fills every cell except the skipped ones so that no two neighbors share a color.
    fn fill_pattern(game: &mut Lines, skip: impl Fn(Pos) -> bool) {
        for pos in game.board.positions().collect::<Vec<_>>() {
            if !skip(pos) {
                game.board[pos] = Some(Ball(((pos.x + 2 * pos.y) % 7) as u8));
            }
        }
    }

    #[test]
    fn spawned_ball_completes_line() {
        let mut game = empty();
        let gap = Pos::new(4, 0);
        fill_pattern(&mut game, |pos| pos == gap);
        for x in 0..4 {
            game.board[Pos::new(x, 0)] = Some(Ball(0));
        }
        game.next = vec![Ball(0)];

        assert_eq!(game.spawn(), 5);
        assert_eq!(game.score(), 10);
        for x in 0..5 {
            assert_eq!(game.board[Pos::new(x, 0)], None);
        }
        assert_eq!(game.board.empty_cells().len(), 5);
        assert!(!game.is_over());
        assert_eq!(game.next().len(), LinesConfig::default().spawn);
    }

    const RECT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 100.0,
        h: 100.0,
    };

    fn empty_game() -> LinesGame {
        let mut game = LinesGame::new(LinesConfig::default(), 1);
        game.lines = empty();
        game
    }

    fn press(game: &mut LinesGame, keys: &[KeyCode]) -> Status {
        game.update(&Input::with_keys(keys), RECT, Duration::ZERO)
    }

    #[test]
    fn cursor_moves_and_selects() {
        let mut game = empty_game();
        game.board[Pos::new(5, 4)] = Some(Ball(2));

        press(&mut game, &[KeyCode::Right]);
        assert_eq!(game.cursor, Pos::new(5, 4));
        assert_eq!(game.selected(), None);
        press(&mut game, &[KeyCode::Enter]);
        assert_eq!(game.selected(), Some(Pos::new(5, 4)));

        press(&mut game, &[KeyCode::Down]);
        press(&mut game, &[KeyCode::Space]);
        assert_eq!(game.selected(), None);
        assert_eq!(game.board[Pos::new(5, 5)], Some(Ball(2)));
        assert_eq!(count(&game), 1 + LinesConfig::default().spawn);
    }

    #[test]
    fn enter_restarts_after_game_over() {
        let mut game = empty_game();
        fill_pattern(&mut game, |pos| pos == Pos::new(0, 0));
        game.lines.score = 40;
        game.cursor = Pos::new(1, 0);

        press(&mut game, &[KeyCode::Enter]);
        assert_eq!(game.selected(), Some(Pos::new(1, 0)));
        press(&mut game, &[KeyCode::Left, KeyCode::Enter]);
        assert!(game.is_over());
        press(&mut game, &[KeyCode::Space]);
        assert!(game.is_over());

        assert_eq!(press(&mut game, &[KeyCode::Enter]), Status::Running);
        assert!(!game.is_over());
        assert_eq!(game.score(), 0);
        assert_eq!(game.selected(), None);
        assert_eq!(count(&game), LinesConfig::default().initial);
    }
}
