use super::{
    board::{Grid, Pos},
    draw_ball, draw_banner, draw_cursor, draw_header,
    lines::Ball,
    seed, split_header, step_cursor,
};
use crate::{
    config::ClickLinesConfig,
    icon::{Icon, IconShape},
    input::Input,
    layout::BoardView,
    Game, GameBuilder, Status,
};
use derive_more::derive::{Deref, DerefMut};
use macroquad::{
    color::{self, Color},
    input::KeyCode,
    math::Rect,
    shapes::draw_rectangle,
    text::Font,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::time::Duration;

/// Score for emptying the whole board.
pub const CLEAR_BONUS: u32 = 100;

/// Board where clicking a group of touching same-colored balls removes it.
#[derive(Clone, Debug)]
pub struct ClickLines {
    rules: ClickLinesConfig,
    board: Grid<Option<Ball>>,
    score: u32,
    over: bool,
}

impl ClickLines {
    pub fn new(rules: ClickLinesConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = Grid::new(rules.width, rules.height);
        let colors = rules.colors.max(1);
        for pos in board.positions().collect::<Vec<_>>() {
            board[pos] = Some(Ball(rng.gen_range(0..colors) as u8));
        }
        Self::with_board(rules, board)
    }

    fn with_board(rules: ClickLinesConfig, board: Grid<Option<Ball>>) -> Self {
        let mut game = Self {
            rules,
            board,
            score: 0,
            over: false,
        };
        game.over = !game.has_moves();
        game
    }

    pub fn board(&self) -> &Grid<Option<Ball>> {
        &self.board
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Balls 4-connected to `pos` having the same color, `pos` included.
    pub fn group(&self, pos: Pos) -> Vec<Pos> {
        let Some(&Some(ball)) = self.board.get(pos) else {
            return Vec::new();
        };
        let mut seen = Grid::<bool>::new(self.board.width(), self.board.height());
        let mut stack = vec![pos];
        let mut group = Vec::new();
        seen[pos] = true;
        while let Some(p) = stack.pop() {
            group.push(p);
            for n in p.neighbors() {
                if self.board.get(n) == Some(&Some(ball)) && !seen[n] {
                    seen[n] = true;
                    stack.push(n);
                }
            }
        }
        group
    }

    pub fn has_moves(&self) -> bool {
        self.board.iter().any(|(pos, cell)| {
            cell.is_some()
                && pos
                    .neighbors()
                    .into_iter()
                    .any(|n| self.board.get(n) == Some(cell))
        })
    }

    /// Removes the group under `pos` if it has at least two balls. Returns the number removed.
    pub fn click(&mut self, pos: Pos) -> usize {
        if self.over {
            return 0;
        }
        let group = self.group(pos);
        if group.len() < 2 {
            return 0;
        }
        for &p in &group {
            self.board[p] = None;
        }
        let n = group.len() as u32;
        self.score += (n - 1).pow(2);
        self.settle();

        if self.board.is_empty() {
            self.score += CLEAR_BONUS;
            self.over = true;
        } else if !self.has_moves() {
            self.over = true;
        }
        group.len()
    }

    /// Drops balls to the bottom of their columns and shifts empty columns out to the right.
    fn settle(&mut self) {
        let (w, h) = (self.board.width() as i32, self.board.height() as i32);
        let columns: Vec<Vec<Ball>> = (0..w)
            .map(|x| {
                (0..h)
                    .rev()
                    .filter_map(|y| self.board[Pos::new(x, y)])
                    .collect::<Vec<_>>()
            })
            .filter(|column| !column.is_empty())
            .collect();
        self.board.clear();
        for (x, column) in columns.into_iter().enumerate() {
            for (i, ball) in column.into_iter().enumerate() {
                self.board[Pos::new(x as i32, h - 1 - i as i32)] = Some(ball);
            }
        }
    }
}

#[derive(Deref, DerefMut)]
pub struct ClickLinesGame {
    #[deref]
    #[deref_mut]
    game: ClickLines,
    cursor: Pos,
}

impl ClickLinesGame {
    pub fn new(rules: ClickLinesConfig, seed: u64) -> Self {
        Self {
            game: ClickLines::new(rules, seed),
            cursor: Pos::default(),
        }
    }

    fn view(&self, rect: Rect) -> BoardView {
        let (_, field) = split_header(rect);
        BoardView::fit(field, self.board.width(), self.board.height())
    }
}

impl Game for ClickLinesGame {
    fn update(&mut self, input: &Input, rect: Rect, _dt: Duration) -> Status {
        if input.key(KeyCode::Escape) {
            return Status::Finished;
        }
        if self.is_over() {
            if input.key(KeyCode::Enter) {
                let rules = self.game.rules.clone();
                self.game = ClickLines::new(rules, seed());
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
        let group = self.group(self.cursor);
        let hint = if group.len() >= 2 {
            format!("+{}", (group.len() - 1).pow(2))
        } else {
            String::new()
        };
        draw_header(header, &format!("Score: {}", self.score()), &hint, font);

        let view = self.view(rect);
        draw_rectangle(
            view.rect.x,
            view.rect.y,
            view.rect.w,
            view.rect.h,
            Color::new(0.12, 0.12, 0.15, 1.0),
        );
        for (pos, cell) in self.board.iter() {
            if let Some(ball) = cell {
                draw_ball(view.cell_rect(pos), ball.color(), group.contains(&pos));
            }
        }
        draw_cursor(view.cell_rect(self.cursor));

        if self.is_over() {
            let title = if self.board.is_empty() {
                format!("Cleared! {}", self.score())
            } else {
                format!("No moves: {}", self.score())
            };
            draw_banner(view.rect, &title, "Enter to play again, Esc for menu", font);
        }
    }
}

pub struct Builder {
    rules: ClickLinesConfig,
}

impl Builder {
    pub fn new(rules: ClickLinesConfig) -> Self {
        Self { rules }
    }
}

impl GameBuilder for Builder {
    fn name(&self) -> &str {
        "Click Lines"
    }
    fn icon(&self) -> Icon {
        Icon::new(IconShape::Cluster, color::SKYBLUE)
    }
    fn build(&self) -> Box<dyn Game> {
        Box::new(ClickLinesGame::new(self.rules.clone(), seed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Digits are ball colors, `.` is an empty cell. The first row is the top one.
    fn parse(rows: &[&str]) -> ClickLines {
        let (w, h) = (rows[0].len(), rows.len());
        let mut board = Grid::new(w, h);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                board[Pos::new(x as i32, y as i32)] = c.to_digit(10).map(|d| Ball(d as u8));
            }
        }
        let rules = ClickLinesConfig {
            width: w,
            height: h,
            ..Default::default()
        };
        ClickLines::with_board(rules, board)
    }

    fn render(game: &ClickLines) -> Vec<String> {
        let board = game.board();
        (0..board.height() as i32)
            .map(|y| {
                (0..board.width() as i32)
                    .map(|x| match board[Pos::new(x, y)] {
                        Some(Ball(c)) => char::from(b'0' + c),
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn new_board_is_full() {
        let rules = ClickLinesConfig::default();
        let game = ClickLines::new(rules.clone(), 7);
        assert!(game.board().is_full());
        assert_eq!(game.board().width(), rules.width);
    }

    #[test]
    fn group_and_gravity() {
        let mut game = parse(&["01", "00", "12"]);
        let mut group = game.group(Pos::new(0, 1));
        group.sort_by_key(|p| (p.y, p.x));
        assert_eq!(group, vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(1, 1)]);

        assert_eq!(game.click(Pos::new(0, 1)), 3);
        assert_eq!(game.score(), 4);
        assert_eq!(render(&game), ["..", ".1", "12"]);
        assert!(game.is_over());
        assert!(!game.board().is_empty());
    }

    #[test]
    fn empty_column_collapses() {
        let mut game = parse(&["010", "010"]);
        assert_eq!(game.click(Pos::new(1, 0)), 2);
        assert_eq!(render(&game), ["00.", "00."]);
        assert_eq!(game.score(), 1);
        assert!(!game.is_over());

        assert_eq!(game.click(Pos::new(0, 1)), 4);
        assert!(game.board().is_empty());
        assert_eq!(game.score(), 1 + 9 + CLEAR_BONUS);
        assert!(game.is_over());
    }

    #[test]
    fn lone_ball_stays() {
        let mut game = parse(&["01", "10"]);
        assert!(game.is_over());
        let mut game = parse(&["011", "100"]);
        assert_eq!(game.click(Pos::new(0, 0)), 0);
        assert_eq!(game.click(Pos::new(2, 2)), 0);
        assert_eq!(game.score(), 0);
        assert_eq!(render(&game), ["011", "100"]);
    }

    #[test]
    fn keyboard_clears_then_enter_restarts() {
        let mut game = ClickLinesGame {
            game: parse(&["010", "010"]),
            cursor: Pos::new(1, 0),
        };
        let rect = Rect::new(0.0, 0.0, 300.0, 200.0);
        let mut press = |keys: &[KeyCode]| {
            game.update(&Input::with_keys(keys), rect, Duration::ZERO);
        };
        press(&[KeyCode::Enter]);
        press(&[KeyCode::Down, KeyCode::Space]);
        assert!(game.board().is_empty());
        assert!(game.is_over());
        assert_eq!(game.score(), 1 + 9 + CLEAR_BONUS);

        game.update(&Input::with_keys(&[KeyCode::Enter]), rect, Duration::ZERO);
        assert_eq!(game.score(), 0);
        assert!(game.board().is_full());
        assert_eq!((game.board().width(), game.board().height()), (3, 2));
    }
}
