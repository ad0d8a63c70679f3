use super::{
    board::{Grid, Pos},
    draw_banner, draw_header, seed, split_header, Phase, PALETTE, PAUSE_KEYS,
};
use crate::{
    config::TetrisConfig,
    icon::{Icon, IconShape},
    input::Input,
    layout::{self, BoardView},
    Game, GameBuilder, Status,
};
use derive_more::derive::{Deref, DerefMut};
use macroquad::{
    color::{self, Color},
    input::KeyCode,
    math::Rect,
    shapes::{draw_rectangle, draw_rectangle_lines},
    text::Font,
};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use std::time::Duration;

/// Score for clearing 0..=4 rows at once, multiplied by level.
const ROW_SCORES: [u32; 5] = [0, 100, 300, 500, 800];
const ROWS_PER_LEVEL: u32 = 10;
/// Horizontal offsets tried when a rotation collides.
const KICKS: [i32; 5] = [0, -1, 1, -2, 2];
/// Gravity speedup per level.
const LEVEL_FACTOR: f64 = 0.85;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Kind {
    pub const ALL: [Kind; 7] = [Kind::I, Kind::O, Kind::T, Kind::S, Kind::Z, Kind::J, Kind::L];

    /// Side of the square the piece rotates in.
    fn box_size(self) -> i32 {
        match self {
            Kind::I => 4,
            Kind::O => 2,
            _ => 3,
        }
    }

    fn cells(self) -> [(i32, i32); 4] {
        match self {
            Kind::I => [(0, 1), (1, 1), (2, 1), (3, 1)],
            Kind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
            Kind::T => [(1, 0), (0, 1), (1, 1), (2, 1)],
            Kind::S => [(1, 0), (2, 0), (0, 1), (1, 1)],
            Kind::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
            Kind::J => [(0, 0), (0, 1), (1, 1), (2, 1)],
            Kind::L => [(2, 0), (0, 1), (1, 1), (2, 1)],
        }
    }

    pub fn color(self) -> Color {
        PALETTE[self as usize % PALETTE.len()]
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: Kind,
    /// Clockwise quarter turns.
    pub rotation: u8,
    /// Top left corner of the rotation box.
    pub pos: Pos,
}

impl Piece {
    pub fn new(kind: Kind, pos: Pos) -> Self {
        Self {
            kind,
            rotation: 0,
            pos,
        }
    }

    pub fn cells(&self) -> [Pos; 4] {
        let n = self.kind.box_size();
        self.kind.cells().map(|(mut x, mut y)| {
            for _ in 0..self.rotation % 4 {
                (x, y) = (n - 1 - y, x);
            }
            self.pos + Pos::new(x, y)
        })
    }

    fn moved(self, offset: Pos) -> Self {
        Self {
            pos: self.pos + offset,
            ..self
        }
    }

    fn rotated(self) -> Self {
        Self {
            rotation: (self.rotation + 1) % 4,
            ..self
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tetris {
    well: Grid<Option<Kind>>,
    piece: Piece,
    next: Kind,
    bag: Vec<Kind>,
    score: u32,
    rows: u32,
    over: bool,
    rng: SmallRng,
}

impl Tetris {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        let mut game = Self {
            well: Grid::new(width, height),
            piece: Piece::new(Kind::I, Pos::default()),
            next: Kind::I,
            bag: Vec::new(),
            score: 0,
            rows: 0,
            over: false,
            rng: SmallRng::seed_from_u64(seed),
        };
        game.next = game.draw_kind();
        game.spawn();
        game
    }

    pub fn well(&self) -> &Grid<Option<Kind>> {
        &self.well
    }
    pub fn piece(&self) -> &Piece {
        &self.piece
    }
    pub fn next(&self) -> Kind {
        self.next
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn rows(&self) -> u32 {
        self.rows
    }
    pub fn level(&self) -> u32 {
        1 + self.rows / ROWS_PER_LEVEL
    }
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Next kind from a shuffled bag holding each kind once.
    fn draw_kind(&mut self) -> Kind {
        if self.bag.is_empty() {
            self.bag = Kind::ALL.to_vec();
            self.bag.shuffle(&mut self.rng);
        }
        self.bag.pop().unwrap_or(Kind::T)
    }

    fn spawn(&mut self) {
        let kind = self.next;
        self.next = self.draw_kind();
        let x = (self.well.width() as i32 - kind.box_size()) / 2;
        self.piece = Piece::new(kind, Pos::new(x, 0));
        if !self.fits(&self.piece) {
            log::debug!("No room for {kind:?}, game over");
            self.over = true;
        }
    }

    pub fn fits(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .iter()
            .all(|&p| self.well.get(p) == Some(&None))
    }

    fn try_place(&mut self, piece: Piece) -> bool {
        if !self.over && self.fits(&piece) {
            self.piece = piece;
            true
        } else {
            false
        }
    }

    pub fn shift(&mut self, dx: i32) -> bool {
        self.try_place(self.piece.moved(Pos::new(dx, 0)))
    }

    pub fn rotate(&mut self) -> bool {
        let rotated = self.piece.rotated();
        KICKS
            .iter()
            .any(|&dx| self.try_place(rotated.moved(Pos::new(dx, 0))))
    }

    /// Moves the piece one row down, locking it when it cannot move. Returns rows cleared by the lock.
    pub fn tick(&mut self) -> Option<usize> {
        if self.over {
            return None;
        }
        if self.try_place(self.piece.moved(Pos::DOWN)) {
            None
        } else {
            Some(self.lock())
        }
    }

    /// Drops the piece to the bottom and locks it. Returns rows cleared.
    pub fn hard_drop(&mut self) -> usize {
        if self.over {
            return 0;
        }
        while self.try_place(self.piece.moved(Pos::DOWN)) {}
        self.lock()
    }

    /// Where the piece would land.
    pub fn ghost(&self) -> Piece {
        let mut ghost = self.piece;
        while self.fits(&ghost.moved(Pos::DOWN)) {
            ghost = ghost.moved(Pos::DOWN);
        }
        ghost
    }

    fn lock(&mut self) -> usize {
        for p in self.piece.cells() {
            self.well[p] = Some(self.piece.kind);
        }
        let cleared = self.clear_rows();
        self.rows += cleared as u32;
        self.score += ROW_SCORES[cleared.min(4)] * self.level();
        self.spawn();
        cleared
    }

    fn clear_rows(&mut self) -> usize {
        let (w, h) = (self.well.width() as i32, self.well.height() as i32);
        let rows: Vec<Vec<Option<Kind>>> = (0..h)
            .map(|y| (0..w).map(|x| self.well[Pos::new(x, y)]).collect::<Vec<_>>())
            .filter(|row| row.iter().any(Option::is_none))
            .collect();
        let cleared = h as usize - rows.len();
        if cleared == 0 {
            return 0;
        }
        self.well.clear();
        let top = cleared as i32;
        for (i, row) in rows.into_iter().enumerate() {
            for (x, cell) in row.into_iter().enumerate() {
                self.well[Pos::new(x as i32, top + i as i32)] = cell;
            }
        }
        cleared
    }
}

/// Key auto-repeat: fires on press, then periodically while held.
#[derive(Clone, Copy, Default, Debug)]
struct Repeat {
    held: Duration,
    fired: u32,
}

impl Repeat {
    const DELAY: Duration = Duration::from_millis(170);
    const PERIOD: Duration = Duration::from_millis(50);

    /// Number of times the action fires this frame.
    fn update(&mut self, pressed: bool, held: bool, dt: Duration) -> u32 {
        if pressed {
            *self = Self::default();
            return 1;
        }
        if !held {
            *self = Self::default();
            return 0;
        }
        self.held += dt;
        let due = match self.held.checked_sub(Self::DELAY) {
            Some(extra) => (extra.as_millis() / Self::PERIOD.as_millis()) as u32 + 1,
            None => 0,
        };
        let fire = due.saturating_sub(self.fired);
        self.fired = due;
        fire
    }
}

#[derive(Deref, DerefMut)]
pub struct TetrisGame {
    #[deref]
    #[deref_mut]
    tetris: Tetris,
    rules: TetrisConfig,
    phase: Phase,
    timer: Duration,
    left: Repeat,
    right: Repeat,
    down: Repeat,
}

impl TetrisGame {
    pub fn new(rules: TetrisConfig, seed: u64) -> Self {
        Self {
            tetris: Tetris::new(rules.width, rules.height, seed),
            rules,
            phase: Phase::Playing,
            timer: Duration::ZERO,
            left: Repeat::default(),
            right: Repeat::default(),
            down: Repeat::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Gravity interval at the current level.
    pub fn interval(&self) -> Duration {
        let ms = self.rules.step_ms as f64 * LEVEL_FACTOR.powi(self.level() as i32 - 1);
        Duration::from_millis((ms as u64).max(self.rules.min_step_ms))
    }

    fn restart(&mut self) {
        self.tetris = Tetris::new(self.rules.width, self.rules.height, seed());
        self.phase = Phase::Playing;
        self.timer = Duration::ZERO;
    }

    fn control(&mut self, input: &Input, dt: Duration) {
        for _ in 0..self.left.update(input.key(KeyCode::Left), input.held(KeyCode::Left), dt) {
            self.shift(-1);
        }
        for _ in 0..self.right.update(input.key(KeyCode::Right), input.held(KeyCode::Right), dt) {
            self.shift(1);
        }
        if input.any_key(&[KeyCode::Up, KeyCode::X]) {
            self.rotate();
        }
        for _ in 0..self.down.update(input.key(KeyCode::Down), input.held(KeyCode::Down), dt) {
            if self.tick().is_some() {
                self.timer = Duration::ZERO;
                break;
            }
        }
        if input.key(KeyCode::Space) {
            self.hard_drop();
            self.timer = Duration::ZERO;
        }
    }
}

impl Game for TetrisGame {
    fn update(&mut self, input: &Input, _rect: Rect, dt: Duration) -> Status {
        if input.key(KeyCode::Escape) {
            return Status::Finished;
        }
        match self.phase {
            Phase::Over => {
                if input.key(KeyCode::Enter) {
                    self.restart();
                }
                return Status::Running;
            }
            Phase::Paused => {
                if input.any_key(&PAUSE_KEYS) {
                    self.phase = Phase::Playing;
                }
                return Status::Running;
            }
            Phase::Playing => {
                if input.any_key(&PAUSE_KEYS) {
                    self.phase = Phase::Paused;
                    return Status::Running;
                }
            }
        }

        self.control(input, dt);
        self.timer += dt;
        while !self.is_over() && self.timer >= self.interval() {
            self.timer -= self.interval();
            self.tick();
        }
        if self.is_over() {
            log::debug!("Tetris over with {} rows", self.rows());
            self.phase = Phase::Over;
        }
        Status::Running
    }

    fn draw(&self, rect: Rect, font: Option<&Font>) {
        let (header, field) = split_header(rect);
        draw_header(
            header,
            &format!("Score: {}", self.score()),
            &format!("Level {}  Rows {}", self.level(), self.rows()),
            font,
        );

        let (w, h) = (self.well().width(), self.well().height());
        let view = BoardView::fit(layout::shrink(field, field.h / 40.0), w, h);
        draw_rectangle(
            view.rect.x,
            view.rect.y,
            view.rect.w,
            view.rect.h,
            Color::new(0.1, 0.1, 0.12, 1.0),
        );
        let block = |pos: Pos, c: Color| {
            let r = view.cell_rect(pos);
            draw_rectangle(r.x, r.y, r.w, r.h, c);
            draw_rectangle_lines(r.x, r.y, r.w, r.h, 2.0, color::BLACK);
        };
        for (pos, cell) in self.well().iter() {
            if let Some(kind) = cell {
                block(pos, kind.color());
            }
        }
        if !self.is_over() {
            let c = self.piece().kind.color();
            for pos in self.ghost().cells() {
                block(pos, Color::new(c.r, c.g, c.b, 0.25));
            }
            for pos in self.piece().cells() {
                block(pos, c);
            }
        }

        // Preview of the next piece to the right of the well.
        let s = view.cell_size();
        let origin = Pos::new(w as i32 + 1, 1);
        for pos in Piece::new(self.next(), Pos::default()).cells() {
            block(origin + pos, self.next().color());
        }
        let frame = Rect::new(view.rect.right() + s * 0.5, view.rect.y + s * 0.5, s * 5.0, s * 5.0);
        draw_rectangle_lines(frame.x, frame.y, frame.w, frame.h, 2.0, color::GRAY);

        match self.phase {
            Phase::Playing => (),
            Phase::Paused => draw_banner(view.rect, "Paused", "P to continue", font),
            Phase::Over => draw_banner(
                view.rect,
                &format!("Game over: {}", self.score()),
                "Enter to play again, Esc for menu",
                font,
            ),
        }
    }
}

pub struct Builder {
    rules: TetrisConfig,
}

impl Builder {
    pub fn new(rules: TetrisConfig) -> Self {
        Self { rules }
    }
}

impl GameBuilder for Builder {
    fn name(&self) -> &str {
        "Tetris"
    }
    fn icon(&self) -> Icon {
        Icon::new(IconShape::Blocks, color::PURPLE)
    }
    fn build(&self) -> Box<dyn Game> {
        Box::new(TetrisGame::new(self.rules.clone(), seed()))
    }
}
