use super::{
    board::{Grid, Pos},
    draw_banner, draw_header, seed, split_header, Phase, PAUSE_KEYS,
};
use crate::{
    config::SnakeConfig,
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
    shapes::{draw_circle, draw_rectangle},
    text::Font,
};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use std::{collections::VecDeque, time::Duration};

const INITIAL_LENGTH: usize = 3;
/// Turns buffered ahead of the next step.
const MAX_QUEUED_TURNS: usize = 2;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Step {
    Moved,
    Ate,
    Crashed,
}

#[derive(Clone, Debug)]
pub struct Snake {
    width: usize,
    height: usize,
    /// Head first.
    body: VecDeque<Pos>,
    direction: Pos,
    turns: VecDeque<Pos>,
    food: Option<Pos>,
    eaten: u32,
    alive: bool,
    rng: SmallRng,
}

impl Snake {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        let y = (height / 2) as i32;
        let x = (width / 2) as i32;
        let body = (0..INITIAL_LENGTH as i32)
            .map(|i| Pos::new(x - i, y))
            .collect();
        let mut snake = Self {
            width,
            height,
            body,
            direction: Pos::RIGHT,
            turns: VecDeque::new(),
            food: None,
            eaten: 0,
            alive: true,
            rng: SmallRng::seed_from_u64(seed),
        };
        snake.place_food();
        snake
    }

    pub fn body(&self) -> &VecDeque<Pos> {
        &self.body
    }
    pub fn head(&self) -> Pos {
        self.body[0]
    }
    pub fn food(&self) -> Option<Pos> {
        self.food
    }
    pub fn eaten(&self) -> u32 {
        self.eaten
    }
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn place_food(&mut self) {
        let mut free = Grid::<bool>::new(self.width, self.height);
        for pos in free.positions().collect::<Vec<_>>() {
            free[pos] = true;
        }
        for &pos in &self.body {
            free[pos] = false;
        }
        let cells: Vec<_> = free
            .iter()
            .filter_map(|(pos, &f)| if f { Some(pos) } else { None })
            .collect();
        self.food = cells.choose(&mut self.rng).copied();
    }

    /// Queues a turn. Reversing into the body and repeating the current direction are ignored.
    pub fn turn(&mut self, dir: Pos) {
        let last = self.turns.back().copied().unwrap_or(self.direction);
        if dir == last || dir == -last || self.turns.len() >= MAX_QUEUED_TURNS {
            return;
        }
        self.turns.push_back(dir);
    }

    pub fn step(&mut self) -> Step {
        if !self.alive {
            return Step::Crashed;
        }
        if let Some(dir) = self.turns.pop_front() {
            self.direction = dir;
        }
        let head = self.head() + self.direction;
        let eats = self.food == Some(head);
        // The tail moves away this step unless the snake grows.
        let body_len = if eats { self.body.len() } else { self.body.len() - 1 };
        if !self.contains(head) || self.body.iter().take(body_len).any(|&p| p == head) {
            self.alive = false;
            return Step::Crashed;
        }
        self.body.push_front(head);
        if eats {
            self.eaten += 1;
            self.place_food();
            Step::Ate
        } else {
            self.body.pop_back();
            Step::Moved
        }
    }
}

#[derive(Deref, DerefMut)]
pub struct SnakeGame {
    #[deref]
    #[deref_mut]
    snake: Snake,
    rules: SnakeConfig,
    phase: Phase,
    timer: Duration,
}

impl SnakeGame {
    pub fn new(rules: SnakeConfig, seed: u64) -> Self {
        Self {
            snake: Snake::new(rules.width, rules.height, seed),
            rules,
            phase: Phase::Playing,
            timer: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current step interval, shortened by every eaten food.
    pub fn interval(&self) -> Duration {
        let ms = self
            .rules
            .step_ms
            .saturating_sub(self.rules.speedup_ms * self.eaten() as u64)
            .max(self.rules.min_step_ms);
        Duration::from_millis(ms)
    }

    fn restart(&mut self) {
        self.snake = Snake::new(self.rules.width, self.rules.height, seed());
        self.phase = Phase::Playing;
        self.timer = Duration::ZERO;
    }
}

impl Game for SnakeGame {
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

        for (keys, dir) in [
            ([KeyCode::Up, KeyCode::W], Pos::UP),
            ([KeyCode::Down, KeyCode::S], Pos::DOWN),
            ([KeyCode::Left, KeyCode::A], Pos::LEFT),
            ([KeyCode::Right, KeyCode::D], Pos::RIGHT),
        ] {
            if input.any_key(&keys) {
                self.turn(dir);
            }
        }

        self.timer += dt;
        while self.timer >= self.interval() {
            self.timer -= self.interval();
            if self.step() == Step::Crashed {
                log::debug!("Snake crashed with length {}", self.body().len());
                self.phase = Phase::Over;
                break;
            }
        }
        Status::Running
    }

    fn draw(&self, rect: Rect, font: Option<&Font>) {
        let (header, field) = split_header(rect);
        draw_header(
            header,
            &format!("Score: {}", self.eaten()),
            &format!("Length: {}", self.body().len()),
            font,
        );

        let view = BoardView::fit(field, self.rules.width, self.rules.height);
        draw_rectangle(
            view.rect.x,
            view.rect.y,
            view.rect.w,
            view.rect.h,
            Color::new(0.08, 0.12, 0.08, 1.0),
        );
        if let Some(food) = self.food() {
            let r = view.cell_rect(food);
            draw_circle(r.center().x, r.center().y, r.w * 0.4, color::RED);
        }
        for (i, &pos) in self.body().iter().enumerate() {
            let r = view.cell_rect(pos);
            let c = if i == 0 { color::LIME } else { color::GREEN };
            let pad = r.w * 0.05;
            draw_rectangle(r.x + pad, r.y + pad, r.w - 2.0 * pad, r.h - 2.0 * pad, c);
        }

        match self.phase {
            Phase::Playing => (),
            Phase::Paused => draw_banner(view.rect, "Paused", "P to continue", font),
            Phase::Over => draw_banner(
                view.rect,
                &format!("Game over: {}", self.eaten()),
                "Enter to play again, Esc for menu",
                font,
            ),
        }
    }
}

pub struct Builder {
    rules: SnakeConfig,
}

impl Builder {
    pub fn new(rules: SnakeConfig) -> Self {
        Self { rules }
    }
}

impl GameBuilder for Builder {
    fn name(&self) -> &str {
        "Snake"
    }
    fn icon(&self) -> Icon {
        Icon::new(IconShape::Snake, color::GREEN)
    }
    fn build(&self) -> Box<dyn Game> {
        Box::new(SnakeGame::new(self.rules.clone(), seed()))
    }
}
