use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{ConfigError, GameConfig, TickPolicy};
use crate::snake::{opposite, Direction, Snake};
use crate::{Cell, GridInt};

const INITIAL_SNAKE: [Cell; 3] = [(0, 0), (0, 1), (1, 1)];
const INITIAL_DIRECTION: Direction = Direction::Right;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfCollision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Crashed(Collision),
    /// The snake covers every cell, there is nowhere left for an apple.
    BoardFilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Over(Ending),
}

/// Everything the renderer needs to draw a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub apple: Cell,
    pub score: u32,
    pub width: GridInt,
    pub height: GridInt,
    /// Elapsed time not yet consumed by ticks.
    pub timer: Duration,
    /// Ticks per second.
    pub speed: u32,
}

impl GameState {
    pub fn in_bounds(&self, (x, y): Cell) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }
}

/// One round of snake: fixed-rate ticks, buffered turns, apples and collisions.
pub struct Game<R = ThreadRng> {
    state: GameState,
    queue: VecDeque<Direction>,
    status: Status,
    tick_interval: Duration,
    tick_policy: TickPolicy,
    rng: R,
}

impl Game<ThreadRng> {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        Game::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(config: &GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let snake = Snake::new(INITIAL_SNAKE, INITIAL_DIRECTION)
            .expect("initial snake is not empty");
        let state = GameState {
            snake,
            apple: (config.width / 2, config.height / 2),
            score: 0,
            width: config.width,
            height: config.height,
            timer: Duration::ZERO,
            speed: config.speed,
        };

        let mut game = Game {
            state,
            queue: VecDeque::new(),
            status: Status::Running,
            tick_interval: config.tick_interval(),
            tick_policy: config.tick_policy,
            rng,
        };

        // Only a 3x3 grid puts the centre under the initial snake
        if game.state.snake.occupies(game.state.apple) {
            game.place_apple();
        }

        info!("New game on a {}x{} grid at {} ticks/s", config.width, config.height, config.speed);
        Ok(game)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, Status::Over(_))
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn pending_directions(&self) -> usize {
        self.queue.len()
    }

    /// Buffers a turn for a later tick. Every call is kept, in order.
    pub fn enqueue_direction(&mut self, direction: Direction) {
        self.queue.push_back(direction);
    }

    /// Feeds elapsed real time into the game and runs the ticks it covers.
    pub fn on_tick(&mut self, dt: Duration) -> Status {
        if self.is_over() || dt.is_zero() {
            return self.status;
        }

        self.state.timer += dt;

        match self.tick_policy {
            TickPolicy::SingleStep => {
                if self.state.timer >= self.tick_interval {
                    self.state.timer -= self.tick_interval;
                    self.step();
                }
            }
            TickPolicy::CatchUp => {
                while !self.is_over() && self.state.timer >= self.tick_interval {
                    self.state.timer -= self.tick_interval;
                    self.step();
                }
            }
        }

        self.status
    }

    /// One discrete simulation step.
    fn step(&mut self) {
        if let Some(direction) = self.queue.pop_front() {
            if opposite(direction, self.state.snake.direction) {
                debug!("Discarding {:?}, it reverses {:?}", direction, self.state.snake.direction);
            } else {
                self.state.snake.direction = direction;
            }
        }

        self.state.snake.advance();

        if self.state.snake.head() == self.state.apple {
            self.state.score += 1;
            self.state.snake.extend = true;
            debug!("Apple eaten at {:?}, score {}", self.state.apple, self.state.score);
            if !self.place_apple() {
                self.finish(Ending::BoardFilled);
                return;
            }
        }

        if let Some(collision) = self.check_collision() {
            self.finish(Ending::Crashed(collision));
        }
    }

    fn check_collision(&self) -> Option<Collision> {
        if !self.state.in_bounds(self.state.snake.head()) {
            Some(Collision::Wall)
        } else if self.state.snake.bites_itself() {
            Some(Collision::SelfCollision)
        } else {
            None
        }
    }

    /// Moves the apple to a random free cell. Returns false if there is none.
    fn place_apple(&mut self) -> bool {
        let occupied: HashSet<Cell> = self.state.snake.cells().copied().collect();
        let choices: Vec<Cell> = (0..self.state.width)
            .flat_map(|x| (0..self.state.height).map(move |y| (x, y)))
            .filter(|cell| !occupied.contains(cell))
            .collect();

        match choices.choose(&mut self.rng) {
            Some(&apple) => {
                self.state.apple = apple;
                true
            }
            None => false,
        }
    }

    fn finish(&mut self, ending: Ending) {
        info!("Game over ({:?}) with score {}", ending, self.state.score);
        self.status = Status::Over(ending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TICK: Duration = Duration::from_millis(200);

    fn game(width: GridInt, height: GridInt) -> Game<StdRng> {
        Game::with_rng(&GameConfig::new(width, height), StdRng::seed_from_u64(7)).unwrap()
    }

    fn with_snake(g: &mut Game<StdRng>, cells: &[Cell], direction: Direction) {
        g.state.snake = Snake::new(cells.iter().copied(), direction).unwrap();
    }

    #[test]
    fn initial_state() {
        let g = game(12, 9);
        let cells: Vec<Cell> = g.state().snake.cells().copied().collect();

        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(g.state().snake.direction, Right);
        assert_eq!(g.state().apple, (6, 4));
        assert_eq!(g.score(), 0);
        assert_eq!(g.status(), Status::Running);
    }

    #[test]
    fn apple_avoids_snake_on_smallest_grid() {
        let g = game(3, 3);
        assert!(!g.state().snake.occupies(g.state().apple));
        assert!(g.state().in_bounds(g.state().apple));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GameConfig::new(2, 2);
        assert!(Game::with_rng(&config, StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut g = game(12, 9);
        let before = g.state().clone();

        assert_eq!(g.on_tick(Duration::ZERO), Status::Running);
        assert_eq!(g.state(), &before);
    }

    #[test]
    fn waits_for_a_full_interval() {
        let mut g = game(12, 9);

        g.on_tick(Duration::from_millis(150));
        assert_eq!(g.state().snake.head(), (1, 1));
        assert_eq!(g.state().timer, Duration::from_millis(150));

        g.on_tick(Duration::from_millis(60));
        assert_eq!(g.state().snake.head(), (2, 1));
        assert_eq!(g.state().timer, Duration::from_millis(10));
    }

    #[test]
    fn single_step_keeps_the_backlog() {
        let mut g = game(12, 9);

        g.on_tick(TICK * 3);
        assert_eq!(g.state().snake.head(), (2, 1));
        assert_eq!(g.state().timer, TICK * 2);

        g.on_tick(Duration::ZERO);
        assert_eq!(g.state().snake.head(), (2, 1));

        g.on_tick(Duration::from_millis(1));
        assert_eq!(g.state().snake.head(), (3, 1));
    }

    #[test]
    fn catch_up_runs_every_covered_tick() {
        let config = GameConfig { tick_policy: TickPolicy::CatchUp, ..GameConfig::new(12, 9) };
        let mut g = Game::with_rng(&config, StdRng::seed_from_u64(7)).unwrap();

        g.on_tick(TICK * 3 + Duration::from_millis(50));
        assert_eq!(g.state().snake.head(), (4, 1));
        assert_eq!(g.state().timer, Duration::from_millis(50));
    }

    #[test]
    fn catch_up_stops_at_game_over() {
        let config = GameConfig { tick_policy: TickPolicy::CatchUp, ..GameConfig::new(3, 3) };
        let mut g = Game::with_rng(&config, StdRng::seed_from_u64(7)).unwrap();
        g.state.apple = (0, 2);

        assert!(matches!(g.on_tick(TICK * 10), Status::Over(Ending::Crashed(Collision::Wall))));
        assert_eq!(g.state().snake.head(), (3, 1));
    }

    #[test]
    fn buffered_reversal_is_discarded() {
        let mut g = game(12, 9);
        g.state.apple = (11, 8);
        with_snake(&mut g, &[(3, 5), (4, 5), (5, 5)], Right);

        g.enqueue_direction(Up);
        g.enqueue_direction(Down);
        assert_eq!(g.pending_directions(), 2);

        g.on_tick(TICK);
        assert_eq!(g.state().snake.direction, Up);
        assert_eq!(g.state().snake.head(), (5, 4));

        g.on_tick(TICK);
        assert_eq!(g.state().snake.direction, Up);
        assert_eq!(g.state().snake.head(), (5, 3));
        assert_eq!(g.pending_directions(), 0);
    }

    #[test]
    fn two_quick_turns_both_apply() {
        let mut g = game(12, 9);
        g.state.apple = (11, 8);
        with_snake(&mut g, &[(3, 5), (4, 5), (5, 5)], Right);

        g.enqueue_direction(Down);
        g.enqueue_direction(Left);

        g.on_tick(TICK);
        g.on_tick(TICK);
        assert_eq!(g.state().snake.head(), (4, 6));
        assert_eq!(g.status(), Status::Running);
    }

    #[test]
    fn eating_grows_on_the_following_advance() {
        let mut g = game(12, 9);
        with_snake(&mut g, &[(2, 4), (3, 4), (4, 4)], Right);
        g.state.apple = (5, 4);

        g.on_tick(TICK);
        assert_eq!(g.score(), 1);
        assert_eq!(g.state().snake.len(), 3);
        assert!(g.state().snake.extend);
        assert!(!g.state().snake.occupies(g.state().apple));
        assert!(g.state().in_bounds(g.state().apple));

        g.state.apple = (0, 8);
        g.on_tick(TICK);
        assert_eq!(g.state().snake.len(), 4);
        assert!(!g.state().snake.extend);
    }

    #[test]
    fn wall_collision_ends_the_game() {
        let mut g = game(12, 9);
        with_snake(&mut g, &[(2, 3), (1, 3), (0, 3)], Left);

        assert_eq!(g.on_tick(TICK), Status::Over(Ending::Crashed(Collision::Wall)));
        assert_eq!(g.state().snake.head(), (-1, 3));
    }

    #[test]
    fn bottom_wall_collision() {
        let mut g = game(12, 9);
        with_snake(&mut g, &[(5, 6), (5, 7), (5, 8)], Down);

        assert_eq!(g.on_tick(TICK), Status::Over(Ending::Crashed(Collision::Wall)));
    }

    #[test]
    fn self_collision_ends_the_game() {
        let mut g = game(12, 9);
        with_snake(&mut g, &[(4, 4), (5, 4), (6, 4), (6, 5), (5, 5)], Left);
        g.enqueue_direction(Up);

        assert_eq!(g.on_tick(TICK), Status::Over(Ending::Crashed(Collision::SelfCollision)));
    }

    #[test]
    fn over_is_terminal() {
        let mut g = game(12, 9);
        with_snake(&mut g, &[(2, 3), (1, 3), (0, 3)], Left);
        g.on_tick(TICK);
        let after = g.state().clone();

        g.enqueue_direction(Down);
        assert!(g.is_over());
        assert_eq!(g.on_tick(TICK * 5), Status::Over(Ending::Crashed(Collision::Wall)));
        assert_eq!(g.state(), &after);
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        let mut g = game(3, 3);
        // Growing into the last free cell, which holds the apple
        with_snake(
            &mut g,
            &[(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1), (0, 2), (1, 2)],
            Right,
        );
        g.state.snake.extend = true;
        g.state.apple = (2, 2);

        assert_eq!(g.on_tick(TICK), Status::Over(Ending::BoardFilled));
        assert_eq!(g.score(), 1);
        assert_eq!(g.state().snake.len(), 9);
    }

    #[test]
    fn seeded_placement_is_deterministic() {
        let run = || {
            let mut g = game(12, 9);
            with_snake(&mut g, &[(2, 4), (3, 4), (4, 4)], Right);
            g.state.apple = (5, 4);
            g.on_tick(TICK);
            g.state().apple
        };

        assert_eq!(run(), run());
    }
}
