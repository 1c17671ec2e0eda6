mod direction;
mod snake;
pub(crate) use self::direction::Direction;
use self::snake::Snake;
use crate::consts;
use rand::{
    distr::{Bernoulli, Distribution},
    seq::IteratorRandom,
    Rng,
};
use ratatui::layout::{Position, Rect, Size};

/// The state of a single game of Snake: the board, the snake, the food & any
/// power-up, and the score.
///
/// A `Game` knows nothing about time.  It is moved forwards one step at a
/// time by [`Game::advance()`], and the caller is responsible for expiring
/// power-ups by calling [`Game::expire_powerup()`].
#[derive(Clone, Debug)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    rng: R,
    grid_size: u16,
    snake: Snake,
    /// The direction the snake will move in on the next tick
    next_direction: Direction,
    food: Option<Position>,
    powerup: Option<PowerUp>,
    next_powerup_id: u64,
    powerup_chance: Bernoulli,
    score: u32,
    ending: Option<Ending>,
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(grid_size: u16, rng: R) -> Game<R> {
        let snake = Snake::starting(grid_size);
        let powerup_chance = Bernoulli::new(consts::POWERUP_CHANCE)
            .expect("POWERUP_CHANCE should be between 0 and 1");
        let mut game = Game {
            rng,
            grid_size,
            next_direction: snake.direction,
            snake,
            food: None,
            powerup: None,
            next_powerup_id: 0,
            powerup_chance,
            score: 0,
            ending: None,
        };
        game.reset();
        game
    }

    /// Throw away the current game and set up a new one on the same board.
    /// Power-up IDs keep counting up from where they left off.
    pub(crate) fn reset(&mut self) {
        self.snake = Snake::starting(self.grid_size);
        self.next_direction = self.snake.direction;
        self.powerup = None;
        self.score = 0;
        self.food = random_free_cell(&mut self.rng, self.grid_size, &self.snake, None);
        self.ending = self.food.is_none().then_some(Ending::BoardFull);
    }

    /// Move the game forwards by one tick.
    ///
    /// Collisions are checked against the snake as it was before moving, so
    /// moving onto the cell the tail currently occupies is fatal even though
    /// the tail would have left it on this very tick.
    pub(crate) fn advance(&mut self) -> Advance {
        if let Some(ending) = self.ending {
            return Advance::Ended(ending);
        }
        self.snake.direction = self.next_direction;
        let Some(head) = self
            .snake
            .direction
            .advance(self.snake.head(), self.grid_size)
        else {
            return self.end(Ending::Wall);
        };
        if self.snake.contains(head) {
            return self.end(Ending::Bitten);
        }
        self.snake.push_head(head);
        if self.food == Some(head) {
            self.score += consts::FOOD_POINTS;
            self.food = random_free_cell(
                &mut self.rng,
                self.grid_size,
                &self.snake,
                self.powerup.map(|p| p.position),
            );
            if self.food.is_none() {
                return self.end(Ending::BoardFull);
            }
            Advance::AteFood {
                powerup: self.maybe_spawn_powerup(),
            }
        } else if self.powerup.is_some_and(|p| p.position == head) {
            self.score += consts::POWERUP_BONUS;
            self.powerup = None;
            Advance::AtePowerUp
        } else {
            self.snake.drop_tail();
            Advance::Moved
        }
    }

    fn maybe_spawn_powerup(&mut self) -> Option<PowerUp> {
        if self.powerup.is_some() || !self.powerup_chance.sample(&mut self.rng) {
            return None;
        }
        let position = random_free_cell(&mut self.rng, self.grid_size, &self.snake, self.food)?;
        let powerup = PowerUp {
            id: PowerUpId(self.next_powerup_id),
            position,
        };
        self.next_powerup_id += 1;
        self.powerup = Some(powerup);
        Some(powerup)
    }
}

impl<R> Game<R> {
    /// Buffer a change of direction to take effect on the next tick.  The
    /// change is ignored (and `false` returned) unless it is perpendicular
    /// to the direction the snake moved in on the last tick.
    pub(crate) fn steer(&mut self, direction: Direction) -> bool {
        if self.snake.direction.can_turn_to(direction) {
            self.next_direction = direction;
            true
        } else {
            false
        }
    }

    /// Remove the power-up with the given ID if it is still on the board.
    /// Returns `true` if something was removed.
    pub(crate) fn expire_powerup(&mut self, id: PowerUpId) -> bool {
        if self.powerup.is_some_and(|p| p.id == id) {
            self.powerup = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn is_game_over(&self) -> bool {
        self.ending.is_some()
    }

    pub(crate) fn ending(&self) -> Option<Ending> {
        self.ending
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn grid_size(&self) -> u16 {
        self.grid_size
    }

    pub(crate) fn snake_head(&self) -> Position {
        self.snake.head()
    }

    pub(crate) fn snake_body(&self) -> impl Iterator<Item = Position> + '_ {
        self.snake.body()
    }

    pub(crate) fn food(&self) -> Option<Position> {
        self.food
    }

    pub(crate) fn powerup(&self) -> Option<PowerUp> {
        self.powerup
    }

    fn end(&mut self, ending: Ending) -> Advance {
        self.ending = Some(ending);
        Advance::Ended(ending)
    }
}

/// Pick a cell uniformly at random from those not occupied by `snake` or
/// `avoid`.  Random probing is tried first; if that keeps hitting occupied
/// cells, the free cells are enumerated instead.  Returns `None` if there
/// are no free cells.
fn random_free_cell<R: Rng>(
    rng: &mut R,
    grid_size: u16,
    snake: &Snake,
    avoid: Option<Position>,
) -> Option<Position> {
    let is_free = |p: Position| !snake.contains(p) && Some(p) != avoid;
    for _ in 0..consts::MAX_SPAWN_ATTEMPTS {
        let p = Position::new(rng.random_range(0..grid_size), rng.random_range(0..grid_size));
        if is_free(p) {
            return Some(p);
        }
    }
    Rect::from((Position::ORIGIN, Size::new(grid_size, grid_size)))
        .positions()
        .filter(|&p| is_free(p))
        .choose(rng)
}

/// A bonus item worth [`POWERUP_BONUS`][consts::POWERUP_BONUS] points that
/// disappears if not eaten in time
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PowerUp {
    pub(crate) id: PowerUpId,
    pub(crate) position: Position,
}

/// Identifies a power-up within a game, so that an expiry meant for one
/// power-up can never remove a later one
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PowerUpId(u64);

/// What happened on a tick
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Advance {
    /// The snake moved without eating anything
    Moved,

    /// The snake ate the food and grew.  If eating it caused a power-up to
    /// appear, that power-up is given here.
    AteFood { powerup: Option<PowerUp> },

    /// The snake ate the power-up and grew
    AtePowerUp,

    /// The game is over
    Ended(Ending),
}

/// Why a game ended
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Ending {
    /// The snake ran into a wall
    Wall,

    /// The snake ran into itself
    Bitten,

    /// There is nowhere left to put food.  Food never shares a cell with the
    /// power-up, so this also happens when the only cell not covered by the
    /// snake holds the power-up.
    BoardFull,
}

impl Ending {
    /// Did the snake's head run into something?
    pub(crate) fn is_collision(self) -> bool {
        matches!(self, Ending::Wall | Ending::Bitten)
    }
}

#[cfg(test)]
impl<R> Game<R> {
    pub(crate) fn set_food(&mut self, pos: Position) {
        self.food = Some(pos);
    }

    pub(crate) fn set_powerup_chance(&mut self, p: f64) {
        self.powerup_chance = Bernoulli::new(p).expect("probability should be between 0 and 1");
    }

    pub(crate) fn set_powerup(&mut self, powerup: PowerUp) {
        self.powerup = Some(powerup);
    }

    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    pub(crate) fn set_snake(
        &mut self,
        cells: std::collections::VecDeque<Position>,
        direction: Direction,
    ) {
        self.snake = Snake { cells, direction };
        self.next_direction = direction;
    }
}
