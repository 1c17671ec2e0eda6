//! The lifecycle of a play session: starting, pausing, counting down to
//! resume, game over & restart
//!
//! A [`Session`] owns the [`Game`], the [`Clock`] that drives it, the
//! selected [`Difficulty`], and the persistent [`Stats`].  It never reads
//! the system time or touches the disk; the caller passes in the current
//! `Instant` and collects changed stats with [`Session::take_unsaved_stats()`].
use crate::clock::{Clock, Timer};
use crate::consts;
use crate::difficulty::Difficulty;
use crate::game::{Advance, Direction, Game, PowerUpId};
use crate::stats::Stats;
use crate::util::EnumExt;
use rand::Rng;
use std::time::Instant;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SessionState {
    /// Waiting for the first game to be started
    Idle,

    /// The snake is moving
    Running,

    /// Movement is suspended until the player asks to resume
    Paused,

    /// Resuming after a pause; the number is the one currently displayed
    CountingDown(u8),

    /// The game has ended and is waiting to be restarted
    GameOver,
}

#[derive(Clone, Debug)]
pub(crate) struct Session<R = rand::rngs::ThreadRng> {
    game: Game<R>,
    state: SessionState,
    clock: Clock,
    difficulty: Difficulty,
    stats: Stats,
    /// The power-up that the armed [`Timer::PowerUpExpiry`] will remove
    expiring: Option<PowerUpId>,
    stats_dirty: bool,
}

impl Session<rand::rngs::ThreadRng> {
    pub(crate) fn new(grid_size: u16, difficulty: Difficulty, stats: Stats) -> Self {
        Session::new_with_rng(grid_size, difficulty, stats, rand::rng())
    }
}

impl<R: Rng> Session<R> {
    pub(crate) fn new_with_rng(
        grid_size: u16,
        difficulty: Difficulty,
        stats: Stats,
        rng: R,
    ) -> Session<R> {
        Session {
            game: Game::new_with_rng(grid_size, rng),
            state: SessionState::Idle,
            clock: Clock::new(),
            difficulty,
            stats,
            expiring: None,
            stats_dirty: false,
        }
    }

    /// Begin the first game
    pub(crate) fn start(&mut self, now: Instant) {
        if self.state == SessionState::Idle && !self.game.is_game_over() {
            log::info!("Starting game at difficulty {}", self.difficulty);
            self.state = SessionState::Running;
            self.arm_tick(now);
        }
    }

    /// Start a new game after the previous one has ended.  This skips the
    /// countdown.
    pub(crate) fn restart(&mut self, now: Instant) {
        if self.state != SessionState::GameOver {
            return;
        }
        self.game.reset();
        self.cancel_expiry();
        self.stats.record_restart();
        self.stats_dirty = true;
        log::info!("Restarting; {} games played so far", self.stats.games_played);
        self.state = SessionState::Running;
        self.arm_tick(now);
    }

    /// Pause a running game, or begin the countdown to resume a paused one
    pub(crate) fn toggle_pause(&mut self, now: Instant) {
        match self.state {
            SessionState::Running => self.pause(),
            SessionState::Paused => {
                log::info!("Resuming");
                self.state = SessionState::CountingDown(consts::COUNTDOWN_START);
                self.clock.once(Timer::Countdown, now, consts::COUNTDOWN_STEP);
            }
            _ => (),
        }
    }

    /// Pause the game if it's running because the terminal has lost focus
    pub(crate) fn focus_lost(&mut self) {
        if self.state == SessionState::Running {
            self.pause();
        }
    }

    /// Buffer a change of direction for the next tick
    pub(crate) fn steer(&mut self, direction: Direction) {
        if matches!(
            self.state,
            SessionState::Running | SessionState::Paused | SessionState::CountingDown(_)
        ) {
            self.game.steer(direction);
        }
    }

    /// Change the tick rate.  The game itself is left alone, and a tick that
    /// is not currently scheduled stays unscheduled.
    pub(crate) fn set_difficulty(&mut self, difficulty: Difficulty, now: Instant) {
        if difficulty == self.difficulty {
            return;
        }
        log::info!("Difficulty changed from {} to {difficulty}", self.difficulty);
        self.difficulty = difficulty;
        if self.clock.is_armed(Timer::Tick) {
            self.arm_tick(now);
        }
    }

    pub(crate) fn next_difficulty(&mut self, now: Instant) {
        let d = self.difficulty.next().unwrap_or_else(Difficulty::min);
        self.set_difficulty(d, now);
    }

    pub(crate) fn prev_difficulty(&mut self, now: Instant) {
        let d = self.difficulty.prev().unwrap_or_else(Difficulty::max);
        self.set_difficulty(d, now);
    }

    /// Return the earliest time at which [`Session::fire_due()`] will have
    /// something to do
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.clock.next_deadline()
    }

    /// Handle every timer due at `now`, earliest first
    pub(crate) fn fire_due(&mut self, now: Instant) {
        while let Some(timer) = self.clock.pop_due(now) {
            self.on_timer(timer, now);
        }
    }

    fn on_timer(&mut self, timer: Timer, now: Instant) {
        match timer {
            Timer::Tick => self.tick(now),
            Timer::Countdown => match self.state {
                SessionState::CountingDown(n) if n > 1 => {
                    self.state = SessionState::CountingDown(n - 1);
                    self.clock.once(Timer::Countdown, now, consts::COUNTDOWN_STEP);
                }
                SessionState::CountingDown(_) => {
                    self.state = SessionState::Running;
                    self.arm_tick(now);
                }
                _ => (),
            },
            Timer::PowerUpExpiry => {
                if let Some(id) = self.expiring.take() {
                    if self.game.expire_powerup(id) {
                        log::debug!("Power-up expired");
                    }
                }
            }
        }
    }

    fn tick(&mut self, now: Instant) {
        if self.state != SessionState::Running {
            self.clock.cancel(Timer::Tick);
            return;
        }
        match self.game.advance() {
            Advance::Moved | Advance::AteFood { powerup: None } => (),
            Advance::AteFood {
                powerup: Some(powerup),
            } => {
                log::debug!("Power-up spawned at {:?}", powerup.position);
                self.expiring = Some(powerup.id);
                self.clock.once(Timer::PowerUpExpiry, now, consts::POWERUP_DURATION);
            }
            Advance::AtePowerUp => {
                log::debug!("Power-up eaten");
                self.cancel_expiry();
            }
            Advance::Ended(ending) => {
                log::info!("Game over ({ending:?}) with score {}", self.game.score());
                self.clock.cancel_all();
                self.expiring = None;
                if self.stats.record_score(self.game.score()) {
                    log::info!("New high score: {}", self.stats.high_score);
                }
                self.stats_dirty = true;
                self.state = SessionState::GameOver;
            }
        }
    }
}

impl<R> Session<R> {
    pub(crate) fn state(&self) -> SessionState {
        self.state
    }

    pub(crate) fn game(&self) -> &Game<R> {
        &self.game
    }

    pub(crate) fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub(crate) fn stats(&self) -> Stats {
        self.stats
    }

    /// If the stats have changed since the last call, return them so that
    /// they can be saved
    pub(crate) fn take_unsaved_stats(&mut self) -> Option<Stats> {
        std::mem::take(&mut self.stats_dirty).then_some(self.stats)
    }

    fn pause(&mut self) {
        log::info!("Pausing");
        self.state = SessionState::Paused;
        self.clock.cancel(Timer::Tick);
    }

    fn arm_tick(&mut self, now: Instant) {
        self.clock.every(Timer::Tick, now, self.difficulty.tick_period());
    }

    fn cancel_expiry(&mut self) {
        self.clock.cancel(Timer::PowerUpExpiry);
        self.expiring = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Ending;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use ratatui::layout::Position;
    use rstest::rstest;
    use std::time::Duration;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;
    const MS: Duration = Duration::from_millis(1);

    fn new_session(stats: Stats) -> Session<ChaCha12Rng> {
        Session::new_with_rng(
            20,
            Difficulty::Medium,
            stats,
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        )
    }

    /// Put the snake against the right-hand wall, facing it, so that it dies
    /// on the next tick
    fn doom(session: &mut Session<ChaCha12Rng>) {
        session.game.set_food(Position::new(0, 0));
        session.game.set_powerup_chance(0.0);
        session.game.set_snake(
            [Position::new(19, 4), Position::new(18, 4)].into(),
            Direction::Right,
        );
    }

    #[test]
    fn idle_does_nothing_until_started() {
        let mut session = new_session(Stats::default());
        let t0 = Instant::now();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.next_deadline(), None);
        session.toggle_pause(t0);
        session.restart(t0);
        session.fire_due(t0 + MS * 10_000);
        assert_eq!(session.state(), SessionState::Idle);
        session.start(t0);
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.next_deadline(), Some(t0 + MS * 100));
        assert_eq!(session.take_unsaved_stats(), None);
    }

    #[test]
    fn ticks_advance_game() {
        let mut session = new_session(Stats::default());
        session.game.set_food(Position::new(0, 0));
        let t0 = Instant::now();
        session.start(t0);
        session.fire_due(t0 + MS * 99);
        assert_eq!(session.game().snake_head(), Position::new(8, 10));
        session.fire_due(t0 + MS * 100);
        assert_eq!(session.game().snake_head(), Position::new(9, 10));
        session.fire_due(t0 + MS * 200);
        assert_eq!(session.game().snake_head(), Position::new(10, 10));
    }

    #[test]
    fn pause_and_countdown() {
        let mut session = new_session(Stats::default());
        session.game.set_food(Position::new(0, 0));
        let t0 = Instant::now();
        session.start(t0);
        session.fire_due(t0 + MS * 100);
        session.toggle_pause(t0 + MS * 150);
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.next_deadline(), None);
        let head = session.game().snake_head();

        let t1 = t0 + MS * 5000;
        session.toggle_pause(t1);
        assert_eq!(session.state(), SessionState::CountingDown(3));
        // Pausing again during the countdown does nothing
        session.toggle_pause(t1 + MS * 10);
        assert_eq!(session.state(), SessionState::CountingDown(3));
        session.fire_due(t1 + MS * 999);
        assert_eq!(session.state(), SessionState::CountingDown(3));
        session.fire_due(t1 + MS * 1000);
        assert_eq!(session.state(), SessionState::CountingDown(2));
        session.fire_due(t1 + MS * 2000);
        assert_eq!(session.state(), SessionState::CountingDown(1));
        assert_eq!(session.game().snake_head(), head);
        session.fire_due(t1 + MS * 3000);
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.game().snake_head(), head);
        assert_eq!(session.next_deadline(), Some(t1 + MS * 3100));
        session.fire_due(t1 + MS * 3100);
        assert_ne!(session.game().snake_head(), head);
    }

    #[test]
    fn steering_buffered_while_paused() {
        let mut session = new_session(Stats::default());
        session.game.set_food(Position::new(0, 0));
        let t0 = Instant::now();
        session.start(t0);
        session.toggle_pause(t0);
        session.steer(Direction::Up);
        session.toggle_pause(t0);
        for secs in 1..=3 {
            session.fire_due(t0 + MS * (secs * 1000));
        }
        assert_eq!(session.state(), SessionState::Running);
        session.fire_due(t0 + MS * 3100);
        assert_eq!(session.game().snake_head(), Position::new(8, 9));
    }

    #[test]
    fn focus_lost_pauses() {
        let mut session = new_session(Stats::default());
        let t0 = Instant::now();
        session.focus_lost();
        assert_eq!(session.state(), SessionState::Idle);
        session.start(t0);
        session.focus_lost();
        assert_eq!(session.state(), SessionState::Paused);
    }

    #[test]
    fn game_over_and_restart() {
        let mut session = new_session(Stats {
            high_score: 3,
            games_played: 10,
        });
        let t0 = Instant::now();
        session.start(t0);
        doom(&mut session);
        session.fire_due(t0 + MS * 100);
        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(session.game().ending(), Some(Ending::Wall));
        assert_eq!(session.next_deadline(), None);
        assert_eq!(
            session.take_unsaved_stats(),
            Some(Stats {
                high_score: 3,
                games_played: 10
            })
        );
        assert_eq!(session.take_unsaved_stats(), None);

        // Pausing does nothing after game over
        session.toggle_pause(t0 + MS * 200);
        assert_eq!(session.state(), SessionState::GameOver);

        session.restart(t0 + MS * 500);
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.game().score(), 0);
        assert!(!session.game().is_game_over());
        assert_eq!(session.next_deadline(), Some(t0 + MS * 600));
        assert_eq!(
            session.take_unsaved_stats(),
            Some(Stats {
                high_score: 3,
                games_played: 11
            })
        );

        // Restart is ignored while running
        session.restart(t0 + MS * 550);
        assert_eq!(session.stats().games_played, 11);
    }

    #[test]
    fn high_score_is_max() {
        let mut session = new_session(Stats::default());
        let t0 = Instant::now();
        session.start(t0);
        session.game.set_score(7);
        doom(&mut session);
        session.fire_due(t0 + MS * 100);
        assert_eq!(session.stats().high_score, 7);

        session.restart(t0 + MS * 200);
        session.game.set_score(4);
        doom(&mut session);
        session.fire_due(t0 + MS * 300);
        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(
            session.stats(),
            Stats {
                high_score: 7,
                games_played: 1
            }
        );
    }

    #[rstest]
    #[case(Difficulty::Easy)]
    #[case(Difficulty::Medium)]
    #[case(Difficulty::Hard)]
    fn powerup_expires_after_three_seconds(#[case] difficulty: Difficulty) {
        let mut session = new_session(Stats::default());
        session.set_difficulty(difficulty, Instant::now());
        session.game.set_powerup_chance(1.0);
        session.game.set_food(Position::new(9, 10));
        let t0 = Instant::now();
        session.start(t0);
        let spawned = t0 + difficulty.tick_period();
        session.fire_due(spawned);
        let powerup = session.game().powerup().expect("power-up should spawn");
        // The expiry keeps running while paused
        session.toggle_pause(spawned + MS * 10);
        session.fire_due(spawned + MS * 2999);
        assert_eq!(session.game().powerup(), Some(powerup));
        session.fire_due(spawned + MS * 3000);
        assert_eq!(session.game().powerup(), None);
        assert_eq!(session.next_deadline(), None);
    }

    #[test]
    fn eaten_powerup_cancels_expiry() {
        let mut session = new_session(Stats::default());
        session.game.set_powerup_chance(1.0);
        session.game.set_food(Position::new(9, 10));
        let t0 = Instant::now();
        session.start(t0);
        session.fire_due(t0 + MS * 100);
        let mut powerup = session.game().powerup().expect("power-up should spawn");
        assert!(session.clock.is_armed(Timer::PowerUpExpiry));
        powerup.position = Position::new(10, 10);
        session.game.set_powerup(powerup);
        session.game.set_food(Position::new(0, 0));
        session.fire_due(t0 + MS * 200);
        assert_eq!(session.game().score(), 1 + consts::POWERUP_BONUS);
        assert_eq!(session.game().powerup(), None);
        assert!(!session.clock.is_armed(Timer::PowerUpExpiry));
    }

    #[test]
    fn restart_cancels_expiry() {
        let mut session = new_session(Stats::default());
        session.game.set_powerup_chance(1.0);
        session.game.set_food(Position::new(9, 10));
        let t0 = Instant::now();
        session.start(t0);
        session.fire_due(t0 + MS * 100);
        assert!(session.game().powerup().is_some());
        doom(&mut session);
        session.fire_due(t0 + MS * 200);
        assert_eq!(session.state(), SessionState::GameOver);
        session.restart(t0 + MS * 300);
        assert_eq!(session.game().powerup(), None);
        assert!(!session.clock.is_armed(Timer::PowerUpExpiry));
        assert_eq!(session.next_deadline(), Some(t0 + MS * 400));
    }

    #[test]
    fn difficulty_change_reschedules_tick() {
        let mut session = new_session(Stats::default());
        session.game.set_food(Position::new(0, 0));
        let t0 = Instant::now();
        session.set_difficulty(Difficulty::Hard, t0);
        assert_eq!(session.difficulty(), Difficulty::Hard);
        assert_eq!(session.next_deadline(), None);
        session.start(t0);
        assert_eq!(session.next_deadline(), Some(t0 + MS * 60));
        session.set_difficulty(Difficulty::Easy, t0 + MS * 30);
        assert_eq!(session.next_deadline(), Some(t0 + MS * 180));
        session.toggle_pause(t0 + MS * 40);
        session.next_difficulty(t0 + MS * 50);
        assert_eq!(session.difficulty(), Difficulty::Medium);
        assert_eq!(session.next_deadline(), None);
        assert_eq!(session.state(), SessionState::Paused);
    }

    #[test]
    fn difficulty_change_keeps_game() {
        let mut session = new_session(Stats::default());
        session.game.set_food(Position::new(0, 0));
        session.game.set_score(5);
        let t0 = Instant::now();
        session.start(t0);
        session.fire_due(t0 + MS * 100);
        let body = session.game().snake_body().collect::<Vec<_>>();
        let head = session.game().snake_head();
        session.set_difficulty(Difficulty::Hard, t0 + MS * 150);
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.game().snake_head(), head);
        assert_eq!(session.game().snake_body().collect::<Vec<_>>(), body);
        assert_eq!(session.game().score(), 5);
        assert_eq!(session.game().food(), Some(Position::new(0, 0)));
        assert_eq!(session.next_deadline(), Some(t0 + MS * 210));
    }

    #[test]
    fn difficulty_chosen_during_countdown_applies_on_resume() {
        let mut session = new_session(Stats::default());
        session.game.set_food(Position::new(0, 0));
        let t0 = Instant::now();
        session.start(t0);
        session.toggle_pause(t0 + MS * 50);
        session.toggle_pause(t0 + MS * 1000);
        assert_eq!(session.state(), SessionState::CountingDown(3));
        session.set_difficulty(Difficulty::Easy, t0 + MS * 1500);
        assert_eq!(session.state(), SessionState::CountingDown(3));
        assert!(!session.clock.is_armed(Timer::Tick));
        for secs in 2..=4 {
            session.fire_due(t0 + MS * (secs * 1000));
        }
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.next_deadline(), Some(t0 + MS * 4150));
    }

    #[test]
    fn difficulty_cycles() {
        let mut session = new_session(Stats::default());
        let t0 = Instant::now();
        session.next_difficulty(t0);
        assert_eq!(session.difficulty(), Difficulty::Hard);
        session.next_difficulty(t0);
        assert_eq!(session.difficulty(), Difficulty::Easy);
        session.prev_difficulty(t0);
        assert_eq!(session.difficulty(), Difficulty::Hard);
    }
}
