use crate::command::Command;
use crate::session::Session;
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Clone, Debug)]
pub(crate) struct App<R = rand::rngs::ThreadRng> {
    session: Session<R>,
    /// Where to save stats when they change.  `None` means they are not
    /// saved.
    stats_file: Option<PathBuf>,
    quitting: bool,
}

impl<R: Rng> App<R> {
    pub(crate) fn new(session: Session<R>, stats_file: Option<PathBuf>) -> App<R> {
        App {
            session,
            stats_file,
            quitting: false,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting {
            terminal.draw(|frame| self.session.draw(frame))?;
            self.process_input()?;
            self.save_stats();
        }
        Ok(())
    }

    /// Wait for either an input event or the session's next timer, then deal
    /// with whichever happened
    fn process_input(&mut self) -> io::Result<()> {
        if let Some(when) = self.session.next_deadline() {
            let wait = when.saturating_duration_since(Instant::now());
            if !wait.is_zero() && poll(wait)? {
                self.handle_event(read()?, Instant::now());
            }
        } else {
            self.handle_event(read()?, Instant::now());
        }
        self.session.fire_due(Instant::now());
        Ok(())
    }

    fn handle_event(&mut self, event: Event, now: Instant) {
        if event == Event::FocusLost {
            self.session.focus_lost();
            return;
        }
        let Some(cmd) = event
            .as_key_press_event()
            .and_then(Command::from_key_event)
        else {
            return;
        };
        match cmd {
            Command::Quit => self.quitting = true,
            Command::Steer(d) => self.session.steer(d),
            Command::Start => self.session.start(now),
            Command::TogglePause => self.session.toggle_pause(now),
            Command::Restart => self.session.restart(now),
            Command::SetDifficulty(d) => self.session.set_difficulty(d, now),
            Command::NextDifficulty => self.session.next_difficulty(now),
            Command::PrevDifficulty => self.session.prev_difficulty(now),
        }
    }

    fn save_stats(&mut self) {
        let Some(stats) = self.session.take_unsaved_stats() else {
            return;
        };
        let Some(ref path) = self.stats_file else {
            return;
        };
        match stats.save(path) {
            Ok(()) => log::debug!("Saved stats to {}", path.display()),
            Err(e) => log::warn!("{:#}", anyhow::Error::new(e)),
        }
    }
}
