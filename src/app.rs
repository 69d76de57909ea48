use std::io::Write;
use std::thread::sleep;
use std::time::{Duration, Instant};

use crossterm::event::{poll, read, Event};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::game::Game;
use crate::input::{command_for, Command, KeySampler};
use crate::render::Frame;
use crate::term::TermManager;
use crate::ticker::Ticker;

const PAUSE_MESSAGE: &[&str] = &["Paused", "Esc to resume", "q to quit"];

/// Drives the game: drains input every frame, steps the simulation when the
/// update interval has elapsed, and redraws.
pub struct App<W: Write> {
    title: String,
    frame_interval: Duration,
    game: Game,
    term: TermManager<W>,
    sampler: KeySampler,
    ticker: Ticker,
    paused: bool,
    quit: bool,
}

impl<W: Write> App<W> {
    pub fn new(config: &AppConfig, out: W) -> Self {
        let grid = config.grid();
        App {
            title: config.window.title.clone(),
            frame_interval: config.timing.frame_interval(),
            game: Game::new(grid, config.seed),
            term: TermManager::new(out, grid),
            sampler: KeySampler::new(),
            ticker: Ticker::new(config.timing.update_interval()),
            paused: false,
            quit: false,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Takes over the terminal until the player quits. The terminal is
    /// restored even when the loop fails.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup(&self.title)?;
        log::info!("Game started on a {}x{} grid", self.game.grid().width(), self.game.grid().height());

        let result = self.run_loop();

        // A loop error takes precedence over a restore error
        let restored = self.term.restore();
        log::info!("Game closed");
        result.and(restored.map_err(Error::from))
    }

    fn run_loop(&mut self) -> Result<()> {
        let mut last_frame = Instant::now();

        while !self.quit {
            sleep(self.frame_interval);

            while poll(Duration::ZERO)? {
                if let Event::Key(ev) = read()? {
                    self.handle(command_for(&ev))?;
                }
            }

            let now = Instant::now();
            let elapsed = now - last_frame;
            last_frame = now;

            self.frame(elapsed)?;
        }

        Ok(())
    }

    /// Applies one input command.
    pub fn handle(&mut self, cmd: Command) -> Result<()> {
        match cmd {
            Command::Turn(key) if !self.paused => self.sampler.press(key),
            Command::TogglePause => self.toggle_pause()?,
            Command::Quit => {
                log::info!("Quit requested");
                self.quit = true;
            }
            _ => {}
        }
        Ok(())
    }

    /// One frame: step if due, then draw. Nothing moves or redraws while
    /// paused.
    pub fn frame(&mut self, elapsed: Duration) -> Result<()> {
        if self.paused {
            return Ok(());
        }

        if self.ticker.tick(elapsed) {
            let turn = self.sampler.take_turn();
            self.game.step(turn);
        }

        self.term.present(Frame::draw(&self.game))?;
        Ok(())
    }

    fn toggle_pause(&mut self) -> Result<()> {
        self.paused = !self.paused;

        if self.paused {
            self.sampler.clear();
            self.term.show_message(PAUSE_MESSAGE)?;
            log::info!("Paused");
        } else {
            self.term.hide_message()?;
            self.ticker.reset();
            log::info!("Resumed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Heading;
    use crate::input::DirKey;

    fn app() -> App<Vec<u8>> {
        let mut config = AppConfig::default();
        config.seed = Some(11);
        App::new(&config, Vec::new())
    }

    #[test]
    fn test_waits_for_interval() {
        let mut app = app();
        app.handle(Command::Turn(DirKey::Right)).unwrap();
        let head = app.game().snake().head();

        app.frame(Duration::from_millis(100)).unwrap();
        assert_eq!(app.game().snake().head(), head);
        assert_eq!(app.game().snake().heading(), Heading::Idle);

        app.frame(Duration::from_millis(60)).unwrap();
        assert_eq!(app.game().snake().heading(), Heading::Right);
    }

    #[test]
    fn test_pause_freezes_and_drops_keys() {
        let mut app = app();
        app.handle(Command::TogglePause).unwrap();
        assert!(app.is_paused());

        app.handle(Command::Turn(DirKey::Up)).unwrap();
        app.frame(Duration::from_millis(500)).unwrap();
        assert_eq!(app.game().snake().heading(), Heading::Idle);

        app.handle(Command::TogglePause).unwrap();
        app.frame(Duration::from_millis(200)).unwrap();
        assert_eq!(app.game().snake().heading(), Heading::Idle);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(!app.should_quit());
        app.handle(Command::Quit).unwrap();
        assert!(app.should_quit());
    }
}
