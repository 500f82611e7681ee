use crate::config::GameConfig;
use crate::game::Game;
use crate::highscores::{ScoreStore, StoreError};
use crate::leaderboard::Leaderboard;
use crate::name_entry::NameEntry;
use crate::warning::{Warning, WarningOutcome};
use crossterm::event::read;
use ratatui::{backend::Backend, Terminal};
use std::collections::VecDeque;
use std::io;

/// The top-level program state: the current screen, the pop-ups waiting to
/// be acknowledged, and the score store shared by every session
#[derive(Debug)]
pub(crate) struct App<S> {
    store: S,
    config: GameConfig,
    screen: Screen,
    warnings: VecDeque<Warning>,
}

impl<S: ScoreStore> App<S> {
    pub(crate) fn new(store: S, config: GameConfig) -> App<S> {
        let mut app = App {
            store,
            config,
            screen: Screen::Quit,
            warnings: VecDeque::new(),
        };
        app.screen = app.new_game();
        app
    }

    /// Queue a pop-up to show over whatever screen is current
    pub(crate) fn warn(&mut self, warning: Warning) {
        self.warnings.push_back(warning);
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| {
            match self.screen {
                Screen::Game(ref game) => game.draw(frame),
                Screen::NameEntry(ref entry) => entry.draw(frame),
                Screen::Leaderboard(ref board) => board.draw(frame),
                Screen::Quit => (),
            }
            if let Some(warning) = self.warnings.front() {
                frame.render_widget(warning, frame.area());
            }
        })?;
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        if let Some(warning) = self.warnings.front_mut() {
            match warning.handle_event(read()?) {
                Some(WarningOutcome::Dismissed) => {
                    self.warnings.pop_front();
                }
                Some(WarningOutcome::Quit) => self.screen = Screen::Quit,
                None => (),
            }
            return Ok(());
        }
        let transition = match self.screen {
            Screen::Game(ref mut game) => game.process_input()?,
            Screen::NameEntry(ref mut entry) => entry.process_input()?,
            Screen::Leaderboard(ref mut board) => board.process_input()?,
            Screen::Quit => None,
        };
        if let Some(t) = transition {
            self.apply(t);
        }
        Ok(())
    }

    fn apply(&mut self, transition: Transition) {
        self.screen = match transition {
            Transition::Quit => Screen::Quit,
            Transition::Restart => self.new_game(),
            Transition::GameOver(score) => {
                match self
                    .store
                    .is_high_score(score, self.config.leaderboard_size)
                {
                    Ok(true) => Screen::NameEntry(NameEntry::new(score)),
                    Ok(false) => self.leaderboard(score),
                    Err(e) => {
                        self.store_failed(e);
                        Screen::Leaderboard(Leaderboard::new(score, Vec::new()))
                    }
                }
            }
            Transition::Submit { name, score } => {
                if let Err(e) = self.store.insert(&name, score) {
                    self.store_failed(e);
                }
                self.leaderboard(score)
            }
        };
    }

    fn new_game(&mut self) -> Screen {
        let high_score = self.store.best_score().unwrap_or_else(|e| {
            self.store_failed(e);
            0
        });
        Screen::Game(Box::new(Game::new(&self.config, high_score)))
    }

    fn leaderboard(&mut self, score: u32) -> Screen {
        let entries = self
            .store
            .top_scores(self.config.leaderboard_size)
            .unwrap_or_else(|e| {
                self.store_failed(e);
                Vec::new()
            });
        Screen::Leaderboard(Leaderboard::new(score, entries))
    }

    fn store_failed(&mut self, e: StoreError) {
        tracing::warn!(error = %e, "High score store operation failed");
        self.warn(Warning::from(e));
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}

#[derive(Debug)]
enum Screen {
    Game(Box<Game>),
    NameEntry(NameEntry),
    Leaderboard(Leaderboard),
    Quit,
}

/// What a screen asks the application to do next
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Transition {
    Quit,
    /// Start a new game
    Restart,
    /// The player has acknowledged the end of a game with the given score
    GameOver(u32),
    /// Record a high score under the given name
    Submit { name: String, score: u32 },
}
