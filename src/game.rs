//! Menu loop, round loop and session driver
//!
//! Each loop samples input, advances the simulation by one fixed tick, feeds
//! the audio mixer and hands a [`Frame`] to the renderer. Pauses and fades
//! are full-loop stalls on the [`Clock`].

use std::io;
use std::path::PathBuf;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioManager, AudioSink, MusicCue};
use crate::consts::*;
use crate::highscores::{Leaderboard, LeaderboardError};
use crate::platform::{Clock, InputSource, Screen};
use crate::renderer::{Frame, Overlay, Renderer};
use crate::sim::{GameEvent, GameState, MenuState, TickInput, menu_tick, tick};

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Rendering backend failed to write a frame
    #[error("render error: {0}")]
    Render(#[from] io::Error),

    #[error(transparent)]
    Leaderboard(#[from] LeaderboardError),
}

/// How the menu loop ended
#[derive(Debug)]
pub enum MenuOutcome {
    /// Start pressed: a fresh round over the menu's mushroom field
    Start(GameState),
    Quit,
}

/// What a finished session amounted to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub rounds: u32,
    /// Personal best across the session's rounds
    pub best: u64,
    /// Leaderboard maximum after the last round
    pub leading: u64,
}

/// Game instance wiring the simulation to its collaborators
pub struct Game<C: Clock, I: InputSource, R: Renderer, A: AudioSink> {
    clock: C,
    input: I,
    renderer: R,
    audio: AudioManager<A>,
    leaderboard_path: PathBuf,
    /// Seeds each menu's field
    rng: Pcg32,
    best: u64,
}

impl<C: Clock, I: InputSource, R: Renderer, A: AudioSink> Game<C, I, R, A> {
    pub fn new(
        clock: C,
        input: I,
        renderer: R,
        audio: AudioManager<A>,
        leaderboard_path: impl Into<PathBuf>,
        seed: u64,
    ) -> Self {
        Self {
            clock,
            input,
            renderer,
            audio,
            leaderboard_path: leaderboard_path.into(),
            rng: Pcg32::seed_from_u64(seed),
            best: 0,
        }
    }

    /// Menu, round, menu, ... until quit. Every round that scored is
    /// appended to the leaderboard as soon as it ends.
    pub fn run_session(&mut self) -> Result<SessionSummary, GameError> {
        let mut leaderboard = Leaderboard::load(&self.leaderboard_path)?;
        let mut summary = SessionSummary {
            leading: leaderboard.top_score(),
            ..Default::default()
        };
        log::info!("Session started, leading score {}", summary.leading);

        loop {
            let leading = leaderboard.top_score();
            match self.run_menu(leading, self.best)? {
                MenuOutcome::Quit => break,
                MenuOutcome::Start(state) => {
                    summary.rounds += 1;
                    log::info!("Round {} started", summary.rounds);
                    let score = self.play_round(state, leading)?;
                    self.best = self.best.max(score);
                    leaderboard = self.record_score(leaderboard, score)?;
                }
            }
        }

        summary.best = self.best;
        summary.leading = leaderboard.top_score();
        log::info!(
            "Session over after {} rounds, best {}",
            summary.rounds,
            summary.best
        );
        Ok(summary)
    }

    /// Append a scoring round and reload the leaderboard
    fn record_score(
        &self,
        leaderboard: Leaderboard,
        score: u64,
    ) -> Result<Leaderboard, GameError> {
        if score == 0 {
            return Ok(leaderboard);
        }
        Leaderboard::append(&self.leaderboard_path, score)?;
        Ok(Leaderboard::load(&self.leaderboard_path)?)
    }

    /// Attract screen until start or quit
    pub fn run_menu(&mut self, leading: u64, best: u64) -> Result<MenuOutcome, GameError> {
        self.audio.start_music(MusicCue::Theme);
        let seed = self.rng.random::<u64>();
        let mut menu = MenuState::new(seed, self.clock.now_ms());

        loop {
            self.clock.wait_for_tick();
            let polled = self.input.poll(Screen::Menu);

            if polled.quit {
                let frame = Frame::from_menu(&menu, leading, best).with_overlay(Overlay::Thanks {
                    score_saved: best > 0,
                });
                self.renderer.draw(&frame)?;
                self.audio.fade_out_music(QUIT_FADE_MS);
                self.clock.stall(QUIT_STALL_MS);
                return Ok(MenuOutcome::Quit);
            }
            if polled.start {
                return Ok(MenuOutcome::Start(menu.into_round(self.clock.now_ms())));
            }

            menu_tick(&mut menu, self.clock.now_ms());
            self.renderer.draw(&Frame::from_menu(&menu, leading, best))?;
        }
    }

    /// Run one round to completion and return its final score
    pub fn play_round(&mut self, mut state: GameState, leading: u64) -> Result<u64, GameError> {
        self.audio.start_music(MusicCue::Theme);

        loop {
            self.clock.wait_for_tick();
            let polled = self.input.poll(Screen::Round);
            if polled.quit {
                log::info!("Round abandoned at tick {}", state.time_ticks);
                break;
            }

            tick(
                &mut state,
                &TickInput::from(polled.keys),
                self.clock.now_ms(),
            );
            let events = state.drain_events();
            self.audio.handle_events(&events);

            if state.is_over() {
                break;
            }
            self.renderer
                .draw(&Frame::from_round(&state, leading))?;

            if events
                .iter()
                .any(|e| matches!(e, GameEvent::LifeLost { .. }))
            {
                self.clock.stall(LIFE_LOST_PAUSE_MS);
            }
        }

        let score = state.score.value();
        let frame = Frame::from_round(&state, leading).with_overlay(Overlay::GameOver);
        self.renderer.draw(&frame)?;
        self.audio.fade_out_music(ROUND_END_FADE_MS);
        self.clock.stall(ROUND_END_FADE_MS);
        log::info!("Round over, final score {}", score);
        Ok(score)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &AudioManager<A> {
        &self.audio
    }

    pub fn best(&self) -> u64 {
        self.best
    }
}
