//! Input sources
//!
//! Input is sampled once per tick. Quit and start are events; movement and
//! fire are level-triggered key state.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::TICK_RATE_HZ;
use crate::sim::KeyState;

/// Which loop is asking for input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Round,
}

/// Everything the loops need from one poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Window closed / quit requested
    pub quit: bool,
    /// Start key pressed (menu only)
    pub start: bool,
    pub keys: KeyState,
}

impl InputFrame {
    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Default::default()
        }
    }

    pub fn start() -> Self {
        Self {
            start: true,
            ..Default::default()
        }
    }

    pub fn held(keys: KeyState) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }
}

/// Source of per-tick input for the menu and round loops
pub trait InputSource {
    fn poll(&mut self, screen: Screen) -> InputFrame;
}

/// Replays a fixed list of frames. Once the script runs out every poll asks
/// to quit, so a session driven by it always terminates.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Append `count` copies of `frame`
    pub fn repeat(mut self, frame: InputFrame, count: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(frame, count));
        self
    }

    pub fn then(mut self, frame: InputFrame) -> Self {
        self.frames.push_back(frame);
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _screen: Screen) -> InputFrame {
        self.frames.pop_front().unwrap_or_else(InputFrame::quit)
    }
}

/// Ticks the autopilot idles on the menu before pressing start
const MENU_IDLE_TICKS: u32 = 2 * TICK_RATE_HZ;
/// Ticks between heading changes
const WANDER_TICKS: u32 = 15;
/// Longest round the autopilot will play before quitting it
const ROUND_LIMIT_TICKS: u32 = 120 * TICK_RATE_HZ;

/// Seeded autopilot for the headless binary: starts a round after a short
/// idle, wanders the player band firing constantly, and quits after a fixed
/// number of rounds.
#[derive(Debug, Clone)]
pub struct DemoInput {
    rng: Pcg32,
    rounds: u32,
    rounds_started: u32,
    screen: Screen,
    screen_ticks: u32,
    heading: KeyState,
}

impl DemoInput {
    pub fn new(seed: u64, rounds: u32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            rounds,
            rounds_started: 0,
            screen: Screen::Menu,
            screen_ticks: 0,
            heading: KeyState::default(),
        }
    }

    pub fn rounds_started(&self) -> u32 {
        self.rounds_started
    }

    fn pick_heading(&mut self) -> KeyState {
        let mut keys = KeyState::default();
        match self.rng.random_range(0..5) {
            0 => keys.up = true,
            1 => keys.down = true,
            2 => keys.left = true,
            3 => keys.right = true,
            _ => {}
        }
        keys
    }
}

impl InputSource for DemoInput {
    fn poll(&mut self, screen: Screen) -> InputFrame {
        if screen != self.screen {
            self.screen = screen;
            self.screen_ticks = 0;
        }
        self.screen_ticks += 1;

        match screen {
            Screen::Menu if self.screen_ticks < MENU_IDLE_TICKS => InputFrame::default(),
            Screen::Menu if self.rounds_started >= self.rounds => InputFrame::quit(),
            Screen::Menu => {
                self.rounds_started += 1;
                log::debug!("Autopilot starting round {}", self.rounds_started);
                InputFrame::start()
            }
            Screen::Round if self.screen_ticks >= ROUND_LIMIT_TICKS => InputFrame::quit(),
            Screen::Round => {
                if self.screen_ticks % WANDER_TICKS == 1 {
                    self.heading = self.pick_heading();
                }
                InputFrame::held(KeyState {
                    fire: true,
                    ..self.heading
                })
            }
        }
    }
}
