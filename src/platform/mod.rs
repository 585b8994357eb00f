//! Platform abstraction layer
//!
//! Handles the outside-world seams of the game loop:
//! - Time (monotonic milliseconds, tick pacing, full-loop stalls)
//! - Input (quit/start events and continuous key state)

pub mod input;
pub mod time;

pub use input::{DemoInput, InputFrame, InputSource, Screen, ScriptedInput};
pub use time::{Clock, ManualClock, SystemClock};
