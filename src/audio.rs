//! Audio triggers
//!
//! Fire-and-forget sound effects and a looping music track. The game only
//! talks to [`AudioManager`], which applies the settings mixer and hands
//! scaled volumes to a backend implementing [`AudioSink`].

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Laser fired
    Shoot,
    /// Centipede segment destroyed
    Splat,
    /// Spider, flea or scorpion destroyed
    Hit,
    /// Life lost
    Buzzer,
}

impl SoundEffect {
    /// Mix level before the settings mixer is applied
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::Shoot => 0.4,
            SoundEffect::Splat => 1.0,
            SoundEffect::Hit => 0.9,
            SoundEffect::Buzzer => 1.0,
        }
    }

    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired => Some(SoundEffect::Shoot),
            GameEvent::SegmentKilled => Some(SoundEffect::Splat),
            GameEvent::EnemyKilled { .. } => Some(SoundEffect::Hit),
            GameEvent::LifeLost { .. } => Some(SoundEffect::Buzzer),
            _ => None,
        }
    }
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCue {
    /// Chiptune loop played on the menu and during rounds
    Theme,
}

impl MusicCue {
    pub fn base_volume(self) -> f32 {
        match self {
            MusicCue::Theme => 0.5,
        }
    }
}

/// Audio backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    /// Start (or restart) a looping track
    fn play_music(&mut self, cue: MusicCue, volume: f32);
    fn fade_out_music(&mut self, ms: u64);
}

/// Backend that only logs, for the headless binary
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {:?} at {:.2}", effect, volume);
    }

    fn play_music(&mut self, cue: MusicCue, volume: f32) {
        log::debug!("music {:?} at {:.2}", cue, volume);
    }

    fn fade_out_music(&mut self, ms: u64) {
        log::debug!("music fading over {} ms", ms);
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self::from_settings(sink, &Settings::default())
    }

    pub fn from_settings(sink: S, settings: &Settings) -> Self {
        Self {
            sink,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    fn effective(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective(self.sfx_volume) * effect.base_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Trigger the sound for every event that has one
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    pub fn start_music(&mut self, cue: MusicCue) {
        let vol = self.effective(self.music_volume) * cue.base_volume();
        self.sink.play_music(cue, vol);
    }

    pub fn fade_out_music(&mut self, ms: u64) {
        self.sink.fade_out_music(ms);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
