//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and music - no external files needed!
//! `SoundEffect`, the event mapping and the music sequencer are platform
//! independent; the synthesizer only exists on wasm32.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Chain slid one cell
    Move,
    /// Move rejected, or a locked menu entry
    Invalid,
    /// Grow item eaten
    Grow,
    /// Shrink item eaten
    Shrink,
    /// Fall ended on solid ground
    Land,
    /// Touched a hazard
    Hurt,
    /// Level complete
    Win,
    /// Menu cursor moved
    MenuHover,
    /// Menu entry confirmed
    MenuSelect,
}

impl SoundEffect {
    /// Sound for a drained game event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Moved => Some(SoundEffect::Move),
            GameEvent::Blocked => Some(SoundEffect::Invalid),
            GameEvent::Grew => Some(SoundEffect::Grow),
            GameEvent::Shrank => Some(SoundEffect::Shrink),
            GameEvent::Landed => Some(SoundEffect::Land),
            GameEvent::Hurt => Some(SoundEffect::Hurt),
            GameEvent::LevelComplete { .. } => Some(SoundEffect::Win),
            GameEvent::Undone | GameEvent::LevelReset => Some(SoundEffect::MenuHover),
        }
    }
}

/// Seconds per music step
pub const MUSIC_STEP: f32 = 0.18;

/// Background tune as (frequency in Hz, length in steps); zero is a rest
pub const MUSIC_PATTERN: [(f32, u32); 16] = [
    (262.0, 2),
    (330.0, 1),
    (392.0, 1),
    (330.0, 2),
    (0.0, 2),
    (294.0, 2),
    (349.0, 1),
    (440.0, 1),
    (349.0, 2),
    (0.0, 2),
    (330.0, 1),
    (392.0, 1),
    (494.0, 2),
    (392.0, 2),
    (262.0, 4),
    (0.0, 4),
];

/// A note due now: frequency and how long it should sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub freq: f32,
    pub length: f32,
}

/// Steps through `MUSIC_PATTERN` in a loop while playing
#[derive(Debug, Clone, Default)]
pub struct MusicLoop {
    playing: bool,
    index: usize,
    /// Seconds until the next step starts
    wait: f32,
}

impl MusicLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the top; no-op when already playing
    pub fn start(&mut self) {
        if !self.playing {
            self.playing = true;
            self.index = 0;
            self.wait = 0.0;
        }
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advance by `dt` and return the notes that start this frame
    pub fn update(&mut self, dt: f32) -> Vec<Note> {
        let mut due = Vec::new();
        if !self.playing {
            return due;
        }
        self.wait -= dt;
        while self.wait <= 0.0 {
            let (freq, steps) = MUSIC_PATTERN[self.index];
            let length = steps as f32 * MUSIC_STEP;
            if freq > 0.0 {
                due.push(Note { freq, length });
            }
            self.wait += length;
            self.index = (self.index + 1) % MUSIC_PATTERN.len();
        }
        due
    }
}

#[cfg(target_arch = "wasm32")]
pub use synth::AudioManager;

#[cfg(target_arch = "wasm32")]
mod synth {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{MusicLoop, SoundEffect};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        music_volume: f32,
        music: MusicLoop,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let defaults = Settings::default();
            Self {
                ctx,
                volume: defaults.effective_sfx_volume(),
                music_volume: defaults.effective_music_volume(),
                music: MusicLoop::new(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Pick up volume and mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_sfx_volume();
            self.music_volume = settings.effective_music_volume();
        }

        pub fn start_music(&mut self) {
            self.music.start();
        }

        pub fn stop_music(&mut self) {
            self.music.stop();
        }

        /// Schedule the music notes that fall in this frame
        pub fn update(&mut self, dt: f32) {
            let notes = self.music.update(dt);
            let vol = self.music_volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() != web_sys::AudioContextState::Running {
                return;
            }
            for note in notes {
                self.play_tone(
                    ctx,
                    note.freq,
                    OscillatorType::Triangle,
                    vol * 0.08,
                    note.length as f64 * 0.9,
                );
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Move => self.play_move(ctx, vol),
                SoundEffect::Invalid => self.play_invalid(ctx, vol),
                SoundEffect::Grow => self.play_grow(ctx, vol),
                SoundEffect::Shrink => self.play_shrink(ctx, vol),
                SoundEffect::Land => self.play_land(ctx, vol),
                SoundEffect::Hurt => self.play_hurt(ctx, vol),
                SoundEffect::Win => self.play_win(ctx, vol),
                SoundEffect::MenuHover => self.play_blip(ctx, vol, 660.0),
                SoundEffect::MenuSelect => self.play_select(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short decaying tone
        fn play_tone(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
            level: f32,
            length: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + length + 0.02).ok();
        }

        /// Move - soft padded step
        fn play_move(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(330.0, t + 0.06)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Invalid - low buzz
        fn play_invalid(&self, ctx: &AudioContext, vol: f32) {
            self.play_tone(ctx, 110.0, OscillatorType::Square, vol * 0.15, 0.12);
        }

        /// Grow - rising chirp
        fn play_grow(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [440.0, 660.0, 880.0].iter().enumerate() {
                let delay = i as f64 * 0.05;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.15).ok();
                }
            }
        }

        /// Shrink - falling chirp
        fn play_shrink(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(880.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(220.0, t + 0.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Land - solid thump
        fn play_land(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Hurt - harsh descending crackle
        fn play_hurt(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.frequency().set_value_at_time(400.0, t).ok();
                osc.frequency().set_value_at_time(900.0, t + 0.03).ok();
                osc.frequency().set_value_at_time(250.0, t + 0.06).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(60.0, t + 0.35)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.4).ok();
            }

            // Bass thump
            if let Some((osc, gain)) = self.create_osc(ctx, 60.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Win - triumphant fanfare
        fn play_win(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
                let delay = i as f64 * 0.1;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.5).ok();
                }
            }
        }

        /// Menu blip
        fn play_blip(&self, ctx: &AudioContext, vol: f32, freq: f32) {
            self.play_tone(ctx, freq, OscillatorType::Square, vol * 0.1, 0.05);
        }

        /// Menu confirm - two-note ding
        fn play_select(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [600.0, 900.0].iter().enumerate() {
                let delay = i as f64 * 0.07;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }
    }
}
