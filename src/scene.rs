//! Scene flow: title, level select and play
//!
//! The manager never touches `GameState` directly. It turns menu input and
//! game events into `SceneCommand`s for the host, and runs a fade between
//! scenes. The scene swap happens at the midpoint of the fade.

use crate::audio::SoundEffect;
use crate::consts::TRANSITION_DURATION;
use crate::input::{Button, Buttons};
use crate::progress::Progress;
use crate::settings::Toggle;
use crate::sim::{GameEvent, Timer};
use crate::there_and_back;

/// Level buttons per row on the select screen
pub const SELECT_COLUMNS: usize = 5;

/// Settings hotkeys, live in every scene
const TOGGLES: [(Button, Toggle); 4] = [
    (Button::Mute, Toggle::Mute),
    (Button::ToggleParticles, Toggle::Particles),
    (Button::ToggleMotion, Toggle::ReducedMotion),
    (Button::ToggleTouch, Toggle::TouchControls),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Title,
    LevelSelect { cursor: usize },
    Playing { level: usize },
}

/// Requests for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    /// Load this level into a fresh `GameState`
    StartLevel(usize),
    /// Drop the current `GameState`
    ExitLevel,
    /// Progress changed and should be persisted
    SaveProgress,
    /// Flip a setting, apply it and persist settings
    Toggle(Toggle),
    StartMusic,
    StopMusic,
    Sound(SoundEffect),
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    timer: Timer,
    target: Scene,
    swapped: bool,
}

#[derive(Debug, Clone)]
pub struct SceneManager {
    scene: Scene,
    transition: Option<Transition>,
    level_count: usize,
}

impl SceneManager {
    pub fn new(level_count: usize) -> Self {
        Self {
            scene: Scene::Title,
            transition: None,
            level_count,
        }
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Gameplay should tick only while settled in `Playing`
    pub fn gameplay_active(&self) -> bool {
        matches!(self.scene, Scene::Playing { .. }) && self.transition.is_none()
    }

    /// Fade overlay opacity, 0 outside transitions
    pub fn fade_alpha(&self) -> f32 {
        self.transition
            .map_or(0.0, |t| there_and_back(t.timer.progress()))
    }

    fn go_to(&mut self, target: Scene) {
        if self.transition.is_some() {
            return;
        }
        let mut timer = Timer::new(TRANSITION_DURATION);
        timer.start();
        self.transition = Some(Transition {
            timer,
            target,
            swapped: false,
        });
    }

    /// Advance the fade and handle menu input for one frame
    pub fn update(&mut self, buttons: &Buttons, progress: &Progress, dt: f32) -> Vec<SceneCommand> {
        let mut commands: Vec<SceneCommand> = TOGGLES
            .iter()
            .filter(|(button, _)| buttons.just_pressed(*button))
            .map(|&(_, toggle)| SceneCommand::Toggle(toggle))
            .collect();

        if let Some(mut transition) = self.transition {
            let finished = transition.timer.update(dt);
            if !transition.swapped && (finished || transition.timer.progress() >= 0.5) {
                transition.swapped = true;
                self.swap_to(transition.target, &mut commands);
            }
            self.transition = (!finished).then_some(transition);
            return commands;
        }

        match self.scene {
            Scene::Title => {
                if buttons.just_pressed(Button::Select) {
                    let cursor = progress.next_level(self.level_count);
                    self.go_to(Scene::LevelSelect { cursor });
                    commands.push(SceneCommand::Sound(SoundEffect::MenuSelect));
                }
            }
            Scene::LevelSelect { cursor } => {
                if buttons.just_pressed(Button::Back) {
                    self.go_to(Scene::Title);
                } else if buttons.just_pressed(Button::Select) {
                    if progress.is_level_available(cursor) {
                        self.go_to(Scene::Playing { level: cursor });
                        commands.push(SceneCommand::Sound(SoundEffect::MenuSelect));
                    } else {
                        commands.push(SceneCommand::Sound(SoundEffect::Invalid));
                    }
                } else {
                    let moved = self.move_cursor(cursor, buttons);
                    if moved != cursor {
                        self.scene = Scene::LevelSelect { cursor: moved };
                        commands.push(SceneCommand::Sound(SoundEffect::MenuHover));
                    }
                }
            }
            Scene::Playing { level } => {
                if buttons.just_pressed(Button::Back) {
                    self.go_to(Scene::LevelSelect { cursor: level });
                }
            }
        }

        commands
    }

    /// React to a drained game event
    pub fn on_game_event(
        &mut self,
        event: &GameEvent,
        progress: &mut Progress,
    ) -> Vec<SceneCommand> {
        let mut commands = Vec::new();
        if let GameEvent::LevelComplete { level } = *event {
            if progress.mark_completed(level) {
                log::info!("Level {} completed for the first time", level);
            }
            commands.push(SceneCommand::SaveProgress);
            let cursor = (level + 1).min(self.level_count.saturating_sub(1));
            self.go_to(Scene::LevelSelect { cursor });
        }
        commands
    }

    fn swap_to(&mut self, target: Scene, commands: &mut Vec<SceneCommand>) {
        if matches!(self.scene, Scene::Playing { .. }) {
            commands.push(SceneCommand::ExitLevel);
            commands.push(SceneCommand::StopMusic);
        }
        if let Scene::Playing { level } = target {
            commands.push(SceneCommand::StartLevel(level));
            commands.push(SceneCommand::StartMusic);
        }
        log::debug!("Scene {:?} -> {:?}", self.scene, target);
        self.scene = target;
    }

    fn move_cursor(&self, cursor: usize, buttons: &Buttons) -> usize {
        let last = self.level_count.saturating_sub(1);
        if buttons.just_pressed(Button::Left) {
            cursor.saturating_sub(1)
        } else if buttons.just_pressed(Button::Right) {
            (cursor + 1).min(last)
        } else if buttons.just_pressed(Button::Up) {
            cursor.checked_sub(SELECT_COLUMNS).unwrap_or(cursor)
        } else if buttons.just_pressed(Button::Down) {
            let below = cursor + SELECT_COLUMNS;
            if below <= last { below } else { cursor }
        } else {
            cursor
        }
    }
}
