//! Abstract buttons and per-frame snapshots
//!
//! Key events only update the held set. Once per frame `snapshot` compares it
//! with the previous frame, so a press shows up as `pressed` for exactly one
//! frame no matter how many times the simulation is consulted.

use glam::Vec2;

use crate::sim::TickInput;

/// Pad button side as a fraction of the shorter canvas side
const TOUCH_BUTTON: f32 = 0.11;
const TOUCH_MARGIN: f32 = 0.03;
const TOUCH_GAP: f32 = 0.015;

/// Abstract buttons, independent of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Undo,
    Reset,
    Select,
    Back,
    Mute,
    ToggleParticles,
    ToggleMotion,
    ToggleTouch,
}

impl Button {
    pub const ALL: [Button; 12] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Undo,
        Button::Reset,
        Button::Select,
        Button::Back,
        Button::Mute,
        Button::ToggleParticles,
        Button::ToggleMotion,
        Button::ToggleTouch,
    ];

    fn bit(self) -> u16 {
        1 << (self as u8)
    }
}

/// Map a `KeyboardEvent.code` to a button
pub fn button_for_key(code: &str) -> Option<Button> {
    match code {
        "ArrowUp" | "KeyW" => Some(Button::Up),
        "ArrowDown" | "KeyS" => Some(Button::Down),
        "ArrowLeft" | "KeyA" => Some(Button::Left),
        "ArrowRight" | "KeyD" => Some(Button::Right),
        "KeyZ" | "Backspace" => Some(Button::Undo),
        "KeyR" => Some(Button::Reset),
        "Space" | "Enter" => Some(Button::Select),
        "Escape" => Some(Button::Back),
        "KeyM" => Some(Button::Mute),
        "KeyP" => Some(Button::ToggleParticles),
        "KeyO" => Some(Button::ToggleMotion),
        "KeyT" => Some(Button::ToggleTouch),
        _ => None,
    }
}

/// One square of the on-screen pad, in canvas pixels with y down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPad {
    pub button: Button,
    pub min: Vec2,
    pub size: f32,
}

impl TouchPad {
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.min + Vec2::splat(self.size);
        point.cmpge(self.min).all() && point.cmplt(max).all()
    }
}

/// Arrow cross in the bottom-left corner, undo in the bottom-right
pub fn touch_pad(viewport: Vec2) -> [TouchPad; 5] {
    let unit = viewport.min_element();
    let size = unit * TOUCH_BUTTON;
    let margin = unit * TOUCH_MARGIN;
    let step = size + unit * TOUCH_GAP;
    let bottom = viewport.y - margin - size;

    let pad = |button, x, y| TouchPad {
        button,
        min: Vec2::new(x, y),
        size,
    };
    [
        pad(Button::Up, margin + step, bottom - step),
        pad(Button::Down, margin + step, bottom),
        pad(Button::Left, margin, bottom),
        pad(Button::Right, margin + step * 2.0, bottom),
        pad(Button::Undo, viewport.x - margin - size, bottom),
    ]
}

/// Buttons under the current touch points. With the pad hidden, or off the
/// pad, a touch acts as `Select`.
pub fn touch_buttons(points: &[Vec2], viewport: Vec2, pad_visible: bool) -> ButtonSet {
    let pads = touch_pad(viewport);
    let mut set = ButtonSet::default();
    for &point in points {
        let hit = pad_visible
            .then(|| pads.iter().find(|p| p.contains(point)))
            .flatten();
        set.set(hit.map_or(Button::Select, |p| p.button), true);
    }
    set
}

/// Small bitset of buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSet(u16);

impl ButtonSet {
    pub fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn set(&mut self, button: Button, on: bool) {
        if on {
            self.0 |= button.bit();
        } else {
            self.0 &= !button.bit();
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// One frame's view of the buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buttons {
    /// Currently down
    pub held: ButtonSet,
    /// Went down since the previous snapshot
    pub pressed: ButtonSet,
}

impl Buttons {
    pub fn just_pressed(&self, button: Button) -> bool {
        self.pressed.contains(button)
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.held.contains(button)
    }

    /// Gameplay commands for this frame
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            up: self.just_pressed(Button::Up),
            down: self.just_pressed(Button::Down),
            left: self.just_pressed(Button::Left),
            right: self.just_pressed(Button::Right),
            undo: self.just_pressed(Button::Undo),
            reset: self.just_pressed(Button::Reset),
        }
    }
}

/// Accumulates device events between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: ButtonSet,
    /// Presses that were released before the frame sampled them
    tapped: ButtonSet,
    last_frame: ButtonSet,
    /// Buttons currently held by touch points
    touched: ButtonSet,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: Button) {
        self.held.set(button, true);
        self.tapped.set(button, true);
    }

    pub fn release(&mut self, button: Button) {
        self.held.set(button, false);
    }

    /// Key-down/up from a `KeyboardEvent.code`; returns whether it was mapped
    pub fn key(&mut self, code: &str, down: bool) -> bool {
        match button_for_key(code) {
            Some(button) if down => {
                self.press(button);
                true
            }
            Some(button) => {
                self.release(button);
                true
            }
            None => false,
        }
    }

    /// Buttons down right now, from any device
    pub fn held(&self) -> ButtonSet {
        self.held
    }

    /// Replace the touch-held buttons, pressing new ones and releasing lifted ones
    pub fn set_touched(&mut self, touched: ButtonSet) {
        for button in Button::ALL {
            match (self.touched.contains(button), touched.contains(button)) {
                (false, true) => self.press(button),
                (true, false) => self.release(button),
                _ => {}
            }
        }
        self.touched = touched;
    }

    /// Release everything (window blur)
    pub fn clear(&mut self) {
        self.held = ButtonSet::default();
        self.tapped = ButtonSet::default();
        self.touched = ButtonSet::default();
    }

    /// Sample once per frame
    pub fn snapshot(&mut self) -> Buttons {
        let mut pressed = ButtonSet::default();
        for button in Button::ALL {
            let down_now = self.held.contains(button) || self.tapped.contains(button);
            pressed.set(button, down_now && !self.last_frame.contains(button));
        }
        let buttons = Buttons {
            held: self.held,
            pressed,
        };
        self.last_frame = self.held;
        self.tapped = ButtonSet::default();
        buttons
    }
}
