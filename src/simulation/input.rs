//! Input aggregation
//!
//! Keyboard keys, on-screen buttons and navigation links all turn into
//! [`InputEvent`]s. Events are queued between frames and folded into one
//! [`FrameIntent`] at the start of each tick.

use log::trace;

/// A physical or on-screen control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Accelerate,
    Brake,
    Horn,
}

impl Control {
    /// Map a keyboard key name (DOM `code`/`key` style) to a control
    pub fn from_key(key: &str) -> Option<Control> {
        match key {
            "ArrowRight" => Some(Control::Accelerate),
            "ArrowLeft" => Some(Control::Brake),
            "h" | "H" | "KeyH" => Some(Control::Horn),
            _ => None,
        }
    }

    /// Map an on-screen button action name to a control
    pub fn from_button(action: &str) -> Option<Control> {
        match action {
            "accel" | "accelerate" => Some(Control::Accelerate),
            "brake" => Some(Control::Brake),
            "horn" => Some(Control::Horn),
            _ => None,
        }
    }

    /// Controls that drive the train by hand
    pub fn is_driving(self) -> bool {
        matches!(self, Control::Accelerate | Control::Brake)
    }
}

/// A single discrete input
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Press(Control),
    Release(Control),
    /// Drive to the station with this id
    Navigate(String),
}

/// Longitudinal command for the manual driving path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Throttle {
    Forward,
    Reverse,
    #[default]
    Coast,
}

/// What the autopilot should do this frame
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AutopilotRequest {
    #[default]
    Keep,
    Cancel,
    Engage(String),
}

/// Everything the rest of the frame needs from input
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameIntent {
    pub throttle: Throttle,
    pub autopilot: AutopilotRequest,
    /// Horn was pressed at least once since the last frame
    pub horn: bool,
}

/// Held-control state plus events queued since the last frame
#[derive(Debug, Default)]
pub struct InputState {
    accelerate_held: bool,
    brake_held: bool,
    horn_held: bool,
    pending: Vec<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next frame
    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    pub fn is_held(&self, control: Control) -> bool {
        match control {
            Control::Accelerate => self.accelerate_held,
            Control::Brake => self.brake_held,
            Control::Horn => self.horn_held,
        }
    }

    /// Fold all queued events, in arrival order, into this frame's intent.
    /// A later event overrides the autopilot request of an earlier one.
    pub fn drain(&mut self) -> FrameIntent {
        let mut intent = FrameIntent::default();

        for event in std::mem::take(&mut self.pending) {
            trace!("input event {:?}", event);
            match event {
                InputEvent::Press(control) => {
                    self.set_held(control, true);
                    if control.is_driving() {
                        intent.autopilot = AutopilotRequest::Cancel;
                    } else {
                        intent.horn = true;
                    }
                }
                InputEvent::Release(control) => self.set_held(control, false),
                InputEvent::Navigate(id) => intent.autopilot = AutopilotRequest::Engage(id),
            }
        }

        intent.throttle = if self.accelerate_held {
            Throttle::Forward
        } else if self.brake_held {
            Throttle::Reverse
        } else {
            Throttle::Coast
        };

        intent
    }

    fn set_held(&mut self, control: Control, held: bool) {
        match control {
            Control::Accelerate => self.accelerate_held = held,
            Control::Brake => self.brake_held = held,
            Control::Horn => self.horn_held = held,
        }
    }
}
