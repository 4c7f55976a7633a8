/// Keyboard actions that steer the camera
use std::collections::BTreeSet;

use crate::camera::Camera;
use crate::error::Result;
use crate::transform::Transform;
use crate::vector::Vector;

/// One camera movement, applied for a time step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
        Action::PitchUp,
        Action::PitchDown,
        Action::YawLeft,
        Action::YawRight,
    ];

    /// Map a DOM `KeyboardEvent.code` to an action
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" => Some(Action::MoveForward),
            "KeyS" => Some(Action::MoveBackward),
            "KeyA" => Some(Action::MoveLeft),
            "KeyD" => Some(Action::MoveRight),
            "ShiftLeft" => Some(Action::MoveUp),
            "ControlLeft" => Some(Action::MoveDown),
            "ArrowUp" => Some(Action::PitchUp),
            "ArrowDown" => Some(Action::PitchDown),
            "ArrowLeft" => Some(Action::YawLeft),
            "ArrowRight" => Some(Action::YawRight),
            _ => None,
        }
    }
}

/// Movement rates, per second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlConfig {
    pub move_speed: f64,
    pub turn_speed: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            move_speed: 10.0,
            turn_speed: 5.0,
        }
    }
}

/// Apply `action` to `camera` for `dt` seconds
pub fn apply(camera: &mut Camera, action: Action, dt: f64, config: &ControlConfig) -> Result<()> {
    let step = config.move_speed * dt;
    let turn = config.turn_speed * dt;
    let frame = camera.frame().clone();

    match action {
        Action::MoveForward => camera.translate(&frame.forward.scale(step)),
        Action::MoveBackward => camera.translate(&frame.forward.scale(-step)),
        Action::MoveLeft => camera.translate(&frame.right.scale(-step)),
        Action::MoveRight => camera.translate(&frame.right.scale(step)),
        Action::MoveUp => camera.translate(&Vector::unit_z().scale(step)),
        Action::MoveDown => camera.translate(&Vector::unit_z().scale(-step)),
        Action::PitchUp => camera.rotate(&frame.right, turn),
        Action::PitchDown => camera.rotate(&frame.right, -turn),
        Action::YawLeft => camera.rotate_z(turn),
        Action::YawRight => camera.rotate_z(-turn),
    }
}

/// Set of currently held actions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    held: BTreeSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Apply every held action for `dt` seconds
    pub fn poll(&self, camera: &mut Camera, dt: f64, config: &ControlConfig) -> Result<()> {
        for action in Action::ALL {
            if self.held.contains(&action) {
                apply(camera, action, dt, config)?;
            }
        }
        Ok(())
    }
}
