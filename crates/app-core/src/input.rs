//! Toolkit-independent input mapping: raw pointer/key events become scene
//! transitions here, so frontends stay thin adapters.

use glam::Vec2;

use crate::constants::*;
use crate::curve::CurveMode;
use crate::scene::Scene;

/// Discrete actions reachable from the keyboard (or equivalent UI controls).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyCommand {
    FinalizeCurve,
    ClearAll,
    ToggleAnimation,
    AdjustSegments(i32),
    AdjustVelocity(f32),
    ToggleLines,
    TogglePoints,
    SetMode(CurveMode),
    ToggleSpecialMode,
}

/// Map a key (as reported by the platform, e.g. `event.key`) to a command.
#[inline]
pub fn command_for_key(key: &str) -> Option<KeyCommand> {
    match key {
        "z" | "Z" => Some(KeyCommand::FinalizeCurve),
        "c" | "C" => Some(KeyCommand::ClearAll),
        " " => Some(KeyCommand::ToggleAnimation),
        "-" => Some(KeyCommand::AdjustSegments(-1)),
        "+" => Some(KeyCommand::AdjustSegments(1)),
        "<" => Some(KeyCommand::AdjustVelocity(-VELOCITY_STEP)),
        ">" => Some(KeyCommand::AdjustVelocity(VELOCITY_STEP)),
        "l" | "L" => Some(KeyCommand::ToggleLines),
        "p" | "P" => Some(KeyCommand::TogglePoints),
        "s" | "S" => Some(KeyCommand::ToggleSpecialMode),
        "0" => Some(KeyCommand::SetMode(CurveMode::BSpline)),
        "1" => Some(KeyCommand::SetMode(CurveMode::Bezier)),
        "2" => Some(KeyCommand::SetMode(CurveMode::CatmullRom)),
        _ => None,
    }
}

/// One raw input event in normalized device coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp(Vec2),
    Key(KeyCommand),
}

/// Gesture state machine turning pointer events into sketch edits.
///
/// A press that moves beyond the drag threshold becomes a drag, which first
/// finalizes any sketch already pending and then streams decimated samples.
/// A press released in place is a single click appending one point.
#[derive(Default)]
pub struct InputController {
    pressed: bool,
    dragging: bool,
    press_origin: Vec2,
}

impl InputController {
    pub fn handle(&mut self, scene: &mut Scene, event: InputEvent) {
        match event {
            InputEvent::PointerDown(pos) => {
                self.pressed = true;
                self.dragging = false;
                self.press_origin = pos;
            }
            InputEvent::PointerMove(pos) => {
                if !self.pressed {
                    return;
                }
                if !self.dragging {
                    if self.press_origin.distance(pos) > DRAG_START_THRESHOLD {
                        self.dragging = true;
                        if !scene.pending.is_empty() {
                            scene.finalize_pending();
                        }
                    }
                } else {
                    scene.add_pending_point(pos, true);
                }
            }
            InputEvent::PointerUp(_) => {
                if !self.pressed {
                    return;
                }
                if self.dragging {
                    scene.finalize_pending();
                } else {
                    scene.add_pending_point(self.press_origin, false);
                }
                self.pressed = false;
                self.dragging = false;
            }
            InputEvent::Key(command) => apply_command(scene, command),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

/// Apply one keyboard command to the scene.
pub fn apply_command(scene: &mut Scene, command: KeyCommand) {
    match command {
        KeyCommand::FinalizeCurve => scene.finalize_pending(),
        KeyCommand::ClearAll => scene.clear(),
        KeyCommand::ToggleAnimation => scene.toggle_animation(),
        KeyCommand::AdjustSegments(delta) => scene.adjust_segments(delta),
        KeyCommand::AdjustVelocity(delta) => scene.adjust_velocity(delta),
        KeyCommand::ToggleLines => scene.toggle_lines(),
        KeyCommand::TogglePoints => scene.toggle_sample_points(),
        KeyCommand::SetMode(mode) => scene.set_mode(mode),
        KeyCommand::ToggleSpecialMode => scene.toggle_special_mode(),
    }
}
