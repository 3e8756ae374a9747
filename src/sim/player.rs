//! Player locomotion state machine
//!
//! The player runs forward on one of three fixed lateral rails and can
//! switch to an adjacent lane, jump, or slide. Grounding is re-established
//! by a contact signal from the host engine's collision system; jump and
//! slide permissions are gated externally for intro/outro freezes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::GROUND_TOLERANCE;
use crate::lerp;
use crate::tuning::Tuning;

/// One of three fixed lateral rail positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Lane {
    Left,
    #[default]
    Middle,
    Right,
}

impl Lane {
    /// Neighbouring lane in the given direction, or `None` at a boundary.
    /// There is no direct Left↔Right transition.
    pub fn neighbor(self, dir: LaneShift) -> Option<Lane> {
        match (self, dir) {
            (Lane::Left, LaneShift::Right) => Some(Lane::Middle),
            (Lane::Middle, LaneShift::Left) => Some(Lane::Left),
            (Lane::Middle, LaneShift::Right) => Some(Lane::Right),
            (Lane::Right, LaneShift::Left) => Some(Lane::Middle),
            _ => None,
        }
    }

    /// Lateral offset of this lane's rail
    pub fn offset_x(self, spacing: f32) -> f32 {
        match self {
            Lane::Left => -spacing,
            Lane::Middle => 0.0,
            Lane::Right => spacing,
        }
    }
}

/// Direction of a lane switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneShift {
    Left,
    Right,
}

/// Capsule collider dimensions, shrunk while sliding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderShape {
    pub center_y: f32,
    pub height: f32,
}

/// Movement state of the controlled body
///
/// Mutated each simulation tick and by discrete input events. A forward
/// speed of zero is the pause state: lane switches, jumps and slides are
/// all ignored until speed is restored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Lane currently targeted
    pub lane: Lane,
    /// Cruise speed along the travel axis (0 = frozen)
    pub forward_speed: f32,
    /// World position of the controlled body
    pub position: Vec3,
    /// Current collision envelope
    pub collider: ColliderShape,
    /// Lateral rail position being interpolated toward
    target_x: f32,
    /// Vertical velocity while airborne
    vertical_vel: f32,
    grounded: bool,
    airborne: bool,
    can_jump: bool,
    can_slide: bool,
    /// Seconds until the slide envelope is restored (fire-and-forget)
    slide_timer: Option<f32>,
}

impl PlayerState {
    /// Fresh player: middle lane, frozen, actions disabled, not yet
    /// grounded (the first contact report grounds it)
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            lane: Lane::Middle,
            forward_speed: 0.0,
            position: Vec3::ZERO,
            collider: tuning.run_collider,
            target_x: 0.0,
            vertical_vel: 0.0,
            grounded: false,
            airborne: false,
            can_jump: false,
            can_slide: false,
            slide_timer: None,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    pub fn can_slide(&self) -> bool {
        self.can_slide
    }

    pub fn is_sliding(&self) -> bool {
        self.slide_timer.is_some()
    }

    /// Set cruise speed. Zero disables all lateral and vertical input
    /// handling until a non-zero speed is set again.
    pub fn set_forward_speed(&mut self, speed: f32) {
        self.forward_speed = speed;
    }

    /// Gate jump and slide permissions together (intro/outro freeze)
    pub fn set_actions_enabled(&mut self, enabled: bool) {
        self.can_jump = enabled;
        self.can_slide = enabled;
    }

    /// Attempt to move one lane over. Returns whether the lane changed;
    /// no-op at a boundary lane in the boundary direction.
    pub fn switch_lane(&mut self, dir: LaneShift, tuning: &Tuning) -> bool {
        if self.forward_speed == 0.0 {
            return false;
        }
        match self.lane.neighbor(dir) {
            Some(next) => {
                self.lane = next;
                self.target_x = next.offset_x(tuning.lane_spacing);
                true
            }
            None => false,
        }
    }

    /// Jump if grounded and permitted. Applies an upward impulse and goes
    /// airborne; repeated calls while airborne have no further effect.
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if self.forward_speed == 0.0 || !self.grounded || !self.can_jump {
            return false;
        }
        self.vertical_vel = tuning.jump_force;
        self.grounded = false;
        self.airborne = true;
        true
    }

    /// Slide if permitted: shrink the collision envelope and arm the
    /// deferred restore. Further slides are locked until the restore fires.
    pub fn slide(&mut self, tuning: &Tuning) -> bool {
        if self.forward_speed == 0.0 || !self.can_slide {
            return false;
        }
        self.can_slide = false;
        self.collider = tuning.slide_collider;
        self.slide_timer = Some(tuning.slide_duration);
        true
    }

    /// Per-frame update: forward motion, lateral interpolation toward the
    /// target rail, and the slide-restore countdown. Returns whether the
    /// slide envelope was restored this frame.
    pub fn tick(&mut self, dt: f32, tuning: &Tuning) -> bool {
        if self.forward_speed != 0.0 {
            self.position.z += self.forward_speed * dt;
            self.position.x = lerp(self.position.x, self.target_x, tuning.horizontal_speed * dt);
        }

        // The restore is fire-and-forget: it keeps counting while the run
        // is frozen and still fires if actions were disabled mid-slide.
        if let Some(remaining) = self.slide_timer {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.slide_timer = None;
                self.collider = tuning.run_collider;
                self.can_slide = true;
                return true;
            }
            self.slide_timer = Some(remaining);
        }
        false
    }

    /// Fixed-step vertical correction: extra pull while airborne, then
    /// integrate the vertical axis
    pub fn fixed_tick(&mut self, dt: f32, tuning: &Tuning) {
        if self.airborne {
            self.vertical_vel -= tuning.extra_gravity * dt;
            self.position.y += self.vertical_vel * dt;
        }
    }

    /// Grounding signal from the collision system. Grounds the body when
    /// the contact's lowest point is within tolerance of its current
    /// vertical position; returns whether it was airborne until now.
    pub fn on_contact(&mut self, point: Vec3) -> bool {
        if point.y > self.position.y + GROUND_TOLERANCE {
            return false;
        }
        let landed = self.airborne;
        self.grounded = true;
        self.airborne = false;
        self.vertical_vel = 0.0;
        landed
    }
}
