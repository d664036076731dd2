use log::{debug, warn};

use crate::flags::MovementFlags;

/// Delay between seeing the draw midpoint and reporting the bow as drawn.
pub const DEFAULT_ARM_DELAY: f32 = 0.1;

/// Smooths the bow-draw bits under the archery animation mod (AGO).
///
/// With that mod the movement bits drop out for a single frame at full draw,
/// which makes the camera snap out of its aiming offset and back. The tracker
/// latches once the draw passes its midpoint and only reports "drawn" after a
/// short arm delay, until the nock is released.
///
/// One tracker follows exactly one actor. It is not meant to be shared
/// between threads.
#[derive(Debug, Clone)]
pub struct BowDrawTracker {
    last_drawn_timer: f32,
    drawn_last_call: bool,
    objective: bool,
    arm_delay: f32,
}

impl Default for BowDrawTracker {
    fn default() -> Self {
        Self::new(DEFAULT_ARM_DELAY)
    }
}

// NaN never lets the timer expire and a negative delay skips it entirely
fn checked_arm_delay(arm_delay: f32) -> f32 {
    if arm_delay.is_finite() && arm_delay >= 0.0 {
        arm_delay
    } else {
        warn!("[BOW] Invalid arm delay {}, using {}s", arm_delay, DEFAULT_ARM_DELAY);
        DEFAULT_ARM_DELAY
    }
}

impl BowDrawTracker {
    /// Non-finite or negative delays fall back to [`DEFAULT_ARM_DELAY`].
    pub fn new(arm_delay: f32) -> Self {
        Self {
            last_drawn_timer: 0.0,
            drawn_last_call: false,
            objective: false,
            arm_delay: checked_arm_delay(arm_delay),
        }
    }

    pub fn arm_delay(&self) -> f32 {
        self.arm_delay
    }

    pub fn set_arm_delay(&mut self, arm_delay: f32) {
        self.arm_delay = checked_arm_delay(arm_delay);
    }

    pub fn objective(&self) -> bool {
        self.objective
    }

    pub fn drawn_last_call(&self) -> bool {
        self.drawn_last_call
    }

    pub fn reset(&mut self) {
        if self.objective {
            debug!("[BOW] Draw released, clearing latch");
        }
        self.drawn_last_call = false;
        self.objective = false;
    }

    /// Feed one frame. `now` must come from the same clock every call.
    pub fn update(&mut self, movement: MovementFlags, now: f32) -> bool {
        if !movement.is_bow_nocked() || movement.is_bow_released() {
            self.reset();
            return false;
        }

        if movement.is_bow_midpoint() {
            self.objective = true;
        }

        if self.objective && !self.drawn_last_call {
            self.drawn_last_call = true;
            self.last_drawn_timer = now + self.arm_delay;
            debug!("[BOW] Draw midpoint seen at {:.3}s, armed until {:.3}s", now, self.last_drawn_timer);
        }

        self.objective && now > self.last_drawn_timer
    }
}

/// Draw detection without smoothing. Crossbows only count once the bolt is
/// past the midpoint bit as well.
pub fn is_bow_drawn_raw(movement: MovementFlags, crossbow: bool) -> bool {
    if crossbow {
        movement.is_bow_nocked() && movement.is_bow_midpoint()
    } else {
        movement.is_bow_nocked()
    }
}
