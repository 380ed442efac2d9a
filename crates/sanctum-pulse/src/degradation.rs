// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Graceful degradation under repeated cycle failure.

Each unhandled cycle failure steps the target frequency down a fixed ladder
(90 → 45 → 30 by halving), clamped at the frequency floor. At the floor, the
controller reports a sacred pause and a bounded recovery sleep instead of
degrading further. Stepping back up is not this controller's job: the
scheduler owns the ramp-up policy and drives it from sustained steady cycles.
*/

use std::time::Duration;

use tracing::warn;

use crate::state::{HeartbeatState, Status};

#[derive(Debug, Clone)]
pub struct DegradationController {
    floor_hz: f64,
    recovery_pause: Duration,
}

impl DegradationController {
    pub fn new(floor_hz: f64, recovery_pause: Duration) -> Self {
        Self {
            floor_hz,
            recovery_pause,
        }
    }

    /// Step the target down one tier, or enter the sacred-pause regime when
    /// already at the floor. Returns the recovery pause the caller must
    /// sleep, if any.
    pub fn on_cycle_failure(&self, state: &mut HeartbeatState) -> Option<Duration> {
        if state.target_hz > self.floor_hz {
            let next = (state.target_hz / 2.0).max(self.floor_hz);
            warn!(
                "[DEGRADE] cycle failure: target stepped down {:.1} -> {:.1} Hz",
                state.target_hz, next
            );
            state.target_hz = next;
            None
        } else {
            state.target_hz = self.floor_hz;
            state.status = Status::SacredPause;
            warn!(
                "[DEGRADE] cycle failure at the {:.1} Hz floor: sacred pause for {:?}",
                self.floor_hz, self.recovery_pause
            );
            Some(self.recovery_pause)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> DegradationController {
        DegradationController::new(30.0, Duration::from_millis(100))
    }

    #[test]
    fn ladder_descends_90_45_30_and_holds() {
        let c = controller();
        let mut state = HeartbeatState::new(90.0);

        assert!(c.on_cycle_failure(&mut state).is_none());
        assert_eq!(state.target_hz, 45.0);

        assert!(c.on_cycle_failure(&mut state).is_none());
        assert_eq!(state.target_hz, 30.0);

        // Third failure: no further reduction, sacred pause instead.
        let pause = c.on_cycle_failure(&mut state);
        assert_eq!(state.target_hz, 30.0);
        assert_eq!(state.status, Status::SacredPause);
        assert_eq!(pause, Some(Duration::from_millis(100)));
    }

    #[test]
    fn target_never_drops_below_the_floor() {
        let c = controller();
        let mut state = HeartbeatState::new(50.0);

        c.on_cycle_failure(&mut state);
        // 50 / 2 = 25 would undershoot; clamped at the floor.
        assert_eq!(state.target_hz, 30.0);

        c.on_cycle_failure(&mut state);
        assert_eq!(state.target_hz, 30.0);
        assert_eq!(state.status, Status::SacredPause);
    }

    #[test]
    fn non_floor_steps_do_not_touch_status() {
        let c = controller();
        let mut state = HeartbeatState::new(90.0);
        state.status = Status::Steady;
        c.on_cycle_failure(&mut state);
        assert_eq!(state.status, Status::Steady);
    }
}
