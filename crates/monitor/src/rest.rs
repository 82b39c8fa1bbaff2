//! Work/rest cycle timer (20-20-20 rule)

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RestConfig;
use crate::state::{RestCycleState, RestPhase};

/// Phase change produced by one scheduler update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestTransition {
    /// Work interval elapsed; a rest break is due
    RestStarted,
    /// Rest break ran its full length
    RestCompleted,
}

/// Alternates between working and resting on frame timestamps
#[derive(Debug, Clone)]
pub struct RestCycleScheduler {
    config: RestConfig,
    state: RestCycleState,
    anchored: bool,
}

impl RestCycleScheduler {
    pub fn new(config: RestConfig) -> Self {
        Self {
            config,
            state: RestCycleState::default(),
            anchored: false,
        }
    }

    /// Advance the timer to `now`
    ///
    /// The first call anchors the work phase. At most one transition
    /// happens per call.
    pub fn update(&mut self, now: f64) -> Option<RestTransition> {
        if !self.anchored {
            self.anchored = true;
            self.state.phase_start_time = now;
            return None;
        }

        let elapsed = now - self.state.phase_start_time;
        match self.state.phase {
            RestPhase::Working if elapsed >= self.config.work_interval_sec => {
                self.state.phase = RestPhase::Resting;
                self.state.phase_start_time = now;
                self.state.cycles_scheduled += 1;
                info!(
                    "Rest break due: look 20 feet away for {:.0}s",
                    self.config.rest_duration_sec
                );
                Some(RestTransition::RestStarted)
            }
            RestPhase::Resting if elapsed >= self.config.rest_duration_sec => {
                self.state.phase = RestPhase::Working;
                self.state.phase_start_time = now;
                self.state.cycles_completed += 1;
                info!(
                    "Rest break completed ({}/{})",
                    self.state.cycles_completed, self.state.cycles_scheduled
                );
                Some(RestTransition::RestCompleted)
            }
            _ => None,
        }
    }

    pub fn phase(&self) -> RestPhase {
        self.state.phase
    }

    pub fn is_resting(&self) -> bool {
        self.state.phase == RestPhase::Resting
    }

    pub fn state(&self) -> &RestCycleState {
        &self.state
    }

    /// Seconds left in the current phase
    pub fn remaining(&self, now: f64) -> f64 {
        let length = match self.state.phase {
            RestPhase::Working => self.config.work_interval_sec,
            RestPhase::Resting => self.config.rest_duration_sec,
        };
        if !self.anchored {
            return length;
        }
        (length - (now - self.state.phase_start_time)).max(0.0)
    }

    pub fn reset(&mut self) {
        self.state = RestCycleState::default();
        self.anchored = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> RestCycleScheduler {
        RestCycleScheduler::new(RestConfig {
            work_interval_sec: 20.0,
            rest_duration_sec: 5.0,
        })
    }

    #[test]
    fn test_twenty_five_second_cycle() {
        let mut rest = scheduler();
        assert_eq!(rest.update(0.0), None);

        assert_eq!(rest.update(19.9), None);
        assert_eq!(rest.phase(), RestPhase::Working);

        assert_eq!(rest.update(20.0), Some(RestTransition::RestStarted));
        assert_eq!(rest.phase(), RestPhase::Resting);
        assert_eq!(rest.state().cycles_scheduled, 1);

        assert_eq!(rest.update(25.0), Some(RestTransition::RestCompleted));
        assert_eq!(rest.phase(), RestPhase::Working);
        assert_eq!(rest.state().cycles_completed, 1);
        assert_eq!(rest.state().phase_start_time, 25.0);
    }

    #[test]
    fn test_anchors_on_first_timestamp() {
        let mut rest = scheduler();
        rest.update(1000.0);
        assert_eq!(rest.update(1019.0), None);
        assert_eq!(rest.update(1020.0), Some(RestTransition::RestStarted));
    }

    #[test]
    fn test_one_transition_per_update() {
        let mut rest = scheduler();
        rest.update(0.0);
        // A long stall only starts the break; it does not also complete it
        assert_eq!(rest.update(100.0), Some(RestTransition::RestStarted));
        assert_eq!(rest.update(100.0), None);
        assert_eq!(rest.update(105.0), Some(RestTransition::RestCompleted));
    }

    #[test]
    fn test_remaining() {
        let mut rest = scheduler();
        assert_eq!(rest.remaining(0.0), 20.0);
        rest.update(0.0);
        assert_eq!(rest.remaining(5.0), 15.0);
        rest.update(20.0);
        assert_eq!(rest.remaining(22.0), 3.0);
        assert_eq!(rest.remaining(30.0), 0.0);
    }
}
