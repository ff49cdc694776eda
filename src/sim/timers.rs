//! Single-shot delayed transitions
//!
//! Timers advance with the host's frame time and post an event once. Resetting
//! the session cancels everything still pending, so a stale game-over delay
//! can never fire into a new game.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Game-over delay elapsed
    EnterName,
    /// Level number has been shown long enough
    HideLevelBanner,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    event: TimerEvent,
    /// Seconds
    remaining: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: Vec<PendingTimer>,
}

impl Timers {
    /// Arm a timer. Re-arming an event restarts its delay.
    pub fn schedule(&mut self, event: TimerEvent, delay: f32) {
        self.cancel(event);
        self.pending.push(PendingTimer {
            event,
            remaining: delay.max(0.0),
        });
    }

    pub fn cancel(&mut self, event: TimerEvent) {
        self.pending.retain(|t| t.event != event);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, event: TimerEvent) -> bool {
        self.pending.iter().any(|t| t.event == event)
    }

    /// Advance by `dt` seconds, returning events that fired (in arming order)
    pub fn advance(&mut self, dt: f32) -> Vec<TimerEvent> {
        let mut fired = Vec::new();
        self.pending.retain_mut(|t| {
            t.remaining -= dt;
            if t.remaining <= 0.0 {
                fired.push(t.event);
                false
            } else {
                true
            }
        });
        fired
    }
}
