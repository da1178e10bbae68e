use bevy::prelude::*;
use std::time::Duration;

/// Fires once after a period without pointer or wheel input.
#[derive(Resource, Debug)]
pub struct IdleTimer {
    timer: Timer,
}

impl IdleTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timer: Timer::new(timeout, TimerMode::Once),
        }
    }

    /// Restart the countdown after user activity.
    pub fn reset(&mut self) {
        self.timer.reset();
    }

    /// Advance the countdown, returning true on the tick it expires.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.timer.tick(delta).just_finished()
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleTimeout;

pub fn tick_idle_timer(
    time: Res<Time>,
    mut idle_timer: ResMut<IdleTimer>,
    mut timeouts: EventWriter<IdleTimeout>,
) {
    if idle_timer.tick(time.delta()) {
        debug!("Pointer idle, re-evaluating hover");
        timeouts.write(IdleTimeout);
    }
}
