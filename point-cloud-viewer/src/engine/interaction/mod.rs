//! Pointer interaction: hover picking, single-point selection with a
//! coordinate tooltip, drag rotation and wheel zoom.
//!
//! Hover detection publishes [`intersection::PointIntersection`] events and
//! the selection consumer reacts to them, so either side can be replaced
//! without touching the other.


/// Re-evaluates hover after a period without input.
pub mod idle_timer;

/// Event published when the pointer rests over a new point.
pub mod intersection;

/// Bevy systems translating window input into controller calls.
pub mod pointer_input;

/// Interaction state machine.
pub mod selection_controller;

/// Coordinate tooltip overlay and number formatting.
pub mod tooltip;

use bevy::prelude::*;
use std::time::Duration;

use crate::engine::core::app_state::AppState;
use idle_timer::{IdleTimeout, IdleTimer, tick_idle_timer};
use intersection::{PointIntersection, log_intersections};
use pointer_input::{
    apply_highlights, consume_intersections, handle_pointer_buttons, handle_pointer_motion,
    handle_wheel, request_redraw, sync_cursor_icon,
};
use selection_controller::SelectionController;
use tooltip::{spawn_tooltip, sync_tooltip};

pub struct SelectionPlugin {
    pub idle_timeout: Duration,
}

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectionController>()
            .insert_resource(IdleTimer::new(self.idle_timeout))
            .add_event::<PointIntersection>()
            .add_event::<IdleTimeout>()
            .add_systems(Startup, spawn_tooltip)
            .add_systems(
                Update,
                (
                    // Input
                    tick_idle_timer,
                    handle_pointer_buttons,
                    handle_pointer_motion,
                    handle_wheel,
                    // Intersection consumers
                    log_intersections,
                    consume_intersections,
                    // Presentation
                    apply_highlights,
                    sync_tooltip,
                    sync_cursor_icon,
                    request_redraw,
                )
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );
    }
}
