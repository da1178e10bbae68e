use bevy::prelude::*;
use constants::render_settings::{CAMERA_ZOOM_FACTOR, TOOLTIP_OFFSET_PX};
use point_cloud_processing::Point3;
use std::mem;

use crate::engine::interaction::intersection::PointIntersection;
use crate::engine::interaction::tooltip::format_tooltip;
use crate::engine::scene::scene_index::{PointUserData, SceneIndex};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Idle,
    Hovering(usize),
    Dragging,
}

/// Cursor affordance requested by the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerCursor {
    #[default]
    Grab,
    Pointer,
    Grabbing,
    ZoomIn,
    ZoomOut,
}

/// Tooltip content and its position in logical window pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipState {
    pub text: String,
    pub left: f32,
    pub top: f32,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightChange {
    Highlight(Entity),
    Reset(Entity),
}

/// The point under the pointer, as reported by the hit-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointHit {
    pub entity: Entity,
    pub user_data: PointUserData,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMove {
    /// Dragging: apply this rotation to both scene groups.
    Rotate(Quat),
    /// A new point is under the pointer; publish the intersection.
    Intersect(PointIntersection),
    /// The active point is still under the pointer.
    Unchanged,
    /// Nothing under the pointer; highlights and tooltip were cleared.
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    Selected(usize),
    AlreadySelected,
    /// The pointer moved on before the event was read, or the entity does not
    /// match the registry.
    Stale,
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Selected {
    absolute_index: usize,
    entity: Entity,
}

/// Hover, selection, drag and zoom state for one scene.
///
/// Handlers only mutate this state and queue scale changes; systems apply
/// them to entities. At most one point is selected after any handler returns.
#[derive(Resource, Debug)]
pub struct SelectionController {
    mode: InteractionMode,
    active_entity: Option<Entity>,
    selected: Vec<Selected>,
    highlight_changes: Vec<HighlightChange>,
    tooltip: TooltipState,
    cursor: PointerCursor,
    zoom: f32,
    previous_pointer: Option<Vec2>,
    last_pointer: Option<Vec2>,
    redraw_requested: bool,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            active_entity: None,
            selected: Vec::new(),
            highlight_changes: Vec::new(),
            tooltip: TooltipState::default(),
            cursor: PointerCursor::Grab,
            zoom: 1.0,
            previous_pointer: None,
            last_pointer: None,
            redraw_requested: false,
        }
    }
}

impl SelectionController {
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        self.mode == InteractionMode::Dragging
    }

    pub fn active_entity(&self) -> Option<Entity> {
        self.active_entity
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected.iter().map(|s| s.absolute_index).collect()
    }

    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    pub fn cursor(&self) -> PointerCursor {
        self.cursor
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Last known pointer position, replayed when the pointer goes idle.
    pub fn idle_position(&self) -> Option<Vec2> {
        self.last_pointer
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.clear_selection();
        self.mode = InteractionMode::Dragging;
        self.previous_pointer = Some(position);
        self.last_pointer = Some(position);
        self.cursor = PointerCursor::Grabbing;
    }

    pub fn pointer_up(&mut self) {
        if self.is_dragging() {
            self.mode = InteractionMode::Idle;
            self.cursor = PointerCursor::Grab;
        }
        self.previous_pointer = None;
        self.redraw_requested = true;
    }

    /// Handle a pointer move. `hit` is ignored while dragging.
    pub fn pointer_move(&mut self, position: Vec2, hit: Option<PointHit>) -> PointerMove {
        self.last_pointer = Some(position);

        if self.is_dragging() {
            let previous = self.previous_pointer.replace(position).unwrap_or(position);
            self.cursor = PointerCursor::Grabbing;
            self.redraw_requested = true;
            return PointerMove::Rotate(drag_rotation(position - previous));
        }

        match hit {
            Some(hit) if self.active_entity == Some(hit.entity) => PointerMove::Unchanged,
            Some(hit) => {
                self.clear_highlights();
                self.mode = InteractionMode::Hovering(hit.user_data.absolute_index);
                self.active_entity = Some(hit.entity);
                self.cursor = PointerCursor::Pointer;
                PointerMove::Intersect(PointIntersection {
                    entity: hit.entity,
                    user_data: hit.user_data,
                    viewport_offset: position,
                })
            }
            None => {
                self.clear_selection();
                self.mode = InteractionMode::Idle;
                self.cursor = PointerCursor::Grab;
                PointerMove::Cleared
            }
        }
    }

    /// The pointer left the window. Outside a drag this drops the selection
    /// and forgets the last position so an idle replay cannot revive it.
    pub fn pointer_leave(&mut self) {
        if self.is_dragging() {
            return;
        }
        self.clear_selection();
        self.mode = InteractionMode::Idle;
        self.cursor = PointerCursor::Grab;
        self.last_pointer = None;
    }

    /// Select the point named by an intersection event and show its raw
    /// coordinates.
    pub fn consume_intersection(
        &mut self,
        intersection: &PointIntersection,
        scene_index: &SceneIndex,
        raw_sets: &[Vec<Point3>],
    ) -> ConsumeOutcome {
        if self.active_entity != Some(intersection.entity) {
            return ConsumeOutcome::Stale;
        }

        let user_data = intersection.user_data;
        let Some(entry) = scene_index.lookup(user_data.absolute_index) else {
            return ConsumeOutcome::OutOfRange;
        };
        if entry.entity != intersection.entity || entry.user_data != user_data {
            return ConsumeOutcome::Stale;
        }
        let Some(raw) = raw_sets
            .get(user_data.set_index)
            .and_then(|set| set.get(user_data.point_index))
        else {
            return ConsumeOutcome::OutOfRange;
        };

        if self
            .selected
            .iter()
            .any(|s| s.absolute_index == user_data.absolute_index)
        {
            return ConsumeOutcome::AlreadySelected;
        }

        self.clear_highlights();
        self.selected.push(Selected {
            absolute_index: user_data.absolute_index,
            entity: intersection.entity,
        });
        self.highlight_changes
            .push(HighlightChange::Highlight(intersection.entity));

        self.tooltip = TooltipState {
            text: format_tooltip(raw),
            left: intersection.viewport_offset.x - TOOLTIP_OFFSET_PX,
            top: intersection.viewport_offset.y - TOOLTIP_OFFSET_PX,
            visible: true,
        };
        self.redraw_requested = true;

        ConsumeOutcome::Selected(user_data.absolute_index)
    }

    /// Zoom from summed wheel deltas, using browser sign conventions where
    /// positive means scrolling away from the content. Returns true when the
    /// zoom changed.
    pub fn wheel(&mut self, delta: Vec3) -> bool {
        let axes = delta.to_array();
        if axes.iter().any(|d| *d > 0.0) {
            self.zoom /= CAMERA_ZOOM_FACTOR;
            self.cursor = PointerCursor::ZoomOut;
        } else if axes.iter().any(|d| *d < 0.0) {
            self.zoom *= CAMERA_ZOOM_FACTOR;
            self.cursor = PointerCursor::ZoomIn;
        } else {
            return false;
        }
        self.redraw_requested = true;
        true
    }

    pub fn has_highlight_changes(&self) -> bool {
        !self.highlight_changes.is_empty()
    }

    /// Scale changes queued since the last call, in the order they happened.
    pub fn take_highlight_changes(&mut self) -> Vec<HighlightChange> {
        mem::take(&mut self.highlight_changes)
    }

    pub fn redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    pub fn take_redraw_request(&mut self) -> bool {
        mem::take(&mut self.redraw_requested)
    }

    fn clear_highlights(&mut self) {
        for selected in self.selected.drain(..) {
            self.highlight_changes
                .push(HighlightChange::Reset(selected.entity));
        }
        self.redraw_requested = true;
    }

    fn clear_selection(&mut self) {
        self.clear_highlights();
        self.active_entity = None;
        self.tooltip.visible = false;
    }
}

/// Incremental rotation for a pointer delta in pixels: vertical motion turns
/// about X, horizontal motion about Y.
pub fn drag_rotation(delta: Vec2) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        delta.y.to_radians(),
        delta.x.to_radians(),
        0.0,
    )
}
