use bevy::prelude::*;
use std::collections::HashMap;

/// Identity of one rendered point, attached to its entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointUserData {
    pub set_index: usize,
    pub point_index: usize,
    pub absolute_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneEntry {
    pub entity: Entity,
    pub user_data: PointUserData,
}

/// Append-only registry of point entities for one load.
///
/// Absolute indices are handed out in registration order, which the scene
/// builder keeps set-major and point-minor.
#[derive(Resource, Default, Debug)]
pub struct SceneIndex {
    entries: Vec<SceneEntry>,
    by_entity: HashMap<Entity, usize>,
}

impl SceneIndex {
    pub fn register(&mut self, entity: Entity, set_index: usize, point_index: usize) -> usize {
        let absolute_index = self.entries.len();
        self.entries.push(SceneEntry {
            entity,
            user_data: PointUserData {
                set_index,
                point_index,
                absolute_index,
            },
        });
        self.by_entity.insert(entity, absolute_index);
        absolute_index
    }

    pub fn lookup(&self, absolute_index: usize) -> Option<&SceneEntry> {
        self.entries.get(absolute_index)
    }

    /// Absolute index of a hit-tested entity, if it belongs to this load.
    pub fn entity_at(&self, entity: Entity) -> Option<usize> {
        self.by_entity.get(&entity).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry ahead of a fresh load.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_entity.clear();
    }
}
