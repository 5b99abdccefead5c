use std::collections::BTreeMap;
use std::fmt;

use foundation::arena::Arena;

use crate::entity::{Entity, EntityId};
use crate::payload::PickTag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    DuplicateId(String),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::DuplicateId(id) => write!(f, "entity id already in use: {id}"),
        }
    }
}

impl std::error::Error for WorldError {}

/// Entity collection keyed by string id.
///
/// Pick tags live in a side table keyed by `EntityId`; they are dropped with the entity.
#[derive(Debug, Default)]
pub struct World {
    entities: Arena<Entity>,
    by_id: BTreeMap<String, EntityId>,
    pick_tags: BTreeMap<EntityId, PickTag>,
    next_anonymous: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: Entity) -> Result<EntityId, WorldError> {
        if self.by_id.contains_key(&entity.id) {
            return Err(WorldError::DuplicateId(entity.id));
        }
        let key = entity.id.clone();
        let id = EntityId(self.entities.insert(entity));
        self.by_id.insert(key, id);
        Ok(id)
    }

    /// Adds a pickable entity; when it has no display name the encoded tag becomes its name.
    pub fn add_tagged(&mut self, mut entity: Entity, tag: PickTag) -> Result<EntityId, WorldError> {
        if entity.name.is_none() {
            entity.name = Some(tag.to_name());
        }
        let id = self.add(entity)?;
        self.pick_tags.insert(id, tag);
        Ok(id)
    }

    /// Adds an entity under a generated id; any id already on `entity` is replaced.
    pub fn add_anonymous(&mut self, mut entity: Entity) -> EntityId {
        loop {
            self.next_anonymous += 1;
            let candidate = format!("entity-{}", self.next_anonymous);
            if !self.by_id.contains_key(&candidate) {
                entity.id = candidate;
                break;
            }
        }
        let key = entity.id.clone();
        let id = EntityId(self.entities.insert(entity));
        self.by_id.insert(key, id);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id.0)?;
        self.by_id.remove(&entity.id);
        self.pick_tags.remove(&id);
        Some(entity)
    }

    pub fn remove_by_id(&mut self, key: &str) -> Option<Entity> {
        let id = self.id_of(key)?;
        self.remove(id)
    }

    pub fn id_of(&self, key: &str) -> Option<EntityId> {
        self.by_id.get(key).copied()
    }

    pub fn contains_id(&self, key: &str) -> bool {
        self.by_id.contains_key(key)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0)
    }

    pub fn get_by_id(&self, key: &str) -> Option<&Entity> {
        self.get(self.id_of(key)?)
    }

    pub fn get_by_id_mut(&mut self, key: &str) -> Option<&mut Entity> {
        let id = self.id_of(key)?;
        self.get_mut(id)
    }

    pub fn set_pick_tag(&mut self, id: EntityId, tag: PickTag) -> bool {
        if !self.entities.contains(id.0) {
            return false;
        }
        self.pick_tags.insert(id, tag);
        true
    }

    pub fn pick_tag(&self, id: EntityId) -> Option<&PickTag> {
        self.pick_tags.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in ascending `EntityId::index()` order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities.iter().map(|(h, e)| (EntityId(h), e))
    }

    pub fn clear(&mut self) {
        let ids: Vec<EntityId> = self.iter().map(|(id, _)| id).collect();
        for id in ids {
            self.remove(id);
        }
    }
}
