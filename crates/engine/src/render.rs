use foundation::math::{HeadingPitchRange, HeadingPitchRoll, Vec2, Vec3};
use scene::entity::{Entity, EntityId};
use scene::payload::PickTag;
use scene::{World, WorldError};

use crate::camera::{Camera, Viewport};
use crate::error::EngineError;
use crate::primitives::{Primitive, PrimitiveCollection, PrimitiveId};

/// Result of a screen-space pick.
#[derive(Debug, Clone, PartialEq)]
pub enum PickedObject {
    Entity {
        entity: EntityId,
        id: String,
        name: Option<String>,
        /// Typed tag from the world's side table, when one was attached.
        tag: Option<PickTag>,
    },
    Primitive {
        primitive: PrimitiveId,
    },
}

impl PickedObject {
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            PickedObject::Entity { id, .. } => Some(id),
            PickedObject::Primitive { .. } => None,
        }
    }
}

/// The rendering engine surface the viewer drives.
///
/// Implementations own the primitive collection, the entity world and the camera.
/// The provided methods are thin wrappers that keep entity ids and pick tags consistent.
pub trait RenderEngine {
    fn primitives(&self) -> &PrimitiveCollection;
    fn primitives_mut(&mut self) -> &mut PrimitiveCollection;

    fn entities(&self) -> &World;
    fn entities_mut(&mut self) -> &mut World;

    fn camera(&self) -> &Camera;
    fn camera_mut(&mut self) -> &mut Camera;

    /// Moves the camera to `destination` with an orientation in the local ENU frame.
    fn fly_to(&mut self, destination: Vec3, orientation: HeadingPitchRoll);

    /// Frames a primitive's bounding sphere; a zero range lets the engine pick one.
    fn zoom_to(&mut self, primitive: PrimitiveId, offset: HeadingPitchRange)
    -> Result<(), EngineError>;

    /// Topmost object under a canvas pixel.
    fn pick(&self, screen: Vec2) -> Option<PickedObject>;

    /// World position of the surface under a canvas pixel.
    fn pick_position(&self, screen: Vec2) -> Option<Vec3>;

    fn viewport(&self) -> Viewport {
        self.camera().viewport
    }

    fn add_primitive(&mut self, primitive: Primitive) -> PrimitiveId {
        self.primitives_mut().add(primitive)
    }

    fn remove_primitive(&mut self, id: PrimitiveId) -> Result<Primitive, EngineError> {
        self.primitives_mut().remove(id)
    }

    fn add_entity(
        &mut self,
        entity: Entity,
        tag: Option<PickTag>,
    ) -> Result<EntityId, EngineError> {
        let world = self.entities_mut();
        let added = match tag {
            Some(tag) => world.add_tagged(entity, tag),
            None => world.add(entity),
        };
        added.map_err(|err| match err {
            WorldError::DuplicateId(id) => EngineError::DuplicateEntity(id),
        })
    }

    fn remove_entity(&mut self, id: &str) -> bool {
        self.entities_mut().remove_by_id(id).is_some()
    }

    fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities().get_by_id(id)
    }

    /// Sets an entity's label visibility; false when the entity or its label is missing.
    fn set_label_visible(&mut self, id: &str, show: bool) -> bool {
        self.entities_mut()
            .get_by_id_mut(id)
            .is_some_and(|entity| entity.set_label_visible(show))
    }
}
