use foundation::bounds::BoundingSphere;
use foundation::math::{HeadingPitchRange, HeadingPitchRoll, Vec2, Vec3};
use foundation::math::precision::stable_total_cmp_f64;
use scene::World;
use scene::picking::{PickHit, PickOptions, Ray, pick_ray};
use tracing::debug;

use crate::camera::{Camera, Viewport};
use crate::error::EngineError;
use crate::primitives::{PrimitiveCollection, PrimitiveId};
use crate::render::{PickedObject, RenderEngine};

/// Deterministic in-process engine.
///
/// Camera moves are applied immediately. Picking tests entity graphics first; tilesets are
/// picked through their bounding spheres, which stand in for the tile geometry.
/// Classification primitives are never pickable.
#[derive(Debug)]
pub struct HeadlessEngine {
    primitives: PrimitiveCollection,
    world: World,
    camera: Camera,
    pick_options: PickOptions,
    last_flight: Option<(Vec3, HeadingPitchRoll)>,
}

impl HeadlessEngine {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            primitives: PrimitiveCollection::new(),
            world: World::new(),
            camera: Camera::new(viewport),
            pick_options: PickOptions::default(),
            last_flight: None,
        }
    }

    pub fn with_pick_options(mut self, options: PickOptions) -> Self {
        self.pick_options = options;
        self
    }

    /// Destination and orientation of the most recent `fly_to`.
    pub fn last_flight(&self) -> Option<(Vec3, HeadingPitchRoll)> {
        self.last_flight
    }

    fn entity_hit(&self, ray: Ray) -> Option<PickHit> {
        pick_ray(&self.world, ray, self.pick_options)
    }

    fn tileset_hit(&self, ray: Ray) -> Option<(PrimitiveId, f64)> {
        let dir = ray.dir.normalize()?;
        let mut best: Option<(PrimitiveId, f64)> = None;
        for (id, tileset) in self.primitives.tilesets() {
            let Some(t) = surface_t(tileset.bounding_sphere(), ray.origin, dir) else {
                continue;
            };
            if t > self.pick_options.max_distance {
                continue;
            }
            // Insertion order breaks ties.
            let closer = best.is_none_or(|(_, bt)| stable_total_cmp_f64(t, bt).is_lt());
            if closer {
                best = Some((id, t));
            }
        }
        best
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

/// Distance to the sphere surface; from inside, the exit point.
fn surface_t(sphere: BoundingSphere, origin: Vec3, dir: Vec3) -> Option<f64> {
    let t = sphere.ray_hit_t(origin, dir)?;
    if t > 0.0 {
        return Some(t);
    }
    let oc = origin - sphere.center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;
    let exit = -b + (b * b - c).max(0.0).sqrt();
    (exit > 0.0).then_some(exit)
}

impl RenderEngine for HeadlessEngine {
    fn primitives(&self) -> &PrimitiveCollection {
        &self.primitives
    }

    fn primitives_mut(&mut self) -> &mut PrimitiveCollection {
        &mut self.primitives
    }

    fn entities(&self) -> &World {
        &self.world
    }

    fn entities_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    fn fly_to(&mut self, destination: Vec3, orientation: HeadingPitchRoll) {
        debug!(?destination, ?orientation, "fly to");
        self.camera.set_view(destination, orientation);
        self.last_flight = Some((destination, orientation));
    }

    fn zoom_to(
        &mut self,
        primitive: PrimitiveId,
        offset: HeadingPitchRange,
    ) -> Result<(), EngineError> {
        let sphere = self
            .primitives
            .get(primitive)
            .map(|p| p.bounding_sphere())
            .ok_or(EngineError::StalePrimitive(primitive))?;
        debug!(%primitive, radius = sphere.radius, "zoom to");
        self.camera.look_at_sphere(sphere, offset);
        Ok(())
    }

    fn pick(&self, screen: Vec2) -> Option<PickedObject> {
        let ray = self.camera.ray_through(screen)?;
        if let Some(hit) = self.entity_hit(ray) {
            let entity = self.world.get(hit.entity)?;
            return Some(PickedObject::Entity {
                entity: hit.entity,
                id: entity.id.clone(),
                name: entity.name.clone(),
                tag: self.world.pick_tag(hit.entity).cloned(),
            });
        }
        self.tileset_hit(ray)
            .map(|(primitive, _)| PickedObject::Primitive { primitive })
    }

    fn pick_position(&self, screen: Vec2) -> Option<Vec3> {
        let ray = self.camera.ray_through(screen)?;
        if let Some(hit) = self.entity_hit(ray) {
            return Some(hit.point);
        }
        let (_, t) = self.tileset_hit(ray)?;
        let dir = ray.dir.normalize()?;
        Some(ray.origin + dir.scale(t))
    }
}
