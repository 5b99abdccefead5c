use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::World;
use crate::components::DistanceDisplayCondition;
use crate::entity::{Entity, EntityId};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir.scale(t)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
    /// World-space radius used for point and label graphics, which have no volume.
    pub billboard_radius: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
            billboard_radius: 2.0,
        }
    }
}

/// Deterministic ray picking over entity graphics.
///
/// Ordering contract:
/// - The closest hit along the (normalized) ray wins.
/// - If multiple entities are hit at the same distance, the lower `EntityId::index()` wins.
///
/// Notes:
/// - Boxes and cylinders are tested in the entity's local frame, whatever their alpha.
/// - Points and shown labels are tested as small spheres, gated by their distance
///   display condition measured from the ray origin.
/// - Hidden entities (`show == false`) are ignored.
pub fn pick_ray(world: &World, ray: Ray, opts: PickOptions) -> Option<PickHit> {
    let dir = ray.dir.normalize()?;
    let ray = Ray::new(ray.origin, dir);

    let mut best: Option<(f64, EntityId)> = None;
    for (entity_id, entity) in world.iter() {
        if !entity.show {
            continue;
        }
        let Some(t) = entity_hit_t(entity, ray, opts) else {
            continue;
        };
        if t > opts.max_distance {
            continue;
        }

        best = match best {
            None => Some((t, entity_id)),
            Some((bt, be)) => {
                let ord =
                    stable_total_cmp_f64(t, bt).then_with(|| entity_id.index().cmp(&be.index()));
                if ord.is_lt() {
                    Some((t, entity_id))
                } else {
                    Some((bt, be))
                }
            }
        };
    }

    let (t, entity) = best?;
    Some(PickHit {
        entity,
        distance: t,
        point: ray.at(t),
    })
}

/// Screen picking wrapper.
///
/// The caller supplies a deterministic screen->ray mapping via `make_ray`.
pub fn pick_screen<F>(
    world: &World,
    x_px: f64,
    y_px: f64,
    mut make_ray: F,
    opts: PickOptions,
) -> Option<PickHit>
where
    F: FnMut(f64, f64) -> Option<Ray>,
{
    let ray = make_ray(x_px, y_px)?;
    pick_ray(world, ray, opts)
}

fn entity_hit_t(entity: &Entity, ray: Ray, opts: PickOptions) -> Option<f64> {
    let local_origin = entity.transform.world_to_local(ray.origin);
    let local_dir = entity.transform.world_to_local_vector(ray.dir);

    let mut best: Option<f64> = None;
    let mut consider = |t: Option<f64>| {
        if let Some(t) = t {
            best = Some(best.map_or(t, |b: f64| b.min(t)));
        }
    };

    if let Some(graphics) = &entity.box_graphics {
        let half = graphics.half_extents();
        consider(ray_box_hit_t(local_origin, local_dir, half));
    }
    if let Some(graphics) = &entity.cylinder {
        consider(ray_cylinder_hit_t(
            local_origin,
            local_dir,
            graphics.max_radius(),
            graphics.length * 0.5,
        ));
    }

    let camera_distance = ray.origin.distance(entity.position());
    let within =
        |c: Option<DistanceDisplayCondition>| c.is_none_or(|c| c.contains(camera_distance));
    let billboard = entity
        .point
        .as_ref()
        .is_some_and(|p| within(p.distance_display))
        || entity
            .label
            .as_ref()
            .is_some_and(|l| l.show && within(l.distance_display));
    if billboard {
        consider(ray_sphere_hit_t(
            ray.origin,
            ray.dir,
            entity.position(),
            opts.billboard_radius,
        ));
    }

    best
}

fn ray_box_hit_t(origin: Vec3, dir: Vec3, half: Vec3) -> Option<f64> {
    // Slabs intersection; returns entry distance.
    let o = origin.as_array();
    let d = dir.as_array();
    let h = half.as_array();
    let mut t_min = 0.0_f64;
    let mut t_max = f64::INFINITY;

    for axis in 0..3 {
        let (min, max) = (-h[axis], h[axis]);
        if d[axis].abs() < 1e-12 {
            if o[axis] < min || o[axis] > max {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d[axis];
        let mut t1 = (min - o[axis]) * inv;
        let mut t2 = (max - o[axis]) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_max < t_min {
            return None;
        }
    }

    Some(t_min)
}

/// Capped cylinder along local +Z, centered on the origin.
fn ray_cylinder_hit_t(origin: Vec3, dir: Vec3, radius: f64, half_length: f64) -> Option<f64> {
    // Cap slab along the axis.
    let (mut t_min, mut t_max) = if dir.z.abs() < 1e-12 {
        if origin.z.abs() > half_length {
            return None;
        }
        (0.0_f64, f64::INFINITY)
    } else {
        let mut t1 = (-half_length - origin.z) / dir.z;
        let mut t2 = (half_length - origin.z) / dir.z;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        (t1.max(0.0), t2)
    };

    // Radial extent in the XY plane.
    let a = dir.x * dir.x + dir.y * dir.y;
    let b = origin.x * dir.x + origin.y * dir.y;
    let c = origin.x * origin.x + origin.y * origin.y - radius * radius;
    if a < 1e-24 {
        if c > 0.0 {
            return None;
        }
    } else {
        let disc = b * b - a * c;
        if disc < 0.0 {
            return None;
        }
        let sqrt = disc.sqrt();
        t_min = t_min.max((-b - sqrt) / a);
        t_max = t_max.min((-b + sqrt) / a);
    }

    (t_max >= t_min).then_some(t_min)
}

fn ray_sphere_hit_t(origin: Vec3, dir: Vec3, center: Vec3, radius: f64) -> Option<f64> {
    foundation::bounds::BoundingSphere::new(center, radius).ray_hit_t(origin, dir)
}
