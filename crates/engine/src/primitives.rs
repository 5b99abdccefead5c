use std::collections::BTreeMap;
use std::fmt;

use foundation::arena::Arena;
use foundation::bounds::BoundingSphere;
use foundation::color::Color;
use foundation::handles::Handle;
use foundation::math::{Mat4, Vec3};

use crate::error::EngineError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveId(pub Handle);

impl PrimitiveId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }
}

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "primitive#{}.{}", self.0.index(), self.0.generation())
    }
}

/// Options applied when a tileset is created.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TilesetOptions {
    pub model_matrix: Mat4,
    pub maximum_screen_space_error: f64,
}

impl Default for TilesetOptions {
    fn default() -> Self {
        Self {
            model_matrix: Mat4::IDENTITY,
            maximum_screen_space_error: 16.0,
        }
    }
}

/// A loaded 3D Tiles tileset.
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    pub url: String,
    /// Root bounding sphere in tileset coordinates (root transform applied).
    pub root_sphere: BoundingSphere,
    pub model_matrix: Mat4,
    pub maximum_screen_space_error: f64,
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl Tileset {
    pub fn new(
        url: impl Into<String>,
        root_sphere: BoundingSphere,
        options: TilesetOptions,
    ) -> Self {
        Self {
            url: url.into(),
            root_sphere,
            model_matrix: options.model_matrix,
            maximum_screen_space_error: options.maximum_screen_space_error,
            properties: BTreeMap::new(),
        }
    }

    /// World-space bounding sphere (model matrix applied).
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(
            self.model_matrix.transform_point(self.root_sphere.center),
            self.root_sphere.radius * self.model_matrix.max_scale(),
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClassificationType {
    Terrain,
    Cesium3DTile,
    Both,
}

/// Translucent box that tints whatever 3D tile geometry it overlaps.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationPrimitive {
    /// Instance id reported when the volume is picked.
    pub id: String,
    /// Full edge lengths along the box's local axes.
    pub dimensions: Vec3,
    pub model_matrix: Mat4,
    pub color: Color,
    pub classification: ClassificationType,
    pub show: bool,
}

impl ClassificationPrimitive {
    pub fn boxed(
        id: impl Into<String>,
        dimensions: Vec3,
        model_matrix: Mat4,
        color: Color,
    ) -> Self {
        Self {
            id: id.into(),
            dimensions,
            model_matrix,
            color,
            classification: ClassificationType::Cesium3DTile,
            show: true,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.model_matrix.translation()
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(
            self.center(),
            self.dimensions.scale(0.5).length() * self.model_matrix.max_scale(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Tileset(Tileset),
    Classification(ClassificationPrimitive),
}

impl Primitive {
    pub fn bounding_sphere(&self) -> BoundingSphere {
        match self {
            Primitive::Tileset(t) => t.bounding_sphere(),
            Primitive::Classification(c) => c.bounding_sphere(),
        }
    }

    pub fn as_tileset(&self) -> Option<&Tileset> {
        match self {
            Primitive::Tileset(t) => Some(t),
            Primitive::Classification(_) => None,
        }
    }

    pub fn as_classification(&self) -> Option<&ClassificationPrimitive> {
        match self {
            Primitive::Classification(c) => Some(c),
            Primitive::Tileset(_) => None,
        }
    }
}

/// Scene primitive list: generational handles plus insertion order.
#[derive(Debug, Default)]
pub struct PrimitiveCollection {
    arena: Arena<Primitive>,
    order: Vec<PrimitiveId>,
}

impl PrimitiveCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, primitive: Primitive) -> PrimitiveId {
        let id = PrimitiveId(self.arena.insert(primitive));
        self.order.push(id);
        id
    }

    /// Removes and releases a primitive; a handle that is no longer live is an error.
    pub fn remove(&mut self, id: PrimitiveId) -> Result<Primitive, EngineError> {
        let primitive = self
            .arena
            .remove(id.0)
            .ok_or(EngineError::StalePrimitive(id))?;
        self.order.retain(|p| *p != id);
        Ok(primitive)
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.arena.get(id.0)
    }

    pub fn get_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive> {
        self.arena.get_mut(id.0)
    }

    pub fn contains(&self, id: PrimitiveId) -> bool {
        self.arena.contains(id.0)
    }

    /// The earliest-added primitive still in the collection.
    pub fn first(&self) -> Option<(PrimitiveId, &Primitive)> {
        let id = *self.order.first()?;
        self.get(id).map(|p| (id, p))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Primitives in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.arena.get(id.0).map(|p| (*id, p)))
    }

    pub fn tilesets(&self) -> impl Iterator<Item = (PrimitiveId, &Tileset)> + '_ {
        self.iter().filter_map(|(id, p)| p.as_tileset().map(|t| (id, t)))
    }

    pub fn classifications(
        &self,
    ) -> impl Iterator<Item = (PrimitiveId, &ClassificationPrimitive)> + '_ {
        self.iter()
            .filter_map(|(id, p)| p.as_classification().map(|c| (id, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ClassificationPrimitive, Primitive, PrimitiveCollection, Tileset, TilesetOptions,
    };
    use crate::error::EngineError;
    use foundation::bounds::BoundingSphere;
    use foundation::color::Color;
    use foundation::math::{Mat4, Vec3};

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} != {b} (eps={eps})");
    }

    fn tileset(url: &str) -> Primitive {
        Primitive::Tileset(Tileset::new(
            url,
            BoundingSphere::new(Vec3::new(0.0, 0.0, 100.0), 50.0),
            TilesetOptions {
                model_matrix: Mat4::from_translation(Vec3::new(0.0, 0.0, -170.0)),
                maximum_screen_space_error: 64.0,
            },
        ))
    }

    #[test]
    fn model_matrix_moves_bounding_sphere() {
        let collection = {
            let mut c = PrimitiveCollection::new();
            c.add(tileset("/a/tileset.json"));
            c
        };
        let (_, first) = collection.first().expect("first");
        let sphere = first.bounding_sphere();
        assert_close(sphere.center.z, -70.0, 1e-12);
        assert_close(sphere.radius, 50.0, 1e-12);
    }

    #[test]
    fn first_follows_insertion_order() {
        let mut collection = PrimitiveCollection::new();
        let a = collection.add(tileset("/a/tileset.json"));
        let b = collection.add(tileset("/b/tileset.json"));
        assert_eq!(collection.first().map(|(id, _)| id), Some(a));

        collection.remove(a).expect("remove a");
        assert_eq!(collection.first().map(|(id, _)| id), Some(b));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn double_remove_is_stale() {
        let mut collection = PrimitiveCollection::new();
        let id = collection.add(Primitive::Classification(ClassificationPrimitive::boxed(
            "building1",
            Vec3::new(2.0, 2.0, 2.0),
            Mat4::IDENTITY,
            Color::RED.with_alpha(0.6),
        )));
        collection.remove(id).expect("first remove");
        assert!(matches!(
            collection.remove(id),
            Err(EngineError::StalePrimitive(stale)) if stale == id
        ));
        assert!(collection.is_empty());
    }

    #[test]
    fn classification_sphere_covers_box() {
        let primitive = ClassificationPrimitive::boxed(
            "x",
            Vec3::new(6.0, 8.0, 0.0),
            Mat4::from_translation(Vec3::new(1.0, 1.0, 1.0)),
            Color::WHITE,
        );
        let sphere = primitive.bounding_sphere();
        assert_eq!(sphere.center, Vec3::new(1.0, 1.0, 1.0));
        assert_close(sphere.radius, 5.0, 1e-12);
    }
}
