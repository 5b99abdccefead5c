//! Position dumps and throwaway overlay entities for lining highlights up with models.

use engine::RenderEngine;
use engine::primitives::Tileset;
use formats::{Dimensions, Rotation, Xyz};
use foundation::color::Color;
use foundation::math::{Vec2, Vec3};
use scene::components::{BoxGraphics, LabelGraphics, Outline, PointGraphics, VerticalOrigin};
use scene::entity::{Entity, EntityId};
use tracing::{debug, error};

use crate::model_info::to_geodetic;

pub const DEFAULT_DEBUG_COLOR: &str = "#FF0000";

pub fn log_highlight_position(
    name: &str,
    center: Vec3,
    rotation: Rotation,
    offset: Xyz,
    dimensions: Dimensions,
) {
    let geo = to_geodetic(center);
    debug!(
        name,
        x = center.x,
        y = center.y,
        z = center.z,
        longitude = %format!("{:.15}", geo.lon_deg()),
        latitude = %format!("{:.15}", geo.lat_deg()),
        height = %format!("{:.2}", geo.alt_m),
        ?rotation,
        ?offset,
        ?dimensions,
        "highlight position"
    );
}

pub fn log_tileset_position(name: &str, tileset: &Tileset) {
    let sphere = tileset.bounding_sphere();
    let geo = to_geodetic(sphere.center);
    debug!(
        name,
        x = sphere.center.x,
        y = sphere.center.y,
        z = sphere.center.z,
        longitude = %format!("{:.15}", geo.lon_deg()),
        latitude = %format!("{:.15}", geo.lat_deg()),
        height = %format!("{:.2}", geo.alt_m),
        radius = sphere.radius,
        model_matrix = ?tileset.model_matrix,
        "tileset position"
    );
}

/// Logs how far apart two positions are and returns the distance.
pub fn compare_positions(name_a: &str, a: Vec3, name_b: &str, b: Vec3) -> f64 {
    let distance = a.distance(b);
    let diff = b - a;
    debug!(
        from = name_a,
        to = name_b,
        distance = %format!("{distance:.2}"),
        dx = %format!("{:.2}", diff.x),
        dy = %format!("{:.2}", diff.y),
        dz = %format!("{:.2}", diff.z),
        "position difference"
    );
    distance
}

/// Adds an outlined translucent box at `center`.
pub fn visualize_bounding_box(
    engine: &mut dyn RenderEngine,
    center: Vec3,
    dimensions: Dimensions,
    color: &str,
) -> Option<EntityId> {
    let color = match Color::from_css(color) {
        Ok(color) => color,
        Err(err) => {
            error!(%err, "debug box color");
            return None;
        }
    };
    let mut graphics = BoxGraphics::new(dimensions.to_vec3(), color.with_alpha(0.3));
    graphics.outline = Some(Outline { color, width: 2.0 });
    let id = engine
        .entities_mut()
        .add_anonymous(Entity::new("", center).with_box(graphics));
    debug!(?center, ?dimensions, "debug box added");
    Some(id)
}

/// Adds a labeled point at `position`.
pub fn add_debug_marker(
    engine: &mut dyn RenderEngine,
    position: Vec3,
    label: &str,
    color: &str,
) -> Option<EntityId> {
    let color = match Color::from_css(color) {
        Ok(color) => color,
        Err(err) => {
            error!(%err, "debug marker color");
            return None;
        }
    };
    let point = PointGraphics {
        pixel_size: 10.0,
        color,
        outline_color: Color::WHITE,
        outline_width: 2.0,
        distance_display: None,
    };
    let label = LabelGraphics {
        font: "14pt sans-serif".to_string(),
        fill_color: color,
        outline_color: Color::BLACK,
        outline_width: 2.0,
        vertical_origin: VerticalOrigin::Bottom,
        pixel_offset: Vec2::new(0.0, -10.0),
        ..LabelGraphics::new(label)
    };
    let id = engine
        .entities_mut()
        .add_anonymous(Entity::new("", position).with_point(point).with_label(label));
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_DEBUG_COLOR, add_debug_marker, compare_positions, visualize_bounding_box};
    use engine::{HeadlessEngine, RenderEngine};
    use formats::Dimensions;
    use foundation::math::Vec3;

    #[test]
    fn overlays_become_entities() {
        let mut engine = HeadlessEngine::default();
        let center = Vec3::new(-2306846.0, 5418737.0, 2440539.0);

        let boxed = visualize_bounding_box(
            &mut engine,
            center,
            Dimensions::new(65.0, 50.0, 4.0),
            DEFAULT_DEBUG_COLOR,
        )
        .expect("box");
        let marker =
            add_debug_marker(&mut engine, center, "anchor", "#00FF00").expect("marker");

        assert_ne!(boxed, marker);
        assert_eq!(engine.entities().len(), 2);
        let entity = engine.entities().get(boxed).expect("entity");
        assert!(entity.id.starts_with("entity-"));
        assert!(entity.box_graphics.as_ref().is_some_and(|b| b.outline.is_some()));
    }

    #[test]
    fn bad_color_adds_nothing() {
        let mut engine = HeadlessEngine::default();
        assert!(add_debug_marker(&mut engine, Vec3::zero(), "x", "not-a-color").is_none());
        assert!(engine.entities().is_empty());
    }

    #[test]
    fn compare_reports_distance() {
        let d = compare_positions("a", Vec3::new(0.0, 0.0, 0.0), "b", Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(d, 5.0);
    }
}
