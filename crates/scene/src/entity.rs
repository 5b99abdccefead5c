use foundation::handles::Handle;
use foundation::math::{HeadingPitchRoll, Vec3};

use crate::components::{BoxGraphics, CylinderGraphics, LabelGraphics, PointGraphics, Transform};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub Handle);

impl EntityId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }
}

/// A positioned annotation or volume with optional point/label/box/cylinder graphics.
///
/// `id` is the caller-facing key (e.g. `building1_marker`); `name` is the display name,
/// which pickable entities use to carry their serialized pick tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub name: Option<String>,
    pub show: bool,
    pub transform: Transform,
    pub point: Option<PointGraphics>,
    pub label: Option<LabelGraphics>,
    pub box_graphics: Option<BoxGraphics>,
    pub cylinder: Option<CylinderGraphics>,
}

impl Entity {
    pub fn new(id: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            name: None,
            show: true,
            transform: Transform::translate(position),
            point: None,
            label: None,
            box_graphics: None,
            cylinder: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_orientation(mut self, orientation: HeadingPitchRoll) -> Self {
        self.transform = self.transform.with_orientation(orientation);
        self
    }

    pub fn with_point(mut self, point: PointGraphics) -> Self {
        self.point = Some(point);
        self
    }

    pub fn with_label(mut self, label: LabelGraphics) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_box(mut self, graphics: BoxGraphics) -> Self {
        self.box_graphics = Some(graphics);
        self
    }

    pub fn with_cylinder(mut self, graphics: CylinderGraphics) -> Self {
        self.cylinder = Some(graphics);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn label_visible(&self) -> bool {
        self.label.as_ref().is_some_and(|l| l.show)
    }

    /// Returns `false` when the entity has no label to toggle.
    pub fn set_label_visible(&mut self, show: bool) -> bool {
        match self.label.as_mut() {
            Some(label) => {
                label.show = show;
                true
            }
            None => false,
        }
    }
}
