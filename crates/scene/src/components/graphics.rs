use foundation::color::Color;
use foundation::math::{Vec2, Vec3};

use super::DistanceDisplayCondition;

#[derive(Debug, Clone, PartialEq)]
pub struct PointGraphics {
    pub pixel_size: f64,
    pub color: Color,
    pub outline_color: Color,
    pub outline_width: f64,
    pub distance_display: Option<DistanceDisplayCondition>,
}

impl Default for PointGraphics {
    fn default() -> Self {
        Self {
            pixel_size: 1.0,
            color: Color::WHITE,
            outline_color: Color::BLACK,
            outline_width: 0.0,
            distance_display: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum VerticalOrigin {
    Top,
    #[default]
    Center,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelGraphics {
    pub text: String,
    pub font: String,
    pub fill_color: Color,
    pub outline_color: Color,
    pub outline_width: f64,
    pub vertical_origin: VerticalOrigin,
    pub pixel_offset: Vec2,
    pub background: Option<Color>,
    pub show: bool,
    pub distance_display: Option<DistanceDisplayCondition>,
}

impl LabelGraphics {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: "14pt sans-serif".to_string(),
            fill_color: Color::WHITE,
            outline_color: Color::BLACK,
            outline_width: 1.0,
            vertical_origin: VerticalOrigin::Center,
            pixel_offset: Vec2::new(0.0, 0.0),
            background: None,
            show: true,
            distance_display: None,
        }
    }
}

/// Oriented box; `dimensions` are full edge lengths along local east/north/up.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGraphics {
    pub dimensions: Vec3,
    pub material: Color,
    pub outline: Option<Outline>,
}

impl BoxGraphics {
    pub fn new(dimensions: Vec3, material: Color) -> Self {
        Self {
            dimensions,
            material,
            outline: None,
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        self.dimensions.scale(0.5)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Outline {
    pub color: Color,
    pub width: f64,
}

/// Cylinder centered on the entity position, axis along local up.
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderGraphics {
    pub length: f64,
    pub top_radius: f64,
    pub bottom_radius: f64,
    pub material: Color,
    pub slices: u32,
}

impl CylinderGraphics {
    pub fn new(length: f64, radius: f64, material: Color) -> Self {
        Self {
            length,
            top_radius: radius,
            bottom_radius: radius,
            material,
            slices: 128,
        }
    }

    pub fn max_radius(&self) -> f64 {
        self.top_radius.max(self.bottom_radius)
    }
}
