use foundation::math::{HeadingPitchRoll, Mat3, Mat4, Vec3, placement_matrix};

/// World position plus an orientation expressed in the local east-north-up frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: HeadingPitchRoll,
}

impl Transform {
    pub fn translate(position: Vec3) -> Self {
        Self {
            position,
            orientation: HeadingPitchRoll::default(),
        }
    }

    pub fn with_orientation(mut self, orientation: HeadingPitchRoll) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn to_matrix(&self) -> Mat4 {
        placement_matrix(self.position, self.orientation, Vec3::zero())
    }

    pub fn rotation(&self) -> Mat3 {
        self.to_matrix().rotation()
    }

    /// Expresses a world-space point in this transform's local axes.
    pub fn world_to_local(&self, point: Vec3) -> Vec3 {
        let rotation = self.rotation();
        let d = point - self.position;
        Vec3::new(
            rotation.column(0).dot(d),
            rotation.column(1).dot(d),
            rotation.column(2).dot(d),
        )
    }

    pub fn world_to_local_vector(&self, v: Vec3) -> Vec3 {
        let rotation = self.rotation();
        Vec3::new(
            rotation.column(0).dot(v),
            rotation.column(1).dot(v),
            rotation.column(2).dot(v),
        )
    }
}
