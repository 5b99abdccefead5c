/// Camera distance window, in meters, inside which a graphic is drawn.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DistanceDisplayCondition {
    pub near: f64,
    pub far: f64,
}

impl DistanceDisplayCondition {
    pub fn new(near: f64, far: f64) -> Self {
        Self { near, far }
    }

    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.near && distance <= self.far
    }
}

impl Default for DistanceDisplayCondition {
    fn default() -> Self {
        Self::new(0.0, f64::INFINITY)
    }
}
