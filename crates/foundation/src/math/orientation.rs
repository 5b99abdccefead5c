/// Heading/pitch/roll in radians.
///
/// Heading is clockwise from north, pitch is positive above the horizon, roll is about the
/// forward axis.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct HeadingPitchRoll {
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl HeadingPitchRoll {
    pub const fn new(heading: f64, pitch: f64, roll: f64) -> Self {
        Self {
            heading,
            pitch,
            roll,
        }
    }

    pub fn from_degrees(heading: f64, pitch: f64, roll: f64) -> Self {
        Self::new(heading.to_radians(), pitch.to_radians(), roll.to_radians())
    }

    /// Straight down, north up.
    pub fn top_down() -> Self {
        Self::new(0.0, -std::f64::consts::FRAC_PI_2, 0.0)
    }
}

/// Camera offset relative to a target: heading/pitch in radians, range in meters.
///
/// A range of zero lets the engine pick a distance that frames the target.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct HeadingPitchRange {
    pub heading: f64,
    pub pitch: f64,
    pub range: f64,
}

impl HeadingPitchRange {
    pub const fn new(heading: f64, pitch: f64, range: f64) -> Self {
        Self {
            heading,
            pitch,
            range,
        }
    }
}
