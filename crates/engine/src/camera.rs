use foundation::bounds::BoundingSphere;
use foundation::math::{
    EnuFrame, HeadingPitchRange, HeadingPitchRoll, Vec2, Vec3, ecef_from_degrees,
};
use scene::picking::Ray;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Perspective camera in world (ECEF) space.
///
/// Direction and up are kept as world vectors, so moving the camera does not rotate it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub fov_y: f64,
    pub viewport: Viewport,
}

impl Camera {
    pub const DEFAULT_FOV_Y: f64 = std::f64::consts::FRAC_PI_3;

    pub fn new(viewport: Viewport) -> Self {
        let mut camera = Self {
            position: Vec3::zero(),
            direction: -Vec3::UNIT_Z,
            up: Vec3::UNIT_Y,
            fov_y: Self::DEFAULT_FOV_Y,
            viewport,
        };
        camera.set_view(
            Vec3::from(ecef_from_degrees(0.0, 0.0, 10_000_000.0)),
            HeadingPitchRoll::top_down(),
        );
        camera
    }

    /// Places the camera at `destination` with an orientation relative to the local
    /// east/north/up frame there.
    pub fn set_view(&mut self, destination: Vec3, orientation: HeadingPitchRoll) {
        let frame = EnuFrame::at(destination);
        let (direction, up) = local_axes(orientation);
        self.position = destination;
        self.direction = frame.local_to_world_vector(direction);
        self.up = frame.local_to_world_vector(up);
    }

    pub fn right(&self) -> Vec3 {
        self.direction.cross(self.up)
    }

    /// Heading and pitch recovered from the current direction; roll is reported as zero.
    pub fn orientation(&self) -> HeadingPitchRoll {
        let frame = EnuFrame::at(self.position);
        let east = self.direction.dot(frame.east);
        let north = self.direction.dot(frame.north);
        let up = self.direction.dot(frame.up).clamp(-1.0, 1.0);
        let pitch = up.asin();
        let heading = if east.abs() < 1e-12 && north.abs() < 1e-12 {
            // Looking straight up or down: heading follows the up vector.
            let ue = self.up.dot(frame.east);
            let un = self.up.dot(frame.north);
            if pitch < 0.0 { ue.atan2(un) } else { (-ue).atan2(-un) }
        } else {
            east.atan2(north)
        };
        HeadingPitchRoll::new(wrap_heading(heading), pitch, 0.0)
    }

    pub fn distance_to(&self, target: Vec3) -> f64 {
        self.position.distance(target)
    }

    /// World ray through a canvas pixel (origin top-left, y down).
    pub fn ray_through(&self, screen: Vec2) -> Option<Ray> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return None;
        }
        let ndc_x = 2.0 * screen.x / self.viewport.width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / self.viewport.height;
        let tan_half = (self.fov_y * 0.5).tan();

        let dir = self.direction
            + self.right().scale(ndc_x * tan_half * self.viewport.aspect())
            + self.up.scale(ndc_y * tan_half);
        Some(Ray::new(self.position, dir.normalize()?))
    }

    /// Range that frames a sphere of `radius` in the vertical field of view.
    pub fn framing_range(&self, radius: f64) -> f64 {
        let range = radius / (self.fov_y * 0.5).tan();
        range.max(1.0)
    }

    /// Points the camera at a sphere's center from the given offset.
    ///
    /// A zero range is replaced by `framing_range`.
    pub fn look_at_sphere(&mut self, sphere: BoundingSphere, offset: HeadingPitchRange) {
        let range = if offset.range > 0.0 {
            offset.range
        } else {
            self.framing_range(sphere.radius)
        };
        let orientation = HeadingPitchRoll::new(offset.heading, offset.pitch, 0.0);
        let frame = EnuFrame::at(sphere.center);
        let (direction, up) = local_axes(orientation);
        let direction = frame.local_to_world_vector(direction);

        self.position = sphere.center - direction.scale(range);
        self.direction = direction;
        self.up = frame.local_to_world_vector(up);
    }
}

/// Heading in `[0, 2π)`; values that round up to a full turn become 0.
fn wrap_heading(heading: f64) -> f64 {
    const EPSILON: f64 = 1e-12;
    let wrapped = heading.rem_euclid(std::f64::consts::TAU);
    if wrapped.abs() < EPSILON || std::f64::consts::TAU - wrapped < EPSILON {
        0.0
    } else {
        wrapped
    }
}

/// Camera direction and up in east/north/up coordinates.
fn local_axes(orientation: HeadingPitchRoll) -> (Vec3, Vec3) {
    let (sh, ch) = orientation.heading.sin_cos();
    let (sp, cp) = orientation.pitch.sin_cos();
    let direction = Vec3::new(sh * cp, ch * cp, sp);
    let up = Vec3::new(-sh * sp, -ch * sp, cp);
    (direction, up)
}

#[cfg(test)]
mod tests {
    use super::{Camera, Viewport, wrap_heading};
    use foundation::bounds::BoundingSphere;
    use foundation::math::{
        EnuFrame, HeadingPitchRange, HeadingPitchRoll, Vec2, Vec3, ecef_from_degrees,
    };

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} != {b} (eps={eps})");
    }

    fn campus(height: f64) -> Vec3 {
        Vec3::from(ecef_from_degrees(113.0609, 22.6454, height))
    }

    #[test]
    fn top_down_looks_along_negative_up() {
        let mut camera = Camera::new(Viewport::default());
        camera.set_view(campus(1000.0), HeadingPitchRoll::top_down());

        let frame = EnuFrame::at(campus(1000.0));
        assert_close(camera.direction.dot(frame.up), -1.0, 1e-12);
        assert_close(camera.up.dot(frame.north), 1.0, 1e-12);
        assert_close(camera.right().dot(frame.east), 1.0, 1e-12);
    }

    #[test]
    fn orientation_round_trips() {
        let mut camera = Camera::new(Viewport::default());
        let hpr = HeadingPitchRoll::from_degrees(30.0, -45.0, 0.0);
        camera.set_view(campus(500.0), hpr);

        let back = camera.orientation();
        assert_close(back.heading, hpr.heading, 1e-9);
        assert_close(back.pitch, hpr.pitch, 1e-9);

        camera.set_view(campus(500.0), HeadingPitchRoll::top_down());
        let back = camera.orientation();
        assert_close(back.heading, 0.0, 1e-9);
        assert_close(back.pitch, HeadingPitchRoll::top_down().pitch, 1e-9);
    }

    #[test]
    fn heading_wraps_without_reaching_full_turn() {
        assert_eq!(wrap_heading(-0.0), 0.0);
        assert_eq!(wrap_heading(-1e-17), 0.0);
        assert_eq!(wrap_heading(std::f64::consts::TAU), 0.0);
        assert_close(
            wrap_heading(-std::f64::consts::FRAC_PI_2),
            1.5 * std::f64::consts::PI,
            1e-12,
        );

        let mut camera = Camera::new(Viewport::default());
        camera.set_view(campus(500.0), HeadingPitchRoll::top_down());
        let heading = camera.orientation().heading;
        assert!(heading < std::f64::consts::PI, "heading {heading}");
        assert_close(heading, 0.0, 1e-9);
    }

    #[test]
    fn center_pixel_ray_is_view_direction() {
        let mut camera = Camera::new(Viewport::new(800.0, 600.0));
        camera.set_view(campus(1000.0), HeadingPitchRoll::top_down());

        let ray = camera
            .ray_through(Vec2::new(400.0, 300.0))
            .expect("ray");
        assert_close(ray.dir.dot(camera.direction), 1.0, 1e-12);

        // Left edge of the canvas tilts the ray toward -right.
        let left = camera.ray_through(Vec2::new(0.0, 300.0)).expect("ray");
        assert!(left.dir.dot(camera.right()) < 0.0);
        let top = camera.ray_through(Vec2::new(400.0, 0.0)).expect("ray");
        assert!(top.dir.dot(camera.up) > 0.0);
    }

    #[test]
    fn look_at_places_camera_above_target() {
        let mut camera = Camera::new(Viewport::default());
        let sphere = BoundingSphere::new(campus(0.0), 100.0);
        camera.look_at_sphere(
            sphere,
            HeadingPitchRange::new(0.0, -std::f64::consts::FRAC_PI_2, 0.0),
        );

        let expected = camera.framing_range(100.0);
        assert_close(camera.distance_to(sphere.center), expected, 1e-6);
        let frame = EnuFrame::at(sphere.center);
        assert_close((camera.position - sphere.center).dot(frame.up), expected, 1e-6);
    }

    #[test]
    fn degenerate_viewport_has_no_rays() {
        let camera = Camera::new(Viewport::new(0.0, 0.0));
        assert!(camera.ray_through(Vec2::new(0.0, 0.0)).is_none());
    }
}
