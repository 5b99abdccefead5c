use super::{Ecef, Geodetic, Mat3, Mat4, Vec3, geodetic_surface_normal, geodetic_to_ecef};

/// Local East-North-Up coordinates (meters).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Enu {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

impl Enu {
    pub fn new(east: f64, north: f64, up: f64) -> Self {
        Self { east, north, up }
    }
}

pub fn ecef_to_enu(point: Ecef, origin: Geodetic) -> Enu {
    let origin_ecef = geodetic_to_ecef(origin);
    let dx = point.x - origin_ecef.x;
    let dy = point.y - origin_ecef.y;
    let dz = point.z - origin_ecef.z;

    let sin_lat = origin.lat_rad.sin();
    let cos_lat = origin.lat_rad.cos();
    let sin_lon = origin.lon_rad.sin();
    let cos_lon = origin.lon_rad.cos();

    let east = -sin_lon * dx + cos_lon * dy;
    let north = -sin_lat * cos_lon * dx - sin_lat * sin_lon * dy + cos_lat * dz;
    let up = cos_lat * cos_lon * dx + cos_lat * sin_lon * dy + sin_lat * dz;

    Enu::new(east, north, up)
}

pub fn enu_to_ecef(enu: Enu, origin: Geodetic) -> Ecef {
    let origin_ecef = geodetic_to_ecef(origin);

    let sin_lat = origin.lat_rad.sin();
    let cos_lat = origin.lat_rad.cos();
    let sin_lon = origin.lon_rad.sin();
    let cos_lon = origin.lon_rad.cos();

    let dx = -sin_lon * enu.east - sin_lat * cos_lon * enu.north + cos_lat * cos_lon * enu.up;
    let dy = cos_lon * enu.east - sin_lat * sin_lon * enu.north + cos_lat * sin_lon * enu.up;
    let dz = cos_lat * enu.north + sin_lat * enu.up;

    Ecef::new(origin_ecef.x + dx, origin_ecef.y + dy, origin_ecef.z + dz)
}

/// Orthonormal east/north/up axes anchored at a world-space point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnuFrame {
    pub origin: Vec3,
    pub east: Vec3,
    pub north: Vec3,
    pub up: Vec3,
}

impl EnuFrame {
    /// Builds the frame from the ellipsoid normal under `origin`.
    ///
    /// On the polar axis east is pinned to +Y.
    pub fn at(origin: Vec3) -> Self {
        let up = geodetic_surface_normal(Ecef::from(origin));
        let east = if origin.x.abs() < 1e-9 && origin.y.abs() < 1e-9 {
            Vec3::UNIT_Y
        } else {
            Vec3::new(-origin.y, origin.x, 0.0)
                .normalize()
                .unwrap_or(Vec3::UNIT_Y)
        };
        let north = up.cross(east);
        Self {
            origin,
            east,
            north,
            up,
        }
    }

    pub fn rotation(&self) -> Mat3 {
        Mat3::from_columns(self.east, self.north, self.up)
    }

    /// Local-to-world matrix (the "fixed frame" transform).
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), self.origin)
    }

    pub fn local_to_world_vector(&self, local: Vec3) -> Vec3 {
        self.east.scale(local.x) + self.north.scale(local.y) + self.up.scale(local.z)
    }
}

pub fn east_north_up_to_fixed_frame(origin: Vec3) -> Mat4 {
    EnuFrame::at(origin).to_matrix()
}

#[cfg(test)]
mod tests {
    use super::{Enu, EnuFrame, ecef_to_enu, enu_to_ecef};
    use crate::math::{Geodetic, Vec3, WGS84_A, ecef_from_degrees, geodetic_to_ecef};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn enu_round_trip_at_equator() {
        let origin = Geodetic::new(0.0, 0.0, 0.0);
        let enu = Enu::new(15.0, -8.0, 2.5);
        let ecef = enu_to_ecef(enu, origin);
        let enu_rt = ecef_to_enu(ecef, origin);

        assert_close(enu_rt.east, enu.east, 1e-9);
        assert_close(enu_rt.north, enu.north, 1e-9);
        assert_close(enu_rt.up, enu.up, 1e-9);
    }

    #[test]
    fn enu_zero_at_origin() {
        let origin = Geodetic::new(0.1, -0.2, 35.0);
        let origin_ecef = geodetic_to_ecef(origin);
        let enu = ecef_to_enu(origin_ecef, origin);
        assert_close(enu.east, 0.0, 1e-9);
        assert_close(enu.north, 0.0, 1e-9);
        assert_close(enu.up, 0.0, 1e-9);
    }

    #[test]
    fn frame_at_equator_prime_meridian() {
        let frame = EnuFrame::at(Vec3::new(WGS84_A, 0.0, 0.0));
        assert_eq!(frame.east, Vec3::UNIT_Y);
        assert_close(frame.north.z, 1.0, 1e-12);
        assert_close(frame.up.x, 1.0, 1e-12);
    }

    #[test]
    fn frame_axes_agree_with_enu_conversion() {
        let origin = Geodetic::from_degrees(113.06, 22.64, 0.0);
        let anchor: Vec3 = geodetic_to_ecef(origin).into();
        let frame = EnuFrame::at(anchor);

        let local = Vec3::new(12.0, -7.0, 30.0);
        let world = anchor + frame.local_to_world_vector(local);
        let enu = ecef_to_enu(world.into(), origin);
        assert_close(enu.east, 12.0, 1e-6);
        assert_close(enu.north, -7.0, 1e-6);
        assert_close(enu.up, 30.0, 1e-6);

        let pole = EnuFrame::at(ecef_from_degrees(0.0, 90.0, 0.0).into());
        assert_eq!(pole.east, Vec3::UNIT_Y);
    }
}
