use foundation::math::{Geodetic, ecef_to_geodetic, horizontal_distance};

use super::{CylinderShape, PolygonShape, Primitive};

impl CylinderShape {
    /// Bottom and top ellipsoidal heights of the cylinder.
    pub fn altitude_band(&self) -> (f64, f64) {
        let center = ecef_to_geodetic(self.position);
        let half = self.length * 0.5;
        (center.alt_m - half, center.alt_m + half)
    }

    pub fn contains(&self, point: Geodetic, tolerance: f64) -> bool {
        let center = ecef_to_geodetic(self.position);
        let (bottom, top) = self.altitude_band();
        horizontal_distance(center, point) <= self.radius + tolerance
            && point.alt_m >= bottom - tolerance
            && point.alt_m <= top + tolerance
    }
}

impl PolygonShape {
    /// Flat footprints have no volume and never contain a point.
    pub fn contains(&self, point: Geodetic, tolerance: f64) -> bool {
        let (Some(a), Some(b)) = (self.height, self.extruded_height) else {
            return false;
        };
        if self.vertices.len() < 3 {
            return false;
        }
        let (bottom, top) = (a.min(b), a.max(b));
        if point.alt_m < bottom - tolerance || point.alt_m > top + tolerance {
            return false;
        }

        let ring: Vec<(f64, f64)> = self
            .vertices
            .iter()
            .map(|v| {
                let g = ecef_to_geodetic(*v);
                (g.lon_rad, g.lat_rad)
            })
            .collect();
        point_in_ring(&ring, (point.lon_rad, point.lat_rad))
    }
}

impl Primitive {
    /// Volume containment used by picking. Points and labels are never hit.
    pub fn contains(&self, point: Geodetic, tolerance: f64) -> bool {
        match self {
            Primitive::Cylinder(c) => c.contains(point, tolerance),
            Primitive::Polygon(p) => p.contains(point, tolerance),
            Primitive::Point(_) | Primitive::Label(_) => false,
        }
    }
}

// Even-odd crossing test.
fn point_in_ring(ring: &[(f64, f64)], p: (f64, f64)) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > p.1) != (yj > p.1) && p.0 < (xj - xi) * (p.1 - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
