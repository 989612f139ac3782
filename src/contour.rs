use crate::Elevation;
use geo::{EuclideanLength, Polygon};
use geojson::JsonObject;

/// Stable external identifier of a contour polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContourId(pub i64);

impl std::fmt::Display for ContourId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub id: ContourId,
    pub elevation: Elevation,
    pub polygon: Polygon<f64>,
    /// Deduplication key
    pub boundary_length: f64,
    pub properties: JsonObject,
}

impl Contour {
    /// Builds a contour whose boundary length is measured from its rings.
    pub fn new(id: i64, elevation: Elevation, polygon: Polygon<f64>) -> Self {
        let boundary_length = boundary_length(&polygon);
        Contour {
            id: ContourId(id),
            elevation,
            polygon,
            boundary_length,
            properties: JsonObject::new(),
        }
    }

    pub fn with_boundary_length(mut self, boundary_length: f64) -> Self {
        self.boundary_length = boundary_length;
        self
    }

    pub fn with_properties(mut self, properties: JsonObject) -> Self {
        self.properties = properties;
        self
    }
}

/// Total planar length of the exterior and interior rings.
pub fn boundary_length(polygon: &Polygon<f64>) -> f64 {
    polygon.exterior().euclidean_length()
        + polygon
            .interiors()
            .iter()
            .map(|ring| ring.euclidean_length())
            .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, LineString};

    #[test]
    fn test_boundary_length_of_square() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)];
        assert!((boundary_length(&square) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_boundary_length_counts_holes() {
        let exterior = LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        let hole = LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0), (1.0, 1.0)]);
        let polygon = Polygon::new(exterior, vec![hole]);
        assert!((boundary_length(&polygon) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_length_overrides_measured() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        let contour = Contour::new(3, 100, square).with_boundary_length(12.5);
        assert_eq!(contour.boundary_length, 12.5);
        assert_eq!(contour.id, ContourId(3));
    }
}
