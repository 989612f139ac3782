use crate::ContourId;
use geo::Point;
use geojson::JsonObject;

/// Integral elevation shared by peaks and contours
pub type Elevation = i32;

/// Difference of two elevations; holds any pair of `Elevation`s without overflow
pub type Relief = i64;

#[derive(Debug, Clone, PartialEq)]
pub struct Peak {
    /// Dense 0-based position after deduplication
    pub id: usize,
    pub location: Point<f64>,
    pub elevation: Elevation,
    /// Attributes carried through from the input feature
    pub properties: JsonObject,
}

impl Peak {
    pub fn new(id: usize, x: f64, y: f64, elevation: Elevation) -> Self {
        Peak {
            id,
            location: Point::new(x, y),
            elevation,
            properties: JsonObject::new(),
        }
    }

    pub fn with_properties(mut self, properties: JsonObject) -> Self {
        self.properties = properties;
        self
    }
}

/// Outcome of the containment search for one peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prominence {
    /// Elevation above the containing contour, and that contour's identifier
    Bounded { value: Relief, contour: ContourId },
    /// No contour in the working set encloses the peak
    Unbounded,
}

impl Prominence {
    pub fn value(&self) -> Option<Relief> {
        match self {
            Prominence::Bounded { value, .. } => Some(*value),
            Prominence::Unbounded => None,
        }
    }

    pub fn contour(&self) -> Option<ContourId> {
        match self {
            Prominence::Bounded { contour, .. } => Some(*contour),
            Prominence::Unbounded => None,
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, Prominence::Bounded { .. })
    }
}

impl std::fmt::Display for Prominence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prominence::Bounded { value, contour } => write!(f, "{} (contour {})", value, contour),
            Prominence::Unbounded => write!(f, "unbounded"),
        }
    }
}
