//! Containment predicates over planar geometry.
//!
//! The prominence search only needs two operations from its geometry
//! collaborator: "does this polygon enclose this point" and the same question
//! asked against the union of many points at once. Both go through
//! [`ContainmentPredicate`] so the search never depends on a concrete library.

use crate::{ProminenceError, Result};
use geo::{CoordsIter, Intersects, MultiPoint, Point, Polygon};

pub trait ContainmentPredicate {
    /// True when `point` lies inside `polygon` or on its boundary.
    fn encloses(&self, polygon: &Polygon<f64>, point: &Point<f64>) -> Result<bool>;

    /// True when `polygon` encloses at least one point of the combined geometry.
    fn encloses_any(&self, polygon: &Polygon<f64>, points: &MultiPoint<f64>) -> Result<bool>;

    /// Combines point locations into one geometry for [`Self::encloses_any`].
    fn union_points<'a, I>(&self, points: I) -> MultiPoint<f64>
    where
        I: IntoIterator<Item = &'a Point<f64>>,
    {
        MultiPoint::new(points.into_iter().copied().collect())
    }
}

/// `geo`-backed predicate in a single flat 2-D projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarPredicate;

impl PlanarPredicate {
    fn check_polygon(polygon: &Polygon<f64>) -> Result<()> {
        if polygon.exterior().0.len() < 4 {
            return Err(ProminenceError::InvalidGeometry(format!(
                "polygon ring has {} positions, need at least 4",
                polygon.exterior().0.len()
            )));
        }
        if let Some(coord) = polygon.coords_iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(ProminenceError::InvalidGeometry(format!(
                "polygon coordinate ({}, {}) is not finite",
                coord.x, coord.y
            )));
        }
        Ok(())
    }

    fn check_point(point: &Point<f64>) -> Result<()> {
        if point.x().is_finite() && point.y().is_finite() {
            Ok(())
        } else {
            Err(ProminenceError::InvalidGeometry(format!(
                "point ({}, {}) is not finite",
                point.x(),
                point.y()
            )))
        }
    }
}

impl ContainmentPredicate for PlanarPredicate {
    fn encloses(&self, polygon: &Polygon<f64>, point: &Point<f64>) -> Result<bool> {
        Self::check_polygon(polygon)?;
        Self::check_point(point)?;
        Ok(point.intersects(polygon))
    }

    fn encloses_any(&self, polygon: &Polygon<f64>, points: &MultiPoint<f64>) -> Result<bool> {
        Self::check_polygon(polygon)?;
        for point in points.iter() {
            Self::check_point(point)?;
            if point.intersects(polygon) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
