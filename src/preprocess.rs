use crate::geometry::ContainmentPredicate;
use crate::{Contour, Elevation, Peak, ProminenceError, Result};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Immutable snapshot handed from the preprocessor to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedInput {
    /// Deduplicated peaks in load order
    pub peaks: Vec<Peak>,
    /// Canonical contour set: deduplicated, peak-enclosing, elevation descending
    pub contours: Vec<Contour>,
}

pub struct Preprocessor<'a, G: ContainmentPredicate> {
    predicate: &'a G,
}

impl<'a, G: ContainmentPredicate> Preprocessor<'a, G> {
    pub fn new(predicate: &'a G) -> Self {
        Preprocessor { predicate }
    }

    pub fn prepare(&self, peaks: Vec<Peak>, contours: Vec<Contour>) -> Result<PreparedInput> {
        if peaks.is_empty() {
            return Err(ProminenceError::EmptyInput { collection: "peak" });
        }
        if contours.is_empty() {
            return Err(ProminenceError::EmptyInput { collection: "contour" });
        }

        let raw_peaks = peaks.len();
        let raw_contours = contours.len();

        let peaks = dedup_peaks(peaks);
        let contours = dedup_contours(contours);
        debug!(
            "Dropped {} duplicate peaks and {} duplicate contours",
            raw_peaks - peaks.len(),
            raw_contours - contours.len()
        );

        let deduped_contours = contours.len();
        let mut contours = self.filter_enclosing(&peaks, contours)?;
        debug!(
            "Dropped {} contours that enclose no peaks",
            deduped_contours - contours.len()
        );

        // Stable: equal elevations keep their deduplicated order
        contours.sort_by(|a, b| b.elevation.cmp(&a.elevation));

        info!(
            "Prepared {} peaks and {} working contours",
            peaks.len(),
            contours.len()
        );
        Ok(PreparedInput { peaks, contours })
    }

    fn filter_enclosing(&self, peaks: &[Peak], contours: Vec<Contour>) -> Result<Vec<Contour>> {
        let all_peaks = self.predicate.union_points(peaks.iter().map(|p| &p.location));

        let mut kept = Vec::with_capacity(contours.len());
        for contour in contours {
            if self.predicate.encloses_any(&contour.polygon, &all_peaks)? {
                kept.push(contour);
            }
        }
        Ok(kept)
    }
}

/// Keeps the first peak seen at each elevation and renumbers from 0.
///
/// Distinct peaks that share an elevation collapse to one.
pub fn dedup_peaks(peaks: Vec<Peak>) -> Vec<Peak> {
    let mut seen: HashSet<Elevation> = HashSet::new();
    peaks
        .into_iter()
        .filter(|peak| seen.insert(peak.elevation))
        .enumerate()
        .map(|(id, mut peak)| {
            peak.id = id;
            peak
        })
        .collect()
}

/// Keeps the last contour seen for each boundary length, in load order.
pub fn dedup_contours(contours: Vec<Contour>) -> Vec<Contour> {
    let mut last: HashMap<u64, usize> = HashMap::new();
    for (index, contour) in contours.iter().enumerate() {
        last.insert(length_key(contour.boundary_length), index);
    }

    contours
        .into_iter()
        .enumerate()
        .filter(|(index, contour)| last.get(&length_key(contour.boundary_length)) == Some(index))
        .map(|(_, contour)| contour)
        .collect()
}

fn length_key(length: f64) -> u64 {
    // -0.0 and 0.0 compare equal as lengths
    if length == 0.0 {
        0
    } else {
        length.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContourId, PlanarPredicate};
    use geo::{polygon, Polygon};

    fn square(cx: f64, cy: f64, half: f64) -> Polygon<f64> {
        polygon![
            (x: cx - half, y: cy - half),
            (x: cx + half, y: cy - half),
            (x: cx + half, y: cy + half),
            (x: cx - half, y: cy + half),
        ]
    }

    #[test]
    fn test_peak_dedup_keeps_first_and_renumbers() {
        let peaks = vec![
            Peak::new(0, 0.0, 0.0, 500),
            Peak::new(1, 1.0, 1.0, 400),
            Peak::new(2, 9.0, 9.0, 500),
            Peak::new(3, 2.0, 2.0, 300),
        ];
        let deduped = dedup_peaks(peaks);
        assert_eq!(deduped.len(), 3);
        assert_eq!(deduped[0].location, geo::Point::new(0.0, 0.0));
        let ids: Vec<usize> = deduped.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        let elevations: Vec<Elevation> = deduped.iter().map(|p| p.elevation).collect();
        assert_eq!(elevations, vec![500, 400, 300]);
    }

    #[test]
    fn test_contour_dedup_keeps_last() {
        // 10 and 11 are different rings with the same perimeter
        let contours = vec![
            Contour::new(10, 300, square(0.0, 0.0, 1.0)),
            Contour::new(11, 200, square(50.0, 50.0, 1.0)),
            Contour::new(12, 100, square(0.0, 0.0, 5.0)),
        ];
        let deduped = dedup_contours(contours);
        let ids: Vec<ContourId> = deduped.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![ContourId(11), ContourId(12)]);
    }

    #[test]
    fn test_filter_and_sort() {
        let predicate = PlanarPredicate;
        let peaks = vec![Peak::new(0, 0.0, 0.0, 350)];
        let contours = vec![
            Contour::new(1, 100, square(0.0, 0.0, 30.0)),
            Contour::new(2, 300, square(0.0, 0.0, 10.0)),
            Contour::new(3, 250, square(100.0, 100.0, 5.0)),
            Contour::new(4, 200, square(0.0, 0.0, 20.0)),
        ];
        let prepared = Preprocessor::new(&predicate).prepare(peaks, contours).unwrap();
        let elevations: Vec<Elevation> = prepared.contours.iter().map(|c| c.elevation).collect();
        assert_eq!(elevations, vec![300, 200, 100]);
        assert!(prepared.contours.iter().all(|c| c.id != ContourId(3)));
    }

    #[test]
    fn test_every_canonical_contour_encloses_a_peak() {
        let predicate = PlanarPredicate;
        let peaks = vec![Peak::new(0, 0.0, 0.0, 120), Peak::new(1, 40.0, 0.0, 110)];
        let contours = vec![
            Contour::new(1, 100, square(0.0, 0.0, 5.0)),
            Contour::new(2, 100, square(40.0, 0.0, 6.0)),
            Contour::new(3, 100, square(20.0, 30.0, 4.0)),
        ];
        let prepared = Preprocessor::new(&predicate).prepare(peaks, contours).unwrap();
        assert_eq!(prepared.contours.len(), 2);
        for contour in &prepared.contours {
            let encloses = prepared
                .peaks
                .iter()
                .any(|p| predicate.encloses(&contour.polygon, &p.location).unwrap());
            assert!(encloses, "contour {} encloses no peak", contour.id);
        }
    }

    #[test]
    fn test_filter_ignores_peaks_lost_to_dedup() {
        // The second 500 m peak is the only one inside contour 2
        let predicate = PlanarPredicate;
        let peaks = vec![Peak::new(0, 0.0, 0.0, 500), Peak::new(1, 50.0, 50.0, 500)];
        let contours = vec![
            Contour::new(1, 400, square(0.0, 0.0, 5.0)),
            Contour::new(2, 400, square(50.0, 50.0, 6.0)),
        ];
        let prepared = Preprocessor::new(&predicate).prepare(peaks, contours).unwrap();
        assert_eq!(prepared.peaks.len(), 1);
        let ids: Vec<ContourId> = prepared.contours.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![ContourId(1)]);
    }

    #[test]
    fn test_empty_inputs_are_fatal() {
        let predicate = PlanarPredicate;
        let preprocessor = Preprocessor::new(&predicate);
        let contour = Contour::new(1, 100, square(0.0, 0.0, 1.0));

        let no_peaks = preprocessor.prepare(vec![], vec![contour]);
        assert!(matches!(no_peaks, Err(ProminenceError::EmptyInput { collection: "peak" })));

        let no_contours = preprocessor.prepare(vec![Peak::new(0, 0.0, 0.0, 10)], vec![]);
        assert!(matches!(no_contours, Err(ProminenceError::EmptyInput { collection: "contour" })));
    }
}
