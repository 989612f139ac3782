use crate::{ContourId, Elevation, Peak, Prominence, Relief};
use geo::Point;
use geojson::JsonObject;
use tracing::{info, warn};

/// A peak that survived the search, with its prominence resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ProminentPeak {
    pub id: usize,
    pub location: Point<f64>,
    pub elevation: Elevation,
    pub prominence: Relief,
    pub containing_contour: ContourId,
    pub properties: JsonObject,
}

impl std::fmt::Display for ProminentPeak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:6} {:6} {:8} {:12.3} {:12.3}",
            self.prominence,
            self.elevation,
            self.containing_contour,
            self.location.x(),
            self.location.y()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub analyzed: usize,
    pub retained: usize,
    pub dropped: usize,
    pub max_prominence: Option<Relief>,
    pub median_prominence: Option<f64>,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let max = self
            .max_prominence
            .map_or_else(|| "n/a".to_string(), |v| v.to_string());
        let median = self
            .median_prominence
            .map_or_else(|| "n/a".to_string(), |v| v.to_string());
        write!(
            f,
            "{} peaks analyzed, {} with an enclosing contour ({} dropped). \
             The maximum prominence is {}, and the median is {}.",
            self.analyzed, self.retained, self.dropped, max, median
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProminenceReport {
    /// Bounded peaks in load order
    pub peaks: Vec<ProminentPeak>,
    pub summary: Summary,
}

impl ProminenceReport {
    /// Peaks ordered by prominence, highest first.
    pub fn ranked(&self) -> Vec<&ProminentPeak> {
        let mut ranked: Vec<&ProminentPeak> = self.peaks.iter().collect();
        ranked.sort_by(|a, b| b.prominence.cmp(&a.prominence));
        ranked
    }
}

pub struct OutputAssembler;

impl OutputAssembler {
    /// Pairs each peak with its result and drops the unbounded ones.
    pub fn assemble(peaks: Vec<Peak>, results: &[Prominence]) -> ProminenceReport {
        let analyzed = peaks.len();

        let retained: Vec<ProminentPeak> = peaks
            .into_iter()
            .zip(results)
            .filter_map(|(peak, result)| {
                let (value, contour) = result.value().zip(result.contour())?;
                Some(ProminentPeak {
                    id: peak.id,
                    location: peak.location,
                    elevation: peak.elevation,
                    prominence: value,
                    containing_contour: contour,
                    properties: peak.properties,
                })
            })
            .collect();

        let prominences: Vec<Relief> = retained.iter().map(|p| p.prominence).collect();
        let summary = Summary {
            analyzed,
            retained: retained.len(),
            dropped: analyzed - retained.len(),
            max_prominence: prominences.iter().copied().max(),
            median_prominence: median(&prominences),
        };

        if summary.retained == 0 {
            warn!("No peak is enclosed by any working contour");
        } else {
            info!(
                "Retained {} of {} peaks, dropped {} without an enclosing contour",
                summary.retained, summary.analyzed, summary.dropped
            );
        }

        ProminenceReport {
            peaks: retained,
            summary,
        }
    }
}

/// Middle value, or the mean of the two middle values for an even count.
pub fn median(values: &[Relief]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(value: Relief, contour: i64) -> Prominence {
        Prominence::Bounded {
            value,
            contour: ContourId(contour),
        }
    }

    #[test]
    fn test_unbounded_peaks_are_dropped() {
        let peaks = vec![
            Peak::new(0, 0.0, 0.0, 500),
            Peak::new(1, 5.0, 5.0, 400),
            Peak::new(2, 9.0, 9.0, 300),
        ];
        let results = vec![bounded(200, 3), Prominence::Unbounded, bounded(50, 4)];
        let report = OutputAssembler::assemble(peaks, &results);

        let ids: Vec<usize> = report.peaks.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(report.peaks[1].containing_contour, ContourId(4));
        assert_eq!(report.summary.analyzed, 3);
        assert_eq!(report.summary.dropped, 1);
        assert_eq!(report.summary.max_prominence, Some(200));
        assert_eq!(report.summary.median_prominence, Some(125.0));
    }

    #[test]
    fn test_all_unbounded_has_no_statistics() {
        let peaks = vec![Peak::new(0, 0.0, 0.0, 500)];
        let report = OutputAssembler::assemble(peaks, &[Prominence::Unbounded]);
        assert!(report.peaks.is_empty());
        assert_eq!(report.summary.max_prominence, None);
        assert_eq!(report.summary.median_prominence, None);
        assert!(report.summary.to_string().contains("maximum prominence is n/a"));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[7]), Some(7.0));
        assert_eq!(median(&[30, 10, 20]), Some(20.0));
        assert_eq!(median(&[40, 10, 20, 30]), Some(25.0));
    }

    #[test]
    fn test_ranked_orders_by_prominence() {
        let peaks = vec![
            Peak::new(0, 0.0, 0.0, 500),
            Peak::new(1, 5.0, 5.0, 400),
            Peak::new(2, 9.0, 9.0, 300),
        ];
        let results = vec![bounded(20, 1), bounded(150, 2), bounded(75, 3)];
        let report = OutputAssembler::assemble(peaks, &results);
        let order: Vec<Relief> = report.ranked().iter().map(|p| p.prominence).collect();
        assert_eq!(order, vec![150, 75, 20]);
    }

    #[test]
    fn test_summary_surfaces_median() {
        let peaks = vec![Peak::new(0, 0.0, 0.0, 500), Peak::new(1, 1.0, 1.0, 450)];
        let report = OutputAssembler::assemble(peaks, &[bounded(200, 1), bounded(50, 2)]);
        let message = report.summary.to_string();
        assert!(message.contains("maximum prominence is 200"));
        assert!(message.contains("median is 125"));
    }
}
