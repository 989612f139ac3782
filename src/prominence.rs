use crate::geometry::ContainmentPredicate;
use crate::{Contour, Elevation, Peak, PreparedInput, Prominence, ProminenceError, Relief, Result};
use std::time::Instant;
use tracing::{debug, info, trace};

/// Highest enclosed peak elevation for every contour of the working set,
/// indexed like the contour slice it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosureTable {
    highest: Vec<Elevation>,
}

impl EnclosureTable {
    /// Fails if a contour encloses no peak at all.
    pub fn build<G: ContainmentPredicate>(
        contours: &[Contour],
        peaks: &[Peak],
        predicate: &G,
    ) -> Result<Self> {
        let mut highest = Vec::with_capacity(contours.len());
        for contour in contours {
            match highest_enclosed(contour, peaks, predicate)? {
                Some(elevation) => highest.push(elevation),
                None => return Err(ProminenceError::EmptyContour { id: contour.id }),
            }
        }
        Ok(EnclosureTable { highest })
    }

    pub fn highest(&self, contour_index: usize) -> Elevation {
        self.highest[contour_index]
    }
}

/// Maximum elevation among all peaks enclosed by `contour`.
pub fn highest_enclosed<G: ContainmentPredicate>(
    contour: &Contour,
    peaks: &[Peak],
    predicate: &G,
) -> Result<Option<Elevation>> {
    let mut highest = None;
    for peak in peaks {
        if predicate.encloses(&contour.polygon, &peak.location)? {
            highest = highest.max(Some(peak.elevation));
        }
    }
    Ok(highest)
}

pub struct ProminenceCalculator<'a, G: ContainmentPredicate> {
    input: &'a PreparedInput,
    predicate: &'a G,
}

impl<'a, G: ContainmentPredicate> ProminenceCalculator<'a, G> {
    pub fn new(input: &'a PreparedInput, predicate: &'a G) -> Self {
        ProminenceCalculator { input, predicate }
    }

    /// One result per peak, in the peaks' load order.
    pub fn calculate_prominence(&self) -> Result<Vec<Prominence>> {
        info!(
            "Calculating prominence for {} peaks against {} contours...",
            self.input.peaks.len(),
            self.input.contours.len()
        );
        let start_time = Instant::now();

        let table = EnclosureTable::build(&self.input.contours, &self.input.peaks, self.predicate)?;
        debug!("Enclosure table built in {:.2?}", start_time.elapsed());

        let mut results = Vec::with_capacity(self.input.peaks.len());
        for (i, peak) in self.input.peaks.iter().enumerate() {
            let prominence = self.assess_peak(peak, &table)?;
            trace!("Peak {} (elevation {}): {}", peak.id, peak.elevation, prominence);
            results.push(prominence);
            self.report_progress(i);
        }

        let bounded = results.iter().filter(|p| p.is_bounded()).count();
        info!(
            "Analyzed {} peaks in {:.2?}, {} with an enclosing contour",
            results.len(),
            start_time.elapsed(),
            bounded
        );
        Ok(results)
    }

    /// Walks the contours enclosing `peak`, highest first, and stops at the
    /// first one that also encloses a strictly higher peak.
    pub fn assess_peak(&self, peak: &Peak, table: &EnclosureTable) -> Result<Prominence> {
        let mut lowest_enclosing: Option<&Contour> = None;

        for (index, contour) in self.input.contours.iter().enumerate() {
            if !self.predicate.encloses(&contour.polygon, &peak.location)? {
                continue;
            }
            if table.highest(index) > peak.elevation {
                return Ok(bounded_by(peak, contour));
            }
            lowest_enclosing = Some(contour);
        }

        // Highest peak in every enclosing contour: bounded by the outermost one
        Ok(match lowest_enclosing {
            Some(contour) => bounded_by(peak, contour),
            None => Prominence::Unbounded,
        })
    }

    fn report_progress(&self, index: usize) {
        if index % 100 == 0 {
            info!("{} peaks analyzed", index);
        } else if index % 10 == 0 {
            debug!("{} peaks analyzed", index);
        }
    }
}

fn bounded_by(peak: &Peak, contour: &Contour) -> Prominence {
    Prominence::Bounded {
        value: Relief::from(peak.elevation) - Relief::from(contour.elevation),
        contour: contour.id,
    }
}
