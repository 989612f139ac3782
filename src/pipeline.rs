use crate::geometry::ContainmentPredicate;
use crate::{
    io, Contour, FieldNames, OutputAssembler, Peak, PreparedInput, Preprocessor, ProminenceCalculator,
    ProminenceReport, Result, RunConfig,
};
use std::time::Instant;
use tracing::info;

/// Preprocess, search and assemble in memory, without touching the filesystem.
pub fn compute<G: ContainmentPredicate>(
    peaks: Vec<Peak>,
    contours: Vec<Contour>,
    predicate: &G,
) -> Result<(PreparedInput, ProminenceReport)> {
    let prepared = Preprocessor::new(predicate).prepare(peaks, contours)?;
    let report = search(&prepared, predicate)?;
    Ok((prepared, report))
}

fn search<G: ContainmentPredicate>(prepared: &PreparedInput, predicate: &G) -> Result<ProminenceReport> {
    let results = ProminenceCalculator::new(prepared, predicate).calculate_prominence()?;
    Ok(OutputAssembler::assemble(prepared.peaks.clone(), &results))
}

/// Full run over files: the working contour set is written before the search
/// starts, the peak collection only after it succeeds.
pub fn run<G: ContainmentPredicate>(config: &RunConfig, predicate: &G) -> Result<ProminenceReport> {
    let start_time = Instant::now();
    let fields: &FieldNames = &config.fields;

    let peaks = io::load_peaks(&config.peaks, fields)?;
    let contours = io::load_contours(&config.contours, fields)?;
    info!("Data loaded in {:.2?}", start_time.elapsed());

    let prepared = Preprocessor::new(predicate).prepare(peaks, contours)?;
    io::write_contours(&config.contours_out, &prepared.contours)?;

    let report = search(&prepared, predicate)?;
    io::write_peaks(&config.peaks_out, &report.peaks, fields)?;

    info!("Total run time: {:.2?}", start_time.elapsed());
    Ok(report)
}
