use anyhow::Context;
use clap::Parser;
use contour_prominence::{pipeline, FieldNames, PlanarPredicate, RunConfig};
use std::env;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Calculate the prominence of peak points against contour polygons
#[derive(Parser, Debug)]
#[command(name = "contour-prominence", version)]
struct Args {
    /// Peak points (GeoJSON FeatureCollection)
    peaks: PathBuf,

    /// Contour polygons (GeoJSON FeatureCollection)
    contours: PathBuf,

    /// Where to write the working contour set
    #[arg(long, default_value = "contours_for_calc_OUT.geojson")]
    contours_out: PathBuf,

    /// Where to write peaks with prominence
    #[arg(long, default_value = "peaks_with_prominence.geojson")]
    peaks_out: PathBuf,

    #[arg(long, default_value = "GRID_CODE")]
    peak_elevation_field: String,

    #[arg(long, default_value = "CONTOUR")]
    contour_elevation_field: String,

    #[arg(long, default_value = "ORIG_FID")]
    contour_id_field: String,

    #[arg(long, default_value = "Shape_leng")]
    contour_length_field: String,

    /// Number of peaks to print, by prominence
    #[arg(long, default_value_t = 100)]
    top: usize,

    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        let fields = FieldNames {
            peak_elevation: self.peak_elevation_field.clone(),
            contour_elevation: self.contour_elevation_field.clone(),
            contour_id: self.contour_id_field.clone(),
            contour_length: self.contour_length_field.clone(),
            ..FieldNames::default()
        };
        RunConfig::new(&self.peaks, &self.contours)
            .with_outputs(&self.contours_out, &self.peaks_out)
            .with_fields(fields)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args);

    println!("Contour Prominence Calculator");

    let config = args.run_config();
    let report = pipeline::run(&config, &PlanarPredicate).with_context(|| {
        format!(
            "prominence run failed for {} and {}",
            config.peaks.display(),
            config.contours.display()
        )
    })?;

    println!("\nPeaks by prominence:");
    println!("  prom   elev  contour            x            y");
    println!("--------------------------------------------------");
    for peak in report.ranked().into_iter().take(args.top) {
        println!("{}", peak);
    }

    println!("\nSUCCESS!! {}", report.summary);
    Ok(())
}

fn init_logging(args: &Args) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("PROMINENCE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    let filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(format!("contour_prominence={}", level.to_string().to_lowercase()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}
