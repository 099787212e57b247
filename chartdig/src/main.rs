//! chartdig command line

use chartdig_digitize::{
    Axis, CurveStrategy, DigitizeOptions, DigitizeRequest, Digitizer, Unit, export, load_options,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "chartdig", about = "Digitize performance-curve charts", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract calibrated curve data from a chart image
    Digitize(DigitizeArgs),
    /// Print the default options as JSON
    DefaultOptions,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Contour,
    ColumnScan,
}

impl From<StrategyArg> for CurveStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Contour => CurveStrategy::Contour,
            StrategyArg::ColumnScan => CurveStrategy::ColumnScan,
        }
    }
}

#[derive(Args)]
struct DigitizeArgs {
    /// Chart image (PNG or JPEG)
    #[arg(long)]
    image: PathBuf,

    /// Declared x axis range as `min:max`
    #[arg(long)]
    x_range: String,

    /// Declared y axis range as `min:max`
    #[arg(long)]
    y_range: String,

    #[arg(long, default_value = "CFM")]
    x_unit: String,

    #[arg(long, default_value = "inH2O")]
    y_unit: String,

    /// Convert the output x values to this unit
    #[arg(long)]
    to_x_unit: Option<String>,

    /// Convert the output y values to this unit
    #[arg(long)]
    to_y_unit: Option<String>,

    /// Options file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Curve extraction strategy, overriding the options file
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Write the data as CSV; a preview is printed otherwise
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write the edge map as PNG
    #[arg(long)]
    edges: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Digitize(args) => run_digitize(&args),
        Commands::DefaultOptions => {
            println!("{}", DigitizeOptions::default().to_json_string()?);
            Ok(())
        }
    }
}

fn parse_range(s: &str) -> CliResult<(f64, f64)> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| -> CliError { format!("invalid range '{}': expected min:max", s).into() })?;
    let min = a
        .trim()
        .parse::<f64>()
        .map_err(|e| -> CliError { format!("invalid range minimum '{}': {}", a, e).into() })?;
    let max = b
        .trim()
        .parse::<f64>()
        .map_err(|e| -> CliError { format!("invalid range maximum '{}': {}", b, e).into() })?;
    Ok((min, max))
}

fn output_units(args: &DigitizeArgs) -> CliResult<Option<(Unit, Unit)>> {
    if args.to_x_unit.is_none() && args.to_y_unit.is_none() {
        return Ok(None);
    }
    let x = args.to_x_unit.as_deref().unwrap_or(&args.x_unit).parse::<Unit>()?;
    let y = args.to_y_unit.as_deref().unwrap_or(&args.y_unit).parse::<Unit>()?;
    Ok(Some((x, y)))
}

fn run_digitize(args: &DigitizeArgs) -> CliResult<()> {
    let (x_min, x_max) = parse_range(&args.x_range)?;
    let (y_min, y_max) = parse_range(&args.y_range)?;

    let mut options = match &args.config {
        Some(path) => {
            log::info!("Loading options: {}", path.display());
            load_options(path)?
        }
        None => DigitizeOptions::default(),
    };
    if let Some(strategy) = args.strategy {
        options.curve.strategy = strategy.into();
    }

    log::info!("Loading image: {}", args.image.display());
    let image = chartdig_io::read_image(&args.image)?;
    log::info!("Image size: {}x{}", image.width(), image.height());

    let mut request = DigitizeRequest::new(
        Axis::new(x_min, x_max, &args.x_unit, "X"),
        Axis::new(y_min, y_max, &args.y_unit, "Y"),
    );
    request.output_units = output_units(args)?;

    let result = Digitizer::new(options).digitize(&image, &request)?;
    let diag = &result.diagnostics;
    log::info!(
        "Axes: x row {:.1}, y column {:.1} ({} segments)",
        result.axes.x_axis_row(),
        result.axes.y_axis_column(),
        diag.segments
    );
    if diag.is_degraded() {
        log::warn!(
            "Axis calibration is approximate (x fallback: {}, y fallback: {})",
            diag.x_axis_fallback,
            diag.y_axis_fallback
        );
    }
    log::info!(
        "Curve: {} raw, {} refined, {} output points in {:.1?}",
        diag.raw_points,
        diag.refined_points,
        diag.output_points,
        diag.elapsed
    );

    if let Some(path) = &args.edges {
        chartdig_io::write_image(&result.edges, path)?;
        log::info!("Edge map written to {}", path.display());
    }

    match &args.out {
        Some(path) => {
            export::save_csv(&result.chart, path)?;
            log::info!("Data written to {}", path.display());
        }
        None => {
            for [x, y] in export::preview(&result.chart, export::PREVIEW_POINTS)? {
                println!("{:>10} {:>10}", x, y);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("0:40").unwrap(), (0.0, 40.0));
        assert_eq!(parse_range(" 0.5 : 2.5 ").unwrap(), (0.5, 2.5));
        assert!(parse_range("10").is_err());
        assert!(parse_range("a:1").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "chartdig",
            "digitize",
            "--image",
            "fan.png",
            "--x-range",
            "0:1000",
            "--y-range",
            "0:4",
            "--strategy",
            "column-scan",
        ])
        .unwrap();
        let Commands::Digitize(args) = cli.command else {
            panic!("expected digitize");
        };
        assert_eq!(args.x_unit, "CFM");
        assert!(matches!(args.strategy, Some(StrategyArg::ColumnScan)));
        assert!(output_units(&args).unwrap().is_none());
    }
}
