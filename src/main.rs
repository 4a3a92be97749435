//! analog-forecast entry point: CLI wiring and config-driven engine construction.

use std::path::Path;
use std::process;

use tracing::{error, info, warn};

use analog_forecast::analog::{Engine, ForecastReport};
use analog_forecast::config::ForecastConfig;
use analog_forecast::diagnostics::{TracingSink, init_tracing};
use analog_forecast::io::export::export_csv;
use analog_forecast::io::import::load_series;
use analog_forecast::series;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    series_path: Option<String>,
    seed_override: Option<u64>,
    out: Option<String>,
    trace: bool,
}

fn print_help() {
    eprintln!("analog-forecast - analog-pattern time-series forecaster");
    eprintln!();
    eprintln!("Usage: analog-forecast [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>   Load forecast configuration from a TOML file");
    eprintln!(
        "  --preset <name>   Use a built-in preset ({})",
        ForecastConfig::PRESETS.join(", ")
    );
    eprintln!("  --series <path>   Read the input series from a CSV file (x,y)");
    eprintln!("  --seed <u64>      Override the synthetic series seed");
    eprintln!("  --out <path>      Export all observations to CSV");
    eprintln!("  --trace           Log the engine trace at debug level");
    eprintln!("  --help            Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the baseline preset is used.");
    eprintln!("Without --series, the configured synthetic series is generated.");
}

/// Returns the value following option `name`, or exits with a usage error.
fn required_value(args: &[String], i: usize, name: &str, what: &str) -> String {
    match args.get(i) {
        Some(value) => value.clone(),
        None => {
            eprintln!("error: {name} requires a {what} argument");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        series_path: None,
        seed_override: None,
        out: None,
        trace: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                cli.config_path = Some(required_value(&args, i, "--config", "path"));
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(required_value(&args, i, "--preset", "name"));
            }
            "--series" => {
                i += 1;
                cli.series_path = Some(required_value(&args, i, "--series", "path"));
            }
            "--seed" => {
                i += 1;
                let raw = required_value(&args, i, "--seed", "u64");
                if let Ok(s) = raw.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{raw}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--out" => {
                i += 1;
                cli.out = Some(required_value(&args, i, "--out", "path"));
            }
            "--trace" => {
                cli.trace = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.config_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --config and --preset are mutually exclusive");
        process::exit(1);
    }

    cli
}

/// Builds the engine, feeds the series and runs the configured forecast.
fn run_forecast(cfg: &ForecastConfig, points: &[(f64, f64)]) -> (Engine, Option<ForecastReport>) {
    let mut engine = Engine::with_config(cfg.engine.window());
    if cfg.diagnostics.trace {
        engine.attach_diagnostic_sink(TracingSink);
    }

    let mut rejected = 0usize;
    for &(x, y) in points {
        if !engine.add_observation(x, y) {
            rejected += 1;
        }
    }
    if rejected > 0 {
        warn!(rejected, "skipped observations with duplicate or NaN abscissa");
    }
    info!(
        observations = engine.len(),
        projection_steps = cfg.engine.projection_steps,
        candidate_steps = cfg.engine.candidate_steps,
        metric_steps = cfg.engine.metric_steps,
        "series loaded"
    );

    let h = &cfg.forecast;
    let report = match (h.mode.as_str(), h.upper_edge) {
        ("edge", Some(upper_edge)) => engine.forecast_to_edge(upper_edge, h.steps_count),
        _ => engine.forecast_by_steps(h.step_size, h.steps_count),
    };
    (engine, report)
}

fn main() {
    let cli = parse_args();

    // --config takes priority, then --preset, then the baseline default
    let mut config = if let Some(ref path) = cli.config_path {
        ForecastConfig::from_toml_file(Path::new(path))
    } else if let Some(ref name) = cli.preset {
        ForecastConfig::from_preset(name)
    } else {
        Ok(ForecastConfig::baseline())
    }
    .unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Some(seed) = cli.seed_override {
        config.series.seed = seed;
    }
    if cli.trace {
        config.diagnostics.trace = true;
    }

    init_tracing(config.diagnostics.trace);

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        process::exit(1);
    }

    let points = match cli.series_path {
        Some(ref path) => load_series(Path::new(path)).unwrap_or_else(|e| {
            error!("{e}");
            process::exit(1);
        }),
        None => series::generate(&config.series),
    };

    let (engine, report) = run_forecast(&config, &points);

    for o in engine.observations() {
        println!("{o}");
    }

    match report {
        Some(report) => println!("\n{report}"),
        None => warn!(
            mode = %config.forecast.mode,
            "forecast request was not applicable to this series; nothing synthesized"
        ),
    }

    if let Some(ref path) = cli.out {
        if let Err(e) = export_csv(engine.observations(), Path::new(path)) {
            error!("failed to write CSV: {e}");
            process::exit(1);
        }
        info!(path = %path, "observations written");
    }
}
