//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - builds the curve catalog (standard + optional user curves)
//! - runs the evaluation pipeline
//! - prints tables/plots or writes exports

use clap::Parser;
use tracing::{debug, info};

use crate::cli::{Command, CurveArgs, EvalArgs, ExportArgs, PlotArgs};
use crate::curves::{CurveCatalog, evaluate};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `tcc` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    let dotenv = dotenvy::dotenv().ok();

    // We want `tcc` and `tcc -c U3` to behave like `tcc tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal; a stderr logger would draw over it.
    if !matches!(cli.command, Command::Tui(_)) {
        crate::logging::init(cli.verbose);
    }
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    let catalog = load_catalog(&cli)?;

    match cli.command {
        Command::List => handle_list(&catalog),
        Command::Eval(args) => handle_eval(args, &catalog),
        Command::Plot(args) => handle_plot(args, &catalog),
        Command::Export(args) => handle_export(args, &catalog),
        Command::Tui(args) => handle_tui(args, catalog),
    }
}

/// Standard catalog, extended with the `--catalog` file when given.
fn load_catalog(cli: &crate::cli::Cli) -> Result<CurveCatalog, AppError> {
    let standard = CurveCatalog::standard();
    let Some(path) = &cli.catalog else {
        return Ok(standard.clone());
    };
    let extra = crate::io::catalog::read_catalog_json(path)?;
    info!(path = %path.display(), curves = extra.len(), "loaded user curves");
    Ok(standard.extended(extra)?)
}

fn handle_list(catalog: &CurveCatalog) -> Result<(), AppError> {
    println!("{}", crate::report::format_catalog(catalog));
    Ok(())
}

fn handle_eval(args: EvalArgs, catalog: &CurveCatalog) -> Result<(), AppError> {
    let curve = catalog.resolve(&args.curve)?;

    let multiples: Vec<f64> = if args.currents {
        if !(args.pickup.is_finite() && args.pickup > 0.0) {
            return Err(AppError::input(format!(
                "Pickup current must be > 0 A (got {}).",
                args.pickup
            )));
        }
        args.values.iter().map(|&amps| amps / args.pickup).collect()
    } else {
        args.values.clone()
    };

    let times = evaluate(args.tds, &multiples, &curve.definition)?;
    let pickup = args.currents.then_some(args.pickup);
    println!(
        "{}",
        crate::report::format_eval_table(curve, args.tds, pickup, &multiples, &times)
    );
    Ok(())
}

fn handle_plot(args: PlotArgs, catalog: &CurveCatalog) -> Result<(), AppError> {
    if let Some(path) = &args.curve_file {
        let file = crate::io::curve::read_curve_json(path)?;
        let plot = crate::plot::render_ascii_plot_from_curve_file(
            &file,
            args.time_scale,
            args.width,
            args.height,
        );
        println!("{plot}");
        return Ok(());
    }

    let mut config = args.curve.plot_config();
    config.time_scale = args.time_scale;
    config.plot_width = args.width;
    config.plot_height = args.height;

    let run = pipeline::run_curves(&config, catalog)?;
    println!("{}", crate::report::format_run_summary(&run));
    println!(
        "{}",
        crate::plot::render_ascii_plot(&run, config.time_scale, config.plot_width, config.plot_height)
    );
    Ok(())
}

fn handle_export(args: ExportArgs, catalog: &CurveCatalog) -> Result<(), AppError> {
    if args.csv.is_none() && args.json.is_none() {
        return Err(AppError::input("Nothing to export: pass --csv and/or --json."));
    }

    let config = args.curve.plot_config();
    let run = pipeline::run_curves(&config, catalog)?;

    if let Some(path) = &args.csv {
        crate::io::export::write_curves_csv(path, &run)?;
        info!(path = %path.display(), "wrote CSV");
    }
    if let Some(path) = &args.json {
        crate::io::curve::write_curve_json(path, &run)?;
        info!(path = %path.display(), "wrote curve JSON");
    }
    Ok(())
}

fn handle_tui(args: CurveArgs, catalog: CurveCatalog) -> Result<(), AppError> {
    crate::tui::run(args.plot_config(), catalog)
}

/// Rewrite argv so `tcc` defaults to `tcc tui`.
///
/// Rules:
/// - `tcc`                      -> `tcc tui`
/// - `tcc -c U3 ...`            -> `tcc tui -c U3 ...`
/// - `tcc -v list`              -> unchanged (global flag before a subcommand)
/// - `tcc --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // Global flags may precede the subcommand (`tcc -v list`).
    let has_subcommand = argv[1..].iter().any(|a| {
        matches!(a.as_str(), "list" | "eval" | "plot" | "export" | "tui")
    });
    if has_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
