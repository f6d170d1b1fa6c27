#![forbid(unsafe_code)]

mod cmd;
mod manifest;
mod output;
mod plot;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "skillnet: threshold sensitivity of course-skill networks",
    long_about = None
)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: ./skillnet.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Write result files only; print nothing on success.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Build and measure the course network at every threshold",
        long_about = "Binarize the association matrix at each threshold, project it onto courses, \
                      and write course_data_{t}.csv plus the density/giant-component summary.",
        after_help = "EXAMPLES:\n    # Sweep the configured range\n    skillnet sweep\n\n    # Sweep a custom range in parallel\n    skillnet sweep --start 0.4 --stop 0.8 --step 0.05 --parallel"
    )]
    Sweep(cmd::sweep::SweepArgs),

    #[command(
        about = "Compare a previous sweep against a baseline threshold",
        long_about = "Read the tables written by `skillnet sweep` and write sensitivity.csv with \
                      rank correlation, relative density and relative giant component ratio.",
        after_help = "EXAMPLES:\n    # Use the configured baseline\n    skillnet sensitivity\n\n    # Pick another baseline\n    skillnet sensitivity --baseline 0.56 --json"
    )]
    Sensitivity(cmd::sensitivity::SensitivityArgs),

    #[command(
        about = "Sweep, then run the sensitivity analysis",
        after_help = "EXAMPLES:\n    skillnet run --matrix matrix.csv --catalog courses.csv --out-dir results"
    )]
    Run(cmd::run::RunArgs),

    #[command(
        about = "Draw the sensitivity figures",
        long_about = "Read sensitivity.csv from the output directory and write relative_structure.svg, \
                      rank_correlation.svg and absolute_change.svg next to it.",
        after_help = "EXAMPLES:\n    skillnet sensitivity && skillnet plot\n\n    # Or in one go\n    skillnet run --plot"
    )]
    Plot(cmd::plot::PlotArgs),

    #[command(about = "Print the configured threshold list")]
    Thresholds(cmd::thresholds::ThresholdsArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    skillnet completions bash > /etc/bash_completion.d/skillnet"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SKILLNET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "skillnet=debug,info"
        } else {
            "skillnet=info,warn"
        })
    });

    let format = env::var("SKILLNET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();
    let config = cli.config.as_deref();
    debug!(?output, ?config, "starting");

    let command_result = env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|project_root| match cli.command {
            Commands::Sweep(ref args) => {
                cmd::sweep::run_sweep_cmd(args, config, output, cli.quiet, &project_root)
            }
            Commands::Sensitivity(ref args) => {
                cmd::sensitivity::run_sensitivity_cmd(args, config, output, cli.quiet, &project_root)
            }
            Commands::Run(ref args) => {
                cmd::run::run_run_cmd(args, config, output, cli.quiet, &project_root)
            }
            Commands::Plot(ref args) => {
                cmd::plot::run_plot_cmd(args, config, output, cli.quiet, &project_root)
            }
            Commands::Thresholds(ref args) => {
                cmd::thresholds::run_thresholds_cmd(args, config, output, &project_root)
            }
            Commands::Completions(ref args) => {
                let mut command = Cli::command();
                cmd::completions::run_completions(args.shell, &mut command)
            }
        });

    match command_result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if render_error(output, &CliError::from(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["skillnet", "sweep", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["skillnet", "--format", "text", "thresholds"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["skillnet", "run", "-q", "--config", "alt.toml", "-v"]);
        assert!(cli.quiet);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }

    #[test]
    fn sweep_overrides_parse() {
        let cli = Cli::parse_from([
            "skillnet", "sweep", "--start", "0.4", "--stop", "0.8", "--step", "0.1", "--parallel",
            "--matrix", "m.csv", "-o", "out",
        ]);
        let Commands::Sweep(args) = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(args.sweep.start, Some(0.4));
        assert!(args.sweep.parallel);
        assert_eq!(args.input.matrix, Some(PathBuf::from("m.csv")));
        assert_eq!(args.output.out_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn run_accepts_baseline() {
        let cli = Cli::parse_from(["skillnet", "run", "--baseline", "0.56"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.baseline.baseline, Some(0.56));
    }

    #[test]
    fn run_plot_flag_and_plot_subcommand() {
        let cli = Cli::parse_from(["skillnet", "run", "--plot"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.plot);

        let cli = Cli::parse_from(["skillnet", "plot", "-o", "figs", "--baseline", "0.6"]);
        let Commands::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        assert_eq!(args.output.out_dir, Some(PathBuf::from("figs")));
        assert_eq!(args.baseline.baseline, Some(0.6));
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["skillnet", "completions", "zsh"]);
        assert!(matches!(cli.command, Commands::Completions(_)));
    }
}
