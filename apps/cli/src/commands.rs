//! CLI definition, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use rstextract_core::{
    ExtractConfig, ExtractReport, Marker, ProgressReporter, SilentProgress, WriteFailure,
    WrittenDoc,
};
use rstextract_shared::{WriteErrorPolicy, init_config, resolve_config};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// rstextract: extract reStructuredText from Go source comments.
#[derive(Parser)]
#[command(
    name = "rstextract",
    version,
    about = "Extract reStructuredText from Go source comments, one document per package.",
    long_about = None,
    override_usage = "rstextract [OPTIONS] <SOURCE_DIR> <OUTPUT_DIR>\n       rstextract config <init|show>",
    args_conflicts_with_subcommands = true,
    after_help = "A source directory literally named `config` is read as the subcommand; pass it as ./config.",
)]
pub(crate) struct Cli {
    /// Directory containing the Go source files.
    pub source_dir: Option<PathBuf>,

    /// Directory to write documents to (created if missing).
    pub output_dir: Option<PathBuf>,

    /// Config file (defaults to ./rstextract.toml, then ~/.rstextract/rstextract.toml).
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Marker token overriding the configured one.
    #[arg(long)]
    pub marker: Option<String>,

    /// Keep writing other documents when one cannot be written.
    #[arg(long)]
    pub keep_going: bool,

    /// Ignore *_test.go files.
    #[arg(long)]
    pub skip_tests: bool,

    /// Print the run report as JSON instead of progress lines.
    #[arg(long)]
    pub json: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Subcommands besides the default extraction.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write the default config to ~/.rstextract/rstextract.toml.
    Init,
    /// Show the resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "rstextract=warn",
        1 => "rstextract=info",
        2 => "rstextract=debug",
        _ => "rstextract=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config_file.as_deref()),
        },
        None => match (&cli.source_dir, &cli.output_dir) {
            (Some(source_dir), Some(output_dir)) => cmd_extract(&cli, source_dir, output_dir),
            _ => {
                // Missing arguments are not an error: show how to call us.
                println!("{}", Cli::command().render_usage());
                Ok(())
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_extract(cli: &Cli, source_dir: &Path, output_dir: &Path) -> Result<()> {
    let cwd = std::env::current_dir()
        .map_err(|e| eyre!("cannot determine working directory: {e}"))?;

    let (app, config_path) = resolve_config(cli.config_file.as_deref(), &cwd)?;
    match &config_path {
        Some(path) => debug!(path = %path.display(), "loaded config"),
        None => debug!("no config file found, using defaults"),
    }

    // CLI flags override config file values.
    let mut config = ExtractConfig::from_app_config(&app, source_dir, output_dir)?;
    if let Some(marker) = &cli.marker {
        config.marker = Marker::new(marker.as_str())?;
    }
    if cli.keep_going {
        config.on_write_error = WriteErrorPolicy::Skip;
    }
    if cli.skip_tests {
        config.skip_test_files = true;
    }

    info!(
        source = %source_dir.display(),
        output = %output_dir.display(),
        marker = %config.marker,
        "extracting documentation"
    );

    let report = if cli.json {
        let report = rstextract_core::run(&config, &SilentProgress)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        report
    } else {
        let reporter = CliProgress::new();
        let report = rstextract_core::run(&config, &reporter)?;
        print_summary(&report, output_dir);
        report
    };

    if !report.failed.is_empty() {
        return Err(eyre!(
            "failed to write {} of {} documents",
            report.failed.len(),
            report.failed.len() + report.written.len()
        ));
    }

    Ok(())
}

fn print_summary(report: &ExtractReport, output_dir: &Path) {
    println!();
    println!("  Documents: {}", report.written.len());
    println!("  Skipped:   {}", report.skipped.len());
    if !report.failed.is_empty() {
        println!("  Failed:    {}", report.failed.len());
    }
    println!("  Output:    {}", output_dir.display());
    println!("  Time:      {}ms", report.elapsed_ms);
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(explicit: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir()
        .map_err(|e| eyre!("cannot determine working directory: {e}"))?;
    let (config, source) = resolve_config(explicit, &cwd)?;

    match source {
        Some(path) => println!("# from {}", path.display()),
        None => println!("# built-in defaults"),
    }
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif bar, one tick per unit.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        Self { bar }
    }
}

impl ProgressReporter for CliProgress {
    fn units_found(&self, count: usize) {
        self.bar.set_length(count as u64);
        self.bar.set_message("extracting");
    }

    fn unit_written(&self, doc: &WrittenDoc) {
        self.bar.inc(1);
        self.bar
            .suspend(|| println!("Wrote {}", doc.path.display()));
    }

    fn unit_skipped(&self, _unit: &str) {
        self.bar.inc(1);
    }

    fn unit_failed(&self, failure: &WriteFailure) {
        self.bar.inc(1);
        self.bar.suspend(|| {
            eprintln!(
                "Error writing {}: {}",
                failure.path.display(),
                failure.error
            );
        });
    }

    fn done(&self, _report: &ExtractReport) {
        self.bar.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
