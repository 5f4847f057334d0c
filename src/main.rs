use clap::Parser;
use hdl_deps::config::{ConfigOverrides, FileConfig};
use hdl_deps::dependency_graph::DuplicatePolicy;
use hdl_deps::extractor::VhdlCapture;
use hdl_deps::reporter::OutputFormat;
use hdl_deps::{logger, Analyzer, Config, Language, Reporter};
use std::path::PathBuf;
use tracing::info;

/// Prints the HDL source files a set of testbenches depends on.
#[derive(Parser)]
#[command(name = "hdl-deps")]
#[command(about = "Find the HDL sources needed to simulate a set of testbenches")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// HDL dialect
    #[arg(long, value_enum)]
    lang: Option<Language>,

    /// Space-separated testbench names, e.g. "top_tb other_tb"
    #[arg(long)]
    tbs: Option<String>,

    /// Directory with design sources
    #[arg(long, alias = "hdl_dir")]
    hdl_dir: Option<PathBuf>,

    /// Directory with simulation sources
    #[arg(long, alias = "sim_dir")]
    sim_dir: Option<PathBuf>,

    /// TOML file with default values for the options above
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// What to do when two files define the same module name
    #[arg(long, value_enum)]
    on_duplicate: Option<DuplicatePolicy>,

    /// VHDL only: take the entity name or the instance label
    #[arg(long, value_enum)]
    vhdl_capture: Option<VhdlCapture>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write a documented configuration file and exit
    #[arg(long, value_name = "FILE", conflicts_with = "config")]
    init_config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet, cli.no_color);

    if let Some(path) = cli.init_config {
        return generate_config(path);
    }

    let base = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let overrides = ConfigOverrides {
        language: cli.lang,
        testbenches: cli.tbs,
        hdl_dir: cli.hdl_dir,
        sim_dir: cli.sim_dir,
        duplicates: cli.on_duplicate,
        vhdl_capture: cli.vhdl_capture,
        format: cli.format,
    };
    let config = overrides.apply(base)?;
    let format = config.format;

    let analyzer = Analyzer::new(config)?;
    let analysis = analyzer.run()?;

    let output = Reporter::new(format).render(&analysis)?;
    println!("{}", output);

    Ok(())
}

fn generate_config(path: PathBuf) -> anyhow::Result<()> {
    std::fs::write(&path, Config::create_documented_config())?;
    info!(path = %path.display(), "configuration file created");
    Ok(())
}
