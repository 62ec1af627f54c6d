use clap::{Parser, Subcommand};
use content_nav::diagnostics::Report;
use content_nav::pipeline::{self, BuildOutput};
use content_nav::types::NavigationModel;
use content_nav::{config, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "content-nav")]
#[command(about = "Build a site navigation model from a tree of README files")]
#[command(long_about = "\
Build a site navigation model from a tree of README files

Directories are nodes. Depth decides the kind: category, topic, article.
Each node needs a README.md whose first H1 is its title; the first
paragraph after it is the description.

Content structure:

  content/
  ├── content-nav.toml             # Build config (optional)
  ├── ordering.json5               # { \"category/topic\": [\"pinned\", ...] }
  ├── home.json5                   # { featured: [\"category/topic/article\"] }
  ├── site.json5                   # Site metadata, passed through
  ├── vanity.json5                 # [{ from: \"/old\", to: \"/new\" }]
  └── articles/
      ├── machine-learning/        # Category
      │   ├── README.md            # # Machine Learning
      │   └── llms/                # Topic
      │       ├── README.md
      │       └── attention/       # Article
      │           └── README.md    # # Draft: Attention  (drafts keep the prefix)
      └── _scratch/                # Leading _ or . = ignored

Siblings are ordered pinned-first (ordering.json5), then by slug.

Run 'content-nav gen-config' to generate a documented content-nav.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory for navigation.json and diagnostics.json
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log pipeline progress to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the navigation tree the content would produce
    Scan,
    /// Validate content and print every problem found
    Check,
    /// Write navigation.json and diagnostics.json to the output directory
    Build,
    /// Print a stock content-nav.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let (config, BuildOutput { model, report }) = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(ExitCode::SUCCESS);
        }
        _ => load_and_build(&cli.source)?,
    };

    match cli.command {
        Command::Scan => {
            output::print_model(&model);
            if !report.is_empty() {
                println!();
                println!("{}", output::format_summary(&report));
            }
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            output::print_model(&model);
            println!();
            output::print_report(&report);
        }
        Command::Build => {
            write_outputs(&cli.output, &model, &report)?;
            output::print_model(&model);
            println!();
            output::print_report(&report);
            println!("==> Wrote {}", cli.output.display());
        }
        Command::GenConfig => {}
    }

    if report.is_clean(config.deny_warnings) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Load `content-nav.toml`, size the thread pool, and run the pipeline.
fn load_and_build(
    source: &Path,
) -> Result<(config::BuildConfig, BuildOutput), Box<dyn std::error::Error>> {
    let config = config::load_config(source)?;
    init_thread_pool(&config.processing);
    let output = pipeline::build(source, &config)?;
    Ok((config, output))
}

/// Write the model and the report as pretty JSON.
fn write_outputs(
    dir: &Path,
    model: &NavigationModel,
    report: &Report,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(
        dir.join("navigation.json"),
        serde_json::to_string_pretty(model)?,
    )?;
    std::fs::write(
        dir.join("diagnostics.json"),
        serde_json::to_string_pretty(report)?,
    )?;
    Ok(())
}

/// Log to stderr. `RUST_LOG` wins; otherwise warnings only, or debug with
/// `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
