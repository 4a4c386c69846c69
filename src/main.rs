use clap::{Parser, Subcommand};
use duct_gallery::entry::Mode;
use duct_gallery::exec::ShellRunner;
use duct_gallery::plot::ConDuctPlotter;
use duct_gallery::{config, output, pipeline, scan};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "duct-gallery")]
#[command(about = "Generate a gallery README from duct execution entries")]
#[command(long_about = "\
Generate a gallery README from duct execution entries

Your filesystem is the data source. Each subdirectory of the gallery root is
one entry; running `build` executes it under duct, plots the resource-usage
report, and renders one markdown document covering every entry that made it
through.

Entry structure:

  entries/
  ├── gallery.toml             # Gallery config (optional: mode, timeouts, plot tool)
  ├── example-1/
  │   ├── command.sh           # Required: the monitored command
  │   ├── setup.sh             # Optional: environment preparation
  │   ├── plots/               # Plot output (pre-populated in prerendered mode)
  │   ├── README.md            # Optional notes
  │   └── .duct/               # duct metadata, written by command.sh
  │       ├── *info.json       # Sidecar naming the usage report
  │       └── *usage.json      # Machine-readable usage report
  └── example-2/
      └── ...

Modes:
  execute      run setup.sh + command.sh, then plot the usage report (default)
  prerendered  skip execution, document plots already in plots/

Entries that fail validation or processing are skipped with a warning; the
run only fails when nothing at all could be rendered.")]
#[command(version)]
struct Cli {
    /// Output markdown document
    #[arg(short, long, default_value = "README.md", global = true)]
    output: PathBuf,

    /// Gallery root to scan
    #[arg(long, default_value = "entries", global = true)]
    gallery_dir: PathBuf,

    /// Processing mode (overrides gallery.toml)
    #[arg(long, value_enum, global = true)]
    mode: Option<Mode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline and write the gallery document
    Build,
    /// Validate the gallery without executing or writing anything
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config(&cli.gallery_dir)?;
    let mode = cli.mode.unwrap_or(config.mode);

    match cli.command {
        Command::Build => {
            let runner = ShellRunner;
            let plotter = ConDuctPlotter::new(config.plot_tool.clone(), config.plot_timeout());
            let report = pipeline::build(
                &cli.gallery_dir,
                &cli.output,
                mode,
                &config,
                &runner,
                &plotter,
            )?;
            output::print_build_summary(&report);
        }
        Command::Check => {
            let gallery = scan::scan(&cli.gallery_dir, mode)?;
            output::print_scan_report(&gallery);
            if gallery.entries.is_empty() {
                return Err(format!(
                    "no valid gallery entries found in {}",
                    cli.gallery_dir.display()
                )
                .into());
            }
        }
    }

    Ok(())
}
