use clap::{Parser, Subcommand};
use simple_carousel::{config, markup, output, sim, slides};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simple-carousel")]
#[command(about = "Infinite-loop image carousel")]
#[command(long_about = "\
Infinite-loop image carousel

Your filesystem is the data source. The images in the source directory
become the slides, ordered by numeric prefix.

Slide directory:

  slides/
  ├── config.toml          # Carousel config (optional)
  ├── 010-harbour.jpg      # Numbered: sorted by number
  ├── 020-old-town.webp    # Alt text from the name: \"old town\"
  ├── 030.avif             # Number only: alt text falls back to \"030\"
  └── staff-photo.png      # Unnumbered: after all numbered slides

Simulation scripts are JSON arrays of steps, for example:

  [{\"click\": \"next\"}, {\"wait\": 600}, {\"key\": \"ArrowLeft\"}, {\"swipe\": {\"from\": 300, \"to\": 200}}]

Run 'simple-carousel gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Slide directory
    #[arg(long, default_value = "slides", global = true)]
    source: PathBuf,

    /// Log controller decisions to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the slides found in the source directory
    Slides,
    /// Write a standalone HTML page showing the carousel
    Render {
        /// Output file
        #[arg(long, default_value = "carousel.html")]
        output: PathBuf,
        /// Page title
        #[arg(long, default_value = "Carousel")]
        title: String,
    },
    /// Run a scripted scenario on a virtual clock and print the trace
    Simulate {
        /// Number of slides (defaults to the slides in the source directory)
        #[arg(long)]
        slides: Option<usize>,
        /// JSON script of steps
        #[arg(long)]
        script: PathBuf,
        /// Frame width in pixels
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        /// Print the trace as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Slides => {
            let found = slides::scan_slides(&cli.source)?;
            output::print_slides(&found, &cli.source);
        }
        Command::Render {
            output: out_path,
            title,
        } => {
            let carousel_config = config::load_config(&cli.source)?;
            let found = slides::scan_slides(&cli.source)?;
            let page = markup::render_page(&title, &found, &carousel_config);
            std::fs::write(&out_path, page.into_string())?;
            info!(path = %out_path.display(), "wrote page");
            output::print_render_output(found.len(), &out_path);
        }
        Command::Simulate {
            slides: count,
            script,
            width,
            json,
        } => {
            let carousel_config = config::load_config(&cli.source)?;
            let count = match count {
                Some(n) => n,
                None => slides::scan_slides(&cli.source)?.len(),
            };
            let steps = sim::load_script(&script)?;
            debug!(slides = count, steps = steps.len(), "simulating");
            let trace = sim::simulate(count, width, &carousel_config, &steps)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&trace)?);
            } else {
                output::print_trace(&trace);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// Precedence: `RUST_LOG` > `--verbose` > warnings only.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "simple_carousel=debug"
    } else {
        "simple_carousel=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
