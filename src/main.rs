use clap::{Parser, Subcommand};
use e2e_preview::browser::{BrowseEvent, Browser};
use e2e_preview::imaging::RustDecoder;
use e2e_preview::sequence::{self, SequenceConfig, Timeline};
use e2e_preview::source::{self, JsonTreeDecoder, TfRecordReader};
use e2e_preview::{config, output};
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "e2e-preview")]
#[command(about = "Camera mosaic previews for TFRecord shards")]
#[command(long_about = "\
Camera mosaic previews for TFRecord shards

Records are walked without a schema binding. Every JPEG/PNG blob in a record
becomes a tile, labeled by the nearest preceding camera field. Records are
ordered by segment identifier and timestamp.

Shard discovery (under --base):
  training_* → validation_* → test_* → first *.tfrecord* found

Identifier resolution (first available wins):
  segment_id field → {run_id}_seg{segment_index:04} → {run_id}_seg_{hash8}

Run 'e2e-preview gen-config' to print a documented e2e-preview.toml.")]
#[command(version)]
struct Cli {
    /// Shard file or directory to search for shards (overrides config)
    #[arg(long, global = true)]
    base: Option<PathBuf>,

    /// Configuration file
    #[arg(long, default_value = "e2e-preview.toml", global = true)]
    config: PathBuf,

    /// Verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the frame timeline of a shard
    Scan,
    /// Write every frame as a PNG
    Export {
        /// Output directory
        #[arg(long, default_value = "frames")]
        out: PathBuf,
    },
    /// Step through frames with n/p (or right/left) on stdin, q to quit
    Browse {
        /// File the current frame is written to after each step
        #[arg(long, default_value = "current-frame.png")]
        out: PathBuf,
    },
    /// Print a stock e2e-preview.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Scan => {
            let (shard, timeline) = load_timeline(&cli)?;
            output::print_scan_output(&timeline, &shard);
        }
        Command::Export { out } => {
            let (_, timeline) = load_timeline(&cli)?;
            std::fs::create_dir_all(out)?;
            for (i, frame) in timeline.frames.iter().enumerate() {
                let name = output::export_file_name(i + 1, frame);
                frame.image.save(out.join(&name))?;
                println!("{}", output::format_export_line(i + 1, frame, &name));
            }
            println!("{}", output::format_summary(&timeline));
        }
        Command::Browse { out } => {
            let (_, timeline) = load_timeline(&cli)?;
            let Some(mut browser) = Browser::new(timeline.frames) else {
                return Ok(());
            };
            show(&browser, out)?;
            for line in std::io::stdin().lock().lines() {
                let line = line?;
                let key = line.trim();
                if key == "q" {
                    break;
                }
                let Some(event) = BrowseEvent::from_key(key) else {
                    continue;
                };
                browser.handle(event);
                show(&browser, out)?;
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Resolve config and shard, then scan it into a timeline.
fn load_timeline(cli: &Cli) -> Result<(PathBuf, Timeline), Box<dyn std::error::Error>> {
    let preview_config = config::load_config(&cli.config)?;
    let base = cli
        .base
        .clone()
        .unwrap_or_else(|| PathBuf::from(&preview_config.base));

    let shard = source::find_shard(&base)?;
    log::info!("opened shard {}", shard.display());

    let records = TfRecordReader::open(&shard)?;
    let timeline = sequence::sequence(
        records,
        &JsonTreeDecoder,
        &RustDecoder::new(),
        &SequenceConfig::from_preview_config(&preview_config),
    )?;
    Ok((shard, timeline))
}

fn show(browser: &Browser, out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    browser.current().image.save(out)?;
    println!("{}", browser.title());
    Ok(())
}
