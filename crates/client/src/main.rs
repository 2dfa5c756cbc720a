//! Headless snapfit client.
//!
//! Loads levels from a data directory, runs them on the runtime and lets a
//! scripted player drag every item home. Useful for smoke-testing level data
//! and for replaying seeds.
//!
//! ```bash
//! snapfit run --level shelf --ticks 3000
//! snapfit campaign --from tutorial --events-json
//! ```
mod autoplay;
mod config;
mod logging;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};

use config::ClientConfig;
use session::{PlayOptions, play_level};
use snapfit_content::ContentFactory;

#[derive(Debug, Parser)]
#[command(name = "snapfit", version, about = "Drag-and-place puzzle runner")]
struct Cli {
    /// Directory holding config.toml, levels.ron and levels/
    #[arg(long, global = true)]
    data_dir: Option<std::path::PathBuf>,

    /// Also write logs to a per-session file
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play a single level
    Run {
        /// Level file stem under levels/
        #[arg(long)]
        level: String,
        #[command(flatten)]
        play: PlayArgs,
    },
    /// Play the indexed levels in order
    Campaign {
        /// Start from this level instead of the first one
        #[arg(long)]
        from: Option<String>,
        #[command(flatten)]
        play: PlayArgs,
    },
}

#[derive(Debug, clap::Args)]
struct PlayArgs {
    /// Maximum number of time steps per level
    #[arg(long, default_value_t = 2000)]
    ticks: u32,
    /// Seconds per time step
    #[arg(long, default_value_t = 0.05)]
    dt: f32,
    /// Seed for the scripted player's drop jitter
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Print every runtime event as a JSON line
    #[arg(long)]
    events_json: bool,
}

impl PlayArgs {
    fn options(&self, config: &ClientConfig) -> PlayOptions {
        PlayOptions {
            ticks: self.ticks,
            dt: self.dt,
            seed: self.seed,
            events_json: self.events_json,
            act_every: config.act_every,
            runtime: config.runtime.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let _log_guard = logging::setup_logging(&config, cli.log_file)?;
    tracing::info!(data_dir = %config.data_dir.display(), "snapfit client starting");

    let factory = ContentFactory::new(&config.data_dir);
    let game_config = factory.load_config()?;

    match cli.command {
        Command::Run { level, play } => {
            let report = play_level(&factory, &level, game_config, &play.options(&config)).await?;
            println!("{report}");
            report.ensure_completed()
        }
        Command::Campaign { from, play } => {
            let index = factory.load_index()?;
            let mut current = match from {
                Some(name) => index
                    .position_of(&name)
                    .ok_or_else(|| anyhow::anyhow!("level '{}' is not in the index", name))?,
                None => 0,
            };
            let options = play.options(&config);
            loop {
                let Some(entry) = index.get(current) else {
                    break;
                };
                tracing::info!(level = %entry.file, title = entry.title(), "campaign level");
                let report = play_level(&factory, &entry.file, game_config.clone(), &options).await?;
                println!("{report}");
                report.ensure_completed()?;

                match index.next_after(current) {
                    Some(next) => current = next,
                    None => break,
                }
            }
            println!("campaign finished");
            Ok(())
        }
    }
}
