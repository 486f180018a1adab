use clap::Parser;
use flashdeck::DeckName;
use flashdeck::core::config::{self, CliOverrides};
use flashdeck::tui;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "flashdeck", about = "Terminal flashcards with highlighted code answers")]
struct Args {
    /// Deck to study (overrides the config file)
    #[arg(short, long, value_enum)]
    deck: Option<DeckName>,

    /// Load the syntax highlighter on first use instead of at startup
    #[arg(long)]
    no_prewarm: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Config decides the log level, so it's read before the logger exists;
    // a load failure is logged once logging is up.
    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (config::FlashdeckConfig::default(), Some(e)),
    };
    let resolved = config::resolve(
        &file_config,
        CliOverrides {
            deck: args.deck,
            no_prewarm: args.no_prewarm,
        },
    );

    // Initialize file logger - writes to flashdeck.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("flashdeck.log") {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }
    log::info!("Flashdeck starting up with deck: {:?}", resolved.deck);

    tui::run(resolved)
}
