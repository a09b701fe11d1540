//! Mixpanel bot CLI
//!
//! # Usage
//!
//! ```bash
//! export NESTOR_MIXPANEL_API_KEY="..."
//! export NESTOR_MIXPANEL_API_SECRET="..."
//!
//! # One command
//! cargo run --bin nestor-mixpanel -- --command "mixpanel events Signup over the last 3 weeks"
//!
//! # Interactive
//! cargo run --bin nestor-mixpanel
//! ```

use clap::Parser;
use nestor_mixpanel::bot::BOT_NAME_VAR;
use nestor_mixpanel::{BotConfig, BotPlatform, CliBot, FormatterFactory, MixpanelBot, WriterResponder};
use std::io;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "nestor-mixpanel", version, about = "Mixpanel people and event reports")]
struct Args {
    /// Run a single command and exit
    #[arg(short, long)]
    command: Option<String>,

    /// Name the bot answers to
    #[arg(long, env = BOT_NAME_VAR)]
    bot_name: Option<String>,

    /// Output format
    #[arg(long, default_value_t = BotPlatform::Cli)]
    format: BotPlatform,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nestor_utils::init_tracing();
    let args = Args::parse();

    let mut config = BotConfig::from_env()?.with_platform(args.format);
    if let Some(name) = args.bot_name {
        config = config.with_name(name);
    }
    info!(bot = %config.name, platform = %config.platform, "Starting Mixpanel bot");

    let formatter = FormatterFactory::create(config.platform);
    let cli = CliBot::new(MixpanelBot::from_config(config)?);
    let responder = WriterResponder::new(io::stdout(), formatter);

    if let Some(command) = args.command {
        cli.handle_line(&command, &responder).await?;
        return Ok(());
    }

    cli.interactive(true)
        .run(io::stdin().lock(), &responder)
        .await?;
    println!("Goodbye!");

    Ok(())
}
