use anyhow::Context;
use clap::Parser;
use tracing::info;

use strikebook::app::App;
use strikebook::cli::{render_catalog, render_check, Cli, Commands, LoadArgs};
use strikebook::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = Config::resolve(cli.config.as_deref()).context("failed to load config")?;
    config.init_logging();

    let app = App::new(config);

    match cli.command.unwrap_or(Commands::Load(LoadArgs::default())) {
        Commands::Load(args) => {
            info!("strikebook loading catalog");
            let catalog = app.load_catalog().await.context("catalog load failed")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                print!("{}", render_catalog(&catalog));
            }
        }
        Commands::Check => {
            let report = app.check().await;
            print!("{}", render_check(&report));
            if !report.all_ok() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
