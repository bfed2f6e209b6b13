use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use mp_server::admin::spawn_console;
use mp_server::{GameServer, ServerConfig};

/// Dedicated authoritative server for the sandbox game's multiplayer layer.
#[derive(Parser, Debug)]
#[command(name = "mp-server")]
struct Args {
    /// Path to the JSON config file.
    #[arg(default_value = "server.json")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ServerConfig::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    log::info!(
        "starting '{}' on port {} (tick rate {} Hz)",
        config.server_name,
        config.port,
        config.tick_rate
    );

    let admin_queue = spawn_console();
    let mut server = GameServer::new(config).context("binding server transport")?.with_admin_queue(admin_queue);
    server.run();

    log::info!("server stopped");
    Ok(())
}
