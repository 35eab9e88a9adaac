use anyhow::Context;
use slotbook::domain::config::ApiConfig;
use slotbook::kernel::config::load_config;
use slotbook_logger::{LevelFilter, Logger};
use slotbook_server::Server;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let cfg: ApiConfig =
        load_config(config_path.as_deref()).context("Critical: Configuration is malformed")?;

    let level = cfg
        .logging
        .level
        .parse::<LevelFilter>()
        .context("Critical: logging.level is not a valid level")?;
    let mut logger = Logger::builder(env!("CARGO_PKG_NAME")).level(level).json(cfg.logging.json);
    if let Some(dir) = &cfg.logging.directory {
        logger = logger.directory(dir);
    }
    let _log = logger.init()?;

    Server::builder().config(cfg).build().await?.run().await
}
