use anyhow::Context;
use devreg::domain::config::ApiConfig;
use devreg::kernel::config::load_config;
use devreg_logger::Logger;
use devreg_server::Server;

#[devreg_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    // An explicit config path must exist; without one `server.toml` is optional.
    let cfg: ApiConfig = load_config(std::env::args_os().nth(1))
        .context("Critical: Configuration is malformed")?;

    let mut logger = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .filter(&cfg.logging.level)
        .json(cfg.logging.json);
    if let Some(directory) = &cfg.logging.directory {
        logger = logger.directory(directory);
    }
    let _log = logger.init().context("Failed to initialize logging")?;

    Server::builder().config(cfg).build().await?.run().await
}
