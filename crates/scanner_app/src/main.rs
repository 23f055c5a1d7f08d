mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let config = platform::ClientConfig::parse();
    platform::logging::initialize(config.log, config.log_level());

    // One thread: every callback of the session runs on this loop.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(platform::run_app(config))
}
