//! GreenLuma Reborn Manager entry point.

mod app;
mod cli;

use glr_updater::Updater;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,glr=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let invocation = cli::parse(std::env::args().skip(1))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting GLR Manager");

    let mut manager = app::Manager::open()?;

    let updater = Updater::new(glr_config::paths::exe_dir());
    let (check, swapped) = updater.run(manager.config().config().check_update, invocation.flags);
    tracing::debug!(?check, swapped = swapped.len(), "update check done");

    let Some(command) = invocation.command else {
        println!("{}", cli::USAGE);
        return Ok(());
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut stdout = std::io::stdout().lock();
    rt.block_on(manager.execute(command, &mut stdout))?;

    Ok(())
}
