//! `EasyShop` command-line storefront

use std::io;

use easyshop::{cli::Cli, observability::init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };

    init_subscriber(&cli.logging)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    cli.run(&mut handle).await?;

    Ok(())
}
