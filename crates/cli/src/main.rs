//! Dishcart session runner

use std::{io, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use dishcart::{menu::Menu, orders::LocalOrderBook};
use tracing::{error, info};

use crate::{config::Config, session::Session};

mod config;
mod logging;
mod session;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "logging not initialized yet, must use eprintln for config errors"
            )]
            {
                eprintln!("Configuration error: {error}");
            }

            return ExitCode::from(2);
        }
    };

    if let Err(error) = logging::init_subscriber(&config.logging) {
        #[expect(clippy::print_stderr, reason = "no subscriber to log through")]
        {
            eprintln!("Failed to initialise logging: {error}");
        }

        return ExitCode::FAILURE;
    }

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:#}");

            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<()> {
    let menu = Menu::from_file(&config.menu)
        .with_context(|| format!("loading menu {}", config.menu.display()))?;
    let session = Session::from_file(&config.session)
        .with_context(|| format!("loading session {}", config.session.display()))?;
    let pricing = config.pricing(menu.currency())?;

    info!(
        restaurants = menu.restaurants().count(),
        steps = session.steps.len(),
        currency = menu.currency().iso_alpha_code,
        "starting session"
    );

    let book = LocalOrderBook::new(Arc::new(menu), pricing);
    let cart = session::run(&session, &book, &mut io::stdout().lock()).await?;

    info!(
        lines_left = cart.len(),
        orders = book.orders().await.len(),
        "session finished"
    );

    Ok(())
}
