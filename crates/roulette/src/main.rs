use croupier::Game;
use relm4::prelude::*;
use roulette::config;
use roulette::gui::app::AppModel;
use roulette::sys::runtime;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match config::write_default_config() {
        Ok(path) => log::debug!("Table settings at {}", path.display()),
        Err(e) => log::warn!("Could not write default config: {}", e),
    }
    let config = config::load_config()?;
    let game = Game::new(config)?;

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.croupier.roulette");

    app.run::<AppModel>((game, rx));
    Ok(())
}
