mod app;
mod particles;
mod path;
mod pet;
mod records;
mod settings;

fn main() {
    env_logger::init();
    log::info!("Sidekick starting up");

    if let Err(e) = app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
