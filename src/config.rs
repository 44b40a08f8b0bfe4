//! Environment and logging setup

use tracing::log::LevelFilter;

/// Crates that are chatty at debug level; held at `Info` unless debugging.
const NOISY_MODULES: [&str; 5] = ["rustls", "hyper_util", "h2", "reqwest", "tower_http"];

/// Loads a `.env` file from the working directory if there is one.
///
/// Returns the path that was loaded, so startup can log it.
pub fn load_env() -> Option<std::path::PathBuf> {
    dotenvy::dotenv().ok()
}

/// Picks the base log level for the debug flag.
pub fn log_level(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let mut logger = simple_logger::SimpleLogger::new().with_level(log_level(debug));
    if !debug {
        logger = logger.with_module_level("tracing", LevelFilter::Warn);
        for module in NOISY_MODULES {
            logger = logger.with_module_level(module, LevelFilter::Info);
        }
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}
