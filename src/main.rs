use tracing::{error, warn};

use uiprefs::{logging, web, ControllerConfig};

fn main() {
    let config = web::load_config();
    logging::init(
        config
            .as_ref()
            .map(|c| c.log_level.as_str())
            .unwrap_or("info"),
    );
    let config = config.unwrap_or_else(|e| {
        warn!("Falling back to default config: {}", e);
        ControllerConfig::default()
    });

    if let Err(e) = web::install(config) {
        error!("Preference controller not installed: {}", e);
    }
}
