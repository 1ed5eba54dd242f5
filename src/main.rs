// Reverie — process entry point.
// Logging is configured through RUST_LOG (default: info).

use log::{error, info};
use reverie::{serve, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("[config] {}", e);
            return Err(e.into());
        }
    };

    info!("[startup] Reverie reflection service, provider={}", config.provider);
    serve(config).await
}
