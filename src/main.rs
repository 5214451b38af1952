#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use dojo_agent::{serve, AppConfig};
use tracing::info;

fn init_tracing() {
    let fmt = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env());
    fmt.json().init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = AppConfig::from_env()?;
    info!(bind = %config.bind, "starting agent");
    serve(config).await
}
