use std::sync::Arc;

use rsb_core::config::Config;
use rsb_rscripts::{http_client, RawContentFetcher, RscriptsClient};

#[tokio::main]
async fn main() -> Result<(), rsb_core::Error> {
    rsb_core::logging::init("rsb")?;

    let cfg = Arc::new(Config::load()?);

    let http = http_client(cfg.http_timeout)?;
    let search = Arc::new(RscriptsClient::from_config(&cfg, http.clone()));
    let content = Arc::new(RawContentFetcher::from_config(&cfg, http));

    rsb_telegram::router::run_polling(cfg, search, content)
        .await
        .map_err(|e| rsb_core::Error::External(format!("telegram bot failed: {e}")))?;

    tracing::info!("rsb stopped");
    Ok(())
}
