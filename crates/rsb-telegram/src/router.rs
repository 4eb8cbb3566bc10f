use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use rsb_core::{
    config::Config,
    messaging::port::MessagingPort,
    pagination::{ControllerConfig, SearchController},
    ports::{ContentSource, ScriptSearch},
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<SearchController>,
}

/// Long-poll Telegram until Ctrl-C, then expire every outstanding card.
pub async fn run_polling(
    cfg: Arc<Config>,
    search: Arc<dyn ScriptSearch>,
    content: Arc<dyn ContentSource>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => info!(username = %me.username(), "rsb started"),
        Err(e) => warn!(error = %e, "get_me failed; continuing"),
    }
    info!(
        api = %cfg.api_base_url,
        ttl_secs = cfg.session_ttl.as_secs(),
        nav_style = ?cfg.nav_style,
        "search settings"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let controller = Arc::new(SearchController::new(
        ControllerConfig::from_config(&cfg),
        search,
        content,
        messenger,
    ));

    let state = Arc::new(AppState {
        controller: controller.clone(),
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!(
        outstanding = controller.active_sessions().await,
        "dispatcher stopped; expiring search sessions"
    );
    controller.shutdown().await;

    Ok(())
}
