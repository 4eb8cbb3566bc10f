//! Search sessions: one outstanding card, its page state, and its navigation controls.
//!
//! Every card the bot sends gets a [`SearchSession`] keyed by the card's
//! [`MessageRef`]. Button presses resolve to a session, are serialized on that
//! session's lock, and move the page within `[1, max_pages]`. A session lives
//! for a fixed TTL from the moment its card is sent; on expiry (or shutdown)
//! the controls are stripped and the session is dropped, exactly once.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, info, warn};

use crate::{
    card::{render_card_with_limit, Card, SiteLinks, DESCRIPTION_LIMIT},
    config::Config,
    domain::{ChatId, MessageRef, UserId},
    formatting::escape_html,
    messaging::{
        port::MessagingPort,
        types::{CallbackQuery, Command, InlineButton, InlineKeyboard},
    },
    ports::{ContentSource, ScriptSearch},
    script::Script,
};

pub const MSG_MISSING_QUERY: &str = "Please provide a search query.";
pub const MSG_SEARCH_FAILED: &str = "An error occurred while fetching scripts.";
pub const MSG_NO_RESULTS: &str = "No scripts found for the given query.";
pub const MSG_PAGE_EMPTY: &str = "No scripts found on this page.";
pub const MSG_UPDATE_FAILED: &str = "An error occurred while updating the script.";

const NAV_PREFIX: &str = "nav:";
/// Callback data of the inert "Page N of M" indicator.
pub const PAGE_INDICATOR_DATA: &str = "nav:page";

/// Which navigation buttons a card carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavStyle {
    /// First / Previous / Page / Next / Last.
    Full,
    /// Previous / Page / Next.
    Compact,
}

impl NavStyle {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "full" => Some(NavStyle::Full),
            "compact" => Some(NavStyle::Compact),
            _ => None,
        }
    }

    pub fn allows(self, action: NavAction) -> bool {
        match self {
            NavStyle::Full => true,
            NavStyle::Compact => matches!(action, NavAction::Previous | NavAction::Next),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavAction {
    First,
    Previous,
    Next,
    Last,
}

impl NavAction {
    fn token(self) -> &'static str {
        match self {
            NavAction::First => "first",
            NavAction::Previous => "previous",
            NavAction::Next => "next",
            NavAction::Last => "last",
        }
    }

    pub fn callback_data(self) -> String {
        format!("{NAV_PREFIX}{}", self.token())
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        match data.strip_prefix(NAV_PREFIX)? {
            "first" => Some(NavAction::First),
            "previous" => Some(NavAction::Previous),
            "next" => Some(NavAction::Next),
            "last" => Some(NavAction::Last),
            _ => None,
        }
    }
}

/// What a navigation press asks for, before any network call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavStep {
    Stay,
    Goto(u32),
    /// Ask the API for the current page count, then go there.
    ResolveLast,
}

/// Query plus page position of one outstanding card.
///
/// Always satisfies `1 <= current_page <= max_pages`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageState {
    pub query: String,
    current_page: u32,
    max_pages: u32,
}

impl PageState {
    /// `max_pages` is trusted as reported, except that it is raised to the page
    /// actually on display when the API reports fewer.
    pub fn new(query: impl Into<String>, current_page: u32, max_pages: u32) -> Self {
        let current_page = current_page.max(1);
        Self {
            query: query.into(),
            current_page,
            max_pages: max_pages.max(current_page),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn is_first(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last(&self) -> bool {
        self.current_page >= self.max_pages
    }

    pub fn step(&self, action: NavAction) -> NavStep {
        match action {
            NavAction::First if self.is_first() => NavStep::Stay,
            NavAction::First => NavStep::Goto(1),
            NavAction::Previous if self.is_first() => NavStep::Stay,
            NavAction::Previous => NavStep::Goto(self.current_page - 1),
            NavAction::Next if self.is_last() => NavStep::Stay,
            NavAction::Next => NavStep::Goto(self.current_page + 1),
            NavAction::Last => NavStep::ResolveLast,
        }
    }
}

/// Navigation controls for a card showing `state`.
pub fn nav_keyboard(style: NavStyle, state: &PageState) -> InlineKeyboard {
    let first = state.is_first();
    let last = state.is_last();
    let indicator = InlineButton::new(
        format!("Page {} of {}", state.current_page(), state.max_pages()),
        PAGE_INDICATOR_DATA,
        true,
    );

    let nav = |action: NavAction, label: &str, enabled: bool| {
        InlineButton::new(label, action.callback_data(), enabled)
    };

    let buttons = match style {
        NavStyle::Full => vec![
            nav(NavAction::First, "⏪ First", !first),
            nav(NavAction::Previous, "◀️ Previous", !first),
            indicator,
            nav(NavAction::Next, "▶️ Next", !last),
            nav(NavAction::Last, "⏭️ Last", !last),
        ],
        NavStyle::Compact => vec![
            nav(NavAction::Previous, "◀️ Previous", !first),
            indicator,
            nav(NavAction::Next, "▶️ Next", !last),
        ],
    };
    InlineKeyboard::single_row(buttons)
}

/// Controller settings, split out of [`Config`] so tests can build them directly.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    pub session_ttl: Duration,
    pub nav_style: NavStyle,
    pub links: SiteLinks,
    pub description_limit: usize,
}

impl ControllerConfig {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            session_ttl: cfg.session_ttl,
            nav_style: cfg.nav_style,
            links: cfg.site_links(),
            description_limit: cfg.description_limit,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(60),
            nav_style: NavStyle::Full,
            links: SiteLinks::new(crate::config::DEFAULT_SITE_URL),
            description_limit: DESCRIPTION_LIMIT,
        }
    }
}

#[derive(Debug)]
struct SearchSession {
    owner: UserId,
    state: PageState,
    expired: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    MissingQuery,
    SearchFailed,
    NoResults,
    SendFailed,
    Displayed(MessageRef),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Not ours to handle (foreign user, or not attached to a message).
    Ignored,
    /// The card's session is gone; nothing changes.
    Expired,
    /// Acknowledged without moving (bound reached, inert button).
    Unchanged,
    Updated { page: u32 },
    /// The resolved page had no results; the card stays as it was.
    NoResults,
    Failed,
}

/// Drives `!search` commands and the navigation of the cards they produce.
pub struct SearchController {
    cfg: ControllerConfig,
    search: Arc<dyn ScriptSearch>,
    content: Arc<dyn ContentSource>,
    messenger: Arc<dyn MessagingPort>,
    sessions: Mutex<HashMap<MessageRef, Arc<Mutex<SearchSession>>>>,
    shutdown: CancellationToken,
    timers: TaskTracker,
}

impl SearchController {
    pub fn new(
        cfg: ControllerConfig,
        search: Arc<dyn ScriptSearch>,
        content: Arc<dyn ContentSource>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            cfg,
            search,
            content,
            messenger,
            sessions: Mutex::new(HashMap::new()),
            shutdown: CancellationToken::new(),
            timers: TaskTracker::new(),
        }
    }

    /// Run a search command and, when there is something to show, send the first card.
    pub async fn handle_command(self: &Arc<Self>, cmd: &Command) -> CommandOutcome {
        let query = cmd.args.trim();
        if query.is_empty() {
            self.notify(cmd.chat_id, MSG_MISSING_QUERY).await;
            return CommandOutcome::MissingQuery;
        }

        info!(
            chat_id = cmd.chat_id.0,
            user_id = cmd.user_id.0,
            username = cmd.username.as_deref().unwrap_or("-"),
            query,
            "search command"
        );

        let page = match self.search.search(query, 1).await {
            Ok(page) => page,
            Err(e) => {
                warn!(query, error = %e, "search failed");
                self.notify(cmd.chat_id, MSG_SEARCH_FAILED).await;
                return CommandOutcome::SearchFailed;
            }
        };

        let Some(script) = page.first() else {
            self.notify(cmd.chat_id, MSG_NO_RESULTS).await;
            return CommandOutcome::NoResults;
        };

        let state = PageState::new(query, 1, page.max_pages);
        let card = self.render(script, &state).await;
        let keyboard = nav_keyboard(self.cfg.nav_style, &state);

        let msg = match self.messenger.send_card(cmd.chat_id, &card, &keyboard).await {
            Ok(msg) => msg,
            Err(e) => {
                warn!(chat_id = cmd.chat_id.0, error = %e, "failed to send search card");
                return CommandOutcome::SendFailed;
            }
        };

        self.register(msg, cmd.user_id, state).await;
        CommandOutcome::Displayed(msg)
    }

    /// Apply one button press to the session behind the pressed card.
    pub async fn handle_callback(&self, q: &CallbackQuery) -> InteractionOutcome {
        let Some(msg) = q.message else {
            return InteractionOutcome::Ignored;
        };

        let session = { self.sessions.lock().await.get(&msg).cloned() };
        let Some(session) = session else {
            self.ack(&q.callback_id, None).await;
            return InteractionOutcome::Expired;
        };

        // Held for the whole press: presses on one card apply one at a time.
        let mut session = session.lock().await;
        if session.expired {
            self.ack(&q.callback_id, None).await;
            return InteractionOutcome::Expired;
        }
        if session.owner != q.user_id {
            debug!(
                user_id = q.user_id.0,
                username = q.username.as_deref().unwrap_or("-"),
                owner = session.owner.0,
                "ignoring press from another user"
            );
            return InteractionOutcome::Ignored;
        }

        let action = NavAction::from_callback_data(&q.data)
            .filter(|a| self.cfg.nav_style.allows(*a));
        let Some(action) = action else {
            self.ack(&q.callback_id, None).await;
            return InteractionOutcome::Unchanged;
        };

        let state = &session.state;
        let target = match state.step(action) {
            NavStep::Stay => None,
            NavStep::Goto(page) => Some(page),
            NavStep::ResolveLast => match self.search.search(&state.query, state.current_page()).await {
                Ok(fresh) => Some(fresh.max_pages.max(1)).filter(|p| *p != state.current_page()),
                Err(e) => {
                    warn!(query = %state.query, error = %e, "failed to resolve last page");
                    self.ack(&q.callback_id, Some(MSG_UPDATE_FAILED)).await;
                    return InteractionOutcome::Failed;
                }
            },
        };
        let Some(target) = target else {
            self.ack(&q.callback_id, None).await;
            return InteractionOutcome::Unchanged;
        };

        debug!(query = %state.query, from = state.current_page(), to = target, ?action, "navigating");

        let page = match self.search.search(&state.query, target).await {
            Ok(page) => page,
            Err(e) => {
                warn!(query = %state.query, page = target, error = %e, "search failed during navigation");
                self.ack(&q.callback_id, Some(MSG_UPDATE_FAILED)).await;
                return InteractionOutcome::Failed;
            }
        };
        let Some(script) = page.first() else {
            self.ack(&q.callback_id, Some(MSG_PAGE_EMPTY)).await;
            return InteractionOutcome::NoResults;
        };

        let next_state = PageState::new(state.query.clone(), target, page.max_pages);
        let card = self.render(script, &next_state).await;
        let keyboard = nav_keyboard(self.cfg.nav_style, &next_state);

        if let Err(e) = self.messenger.edit_card(msg, &card, &keyboard).await {
            warn!(error = %e, "failed to update search card");
            self.ack(&q.callback_id, Some(MSG_UPDATE_FAILED)).await;
            return InteractionOutcome::Failed;
        }

        session.state = next_state;
        self.ack(&q.callback_id, None).await;
        InteractionOutcome::Updated { page: target }
    }

    /// Current page state of the card `msg`, if its session is still live.
    pub async fn page_state(&self, msg: MessageRef) -> Option<PageState> {
        let session = { self.sessions.lock().await.get(&msg).cloned() }?;
        let session = session.lock().await;
        (!session.expired).then(|| session.state.clone())
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// End the session behind `msg` and strip its controls.
    ///
    /// Returns `false` when there was nothing to expire; controls are stripped
    /// at most once per card.
    pub async fn expire(&self, msg: MessageRef) -> bool {
        let session = { self.sessions.lock().await.remove(&msg) };
        let Some(session) = session else {
            return false;
        };

        // Waits for an in-flight press to finish before the controls go away.
        session.lock().await.expired = true;

        if let Err(e) = self.messenger.clear_keyboard(msg).await {
            warn!(chat_id = msg.chat_id.0, message_id = msg.message_id.0, error = %e, "failed to strip controls");
        }
        info!(chat_id = msg.chat_id.0, message_id = msg.message_id.0, "search session expired");
        true
    }

    /// Expire every outstanding session. Called once on process teardown.
    ///
    /// Returns only after every card's controls have been stripped, including
    /// cards whose timer fired just before shutdown began.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.timers.close();
        self.timers.wait().await;

        let outstanding: Vec<MessageRef> = self.sessions.lock().await.keys().copied().collect();
        for msg in outstanding {
            self.expire(msg).await;
        }
    }

    async fn register(self: &Arc<Self>, msg: MessageRef, owner: UserId, state: PageState) {
        let session = SearchSession {
            owner,
            state,
            expired: false,
        };
        self.sessions
            .lock()
            .await
            .insert(msg, Arc::new(Mutex::new(session)));

        let this = Arc::clone(self);
        let ttl = self.cfg.session_ttl;
        let shutdown = self.shutdown.clone();
        self.timers.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(ttl) => {
                    this.expire(msg).await;
                }
                // Left to `shutdown`, which expires what remains.
                _ = shutdown.cancelled() => {}
            }
        });
    }

    async fn render(&self, script: &Script, state: &PageState) -> Card {
        let content = self.content.fetch_preview(script.content.as_ref()).await;
        render_card_with_limit(
            script,
            &content,
            state.current_page(),
            state.max_pages(),
            &self.cfg.links,
            self.cfg.description_limit,
        )
    }

    async fn notify(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.messenger.send_html(chat_id, &escape_html(text)).await {
            warn!(chat_id = chat_id.0, error = %e, "failed to send notice");
        }
    }

    async fn ack(&self, callback_id: &str, notice: Option<&str>) {
        if let Err(e) = self.messenger.answer_callback_query(callback_id, notice).await {
            debug!(error = %e, "failed to answer callback query");
        }
    }
}
