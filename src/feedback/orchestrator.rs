// Feedback orchestration
// Turns reviewer lifecycle hooks into theme sounds and web view effects
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::ease::{ButtonLayoutClassifier, EaseClassifier};
use super::event::{FeedbackEvent, FeedbackKind};
use crate::audio::{MediaTag, PlayOutcome, PlaybackCoordinator};
use crate::config::{ConfigStore, ThemeConfig};
use crate::error::{FeedbackError, Result};
use crate::hooks::EventBus;
use crate::host::{AnswerSubmission, CardRef, HookContext, ReviewerScreen, WebContent, WebView};
use crate::resources::ResourceResolver;
use crate::router::{MessageReply, MessageRouter};

const CONGRATS_PAGE: &str = "congrats.html";
const CONGRATS_STYLE_ID: &str = "audiovisualFeedbackStyle";
const CONGRATS_SCRIPT_ID: &str = "audiovisualFeedbackScript";

/// Policy layer between host hooks and playback/web view effects
pub struct FeedbackOrchestrator {
    store: Mutex<Box<dyn ConfigStore>>,
    config: RwLock<ThemeConfig>,
    resolver: Arc<ResourceResolver>,
    playback: Arc<PlaybackCoordinator>,
    router: Arc<MessageRouter>,
    classifier: Box<dyn EaseClassifier>,
    initialized: AtomicBool,
}

impl FeedbackOrchestrator {
    /// The initial snapshot is read from `store` as it is; call
    /// `refresh_config` to load from disk first.
    pub fn new(
        store: Box<dyn ConfigStore>,
        resolver: Arc<ResourceResolver>,
        playback: Arc<PlaybackCoordinator>,
        router: Arc<MessageRouter>,
    ) -> Self {
        let config = ThemeConfig::from_store(&*store);
        resolver.set_theme(&config.theme);
        Self {
            store: Mutex::new(store),
            config: RwLock::new(config),
            resolver,
            playback,
            router,
            classifier: Box::new(ButtonLayoutClassifier),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn EaseClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Register every handler on the host bus. Only the first call does
    /// anything.
    pub fn initialize(self: &Arc<Self>, bus: &mut EventBus) -> Result<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(FeedbackError::AlreadyInitialized);
        }

        let this = Arc::clone(self);
        bus.on_message_received(move |incoming, message, context| {
            this.router.route(incoming, message, context)
        });

        let this = Arc::clone(self);
        bus.on_answer_will_submit(move |submission, reviewer, card| {
            this.on_answer_card(submission, reviewer, card)
        });

        let this = Arc::clone(self);
        bus.on_style_injected(move |web| this.on_style_injected(web));

        let this = Arc::clone(self);
        bus.on_content_will_set(move |content, context| this.on_content_will_set(content, context));

        let this = Arc::clone(self);
        bus.on_show_answer(move |allowed, _reviewer| allowed && this.router.show_answer_allowed());

        log::info!("[Feedback] Registered hook handlers");
        Ok(())
    }

    /// Current config snapshot
    pub fn config(&self) -> ThemeConfig {
        self.config.read().clone()
    }

    pub fn resolver(&self) -> &Arc<ResourceResolver> {
        &self.resolver
    }

    /// Coordinator shared with triggers that need protected playback
    pub fn playback(&self) -> &Arc<PlaybackCoordinator> {
        &self.playback
    }

    pub fn router(&self) -> &Arc<MessageRouter> {
        &self.router
    }

    /// Reload options from the store. On failure the previous snapshot stays.
    pub fn refresh_config(&self) {
        let mut store = self.store.lock();
        if let Err(e) = store.load() {
            log::warn!("[Feedback] Keeping previous config, reload failed: {}", e);
            return;
        }
        let config = ThemeConfig::from_store(&**store);
        self.resolver.set_theme(&config.theme);
        *self.config.write() = config;
    }

    /// Page content hook: only reviewer pages are ours
    pub fn on_content_will_set(&self, content: &mut WebContent, context: HookContext<'_>) {
        if context.reviewer().is_some() {
            self.on_reviewer_page(content);
        }
    }

    /// Style hook: fires for every page, we only care about the congrats page
    pub fn on_style_injected(&self, web: &dyn WebView) {
        if web.page_name().as_deref() == Some(CONGRATS_PAGE) {
            self.on_congrats_page(web);
        }
    }

    pub fn on_reviewer_page(&self, content: &mut WebContent) {
        self.router.reset_gate();
        self.refresh_config();

        let config = self.config();
        if !config.review_effect {
            return;
        }

        for (file, target) in [("web/reviewer.css", &mut content.css), ("web/reviewer.js", &mut content.js)] {
            if self.resolver.theme_file_exists(file) {
                target.push(self.resolver.resolve(file));
            }
        }

        if config.start_effect {
            self.dispatch(FeedbackEvent::new(FeedbackKind::ReviewStart), &config);
        }
    }

    /// Answer filter. The submission is always returned unchanged.
    pub fn on_answer_card(
        &self,
        submission: AnswerSubmission,
        reviewer: &dyn ReviewerScreen,
        card: &CardRef,
    ) -> AnswerSubmission {
        let config = self.config();
        if !config.review_effect {
            return submission;
        }

        let button_count = reviewer.answer_button_count(card);
        let ease = self.classifier.classify(submission.ease, button_count);
        log::debug!(
            "[Feedback] Card {} answered {} of {}: {}",
            card.id,
            submission.ease,
            button_count,
            ease.name()
        );

        self.dispatch(FeedbackEvent::for_card(FeedbackKind::from(ease), *card), &config);
        reviewer.web().eval(&format!(
            "if (typeof showVisualFeedback === 'function') showVisualFeedback('{}')",
            ease.name()
        ));

        submission
    }

    pub fn on_congrats_page(&self, web: &dyn WebView) {
        self.refresh_config();

        let config = self.config();
        if !config.congrats_effect {
            return;
        }

        if self.resolver.theme_file_exists("web/congrats.css") {
            web.eval(&stylesheet_injection(
                CONGRATS_STYLE_ID,
                &self.resolver.resolve("web/congrats.css"),
            ));
        }
        if self.resolver.theme_file_exists("web/congrats.js") {
            web.eval(&script_injection(
                CONGRATS_SCRIPT_ID,
                &self.resolver.resolve("web/congrats.js"),
            ));
        }

        self.dispatch(FeedbackEvent::new(FeedbackKind::Congrats), &config);
    }

    /// Play a random sound for `event` from the active theme, if sounds are on
    pub fn trigger(&self, event: FeedbackEvent) -> Option<PlayOutcome> {
        let config = self.config();
        self.dispatch(event, &config)
    }

    /// Hooks pass the snapshot they already read so one hook sees one config
    fn dispatch(&self, event: FeedbackEvent, config: &ThemeConfig) -> Option<PlayOutcome> {
        if !config.sound_effect {
            return None;
        }

        let dir = self.resolver.theme_dir().join("sounds").join(event.kind.sound_dir());
        let Some(file) = self.resolver.pick_random(&dir) else {
            log::debug!("[Feedback] No sounds in {:?}", dir);
            return None;
        };
        let outcome = self.playback.play(MediaTag::from_path(&file));
        match event.card {
            Some(card) => log::debug!("[Feedback] {:?} for card {}: {:?}", event.kind, card.id, outcome),
            None => log::debug!("[Feedback] {:?}: {:?}", event.kind, outcome),
        }
        Some(outcome)
    }
}

/// Add a stylesheet link unless an element with `id` already exists
fn stylesheet_injection(id: &str, href: &str) -> String {
    format!(
        r#"(() => {{
    const id = {id}
    if (document.getElementById(id)) {{ return }}

    const style = document.createElement("link")
    style.id = id
    style.rel = "stylesheet"
    style.type = "text/css"
    style.href = {href}
    document.head.appendChild(style)
}})()"#,
        id = js_string(id),
        href = js_string(href),
    )
}

/// Add a script tag unless an element with `id` already exists
fn script_injection(id: &str, src: &str) -> String {
    format!(
        r#"(() => {{
    const id = {id}
    if (document.getElementById(id)) {{ return }}

    const script = document.createElement("script")
    script.id = id
    script.src = {src}
    document.head.appendChild(script)
}})()"#,
        id = js_string(id),
        src = js_string(src),
    )
}

fn js_string(value: &str) -> String {
    Value::from(value).to_string()
}
