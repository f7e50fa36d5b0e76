// Tauri host adapter
// Exposes the feedback layer to a Tauri app: web view eval, message command,
// theme folder opener
use parking_lot::Mutex;
use std::sync::Arc;
use tauri::{AppHandle, Runtime, State, WebviewWindow};
use tauri_plugin_opener::OpenerExt;

use crate::feedback::FeedbackOrchestrator;
use crate::host::{CardRef, HookContext, ReviewerScreen, WebView};
use crate::router::MessageReply;

/// `WebView` backed by a Tauri webview window
pub struct TauriWebView<R: Runtime> {
    window: WebviewWindow<R>,
}

impl<R: Runtime> TauriWebView<R> {
    pub fn new(window: WebviewWindow<R>) -> Self {
        Self { window }
    }
}

impl<R: Runtime> WebView for TauriWebView<R> {
    fn eval(&self, js: &str) {
        if let Err(e) = self.window.eval(js) {
            log::warn!("[Tauri] Script evaluation failed in '{}': {}", self.window.label(), e);
        }
    }

    fn page_path(&self) -> Option<String> {
        self.window.url().ok().map(|url| url.path().to_string())
    }
}

type ButtonCounter = Box<dyn Fn(&CardRef) -> u8 + Send + Sync>;

/// Review screen made of a card window and an answer-bar window
pub struct TauriReviewer<R: Runtime> {
    web: TauriWebView<R>,
    bottom: TauriWebView<R>,
    button_count: ButtonCounter,
}

impl<R: Runtime> TauriReviewer<R> {
    pub fn new(
        web: WebviewWindow<R>,
        bottom: WebviewWindow<R>,
        button_count: impl Fn(&CardRef) -> u8 + Send + Sync + 'static,
    ) -> Self {
        Self {
            web: TauriWebView::new(web),
            bottom: TauriWebView::new(bottom),
            button_count: Box::new(button_count),
        }
    }
}

impl<R: Runtime> ReviewerScreen for TauriReviewer<R> {
    fn web(&self) -> &dyn WebView {
        &self.web
    }

    fn bottom_web(&self) -> &dyn WebView {
        &self.bottom
    }

    fn answer_button_count(&self, card: &CardRef) -> u8 {
        (self.button_count)(card)
    }
}

/// Managed state for the commands below
pub struct FeedbackState {
    orchestrator: Arc<FeedbackOrchestrator>,
    reviewer: Mutex<Option<Arc<dyn ReviewerScreen>>>,
}

impl FeedbackState {
    pub fn new(orchestrator: Arc<FeedbackOrchestrator>) -> Self {
        Self {
            orchestrator,
            reviewer: Mutex::new(None),
        }
    }

    /// Set while the review screen is showing, cleared when it closes
    pub fn set_reviewer(&self, reviewer: Option<Arc<dyn ReviewerScreen>>) {
        *self.reviewer.lock() = reviewer;
    }

    pub fn orchestrator(&self) -> &Arc<FeedbackOrchestrator> {
        &self.orchestrator
    }
}

#[tauri::command]
pub fn handle_feedback_message(message: String, state: State<'_, FeedbackState>) -> MessageReply {
    let reviewer = state.reviewer.lock().clone();
    let context = match reviewer.as_deref() {
        Some(reviewer) => HookContext::Reviewer(reviewer),
        None => HookContext::Other,
    };
    state
        .orchestrator
        .router()
        .route(MessageReply::unhandled(), &message, context)
}

#[tauri::command]
pub fn list_themes(state: State<'_, FeedbackState>) -> Vec<String> {
    state.orchestrator.resolver().available_themes()
}

#[tauri::command]
pub fn open_theme_folder<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, FeedbackState>,
) -> Result<(), String> {
    let theme_dir = state.orchestrator.resolver().theme_dir();
    app.opener()
        .open_path(theme_dir.to_string_lossy().to_string(), None::<&str>)
        .map_err(|e| format!("Failed to open theme folder: {}", e))
}
