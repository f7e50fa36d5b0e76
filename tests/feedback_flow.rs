// End-to-end flow through the public API: setup, then the host firing hooks
use avfeedback::audio::{MediaEngine, MediaPlayer, MediaTag, OnPlaybackDone};
use avfeedback::hooks::{EventBus, HookPoint};
use avfeedback::host::{
    AddonHost, AnswerSubmission, CardRef, HookContext, ReviewerScreen, WebContent, WebView,
};
use avfeedback::router::MessageReply;
use parking_lot::Mutex;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const ADDON_ID: &str = "1234567";

#[derive(Default)]
struct RecordingPlayer {
    played: Mutex<Vec<MediaTag>>,
    pending: Mutex<Vec<OnPlaybackDone>>,
    stops: Mutex<usize>,
}

impl RecordingPlayer {
    fn played_names(&self) -> Vec<String> {
        self.played
            .lock()
            .iter()
            .filter_map(|tag| tag.filename.file_name().map(|n| n.to_string_lossy().to_string()))
            .collect()
    }

    fn finish_all(&self) {
        let pending: Vec<_> = self.pending.lock().drain(..).collect();
        for on_done in pending {
            on_done();
        }
    }
}

impl MediaPlayer for RecordingPlayer {
    fn play(&self, tag: &MediaTag, on_done: OnPlaybackDone) {
        self.played.lock().push(tag.clone());
        self.pending.lock().push(on_done);
    }

    fn stop(&self) {
        *self.stops.lock() += 1;
    }
}

#[derive(Default)]
struct RecordingEngine {
    player: Arc<RecordingPlayer>,
    finished: Mutex<usize>,
}

impl MediaEngine for RecordingEngine {
    fn best_player_for(&self, _tag: &MediaTag) -> Option<Arc<dyn MediaPlayer>> {
        Some(self.player.clone())
    }

    fn clear_queue(&self) {}

    fn play_finished(&self) {
        *self.finished.lock() += 1;
    }
}

#[derive(Default)]
struct RecordingHost {
    exports: Mutex<Vec<(String, String)>>,
}

impl AddonHost for RecordingHost {
    fn set_web_exports(&self, addon_id: &str, pattern: &str) {
        self.exports
            .lock()
            .push((addon_id.to_string(), pattern.to_string()));
    }
}

#[derive(Default)]
struct RecordingWeb {
    path: Option<String>,
    scripts: Mutex<Vec<String>>,
}

impl WebView for RecordingWeb {
    fn eval(&self, js: &str) {
        self.scripts.lock().push(js.to_string());
    }

    fn page_path(&self) -> Option<String> {
        self.path.clone()
    }
}

#[derive(Default)]
struct Reviewer {
    web: RecordingWeb,
    bottom: RecordingWeb,
}

impl ReviewerScreen for Reviewer {
    fn web(&self) -> &dyn WebView {
        &self.web
    }

    fn bottom_web(&self) -> &dyn WebView {
        &self.bottom
    }

    fn answer_button_count(&self, _card: &CardRef) -> u8 {
        4
    }
}

struct Addon {
    dir: TempDir,
    host: RecordingHost,
    engine: Arc<RecordingEngine>,
    bus: EventBus,
}

impl Addon {
    fn theme_file(&self, theme: &str, relative: &str) {
        let path = self
            .dir
            .path()
            .join("user_files")
            .join("themes")
            .join(theme)
            .join(relative);
        write(&path, "x");
    }
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn install(config: &str) -> Addon {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("config.json"), config);
    fs::create_dir_all(dir.path().join("user_files").join("themes").join("Cats")).unwrap();

    let host = RecordingHost::default();
    let engine = Arc::new(RecordingEngine::default());
    let mut bus = EventBus::new();
    avfeedback::setup(dir.path(), ADDON_ID, &host, engine.clone(), &mut bus).unwrap();
    Addon {
        dir,
        host,
        engine,
        bus,
    }
}

const CATS: &str = r#"{
    "theme": "Cats",
    "sound_effect": true,
    "start_effect": true,
    "review_effect": true,
    "congrats_effect": true
}"#;

#[test]
fn setup_registers_every_hook_once() {
    let addon = install(CATS);
    for point in [
        HookPoint::ContentWillSet,
        HookPoint::AnswerWillSubmit,
        HookPoint::StyleInjected,
        HookPoint::MessageReceived,
        HookPoint::ShowAnswer,
    ] {
        assert_eq!(addon.bus.handler_count(point), 1, "{}", point);
    }
}

#[test]
fn setup_exports_theme_files_to_web_views() {
    let addon = install(CATS);
    assert_eq!(
        *addon.host.exports.lock(),
        vec![(ADDON_ID.to_string(), r"user_files/themes/.*".to_string())]
    );
}

#[test]
fn review_session_plays_start_then_answer_sounds() {
    let addon = install(CATS);
    addon.theme_file("Cats", "web/reviewer.js");
    addon.theme_file("Cats", "sounds/start/meow.mp3");
    addon.theme_file("Cats", "sounds/easy/purr.mp3");
    let reviewer = Reviewer::default();

    let mut content = WebContent::default();
    addon.bus.content_will_set(&mut content, HookContext::Reviewer(&reviewer));
    assert_eq!(
        content.js,
        vec!["/_addons/1234567/user_files/themes/Cats/web/reviewer.js"]
    );
    assert!(content.css.is_empty());

    let submission = addon
        .bus
        .answer_will_submit(AnswerSubmission::new(4), &reviewer, &CardRef { id: 42 });
    assert_eq!(submission, AnswerSubmission::new(4));

    // The answer sound supersedes the start sound
    assert_eq!(addon.engine.player.played_names(), vec!["meow.mp3", "purr.mp3"]);
    assert_eq!(*addon.engine.player.stops.lock(), 1);
    assert_eq!(
        *reviewer.web.scripts.lock(),
        vec!["if (typeof showVisualFeedback === 'function') showVisualFeedback('easy')".to_string()]
    );

    // Only the live session reports completion to the host
    addon.engine.player.finish_all();
    assert_eq!(*addon.engine.finished.lock(), 1);
}

#[test]
fn disabled_review_effect_leaves_page_alone() {
    let addon = install(r#"{ "theme": "Cats", "review_effect": false }"#);
    addon.theme_file("Cats", "web/reviewer.css");
    addon.theme_file("Cats", "sounds/start/meow.mp3");
    let reviewer = Reviewer::default();

    let mut content = WebContent::default();
    addon.bus.content_will_set(&mut content, HookContext::Reviewer(&reviewer));
    addon
        .bus
        .answer_will_submit(AnswerSubmission::new(3), &reviewer, &CardRef { id: 1 });

    assert_eq!(content, WebContent::default());
    assert!(addon.engine.player.played_names().is_empty());
    assert!(reviewer.web.scripts.lock().is_empty());
}

#[test]
fn user_overrides_win_over_defaults() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("config.json"), CATS);
    write(
        &dir.path().join("user_files").join("config.json"),
        r#"{ "theme": "Dogs" }"#,
    );
    fs::create_dir_all(dir.path().join("user_files").join("themes").join("Dogs")).unwrap();

    let mut bus = EventBus::new();
    let orchestrator = avfeedback::setup(
        dir.path(),
        ADDON_ID,
        &RecordingHost::default(),
        Arc::new(RecordingEngine::default()),
        &mut bus,
    )
    .unwrap();
    assert_eq!(orchestrator.config().theme, "Dogs");
    assert!(orchestrator.config().sound_effect);
    assert_eq!(orchestrator.resolver().available_themes(), vec!["Dogs"]);
}

#[test]
fn theme_scripts_query_files_over_the_bridge() {
    let addon = install(CATS);
    addon.theme_file("Cats", "images/good/a.png");
    addon.theme_file("Cats", "images/good/Thumbs.db");

    let reply = addon
        .bus
        .message_received("audiovisualFeedback#randomFile#images/good", HookContext::Other);
    assert_eq!(
        reply,
        MessageReply::handled(Some(
            "/_addons/1234567/user_files/themes/Cats/images/good/a.png".to_string()
        ))
    );

    let reply = addon
        .bus
        .message_received("audiovisualFeedback#files#images/good", HookContext::Other);
    let urls: Vec<String> = serde_json::from_str(reply.payload.as_deref().unwrap()).unwrap();
    assert_eq!(urls.len(), 1);

    let foreign = addon.bus.message_received("someOtherAddon#ping", HookContext::Other);
    assert_eq!(foreign, MessageReply::unhandled());
}

#[test]
fn show_answer_gate_follows_theme_and_resets_on_next_card() {
    let addon = install(CATS);
    let reviewer = Reviewer::default();

    addon
        .bus
        .message_received("audiovisualFeedback#disableShowAnswer", HookContext::Reviewer(&reviewer));
    assert!(!addon.bus.show_answer_allowed(&reviewer));
    assert_eq!(reviewer.bottom.scripts.lock().len(), 1);

    addon
        .bus
        .content_will_set(&mut WebContent::default(), HookContext::Reviewer(&reviewer));
    assert!(addon.bus.show_answer_allowed(&reviewer));
}

#[test]
fn congrats_page_injects_once_guarded_assets() {
    let addon = install(CATS);
    addon.theme_file("Cats", "web/congrats.css");
    addon.theme_file("Cats", "sounds/congrats/tada.ogg");

    let congrats = RecordingWeb {
        path: Some("/_anki/congrats.html".to_string()),
        ..Default::default()
    };
    addon.bus.style_injected(&congrats);
    addon.bus.style_injected(&congrats);

    let scripts = congrats.scripts.lock();
    assert_eq!(scripts.len(), 2);
    assert!(scripts
        .iter()
        .all(|js| js.contains("if (document.getElementById(id)) { return }")));
    assert_eq!(addon.engine.player.played_names(), vec!["tada.ogg", "tada.ogg"]);

    let deck_browser = RecordingWeb {
        path: Some("/_anki/deckbrowser.html".to_string()),
        ..Default::default()
    };
    addon.bus.style_injected(&deck_browser);
    assert!(deck_browser.scripts.lock().is_empty());
}

#[test]
fn malformed_config_fails_setup() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("config.json"), "{ not json");
    let host = RecordingHost::default();
    let mut bus = EventBus::new();
    let result = avfeedback::setup(
        dir.path(),
        ADDON_ID,
        &host,
        Arc::new(RecordingEngine::default()),
        &mut bus,
    );
    assert!(result.is_err());
    assert_eq!(bus.handler_count(HookPoint::MessageReceived), 0);
    assert!(host.exports.lock().is_empty());
}
