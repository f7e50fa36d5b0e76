// Audiovisual Feedback - review feedback for flashcard reviewers
// Module declarations
pub mod audio;
pub mod config;
pub mod error;
pub mod feedback;
pub mod hooks;
pub mod host;
pub mod resources;
pub mod router;

#[cfg(feature = "tauri-host")]
pub mod tauri_host;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use audio::{MediaEngine, PlaybackCoordinator};
use config::{ConfigStore, JsonConfigStore};
use feedback::FeedbackOrchestrator;
use hooks::EventBus;
use host::AddonHost;
use resources::ResourceResolver;
use router::MessageRouter;

pub use error::FeedbackError;

/// Install the env_logger backend. `RUST_LOG` overrides the default `info`
/// filter. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Composition root: build every component for the add-on installed in
/// `addon_dir`, export its theme files through `host` and register its
/// handlers on `bus`.
///
/// `addon_id` is the name the host serves add-on files under
/// (`/_addons/<addon_id>/...`).
pub fn setup(
    addon_dir: &Path,
    addon_id: &str,
    host: &dyn AddonHost,
    engine: Arc<dyn MediaEngine>,
    bus: &mut EventBus,
) -> Result<Arc<FeedbackOrchestrator>> {
    let mut store = JsonConfigStore::in_addon_dir(addon_dir);
    store
        .load()
        .with_context(|| format!("Failed to load config from {:?}", addon_dir))?;

    let themes_dir = addon_dir.join("user_files").join("themes");
    let resolver = Arc::new(ResourceResolver::new(
        addon_id,
        themes_dir,
        config::settings::DEFAULT_THEME,
    ));
    host.set_web_exports(addon_id, resolver.web_exports_pattern());

    let playback = Arc::new(PlaybackCoordinator::new(engine));
    let router = Arc::new(MessageRouter::new(resolver.clone()));

    let orchestrator = Arc::new(FeedbackOrchestrator::new(
        Box::new(store),
        resolver,
        playback,
        router,
    ));
    orchestrator
        .initialize(bus)
        .context("Failed to register feedback hooks")?;

    log::info!(
        "[Feedback] Ready with theme '{}' ({} installed)",
        orchestrator.config().theme,
        orchestrator.resolver().available_themes().len()
    );
    Ok(orchestrator)
}
