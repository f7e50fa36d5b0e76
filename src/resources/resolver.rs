use parking_lot::RwLock;
use rand::seq::SliceRandom;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Files the OS drops into folders on its own
const IGNORED_NAMES: &[&str] = &["desktop.ini", "Thumbs.db", "ehthumbs.db", "__MACOSX"];

const IGNORED_EXTENSIONS: &[&str] = &["sys", "desktop"];

/// Pattern the host must allow for theme files to be served to the web view
pub const WEB_EXPORTS_PATTERN: &str = r"user_files/themes/.*";

/// Resolves theme-relative paths to servable URLs and lists theme assets
pub struct ResourceResolver {
    addon_id: String,
    themes_dir: PathBuf,
    theme: RwLock<String>,
}

impl ResourceResolver {
    /// `themes_dir` is the directory holding one sub-directory per theme,
    /// normally `<addon dir>/user_files/themes`
    pub fn new(addon_id: impl Into<String>, themes_dir: PathBuf, theme: impl Into<String>) -> Self {
        Self {
            addon_id: addon_id.into(),
            themes_dir,
            theme: RwLock::new(theme.into()),
        }
    }

    pub fn theme(&self) -> String {
        self.theme.read().clone()
    }

    pub fn set_theme(&self, theme: &str) {
        let mut current = self.theme.write();
        if *current != theme {
            log::info!("[Resources] Switching theme from '{}' to '{}'", current, theme);
            *current = theme.to_string();
        }
    }

    /// Pattern for the host's web export allow-list
    pub fn web_exports_pattern(&self) -> &'static str {
        WEB_EXPORTS_PATTERN
    }

    pub fn themes_dir(&self) -> &Path {
        &self.themes_dir
    }

    /// Directory of the active theme
    pub fn theme_dir(&self) -> PathBuf {
        self.themes_dir.join(&*self.theme.read())
    }

    /// Check whether a theme-relative file exists in the active theme
    pub fn theme_file_exists(&self, relative_path: &str) -> bool {
        self.theme_dir().join(relative_path).is_file()
    }

    /// URL of a file relative to the active theme directory
    pub fn resolve(&self, relative_path: &str) -> String {
        format!(
            "/_addons/{}/user_files/themes/{}/{}",
            self.addon_id,
            self.theme.read(),
            relative_path.replace('\\', "/").trim_start_matches('/'),
        )
    }

    /// All eligible files under `dir`, recursively. Symlinks are followed;
    /// link loops are skipped. A missing directory yields nothing.
    pub fn list_files(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .min_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry))
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect()
    }

    /// Uniform random pick over `list_files(dir)`
    pub fn pick_random(&self, dir: &Path) -> Option<PathBuf> {
        let files = self.list_files(dir);
        files.choose(&mut rand::thread_rng()).cloned()
    }

    pub fn resolve_random_url(&self, dir: &Path) -> Option<String> {
        let file = self.pick_random(dir)?;
        self.resolve_path(&file)
    }

    /// URLs for every eligible file under `dir`. May be empty.
    pub fn resolve_all_urls(&self, dir: &Path) -> Vec<String> {
        self.list_files(dir)
            .iter()
            .filter_map(|file| self.resolve_path(file))
            .collect()
    }

    /// Names of all installed themes, sorted
    pub fn available_themes(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.themes_dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("[Resources] Cannot read themes directory {:?}: {}", self.themes_dir, e);
                return Vec::new();
            }
        };

        let mut themes: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        themes.sort();
        themes
    }

    /// Join a web-supplied relative path onto the theme directory, refusing
    /// anything that could leave it
    pub fn theme_subdir(&self, relative_path: &str) -> Option<PathBuf> {
        let relative = Path::new(relative_path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        Some(self.theme_dir().join(relative))
    }

    fn resolve_path(&self, file: &Path) -> Option<String> {
        let theme_dir = self.theme_dir();
        match file.strip_prefix(&theme_dir) {
            Ok(relative) => {
                let parts: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect();
                Some(self.resolve(&parts.join("/")))
            }
            Err(_) => {
                log::warn!("[Resources] {:?} is outside theme directory {:?}", file, theme_dir);
                None
            }
        }
    }
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') || IGNORED_NAMES.contains(&name.as_ref()) {
        return true;
    }

    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                IGNORED_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
}
