// Host application surface
// Traits implemented by the embedding reviewer application

/// An embedded web view
pub trait WebView: Send + Sync {
    /// Evaluate a JS expression. Nothing is returned to the caller.
    fn eval(&self, js: &str);

    /// Path of the loaded page URL, without query or fragment
    fn page_path(&self) -> Option<String>;

    /// File name of the loaded page, e.g. `congrats.html`
    fn page_name(&self) -> Option<String> {
        let path = self.page_path()?;
        path.trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}

/// The host's add-on manager
pub trait AddonHost: Send + Sync {
    /// Let web views fetch files of `addon_id` whose add-on relative path
    /// matches the regex `pattern`
    fn set_web_exports(&self, addon_id: &str, pattern: &str);
}

/// Page content before it is handed to a web view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebContent {
    pub head: String,
    pub body: String,
    /// Stylesheet URLs appended to the page head
    pub css: Vec<String>,
    /// Script URLs appended to the page head
    pub js: Vec<String>,
}

/// The card being reviewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardRef {
    pub id: i64,
}

/// The review screen
pub trait ReviewerScreen: Send + Sync {
    /// Web view showing the card
    fn web(&self) -> &dyn WebView;

    /// Web view with the answer buttons
    fn bottom_web(&self) -> &dyn WebView;

    /// Number of answer buttons the scheduler offers for `card`
    fn answer_button_count(&self, card: &CardRef) -> u8;
}

/// Screen a hook or message came from
#[derive(Clone, Copy)]
pub enum HookContext<'a> {
    Reviewer(&'a dyn ReviewerScreen),
    Other,
}

impl<'a> HookContext<'a> {
    pub fn reviewer(&self) -> Option<&'a dyn ReviewerScreen> {
        match self {
            HookContext::Reviewer(reviewer) => Some(*reviewer),
            HookContext::Other => None,
        }
    }
}

/// Answer passed through the answer hook: whether to proceed, and the
/// pressed button number (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerSubmission {
    pub proceed: bool,
    pub ease: u8,
}

impl AnswerSubmission {
    pub fn new(ease: u8) -> Self {
        Self { proceed: true, ease }
    }
}
