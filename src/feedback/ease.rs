// Review outcome classification
use serde::{Deserialize, Serialize};

/// The user's recall grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ease {
    Again,
    Hard,
    Good,
    Easy,
}

impl Ease {
    /// Name used for sound folders and the `showVisualFeedback` argument
    pub fn name(self) -> &'static str {
        match self {
            Ease::Again => "again",
            Ease::Hard => "hard",
            Ease::Good => "good",
            Ease::Easy => "easy",
        }
    }

    /// Classify a pressed answer button.
    ///
    /// Layouts: 2 buttons = Again/Good, 3 = Again/Good/Easy,
    /// 4 = Again/Hard/Good/Easy. Buttons at or past the last one map to the
    /// top grade of the layout; anything else unknown is Good.
    pub fn from_button(ease: u8, button_count: u8) -> Self {
        match (button_count, ease) {
            (_, e) if e <= 1 => Ease::Again,
            (2, _) => Ease::Good,
            (3, 2) => Ease::Good,
            (4, 2) => Ease::Hard,
            (4, 3) => Ease::Good,
            (n, e) if e >= n => Ease::Easy,
            _ => Ease::Good,
        }
    }
}

/// Maps `(pressed button, button count)` to a grade
pub trait EaseClassifier: Send + Sync {
    fn classify(&self, ease: u8, button_count: u8) -> Ease;
}

/// The scheduler's standard button layouts
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonLayoutClassifier;

impl EaseClassifier for ButtonLayoutClassifier {
    fn classify(&self, ease: u8, button_count: u8) -> Ease {
        Ease::from_button(ease, button_count)
    }
}
