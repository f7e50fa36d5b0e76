use super::ease::Ease;
use crate::host::CardRef;

/// Kinds of moments that can get feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackKind {
    ReviewStart,
    AnswerAgain,
    AnswerHard,
    AnswerGood,
    AnswerEasy,
    Congrats,
}

impl FeedbackKind {
    /// Folder under `<theme>/sounds` holding this kind's sounds
    pub fn sound_dir(self) -> &'static str {
        match self {
            FeedbackKind::ReviewStart => "start",
            FeedbackKind::AnswerAgain => "again",
            FeedbackKind::AnswerHard => "hard",
            FeedbackKind::AnswerGood => "good",
            FeedbackKind::AnswerEasy => "easy",
            FeedbackKind::Congrats => "congrats",
        }
    }
}

impl From<Ease> for FeedbackKind {
    fn from(ease: Ease) -> Self {
        match ease {
            Ease::Again => FeedbackKind::AnswerAgain,
            Ease::Hard => FeedbackKind::AnswerHard,
            Ease::Good => FeedbackKind::AnswerGood,
            Ease::Easy => FeedbackKind::AnswerEasy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackEvent {
    pub kind: FeedbackKind,
    pub card: Option<CardRef>,
}

impl FeedbackEvent {
    pub fn new(kind: FeedbackKind) -> Self {
        Self { kind, card: None }
    }

    pub fn for_card(kind: FeedbackKind, card: CardRef) -> Self {
        Self {
            kind,
            card: Some(card),
        }
    }
}
