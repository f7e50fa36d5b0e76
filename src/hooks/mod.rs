// Host hook registry
// Named extension points the host fires at fixed lifecycle moments
use std::fmt;

use crate::host::{AnswerSubmission, CardRef, HookContext, ReviewerScreen, WebContent, WebView};
use crate::router::MessageReply;

pub type ContentHandler = Box<dyn Fn(&mut WebContent, HookContext<'_>) + Send + Sync>;
pub type AnswerFilter =
    Box<dyn Fn(AnswerSubmission, &dyn ReviewerScreen, &CardRef) -> AnswerSubmission + Send + Sync>;
pub type StyleHandler = Box<dyn Fn(&dyn WebView) + Send + Sync>;
pub type MessageFilter = Box<dyn Fn(MessageReply, &str, HookContext<'_>) -> MessageReply + Send + Sync>;
pub type ShowAnswerFilter = Box<dyn Fn(bool, &dyn ReviewerScreen) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// Page content is about to be handed to a web view
    ContentWillSet,
    /// An answer button was pressed in the reviewer
    AnswerWillSubmit,
    /// Styles were injected into a freshly loaded page
    StyleInjected,
    /// A web view sent a message over the bridge
    MessageReceived,
    /// The reviewer is about to reveal the answer
    ShowAnswer,
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookPoint::ContentWillSet => "webview_will_set_content",
            HookPoint::AnswerWillSubmit => "reviewer_will_answer_card",
            HookPoint::StyleInjected => "webview_did_inject_style_into_page",
            HookPoint::MessageReceived => "webview_did_receive_js_message",
            HookPoint::ShowAnswer => "reviewer_will_show_answer",
        };
        f.write_str(name)
    }
}

/// Handlers are appended at startup and live until the bus is dropped.
/// There is no way to remove one.
#[derive(Default)]
pub struct EventBus {
    content_will_set: Vec<ContentHandler>,
    answer_will_submit: Vec<AnswerFilter>,
    style_injected: Vec<StyleHandler>,
    message_received: Vec<MessageFilter>,
    show_answer: Vec<ShowAnswerFilter>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Registration =====

    pub fn on_content_will_set<F>(&mut self, handler: F)
    where
        F: Fn(&mut WebContent, HookContext<'_>) + Send + Sync + 'static,
    {
        self.content_will_set.push(Box::new(handler));
    }

    pub fn on_answer_will_submit<F>(&mut self, filter: F)
    where
        F: Fn(AnswerSubmission, &dyn ReviewerScreen, &CardRef) -> AnswerSubmission + Send + Sync + 'static,
    {
        self.answer_will_submit.push(Box::new(filter));
    }

    pub fn on_style_injected<F>(&mut self, handler: F)
    where
        F: Fn(&dyn WebView) + Send + Sync + 'static,
    {
        self.style_injected.push(Box::new(handler));
    }

    pub fn on_message_received<F>(&mut self, filter: F)
    where
        F: Fn(MessageReply, &str, HookContext<'_>) -> MessageReply + Send + Sync + 'static,
    {
        self.message_received.push(Box::new(filter));
    }

    pub fn on_show_answer<F>(&mut self, filter: F)
    where
        F: Fn(bool, &dyn ReviewerScreen) -> bool + Send + Sync + 'static,
    {
        self.show_answer.push(Box::new(filter));
    }

    // ===== Firing (host side) =====

    pub fn content_will_set(&self, content: &mut WebContent, context: HookContext<'_>) {
        for handler in &self.content_will_set {
            handler(content, context);
        }
    }

    /// Run every answer filter in registration order
    pub fn answer_will_submit(
        &self,
        submission: AnswerSubmission,
        reviewer: &dyn ReviewerScreen,
        card: &CardRef,
    ) -> AnswerSubmission {
        self.answer_will_submit
            .iter()
            .fold(submission, |acc, filter| filter(acc, reviewer, card))
    }

    pub fn style_injected(&self, web: &dyn WebView) {
        for handler in &self.style_injected {
            handler(web);
        }
    }

    /// Thread a message through every router, starting from "not handled"
    pub fn message_received(&self, message: &str, context: HookContext<'_>) -> MessageReply {
        self.message_received
            .iter()
            .fold(MessageReply::unhandled(), |acc, filter| filter(acc, message, context))
    }

    /// Whether the reviewer may reveal the answer
    pub fn show_answer_allowed(&self, reviewer: &dyn ReviewerScreen) -> bool {
        self.show_answer
            .iter()
            .fold(true, |acc, filter| filter(acc, reviewer))
    }

    pub fn handler_count(&self, point: HookPoint) -> usize {
        match point {
            HookPoint::ContentWillSet => self.content_will_set.len(),
            HookPoint::AnswerWillSubmit => self.answer_will_submit.len(),
            HookPoint::StyleInjected => self.style_injected.len(),
            HookPoint::MessageReceived => self.message_received.len(),
            HookPoint::ShowAnswer => self.show_answer.len(),
        }
    }
}
