// Message protocol: `audiovisualFeedback#<verb>[#<arg>]`
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::gate::ShowAnswerGate;
use crate::host::HookContext;
use crate::resources::ResourceResolver;

/// Reserved message namespace
pub const NAMESPACE: &str = "audiovisualFeedback";

const HIDE_ANSWER_BUTTONS_JS: &str =
    r#"document.getElementById("innertable").style.visibility = "hidden";"#;
const SHOW_ANSWER_BUTTONS_JS: &str =
    r#"document.getElementById("innertable").style.visibility = "visible";"#;

/// Result of routing one message, threaded through every router the host has
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageReply {
    pub handled: bool,
    pub payload: Option<String>,
}

impl MessageReply {
    pub fn unhandled() -> Self {
        Self::default()
    }

    pub fn handled(payload: Option<String>) -> Self {
        Self {
            handled: true,
            payload,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    RandomFile(&'a str),
    Files(&'a str),
    DisableShowAnswer,
    EnableShowAnswer,
    Invalid(&'a str),
}

impl<'a> Command<'a> {
    fn parse(body: &'a str) -> Self {
        if let Some(path) = body.strip_prefix("randomFile#") {
            Command::RandomFile(path)
        } else if let Some(path) = body.strip_prefix("files#") {
            Command::Files(path)
        } else {
            match body {
                "disableShowAnswer" => Command::DisableShowAnswer,
                "enableShowAnswer" => Command::EnableShowAnswer,
                other => Command::Invalid(other),
            }
        }
    }
}

/// Decodes theme script messages. The show-answer gate is its only state.
pub struct MessageRouter {
    resolver: Arc<ResourceResolver>,
    gate: ShowAnswerGate,
}

impl MessageRouter {
    pub fn new(resolver: Arc<ResourceResolver>) -> Self {
        Self {
            resolver,
            gate: ShowAnswerGate::default(),
        }
    }

    /// Route `message`. Messages outside our namespace, and invalid ones,
    /// return `incoming` untouched.
    pub fn route(&self, incoming: MessageReply, message: &str, context: HookContext<'_>) -> MessageReply {
        let Some(body) = message
            .strip_prefix(NAMESPACE)
            .and_then(|rest| rest.strip_prefix('#'))
        else {
            return incoming;
        };

        match Command::parse(body) {
            Command::RandomFile(path) => {
                let url = self
                    .theme_subdir(path)
                    .and_then(|dir| self.resolver.resolve_random_url(&dir));
                MessageReply::handled(url)
            }
            Command::Files(path) => {
                let urls = self
                    .theme_subdir(path)
                    .map(|dir| self.resolver.resolve_all_urls(&dir))
                    .unwrap_or_default();
                MessageReply::handled(Some(Value::from(urls).to_string()))
            }
            Command::DisableShowAnswer => self.set_show_answer(context, false),
            Command::EnableShowAnswer => self.set_show_answer(context, true),
            Command::Invalid(body) => {
                log::warn!("[Router] Invalid message for Audiovisual Feedback: {}", body);
                incoming
            }
        }
    }

    /// Clear the gate; called whenever a new review page loads
    pub fn reset_gate(&self) {
        self.gate.release();
    }

    pub fn show_answer_allowed(&self) -> bool {
        !self.gate.is_engaged()
    }

    fn set_show_answer(&self, context: HookContext<'_>, allowed: bool) -> MessageReply {
        let Some(reviewer) = context.reviewer() else {
            log::debug!("[Router] Ignoring show-answer toggle outside the reviewer");
            return MessageReply::unhandled();
        };

        if allowed {
            self.gate.release();
            reviewer.bottom_web().eval(SHOW_ANSWER_BUTTONS_JS);
        } else {
            self.gate.engage();
            reviewer.bottom_web().eval(HIDE_ANSWER_BUTTONS_JS);
        }
        MessageReply::handled(None)
    }

    fn theme_subdir(&self, path: &str) -> Option<std::path::PathBuf> {
        let dir = self.resolver.theme_subdir(path);
        if dir.is_none() {
            log::warn!("[Router] Rejecting path outside the theme: {}", path);
        }
        dir
    }
}
