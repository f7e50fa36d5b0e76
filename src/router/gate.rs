use std::sync::atomic::{AtomicBool, Ordering};

/// Suppresses the reviewer's "show answer" action while a theme animation
/// is on screen
#[derive(Debug, Default)]
pub struct ShowAnswerGate {
    engaged: AtomicBool,
}

impl ShowAnswerGate {
    pub fn engage(&self) {
        self.engaged.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.engaged.store(false, Ordering::SeqCst);
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::SeqCst)
    }
}
