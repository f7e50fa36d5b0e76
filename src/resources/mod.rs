// Theme resource module
// Maps theme files to URLs the web view can load

pub mod resolver;

pub use resolver::{ResourceResolver, WEB_EXPORTS_PATTERN};
