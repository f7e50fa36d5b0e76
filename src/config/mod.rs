// Configuration module
// Typed theme options on top of a key-value config store

pub mod settings;
pub mod store;

pub use settings::ThemeConfig;
pub use store::{ConfigStore, JsonConfigStore};
