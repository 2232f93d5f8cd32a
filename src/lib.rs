pub mod botmodels;
pub mod core;
pub mod drive;
pub mod gallery;
pub mod main_module;

pub use crate::core::config::AppConfig;
pub use crate::core::shared::state::AppState;
