pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::storage::{FileStore, InMemoryStore};
pub use config::toml_config::SiteConfig;
pub use core::{
    banner::OfferBanner,
    content_store::StaticContentStore,
    countdown::TimeLeft,
    preferences::{Theme, ThemePreference},
    repository::{Repository, RepositoryOptions},
};
pub use domain::model::{FaqCategory, LeadPayload, Localized, LocalizedText};
pub use utils::error::{ContentError, Result};
