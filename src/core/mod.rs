pub mod banner;
pub mod content_store;
pub mod countdown;
pub mod export;
pub mod preferences;
pub mod repository;

pub use crate::domain::model::{
    CaseStudy, ContentBundle, Faq, LeadPayload, Service, SpecialOffer, TeamMember, VisionMission,
};
pub use crate::domain::ports::{ContentSource, ContentStore, KeyValueStore};
pub use crate::utils::error::Result;
