use crate::core::{
    CaseStudy, ContentBundle, ContentSource, ContentStore, Faq, Result, Service, SpecialOffer,
    TeamMember, VisionMission,
};
use crate::domain::validation::{ContentRules, ValidateContent};
use crate::utils::error::ContentError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 隨程式一起編譯的參考內容
pub const EMBEDDED_CONTENT: &str = include_str!("../../content/xfuse.json");

/// 內容來源無法讀取時的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnavailablePolicy {
    /// 直接回報錯誤, 程式不啟動
    #[default]
    Fail,
    /// 改用內嵌的參考內容
    Embedded,
}

/// 固定的記憶體內容; 建立時已通過驗證, 之後不再變動
#[derive(Debug, Clone)]
pub struct StaticContentStore {
    bundle: Arc<ContentBundle>,
}

impl StaticContentStore {
    pub fn from_bundle(bundle: ContentBundle, rules: &ContentRules) -> Result<Self> {
        bundle.validate_content(rules)?;
        Ok(Self {
            bundle: Arc::new(bundle),
        })
    }

    pub fn from_json(source_name: &str, document: &str, rules: &ContentRules) -> Result<Self> {
        let bundle: ContentBundle = serde_json::from_str(document).map_err(|e| {
            ContentError::validation(
                "content document",
                source_name,
                &format!("line {} column {}", e.line(), e.column()),
                e.to_string(),
            )
        })?;
        Self::from_bundle(bundle, rules)
    }

    pub fn embedded(rules: &ContentRules) -> Result<Self> {
        Self::from_json("embedded", EMBEDDED_CONTENT, rules)
    }

    /// 從來源載入並驗證內容
    ///
    /// Only an unreadable source triggers the fallback; a document that was read
    /// but fails to parse or validate is always reported.
    pub async fn load<S: ContentSource + ?Sized>(
        source: &S,
        rules: &ContentRules,
        policy: UnavailablePolicy,
    ) -> Result<Self> {
        tracing::debug!("Loading content from {}", source.name());

        let document = match source.fetch().await {
            Ok(document) => document,
            Err(e) => {
                let err = match e {
                    ContentError::ContentUnavailable { .. } => e,
                    other => ContentError::unavailable(source.name(), other.to_string()),
                };
                match policy {
                    UnavailablePolicy::Fail => return Err(err),
                    UnavailablePolicy::Embedded => {
                        tracing::warn!("⚠️ {}; falling back to embedded content", err);
                        return Self::embedded(rules);
                    }
                }
            }
        };

        let store = Self::from_json(source.name(), &document, rules)?;
        tracing::info!(
            "✅ Loaded content from {}: {} team members, {} services, {} case studies, {} FAQ entries, {} offers",
            source.name(),
            store.bundle.team.len(),
            store.bundle.services.len(),
            store.bundle.case_studies.len(),
            store.bundle.faq.len(),
            store.bundle.special_offers.len()
        );
        Ok(store)
    }

    pub fn bundle(&self) -> &ContentBundle {
        &self.bundle
    }
}

#[async_trait]
impl ContentStore for StaticContentStore {
    async fn team(&self) -> Result<Vec<TeamMember>> {
        Ok(self.bundle.team.clone())
    }

    async fn services(&self) -> Result<Vec<Service>> {
        Ok(self.bundle.services.clone())
    }

    async fn case_studies(&self) -> Result<Vec<CaseStudy>> {
        Ok(self.bundle.case_studies.clone())
    }

    async fn faq(&self) -> Result<Vec<Faq>> {
        Ok(self.bundle.faq.clone())
    }

    async fn special_offers(&self) -> Result<Vec<SpecialOffer>> {
        Ok(self.bundle.special_offers.clone())
    }

    async fn vision_mission(&self) -> Result<VisionMission> {
        Ok(self.bundle.vision_mission.clone())
    }
}
