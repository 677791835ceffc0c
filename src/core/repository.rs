use crate::core::{
    CaseStudy, ContentStore, Faq, KeyValueStore, LeadPayload, Result, Service, SpecialOffer,
    TeamMember, VisionMission,
};
use crate::domain::model::FaqCategory;
use crate::utils::error::ContentError;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;

pub const LEADS_KEY: &str = "xfuse_leads";
pub const LAST_LEAD_KEY: &str = "xfuse_last_lead";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// 模擬的讀取延遲
    pub read_latency: Duration,
    /// 模擬的寫入延遲
    pub write_latency: Duration,
    /// 每個操作的上限時間 (含延遲)
    pub timeout: Duration,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            read_latency: Duration::from_millis(500),
            write_latency: Duration::from_millis(800),
            timeout: Duration::from_secs(5),
        }
    }
}

impl RepositoryOptions {
    pub fn instant() -> Self {
        Self {
            read_latency: Duration::ZERO,
            write_latency: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// 所有內容讀取與預約寫入的唯一入口
///
/// Reads are side-effect free and may be abandoned at any point. Lead writes
/// append to the durable list under `LEADS_KEY` and overwrite `LAST_LEAD_KEY`;
/// the read-modify-write of the list is serialised so concurrent submissions
/// all leave a trace.
pub struct Repository<C: ContentStore, K: KeyValueStore> {
    content: C,
    storage: K,
    options: RepositoryOptions,
    lead_lock: Mutex<()>,
}

impl<C: ContentStore, K: KeyValueStore> Repository<C, K> {
    pub fn new(content: C, storage: K) -> Self {
        Self::with_options(content, storage, RepositoryOptions::default())
    }

    pub fn with_options(content: C, storage: K, options: RepositoryOptions) -> Self {
        Self {
            content,
            storage,
            options,
            lead_lock: Mutex::new(()),
        }
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    pub fn storage(&self) -> &K {
        &self.storage
    }

    async fn bounded<T, F>(&self, operation: &str, latency: Duration, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let delayed = async {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            work.await
        };

        match tokio::time::timeout(self.options.timeout, delayed).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "⏱️ {} timed out after {} ms",
                    operation,
                    self.options.timeout.as_millis()
                );
                Err(ContentError::TimedOut {
                    operation: operation.to_string(),
                    after_ms: self.options.timeout.as_millis() as u64,
                })
            }
        }
    }

    async fn read<T, F>(&self, operation: &str, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tracing::debug!("Repository read: {}", operation);
        self.bounded(operation, self.options.read_latency, work).await
    }

    pub async fn get_team(&self) -> Result<Vec<TeamMember>> {
        self.read("get_team", self.content.team()).await
    }

    pub async fn get_services(&self) -> Result<Vec<Service>> {
        self.read("get_services", self.content.services()).await
    }

    pub async fn get_case_studies(&self) -> Result<Vec<CaseStudy>> {
        self.read("get_case_studies", self.content.case_studies()).await
    }

    pub async fn get_faq(&self) -> Result<Vec<Faq>> {
        self.read("get_faq", self.content.faq()).await
    }

    pub async fn get_faq_by_category(&self, category: FaqCategory) -> Result<Vec<Faq>> {
        let faq = self.get_faq().await?;
        Ok(faq.into_iter().filter(|f| f.category == category).collect())
    }

    /// 第一個設定的優惠; 過期的優惠仍會回傳 (倒數由顯示端處理)
    pub async fn get_special_offer(&self) -> Result<Option<SpecialOffer>> {
        let offers = self.read("get_special_offer", self.content.special_offers()).await?;
        Ok(offers.into_iter().next())
    }

    pub async fn get_special_offers(&self) -> Result<Vec<SpecialOffer>> {
        self.read("get_special_offers", self.content.special_offers())
            .await
    }

    pub async fn get_vision_mission(&self) -> Result<VisionMission> {
        self.read("get_vision_mission", self.content.vision_mission())
            .await
    }

    /// 寫入一筆預約; 失敗時回傳 false, 不自動重試
    pub async fn save_lead(&self, payload: LeadPayload) -> bool {
        match self.try_save_lead(&payload).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("❌ Failed to save lead for slot {}: {}", payload.slot, e);
                false
            }
        }
    }

    pub async fn try_save_lead(&self, payload: &LeadPayload) -> Result<()> {
        tracing::info!(
            "📝 Saving lead (slot: {}, timestamp: {})",
            payload.slot,
            payload.timestamp
        );
        tracing::debug!("Lead contact: {} <{}>", payload.name, payload.email);

        // 只有模擬延遲受逾時限制; 寫入一旦開始就要完成或還原
        self.bounded("save_lead", self.options.write_latency, async { Ok(()) })
            .await?;

        let _guard = self.lead_lock.lock().await;

        let previous = self.storage.get(LEADS_KEY).await?;
        let mut leads = match previous.as_deref() {
            None => Vec::new(),
            Some(raw) => parse_leads(raw)?,
        };
        leads.push(payload.clone());

        let list_json = serde_json::to_string(&leads)?;
        let last_json = serde_json::to_string(payload)?;
        self.storage.set(LEADS_KEY, &list_json).await?;

        if let Err(e) = self.storage.set(LAST_LEAD_KEY, &last_json).await {
            tracing::warn!("↩️ Rolling back {} after failed {} write", LEADS_KEY, LAST_LEAD_KEY);
            let restored = match previous.as_deref() {
                Some(raw) => self.storage.set(LEADS_KEY, raw).await,
                None => self.storage.remove(LEADS_KEY).await,
            };
            if let Err(rollback) = restored {
                tracing::error!("❌ Could not restore {}: {}", LEADS_KEY, rollback);
            }
            return Err(e);
        }

        tracing::debug!("Stored lead #{}", leads.len());
        Ok(())
    }

    /// 所有已儲存的預約, 依送出順序
    pub async fn leads(&self) -> Result<Vec<LeadPayload>> {
        match self.storage.get(LEADS_KEY).await? {
            None => Ok(Vec::new()),
            Some(raw) => parse_leads(&raw),
        }
    }

    pub async fn last_lead(&self) -> Result<Option<LeadPayload>> {
        match self.storage.get(LAST_LEAD_KEY).await? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                ContentError::persistence(LAST_LEAD_KEY, format!("stored lead is corrupt: {}", e))
            }),
        }
    }
}

fn parse_leads(raw: &str) -> Result<Vec<LeadPayload>> {
    serde_json::from_str(raw).map_err(|e| {
        ContentError::persistence(LEADS_KEY, format!("stored lead list is corrupt: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::storage::InMemoryStore;
    use crate::core::content_store::StaticContentStore;
    use crate::domain::validation::ContentRules;
    use async_trait::async_trait;

    fn repository() -> Repository<StaticContentStore, InMemoryStore> {
        let content = StaticContentStore::embedded(&ContentRules::default()).unwrap();
        Repository::with_options(content, InMemoryStore::new(), RepositoryOptions::instant())
    }

    struct SlowStore;

    #[async_trait]
    impl ContentStore for SlowStore {
        async fn team(&self) -> Result<Vec<TeamMember>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
        async fn services(&self) -> Result<Vec<Service>> {
            Ok(Vec::new())
        }
        async fn case_studies(&self) -> Result<Vec<CaseStudy>> {
            Ok(Vec::new())
        }
        async fn faq(&self) -> Result<Vec<Faq>> {
            Ok(Vec::new())
        }
        async fn special_offers(&self) -> Result<Vec<SpecialOffer>> {
            Ok(Vec::new())
        }
        async fn vision_mission(&self) -> Result<VisionMission> {
            Err(ContentError::unavailable("slow", "not implemented"))
        }
    }

    #[tokio::test]
    async fn test_save_lead_round_trip() {
        let repo = repository();
        let lead = LeadPayload::new("Jane Doe", "jane@example.com", "14:00", 1_700_000_000_000);

        assert!(repo.save_lead(lead.clone()).await);

        let leads = repo.leads().await.unwrap();
        assert_eq!(leads.last(), Some(&lead));
        assert_eq!(repo.last_lead().await.unwrap(), Some(lead));
    }

    #[tokio::test]
    async fn test_duplicate_leads_are_kept() {
        let repo = repository();
        let lead = LeadPayload::new("Jane Doe", "jane@example.com", "10:00", 1);

        assert!(repo.save_lead(lead.clone()).await);
        assert!(repo.save_lead(lead.clone()).await);

        assert_eq!(repo.leads().await.unwrap(), vec![lead.clone(), lead]);
    }

    #[tokio::test]
    async fn test_corrupt_lead_list_reports_failure() {
        let repo = repository();
        repo.storage().set(LEADS_KEY, "not json").await.unwrap();

        let lead = LeadPayload::new("Jane Doe", "jane@example.com", "10:00", 1);
        assert!(!repo.save_lead(lead).await);
        // 原本的資料不會被覆蓋
        assert_eq!(
            repo.storage().get(LEADS_KEY).await.unwrap().as_deref(),
            Some("not json")
        );
        assert_eq!(repo.last_lead().await.unwrap(), None);
    }

    /// 寫入 `LAST_LEAD_KEY` 一律失敗的儲存
    #[derive(Clone, Default)]
    struct RejectLastLead {
        inner: InMemoryStore,
    }

    impl KeyValueStore for RejectLastLead {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            if key == LAST_LEAD_KEY {
                return Err(ContentError::persistence(key, "disk full"));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key).await
        }
    }

    fn rejecting_repository(
        storage: RejectLastLead,
    ) -> Repository<StaticContentStore, RejectLastLead> {
        let content = StaticContentStore::embedded(&ContentRules::default()).unwrap();
        Repository::with_options(content, storage, RepositoryOptions::instant())
    }

    #[tokio::test]
    async fn test_failed_last_lead_write_leaves_no_lead_behind() {
        let storage = RejectLastLead::default();
        let repo = rejecting_repository(storage.clone());
        let lead = LeadPayload::new("Jane Doe", "jane@example.com", "14:00", 1);

        assert!(!repo.save_lead(lead.clone()).await);
        assert_eq!(storage.get(LEADS_KEY).await.unwrap(), None);
        assert_eq!(repo.last_lead().await.unwrap(), None);

        // 重試不會產生重複的預約
        assert!(!repo.save_lead(lead).await);
        assert!(repo.leads().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_last_lead_write_restores_previous_list() {
        let storage = RejectLastLead::default();
        let earlier = LeadPayload::new("Omar", "omar@example.com", "10:00", 1);
        let before = serde_json::to_string(&vec![earlier.clone()]).unwrap();
        storage.set(LEADS_KEY, &before).await.unwrap();

        let repo = rejecting_repository(storage.clone());
        let lead = LeadPayload::new("Jane Doe", "jane@example.com", "14:00", 2);
        assert!(!repo.save_lead(lead).await);

        assert_eq!(storage.get(LEADS_KEY).await.unwrap().as_deref(), Some(before.as_str()));
        assert_eq!(repo.leads().await.unwrap(), vec![earlier]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_latency_over_timeout_stores_nothing() {
        let content = StaticContentStore::embedded(&ContentRules::default()).unwrap();
        let options = RepositoryOptions {
            read_latency: Duration::ZERO,
            write_latency: Duration::from_millis(800),
            timeout: Duration::from_millis(100),
        };
        let repo = Repository::with_options(content, InMemoryStore::new(), options);
        let lead = LeadPayload::new("Jane Doe", "jane@example.com", "14:00", 1);

        let err = repo.try_save_lead(&lead).await.unwrap_err();
        assert!(matches!(err, ContentError::TimedOut { ref operation, .. } if operation == "save_lead"));
        assert!(repo.leads().await.unwrap().is_empty());
        assert_eq!(repo.last_lead().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_faq_filter_returns_only_that_category() {
        let repo = repository();
        for category in FaqCategory::ALL {
            let faq = repo.get_faq_by_category(category).await.unwrap();
            assert!(!faq.is_empty());
            assert!(faq.iter().all(|f| f.category == category));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_read_times_out() {
        let options = RepositoryOptions {
            read_latency: Duration::ZERO,
            write_latency: Duration::ZERO,
            timeout: Duration::from_millis(100),
        };
        let repo = Repository::with_options(SlowStore, InMemoryStore::new(), options);

        let err = repo.get_team().await.unwrap_err();
        assert!(matches!(err, ContentError::TimedOut { ref operation, after_ms: 100 } if operation == "get_team"));
        assert!(repo.get_services().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_wait_for_configured_latency() {
        let content = StaticContentStore::embedded(&ContentRules::default()).unwrap();
        let repo = Repository::new(content, InMemoryStore::new());

        let started = tokio::time::Instant::now();
        let team = repo.get_team().await.unwrap();
        assert_eq!(team.len(), 5);
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}
