use crate::domain::model::{CaseStudy, Faq, SpecialOffer, Service, TeamMember, VisionMission};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 持久化的 key-value 儲存 (原本的瀏覽器 localStorage)
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set(&self, key: &str, value: &str)
        -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 內容文件的來源 (內嵌, 檔案, HTTP)
#[async_trait]
pub trait ContentSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self) -> Result<String>;
}

/// Repository 讀取內容所用的介面; 靜態資料或資料庫實作皆可替換
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn team(&self) -> Result<Vec<TeamMember>>;
    async fn services(&self) -> Result<Vec<Service>>;
    async fn case_studies(&self) -> Result<Vec<CaseStudy>>;
    async fn faq(&self) -> Result<Vec<Faq>>;
    async fn special_offers(&self) -> Result<Vec<SpecialOffer>>;
    async fn vision_mission(&self) -> Result<VisionMission>;
}
