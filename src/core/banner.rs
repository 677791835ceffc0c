use crate::core::{KeyValueStore, Result};
use chrono::{DateTime, Utc};
use std::time::Duration;

pub const OFFER_DISMISSED_KEY: &str = "xfuse_offer_dismissed";

pub const DEFAULT_BANNER_DELAY: Duration = Duration::from_secs(30);
pub const DEFAULT_DISMISS_COOLDOWN: Duration = Duration::from_secs(24 * 60 * 60);

/// 優惠橫幅: 關閉後在冷卻期間內不再顯示
pub struct OfferBanner<K: KeyValueStore> {
    storage: K,
    delay: Duration,
    cooldown: Duration,
}

impl<K: KeyValueStore> OfferBanner<K> {
    pub fn new(storage: K) -> Self {
        Self::with_timing(storage, DEFAULT_BANNER_DELAY, DEFAULT_DISMISS_COOLDOWN)
    }

    pub fn with_timing(storage: K, delay: Duration, cooldown: Duration) -> Self {
        Self {
            storage,
            delay,
            cooldown,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub async fn dismiss(&self, now: DateTime<Utc>) -> Result<()> {
        tracing::info!("🙈 Offer banner dismissed at {}", now.to_rfc3339());
        self.storage
            .set(OFFER_DISMISSED_KEY, &now.timestamp_millis().to_string())
            .await
    }

    /// 無法解析的值視為從未關閉
    pub async fn dismissed_at(&self) -> Result<Option<DateTime<Utc>>> {
        let raw = self.storage.get(OFFER_DISMISSED_KEY).await?;
        Ok(raw.and_then(|value| {
            let parsed = value
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(DateTime::from_timestamp_millis);
            if parsed.is_none() {
                tracing::warn!("Ignoring unreadable banner dismissal timestamp '{}'", value);
            }
            parsed
        }))
    }

    pub async fn is_eligible(&self, now: DateTime<Utc>) -> Result<bool> {
        let Some(dismissed) = self.dismissed_at().await? else {
            return Ok(true);
        };

        let elapsed = now.signed_duration_since(dismissed);
        let cooldown = chrono::Duration::from_std(self.cooldown).unwrap_or(chrono::Duration::MAX);
        Ok(elapsed >= cooldown)
    }

    /// 可以顯示時, 回傳距離顯示前的等待時間
    pub async fn schedule(&self, now: DateTime<Utc>) -> Result<Option<Duration>> {
        if self.is_eligible(now).await? {
            Ok(Some(self.delay))
        } else {
            Ok(None)
        }
    }

    pub async fn reset(&self) -> Result<()> {
        self.storage.remove(OFFER_DISMISSED_KEY).await
    }
}
