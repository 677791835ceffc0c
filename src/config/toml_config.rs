use crate::config::sources::{EmbeddedSource, FileSource, HttpSource};
use crate::core::banner::{DEFAULT_BANNER_DELAY, DEFAULT_DISMISS_COOLDOWN};
use crate::core::content_store::UnavailablePolicy;
use crate::core::repository::RepositoryOptions;
use crate::core::ContentSource;
use crate::domain::validation::ContentRules;
use crate::utils::error::{ContentError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_positive_number,
    validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 橫幅冷卻時間上限 (一年)
pub const MAX_COOLDOWN_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub content: ContentConfig,
    pub repository: RepositoryConfig,
    pub storage: StorageConfig,
    pub banner: BannerConfig,
    pub i18n: I18nConfig,
    pub booking: BookingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub name: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: "XFUSE".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Embedded,
    File,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub source: SourceKind,
    pub path: Option<String>,
    pub url: Option<String>,
    pub timeout_seconds: u64,
    pub on_unavailable: UnavailablePolicy,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Embedded,
            path: None,
            url: None,
            timeout_seconds: 10,
            on_unavailable: UnavailablePolicy::Fail,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub read_latency_ms: u64,
    pub write_latency_ms: u64,
    pub timeout_ms: u64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        let defaults = RepositoryOptions::default();
        Self {
            read_latency_ms: defaults.read_latency.as_millis() as u64,
            write_latency_ms: defaults.write_latency.as_millis() as u64,
            timeout_ms: defaults.timeout.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: String,
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            path: "./.xfuse".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerConfig {
    pub delay_seconds: u64,
    pub cooldown_hours: u64,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            delay_seconds: DEFAULT_BANNER_DELAY.as_secs(),
            cooldown_hours: DEFAULT_DISMISS_COOLDOWN.as_secs() / 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    pub languages: Vec<String>,
    pub default_language: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string(), "ar".to_string()],
            default_language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub slots: Vec<String>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slots: ["10:00", "12:00", "14:00", "16:00"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: String,
    pub verbose: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "compact".to_string(),
            verbose: false,
        }
    }
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ContentError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ContentError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${XFUSE_CONTENT_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ContentError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("site.name", &self.site.name)?;

        match self.content.source {
            SourceKind::Embedded => {}
            SourceKind::File => {
                let path = validate_required_field("content.path", &self.content.path)?;
                validate_path("content.path", path)?;
            }
            SourceKind::Http => {
                let url = validate_required_field("content.url", &self.content.url)?;
                validate_url("content.url", url)?;
                validate_positive_number("content.timeout_seconds", self.content.timeout_seconds, 1)?;
            }
        }

        validate_positive_number("repository.timeout_ms", self.repository.timeout_ms, 1)?;
        let latency = self
            .repository
            .read_latency_ms
            .max(self.repository.write_latency_ms);
        if self.repository.timeout_ms <= latency {
            return Err(ContentError::InvalidConfigValueError {
                field: "repository.timeout_ms".to_string(),
                value: self.repository.timeout_ms.to_string(),
                reason: format!("Must be greater than the largest latency ({} ms)", latency),
            });
        }

        validate_one_of("storage.backend", &self.storage.backend, &["file", "memory"])?;
        if self.storage.backend == "file" {
            validate_path("storage.path", &self.storage.path)?;
        }

        validate_positive_number("banner.cooldown_hours", self.banner.cooldown_hours, 1)?;
        if self.banner.cooldown_hours > MAX_COOLDOWN_HOURS {
            return Err(ContentError::InvalidConfigValueError {
                field: "banner.cooldown_hours".to_string(),
                value: self.banner.cooldown_hours.to_string(),
                reason: format!("Value must be at most {}", MAX_COOLDOWN_HOURS),
            });
        }

        if self.i18n.languages.is_empty() {
            return Err(ContentError::InvalidConfigValueError {
                field: "i18n.languages".to_string(),
                value: "[]".to_string(),
                reason: "At least one language is required".to_string(),
            });
        }
        for lang in &self.i18n.languages {
            validate_non_empty_string("i18n.languages", lang)?;
        }
        if !self.i18n.languages.contains(&self.i18n.default_language) {
            return Err(ContentError::InvalidConfigValueError {
                field: "i18n.default_language".to_string(),
                value: self.i18n.default_language.clone(),
                reason: format!("Must be one of: {}", self.i18n.languages.join(", ")),
            });
        }

        for slot in &self.booking.slots {
            validate_non_empty_string("booking.slots", slot)?;
        }

        validate_one_of("logging.format", &self.logging.format, &["compact", "json"])?;

        Ok(())
    }

    pub fn repository_options(&self) -> RepositoryOptions {
        RepositoryOptions {
            read_latency: Duration::from_millis(self.repository.read_latency_ms),
            write_latency: Duration::from_millis(self.repository.write_latency_ms),
            timeout: Duration::from_millis(self.repository.timeout_ms),
        }
    }

    pub fn content_rules(&self) -> ContentRules {
        ContentRules::new(self.i18n.languages.clone())
    }

    pub fn banner_delay(&self) -> Duration {
        Duration::from_secs(self.banner.delay_seconds)
    }

    pub fn banner_cooldown(&self) -> Duration {
        Duration::from_secs(self.banner.cooldown_hours.saturating_mul(3600))
    }

    /// 依設定建立內容來源
    pub fn content_source(&self) -> Result<Box<dyn ContentSource>> {
        Ok(match self.content.source {
            SourceKind::Embedded => Box::new(EmbeddedSource),
            SourceKind::File => {
                let path = validate_required_field("content.path", &self.content.path)?;
                Box::new(FileSource::new(path))
            }
            SourceKind::Http => {
                let url = validate_required_field("content.url", &self.content.url)?;
                Box::new(HttpSource::new(
                    url,
                    Duration::from_secs(self.content.timeout_seconds),
                ))
            }
        })
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
