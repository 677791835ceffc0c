pub mod sources;
pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{BannerAction, CliConfig, Command, ThemeAction};

#[cfg(feature = "cli")]
mod cli {
    use crate::config::toml_config::SiteConfig;
    use crate::core::preferences::Theme;
    use crate::domain::model::FaqCategory;
    use crate::utils::error::Result;
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "xfuse")]
    #[command(about = "Content repository and lead capture for the XFUSE site")]
    pub struct CliConfig {
        /// Path to TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Language used when printing content (defaults to i18n.default_language)
        #[arg(long)]
        pub lang: Option<String>,

        /// Override storage.path from the config file
        #[arg(long)]
        pub storage_path: Option<String>,

        /// Skip the simulated repository latency
        #[arg(long)]
        pub instant: bool,

        /// Print records as JSON instead of text
        #[arg(long)]
        pub json: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Load and validate the configured content, then exit
        Validate,
        Team,
        Services,
        CaseStudies,
        Faq {
            #[arg(long)]
            category: Option<FaqCategory>,
        },
        Offer,
        Vision,
        /// Book a consultation (stores a lead)
        Book {
            #[arg(long)]
            name: String,
            #[arg(long)]
            email: String,
            #[arg(long)]
            slot: String,
        },
        /// List stored leads, optionally exporting them as CSV
        Leads {
            #[arg(long)]
            csv: Option<String>,
        },
        Banner {
            #[command(subcommand)]
            action: BannerAction,
        },
        Theme {
            #[command(subcommand)]
            action: Option<ThemeAction>,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum BannerAction {
        Status,
        Dismiss,
        Reset,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum ThemeAction {
        Show,
        Toggle,
        Set { theme: Theme },
    }

    impl CliConfig {
        /// 載入 TOML 設定並套用命令列覆蓋
        pub fn site_config(&self) -> Result<SiteConfig> {
            let mut config = match &self.config {
                Some(path) => SiteConfig::from_file(path)?,
                None => SiteConfig::default(),
            };

            if let Some(path) = &self.storage_path {
                config.storage.path = path.clone();
            }
            if self.instant {
                config.repository.read_latency_ms = 0;
                config.repository.write_latency_ms = 0;
            }
            if self.verbose {
                config.logging.verbose = true;
            }

            Ok(config)
        }

        pub fn language(&self, config: &SiteConfig) -> String {
            self.lang
                .clone()
                .unwrap_or_else(|| config.i18n.default_language.clone())
        }
    }

}
