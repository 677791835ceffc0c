use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use xfuse_content::config::{BannerAction, Command, ThemeAction};
use xfuse_content::core::export::export_leads_csv;
use xfuse_content::core::KeyValueStore;
use xfuse_content::domain::validation::validate_lead;
use xfuse_content::utils::{logger, validation::Validate};
use xfuse_content::{
    CliConfig, ContentError, FileStore, InMemoryStore, LeadPayload, OfferBanner, Repository,
    SiteConfig, StaticContentStore, ThemePreference,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.site_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(&config.logging.format, config.logging.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let lang = cli.language(&config);
    if !config.i18n.languages.contains(&lang) {
        eprintln!(
            "❌ Unsupported language '{}'. Available: {}",
            lang,
            config.i18n.languages.join(", ")
        );
        std::process::exit(1);
    }

    let result = match config.storage.backend.as_str() {
        "memory" => run(&cli, &config, &lang, InMemoryStore::new()).await,
        _ => run(&cli, &config, &lang, FileStore::new(&config.storage.path)).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ {} (fatal: {})", e, e.is_fatal());
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(if e.is_fatal() { 1 } else { 2 });
    }
}

async fn run<K>(
    cli: &CliConfig,
    config: &SiteConfig,
    lang: &str,
    storage: K,
) -> Result<(), ContentError>
where
    K: KeyValueStore + Clone,
{
    // 載入並驗證內容; 失敗時程式不啟動
    let source = config.content_source()?;
    let rules = config.content_rules();
    let content =
        StaticContentStore::load(source.as_ref(), &rules, config.content.on_unavailable).await?;

    if let Command::Validate = cli.command {
        let bundle = content.bundle();
        println!(
            "✅ Content is valid: {} team members, {} services, {} case studies, {} FAQ entries, {} offers (languages: {})",
            bundle.team.len(),
            bundle.services.len(),
            bundle.case_studies.len(),
            bundle.faq.len(),
            bundle.special_offers.len(),
            rules.languages.join(", ")
        );
        return Ok(());
    }

    let repository =
        Repository::with_options(content, storage.clone(), config.repository_options());

    match &cli.command {
        Command::Validate => {}
        Command::Team => {
            let team = repository.get_team().await?;
            if cli.json {
                return print_json(&team);
            }
            for member in &team {
                println!(
                    "[{}] {} - {}",
                    member.department_key,
                    member.name.text(lang),
                    member.role.text(lang)
                );
                println!("    {}", member.bio.text(lang));
            }
        }
        Command::Services => {
            let services = repository.get_services().await?;
            if cli.json {
                return print_json(&services);
            }
            for service in &services {
                println!("{}", service.title.text(lang));
                println!("  {}", service.description.text(lang));
                let details = service
                    .details
                    .get_or(lang, &config.i18n.default_language)
                    .cloned()
                    .unwrap_or_default();
                for detail in details {
                    println!("  • {}", detail);
                }
            }
        }
        Command::CaseStudies => {
            let case_studies = repository.get_case_studies().await?;
            if cli.json {
                return print_json(&case_studies);
            }
            for case in &case_studies {
                println!("{} ({})", case.title.text(lang), case.industry.text(lang));
                println!("  Problem:  {}", case.problem.text(lang));
                println!("  Decision: {}", case.decision.text(lang));
                println!("  Outcome:  {}", case.outcome.text(lang));
                for metric in case.metrics.iter().flatten() {
                    println!("  {:>8}  {}", metric.value, metric.label.text(lang));
                }
            }
        }
        Command::Faq { category } => {
            let faq = match category {
                Some(category) => repository.get_faq_by_category(*category).await?,
                None => repository.get_faq().await?,
            };
            if cli.json {
                return print_json(&faq);
            }
            for entry in &faq {
                println!("[{}] {}", entry.category, entry.question.text(lang));
                println!("    {}", entry.answer.text(lang));
            }
        }
        Command::Offer => {
            let Some(offer) = repository.get_special_offer().await? else {
                println!("No special offer configured");
                return Ok(());
            };
            if cli.json {
                return print_json(&offer);
            }
            println!("{}", offer.title.text(lang));
            println!("  {}", offer.description.text(lang));
            println!("  → {}", offer.cta.text(lang));
            if let Some(left) = offer.time_left(Utc::now()) {
                if left.is_zero() {
                    println!("  ⏰ Offer ended ({})", left);
                } else {
                    println!("  ⏰ Ends in {}", left);
                }
            }
        }
        Command::Vision => {
            let vision_mission = repository.get_vision_mission().await?;
            if cli.json {
                return print_json(&vision_mission);
            }
            println!("Vision:  {}", vision_mission.vision.text(lang));
            println!("Mission: {}", vision_mission.mission.text(lang));
        }
        Command::Book { name, email, slot } => {
            let lead = LeadPayload::new(name, email, slot, Utc::now().timestamp_millis());
            // 表單輸入錯誤不是啟動錯誤, 直接提示使用者
            if let Err(e) = validate_lead(&lead, &config.booking.slots) {
                eprintln!("❌ {}", e);
                eprintln!("💡 Available slots: {}", config.booking.slots.join(", "));
                std::process::exit(2);
            }

            if repository.save_lead(lead).await {
                println!("✅ Consultation booked for {}", slot);
            } else {
                return Err(ContentError::persistence(
                    xfuse_content::core::repository::LEADS_KEY,
                    "the booking could not be stored",
                ));
            }
        }
        Command::Leads { csv } => {
            let leads = repository.leads().await?;
            match csv {
                Some(path) => {
                    let file = std::fs::File::create(path)?;
                    let written = export_leads_csv(&leads, file)?;
                    tracing::info!("📁 Exported {} leads to {}", written, path);
                    println!("📁 Exported {} leads to {}", written, path);
                }
                None if cli.json => return print_json(&leads),
                None => {
                    for lead in &leads {
                        let at = lead
                            .submitted_at()
                            .map(|at| at.to_rfc3339())
                            .unwrap_or_else(|| lead.timestamp.to_string());
                        println!("{}  {}  <{}>  {}", at, lead.slot, lead.email, lead.name);
                    }
                    println!("{} lead(s)", leads.len());
                }
            }
        }
        Command::Banner { action } => {
            let banner =
                OfferBanner::with_timing(storage, config.banner_delay(), config.banner_cooldown());
            let now = Utc::now();
            match action {
                BannerAction::Status => {
                    match banner.dismissed_at().await? {
                        Some(at) => println!("Dismissed at {}", at.to_rfc3339()),
                        None => println!("Never dismissed"),
                    }
                    match banner.schedule(now).await? {
                        Some(delay) => {
                            println!("Banner shows {}s after page load", delay.as_secs())
                        }
                        None => println!(
                            "Banner suppressed for {}h after dismissal",
                            banner.cooldown().as_secs() / 3600
                        ),
                    }
                }
                BannerAction::Dismiss => {
                    banner.dismiss(now).await?;
                    println!("Banner dismissed");
                }
                BannerAction::Reset => {
                    banner.reset().await?;
                    println!("Banner dismissal cleared");
                }
            }
        }
        Command::Theme { action } => {
            let prefs = ThemePreference::new(storage);
            let theme = match action {
                None | Some(ThemeAction::Show) => prefs.current().await?,
                Some(ThemeAction::Toggle) => prefs.toggle().await?,
                Some(ThemeAction::Set { theme }) => {
                    prefs.set(*theme).await?;
                    *theme
                }
            };
            println!("{}", theme);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ContentError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
