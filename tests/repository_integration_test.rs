use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;
use xfuse_content::core::content_store::EMBEDDED_CONTENT;
use xfuse_content::core::repository::{LAST_LEAD_KEY, LEADS_KEY};
use xfuse_content::core::{ContentBundle, KeyValueStore};
use xfuse_content::domain::model::{DepartmentKey, LocalizedText};
use xfuse_content::domain::validation::ContentRules;
use xfuse_content::{
    FaqCategory, FileStore, InMemoryStore, LeadPayload, Repository, RepositoryOptions,
    StaticContentStore,
};

fn fixture() -> ContentBundle {
    serde_json::from_str(EMBEDDED_CONTENT).unwrap()
}

fn repository<K: KeyValueStore>(storage: K) -> Repository<StaticContentStore, K> {
    let content = StaticContentStore::embedded(&ContentRules::default()).unwrap();
    Repository::with_options(content, storage, RepositoryOptions::instant())
}

fn assert_complete(text: &LocalizedText) {
    for lang in ["en", "ar"] {
        let value = text.get(lang).expect("language present");
        assert!(!value.trim().is_empty());
    }
}

#[tokio::test]
async fn test_reads_return_the_complete_fixture() {
    let repo = repository(InMemoryStore::new());
    let expected = fixture();

    // 同時發出所有讀取, 各自獨立完成
    let (team, services, case_studies, faq, offer, vision_mission) = tokio::join!(
        repo.get_team(),
        repo.get_services(),
        repo.get_case_studies(),
        repo.get_faq(),
        repo.get_special_offer(),
        repo.get_vision_mission(),
    );

    assert_eq!(team.unwrap(), expected.team);
    assert_eq!(services.unwrap(), expected.services);
    assert_eq!(case_studies.unwrap(), expected.case_studies);
    assert_eq!(faq.unwrap(), expected.faq);
    assert_eq!(offer.unwrap().as_ref(), expected.special_offers.first());
    assert_eq!(vision_mission.unwrap(), expected.vision_mission);
}

#[tokio::test]
async fn test_every_bilingual_field_is_complete() {
    let repo = repository(InMemoryStore::new());

    for member in repo.get_team().await.unwrap() {
        assert_complete(&member.name);
        assert_complete(&member.role);
        assert_complete(&member.bio);
    }
    for service in repo.get_services().await.unwrap() {
        assert_complete(&service.title);
        assert_complete(&service.description);
        let en = service.details.get("en").unwrap();
        let ar = service.details.get("ar").unwrap();
        assert_eq!(en.len(), ar.len());
    }
    for case in repo.get_case_studies().await.unwrap() {
        assert_complete(&case.title);
        assert_complete(&case.outcome);
        if let Some(metrics) = &case.metrics {
            assert!(!metrics.is_empty());
            for metric in metrics {
                assert_complete(&metric.label);
                assert!(!metric.value.is_empty());
            }
        }
    }
    let vision_mission = repo.get_vision_mission().await.unwrap();
    assert_complete(&vision_mission.vision);
    assert_complete(&vision_mission.mission);
}

#[tokio::test]
async fn test_team_departments_are_from_the_fixed_set() {
    let repo = repository(InMemoryStore::new());
    let team = repo.get_team().await.unwrap();

    let departments: HashSet<DepartmentKey> = team.iter().map(|m| m.department_key).collect();
    assert!(departments.iter().all(|d| DepartmentKey::ALL.contains(d)));
    assert_eq!(departments.len(), team.len());
}

#[tokio::test]
async fn test_faq_category_filter() {
    let repo = repository(InMemoryStore::new());
    let all = repo.get_faq().await.unwrap();

    let pricing = repo.get_faq_by_category(FaqCategory::Pricing).await.unwrap();
    let expected: Vec<_> = all
        .iter()
        .filter(|f| f.category == FaqCategory::Pricing)
        .cloned()
        .collect();
    assert_eq!(pricing, expected);
    assert_eq!(pricing.len(), 2);
}

#[tokio::test]
async fn test_expired_offer_is_still_returned() {
    let repo = repository(InMemoryStore::new());
    let offer = repo.get_special_offer().await.unwrap().unwrap();

    assert_eq!(offer.valid_until.as_deref(), Some("2025-01-31"));
    let now = chrono::Utc::now();
    assert!(offer.time_left(now).unwrap().is_zero());
}

#[tokio::test]
async fn test_save_lead_round_trip_through_storage_keys() {
    let storage = InMemoryStore::new();
    let repo = repository(storage.clone());
    let lead = LeadPayload::new("Jane Doe", "jane@example.com", "14:00", 1_700_000_000_000);

    assert!(repo.save_lead(lead.clone()).await);

    let raw_list = storage.get(LEADS_KEY).await.unwrap().unwrap();
    let list: Vec<LeadPayload> = serde_json::from_str(&raw_list).unwrap();
    assert_eq!(list.last(), Some(&lead));

    let raw_last = storage.get(LAST_LEAD_KEY).await.unwrap().unwrap();
    let last: LeadPayload = serde_json::from_str(&raw_last).unwrap();
    assert_eq!(last, lead);
}

#[tokio::test]
async fn test_two_leads_keep_submission_order() {
    let repo = repository(InMemoryStore::new());
    let first = LeadPayload::new("Jane Doe", "jane@example.com", "10:00", 1_700_000_000_000);
    let second = LeadPayload::new("Omar", "omar@example.com", "16:00", 1_700_000_100_000);

    assert!(repo.save_lead(first.clone()).await);
    assert!(repo.save_lead(second.clone()).await);

    let leads = repo.leads().await.unwrap();
    assert!(leads.len() >= 2);
    assert_eq!(&leads[leads.len() - 2..], &[first, second.clone()]);
    assert_eq!(repo.last_lead().await.unwrap(), Some(second));
}

#[tokio::test]
async fn test_concurrent_saves_all_leave_a_trace() {
    let repo = Arc::new(repository(InMemoryStore::new()));

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                let lead = LeadPayload::new(
                    &format!("Lead {}", i),
                    &format!("lead{}@example.com", i),
                    "12:00",
                    1_700_000_000_000 + i,
                );
                repo.save_lead(lead).await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap());
    }

    let leads = repo.leads().await.unwrap();
    assert_eq!(leads.len(), 20);
    let timestamps: HashSet<i64> = leads.iter().map(|l| l.timestamp).collect();
    assert_eq!(timestamps.len(), 20);

    let last = repo.last_lead().await.unwrap().unwrap();
    assert!(leads.contains(&last));
}

#[tokio::test]
async fn test_leads_survive_a_restart_with_file_storage() {
    let temp_dir = TempDir::new().unwrap();
    let lead = LeadPayload::new("Jane Doe", "jane@example.com", "14:00", 1_700_000_000_000);

    {
        let repo = repository(FileStore::new(temp_dir.path()));
        assert!(repo.save_lead(lead.clone()).await);
    }

    let repo = repository(FileStore::new(temp_dir.path()));
    assert_eq!(repo.leads().await.unwrap(), vec![lead.clone()]);
    assert_eq!(repo.last_lead().await.unwrap(), Some(lead));
}

#[tokio::test]
async fn test_unwritable_storage_reports_false() {
    let temp_dir = TempDir::new().unwrap();
    // 以一般檔案佔住目錄位置, 讓寫入失敗
    let blocked = temp_dir.path().join("blocked");
    std::fs::write(&blocked, "not a directory").unwrap();

    let repo = repository(FileStore::new(&blocked));
    let lead = LeadPayload::new("Jane Doe", "jane@example.com", "14:00", 1);
    assert!(!repo.save_lead(lead).await);
}
