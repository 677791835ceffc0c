use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 依語言標籤 (例如 "en", "ar") 存放同一內容的多語版本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localized<T>(BTreeMap<String, T>);

pub type LocalizedText = Localized<String>;

impl<T> Default for Localized<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> Localized<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, lang: &str, value: T) -> Self {
        self.0.insert(lang.to_string(), value);
        self
    }

    pub fn insert(&mut self, lang: &str, value: T) -> Option<T> {
        self.0.insert(lang.to_string(), value)
    }

    pub fn get(&self, lang: &str) -> Option<&T> {
        self.0.get(lang)
    }

    /// 找不到指定語言時改用 fallback 語言
    pub fn get_or(&self, lang: &str, fallback: &str) -> Option<&T> {
        self.0.get(lang).or_else(|| self.0.get(fallback))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(lang, value)| (lang.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl LocalizedText {
    pub fn en_ar(en: &str, ar: &str) -> Self {
        Self::new().with("en", en.to_string()).with("ar", ar.to_string())
    }

    pub fn text<'a>(&'a self, lang: &str) -> &'a str {
        self.get_or(lang, "en").map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepartmentKey {
    Pr,
    Media,
    Content,
    Research,
    Moderator,
}

impl DepartmentKey {
    pub const ALL: [DepartmentKey; 5] = [
        DepartmentKey::Pr,
        DepartmentKey::Media,
        DepartmentKey::Content,
        DepartmentKey::Research,
        DepartmentKey::Moderator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DepartmentKey::Pr => "pr",
            DepartmentKey::Media => "media",
            DepartmentKey::Content => "content",
            DepartmentKey::Research => "research",
            DepartmentKey::Moderator => "moderator",
        }
    }
}

impl fmt::Display for DepartmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepartmentKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown department '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaqCategory {
    Services,
    Process,
    Pricing,
    Technical,
    General,
}

impl FaqCategory {
    pub const ALL: [FaqCategory; 5] = [
        FaqCategory::Services,
        FaqCategory::Process,
        FaqCategory::Pricing,
        FaqCategory::Technical,
        FaqCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FaqCategory::Services => "services",
            FaqCategory::Process => "process",
            FaqCategory::Pricing => "pricing",
            FaqCategory::Technical => "technical",
            FaqCategory::General => "general",
        }
    }
}

impl fmt::Display for FaqCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaqCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown FAQ category '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub department_key: DepartmentKey,
    pub name: LocalizedText,
    pub role: LocalizedText,
    pub bio: LocalizedText,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub details: Localized<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub label: LocalizedText,
    /// 已格式化的顯示字串, 例如 "+340%"
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub id: String,
    pub title: LocalizedText,
    pub industry: LocalizedText,
    pub problem: LocalizedText,
    pub decision: LocalizedText,
    pub outcome: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<Metric>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub id: String,
    pub category: FaqCategory,
    pub question: LocalizedText,
    pub answer: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialOffer {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub cta: LocalizedText,
    /// ISO-8601 日期 ("2025-01-31") 或 RFC 3339 時間
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
}

impl SpecialOffer {
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.valid_until.as_deref().and_then(parse_deadline)
    }
}

/// 只有日期時視為當天 UTC 午夜
pub fn parse_deadline(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionMission {
    pub vision: LocalizedText,
    pub mission: LocalizedText,
}

/// 一次預約表單送出的資料; timestamp 由呼叫端在送出時指定 (epoch 毫秒)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadPayload {
    pub name: String,
    pub email: String,
    pub slot: String,
    pub timestamp: i64,
}

impl LeadPayload {
    pub fn new(name: &str, email: &str, slot: &str, timestamp: i64) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            slot: slot.to_string(),
            timestamp,
        }
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// 整份靜態內容; 對應內容文件的頂層結構
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawContentBundle")]
pub struct ContentBundle {
    pub team: Vec<TeamMember>,
    pub services: Vec<Service>,
    pub case_studies: Vec<CaseStudy>,
    pub faq: Vec<Faq>,
    pub special_offers: Vec<SpecialOffer>,
    pub vision_mission: VisionMission,
}

/// 同時接受單一 `specialOffer` 物件與 `specialOffers` 陣列
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContentBundle {
    team: Vec<TeamMember>,
    services: Vec<Service>,
    case_studies: Vec<CaseStudy>,
    faq: Vec<Faq>,
    #[serde(default)]
    special_offer: Option<SpecialOffer>,
    #[serde(default)]
    special_offers: Vec<SpecialOffer>,
    vision_mission: VisionMission,
}

impl From<RawContentBundle> for ContentBundle {
    fn from(raw: RawContentBundle) -> Self {
        let mut special_offers = raw.special_offers;
        if let Some(offer) = raw.special_offer {
            special_offers.insert(0, offer);
        }

        Self {
            team: raw.team,
            services: raw.services,
            case_studies: raw.case_studies,
            faq: raw.faq,
            special_offers,
            vision_mission: raw.vision_mission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_fallback() {
        let text = LocalizedText::new().with("en", "Hello".to_string());
        assert_eq!(text.text("ar"), "Hello");
        assert_eq!(text.get("ar"), None);
        assert_eq!(text.languages().collect::<Vec<_>>(), vec!["en"]);
    }

    #[test]
    fn test_localized_serializes_as_plain_map() {
        let text = LocalizedText::en_ar("Claim Your Spot", "احجز مكانك");
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json["en"], "Claim Your Spot");
        assert_eq!(json["ar"], "احجز مكانك");
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let json = r#"{
            "id": "faq1",
            "category": "billing",
            "question": {"en": "Q", "ar": "س"},
            "answer": {"en": "A", "ar": "ج"}
        }"#;
        assert!(serde_json::from_str::<Faq>(json).is_err());
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("pricing".parse::<FaqCategory>(), Ok(FaqCategory::Pricing));
        assert_eq!("pr".parse::<DepartmentKey>(), Ok(DepartmentKey::Pr));
        assert!("sales".parse::<DepartmentKey>().is_err());
    }

    #[test]
    fn test_parse_deadline_formats() {
        assert_eq!(
            parse_deadline("2025-01-31").unwrap().to_rfc3339(),
            "2025-01-31T00:00:00+00:00"
        );
        assert_eq!(
            parse_deadline("2025-01-31T12:00:00+02:00").unwrap().to_rfc3339(),
            "2025-01-31T10:00:00+00:00"
        );
        assert!(parse_deadline("end of january").is_none());
    }

    #[test]
    fn test_lead_payload_uses_original_field_names() {
        let lead = LeadPayload::new("Jane Doe", "jane@example.com", "14:00", 1_700_000_000_000);
        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
        assert_eq!(
            lead.submitted_at().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }
}
