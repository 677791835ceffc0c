//! Load-time content validation.
//!
//! Content is authored by hand, so any rule violation here is fatal at startup
//! and never surfaces while serving reads.

use crate::domain::model::{
    parse_deadline, CaseStudy, ContentBundle, Faq, LeadPayload, Localized, LocalizedText,
    SpecialOffer, Service, TeamMember, VisionMission,
};
use crate::utils::error::{ContentError, Result};
use crate::utils::validation::validate_unique_ids;

/// 內容必須具備的語言
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRules {
    pub languages: Vec<String>,
}

impl Default for ContentRules {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string(), "ar".to_string()],
        }
    }
}

impl ContentRules {
    pub fn new(languages: Vec<String>) -> Self {
        Self { languages }
    }

    fn check_text(&self, entity: &str, id: &str, field: &str, text: &LocalizedText) -> Result<()> {
        for lang in &self.languages {
            match text.get(lang) {
                None => {
                    return Err(ContentError::validation(
                        entity,
                        id,
                        &format!("{}.{}", field, lang),
                        "is missing",
                    ))
                }
                Some(value) if value.trim().is_empty() => {
                    return Err(ContentError::validation(
                        entity,
                        id,
                        &format!("{}.{}", field, lang),
                        "is empty",
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// 各語言的清單必須存在, 非空且長度一致 (逐項對應)
    fn check_list(
        &self,
        entity: &str,
        id: &str,
        field: &str,
        list: &Localized<Vec<String>>,
    ) -> Result<()> {
        let mut expected_len = None;
        for lang in &self.languages {
            let items = list.get(lang).ok_or_else(|| {
                ContentError::validation(entity, id, &format!("{}.{}", field, lang), "is missing")
            })?;

            if items.is_empty() {
                return Err(ContentError::validation(
                    entity,
                    id,
                    &format!("{}.{}", field, lang),
                    "is empty",
                ));
            }
            if let Some(position) = items.iter().position(|item| item.trim().is_empty()) {
                return Err(ContentError::validation(
                    entity,
                    id,
                    &format!("{}.{}[{}]", field, lang, position),
                    "is empty",
                ));
            }

            match expected_len {
                None => expected_len = Some(items.len()),
                Some(len) if len != items.len() => {
                    return Err(ContentError::validation(
                        entity,
                        id,
                        &format!("{}.{}", field, lang),
                        format!("has {} items, expected {}", items.len(), len),
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

pub trait ValidateContent {
    fn validate_content(&self, rules: &ContentRules) -> Result<()>;
}

impl ValidateContent for TeamMember {
    fn validate_content(&self, rules: &ContentRules) -> Result<()> {
        rules.check_text("team member", &self.id, "name", &self.name)?;
        rules.check_text("team member", &self.id, "role", &self.role)?;
        rules.check_text("team member", &self.id, "bio", &self.bio)?;
        if self.avatar_url.trim().is_empty() {
            return Err(ContentError::validation(
                "team member",
                &self.id,
                "avatarUrl",
                "is empty",
            ));
        }
        Ok(())
    }
}

impl ValidateContent for Service {
    fn validate_content(&self, rules: &ContentRules) -> Result<()> {
        rules.check_text("service", &self.id, "title", &self.title)?;
        rules.check_text("service", &self.id, "description", &self.description)?;
        rules.check_list("service", &self.id, "details", &self.details)
    }
}

impl ValidateContent for CaseStudy {
    fn validate_content(&self, rules: &ContentRules) -> Result<()> {
        let id = &self.id;
        rules.check_text("case study", id, "title", &self.title)?;
        rules.check_text("case study", id, "industry", &self.industry)?;
        rules.check_text("case study", id, "problem", &self.problem)?;
        rules.check_text("case study", id, "decision", &self.decision)?;
        rules.check_text("case study", id, "outcome", &self.outcome)?;

        if let Some(metrics) = &self.metrics {
            if metrics.is_empty() {
                return Err(ContentError::validation(
                    "case study",
                    id,
                    "metrics",
                    "is present but empty",
                ));
            }
            for (i, metric) in metrics.iter().enumerate() {
                rules.check_text("case study", id, &format!("metrics[{}].label", i), &metric.label)?;
                if metric.value.trim().is_empty() {
                    return Err(ContentError::validation(
                        "case study",
                        id,
                        &format!("metrics[{}].value", i),
                        "is empty",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl ValidateContent for Faq {
    fn validate_content(&self, rules: &ContentRules) -> Result<()> {
        // category 已由反序列化限制在固定列舉內
        rules.check_text("faq", &self.id, "question", &self.question)?;
        rules.check_text("faq", &self.id, "answer", &self.answer)
    }
}

impl ValidateContent for SpecialOffer {
    fn validate_content(&self, rules: &ContentRules) -> Result<()> {
        rules.check_text("special offer", &self.id, "title", &self.title)?;
        rules.check_text("special offer", &self.id, "description", &self.description)?;
        rules.check_text("special offer", &self.id, "cta", &self.cta)?;

        if let Some(valid_until) = &self.valid_until {
            if parse_deadline(valid_until).is_none() {
                return Err(ContentError::validation(
                    "special offer",
                    &self.id,
                    "validUntil",
                    format!("'{}' is not an ISO-8601 date", valid_until),
                ));
            }
        }
        Ok(())
    }
}

impl ValidateContent for VisionMission {
    fn validate_content(&self, rules: &ContentRules) -> Result<()> {
        rules.check_text("vision/mission", "-", "vision", &self.vision)?;
        rules.check_text("vision/mission", "-", "mission", &self.mission)
    }
}

impl ValidateContent for ContentBundle {
    fn validate_content(&self, rules: &ContentRules) -> Result<()> {
        if rules.languages.is_empty() {
            return Err(ContentError::ConfigError {
                message: "at least one content language is required".to_string(),
            });
        }

        for (entity, len) in [
            ("team member", self.team.len()),
            ("service", self.services.len()),
            ("faq", self.faq.len()),
        ] {
            if len == 0 {
                return Err(ContentError::validation(entity, "-", "collection", "is empty"));
            }
        }

        validate_unique_ids("team member", self.team.iter().map(|m| m.id.as_str()))?;
        validate_unique_ids("service", self.services.iter().map(|s| s.id.as_str()))?;
        validate_unique_ids("case study", self.case_studies.iter().map(|c| c.id.as_str()))?;
        validate_unique_ids("faq", self.faq.iter().map(|f| f.id.as_str()))?;
        validate_unique_ids(
            "special offer",
            self.special_offers.iter().map(|o| o.id.as_str()),
        )?;

        self.team.iter().try_for_each(|m| m.validate_content(rules))?;
        self.services.iter().try_for_each(|s| s.validate_content(rules))?;
        self.case_studies.iter().try_for_each(|c| c.validate_content(rules))?;
        self.faq.iter().try_for_each(|f| f.validate_content(rules))?;
        self.special_offers
            .iter()
            .try_for_each(|o| o.validate_content(rules))?;
        self.vision_mission.validate_content(rules)
    }
}

/// 預約表單的檢查; 由表單端 (CLI) 呼叫, Repository 本身不強制
pub fn validate_lead(lead: &LeadPayload, slots: &[String]) -> Result<()> {
    if lead.name.trim().is_empty() {
        return Err(ContentError::validation("lead", &lead.email, "name", "is empty"));
    }
    if !lead.email.contains('@') {
        return Err(ContentError::validation(
            "lead",
            &lead.email,
            "email",
            "must contain '@'",
        ));
    }
    if !slots.is_empty() && !slots.iter().any(|slot| slot == &lead.slot) {
        return Err(ContentError::validation(
            "lead",
            &lead.email,
            "slot",
            format!("'{}' is not one of {}", lead.slot, slots.join(", ")),
        ));
    }
    Ok(())
}
