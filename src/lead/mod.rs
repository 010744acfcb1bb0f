pub mod insight;
pub mod phone;
pub mod templates;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::new_id;

/// Pipeline stage of a lead. Only `New` is ever written by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Closed,
}

/// A stored prospect record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub business: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_point: Option<String>,
    #[serde(default)]
    pub insight: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: LeadStatus,
}

/// Raw form submission, as posted by the browser (JSON or urlencoded).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub business: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, alias = "pain_point")]
    pub pain_point: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LeadSubmission {
    /// Trim every field and drop the blank ones.
    pub fn normalized(self) -> Self {
        Self {
            name: present(self.name),
            email: present(self.email),
            phone: present(self.phone),
            business: present(self.business),
            website: present(self.website),
            pain_point: present(self.pain_point),
            message: present(self.message),
        }
    }

    /// Build a fresh `New` lead from this submission.
    pub fn into_lead(self, insight: String) -> Lead {
        let sub = self.normalized();
        Lead {
            id: new_id("lead"),
            name: sub.name.unwrap_or_default(),
            email: sub.email.unwrap_or_default(),
            business: sub.business.unwrap_or_default(),
            phone: sub.phone,
            website: sub.website,
            message: sub.message,
            pain_point: sub.pain_point,
            insight,
            created_at: Utc::now(),
            status: LeadStatus::New,
        }
    }
}

impl Lead {
    /// First word of the name, for greetings. Falls back to `there`.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("there")
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Older lead files store absent optional fields as `""`.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(present(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_accepts_both_pain_point_spellings() {
        let camel: LeadSubmission =
            serde_json::from_str(r#"{"painPoint": "too many emails"}"#).unwrap();
        let snake: LeadSubmission =
            serde_json::from_str(r#"{"pain_point": "too many emails"}"#).unwrap();
        assert_eq!(camel.pain_point.as_deref(), Some("too many emails"));
        assert_eq!(snake.pain_point.as_deref(), Some("too many emails"));
    }

    #[test]
    fn normalized_drops_blank_fields() {
        let sub = LeadSubmission {
            name: Some("  Dana Reyes ".into()),
            phone: Some("   ".into()),
            website: Some(String::new()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(sub.name.as_deref(), Some("Dana Reyes"));
        assert!(sub.phone.is_none());
        assert!(sub.website.is_none());
    }

    #[test]
    fn into_lead_starts_as_new() {
        let lead = LeadSubmission {
            name: Some("Dana".into()),
            email: Some("dana@example.com".into()),
            business: Some("Bakery".into()),
            ..Default::default()
        }
        .into_lead("insight".into());
        assert!(lead.id.starts_with("lead_"));
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.insight, "insight");
        assert!(lead.website.is_none());
    }

    #[test]
    fn lead_serializes_camel_case() {
        let lead = LeadSubmission {
            name: Some("Dana".into()),
            pain_point: Some("scheduling".into()),
            ..Default::default()
        }
        .into_lead(String::new());
        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["status"], "new");
        assert_eq!(json["painPoint"], "scheduling");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn reads_legacy_records_with_empty_strings() {
        let lead: Lead = serde_json::from_str(
            r#"{
                "id": "lead_1700000000000_abcdefghi",
                "name": "Sam",
                "email": "sam@example.com",
                "business": "Gym",
                "website": "",
                "message": "",
                "insight": "x",
                "createdAt": "2024-01-01T12:00:00.000Z",
                "status": "contacted"
            }"#,
        )
        .unwrap();
        assert!(lead.website.is_none());
        assert!(lead.message.is_none());
        assert_eq!(lead.status, LeadStatus::Contacted);
    }

    #[test]
    fn first_name_falls_back() {
        let mut lead = LeadSubmission::default().into_lead(String::new());
        assert_eq!(lead.first_name(), "there");
        lead.name = "Dana Reyes".into();
        assert_eq!(lead.first_name(), "Dana");
    }
}
