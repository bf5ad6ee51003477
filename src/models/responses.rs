use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::core::RankedMatch;
use crate::models::domain::{Alumni, Student};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Public summary of an account returned after register or login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Account summary keyed by account kind, e.g. `"student": {...}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountEnvelope {
    Student(AccountSummary),
    Alumni(AccountSummary),
    Admin(AccountSummary),
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    #[serde(flatten)]
    pub account: AccountEnvelope,
}

/// Recommended alumnus for a student
#[derive(Debug, Clone, Serialize)]
pub struct AlumniMatch {
    pub alumni: Alumni,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
}

impl From<RankedMatch<Alumni>> for AlumniMatch {
    fn from(ranked: RankedMatch<Alumni>) -> Self {
        Self {
            alumni: ranked.candidate,
            match_score: ranked.match_score,
        }
    }
}

/// Recommended student for an alumnus
#[derive(Debug, Clone, Serialize)]
pub struct StudentMatch {
    pub student: Student,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
}

impl From<RankedMatch<Student>> for StudentMatch {
    fn from(ranked: RankedMatch<Student>) -> Self {
        Self {
            student: ranked.candidate,
            match_score: ranked.match_score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchesResponse<T> {
    pub success: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub matches: Vec<T>,
}

impl<T> MatchesResponse<T> {
    pub fn new(matches: Vec<T>) -> Self {
        Self {
            success: true,
            count: matches.len(),
            message: None,
            matches,
        }
    }

    /// Empty result when there is nobody to rank against
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            count: 0,
            message: Some(message.into()),
            matches: Vec::new(),
        }
    }
}

/// `{ "success": true, "count": n, "<key>": [...] }`
pub fn list_response<T: Serialize>(key: &str, items: &[T]) -> Result<Value, serde_json::Error> {
    let mut body = json!({
        "success": true,
        "count": items.len(),
    });
    body[key] = serde_json::to_value(items)?;
    Ok(body)
}

/// `{ "success": true, "message": "...", "<key>": item }`, with the item omitted when `key` is `None`
pub fn item_response<T: Serialize>(
    message: &str,
    key: Option<&str>,
    item: &T,
) -> Result<Value, serde_json::Error> {
    let mut body = json!({
        "success": true,
        "message": message,
    });
    if let Some(key) = key {
        body[key] = serde_json::to_value(item)?;
    }
    Ok(body)
}
