//! crates/connectia_core/src/domain.rs
//!
//! Defines the pure, core data structures for the admin service.
//! These structs are independent of any database driver or transport format;
//! their serde field names are the lower-cased column names of the canonical
//! schema, which is also the JSON wire format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A user row as returned by reads. The stored password is intentionally
/// not part of this struct and never leaves the data-access layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id_usuario: i64,
    pub nm_usuario: String,
    pub ds_email: String,
    pub id_carreira: i64,
    pub tp_plano: String,
    pub t_con_carreira_id_area: i64,
}

/// The full field set required to create a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub nm_usuario: String,
    pub ds_email: String,
    pub ds_senha: String,
    pub id_carreira: i64,
    pub tp_plano: String,
    pub t_con_carreira_id_area: i64,
}

impl NewUser {
    /// Returns the names of required text fields that are absent (blank).
    /// Create must refuse the payload before any database access if this
    /// is non-empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.nm_usuario.trim().is_empty() {
            missing.push("nm_usuario");
        }
        if self.ds_email.trim().is_empty() {
            missing.push("ds_email");
        }
        if self.ds_senha.trim().is_empty() {
            missing.push("ds_senha");
        }
        if self.tp_plano.trim().is_empty() {
            missing.push("tp_plano");
        }
        missing
    }
}

/// A partial update for a user. Every field is optional; the set of fields
/// present here is exactly the update whitelist — anything else in the
/// incoming payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub nm_usuario: Option<String>,
    pub ds_email: Option<String>,
    pub ds_senha: Option<String>,
    pub id_carreira: Option<i64>,
    pub tp_plano: Option<String>,
    pub t_con_carreira_id_area: Option<i64>,
}

impl UserUpdate {
    /// True when the payload carries no whitelisted field at all.
    pub fn is_empty(&self) -> bool {
        self.nm_usuario.is_none()
            && self.ds_email.is_none()
            && self.ds_senha.is_none()
            && self.id_carreira.is_none()
            && self.tp_plano.is_none()
            && self.t_con_carreira_id_area.is_none()
    }
}

/// Lifecycle status of a course. The wire representation is the single
/// letter stored in `sts_curso`; no other value is accepted anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseStatus {
    #[serde(rename = "C")]
    Current,
    #[serde(rename = "N")]
    New,
    #[serde(rename = "E")]
    Ended,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Current => "C",
            CourseStatus::New => "N",
            CourseStatus::Ended => "E",
        }
    }
}

impl std::str::FromStr for CourseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" => Ok(CourseStatus::Current),
            "N" => Ok(CourseStatus::New),
            "E" => Ok(CourseStatus::Ended),
            other => Err(format!(
                "invalid course status '{}', expected one of C, N, E",
                other
            )),
        }
    }
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A course row. Courses are read-only in this service except for status
/// transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id_curso: i64,
    pub nm_curso: String,
    pub ds_curso: Option<String>,
    pub id_carreira: Option<i64>,
    pub tp_conteudo: Option<String>,
    pub dt_inicio: Option<NaiveDate>,
    pub sts_curso: CourseStatus,
    pub id_usuario: Option<i64>,
    pub id_area: Option<i64>,
}

/// Narrows a course lookup or status update to a career + area pair when
/// the id alone is ambiguous.
#[derive(Debug, Clone, Copy)]
pub struct CourseScope {
    pub id_carreira: i64,
    pub id_area: i64,
}

/// A pagination window. Construction coerces negative values to zero; no
/// upper bound is enforced on `limit`, which is an accepted limitation.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 100;

    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.max(0),
            offset: offset.max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Row shape of the users-by-career reporting query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id_usuario: i64,
    pub nm_usuario: String,
    pub ds_email: String,
    pub tp_plano: String,
    pub id_carreira: i64,
}

/// Row shape of the courses-by-status reporting query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id_curso: i64,
    pub nm_curso: String,
    pub ds_curso: Option<String>,
    pub id_carreira: Option<i64>,
    pub id_area: Option<i64>,
    pub sts_curso: CourseStatus,
}

/// Row shape of the courses-of-a-user reporting query, ordered by start
/// date with missing dates last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCourse {
    pub id_curso: i64,
    pub nm_curso: String,
    pub ds_curso: Option<String>,
    pub sts_curso: CourseStatus,
    pub dt_inicio: Option<NaiveDate>,
    pub id_area: Option<i64>,
    pub id_carreira: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_new_user() -> NewUser {
        NewUser {
            nm_usuario: "Ana".to_string(),
            ds_email: "ana@x.com".to_string(),
            ds_senha: "secret".to_string(),
            id_carreira: 2,
            tp_plano: "PREMIUM".to_string(),
            t_con_carreira_id_area: 7,
        }
    }

    #[test]
    fn course_status_accepts_only_the_three_letters() {
        assert_eq!(CourseStatus::from_str("C"), Ok(CourseStatus::Current));
        assert_eq!(CourseStatus::from_str("N"), Ok(CourseStatus::New));
        assert_eq!(CourseStatus::from_str("E"), Ok(CourseStatus::Ended));
        assert!(CourseStatus::from_str("X").is_err());
        assert!(CourseStatus::from_str("c").is_err());
        assert!(CourseStatus::from_str("").is_err());
    }

    #[test]
    fn course_status_serializes_as_single_letter() {
        let json = serde_json::to_string(&CourseStatus::New).unwrap();
        assert_eq!(json, "\"N\"");
        let back: CourseStatus = serde_json::from_str("\"E\"").unwrap();
        assert_eq!(back, CourseStatus::Ended);
    }

    #[test]
    fn page_clamps_negative_values() {
        let page = Page::new(-5, -1);
        assert_eq!(page.limit, 0);
        assert_eq!(page.offset, 0);

        let page = Page::new(2, 4);
        assert_eq!(page.limit, 2);
        assert_eq!(page.offset, 4);
    }

    #[test]
    fn new_user_reports_blank_required_fields() {
        assert!(sample_new_user().missing_fields().is_empty());

        let mut incomplete = sample_new_user();
        incomplete.ds_email = "  ".to_string();
        incomplete.tp_plano = String::new();
        assert_eq!(incomplete.missing_fields(), vec!["ds_email", "tp_plano"]);
    }

    #[test]
    fn user_update_emptiness_tracks_whitelisted_fields_only() {
        assert!(UserUpdate::default().is_empty());

        // Unknown keys are ignored by deserialization, so a payload made of
        // them only is an empty update.
        let update: UserUpdate =
            serde_json::from_str(r#"{"id_usuario": 9, "nonsense": true}"#).unwrap();
        assert!(update.is_empty());

        let update: UserUpdate = serde_json::from_str(r#"{"tp_plano": "BASIC"}"#).unwrap();
        assert!(!update.is_empty());
        assert_eq!(update.tp_plano.as_deref(), Some("BASIC"));
    }

    #[test]
    fn course_date_renders_iso_8601() {
        let course = Course {
            id_curso: 1,
            nm_curso: "Rust".to_string(),
            ds_curso: None,
            id_carreira: Some(2),
            tp_conteudo: None,
            dt_inicio: NaiveDate::from_ymd_opt(2025, 3, 10),
            sts_curso: CourseStatus::Current,
            id_usuario: Some(4),
            id_area: Some(1),
        };
        let value = serde_json::to_value(&course).unwrap();
        assert_eq!(value["dt_inicio"], "2025-03-10");
        assert_eq!(value["sts_curso"], "C");
    }
}
