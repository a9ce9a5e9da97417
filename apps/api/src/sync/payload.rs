//! Decoding of tool-result payloads.
//!
//! Payloads are produced by a generative model, so decoding is lenient at the
//! fragment level: a field of the wrong type, a module without a title or an
//! entry that is not an object is skipped, and the rest of the payload is kept.
//! Only a payload missing its required top-level fields is rejected.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::models::resume::{
    FitMode, IncomingModule, ModuleEntry, PartialResumeDocument, PersonalInfo, SpacingOverrides,
    StyleOverrides,
};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PayloadError {
    #[error("tool result has no payload")]
    MissingResult,

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContextUpdate {
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResumeUpdate {
    Apply {
        data: PartialResumeDocument,
        timestamp: Option<DateTime<Utc>>,
    },
    /// The tool reported `success: false`.
    Unsuccessful,
}

fn as_object(result: Option<&Value>) -> Result<&Map<String, Value>, PayloadError> {
    result
        .ok_or(PayloadError::MissingResult)?
        .as_object()
        .ok_or(PayloadError::NotAnObject)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| e.to_string())
}

/// `generateContext` → `{ contextSummary, timestamp }`, both required.
pub fn decode_context_update(result: Option<&Value>) -> Result<ContextUpdate, PayloadError> {
    let obj = as_object(result)?;

    let summary = obj
        .get("contextSummary")
        .and_then(|v| v.as_str())
        .ok_or(PayloadError::MissingField("contextSummary"))?;
    if summary.trim().is_empty() {
        return Err(PayloadError::InvalidField {
            field: "contextSummary",
            reason: "summary is blank".to_string(),
        });
    }

    let raw_ts = obj
        .get("timestamp")
        .and_then(|v| v.as_str())
        .ok_or(PayloadError::MissingField("timestamp"))?;
    let timestamp = parse_timestamp(raw_ts).map_err(|reason| PayloadError::InvalidField {
        field: "timestamp",
        reason,
    })?;

    Ok(ContextUpdate {
        summary: summary.to_string(),
        timestamp,
    })
}

/// `updateResume` → `{ success, resumeData, timestamp }`.
///
/// `success: false` is not an error; `success: true` without `resumeData` is.
pub fn decode_resume_update(result: Option<&Value>) -> Result<ResumeUpdate, PayloadError> {
    let obj = as_object(result)?;

    let success = obj
        .get("success")
        .and_then(|v| v.as_bool())
        .ok_or(PayloadError::MissingField("success"))?;
    if !success {
        return Ok(ResumeUpdate::Unsuccessful);
    }

    let data = match obj.get("resumeData") {
        None | Some(Value::Null) => return Err(PayloadError::MissingField("resumeData")),
        Some(v) => decode_partial_document(v)?,
    };

    // informational only; a bad timestamp does not invalidate the update
    let timestamp = obj
        .get("timestamp")
        .and_then(|v| v.as_str())
        .and_then(|raw| parse_timestamp(raw).ok());

    Ok(ResumeUpdate::Apply { data, timestamp })
}

pub fn decode_partial_document(value: &Value) -> Result<PartialResumeDocument, PayloadError> {
    let obj = value
        .as_object()
        .ok_or_else(|| PayloadError::InvalidField {
            field: "resumeData",
            reason: "expected an object".to_string(),
        })?;

    let personal_info = obj
        .get("personalInfo")
        .and_then(|v| v.as_object())
        .map(decode_personal_info);

    let modules = match obj.get("modules") {
        Some(Value::Array(items)) => items.iter().filter_map(decode_module).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            warn!("Ignoring 'modules' in resume update: expected an array");
            Vec::new()
        }
    };

    let styles = obj
        .get("styles")
        .and_then(|v| v.as_object())
        .map(decode_styles);

    Ok(PartialResumeDocument {
        personal_info,
        modules,
        styles,
    })
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(String::from)
}

fn decode_personal_info(obj: &Map<String, Value>) -> PersonalInfo {
    PersonalInfo {
        name: string_field(obj, "name"),
        headline: string_field(obj, "headline"),
        email: string_field(obj, "email"),
        phone: string_field(obj, "phone"),
        location: string_field(obj, "location"),
        website: string_field(obj, "website"),
        linkedin: string_field(obj, "linkedin"),
    }
}

fn decode_module(value: &Value) -> Option<IncomingModule> {
    let Some(obj) = value.as_object() else {
        warn!("Skipping module in resume update: not an object");
        return None;
    };
    let Some(title) = obj.get("title").and_then(|v| v.as_str()) else {
        warn!("Skipping module in resume update: missing title");
        return None;
    };
    // A module without an entries list is not a request to clear the slot.
    let Some(items) = obj.get("entries").and_then(|v| v.as_array()) else {
        warn!("Skipping module '{title}' in resume update: missing entries");
        return None;
    };
    Some(IncomingModule {
        title: title.to_string(),
        entries: items.iter().filter_map(decode_entry).collect(),
    })
}

fn decode_entry(value: &Value) -> Option<ModuleEntry> {
    match value {
        // Skills and languages are often sent as bare strings.
        Value::String(s) => Some(ModuleEntry {
            title: Some(s.clone()),
            ..Default::default()
        }),
        Value::Object(obj) => Some(ModuleEntry {
            title: string_field(obj, "title"),
            subtitle: string_field(obj, "subtitle"),
            organization: string_field(obj, "organization"),
            location: string_field(obj, "location"),
            start_date: string_field(obj, "startDate"),
            end_date: string_field(obj, "endDate"),
            description: string_field(obj, "description"),
            bullets: obj
                .get("bullets")
                .and_then(|v| v.as_array())
                .map(|arr| {
                    arr.iter()
                        .filter_map(|b| b.as_str().map(String::from))
                        .collect()
                })
                .unwrap_or_default(),
        }),
        _ => None,
    }
}

fn decode_styles(obj: &Map<String, Value>) -> StyleOverrides {
    let fit_mode = obj
        .get("fitMode")
        .and_then(|v| v.as_str())
        .and_then(FitMode::parse_lenient);
    let spacing = obj
        .get("spacing")
        .and_then(|v| v.as_object())
        .map(|s| SpacingOverrides {
            horizontal: s.get("horizontal").and_then(|v| v.as_f64()).map(|v| v as f32),
            vertical: s.get("vertical").and_then(|v| v.as_f64()).map(|v| v as f32),
        });
    StyleOverrides { fit_mode, spacing }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_update_decodes() {
        let payload = json!({
            "contextSummary": "Backend engineer targeting fintech roles",
            "timestamp": "2024-05-01T10:00:00Z"
        });
        let update = decode_context_update(Some(&payload)).unwrap();
        assert_eq!(update.summary, "Backend engineer targeting fintech roles");
        assert_eq!(update.timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_context_update_requires_fields() {
        assert_eq!(
            decode_context_update(None),
            Err(PayloadError::MissingResult)
        );
        assert_eq!(
            decode_context_update(Some(&json!({ "timestamp": "2024-05-01T10:00:00Z" }))),
            Err(PayloadError::MissingField("contextSummary"))
        );
        assert_eq!(
            decode_context_update(Some(&json!({ "contextSummary": "x" }))),
            Err(PayloadError::MissingField("timestamp"))
        );
        assert!(matches!(
            decode_context_update(Some(&json!({ "contextSummary": "x", "timestamp": "yesterday" }))),
            Err(PayloadError::InvalidField { field: "timestamp", .. })
        ));
    }

    #[test]
    fn test_resume_update_without_data_is_malformed() {
        let payload = json!({ "success": true, "timestamp": "2024-05-01T10:00:00Z" });
        assert_eq!(
            decode_resume_update(Some(&payload)),
            Err(PayloadError::MissingField("resumeData"))
        );
    }

    #[test]
    fn test_unsuccessful_resume_update() {
        let payload = json!({ "success": false, "resumeData": { "modules": [] } });
        assert_eq!(
            decode_resume_update(Some(&payload)),
            Ok(ResumeUpdate::Unsuccessful)
        );
    }

    #[test]
    fn test_resume_update_keeps_good_fragments() {
        let payload = json!({
            "success": true,
            "timestamp": "not a date",
            "resumeData": {
                "personalInfo": { "name": "Ada", "phone": 5550100, "email": null },
                "modules": [
                    { "title": "Experience", "entries": [
                        { "title": "Engineer", "bullets": ["Cut p99 by 40%", 7] },
                        42
                    ]},
                    { "title": "Skills", "entries": ["Rust", "SQL"] },
                    { "entries": [] },
                    "garbage",
                    { "title": "Projects" }
                ],
                "styles": { "fitMode": "COMPACT", "spacing": { "horizontal": 12 } }
            }
        });
        let ResumeUpdate::Apply { data, timestamp } = decode_resume_update(Some(&payload)).unwrap()
        else {
            panic!("expected an applicable update");
        };
        assert!(timestamp.is_none());

        let info = data.personal_info.unwrap();
        assert_eq!(info.name.as_deref(), Some("Ada"));
        assert!(info.phone.is_none());
        assert!(info.email.is_none());

        assert_eq!(data.modules.len(), 2);
        assert_eq!(data.modules[0].title, "Experience");
        assert_eq!(data.modules[0].entries.len(), 1);
        assert_eq!(data.modules[0].entries[0].bullets, vec!["Cut p99 by 40%"]);
        assert_eq!(
            data.modules[1].entries[1].title.as_deref(),
            Some("SQL")
        );

        let styles = data.styles.unwrap();
        assert_eq!(styles.fit_mode, Some(FitMode::Compact));
        assert_eq!(styles.spacing.unwrap().horizontal, Some(12.0));
        assert_eq!(styles.spacing.unwrap().vertical, None);
    }

    #[test]
    fn test_resume_data_must_be_object() {
        let payload = json!({ "success": true, "resumeData": "everything" });
        assert!(matches!(
            decode_resume_update(Some(&payload)),
            Err(PayloadError::InvalidField { field: "resumeData", .. })
        ));
    }
}
