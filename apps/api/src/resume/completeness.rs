use serde::{Deserialize, Serialize};

use crate::models::resume::{PersonalInfo, ResumeDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    JustStarted,
    InProgress,
    AlmostThere,
    Complete,
}

impl CompletionStatus {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            0..=24 => CompletionStatus::JustStarted,
            25..=59 => CompletionStatus::InProgress,
            60..=89 => CompletionStatus::AlmostThere,
            _ => CompletionStatus::Complete,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldHealth {
    pub field: String,
    pub weight: f64,
    pub filled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionReport {
    pub percentage: u8,
    pub status: CompletionStatus,
    pub fields: Vec<FieldHealth>,
    pub missing: Vec<String>,
    pub recommendations: Vec<String>,
}

const PERSONAL_WEIGHTS: &[(&str, f64)] = &[
    ("name", 10.0),
    ("headline", 5.0),
    ("email", 6.0),
    ("phone", 4.0),
    ("location", 3.0),
];

/// Keyed by template slot id.
const MODULE_WEIGHTS: &[(&str, f64)] = &[
    ("summary", 10.0),
    ("experience", 25.0),
    ("education", 15.0),
    ("skills", 12.0),
    ("projects", 6.0),
    ("certifications", 2.0),
    ("languages", 2.0),
];

fn personal_field<'a>(info: &'a PersonalInfo, field: &str) -> Option<&'a str> {
    match field {
        "name" => info.name.as_deref(),
        "headline" => info.headline.as_deref(),
        "email" => info.email.as_deref(),
        "phone" => info.phone.as_deref(),
        "location" => info.location.as_deref(),
        _ => None,
    }
}

/// Returns only the percentage and status; see `compute_completion_report`
/// for the breakdown.
pub fn score(document: &ResumeDocument) -> (u8, CompletionStatus) {
    let report = compute_completion_report(document);
    (report.percentage, report.status)
}

pub fn compute_completion_report(document: &ResumeDocument) -> CompletionReport {
    let mut fields = Vec::new();
    let mut missing = Vec::new();
    let mut recommendations = Vec::new();
    let mut filled_weight = 0.0;

    for (field, weight) in PERSONAL_WEIGHTS {
        let filled = personal_field(&document.personal_info, field)
            .is_some_and(|v| !v.trim().is_empty());
        if filled {
            filled_weight += weight;
        } else {
            missing.push(field.to_string());
            recommendations.push(format!("Add your {field} to the header"));
        }
        fields.push(FieldHealth {
            field: field.to_string(),
            weight: *weight,
            filled,
        });
    }

    for (slot_id, weight) in MODULE_WEIGHTS {
        let module = document.modules.iter().find(|m| m.id == *slot_id);
        let filled = module.is_some_and(|m| m.has_content());
        let label = module.map_or_else(|| slot_id.to_string(), |m| m.title.clone());
        if filled {
            filled_weight += weight;
        } else {
            recommendations.push(format!("Add at least one entry to {label}"));
            missing.push(label.clone());
        }
        fields.push(FieldHealth {
            field: label,
            weight: *weight,
            filled,
        });
    }

    let total_weight: f64 = PERSONAL_WEIGHTS
        .iter()
        .chain(MODULE_WEIGHTS)
        .map(|(_, w)| w)
        .sum();
    let percentage = if total_weight > 0.0 {
        ((filled_weight / total_weight) * 100.0).round().clamp(0.0, 100.0) as u8
    } else {
        0
    };

    CompletionReport {
        percentage,
        status: CompletionStatus::from_percentage(percentage),
        fields,
        missing,
        recommendations,
    }
}
