//! Document merge: reconciles an incoming partial document against the current
//! canonical document.
//!
//! # Policy
//! - Module order always comes from the template, never from the payload.
//! - A template slot named in the payload takes the payload's entries.
//! - A template slot the payload omits keeps its current entries.
//! - A payload module whose title matches no slot is dropped.
//! - Personal info and styles are overlaid field by field; absent fields keep
//!   their current value.
//!
//! The current document is never modified; the result is always a new value.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::resume::{
    IncomingModule, PartialResumeDocument, PersonalInfo, ResumeDocument, ResumeModule,
    SpacingOverrides, StyleOverrides,
};
use crate::resume::template::{is_template_title, titles_match, TemplateSlot, TEMPLATE_SLOTS};

/// What a merge actually touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Template titles whose content was taken from the payload.
    pub updated_slots: Vec<String>,
    /// Payload titles with no matching template slot.
    pub dropped_titles: Vec<String>,
    pub personal_info_changed: bool,
    pub styles_changed: bool,
}

impl MergeReport {
    pub fn is_noop(&self) -> bool {
        self.updated_slots.is_empty() && !self.personal_info_changed && !self.styles_changed
    }
}

pub fn merge(current: &ResumeDocument, incoming: &PartialResumeDocument) -> ResumeDocument {
    merge_with_report(current, incoming).0
}

pub fn merge_with_report(
    current: &ResumeDocument,
    incoming: &PartialResumeDocument,
) -> (ResumeDocument, MergeReport) {
    let mut report = MergeReport::default();

    let modules = TEMPLATE_SLOTS
        .iter()
        .map(|slot| match find_incoming(&incoming.modules, slot) {
            Some(module) => {
                report.updated_slots.push(slot.title.to_string());
                ResumeModule {
                    id: slot.id.to_string(),
                    title: slot.title.to_string(),
                    entries: module.entries.clone(),
                }
            }
            None => current_slot(current, slot),
        })
        .collect();

    for module in &incoming.modules {
        if !is_template_title(&module.title) {
            warn!(
                "Dropping module '{}' from update: no matching template slot",
                module.title
            );
            report.dropped_titles.push(module.title.clone());
        }
    }

    let personal_info = match &incoming.personal_info {
        Some(info) => overlay_personal_info(&current.personal_info, info),
        None => current.personal_info.clone(),
    };
    report.personal_info_changed = personal_info != current.personal_info;

    let styles = match &incoming.styles {
        Some(styles) => overlay_styles(&current.styles, styles),
        None => current.styles,
    };
    report.styles_changed = styles != current.styles;

    let merged = ResumeDocument {
        personal_info,
        modules,
        styles,
    };
    (merged, report)
}

/// First payload module addressing `slot`. Later duplicates are ignored.
fn find_incoming<'a>(
    modules: &'a [IncomingModule],
    slot: &TemplateSlot,
) -> Option<&'a IncomingModule> {
    let mut matches = modules.iter().filter(|m| titles_match(&m.title, slot.title));
    let first = matches.next();
    if first.is_some() && matches.next().is_some() {
        debug!("Update names slot '{}' more than once; keeping the first", slot.title);
    }
    first
}

/// The slot as it stands in `current`, or an empty slot if `current` lost it.
fn current_slot(current: &ResumeDocument, slot: &TemplateSlot) -> ResumeModule {
    current
        .modules
        .iter()
        .find(|m| m.id == slot.id || titles_match(&m.title, slot.title))
        .map(|m| ResumeModule {
            id: slot.id.to_string(),
            title: slot.title.to_string(),
            entries: m.entries.clone(),
        })
        .unwrap_or_else(|| slot.empty_module())
}

fn pick<T: Clone>(base: &Option<T>, over: &Option<T>) -> Option<T> {
    over.clone().or_else(|| base.clone())
}

pub fn overlay_personal_info(base: &PersonalInfo, over: &PersonalInfo) -> PersonalInfo {
    PersonalInfo {
        name: pick(&base.name, &over.name),
        headline: pick(&base.headline, &over.headline),
        email: pick(&base.email, &over.email),
        phone: pick(&base.phone, &over.phone),
        location: pick(&base.location, &over.location),
        website: pick(&base.website, &over.website),
        linkedin: pick(&base.linkedin, &over.linkedin),
    }
}

/// Spacing is overlaid per axis so that `{ horizontal: 10 }` does not reset a
/// previously chosen vertical spacing.
pub fn overlay_styles(base: &StyleOverrides, over: &StyleOverrides) -> StyleOverrides {
    let spacing = match (base.spacing, over.spacing) {
        (Some(b), Some(o)) => Some(SpacingOverrides {
            horizontal: o.horizontal.or(b.horizontal),
            vertical: o.vertical.or(b.vertical),
        }),
        (b, o) => o.or(b),
    };
    StyleOverrides {
        fit_mode: over.fit_mode.or(base.fit_mode),
        spacing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{FitMode, ModuleEntry};
    use crate::resume::template::default_document;

    fn entry(title: &str) -> ModuleEntry {
        ModuleEntry {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    fn incoming(title: &str, entries: Vec<ModuleEntry>) -> IncomingModule {
        IncomingModule {
            title: title.to_string(),
            entries,
        }
    }

    fn populated() -> ResumeDocument {
        let mut doc = default_document();
        doc.personal_info.name = Some("Ada Lovelace".to_string());
        doc.personal_info.email = Some("ada@example.com".to_string());
        for module in &mut doc.modules {
            module.entries = vec![entry(&format!("{} entry", module.title))];
        }
        doc.styles.fit_mode = Some(FitMode::Compact);
        doc
    }

    #[test]
    fn test_experience_update_on_empty_document() {
        let current = default_document();
        let update = PartialResumeDocument {
            modules: vec![incoming("Experience", vec![entry("Staff Engineer")])],
            ..Default::default()
        };
        let (merged, report) = merge_with_report(&current, &update);

        let experience = merged.module("Experience").unwrap();
        assert_eq!(experience.entries, vec![entry("Staff Engineer")]);
        for (before, after) in current.modules.iter().zip(&merged.modules) {
            if after.title != "Experience" {
                assert_eq!(before, after);
            }
        }
        assert_eq!(merged.styles, current.styles);
        assert_eq!(report.updated_slots, vec!["Experience".to_string()]);
    }

    #[test]
    fn test_omitted_slots_are_preserved() {
        let current = populated();
        let update = PartialResumeDocument {
            modules: vec![incoming("Skills", vec![entry("Rust")])],
            ..Default::default()
        };
        let merged = merge(&current, &update);
        for (before, after) in current.modules.iter().zip(&merged.modules) {
            if after.title == "Skills" {
                assert_eq!(after.entries, vec![entry("Rust")]);
            } else {
                assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn test_unknown_module_is_rejected() {
        let current = populated();
        let update = PartialResumeDocument {
            modules: vec![incoming("Nonexistent", vec![entry("noise")])],
            ..Default::default()
        };
        let (merged, report) = merge_with_report(&current, &update);
        assert_eq!(merged, current);
        assert_eq!(report.dropped_titles, vec!["Nonexistent".to_string()]);
        assert!(report.is_noop());
    }

    #[test]
    fn test_payload_order_does_not_reorder_slots() {
        let current = default_document();
        let update = PartialResumeDocument {
            modules: vec![
                incoming("Languages", vec![entry("French")]),
                incoming("Summary", vec![entry("Builder")]),
            ],
            ..Default::default()
        };
        let merged = merge(&current, &update);
        let ids: Vec<_> = merged.modules.iter().map(|m| m.id.as_str()).collect();
        let expected: Vec<_> = TEMPLATE_SLOTS.iter().map(|s| s.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_empty_update_is_noop() {
        let current = populated();
        let (merged, report) = merge_with_report(&current, &PartialResumeDocument::default());
        assert_eq!(merged, current);
        assert!(report.is_noop());
    }

    #[test]
    fn test_explicit_empty_entries_clear_slot() {
        let current = populated();
        let update = PartialResumeDocument {
            modules: vec![incoming("projects", vec![])],
            ..Default::default()
        };
        let merged = merge(&current, &update);
        let projects = merged.module("Projects").unwrap();
        assert!(projects.entries.is_empty());
        assert_eq!(projects.title, "Projects");
        assert_eq!(projects.id, "projects");
    }

    #[test]
    fn test_first_duplicate_title_wins() {
        let update = PartialResumeDocument {
            modules: vec![
                incoming("Education", vec![entry("MIT")]),
                incoming("education", vec![entry("Stanford")]),
            ],
            ..Default::default()
        };
        let merged = merge(&default_document(), &update);
        assert_eq!(
            merged.module("Education").unwrap().entries,
            vec![entry("MIT")]
        );
    }

    #[test]
    fn test_personal_info_overlay_keeps_absent_fields() {
        let current = populated();
        let update = PartialResumeDocument {
            personal_info: Some(PersonalInfo {
                phone: Some("+44 20 7946 0000".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let (merged, report) = merge_with_report(&current, &update);
        assert_eq!(merged.personal_info.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(
            merged.personal_info.phone.as_deref(),
            Some("+44 20 7946 0000")
        );
        assert!(report.personal_info_changed);
    }

    #[test]
    fn test_spacing_overlay_is_per_axis() {
        let base = StyleOverrides {
            fit_mode: Some(FitMode::Compact),
            spacing: Some(SpacingOverrides {
                horizontal: Some(20.0),
                vertical: Some(40.0),
            }),
        };
        let over = StyleOverrides {
            fit_mode: None,
            spacing: Some(SpacingOverrides {
                horizontal: Some(10.0),
                vertical: None,
            }),
        };
        let merged = overlay_styles(&base, &over);
        assert_eq!(merged.fit_mode, Some(FitMode::Compact));
        assert_eq!(
            merged.spacing,
            Some(SpacingOverrides {
                horizontal: Some(10.0),
                vertical: Some(40.0),
            })
        );
    }

    #[test]
    fn test_merge_restores_missing_slot() {
        let mut current = default_document();
        current.modules.retain(|m| m.id != "languages");
        let merged = merge(&current, &PartialResumeDocument::default());
        assert_eq!(merged.modules.len(), TEMPLATE_SLOTS.len());
        assert!(merged.module("Languages").unwrap().entries.is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let current = populated();
        let update = PartialResumeDocument {
            modules: vec![incoming("Experience", vec![entry("Lead")])],
            styles: Some(StyleOverrides {
                fit_mode: Some(FitMode::Normal),
                spacing: None,
            }),
            ..Default::default()
        };
        let once = merge(&current, &update);
        let twice = merge(&once, &update);
        assert_eq!(once, twice);
    }
}
