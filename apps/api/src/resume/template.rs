//! The fixed module template every resume document is built from.
//!
//! Slots are addressed by title. Matching trims whitespace and ignores ASCII
//! case, so generated payloads that say "experience" still land in the
//! Experience slot.

use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::models::resume::{PersonalInfo, ResumeDocument, ResumeModule, StyleOverrides};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSlot {
    pub id: &'static str,
    pub title: &'static str,
}

impl TemplateSlot {
    pub fn empty_module(&self) -> ResumeModule {
        ResumeModule {
            id: self.id.to_string(),
            title: self.title.to_string(),
            entries: Vec::new(),
        }
    }
}

/// Canonical rendering order.
pub const TEMPLATE_SLOTS: &[TemplateSlot] = &[
    TemplateSlot {
        id: "summary",
        title: "Summary",
    },
    TemplateSlot {
        id: "experience",
        title: "Experience",
    },
    TemplateSlot {
        id: "education",
        title: "Education",
    },
    TemplateSlot {
        id: "skills",
        title: "Skills",
    },
    TemplateSlot {
        id: "projects",
        title: "Projects",
    },
    TemplateSlot {
        id: "certifications",
        title: "Certifications",
    },
    TemplateSlot {
        id: "languages",
        title: "Languages",
    },
];

pub fn titles_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

pub fn slot_for_title(title: &str) -> Option<&'static TemplateSlot> {
    TEMPLATE_SLOTS.iter().find(|s| titles_match(s.title, title))
}

pub fn is_template_title(title: &str) -> bool {
    slot_for_title(title).is_some()
}

/// A fresh document: every slot present and empty, no personal info, no style
/// overrides.
pub fn default_document() -> ResumeDocument {
    ResumeDocument {
        personal_info: PersonalInfo::default(),
        modules: TEMPLATE_SLOTS.iter().map(TemplateSlot::empty_module).collect(),
        styles: StyleOverrides::default(),
    }
}

/// Startup self-check. A failure here is a programming error in the template
/// table, not a runtime condition.
pub fn verify_template() -> Result<()> {
    if TEMPLATE_SLOTS.is_empty() {
        bail!("resume template has no slots");
    }
    let mut ids = HashSet::new();
    let mut titles = HashSet::new();
    for slot in TEMPLATE_SLOTS {
        if !ids.insert(slot.id) {
            bail!("duplicate template slot id '{}'", slot.id);
        }
        if !titles.insert(slot.title.to_ascii_lowercase()) {
            bail!("duplicate template slot title '{}'", slot.title);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_is_consistent() {
        assert!(verify_template().is_ok());
    }

    #[test]
    fn test_default_document_follows_template_order() {
        let doc = default_document();
        let titles: Vec<_> = doc.modules.iter().map(|m| m.title.as_str()).collect();
        let expected: Vec<_> = TEMPLATE_SLOTS.iter().map(|s| s.title).collect();
        assert_eq!(titles, expected);
        assert!(doc.modules.iter().all(|m| m.entries.is_empty()));
    }

    #[test]
    fn test_title_lookup_ignores_case_and_padding() {
        assert!(is_template_title("Experience"));
        assert!(is_template_title("  experience "));
        assert_eq!(slot_for_title("SKILLS").map(|s| s.id), Some("skills"));
    }

    #[test]
    fn test_unknown_title_is_not_in_template() {
        assert!(!is_template_title("Nonexistent"));
        assert!(!is_template_title(""));
    }
}
