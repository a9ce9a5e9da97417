//! Page fill estimate for a document under a given page layout.
//!
//! This is an approximation used to warn the editor before export: text is
//! measured with a flat average glyph width and wrapped greedily. The real
//! typesetting happens downstream; the estimate only has to be close enough to
//! tell "one page" from "spills onto a second page".

use serde::{Deserialize, Serialize};

use crate::layout::page::{page_layout, PageLayout};
use crate::layout::styles::ResolvedStyles;
use crate::models::resume::{FitMode, ModuleEntry, ResumeDocument};

/// Average glyph advance in em for proportional body fonts.
const AVERAGE_CHAR_EM: f32 = 0.5;
const SPACE_EM: f32 = 0.28;
/// Bullet text is indented by this much.
const BULLET_INDENT_EM: f32 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillVerdict {
    Empty,
    SinglePage,
    MultiPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillEstimate {
    pub total_lines: u32,
    pub lines_per_page: u16,
    pub page_count: u32,
    /// Fraction of the last page that is used, 0.0 – 1.0.
    pub last_page_fill: f32,
    pub verdict: FillVerdict,
}

/// Greedy word-wrap line count at `width_em`.
pub fn estimated_lines(text: &str, width_em: f32) -> u32 {
    let mut lines = 0u32;
    let mut current = 0.0_f32;
    for word in text.split_whitespace() {
        let word_w = word.chars().count() as f32 * AVERAGE_CHAR_EM;
        if lines == 0 {
            lines = 1;
            current = word_w;
        } else if current + SPACE_EM + word_w > width_em {
            lines += 1;
            current = word_w;
        } else {
            current += SPACE_EM + word_w;
        }
    }
    lines
}

fn entry_lines(entry: &ModuleEntry, layout: &PageLayout) -> u32 {
    if entry.is_blank() {
        return 0;
    }
    let heading = [
        &entry.title,
        &entry.organization,
        &entry.subtitle,
        &entry.start_date,
        &entry.end_date,
    ]
    .iter()
    .any(|f| f.as_deref().is_some_and(|s| !s.trim().is_empty()));

    let mut lines = u32::from(heading);
    if let Some(desc) = &entry.description {
        lines += estimated_lines(desc, layout.text_width_em);
    }
    let bullet_width = (layout.text_width_em - BULLET_INDENT_EM).max(1.0);
    lines += entry
        .bullets
        .iter()
        .map(|b| estimated_lines(b, bullet_width))
        .sum::<u32>();
    lines
}

fn document_lines(document: &ResumeDocument, layout: &PageLayout) -> u32 {
    let info = &document.personal_info;
    let mut lines = 0;
    if info.name.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        lines += 2; // name is set at double size
    }
    if info.headline.is_some() {
        lines += 1;
    }
    let has_contact = [&info.email, &info.phone, &info.location, &info.website, &info.linkedin]
        .iter()
        .any(|f| f.is_some());
    if has_contact {
        lines += 1;
    }

    for module in document.modules.iter().filter(|m| m.has_content()) {
        lines += u32::from(layout.section_gap_lines) + 1;
        lines += module
            .entries
            .iter()
            .map(|e| entry_lines(e, layout))
            .sum::<u32>();
    }
    lines
}

pub fn estimate_fill(document: &ResumeDocument, layout: &PageLayout) -> FillEstimate {
    let total_lines = document_lines(document, layout);
    let per_page = u32::from(layout.usable_height_lines.max(1));

    if total_lines == 0 {
        return FillEstimate {
            total_lines,
            lines_per_page: layout.usable_height_lines,
            page_count: 0,
            last_page_fill: 0.0,
            verdict: FillVerdict::Empty,
        };
    }

    let page_count = total_lines.div_ceil(per_page);
    let remainder = total_lines - (page_count - 1) * per_page;
    FillEstimate {
        total_lines,
        lines_per_page: layout.usable_height_lines,
        page_count,
        last_page_fill: remainder as f32 / per_page as f32,
        verdict: if page_count == 1 {
            FillVerdict::SinglePage
        } else {
            FillVerdict::MultiPage
        },
    }
}

/// Suggests switching to compact mode when the document spills onto a second
/// page in normal mode but would fit on one page compacted.
pub fn suggest_fit_mode(document: &ResumeDocument, styles: &ResolvedStyles) -> Option<FitMode> {
    if styles.fit_mode != FitMode::Normal {
        return None;
    }
    let normal = estimate_fill(document, &page_layout(styles));
    if normal.verdict != FillVerdict::MultiPage {
        return None;
    }
    let compact_styles = ResolvedStyles {
        fit_mode: FitMode::Compact,
        ..*styles
    };
    let compact = estimate_fill(document, &page_layout(&compact_styles));
    (compact.page_count == 1).then_some(FitMode::Compact)
}
