//! Concrete page parameters derived from resolved styles.
//!
//! The export pipeline lays the document out on US letter paper. Spacing values
//! are CSS pixels of page padding; they are converted to points here so both
//! the on-screen preview and the PDF side paginate against the same numbers.

use serde::{Deserialize, Serialize};

use crate::layout::styles::ResolvedStyles;
use crate::models::resume::FitMode;

pub const PAGE_WIDTH_PT: f32 = 612.0;
pub const PAGE_HEIGHT_PT: f32 = 792.0;
/// 96 CSS px per inch, 72 pt per inch.
pub const PX_TO_PT: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    pub fit_mode: FitMode,
    pub font_size_pt: f32,
    pub line_height_pt: f32,
    pub margin_horizontal_pt: f32,
    pub margin_vertical_pt: f32,
    /// Usable text width in em units at `font_size_pt`.
    pub text_width_em: f32,
    /// Line slots available on one page, after margins.
    pub usable_height_lines: u16,
    /// Blank lines inserted before each section header.
    pub section_gap_lines: u16,
}

struct Density {
    font_size_pt: f32,
    leading: f32,
    section_gap_lines: u16,
}

fn density(mode: FitMode) -> Density {
    match mode {
        FitMode::Compact => Density {
            font_size_pt: 10.0,
            leading: 1.15,
            section_gap_lines: 0,
        },
        FitMode::Normal => Density {
            font_size_pt: 11.0,
            leading: 1.3,
            section_gap_lines: 1,
        },
    }
}

pub fn page_layout(styles: &ResolvedStyles) -> PageLayout {
    let d = density(styles.fit_mode);
    // padding cannot be negative on paper
    let margin_horizontal_pt = (styles.spacing.horizontal * PX_TO_PT).max(0.0);
    let margin_vertical_pt = (styles.spacing.vertical * PX_TO_PT).max(0.0);
    let line_height_pt = d.font_size_pt * d.leading;

    let text_width_pt = (PAGE_WIDTH_PT - 2.0 * margin_horizontal_pt).max(0.0);
    let text_height_pt = (PAGE_HEIGHT_PT - 2.0 * margin_vertical_pt).max(0.0);

    PageLayout {
        fit_mode: styles.fit_mode,
        font_size_pt: d.font_size_pt,
        line_height_pt,
        margin_horizontal_pt,
        margin_vertical_pt,
        text_width_em: text_width_pt / d.font_size_pt,
        usable_height_lines: (text_height_pt / line_height_pt).floor().max(1.0) as u16,
        section_gap_lines: d.section_gap_lines,
    }
}
