// Style and layout resolution.
// Implements: style defaults, concrete page parameters per fit mode, page fill estimate.
// Everything here is a pure function of resolved styles and a document snapshot.

pub mod fill;
pub mod page;
pub mod styles;

// Re-export the public API consumed by the sync engine and handlers.
pub use fill::{estimate_fill, suggest_fit_mode, FillEstimate};
pub use page::{page_layout, PageLayout};
pub use styles::{resolve_styles, ResolvedStyles};
