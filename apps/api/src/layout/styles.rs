//! Style resolution: turns the optional overrides stored on a document into
//! the fully-specified parameters the pagination/export side consumes.
//!
//! `resolve_styles` only fills in defaults: it is total over any input and
//! idempotent. A non-finite spacing value (which JSON cannot carry back out)
//! takes the default; finite values pass through unchanged.

use serde::{Deserialize, Serialize};

use crate::models::resume::{FitMode, SpacingOverrides, StyleOverrides};

pub const DEFAULT_SPACING: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSpacing {
    pub horizontal: f32,
    pub vertical: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyles {
    pub fit_mode: FitMode,
    pub spacing: ResolvedSpacing,
}

impl Default for ResolvedStyles {
    fn default() -> Self {
        resolve_styles(&StyleOverrides::default())
    }
}

impl From<ResolvedStyles> for StyleOverrides {
    fn from(resolved: ResolvedStyles) -> Self {
        StyleOverrides {
            fit_mode: Some(resolved.fit_mode),
            spacing: Some(SpacingOverrides {
                horizontal: Some(resolved.spacing.horizontal),
                vertical: Some(resolved.spacing.vertical),
            }),
        }
    }
}

pub fn resolve_styles(partial: &StyleOverrides) -> ResolvedStyles {
    let spacing = partial.spacing.unwrap_or_default();
    ResolvedStyles {
        fit_mode: partial.fit_mode.unwrap_or_default(),
        spacing: ResolvedSpacing {
            horizontal: normalize_spacing(spacing.horizontal),
            vertical: normalize_spacing(spacing.vertical),
        },
    }
}

fn normalize_spacing(value: Option<f32>) -> f32 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => DEFAULT_SPACING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spacing(h: Option<f32>, v: Option<f32>) -> Option<SpacingOverrides> {
        Some(SpacingOverrides {
            horizontal: h,
            vertical: v,
        })
    }

    #[test]
    fn test_empty_overrides_take_defaults() {
        let resolved = resolve_styles(&StyleOverrides::default());
        assert_eq!(resolved.fit_mode, FitMode::Normal);
        assert_eq!(
            resolved.spacing,
            ResolvedSpacing {
                horizontal: 30.0,
                vertical: 30.0
            }
        );
    }

    #[test]
    fn test_compact_only() {
        let resolved = resolve_styles(&StyleOverrides {
            fit_mode: Some(FitMode::Compact),
            spacing: None,
        });
        assert_eq!(
            resolved,
            ResolvedStyles {
                fit_mode: FitMode::Compact,
                spacing: ResolvedSpacing {
                    horizontal: 30.0,
                    vertical: 30.0
                },
            }
        );
    }

    #[test]
    fn test_axes_default_independently() {
        let resolved = resolve_styles(&StyleOverrides {
            fit_mode: None,
            spacing: spacing(Some(12.0), None),
        });
        assert_eq!(resolved.spacing.horizontal, 12.0);
        assert_eq!(resolved.spacing.vertical, 30.0);
    }

    #[test]
    fn test_non_finite_spacing_takes_default() {
        let resolved = resolve_styles(&StyleOverrides {
            fit_mode: None,
            spacing: spacing(Some(f32::NAN), Some(f32::INFINITY)),
        });
        assert_eq!(resolved.spacing.horizontal, DEFAULT_SPACING);
        assert_eq!(resolved.spacing.vertical, DEFAULT_SPACING);
    }

    #[test]
    fn test_finite_spacing_passes_through() {
        let resolved = resolve_styles(&StyleOverrides {
            fit_mode: None,
            spacing: spacing(Some(200.0), Some(-5.0)),
        });
        assert_eq!(resolved.spacing.horizontal, 200.0);
        assert_eq!(resolved.spacing.vertical, -5.0);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let inputs = [
            StyleOverrides::default(),
            StyleOverrides {
                fit_mode: Some(FitMode::Compact),
                spacing: None,
            },
            StyleOverrides {
                fit_mode: None,
                spacing: spacing(Some(-1.0), Some(500.0)),
            },
            StyleOverrides {
                fit_mode: Some(FitMode::Normal),
                spacing: spacing(None, Some(f32::NAN)),
            },
        ];
        for input in inputs {
            let once = resolve_styles(&input);
            let twice = resolve_styles(&StyleOverrides::from(once));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_resolved_wire_format() {
        let json = serde_json::to_value(ResolvedStyles::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fitMode": "normal",
                "spacing": { "horizontal": 30.0, "vertical": 30.0 }
            })
        );
    }
}
