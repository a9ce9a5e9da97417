use serde::{Deserialize, Serialize};

/// Contact and identity block at the top of the resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// One item inside a module (a job, a degree, a skill group...).
///
/// Every field is optional because entries arrive both from the editor and from
/// generated tool results, and neither is guaranteed to be complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub bullets: Vec<String>,
}

impl ModuleEntry {
    /// True when the entry carries no visible text at all.
    pub fn is_blank(&self) -> bool {
        let fields = [
            &self.title,
            &self.subtitle,
            &self.organization,
            &self.location,
            &self.start_date,
            &self.end_date,
            &self.description,
        ];
        fields
            .iter()
            .all(|f| f.as_deref().map_or(true, |s| s.trim().is_empty()))
            && self.bullets.iter().all(|b| b.trim().is_empty())
    }
}

/// A template slot holding user content. `id` is the stable slot key and never
/// changes across merges; `title` is the logical name used for matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeModule {
    /// Rewritten from the template on every merge; documents may omit it.
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub entries: Vec<ModuleEntry>,
}

impl ResumeModule {
    pub fn has_content(&self) -> bool {
        self.entries.iter().any(|e| !e.is_blank())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    Compact,
    #[default]
    Normal,
}

impl FitMode {
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(FitMode::Compact),
            "normal" => Some(FitMode::Normal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<f32>,
}

/// Style parameters as stored on the document. Unset fields take the defaults
/// applied by `layout::styles::resolve_styles`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_mode: Option<FitMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<SpacingOverrides>,
}

/// The canonical resume. Modules always follow template order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub modules: Vec<ResumeModule>,
    #[serde(default)]
    pub styles: StyleOverrides,
}

#[cfg(test)]
impl ResumeDocument {
    pub fn module(&self, title: &str) -> Option<&ResumeModule> {
        self.modules
            .iter()
            .find(|m| crate::resume::template::titles_match(&m.title, title))
    }
}

/// A module as it arrives in an update: matched to a slot by `title` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingModule {
    pub title: String,
    #[serde(default)]
    pub entries: Vec<ModuleEntry>,
}

/// An update to apply on top of the canonical document. Absent parts keep
/// their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialResumeDocument {
    pub personal_info: Option<PersonalInfo>,
    pub modules: Vec<IncomingModule>,
    pub styles: Option<StyleOverrides>,
}

impl From<ResumeDocument> for PartialResumeDocument {
    fn from(doc: ResumeDocument) -> Self {
        Self {
            personal_info: Some(doc.personal_info),
            modules: doc
                .modules
                .into_iter()
                .map(|m| IncomingModule {
                    title: m.title,
                    entries: m.entries,
                })
                .collect(),
            styles: Some(doc.styles),
        }
    }
}
