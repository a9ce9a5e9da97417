//! The synchronization engine: sole owner of one session's canonical resume.
//!
//! Tool results from the chat stream and edits from the editor both enter
//! through `&mut self` methods, so a single engine is a single writer. Readers
//! get `Arc<ResumeDocument>` snapshots; every applied change swaps in a new
//! snapshot and bumps `revision`, so holders of an old snapshot can tell it is
//! stale by pointer or by revision.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::context::versioning::ContextHistory;
use crate::layout::{
    estimate_fill, page_layout, resolve_styles, suggest_fit_mode, FillEstimate, PageLayout,
    ResolvedStyles,
};
use crate::models::context::ConversationContext;
use crate::models::resume::{FitMode, PartialResumeDocument, ResumeDocument};
use crate::models::tool::{InvocationIdentity, ToolName, ToolResultEvent};
use crate::resume::completeness::{compute_completion_report, score, CompletionReport};
use crate::resume::merge::{merge, merge_with_report, MergeReport};
use crate::resume::template::default_document;
use crate::sync::dedup::InvocationLedger;
use crate::sync::payload::{decode_context_update, decode_resume_update, ResumeUpdate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The invocation was already applied.
    Duplicate,
    /// The invocation has not produced its result yet.
    NotTerminal,
    UnknownTool,
    /// The tool reported failure.
    Unsuccessful,
    Malformed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApplyOutcome {
    ResumeUpdated { revision: u64, report: MergeReport },
    ContextRecorded { context: ConversationContext },
    Skipped { reason: SkipReason },
}

impl ApplyOutcome {
    fn skipped(reason: SkipReason) -> Self {
        ApplyOutcome::Skipped { reason }
    }
}

/// Everything the preview/PDF pipeline needs to lay out one revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub revision: u64,
    pub document: ResumeDocument,
    pub styles: ResolvedStyles,
    pub layout: PageLayout,
    pub fill: FillEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fit_mode: Option<FitMode>,
}

#[derive(Debug)]
pub struct SyncEngine {
    document: Arc<ResumeDocument>,
    revision: u64,
    ledger: InvocationLedger,
    contexts: ContextHistory,
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new(default_document())
    }
}

/// Rebuilds `doc` on top of the template: slots are put in template order,
/// missing slots are restored, unknown modules are dropped.
pub fn normalize(doc: ResumeDocument) -> ResumeDocument {
    merge(&default_document(), &PartialResumeDocument::from(doc))
}

impl SyncEngine {
    pub fn new(initial: ResumeDocument) -> Self {
        Self {
            document: Arc::new(normalize(initial)),
            revision: 0,
            ledger: InvocationLedger::new(),
            contexts: ContextHistory::new(),
        }
    }

    pub fn snapshot(&self) -> Arc<ResumeDocument> {
        Arc::clone(&self.document)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contexts(&self) -> &ContextHistory {
        &self.contexts
    }

    pub fn applied_invocations(&self) -> usize {
        self.ledger.len()
    }

    /// Applies one event from the chat stream. Never fails: anything that
    /// cannot be applied is reported as `Skipped` and leaves state untouched.
    pub fn apply_event(&mut self, event: &ToolResultEvent) -> ApplyOutcome {
        if !event.is_terminal() {
            return ApplyOutcome::skipped(SkipReason::NotTerminal);
        }
        if event.tool_name == ToolName::Other {
            debug!("Ignoring result of unknown tool (call {})", event.tool_call_id);
            return ApplyOutcome::skipped(SkipReason::UnknownTool);
        }

        let identity = event.identity();
        if !self.ledger.should_apply(&identity) {
            debug!(
                "Skipping duplicate delivery of {}/{}",
                identity.message_id, identity.tool_call_id
            );
            return ApplyOutcome::skipped(SkipReason::Duplicate);
        }

        match event.tool_name {
            ToolName::UpdateResume => self.apply_resume_result(&identity, event),
            ToolName::GenerateContext => self.apply_context_result(&identity, event),
            ToolName::Other => ApplyOutcome::skipped(SkipReason::UnknownTool),
        }
    }

    fn apply_resume_result(
        &mut self,
        identity: &InvocationIdentity,
        event: &ToolResultEvent,
    ) -> ApplyOutcome {
        match decode_resume_update(event.result.as_ref()) {
            Ok(ResumeUpdate::Apply { data, timestamp }) => {
                match timestamp {
                    Some(ts) => debug!(
                        "Applying resume update {}/{} generated at {ts}",
                        identity.message_id, identity.tool_call_id
                    ),
                    None => debug!(
                        "Applying resume update {}/{} (no timestamp)",
                        identity.message_id, identity.tool_call_id
                    ),
                }
                let report = self.update_document(&data);
                ApplyOutcome::ResumeUpdated {
                    revision: self.revision,
                    report,
                }
            }
            Ok(ResumeUpdate::Unsuccessful) => {
                info!(
                    "Resume update {}/{} reported failure; document unchanged",
                    identity.message_id, identity.tool_call_id
                );
                ApplyOutcome::skipped(SkipReason::Unsuccessful)
            }
            Err(e) => {
                warn!(
                    "Dropping malformed resume update {}/{}: {e}",
                    identity.message_id, identity.tool_call_id
                );
                ApplyOutcome::skipped(SkipReason::Malformed {
                    reason: e.to_string(),
                })
            }
        }
    }

    fn apply_context_result(
        &mut self,
        identity: &InvocationIdentity,
        event: &ToolResultEvent,
    ) -> ApplyOutcome {
        match decode_context_update(event.result.as_ref()) {
            Ok(update) => {
                let context = self.contexts.record(update.summary, update.timestamp);
                info!(
                    "Recorded context {} ({} in history)",
                    context.id,
                    self.contexts.len()
                );
                ApplyOutcome::ContextRecorded { context }
            }
            Err(e) => {
                warn!(
                    "Dropping malformed context update {}/{}: {e}",
                    identity.message_id, identity.tool_call_id
                );
                ApplyOutcome::skipped(SkipReason::Malformed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Editor entry point: merges a partial document into the canonical one.
    pub fn update_document(&mut self, partial: &PartialResumeDocument) -> MergeReport {
        let (merged, report) = merge_with_report(&self.document, partial);
        self.document = Arc::new(merged);
        self.revision += 1;
        if report.is_noop() {
            debug!("Document revision {}: update changed nothing", self.revision);
        }
        self.log_revision(&report);
        report
    }

    /// Replaces the document with an imported one (e.g. from a file). The
    /// template only decides which slots are legal: nothing from the current
    /// document survives the import.
    pub fn import_document(&mut self, document: ResumeDocument) -> MergeReport {
        let (imported, report) =
            merge_with_report(&default_document(), &PartialResumeDocument::from(document));
        self.document = Arc::new(imported);
        self.revision += 1;
        self.log_revision(&report);
        report
    }

    fn log_revision(&self, report: &MergeReport) {
        let (percentage, status) = score(&self.document);
        info!(
            "Document revision {}: updated slots {:?}, dropped {:?}, completion {percentage}% ({status:?})",
            self.revision, report.updated_slots, report.dropped_titles
        );
    }

    pub fn reset(&mut self) {
        self.document = Arc::new(default_document());
        self.revision += 1;
        info!("Document reset to template at revision {}", self.revision);
    }

    pub fn completion(&self) -> CompletionReport {
        compute_completion_report(&self.document)
    }

    pub fn resolved_styles(&self) -> ResolvedStyles {
        resolve_styles(&self.document.styles)
    }

    pub fn export_bundle(&self) -> ExportBundle {
        let styles = self.resolved_styles();
        let layout = page_layout(&styles);
        ExportBundle {
            revision: self.revision,
            document: (*self.document).clone(),
            styles,
            layout,
            fill: estimate_fill(&self.document, &layout),
            suggested_fit_mode: suggest_fit_mode(&self.document, &styles),
        }
    }
}
