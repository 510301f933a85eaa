//! Event replay for a form session
//!
//! Reads one JSON event per line and feeds it to a [`FormStore`]. Bad
//! lines and structural errors are logged and skipped; the session keeps
//! going.

use crate::error::EngineError;
use crate::state::{FormStore, SubmitHandler, SubmitOutcome};
use crate::value::{FieldPath, FormValue};
use anyhow::Result;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// An input event raised by a UI layer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    Change { path: FieldPath, value: FormValue },
    Blur { path: FieldPath },
    Insert { path: FieldPath, index: usize, value: FormValue },
    Push { path: FieldPath, value: FormValue },
    Remove { path: FieldPath, index: usize },
    Reset,
    Submit,
}

/// Counters for a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub events: usize,
    pub skipped: usize,
    pub submitted: usize,
    pub rejected: usize,
}

/// Apply one event to the store
pub fn apply_event(
    store: &mut FormStore,
    event: FormEvent,
    handler: &mut dyn SubmitHandler,
) -> Result<Option<SubmitOutcome>, EngineError> {
    match event {
        FormEvent::Change { path, value } => store.apply_change(&path, value)?,
        FormEvent::Blur { path } => store.apply_blur(&path)?,
        FormEvent::Insert { path, index, value } => store.insert(&path, index, value)?,
        FormEvent::Push { path, value } => store.push(&path, value)?,
        FormEvent::Remove { path, index } => {
            store.remove(&path, index)?;
        }
        FormEvent::Reset => store.reset(),
        FormEvent::Submit => return Ok(Some(store.submit(handler))),
    }
    Ok(None)
}

/// Replay newline-delimited events from `reader` until end of input
pub async fn run_events<R>(
    reader: R,
    store: &mut FormStore,
    handler: &mut dyn SubmitHandler,
) -> Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = SessionSummary::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: FormEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(form_id = %store.id(), "skipping malformed event: {e}");
                summary.skipped += 1;
                continue;
            }
        };

        summary.events += 1;
        match apply_event(store, event, handler) {
            Ok(Some(SubmitOutcome::Submitted)) => summary.submitted += 1,
            Ok(Some(SubmitOutcome::Rejected { errors })) => {
                summary.rejected += 1;
                for (path, message) in &errors {
                    tracing::info!(%path, "{message}");
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(form_id = %store.id(), "event failed: {e}");
                summary.skipped += 1;
            }
        }

        let visible = store.visible_errors();
        if !visible.is_empty() {
            tracing::debug!(form_id = %store.id(), errors = ?visible, "visible errors");
        }
    }

    Ok(summary)
}
