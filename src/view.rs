use crate::error::{ReportError, Result};
use crate::models::ReportRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Loaded,
    Failed,
    Closed,
}

/// Handed out by `ReportView::begin`; a result is only accepted back if the
/// view has not been reset or closed since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// One report view's lifetime: at most one fetch in flight, and rows from a
/// superseded fetch never replace newer state.
#[derive(Debug)]
pub struct ReportView {
    generation: u64,
    state: ViewState,
    rows: Vec<ReportRow>,
}

impl Default for ReportView {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportView {
    pub fn new() -> Self {
        Self { generation: 0, state: ViewState::Idle, rows: Vec::new() }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn take_rows(&mut self) -> Vec<ReportRow> {
        std::mem::take(&mut self.rows)
    }

    pub fn begin(&mut self) -> Result<Ticket> {
        match self.state {
            ViewState::Loading => Err(ReportError::Busy),
            ViewState::Closed => Err(ReportError::Other("report view is closed".into())),
            _ => {
                self.reset();
                self.state = ViewState::Loading;
                Ok(Ticket { generation: self.generation })
            }
        }
    }

    /// Deliver a fetch result. Returns `Ok(false)` when the ticket is stale
    /// and the result was dropped; a fresh failure is handed back as `Err`.
    pub fn finish(&mut self, ticket: Ticket, result: Result<Vec<ReportRow>>) -> Result<bool> {
        if ticket.generation != self.generation || self.state != ViewState::Loading {
            log::warn!(
                "discarding result of superseded request {} (current {})",
                ticket.generation,
                self.generation
            );
            return Ok(false);
        }
        match result {
            Ok(rows) => {
                self.rows = rows;
                self.state = ViewState::Loaded;
                Ok(true)
            }
            Err(e) => {
                self.state = ViewState::Failed;
                Err(e)
            }
        }
    }

    /// Drop rows and invalidate any in-flight request. Every `begin` starts
    /// from a reset view.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.rows.clear();
        self.state = ViewState::Idle;
    }

    pub fn close(&mut self) {
        self.generation += 1;
        self.rows.clear();
        self.state = ViewState::Closed;
    }
}
