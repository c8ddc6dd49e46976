//! Structured observability hooks for triage lifecycle events.
//!
//! Events are emitted at `info!` level (filter with `RUST_LOG`). Pass
//! `--log-json` to the CLI for JSON output.

use tracing::info;

/// RAII guard that enters a ticket-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = TicketSpan::enter("BOOKS-1234");
/// // tracing calls below carry ticket = "BOOKS-1234"
/// ```
pub struct TicketSpan {
    _span: tracing::span::EnteredSpan,
}

impl TicketSpan {
    pub fn enter(ticket: &str) -> Self {
        let span = tracing::info_span!("triage.ticket", ticket = %ticket);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: ticket classified.
pub fn emit_ticket_classified(ticket_type: &str, confidence: f64) {
    info!(
        event = "ticket.classified",
        ticket_type = %ticket_type,
        confidence = confidence,
    );
}

/// Emit event: eligibility assessed for a CODE_CHANGE ticket.
pub fn emit_eligibility_assessed(eligible: bool, confidence: f64, disqualifiers: usize) {
    info!(
        event = "eligibility.assessed",
        eligible = eligible,
        confidence = confidence,
        disqualifiers = disqualifiers,
    );
}

/// Emit event: a verification stage finished.
pub fn emit_verification_stage_finished(stage: &str, exit_code: i32, duration_ms: u64) {
    info!(
        event = "verification.stage_finished",
        stage = %stage,
        exit_code = exit_code,
        duration_ms = duration_ms,
    );
}

/// Emit event: a verification command timed out (warning level).
pub fn emit_verification_timeout(stage: &str, timeout_secs: u64) {
    tracing::warn!(
        event = "verification.timeout",
        stage = %stage,
        timeout_secs = timeout_secs,
    );
}

/// Emit event: repository config loaded from disk.
pub fn emit_config_loaded(path: &str) {
    info!(event = "config.loaded", path = %path);
}
