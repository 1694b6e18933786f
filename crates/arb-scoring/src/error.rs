//! Scoring errors

/// Errors resolving or scoring a run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    /// Venue not in the configuration
    #[error("venue '{0}' does not exist")]
    UnknownVenue(String),

    /// Event not in the venue
    #[error("event '{event}' does not exist in venue '{venue}'")]
    UnknownEvent {
        /// Venue name
        venue: String,
        /// Event name
        event: String,
    },

    /// No rule covers the run
    #[error("no scoring rule for {division}/{level} in '{event}' on {date}")]
    NoRule {
        /// Event name
        event: String,
        /// Division name
        division: String,
        /// Level (leaf) name
        level: String,
        /// Run date, or "any date"
        date: String,
    },

    /// Venue selects a speed-point formula nobody registered
    #[error("unknown speed-point formula '{0}'")]
    UnknownFormula(String),
}
