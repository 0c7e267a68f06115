use serde::{Deserialize, Serialize};

/// Hard failures. Everything else in the pipeline is isolated per entity or
/// per degradation and reported rather than raised.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Rejected at configuration-load time, before any entity is processed.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

impl AnalysisError {
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Why an entity produced no detection output for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The entity had zero usable samples.
    InsufficientData,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientData => "insufficient_data",
        }
    }
}

/// An entity excluded from detection, with the reason. Consumers must be able
/// to distinguish "no alarms found" from "entity skipped".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntity {
    pub entity_id: String,
    pub reason: SkipReason,
}
