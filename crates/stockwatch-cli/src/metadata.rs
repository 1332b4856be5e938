use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use stockwatch_core::ProviderId;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::CliError;

/// Request identifier (UUID v4) attached to every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Response metadata. Field order is fixed so JSON output is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meta {
    pub request_id: RequestId,
    pub generated_at: String,
    pub source: ProviderId,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Meta {
    pub fn new(source: ProviderId, latency_ms: u64) -> Result<Self, CliError> {
        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|error| CliError::Command(format!("failed to format timestamp: {error}")))?;

        Ok(Self {
            request_id: RequestId::new_v4(),
            generated_at,
            source,
            latency_ms,
            warnings: Vec::new(),
        })
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// `{meta, data}` wrapper printed for every successful command.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub meta: Meta,
    pub data: T,
}
