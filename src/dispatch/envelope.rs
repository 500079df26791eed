//! Uniform result of a dispatch.

use std::fmt;

use serde::Serialize;

/// Status reported when no replica answered in time.
pub const UNAVAILABLE_STATUS: u16 = 503;

/// Abbreviated response handed back to the caller of a dispatch.
///
/// `present` is false iff no replica succeeded before the deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope {
    pub body: String,
    pub status: u16,
    pub present: bool,
}

impl ResponseEnvelope {
    /// A 200 answer carrying the winning replica's body.
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: 200,
            present: true,
        }
    }

    /// Whatever a single replica answered, successful or not.
    pub fn answered(status: u16, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status,
            present: status == 200,
        }
    }

    /// The well-defined answer when every replica failed or the deadline passed.
    pub fn unavailable() -> Self {
        Self {
            body: String::new(),
            status: UNAVAILABLE_STATUS,
            present: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.present && self.status == 200
    }
}

impl fmt::Display for ResponseEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self.body, self.status)
    }
}
