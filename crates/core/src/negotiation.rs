//! Negotiation recommendation types

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Priority of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Tip,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Tip,
    ];

    /// Prefix used when a point is rendered as plain text
    pub fn marker(&self) -> &'static str {
        match self {
            Severity::Critical => "🚨 CRITICAL: ",
            Severity::High => "🔴 HIGH PRIORITY: ",
            Severity::Medium => "🟡 MEDIUM PRIORITY: ",
            Severity::Low => "🟢 ",
            Severity::Tip => "💡 TIP: ",
        }
    }
}

/// One severity-tagged recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NegotiationPoint {
    pub severity: Severity,
    pub message: String,
}

impl NegotiationPoint {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Recover a point from its rendered form
    ///
    /// Text without a known marker is treated as a medium-priority point.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        for severity in Severity::ALL {
            if let Some(rest) = trimmed.strip_prefix(severity.marker()) {
                return Self::new(severity, rest.trim());
            }
        }
        Self::new(Severity::Medium, trimmed)
    }
}

impl fmt::Display for NegotiationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.severity.marker(), self.message)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Text(String),
    Tagged { severity: Severity, message: String },
}

impl<'de> Deserialize<'de> for NegotiationPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match PointRepr::deserialize(deserializer)? {
            PointRepr::Text(text) => NegotiationPoint::parse(&text),
            PointRepr::Tagged { severity, message } => NegotiationPoint::new(severity, message),
        })
    }
}
