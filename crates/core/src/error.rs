// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use event_tickets_domain::DomainError;

/// Errors raised by the availability core.
///
/// Availability outcomes are never errors. Only malformed configuration and
/// invalid catalog state surface here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Sale configuration could not be loaded. Fatal at startup.
    Configuration(DomainError),
    /// A domain rule was violated.
    DomainViolation(DomainError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(err) => write!(f, "Configuration error: {err}"),
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(err) | Self::DomainViolation(err) => Some(err),
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
