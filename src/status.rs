//! Canonical lifecycle status vocabulary shared by all backends.

use std::fmt;

/// Normalized instance status.
///
/// Only the provider state `running` is remapped, to [`HostStatus::Active`];
/// every other provider state passes through verbatim so callers can still
/// observe provider specific phases such as `pending` or `terminated`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HostStatus {
    /// The instance is running and able to carry tunnel traffic.
    Active,
    /// Any other provider reported state, unchanged.
    Provider(String),
}

impl HostStatus {
    /// Normalizes a provider-native state string. Total over any input;
    /// unknown states pass through rather than failing.
    #[must_use]
    pub fn from_provider(state: &str) -> Self {
        if state == "running" {
            Self::Active
        } else {
            Self::Provider(state.to_owned())
        }
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Provider(state) => state.as_str(),
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
