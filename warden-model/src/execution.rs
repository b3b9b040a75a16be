use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Privilege tier of a dispatch attempt, ordered from least to most privileged.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionType {
    #[default]
    Regular,
    Admin,
    Owner,
}

impl ExecutionType {
    /// Admin and owner tiers skip blacklists, ignores, user permissions and cooldowns.
    pub fn is_elevated(self) -> bool {
        self >= Self::Admin
    }
}

impl Display for ExecutionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Regular => f.write_str("REGULAR"),
            Self::Admin => f.write_str("ADMIN"),
            Self::Owner => f.write_str("OWNER"),
        }
    }
}

/// Which gate, if any, refused a dispatch attempt.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    #[default]
    NoError,
    Cooldown,
    InvalidUsage,
    InvalidPermissionsBot,
    InvalidPermissionsUser,
}

impl ExecutionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoError => "NO_ERROR",
            Self::Cooldown => "COOLDOWN",
            Self::InvalidUsage => "INVALID_USAGE",
            Self::InvalidPermissionsBot => "INVALID_PERMISSIONS_BOT",
            Self::InvalidPermissionsUser => "INVALID_PERMISSIONS_USER",
        }
    }
}

impl Display for ExecutionState {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
