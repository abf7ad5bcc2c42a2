use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The role a user account holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can write reviews.
    #[default]
    User,
    /// Can publish one bootcamp and its courses.
    Publisher,
    /// Unrestricted.
    Admin,
}

impl Role {
    /// Roles a caller may pick for themselves when registering.
    pub const SELF_ASSIGNABLE: [Role; 2] = [Role::User, Role::Publisher];

    /// The lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Publisher => "publisher",
            Role::Admin => "admin",
        }
    }

    /// Returns true for [`Role::Admin`].
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "publisher" => Ok(Role::Publisher),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}
