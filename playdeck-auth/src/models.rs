use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Scheme name used for bare single-hash rows and as the registration default.
pub const LEGACY_SCHEME: &str = "classic";

/// Account role. Defaults to `User`; `Admin` and `Moderator` gate the
/// management endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Moderator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Moderator => "moderator",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
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
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Scheme name to bcrypt hash. `BTreeMap` keeps iteration order lexicographic
/// so the reported matched scheme is reproducible across storage backends.
pub type CredentialMap = BTreeMap<String, String>;

/// Stored credential shape at the storage boundary.
///
/// Legacy rows carry a bare hash string; everything written by this code is
/// a scheme map. Serialized untagged so both shapes round-trip through the
/// JSONB column unchanged. Normalized to `Schemes` on first write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredCredentials {
    Schemes(CredentialMap),
    Legacy(String),
}

impl StoredCredentials {
    pub fn empty() -> Self {
        StoredCredentials::Schemes(CredentialMap::new())
    }

    /// Upgrade to the scheme-map representation, folding a legacy hash in
    /// under the `classic` scheme.
    pub fn normalized(self) -> CredentialMap {
        match self {
            StoredCredentials::Schemes(map) => map,
            StoredCredentials::Legacy(hash) => {
                let mut map = CredentialMap::new();
                map.insert(LEGACY_SCHEME.to_string(), hash);
                map
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            StoredCredentials::Schemes(map) => map.is_empty(),
            StoredCredentials::Legacy(_) => false,
        }
    }
}

impl Default for StoredCredentials {
    fn default() -> Self {
        Self::empty()
    }
}

/// Full user record as persisted. Carries credential hashes; never leaves
/// the service layer. Handlers see [`UserProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Base64 of 16 random bytes, generated at first-credential-creation and
    /// reused for every scheme's hash. Absent only on legacy/seed rows.
    pub salt: Option<String>,
    pub credentials: StoredCredentials,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user: everything except salt and credential hashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Identity established by a successful login, including which credential
/// scheme verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub scheme: String,
}

/// Whether a credential write created a new scheme entry or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialUpdate {
    Added,
    Updated,
}

impl CredentialUpdate {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialUpdate::Added => "added",
            CredentialUpdate::Updated => "updated",
        }
    }
}
