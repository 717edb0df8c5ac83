use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Tenant that owns every other record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Member,
}

/// The two canonical household profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profile {
    Husband,
    Wife,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Husband, Profile::Wife];

    pub fn label(self) -> &'static str {
        match self {
            Profile::Husband => "Husband",
            Profile::Wife => "Wife",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Profile::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn default_role(self) -> UserRole {
        match self {
            Profile::Husband => UserRole::Admin,
            Profile::Wife => UserRole::Member,
        }
    }

    pub fn default_color(self) -> &'static str {
        match self {
            Profile::Husband => "#2563eb",
            Profile::Wife => "#db2777",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    pub role: UserRole,
    pub profile: Option<String>,
    pub color: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// A user stands for a profile if either its profile label or its name matches.
    pub fn matches_profile(&self, profile: Profile) -> bool {
        self.profile.as_deref() == Some(profile.label()) || self.name == profile.label()
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

/// Assignee as embedded in task and checklist views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub household_id: Uuid,
    pub name: String,
    pub role: UserRole,
    pub profile: Option<String>,
    pub color: Option<String>,
}

impl NewUser {
    pub fn for_profile(household_id: Uuid, profile: Profile) -> Self {
        Self {
            household_id,
            name: profile.label().to_string(),
            role: profile.default_role(),
            profile: Some(profile.label().to_string()),
            color: Some(profile.default_color().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub color: Option<String>,
}
