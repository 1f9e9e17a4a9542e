use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    /// Profile ID
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Default model for new conversations
    #[serde(default)]
    pub preferred_model: Option<String>,
    /// Supabase integration token for database tools
    #[serde(default)]
    pub supabase_access_token: Option<String>,
    /// Supabase project the tools operate on
    #[serde(default)]
    pub supabase_project_ref: Option<String>,
    /// Whether database tools are restricted to reads
    #[serde(default)]
    pub supabase_read_only: Option<bool>,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
    /// When the profile was last modified
    pub updated_at: DateTime<Utc>,
}

/// Partial update for the user profile. Unset fields are left unchanged
/// and omitted from the request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase_access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase_project_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase_read_only: Option<bool>,
}

impl ProfilePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new display name (builder pattern).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a new preferred model (builder pattern).
    pub fn preferred_model(mut self, model: impl Into<String>) -> Self {
        self.preferred_model = Some(model.into());
        self
    }
}
