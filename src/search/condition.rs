use serde::{Deserialize, Serialize};

/// Optional member search fields: username, team name, and an age range (inclusive).
///
/// Any subset is valid, including none. Absent fields impose no constraint, and so do
/// blank strings. Built once per request and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberSearchCondition {
    username: Option<String>,
    team_name: Option<String>,
    age_goe: Option<i32>,
    age_loe: Option<i32>,
}

impl MemberSearchCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    /// Lower age bound (age >= value)
    pub fn with_age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    /// Upper age bound (age <= value)
    pub fn with_age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn team_name(&self) -> Option<&str> {
        self.team_name.as_deref()
    }

    pub fn age_goe(&self) -> Option<i32> {
        self.age_goe
    }

    pub fn age_loe(&self) -> Option<i32> {
        self.age_loe
    }
}
