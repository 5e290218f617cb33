use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Team a member may belong to
/// Maps to `team` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub team_id: i64,
    pub name: String,
}

/// New Team for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
}

impl NewTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Team {
    /// Create a new team
    pub async fn create(pool: &PgPool, new_team: NewTeam) -> Result<Team, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO team (name)
            VALUES ($1)
            RETURNING team_id, name
            "#,
        )
        .bind(new_team.name)
        .fetch_one(pool)
        .await
    }

    /// Find a team by name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Team>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT team_id, name
            FROM team
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }
}
