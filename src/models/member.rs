use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Member record
/// Maps to `member` table; `team_id` is an optional many-to-one link to `team`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub member_id: i64,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i64>,
}

/// New Member for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    pub username: String,
    pub age: i32,
    pub team_id: Option<i64>,
}

impl NewMember {
    pub fn new(username: impl Into<String>, age: i32, team_id: Option<i64>) -> Self {
        Self {
            username: username.into(),
            age,
            team_id,
        }
    }
}

impl Member {
    /// Create a new member
    pub async fn create(pool: &PgPool, new_member: NewMember) -> Result<Member, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO member (username, age, team_id)
            VALUES ($1, $2, $3)
            RETURNING member_id, username, age, team_id
            "#,
        )
        .bind(new_member.username)
        .bind(new_member.age)
        .bind(new_member.team_id)
        .fetch_one(pool)
        .await
    }

    /// Find a member by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Member>, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            r#"
            SELECT member_id, username, age, team_id
            FROM member
            WHERE member_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Find members by exact username
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Vec<Member>, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            r#"
            SELECT member_id, username, age, team_id
            FROM member
            WHERE username = $1
            ORDER BY member_id
            "#,
        )
        .bind(username)
        .fetch_all(pool)
        .await
    }
}
