use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Flattened member + team search row.
///
/// Team columns are `None` for members without a team (outer join).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeamDto {
    pub member_id: i64,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
}
