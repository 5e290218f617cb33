use super::{expect_projection, QueryStore};
use crate::error::StoreError;
use crate::models::{Member, MemberTeamDto, NewMember, NewTeam, Team};
use crate::query_builder::{
    Entity, Field, FieldLookup, JoinType, Order, Projection, Relation, SelectQuery, Value,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Default)]
struct Tables {
    teams: Vec<Team>,
    members: Vec<Member>,
    next_team_id: i64,
    next_member_id: i64,
}

/// In-process store with PostgreSQL-like query semantics.
///
/// Rows come back in insertion order unless the query orders them. Cloning the store
/// shares the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

/// One member joined with (at most) one team
#[derive(Debug, Clone, Copy)]
struct JoinedRow<'a> {
    member: &'a Member,
    team: Option<&'a Team>,
}

impl FieldLookup for JoinedRow<'_> {
    fn lookup(&self, field: Field) -> Option<Value> {
        match field {
            Field::MemberId => Some(self.member.member_id.into()),
            Field::MemberUsername => Some(self.member.username.as_str().into()),
            Field::MemberAge => Some(self.member.age.into()),
            Field::MemberTeamId => self.member.team_id.map(Value::from),
            Field::TeamId => self.team.map(|t| t.team_id.into()),
            Field::TeamName => self.team.map(|t| t.name.as_str().into()),
        }
    }
}

impl JoinedRow<'_> {
    fn to_member_team(self) -> MemberTeamDto {
        MemberTeamDto {
            member_id: self.member.member_id,
            username: self.member.username.clone(),
            age: self.member.age,
            team_id: self.team.map(|t| t.team_id),
            team_name: self.team.map(|t| t.name.clone()),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_team(&self, new_team: NewTeam) -> Team {
        let mut tables = self.tables.write();
        tables.next_team_id += 1;
        let team = Team {
            team_id: tables.next_team_id,
            name: new_team.name,
        };
        tables.teams.push(team.clone());
        team
    }

    /// Insert a member; the referenced team, if any, must exist
    pub fn save_member(&self, new_member: NewMember) -> Result<Member, StoreError> {
        let mut tables = self.tables.write();
        if let Some(team_id) = new_member.team_id {
            if !tables.teams.iter().any(|t| t.team_id == team_id) {
                return Err(StoreError::Database(format!(
                    "foreign key violation: team {team_id} does not exist"
                )));
            }
        }
        tables.next_member_id += 1;
        let member = Member {
            member_id: tables.next_member_id,
            username: new_member.username,
            age: new_member.age,
            team_id: new_member.team_id,
        };
        tables.members.push(member.clone());
        Ok(member)
    }

    pub fn find_member(&self, member_id: i64) -> Option<Member> {
        self.tables
            .read()
            .members
            .iter()
            .find(|m| m.member_id == member_id)
            .cloned()
    }

    /// Remove a member, returning whether it existed
    pub fn delete_member(&self, member_id: i64) -> bool {
        let mut tables = self.tables.write();
        let before = tables.members.len();
        tables.members.retain(|m| m.member_id != member_id);
        tables.members.len() != before
    }

    pub fn member_count(&self) -> usize {
        self.tables.read().members.len()
    }

    fn member_teams(tables: &Tables, query: &SelectQuery) -> Result<Vec<MemberTeamDto>, StoreError> {
        expect_projection(query, Projection::MemberTeam)?;
        let rows = select_rows(tables, query)?;
        Ok(apply_window(rows, query)
            .into_iter()
            .map(JoinedRow::to_member_team)
            .collect())
    }
}

#[async_trait]
impl QueryStore for InMemoryStore {
    async fn fetch_member_teams(
        &self,
        query: &SelectQuery,
    ) -> Result<Vec<MemberTeamDto>, StoreError> {
        let tables = self.tables.read();
        Self::member_teams(&tables, query)
    }

    async fn fetch_members(&self, query: &SelectQuery) -> Result<Vec<Member>, StoreError> {
        expect_projection(query, Projection::Member)?;
        let tables = self.tables.read();
        let rows = select_rows(&tables, query)?;
        Ok(apply_window(rows, query)
            .into_iter()
            .map(|row| row.member.clone())
            .collect())
    }

    async fn count(&self, query: &SelectQuery) -> Result<u64, StoreError> {
        let tables = self.tables.read();
        let rows = select_rows(&tables, &query.count_query())?;
        trace!(joins = query.joins().len(), total = rows.len(), "in-memory count");
        Ok(rows.len() as u64)
    }

    async fn fetch_member_teams_with_count(
        &self,
        query: &SelectQuery,
    ) -> Result<(Vec<MemberTeamDto>, u64), StoreError> {
        // one guard for both reads keeps content and total on the same snapshot
        let tables = self.tables.read();
        let total = select_rows(&tables, &query.count_query())?.len() as u64;
        let content = Self::member_teams(&tables, query)?;
        Ok((content, total))
    }
}

/// Join, filter and order; the window is applied separately
fn select_rows<'a>(tables: &'a Tables, query: &SelectQuery) -> Result<Vec<JoinedRow<'a>>, StoreError> {
    if query.source() != Entity::Member {
        return Err(StoreError::InvalidQuery(format!(
            "unsupported source entity {:?}",
            query.source()
        )));
    }
    if let Some(field) = query.unjoined_field() {
        return Err(StoreError::InvalidQuery(format!(
            "{} references an entity that is not joined",
            field.column()
        )));
    }

    let mut rows = Vec::with_capacity(tables.members.len());
    'members: for member in &tables.members {
        let mut row = JoinedRow { member, team: None };
        for join in query.joins() {
            match join.relation {
                Relation::MemberTeam => {
                    row.team = member
                        .team_id
                        .and_then(|id| tables.teams.iter().find(|t| t.team_id == id));
                    if row.team.is_none() && join.join_type == JoinType::Inner {
                        continue 'members;
                    }
                }
            }
        }
        if query.where_clause().evaluate(&row) {
            rows.push(row);
        }
    }

    if !query.orders().is_empty() {
        rows.sort_by(|a, b| compare_rows(query.orders(), a, b));
    }
    Ok(rows)
}

fn compare_rows(orders: &[Order], a: &JoinedRow<'_>, b: &JoinedRow<'_>) -> Ordering {
    orders
        .iter()
        .map(|order| {
            order.compare(
                a.lookup(order.field).as_ref(),
                b.lookup(order.field).as_ref(),
            )
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn apply_window<T>(rows: Vec<T>, query: &SelectQuery) -> Vec<T> {
    let (offset, limit) = query.window();
    let offset = usize::try_from(offset.unwrap_or(0)).unwrap_or(usize::MAX);
    let limit = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
    rows.into_iter().skip(offset).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::{Condition, PageRequest};

    fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        let team_a = store.save_team(NewTeam::new("teamA"));
        store
            .save_member(NewMember::new("member1", 10, Some(team_a.team_id)))
            .unwrap();
        store.save_member(NewMember::new("loner", 25, None)).unwrap();
        store
    }

    fn member_team_query() -> SelectQuery {
        SelectQuery::from(Entity::Member)
            .select(Projection::MemberTeam)
            .left_join(Relation::MemberTeam)
    }

    #[tokio::test]
    async fn test_left_join_keeps_member_without_team() {
        let store = seeded();
        let rows = store.fetch_member_teams(&member_team_query()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].username, "loner");
        assert_eq!(rows[1].team_id, None);
        assert_eq!(rows[1].team_name, None);
    }

    #[tokio::test]
    async fn test_inner_join_drops_member_without_team() {
        let store = seeded();
        let query = SelectQuery::from(Entity::Member)
            .select(Projection::MemberTeam)
            .inner_join(Relation::MemberTeam);
        let rows = store.fetch_member_teams(&query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team_name.as_deref(), Some("teamA"));
    }

    #[tokio::test]
    async fn test_unjoined_reference_rejected() {
        let store = seeded();
        let query = SelectQuery::from(Entity::Member)
            .where_all(vec![Condition::eq(Field::TeamName, "teamA").into()]);
        let err = store.count(&query).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_wrong_projection_rejected() {
        let store = seeded();
        let err = store.fetch_members(&member_team_query()).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_combined_fetch_counts_full_set() {
        let store = seeded();
        let page = PageRequest::new(1, 1).unwrap();
        let (content, total) = store
            .fetch_member_teams_with_count(&member_team_query().page(&page))
            .await
            .unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_order_places_null_team_last_by_default() {
        let store = seeded();
        let query = member_team_query().order_by(Order::asc(Field::TeamName));
        let rows = store.fetch_member_teams(&query).await.unwrap();
        assert_eq!(rows[0].username, "member1");
        assert_eq!(rows[1].username, "loner");
    }

    #[test]
    fn test_save_member_requires_existing_team() {
        let store = InMemoryStore::new();
        let err = store
            .save_member(NewMember::new("ghost", 1, Some(42)))
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
        assert_eq!(store.member_count(), 0);
    }

    #[test]
    fn test_delete_member() {
        let store = seeded();
        assert!(store.delete_member(1));
        assert!(!store.delete_member(1));
        assert!(store.find_member(1).is_none());
        assert_eq!(store.member_count(), 1);
    }
}
