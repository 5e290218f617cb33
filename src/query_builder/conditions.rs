use super::joins::Entity;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Columns that can be filtered, projected or ordered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    MemberId,
    MemberUsername,
    MemberAge,
    /// Foreign key held on the member row
    MemberTeamId,
    TeamId,
    TeamName,
}

impl Field {
    pub fn entity(&self) -> Entity {
        match self {
            Field::MemberId | Field::MemberUsername | Field::MemberAge | Field::MemberTeamId => {
                Entity::Member
            }
            Field::TeamId | Field::TeamName => Entity::Team,
        }
    }

    /// Qualified column reference, e.g. `m.username`
    pub fn column(&self) -> &'static str {
        match self {
            Field::MemberId => "m.member_id",
            Field::MemberUsername => "m.username",
            Field::MemberAge => "m.age",
            Field::MemberTeamId => "m.team_id",
            Field::TeamId => "t.team_id",
            Field::TeamName => "t.name",
        }
    }

    /// Output column name when the field is projected
    pub fn output_name(&self) -> &'static str {
        match self {
            Field::MemberId => "member_id",
            Field::MemberUsername => "username",
            Field::MemberAge => "age",
            Field::MemberTeamId | Field::TeamId => "team_id",
            Field::TeamName => "team_name",
        }
    }
}

/// A bound parameter value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    /// Ordering between two values of the same kind; `None` across kinds
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

/// Comparison operators supported in filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Gte,
    Lte,
}

impl Operator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Gte => ordering != Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
        }
    }
}

/// Resolves field values for one joined row
pub trait FieldLookup {
    fn lookup(&self, field: Field) -> Option<Value>;
}

/// `field <op> value`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    pub field: Field,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    pub fn eq(field: Field, value: impl Into<Value>) -> Self {
        Self {
            field,
            operator: Operator::Eq,
            value: value.into(),
        }
    }

    pub fn gte(field: Field, value: impl Into<Value>) -> Self {
        Self {
            field,
            operator: Operator::Gte,
            value: value.into(),
        }
    }

    pub fn lte(field: Field, value: impl Into<Value>) -> Self {
        Self {
            field,
            operator: Operator::Lte,
            value: value.into(),
        }
    }

    pub fn entity(&self) -> Entity {
        self.field.entity()
    }

    /// NULL (or a mismatched type) never satisfies a comparison.
    pub fn evaluate(&self, actual: Option<&Value>) -> bool {
        actual
            .and_then(|actual| actual.compare(&self.value))
            .is_some_and(|ordering| self.operator.accepts(ordering))
    }
}

/// One composable filter, or the explicit absence of one
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fragment {
    Active(Condition),
    NoOp,
}

impl Fragment {
    pub fn condition(&self) -> Option<&Condition> {
        match self {
            Fragment::Active(condition) => Some(condition),
            Fragment::NoOp => None,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Fragment::NoOp)
    }

    pub fn references(&self, entity: Entity) -> bool {
        self.condition().is_some_and(|c| c.entity() == entity)
    }

    /// Conjoin two fragments; a no-op on either side yields the other unchanged
    pub fn and(self, other: Fragment) -> WhereClause {
        WhereClause::from(self).and(other)
    }
}

impl From<Condition> for Fragment {
    fn from(condition: Condition) -> Self {
        Fragment::Active(condition)
    }
}

impl From<Option<Condition>> for Fragment {
    fn from(condition: Option<Condition>) -> Self {
        condition.map_or(Fragment::NoOp, Fragment::Active)
    }
}

/// A conjunction of conditions. Empty means "always true".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereClause {
    conditions: Vec<Condition>,
}

impl WhereClause {
    pub fn always_true() -> Self {
        Self::default()
    }

    /// AND one fragment in; `NoOp` leaves the clause untouched
    pub fn and(mut self, fragment: Fragment) -> Self {
        if let Fragment::Active(condition) = fragment {
            self.conditions.push(condition);
        }
        self
    }

    /// Conjunction of every active fragment; no-ops are elided
    pub fn all_of(fragments: impl IntoIterator<Item = Fragment>) -> Self {
        fragments
            .into_iter()
            .fold(Self::always_true(), |clause, fragment| clause.and(fragment))
    }

    /// AND two clauses together
    pub fn merge(mut self, other: WhereClause) -> Self {
        self.conditions.extend(other.conditions);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_unconstrained(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn references(&self, entity: Entity) -> bool {
        self.conditions.iter().any(|c| c.entity() == entity)
    }

    pub fn evaluate(&self, row: &impl FieldLookup) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.evaluate(row.lookup(condition.field).as_ref()))
    }
}

impl From<Fragment> for WhereClause {
    fn from(fragment: Fragment) -> Self {
        WhereClause::always_true().and(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        username: &'static str,
        age: i32,
        team_name: Option<&'static str>,
    }

    impl FieldLookup for Row {
        fn lookup(&self, field: Field) -> Option<Value> {
            match field {
                Field::MemberUsername => Some(self.username.into()),
                Field::MemberAge => Some(self.age.into()),
                Field::TeamName => self.team_name.map(Value::from),
                _ => None,
            }
        }
    }

    #[test]
    fn test_noop_is_identity_for_and() {
        let age = Fragment::from(Condition::gte(Field::MemberAge, 20));
        assert_eq!(Fragment::NoOp.and(age.clone()), WhereClause::from(age.clone()));
        assert_eq!(age.clone().and(Fragment::NoOp), WhereClause::from(age));
        assert!(Fragment::NoOp.and(Fragment::NoOp).is_unconstrained());
    }

    #[test]
    fn test_all_of_elides_noops() {
        let clause = WhereClause::all_of(vec![
            Fragment::NoOp,
            Condition::eq(Field::MemberUsername, "member1").into(),
            Fragment::NoOp,
        ]);
        assert_eq!(clause.conditions().len(), 1);
        assert!(clause.references(Entity::Member));
        assert!(!clause.references(Entity::Team));
    }

    #[test]
    fn test_evaluate_range() {
        let row = Row {
            username: "member2",
            age: 20,
            team_name: Some("teamA"),
        };
        let clause = WhereClause::always_true()
            .and(Condition::gte(Field::MemberAge, 20).into())
            .and(Condition::lte(Field::MemberAge, 35).into());
        assert!(clause.evaluate(&row));

        let too_young = WhereClause::from(Fragment::from(Condition::gte(Field::MemberAge, 21)));
        assert!(!too_young.evaluate(&row));
    }

    #[test]
    fn test_null_never_matches() {
        let row = Row {
            username: "member5",
            age: 50,
            team_name: None,
        };
        let clause = WhereClause::from(Fragment::from(Condition::eq(Field::TeamName, "teamA")));
        assert!(!clause.evaluate(&row));
        assert!(WhereClause::always_true().evaluate(&row));
    }

    #[test]
    fn test_mismatched_types_do_not_match() {
        let condition = Condition::eq(Field::MemberAge, "20");
        assert!(!condition.evaluate(Some(&Value::Int(20))));
    }

    #[test]
    fn test_field_columns() {
        assert_eq!(Field::TeamName.column(), "t.name");
        assert_eq!(Field::TeamName.output_name(), "team_name");
        assert_eq!(Field::MemberTeamId.entity(), Entity::Member);
    }
}
