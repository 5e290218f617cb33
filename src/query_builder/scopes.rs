use super::conditions::{Condition, Field, Fragment, WhereClause};
use crate::search::MemberSearchCondition;

/// Member search predicates.
///
/// Each scope maps one optional input to a fragment and returns `Fragment::NoOp` when
/// the input is absent, so callers can pass every scope unconditionally and let the
/// conjunction skip the empty ones.
pub struct MemberScopes;

impl MemberScopes {
    /// `member.username = ?` when the username has text
    pub fn username_eq(username: Option<&str>) -> Fragment {
        has_text(username)
            .map(|username| Condition::eq(Field::MemberUsername, username))
            .into()
    }

    /// `team.name = ?` when the team name has text. Needs the team join.
    pub fn team_name_eq(team_name: Option<&str>) -> Fragment {
        has_text(team_name)
            .map(|team_name| Condition::eq(Field::TeamName, team_name))
            .into()
    }

    /// `member.age >= ?`
    pub fn age_goe(age: Option<i32>) -> Fragment {
        age.map(|age| Condition::gte(Field::MemberAge, age)).into()
    }

    /// `member.age <= ?`
    pub fn age_loe(age: Option<i32>) -> Fragment {
        age.map(|age| Condition::lte(Field::MemberAge, age)).into()
    }

    /// Inclusive age range; either bound may be absent
    pub fn age_between(age_goe: Option<i32>, age_loe: Option<i32>) -> WhereClause {
        Self::age_goe(age_goe).and(Self::age_loe(age_loe))
    }

    /// One fragment per search field, in field order, absent ones as `NoOp`
    pub fn fragments(condition: &MemberSearchCondition) -> Vec<Fragment> {
        vec![
            Self::username_eq(condition.username()),
            Self::team_name_eq(condition.team_name()),
            Self::age_goe(condition.age_goe()),
            Self::age_loe(condition.age_loe()),
        ]
    }

    /// Build the filter by folding each active field into an always-true clause
    pub fn accumulate(condition: &MemberSearchCondition) -> WhereClause {
        let mut clause = WhereClause::always_true();
        if let Some(username) = has_text(condition.username()) {
            clause = clause.and(Condition::eq(Field::MemberUsername, username).into());
        }
        if let Some(team_name) = has_text(condition.team_name()) {
            clause = clause.and(Condition::eq(Field::TeamName, team_name).into());
        }
        if let Some(age) = condition.age_goe() {
            clause = clause.and(Condition::gte(Field::MemberAge, age).into());
        }
        if let Some(age) = condition.age_loe() {
            clause = clause.and(Condition::lte(Field::MemberAge, age).into());
        }
        clause
    }
}

/// `None`, empty and whitespace-only strings carry no search text
fn has_text(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::joins::Entity;

    #[test]
    fn test_empty_condition_is_unconstrained() {
        let condition = MemberSearchCondition::default();
        let fragments = MemberScopes::fragments(&condition);
        assert_eq!(fragments.len(), 4);
        assert!(fragments.iter().all(Fragment::is_noop));
        assert!(MemberScopes::accumulate(&condition).is_unconstrained());
    }

    #[test]
    fn test_blank_strings_are_noops() {
        for blank in ["", "   ", "\t\n"] {
            assert!(MemberScopes::username_eq(Some(blank)).is_noop());
            assert!(MemberScopes::team_name_eq(Some(blank)).is_noop());
        }
        assert!(MemberScopes::username_eq(None).is_noop());
    }

    #[test]
    fn test_text_is_compared_verbatim() {
        let fragment = MemberScopes::username_eq(Some(" member1 "));
        assert_eq!(
            fragment,
            Fragment::Active(Condition::eq(Field::MemberUsername, " member1 "))
        );
    }

    #[test]
    fn test_team_name_fragment_references_team() {
        assert!(MemberScopes::team_name_eq(Some("teamA")).references(Entity::Team));
        assert!(!MemberScopes::age_goe(Some(10)).references(Entity::Team));
    }

    #[test]
    fn test_strategies_agree() {
        let condition = MemberSearchCondition::new()
            .with_username("  ")
            .with_team_name("teamB")
            .with_age_loe(35);
        let from_fragments = WhereClause::all_of(MemberScopes::fragments(&condition));
        assert_eq!(from_fragments, MemberScopes::accumulate(&condition));
        assert_eq!(from_fragments.conditions().len(), 2);
    }

    #[test]
    fn test_age_between_tolerates_missing_bound() {
        assert_eq!(MemberScopes::age_between(Some(20), None).conditions().len(), 1);
        assert_eq!(MemberScopes::age_between(Some(20), Some(35)).conditions().len(), 2);
        assert!(MemberScopes::age_between(None, None).is_unconstrained());
    }

    #[test]
    fn test_contradictory_bounds_are_accepted() {
        let clause = MemberScopes::age_between(Some(40), Some(10));
        assert_eq!(clause.conditions().len(), 2);
    }
}
