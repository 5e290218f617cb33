/// Stored entities the search engine knows how to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Member,
    Team,
}

impl Entity {
    pub fn table(&self) -> &'static str {
        match self {
            Entity::Member => "member",
            Entity::Team => "team",
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            Entity::Member => "m",
            Entity::Team => "t",
        }
    }

    /// `table alias` as it appears in a FROM or JOIN clause
    pub fn table_ref(&self) -> String {
        format!("{} {}", self.table(), self.alias())
    }
}

/// Declared relationships between entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// member.team_id -> team.team_id (many-to-one, optional)
    MemberTeam,
}

impl Relation {
    pub fn source(&self) -> Entity {
        match self {
            Relation::MemberTeam => Entity::Member,
        }
    }

    pub fn target(&self) -> Entity {
        match self {
            Relation::MemberTeam => Entity::Team,
        }
    }

    /// Many-to-one relations never multiply rows of the source entity
    pub fn is_many_to_one(&self) -> bool {
        match self {
            Relation::MemberTeam => true,
        }
    }

    pub fn on_condition(&self) -> &'static str {
        match self {
            Relation::MemberTeam => "t.team_id = m.team_id",
        }
    }
}

/// Represents different types of joins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

/// A join along a declared relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Join {
    pub join_type: JoinType,
    pub relation: Relation,
}

impl Join {
    /// Create an INNER JOIN
    pub fn inner(relation: Relation) -> Self {
        Self {
            join_type: JoinType::Inner,
            relation,
        }
    }

    /// Create a LEFT (outer) JOIN
    pub fn left(relation: Relation) -> Self {
        Self {
            join_type: JoinType::Left,
            relation,
        }
    }

    pub fn target(&self) -> Entity {
        self.relation.target()
    }

    /// A left join along a many-to-one relation keeps every source row exactly once,
    /// so it can be removed from a count when nothing filters on the joined side.
    pub fn preserves_cardinality(&self) -> bool {
        self.join_type == JoinType::Left && self.relation.is_many_to_one()
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        format!(
            "{} {} ON {}",
            self.join_type.to_sql(),
            self.target().table_ref(),
            self.relation.on_condition()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_join() {
        let join = Join::left(Relation::MemberTeam);
        assert_eq!(join.to_sql(), "LEFT JOIN team t ON t.team_id = m.team_id");
        assert!(join.preserves_cardinality());
    }

    #[test]
    fn test_inner_join() {
        let join = Join::inner(Relation::MemberTeam);
        assert_eq!(join.to_sql(), "INNER JOIN team t ON t.team_id = m.team_id");
        assert!(!join.preserves_cardinality());
    }

    #[test]
    fn test_relation_endpoints() {
        assert_eq!(Relation::MemberTeam.source(), Entity::Member);
        assert_eq!(Relation::MemberTeam.target(), Entity::Team);
        assert_eq!(Entity::Member.table_ref(), "member m");
    }
}
