use super::conditions::{Field, Fragment, WhereClause};
use super::joins::{Entity, Join, Relation};
use super::ordering::Order;
use super::pagination::PageRequest;

/// Result shapes a query can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    /// Flattened member + team row
    MemberTeam,
    /// Member entity columns only
    Member,
    /// No columns; the query only counts rows
    Count,
}

impl Projection {
    /// Exactly the columns the result shape needs
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Projection::MemberTeam => &[
                Field::MemberId,
                Field::MemberUsername,
                Field::MemberAge,
                Field::TeamId,
                Field::TeamName,
            ],
            Projection::Member => &[
                Field::MemberId,
                Field::MemberUsername,
                Field::MemberAge,
                Field::MemberTeamId,
            ],
            Projection::Count => &[],
        }
    }

    pub fn references(&self, entity: Entity) -> bool {
        self.fields().iter().any(|f| f.entity() == entity)
    }
}

/// Declarative description of a read: source, joins, filter, projection, order and window.
///
/// Nothing here produces query text. Storage collaborators interpret it, so the same
/// query runs unchanged against PostgreSQL or the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    source: Entity,
    projection: Projection,
    joins: Vec<Join>,
    filter: WhereClause,
    order_by: Vec<Order>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl SelectQuery {
    /// Start a query over the given entity, selecting its own columns
    pub fn from(source: Entity) -> Self {
        Self {
            source,
            projection: Projection::Member,
            joins: Vec::new(),
            filter: WhereClause::always_true(),
            order_by: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    pub fn select(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Add a join; joining the same relation twice is a no-op
    pub fn join(mut self, join: Join) -> Self {
        if !self.joins.iter().any(|j| j.relation == join.relation) {
            self.joins.push(join);
        }
        self
    }

    pub fn left_join(self, relation: Relation) -> Self {
        self.join(Join::left(relation))
    }

    pub fn inner_join(self, relation: Relation) -> Self {
        self.join(Join::inner(relation))
    }

    /// AND a whole clause into the filter
    pub fn filter(mut self, clause: WhereClause) -> Self {
        self.filter = self.filter.merge(clause);
        self
    }

    /// AND each active fragment into the filter as its own clause
    pub fn where_all(self, fragments: impl IntoIterator<Item = Fragment>) -> Self {
        self.filter(WhereClause::all_of(fragments))
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Apply a page window and its ordering
    pub fn page(mut self, page: &PageRequest) -> Self {
        self.order_by.extend_from_slice(page.sort());
        self.offset = Some(page.offset());
        self.limit = Some(page.limit());
        self
    }

    /// The same filtered set without projection, ordering or window, for counting
    pub fn count_query(&self) -> Self {
        let mut count = self.clone();
        count.projection = Projection::Count;
        count.order_by.clear();
        count.offset = None;
        count.limit = None;
        count
    }

    /// Drop joins the query does not need to produce the same number of rows.
    ///
    /// Only cardinality-preserving joins are removed, and only when no filter,
    /// ordering or projected column refers to the joined entity.
    pub fn without_unreferenced_joins(mut self) -> Self {
        let referenced: Vec<Entity> = self
            .joins
            .iter()
            .map(Join::target)
            .filter(|entity| self.references(*entity))
            .collect();
        self.joins
            .retain(|join| !join.preserves_cardinality() || referenced.contains(&join.target()));
        self
    }

    /// Whether any part of the query reads columns of `entity`
    pub fn references(&self, entity: Entity) -> bool {
        self.filter.references(entity)
            || self.order_by.iter().any(|o| o.field.entity() == entity)
            || self.projection.references(entity)
    }

    /// First referenced field whose entity is neither the source nor joined
    pub fn unjoined_field(&self) -> Option<Field> {
        let available = |entity: Entity| {
            entity == self.source || self.joins.iter().any(|j| j.target() == entity)
        };
        self.projection
            .fields()
            .iter()
            .copied()
            .chain(self.filter.conditions().iter().map(|c| c.field))
            .chain(self.order_by.iter().map(|o| o.field))
            .find(|field| !available(field.entity()))
    }

    pub fn source(&self) -> Entity {
        self.source
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn where_clause(&self) -> &WhereClause {
        &self.filter
    }

    pub fn orders(&self) -> &[Order] {
        &self.order_by
    }

    pub fn window(&self) -> (Option<u64>, Option<u64>) {
        (self.offset, self.limit)
    }
}
