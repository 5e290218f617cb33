use super::conditions::{Field, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn to_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Where NULLs land in the ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullHandling {
    /// PostgreSQL default: NULL sorts greater than every value
    #[default]
    Native,
    NullsFirst,
    NullsLast,
}

/// One ORDER BY term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    pub field: Field,
    pub direction: Direction,
    #[serde(default)]
    pub nulls: NullHandling,
}

impl Order {
    pub fn asc(field: Field) -> Self {
        Self {
            field,
            direction: Direction::Asc,
            nulls: NullHandling::Native,
        }
    }

    pub fn desc(field: Field) -> Self {
        Self {
            field,
            direction: Direction::Desc,
            nulls: NullHandling::Native,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = NullHandling::NullsFirst;
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = NullHandling::NullsLast;
        self
    }

    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.field.column(), self.direction.to_sql());
        match self.nulls {
            NullHandling::Native => {}
            NullHandling::NullsFirst => sql.push_str(" NULLS FIRST"),
            NullHandling::NullsLast => sql.push_str(" NULLS LAST"),
        }
        sql
    }

    /// Compare two column values the way the database would for this term
    pub fn compare(&self, a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => {
                let ordering = a.compare(b).unwrap_or(Ordering::Equal);
                match self.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            }
            (None, None) => Ordering::Equal,
            (None, Some(_)) => self.null_placement(),
            (Some(_), None) => self.null_placement().reverse(),
        }
    }

    /// Ordering of a NULL relative to a non-NULL value
    fn null_placement(&self) -> Ordering {
        let nulls_first = match self.nulls {
            NullHandling::NullsFirst => true,
            NullHandling::NullsLast => false,
            NullHandling::Native => self.direction == Direction::Desc,
        };
        if nulls_first {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}
