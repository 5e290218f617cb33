//! # Query Builder System
//!
//! Declarative, storage-independent query construction for member search.
//!
//! ## Key Components
//!
//! - [`conditions`] - Fields, bound values, comparison conditions, fragments and conjunctions
//! - [`joins`] - Entities, declared relations and join specifications
//! - [`ordering`] - ORDER BY terms with explicit null placement
//! - [`pagination`] - Validated page windows and result pages
//! - [`builder`] - [`SelectQuery`], the full description of one read
//! - [`scopes`] - [`MemberScopes`], mapping search fields to fragments
//!
//! ## Fragments
//!
//! A [`Fragment`] is either an active [`Condition`] or `NoOp`. Conjoining a `NoOp` with
//! anything leaves the other side unchanged, so optional search fields never need
//! special-casing by the caller:
//!
//! ```rust
//! use member_search::query_builder::{MemberScopes, WhereClause};
//!
//! let clause = WhereClause::always_true()
//!     .and(MemberScopes::username_eq(None))
//!     .and(MemberScopes::age_goe(Some(20)));
//! assert_eq!(clause.conditions().len(), 1);
//! ```
//!
//! Queries never carry SQL text. Store implementations in [`crate::store`] interpret a
//! [`SelectQuery`] and bind every value as a parameter.

pub mod builder;
pub mod conditions;
pub mod joins;
pub mod ordering;
pub mod pagination;
pub mod scopes;

pub use builder::{Projection, SelectQuery};
pub use conditions::{Condition, Field, FieldLookup, Fragment, Operator, Value, WhereClause};
pub use joins::{Entity, Join, JoinType, Relation};
pub use ordering::{Direction, NullHandling, Order};
pub use pagination::{Page, PageRequest};
pub use scopes::MemberScopes;
