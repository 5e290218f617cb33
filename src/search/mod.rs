//! # Member Search
//!
//! The caller-facing search surface: the optional search fields and the repository
//! that turns them into filtered, projected and paged reads.

pub mod condition;
pub mod repository;

pub use condition::MemberSearchCondition;
pub use repository::{CountStrategy, MemberSearchRepository};
