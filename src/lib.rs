#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Member Search
//!
//! Dynamic predicate composition and paginated search over members and their teams.
//!
//! ## Overview
//!
//! A [`MemberSearchCondition`] carries any subset of four optional fields. The
//! predicate composer ([`query_builder::MemberScopes`]) turns it into fragments, one per
//! field, where absent or blank fields become no-ops. The repository
//! ([`MemberSearchRepository`]) applies those fragments to `member LEFT JOIN team`,
//! projects into [`MemberTeamDto`] and pages the result.
//!
//! ## Module Organization
//!
//! - [`search`] - Search condition and the paginated repository
//! - [`query_builder`] - Declarative queries: fragments, joins, ordering, paging
//! - [`store`] - The storage contract plus in-memory and PostgreSQL implementations
//! - [`models`] - Stored entities and the projected row shape
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured `tracing` setup
//!
//! ## Count Strategies
//!
//! Paged searches take a [`CountStrategy`]. `Coupled` fetches content and total in one
//! consistent read. `Decoupled` issues a separate count query concurrently, dropping the
//! team join when no team filter is active; its total is only approximately
//! consistent with the content when the store is written to concurrently.
//!
//! ## Quick Start
//!
//! ```rust
//! use member_search::models::{NewMember, NewTeam};
//! use member_search::query_builder::{Field, Order, PageRequest};
//! use member_search::store::InMemoryStore;
//! use member_search::{CountStrategy, MemberSearchCondition, MemberSearchRepository};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//! let team = store.save_team(NewTeam::new("teamA"));
//! store.save_member(NewMember::new("member1", 10, Some(team.team_id)))?;
//! store.save_member(NewMember::new("member2", 20, None))?;
//!
//! let repository = MemberSearchRepository::new(store);
//! let condition = MemberSearchCondition::new().with_age_goe(15);
//! let request = PageRequest::new(0, 10)?.with_sort(Order::asc(Field::MemberUsername));
//!
//! let page = repository
//!     .search_page(&condition, &request, CountStrategy::Decoupled)
//!     .await?;
//! assert_eq!(page.total_elements(), 1);
//! assert_eq!(page.content()[0].team_name, None);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod query_builder;
pub mod search;
pub mod store;

pub use config::SearchConfig;
pub use error::{QueryKind, Result, SearchError, StoreError};
pub use models::{Member, MemberTeamDto, Team};
pub use query_builder::{Page, PageRequest};
pub use search::{CountStrategy, MemberSearchCondition, MemberSearchRepository};
pub use store::{InMemoryStore, PgQueryStore, QueryStore};
