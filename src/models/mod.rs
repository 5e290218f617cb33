//! # Models
//!
//! Stored entities (`Member`, `Team`) and the flattened `MemberTeamDto` row that
//! searches project into. Entities map one-to-one onto the tables in `migrations/`.

pub mod member;
pub mod member_team;
pub mod team;

pub use member::{Member, NewMember};
pub use member_team::MemberTeamDto;
pub use team::{NewTeam, Team};
