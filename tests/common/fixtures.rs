//! Seed data shared by the integration and property suites.

#![allow(dead_code)] // Not every suite uses every helper

use member_search::models::{MemberTeamDto, NewMember, NewTeam, Team};
use member_search::store::InMemoryStore;

/// The four-member, two-team dataset used by the concrete search scenarios
pub struct SeededStore {
    pub store: InMemoryStore,
    pub team_a: Team,
    pub team_b: Team,
}

/// teamA: member1 (10), member2 (20); teamB: member3 (30), member4 (40)
pub fn seeded_store() -> SeededStore {
    let store = InMemoryStore::new();
    let team_a = store.save_team(NewTeam::new("teamA"));
    let team_b = store.save_team(NewTeam::new("teamB"));

    for (username, age, team) in [
        ("member1", 10, &team_a),
        ("member2", 20, &team_a),
        ("member3", 30, &team_b),
        ("member4", 40, &team_b),
    ] {
        store
            .save_member(NewMember::new(username, age, Some(team.team_id)))
            .expect("seed member");
    }

    SeededStore {
        store,
        team_a,
        team_b,
    }
}

/// Seeded dataset plus one member that belongs to no team
pub fn seeded_store_with_loner() -> SeededStore {
    let seeded = seeded_store();
    seeded
        .store
        .save_member(NewMember::new("loner", 25, None))
        .expect("seed teamless member");
    seeded
}

/// A store populated from generated rows. Team indexes refer to `team_names`.
pub fn store_from_rows(team_names: &[&str], rows: &[(String, i32, Option<usize>)]) -> InMemoryStore {
    let store = InMemoryStore::new();
    let teams: Vec<Team> = team_names
        .iter()
        .map(|name| store.save_team(NewTeam::new(*name)))
        .collect();
    for (username, age, team) in rows {
        let team_id = team.and_then(|index| teams.get(index)).map(|t| t.team_id);
        store
            .save_member(NewMember::new(username.clone(), *age, team_id))
            .expect("generated member");
    }
    store
}

/// Usernames in result order
pub fn usernames(rows: &[MemberTeamDto]) -> Vec<&str> {
    rows.iter().map(|row| row.username.as_str()).collect()
}

/// Usernames sorted, for assertions where row order is unspecified
pub fn sorted_usernames(rows: &[MemberTeamDto]) -> Vec<&str> {
    let mut names = usernames(rows);
    names.sort_unstable();
    names
}
