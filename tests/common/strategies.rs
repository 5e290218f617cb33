#![allow(dead_code)]

use member_search::MemberSearchCondition;
use proptest::prelude::*;

pub const TEAM_NAMES: [&str; 3] = ["teamA", "teamB", "teamC"];

/// Usernames drawn from a small pool so equality filters actually hit rows
pub fn username_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["member1", "member2", "member3", "member4", "member5"])
        .prop_map(str::to_string)
}

/// Empty or whitespace-only text
pub fn blank_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["", " ", "   ", "\t", " \n "]).prop_map(str::to_string)
}

/// A search text field: absent, blank, or a value likely to match
pub fn text_field_strategy(values: impl Strategy<Value = String>) -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        2 => Just(None),
        1 => blank_strategy().prop_map(Some),
        3 => values.prop_map(Some),
    ]
}

pub fn team_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(TEAM_NAMES.to_vec()).prop_map(str::to_string),
        1 => Just("noSuchTeam".to_string()),
    ]
}

pub fn age_bound_strategy() -> impl Strategy<Value = Option<i32>> {
    prop::option::of(0i32..70)
}

/// Any subset of the four search fields, blanks included
pub fn search_condition_strategy() -> impl Strategy<Value = MemberSearchCondition> {
    (
        text_field_strategy(username_strategy()),
        text_field_strategy(team_name_strategy()),
        age_bound_strategy(),
        age_bound_strategy(),
    )
        .prop_map(|(username, team_name, age_goe, age_loe)| {
            build_condition(username, team_name, age_goe, age_loe)
        })
}

pub fn build_condition(
    username: Option<String>,
    team_name: Option<String>,
    age_goe: Option<i32>,
    age_loe: Option<i32>,
) -> MemberSearchCondition {
    let mut condition = MemberSearchCondition::new();
    if let Some(username) = username {
        condition = condition.with_username(username);
    }
    if let Some(team_name) = team_name {
        condition = condition.with_team_name(team_name);
    }
    if let Some(age) = age_goe {
        condition = condition.with_age_goe(age);
    }
    if let Some(age) = age_loe {
        condition = condition.with_age_loe(age);
    }
    condition
}

/// Member rows as (username, age, index into `TEAM_NAMES` or none)
pub fn member_rows_strategy() -> impl Strategy<Value = Vec<(String, i32, Option<usize>)>> {
    prop::collection::vec(
        (
            username_strategy(),
            0i32..70,
            prop::option::weighted(0.8, 0usize..TEAM_NAMES.len()),
        ),
        0..25,
    )
}
