use pretty_assertions::assert_eq;
use reconcile::roster::{find_matching_team, partition_sides, RosterBook, TeamRoster};

fn player(name: &str, tag: u32, team: u8) -> common::PlayerRecord {
    common::PlayerRecord {
        handle: format!("1-Hero-1-{}", tag),
        name: name.to_owned(),
        tag,
        team,
        uuid: format!("uuid-{}", tag),
        region: 1,
        realm: 1,
        extra: serde_json::Map::new(),
    }
}

fn roster(id: &str, name: &str, tags: &[&str]) -> TeamRoster {
    let mut roster = TeamRoster::new(id, name);
    for tag in tags {
        roster.add(tag);
    }
    roster
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn clear_home_majority_resolves_to_home() {
    let home = roster("t1", "Alpha", &["A#1", "B#1", "C#1", "D#1"]);
    let away = roster("t2", "Beta", &["A#1", "X#1", "Y#1"]);

    let side = tags(&["A#1", "B#1", "C#1", "Z#1"]);
    let matched = find_matching_team(Some(&home), Some(&away), &side);

    assert_eq!(Some("Alpha"), matched.map(|team| team.name.as_str()));
}

#[test]
fn away_majority_resolves_to_away() {
    let home = roster("t1", "Alpha", &[]);
    let away = roster("t2", "Beta", &["A#1", "B#1", "C#1"]);

    let side = tags(&["A#1", "B#1", "C#1", "Z#1"]);
    let matched = find_matching_team(Some(&home), Some(&away), &side);

    assert_eq!(Some("Beta"), matched.map(|team| team.name.as_str()));
}

#[test]
fn tied_counts_stay_unresolved() {
    let home = roster("t1", "Alpha", &["A#1", "B#1", "C#1"]);
    let away = roster("t2", "Beta", &["A#1", "B#1", "C#1"]);

    let side = tags(&["A#1", "B#1", "C#1"]);
    assert_eq!(None, find_matching_team(Some(&home), Some(&away), &side));
}

#[test]
fn thin_overlap_stays_unresolved() {
    // Two rostered players is not enough, even unopposed.
    let home = roster("t1", "Alpha", &["A#1", "B#1"]);
    let away = roster("t2", "Beta", &[]);

    let side = tags(&["A#1", "B#1", "Z#1", "W#1", "V#1"]);
    assert_eq!(None, find_matching_team(Some(&home), Some(&away), &side));
}

#[test]
fn empty_rosters_stay_unresolved() {
    let home = roster("t1", "Alpha", &[]);
    let away = roster("t2", "Beta", &[]);

    let side = tags(&["A#1", "B#1", "C#1"]);
    assert_eq!(None, find_matching_team(Some(&home), Some(&away), &side));
}

#[test]
fn withdrawn_team_is_absent_without_an_error() {
    let home = roster("t1", "Alpha", &["A#1", "B#1", "C#1"]);

    let side = tags(&["A#1", "B#1", "C#1"]);
    let matched = find_matching_team(Some(&home), None, &side);

    assert_eq!(Some("Alpha"), matched.map(|team| team.name.as_str()));
    assert_eq!(None, find_matching_team(None, None, &side));
}

#[test]
fn partition_splits_players_by_recorded_side() {
    let players = vec![
        player("A", 1, 0),
        player("B", 2, 1),
        player("C", 3, 0),
        player("D", 4, 1),
    ];

    let (blue, red) = partition_sides(&players);

    assert_eq!(tags(&["A#1", "C#3"]), blue);
    assert_eq!(tags(&["B#2", "D#4"]), red);
}

#[test]
fn reconcile_grows_resolved_roster_with_subs() {
    let mut book = RosterBook::new();
    book.insert_team(roster("t1", "Alpha", &["A#1", "B#2", "C#3"]));
    book.insert_team(roster("t2", "Beta", &["Q#7", "R#8", "S#9"]));

    let players = vec![
        player("A", 1, 0),
        player("B", 2, 0),
        player("C", 3, 0),
        player("X", 99, 0),
        player("Q", 7, 1),
        player("R", 8, 1),
        player("S", 9, 1),
    ];

    let assignment = book.reconcile("Alpha", "Beta", &players);

    assert_eq!(Some("Alpha".to_owned()), assignment.blue);
    assert_eq!(Some("Beta".to_owned()), assignment.red);
    assert_eq!(
        tags(&["A#1", "B#2", "C#3", "X#99"]),
        book.team("Alpha").unwrap().tags()
    );
    assert_eq!(tags(&["Q#7", "R#8", "S#9"]), book.team("Beta").unwrap().tags());
}

#[test]
fn reconcile_is_idempotent_for_roster_growth() {
    let mut book = RosterBook::new();
    book.insert_team(roster("t1", "Alpha", &["A#1", "B#2", "C#3"]));
    book.insert_team(roster("t2", "Beta", &["Q#7", "R#8", "S#9"]));

    let players = vec![
        player("A", 1, 0),
        player("B", 2, 0),
        player("C", 3, 0),
        player("X", 99, 0),
    ];

    book.reconcile("Alpha", "Beta", &players);
    let first = book.team("Alpha").unwrap().tags().to_vec();

    book.reconcile("Alpha", "Beta", &players);
    let second = book.team("Alpha").unwrap().tags().to_vec();

    assert_eq!(first, second);
    assert_eq!(4, second.len());
}

#[test]
fn unresolved_side_leaves_rosters_untouched() {
    let mut book = RosterBook::new();
    book.insert_team(roster("t1", "Alpha", &["A#1", "B#2", "C#3"]));
    book.insert_team(roster("t2", "Beta", &["Q#7", "R#8", "S#9"]));

    // Beta withdrew: their side is filled with stand-ins nobody rosters.
    let players = vec![
        player("A", 1, 0),
        player("B", 2, 0),
        player("C", 3, 0),
        player("U", 50, 1),
        player("V", 51, 1),
    ];

    let assignment = book.reconcile("Alpha", "Beta", &players);

    assert_eq!(Some("Alpha".to_owned()), assignment.blue);
    assert_eq!(None, assignment.red);
    assert_eq!(tags(&["Q#7", "R#8", "S#9"]), book.team("Beta").unwrap().tags());
}

#[test]
fn every_observed_player_gets_a_handle_mapping() {
    let mut book = RosterBook::new();
    book.insert_team(roster("t1", "Alpha", &[]));
    book.insert_team(roster("t2", "Beta", &[]));

    // Nothing resolves here, the handles must be recorded anyway.
    let players = vec![player("A", 1, 0), player("Q", 7, 1)];
    let assignment = book.reconcile("Alpha", "Beta", &players);

    assert_eq!(None, assignment.blue);
    assert_eq!(None, assignment.red);
    assert_eq!(Some("1-Hero-1-1"), book.handle_for_tag("A#1"));
    assert_eq!(Some("1-Hero-1-7"), book.handle_for_tag("Q#7"));
    assert_eq!(None, book.handle_for_tag("Z#0"));
}

#[test]
fn schedule_members_merge_without_duplicates() {
    let mut book = RosterBook::new();
    book.insert_team(roster("t1", "Alpha", &["A#1"]));

    assert!(!book.add_member("Alpha", "A#1"));
    assert!(book.add_member("Alpha", "B#2"));
    assert!(!book.add_member("Gone", "C#3"));

    assert_eq!(tags(&["A#1", "B#2"]), book.team("Alpha").unwrap().tags());
}
