//! Cross-client determinism scenarios: two independent runs fed the same
//! inputs must agree bit for bit.

use battletanks_common::{EntityKind, SimConfig};
use battletanks_kernel::{Roster, SpawnPlanner, WorldState, step};

const EIGHT: [&str; 8] = [
    "Alice", "bob", "carol", "Dave", "eve", "Frank", "grace", "Heidi",
];

fn run(world: &mut WorldState, steps: usize) {
    let config = SimConfig::default();
    for _ in 0..steps {
        step(world, config.time_step, &config);
    }
}

#[test]
fn planning_twice_is_identical() {
    let roster = Roster::canonical(EIGHT);
    let a = SpawnPlanner::plan("blogus", "test", &roster);
    let b = SpawnPlanner::plan("blogus", "test", &roster);
    assert_eq!(a.entities(), b.entities());
    assert_eq!(a.state_hash(), b.state_hash());
}

#[test]
fn raw_roster_order_does_not_matter() {
    let forward = Roster::canonical(EIGHT);
    let mut reversed_names = EIGHT.to_vec();
    reversed_names.reverse();
    let reversed = Roster::canonical(reversed_names);

    let a = SpawnPlanner::plan("blogus", "test", &forward);
    let b = SpawnPlanner::plan("blogus", "test", &reversed);
    assert_eq!(a.state_hash(), b.state_hash());
}

#[test]
fn renaming_one_user_leaves_others_untouched() {
    let a = SpawnPlanner::plan("blogus", "test", &Roster::canonical(["Alice", "bob", "carol"]));
    let b = SpawnPlanner::plan("blogus", "test", &Roster::canonical(["Alice", "bobby", "carol"]));

    for id in ["Alice", "carol", "foe0", "foe3", "food2"] {
        assert_eq!(a.get(id), b.get(id), "{id} moved");
    }
    assert!(b.get("bob").is_none());
    assert_ne!(
        a.get("bob").map(|e| e.position),
        b.get("bobby").map(|e| e.position)
    );
}

#[test]
fn different_seed_words_diverge() {
    let roster = Roster::canonical(["Alice"]);
    let a = SpawnPlanner::plan("blogus", "one", &roster);
    let b = SpawnPlanner::plan("blogus", "two", &roster);
    assert_ne!(a.state_hash(), b.state_hash());

    let c = SpawnPlanner::plan("other-room", "one", &roster);
    assert_ne!(a.state_hash(), c.state_hash());
}

#[test]
fn stepping_a_clone_gives_the_same_world() {
    let mut a = SpawnPlanner::plan("blogus", "test", &Roster::canonical(EIGHT));
    run(&mut a, 100);
    let mut b = a.clone();
    run(&mut a, 250);
    run(&mut b, 250);
    assert_eq!(a.entities(), b.entities());
    assert_eq!(a.state_hash(), b.state_hash());
}

#[test]
fn entities_never_leave_the_arena() {
    let config = SimConfig::default();
    for word in ["a", "b", "c", "storm", "long-game"] {
        let mut world = SpawnPlanner::plan("bounds", word, &Roster::canonical(EIGHT));
        for _ in 0..2000 {
            step(&mut world, config.time_step, &config);
            for e in world.entities() {
                assert!(e.position.x.abs() <= 50.0, "{} escaped on x", e.id);
                assert!(e.position.y.abs() <= 50.0, "{} escaped on z", e.id);
            }
        }
    }
}

#[test]
fn nothing_is_ever_added_mid_session() {
    let mut world = SpawnPlanner::plan("blogus", "test", &Roster::canonical(EIGHT));
    let mut previous = world.len();
    for _ in 0..1000 {
        run(&mut world, 1);
        assert!(world.len() <= previous);
        previous = world.len();
    }
}

/// Reference trajectory for `blogus`/`test` with eight players and 3000 steps
/// of 0.016 s. Any client applying the same step rules reproduces it exactly.
#[test]
fn long_run_matches_reference_trajectory() {
    let mut world = SpawnPlanner::plan("blogus", "test", &Roster::canonical(EIGHT));
    assert_eq!(world.len(), 22);

    run(&mut world, 500);
    let survivors: Vec<(&str, Option<i32>)> = world
        .entities()
        .iter()
        .map(|e| (e.id.as_str(), e.health))
        .collect();
    assert_eq!(
        survivors,
        [
            ("Alice", Some(4)),
            ("bob", Some(1)),
            ("carol", Some(4)),
            ("Dave", Some(3)),
            ("eve", Some(4)),
            ("Frank", Some(2)),
            ("Heidi", Some(2)),
            ("foe2", None),
            ("foe3", None),
            ("foe4", None),
            ("foe5", None),
            ("foe6", None),
            ("foe7", None),
            ("food3", None),
            ("food5", None),
        ]
    );

    run(&mut world, 2500);
    assert_eq!(world.tick(), 3000);
    let ids: Vec<&str> = world.entities().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["Alice", "carol", "Dave", "Frank", "foe4"]);
    assert_eq!(world.count(EntityKind::User), 4);
    let health: Vec<Option<i32>> = world.entities().iter().map(|e| e.health).collect();
    assert_eq!(health, [Some(3), Some(4), Some(2), Some(1), None]);

    let alice = world.get("Alice").unwrap();
    assert_eq!(alice.position.x, 8.075022012323037);
    assert_eq!(alice.position.y, 46.361531184345466);
    assert_eq!(alice.velocity.x, -4.8535315450280905);
    assert_eq!(alice.velocity.y, -23.557757282629606);
    assert_eq!(alice.health, Some(3));
}

#[test]
fn two_player_example_run() {
    let mut world = SpawnPlanner::plan("blogus", "test", &Roster::canonical(["bob", "Alice"]));
    run(&mut world, 3000);
    let ids: Vec<&str> = world.entities().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["Alice", "bob", "foe1", "foe2", "foe3"]);
    assert_eq!(world.get("bob").unwrap().health, Some(4));
    let alice = world.get("Alice").unwrap();
    assert_eq!(alice.health, Some(4));
    assert_eq!(alice.position.x, 8.851587059527533);
    assert_eq!(alice.position.y, 47.86922765043377);
}
