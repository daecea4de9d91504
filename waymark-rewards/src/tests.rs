//! Unit coverage for reward calculation.
#![forbid(unsafe_code)]

use rstest::{fixture, rstest};
use uuid::Uuid;
use waymark_core::test_support::{FixedRewardOracle, StaticCatalog};
use waymark_core::{
    Attraction, ProviderError, RankError, User, VisitedPosition, distance_miles, lat_lon,
};

use crate::{ATTRACTION_VISIBILITY_RADIUS_MILES, RewardEngine, RewardError};

#[fixture]
fn attractions() -> Vec<Attraction> {
    vec![
        Attraction::with_random_id("Harbour", lat_lon(0.0, 0.0)),
        Attraction::with_random_id("Lighthouse", lat_lon(0.05, 0.0)),
        Attraction::with_random_id("Summit", lat_lon(5.0, 0.0)),
    ]
}

#[fixture]
fn user() -> User {
    User::new(Uuid::new_v4(), "internalUser0", "000", "internalUser0@waymark.test")
}

fn visit(user: &User, latitude: f64, longitude: f64) {
    user.add_visited_position(VisitedPosition::now(
        user.id(),
        lat_lon(latitude, longitude),
    ));
}

#[rstest]
fn rewards_every_attraction_within_radius(attractions: Vec<Attraction>, user: User) {
    let engine = RewardEngine::new(FixedRewardOracle::new(40), attractions);
    visit(&user, 0.0, 0.0);

    let added = engine.calculate_rewards(&user).expect("oracle succeeds");

    assert_eq!(added, 2);
    let names: Vec<String> = user
        .rewards()
        .into_iter()
        .map(|reward| reward.attraction.name)
        .collect();
    assert_eq!(names, ["Harbour", "Lighthouse"]);
    assert!(user.rewards().iter().all(|reward| reward.points == 40));
}

#[rstest]
fn repeated_passes_do_not_duplicate_rewards(attractions: Vec<Attraction>, user: User) {
    let engine = RewardEngine::new(FixedRewardOracle::new(1), attractions);
    visit(&user, 0.0, 0.0);
    visit(&user, 0.01, 0.0);

    let first = engine.calculate_rewards(&user).expect("first pass");
    let second = engine.calculate_rewards(&user).expect("second pass");

    assert_eq!(first, 2);
    assert_eq!(second, 0);
    assert_eq!(user.rewards().len(), 2);
    assert_eq!(engine.oracle().calls(), 2);
}

#[rstest]
fn earliest_qualifying_position_is_credited(attractions: Vec<Attraction>, user: User) {
    let engine = RewardEngine::new(FixedRewardOracle::new(1), attractions);
    visit(&user, 0.0, 0.0);
    visit(&user, 0.001, 0.0);

    engine.calculate_rewards(&user).expect("oracle succeeds");

    let rewards = user.rewards();
    let harbour = rewards
        .iter()
        .find(|reward| reward.attraction.name == "Harbour")
        .expect("harbour rewarded");
    assert_eq!(harbour.position.location, lat_lon(0.0, 0.0));
}

#[rstest]
fn distant_positions_earn_nothing(attractions: Vec<Attraction>, user: User) {
    let engine = RewardEngine::new(FixedRewardOracle::new(1), attractions);
    visit(&user, -40.0, 120.0);

    assert_eq!(engine.calculate_rewards(&user).expect("no lookups"), 0);
    assert!(user.rewards().is_empty());
    assert_eq!(engine.oracle().calls(), 0);
}

#[rstest]
fn user_without_positions_earns_nothing(attractions: Vec<Attraction>, user: User) {
    let engine = RewardEngine::new(FixedRewardOracle::new(1), attractions);

    assert_eq!(engine.calculate_rewards(&user).expect("no lookups"), 0);
}

#[rstest]
fn oracle_failure_commits_nothing(attractions: Vec<Attraction>, user: User) {
    let oracle = FixedRewardOracle::new(1).failing_for(user.id());
    let engine = RewardEngine::new(oracle, attractions);
    visit(&user, 0.0, 0.0);

    let err = engine
        .calculate_rewards(&user)
        .expect_err("oracle is down for this user");

    assert!(matches!(
        err,
        RewardError::Oracle { ref attraction, user_id, source: ProviderError::Unavailable { .. } }
            if attraction == "Harbour" && user_id == user.id()
    ));
    assert!(user.rewards().is_empty());
    assert_eq!(user.visited_positions().len(), 1);
}

#[rstest]
#[case(10.0, 2)]
#[case(1.0, 1)]
#[case(400.0, 3)]
fn reward_radius_controls_eligibility(
    attractions: Vec<Attraction>,
    user: User,
    #[case] radius: f64,
    #[case] expected: usize,
) {
    let engine = RewardEngine::new(FixedRewardOracle::new(1), attractions).with_reward_radius(radius);
    visit(&user, 0.0, 0.0);

    assert_eq!(engine.reward_radius_miles(), radius);
    assert_eq!(engine.calculate_rewards(&user).expect("oracle succeeds"), expected);
}

#[rstest]
fn visibility_radius_is_wider_than_reward_radius(attractions: Vec<Attraction>) {
    let engine = RewardEngine::new(FixedRewardOracle::new(1), attractions);
    let summit = engine
        .attractions()
        .iter()
        .find(|attraction| attraction.name == "Summit")
        .expect("summit present");
    let nearby = lat_lon(3.0, 0.0);
    let position = VisitedPosition::now(Uuid::nil(), nearby);

    assert!(distance_miles(nearby, summit.location) < ATTRACTION_VISIBILITY_RADIUS_MILES);
    assert!(engine.is_within_attraction_proximity(summit, nearby));
    assert!(!engine.near_attraction(&position, summit));
}

#[rstest]
fn nearest_attractions_are_priced_for_the_user(attractions: Vec<Attraction>) {
    let engine = RewardEngine::new(FixedRewardOracle::new(25), attractions);

    let nearest = engine
        .nearest_attractions(lat_lon(4.0, 0.0), Uuid::new_v4(), 2)
        .expect("enough attractions");

    let names: Vec<&str> = nearest.iter().map(|n| n.attraction_name.as_str()).collect();
    assert_eq!(names, ["Summit", "Lighthouse"]);
    assert!(nearest.iter().all(|n| n.reward_points == 25));
}

#[rstest]
fn nearest_attractions_reports_small_catalog(attractions: Vec<Attraction>) {
    let engine = RewardEngine::new(FixedRewardOracle::new(1), attractions);

    let err = engine
        .nearest_attractions(lat_lon(0.0, 0.0), Uuid::new_v4(), 5)
        .expect_err("only three attractions");

    assert_eq!(
        err,
        RankError::InsufficientData {
            requested: 5,
            available: 3
        }
    );
}

#[rstest]
fn loads_attractions_from_catalog(attractions: Vec<Attraction>) {
    let catalog = StaticCatalog::with_attractions(attractions);

    let engine =
        RewardEngine::from_catalog(FixedRewardOracle::new(1), &catalog).expect("catalog loads");

    assert_eq!(engine.attractions().len(), 3);
}
