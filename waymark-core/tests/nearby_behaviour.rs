#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for nearest-attraction ranking and proximity checks.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use waymark_core::{
    Attraction, NearbyAttraction, RankError, distance_miles, is_near, lat_lon,
    nearest_attractions,
};

/// Shared state threaded through each scenario.
struct TestContext {
    catalog: RefCell<Vec<Attraction>>,
    ranked: RefCell<Option<Result<Vec<NearbyAttraction>, RankError>>>,
    distances: RefCell<Vec<f64>>,
}

#[fixture]
fn context() -> TestContext {
    TestContext {
        catalog: RefCell::new(Vec::new()),
        ranked: RefCell::new(None),
        distances: RefCell::new(Vec::new()),
    }
}

fn spread_catalog(count: u32) -> Vec<Attraction> {
    (0..count)
        .rev()
        .map(|i| Attraction::with_random_id(format!("stop-{i}"), lat_lon(f64::from(i) + 1.0, 0.0)))
        .collect()
}

#[given("a catalog of seven attractions spread north of the equator")]
fn seven_attractions(context: &TestContext) {
    *context.catalog.borrow_mut() = spread_catalog(7);
}

#[given("a catalog of three attractions spread north of the equator")]
fn three_attractions(context: &TestContext) {
    *context.catalog.borrow_mut() = spread_catalog(3);
}

#[given("a catalog with a single attraction at the origin")]
fn attraction_at_origin(context: &TestContext) {
    *context.catalog.borrow_mut() = vec![Attraction::with_random_id("Origin", lat_lon(0.0, 0.0))];
}

#[given("a catalog with a single attraction one degree north of the origin")]
fn attraction_one_degree_north(context: &TestContext) {
    *context.catalog.borrow_mut() = vec![Attraction::with_random_id("North", lat_lon(1.0, 0.0))];
}

#[when("I ask for the five nearest attractions from the origin")]
fn ask_for_five(context: &TestContext) {
    let catalog = context.catalog.borrow();
    let ranked = nearest_attractions(lat_lon(0.0, 0.0), &catalog, 5, |_| Ok(10));
    *context.ranked.borrow_mut() = Some(ranked);
}

#[when("I measure the distance from the origin to each attraction")]
fn measure_distances(context: &TestContext) {
    let catalog = context.catalog.borrow();
    *context.distances.borrow_mut() = catalog
        .iter()
        .map(|attraction| distance_miles(lat_lon(0.0, 0.0), attraction.location))
        .collect();
}

#[then("five attractions are returned in ascending distance")]
fn five_ascending(context: &TestContext) {
    let ranked = context.ranked.borrow();
    let nearest = ranked
        .as_ref()
        .expect("ranking should have run")
        .as_ref()
        .expect("ranking should succeed");
    assert_eq!(nearest.len(), 5);
    let names: Vec<&str> = nearest.iter().map(|n| n.attraction_name.as_str()).collect();
    assert_eq!(names, ["stop-0", "stop-1", "stop-2", "stop-3", "stop-4"]);
}

#[then("each result carries the origin as its query location")]
fn carries_query_location(context: &TestContext) {
    let ranked = context.ranked.borrow();
    let nearest = ranked
        .as_ref()
        .expect("ranking should have run")
        .as_ref()
        .expect("ranking should succeed");
    assert!(nearest.iter().all(|n| n.query_location == lat_lon(0.0, 0.0)));
}

#[then("the request fails for lack of attractions")]
fn fails_for_lack(context: &TestContext) {
    let ranked = context.ranked.borrow();
    let outcome = ranked.as_ref().expect("ranking should have run");
    assert_eq!(
        outcome.as_ref().err(),
        Some(&RankError::InsufficientData {
            requested: 5,
            available: 3
        })
    );
}

#[then("the attraction is within the 10 mile reward radius")]
fn within_reward_radius(context: &TestContext) {
    let catalog = context.catalog.borrow();
    let attraction = catalog.first().expect("one attraction");
    assert!(is_near(lat_lon(0.0, 0.0), attraction.location, 10.0));
    assert_eq!(context.distances.borrow().first().copied(), Some(0.0));
}

#[then("the attraction is outside the 10 mile reward radius")]
fn outside_reward_radius(context: &TestContext) {
    let catalog = context.catalog.borrow();
    let attraction = catalog.first().expect("one attraction");
    assert!(!is_near(lat_lon(0.0, 0.0), attraction.location, 10.0));
}

#[then("the attraction is within the 200 mile visibility radius")]
fn within_visibility_radius(context: &TestContext) {
    let catalog = context.catalog.borrow();
    let attraction = catalog.first().expect("one attraction");
    assert!(is_near(lat_lon(0.0, 0.0), attraction.location, 200.0));
}

#[scenario(path = "tests/features/nearby.feature", index = 0)]
fn five_nearest_closest_first(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/nearby.feature", index = 1)]
fn small_catalog_rejected(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/nearby.feature", index = 2)]
fn attraction_at_position_is_rewardable(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/nearby.feature", index = 3)]
fn one_degree_away_is_visible_only(context: TestContext) {
    let _ = context;
}
