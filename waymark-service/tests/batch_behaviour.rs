#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for reward and tracking batches.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use uuid::Uuid;
use waymark_core::test_support::{FixedLocationProvider, FixedRewardOracle};
use waymark_core::{Attraction, User, VisitedPosition, lat_lon};
use waymark_dispatch::{ConcurrentDispatcher, DispatchError};
use waymark_rewards::RewardEngine;
use waymark_service::{BatchOrchestrator, BatchTimeouts};

const HARBOUR: Coord<f64> = lat_lon(10.0, 10.0);
const LIGHTHOUSE: Coord<f64> = lat_lon(20.0, 20.0);

type Outcome = Result<(usize, usize), DispatchError>;

/// Shared state threaded through each scenario.
struct TestContext {
    users: RefCell<Vec<Arc<User>>>,
    oracle: RefCell<FixedRewardOracle>,
    location: RefCell<Coord<f64>>,
    outcome: RefCell<Option<Outcome>>,
}

#[fixture]
fn context() -> TestContext {
    TestContext {
        users: RefCell::new(Vec::new()),
        oracle: RefCell::new(FixedRewardOracle::new(50)),
        location: RefCell::new(lat_lon(-60.0, 0.0)),
        outcome: RefCell::new(None),
    }
}

fn orchestrator(
    context: &TestContext,
    timeouts: BatchTimeouts,
) -> BatchOrchestrator<FixedRewardOracle, FixedLocationProvider> {
    let oracle = context.oracle.replace(FixedRewardOracle::new(0));
    let attractions = vec![
        Attraction::with_random_id("Harbour", HARBOUR),
        Attraction::with_random_id("Lighthouse", LIGHTHOUSE),
    ];
    let dispatcher = ConcurrentDispatcher::with_workers(10).expect("runtime builds");
    BatchOrchestrator::new(
        RewardEngine::new(oracle, attractions),
        FixedLocationProvider::new(*context.location.borrow()),
        dispatcher,
    )
    .with_timeouts(timeouts)
}

fn first_user_id(context: &TestContext) -> Uuid {
    context
        .users
        .borrow()
        .first()
        .map(|user| user.id())
        .expect("users exist")
}

#[given("one hundred users who each visited the harbour")]
fn hundred_users(context: &TestContext) {
    *context.users.borrow_mut() = (0..100)
        .map(|i| {
            let user = User::new(
                Uuid::new_v4(),
                format!("internalUser{i}"),
                "000",
                format!("internalUser{i}@waymark.test"),
            );
            user.add_visited_position(VisitedPosition::now(user.id(), HARBOUR));
            Arc::new(user)
        })
        .collect();
}

#[given("a reward oracle that fails for the first user")]
fn oracle_fails_for_first(context: &TestContext) {
    let user_id = first_user_id(context);
    *context.oracle.borrow_mut() = FixedRewardOracle::new(50).failing_for(user_id);
}

#[given("a reward oracle that takes a second per lookup")]
fn slow_oracle(context: &TestContext) {
    *context.oracle.borrow_mut() = FixedRewardOracle::new(50).with_delay(Duration::from_secs(1));
}

#[given("a location provider that places everyone at the lighthouse")]
fn everyone_at_lighthouse(context: &TestContext) {
    *context.location.borrow_mut() = LIGHTHOUSE;
}

#[when("rewards are calculated for every user")]
fn reward_everyone(context: &TestContext) {
    let orchestrator = orchestrator(context, BatchTimeouts::default());
    let outcome = orchestrator
        .calculate_all_users_rewards(&context.users.borrow())
        .map(|report| (report.succeeded(), report.failed()));
    *context.outcome.borrow_mut() = Some(outcome);
}

#[when("rewards are calculated for every user with a short deadline")]
fn reward_everyone_briefly(context: &TestContext) {
    let orchestrator = orchestrator(
        context,
        BatchTimeouts::uniform(Duration::from_millis(100)),
    );
    let outcome = orchestrator
        .calculate_all_users_rewards(&context.users.borrow())
        .map(|report| (report.succeeded(), report.failed()));
    *context.outcome.borrow_mut() = Some(outcome);
    orchestrator.shutdown(Duration::ZERO);
}

#[when("every user is tracked")]
fn track_everyone(context: &TestContext) {
    let orchestrator = orchestrator(context, BatchTimeouts::default());
    let outcome = orchestrator
        .track_all_users_positions(&context.users.borrow())
        .map(|report| (report.succeeded(), report.failed()));
    *context.outcome.borrow_mut() = Some(outcome);
}

#[then("the batch completes with one failure")]
fn one_failure(context: &TestContext) {
    let outcome = context.outcome.borrow();
    let counts = outcome
        .as_ref()
        .expect("batch ran")
        .as_ref()
        .expect("batch completed");
    assert_eq!(*counts, (99, 1));
}

#[then("ninety-nine users hold a reward")]
fn ninety_nine_rewarded(context: &TestContext) {
    let users = context.users.borrow();
    let rewarded = users.iter().filter(|user| user.rewards().len() == 1).count();
    assert_eq!(rewarded, 99);
    let first = users.first().expect("users exist");
    assert!(first.rewards().is_empty());
}

#[then("every user holds rewards for the harbour and the lighthouse")]
fn rewarded_twice(context: &TestContext) {
    let users = context.users.borrow();
    for user in users.iter() {
        let mut names: Vec<String> = user
            .rewards()
            .into_iter()
            .map(|reward| reward.attraction.name)
            .collect();
        names.sort();
        assert_eq!(names, ["Harbour", "Lighthouse"]);
        assert_eq!(user.visited_positions().len(), 2);
    }
}

#[then("the batch reports a timeout")]
fn reports_timeout(context: &TestContext) {
    let outcome = context.outcome.borrow();
    let result = outcome.as_ref().expect("batch ran");
    assert!(matches!(
        result,
        Err(DispatchError::TimeoutExceeded {
            submitted: 100,
            ..
        })
    ));
}

#[scenario(path = "tests/features/batch.feature", index = 0)]
fn failing_user_isolated(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/batch.feature", index = 1)]
fn tracking_rewards_immediately(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/batch.feature", index = 2)]
fn slow_batch_times_out(context: TestContext) {
    let _ = context;
}
