//! Dispatcher lifecycle: one request in flight, explicit acknowledgement

use air_canvas::analysis::{AnalysisDispatcher, AnalysisError, AnalysisState};
use air_canvas::config::AnalysisConfig;
use std::thread;
use std::time::Duration;

fn wait_for_outcome(dispatcher: &mut AnalysisDispatcher) -> AnalysisState {
    for _ in 0..400 {
        if !matches!(dispatcher.poll(), AnalysisState::Requesting) {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    dispatcher.state().clone()
}

/// A second request while the first is pending is rejected; the first
/// resolves normally afterwards
#[test]
fn test_request_while_pending_is_rejected() {
    let mut dispatcher = AnalysisDispatcher::new(AnalysisConfig::default());
    dispatcher
        .request_with(|| {
            thread::sleep(Duration::from_millis(150));
            Ok("first".to_string())
        })
        .unwrap();

    for _ in 0..3 {
        let err = dispatcher.request_with(|| Ok("second".to_string())).unwrap_err();
        assert_eq!(err, AnalysisError::RequestInFlight);
        thread::sleep(Duration::from_millis(10));
    }

    assert_eq!(wait_for_outcome(&mut dispatcher), AnalysisState::Succeeded("first".to_string()));
}

/// Full lifecycle: Idle -> Requesting -> Succeeded -> Idle -> Requesting again
#[test]
fn test_lifecycle_round_trip() {
    let mut dispatcher = AnalysisDispatcher::new(AnalysisConfig::default());
    assert_eq!(dispatcher.state(), &AnalysisState::Idle);

    dispatcher.request_with(|| Ok("done".to_string())).unwrap();
    assert!(dispatcher.is_requesting());
    assert!(matches!(wait_for_outcome(&mut dispatcher), AnalysisState::Succeeded(_)));

    dispatcher.acknowledge();
    assert_eq!(dispatcher.state(), &AnalysisState::Idle);

    // The slot is free again
    dispatcher.request_with(|| Err(AnalysisError::Timeout)).unwrap();
    assert_eq!(wait_for_outcome(&mut dispatcher), AnalysisState::Failed(AnalysisError::Timeout));
    dispatcher.acknowledge();
    assert_eq!(dispatcher.state(), &AnalysisState::Idle);
}

/// A missing credential fails before any request starts, leaving the
/// dispatcher idle so the user can fix the environment and retry
#[test]
fn test_missing_credential_precondition() {
    let mut config = AnalysisConfig::default();
    config.api_key_env = "AIR_CANVAS_DISPATCH_TEST_UNSET_VAR".to_string();
    let mut dispatcher = AnalysisDispatcher::new(config);

    let err = dispatcher.request(vec![0u8; 16]).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::MissingApiKey { var: "AIR_CANVAS_DISPATCH_TEST_UNSET_VAR".to_string() }
    );
    assert_eq!(dispatcher.state(), &AnalysisState::Idle);
    assert!(!dispatcher.is_requesting());
}

/// Failures carry their taxonomy through to the caller unchanged
#[test]
fn test_failure_variants_surface_to_state() {
    let failures = vec![
        AnalysisError::RateLimited,
        AnalysisError::Auth { status: 403 },
        AnalysisError::Timeout,
        AnalysisError::InvalidRequest("bad image".to_string()),
        AnalysisError::Service { status: 503, body: "overloaded".to_string() },
    ];
    for failure in failures {
        let mut dispatcher = AnalysisDispatcher::new(AnalysisConfig::default());
        let sent = failure.clone();
        dispatcher.request_with(move || Err(sent)).unwrap();
        assert_eq!(wait_for_outcome(&mut dispatcher), AnalysisState::Failed(failure));
    }
}
