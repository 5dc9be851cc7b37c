// ==========================================
// Concurrent stock accounting tests
// ==========================================
// The decrement is a single conditional UPDATE inside a transaction, so two
// racing usages can never both drain the same grams. These tests hammer that
// path from multiple threads over one shared state.
// ==========================================

mod helpers;

use std::sync::{Arc, Barrier};
use std::thread;

use helpers::api_test_helper::*;
use spooltrack::api::ApiError;

#[test]
fn test_racing_usages_never_overdraw() {
    let env = ApiTestEnv::new();
    let mut payload = filament_payload("Prusament", "PLA", "Galaxy Black");
    payload.remaining_weight = 500.0;
    let spool = env.state.filament_api.create(payload).unwrap();

    // 300g + 300g against 500g: either alone fits, both together do not.
    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for _ in 0..2 {
        let api = env.state.filament_api.clone();
        let barrier = barrier.clone();
        let spool_id = spool.id.clone();
        handles.push(thread::spawn(move || {
            barrier.wait();
            api.record_usage(&spool_id, usage_payload(300.0))
        }));
    }

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("worker thread panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one of the two usages may land");
    for result in &results {
        if let Err(err) = result {
            assert!(
                matches!(err, ApiError::InsufficientFilament { .. }),
                "loser must fail with InsufficientFilament, got {err:?}"
            );
        }
    }

    let detail = env.state.filament_api.get(&spool.id).unwrap();
    assert_eq!(detail.spool.remaining_weight, 200.0);
    assert_eq!(detail.usages.len(), 1);
}

#[test]
fn test_many_threads_remaining_never_negative() {
    let env = ApiTestEnv::new();
    let spool = env
        .state
        .filament_api
        .create(filament_payload("eSUN", "PETG", "Blue"))
        .unwrap();

    // 8 threads x 3 attempts x 100g = 2400g requested against 1000g.
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let mut handles = Vec::new();
    for _ in 0..threads {
        let api = env.state.filament_api.clone();
        let barrier = barrier.clone();
        let spool_id = spool.id.clone();
        handles.push(thread::spawn(move || {
            barrier.wait();
            let mut landed = 0u32;
            for _ in 0..3 {
                if api.record_usage(&spool_id, usage_payload(100.0)).is_ok() {
                    landed += 1;
                }
            }
            landed
        }));
    }

    let landed: u32 = handles
        .into_iter()
        .map(|h| h.join().expect("worker thread panicked"))
        .sum();

    assert_eq!(landed, 10, "1000g spool admits exactly ten 100g usages");

    let detail = env.state.filament_api.get(&spool.id).unwrap();
    assert_eq!(detail.spool.remaining_weight, 0.0);
    assert!(detail.spool.remaining_weight >= 0.0);
    assert_eq!(detail.usages.len(), 10);
}
