// tests/race_tests.rs
//
// Coordinator behavior under controlled timing. Timing-sensitive tests run on
// tokio's paused clock, so every duration below is virtual and the assertions
// are deterministic.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use emoji_relay::race::{race, Candidate, FailureDetail, RaceConfig, RaceError};
use tokio::time::{sleep, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn succeeds_after(id: &str, delay: Duration, value: &str) -> Candidate<String> {
    let value = value.to_string();
    Candidate::new(id, async move {
        sleep(delay).await;
        Ok(value)
    })
}

fn fails_after(id: &str, delay: Duration, status: u16) -> Candidate<String> {
    Candidate::new(id, async move {
        sleep(delay).await;
        Err(FailureDetail::Api {
            status,
            body: "upstream error".to_string(),
        })
    })
}

#[tokio::test(start_paused = true)]
async fn first_success_wins_and_is_timely() {
    let started = Instant::now();
    let candidates = vec![
        succeeds_after("model-a", ms(50), "from a"),
        fails_after("model-b", ms(30), 500),
        succeeds_after("model-c", ms(200), "from c"),
    ];
    let config = RaceConfig::new(ms(500)).with_per_candidate_timeout(ms(500));

    let winner = race(candidates, &config).await.expect("expected a winner");

    assert_eq!(winner.candidate_id, "model-a");
    assert_eq!(winner.payload, "from a");
    assert!(winner.latency_ms >= 50 && winner.latency_ms < 100);

    let elapsed = started.elapsed();
    assert!(
        elapsed >= ms(50) && elapsed < ms(100),
        "returned at {elapsed:?}, expected about 50ms"
    );
}

#[tokio::test(start_paused = true)]
async fn earlier_success_beats_later_success_every_run() {
    for _ in 0..5 {
        let candidates = vec![
            succeeds_after("slow", ms(80), "slow"),
            succeeds_after("fast", ms(20), "fast"),
        ];
        let config = RaceConfig::new(ms(500));

        let winner = race(candidates, &config).await.expect("expected a winner");
        assert_eq!(winner.candidate_id, "fast");
    }
}

#[tokio::test(start_paused = true)]
async fn all_failures_are_aggregated_in_completion_order() {
    let started = Instant::now();
    let candidates = vec![
        fails_after("slow", ms(20), 502),
        fails_after("fast", ms(10), 429),
    ];
    let config = RaceConfig::new(ms(100));

    let err = race(candidates, &config)
        .await
        .expect_err("expected total failure");
    let elapsed = started.elapsed();

    match err {
        RaceError::AllFailed { failures } => {
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0].candidate_id, "fast");
            assert_eq!(failures[1].candidate_id, "slow");
            assert_eq!(
                failures[0].detail,
                FailureDetail::Api {
                    status: 429,
                    body: "upstream error".to_string()
                }
            );
        }
        other => panic!("expected AllFailed, got {other:?}"),
    }

    // Resolves once the last candidate reports, well before the deadline.
    assert!(
        elapsed >= ms(20) && elapsed < ms(60),
        "returned at {elapsed:?}, expected about 20ms"
    );
}

#[tokio::test(start_paused = true)]
async fn global_deadline_caps_the_race() {
    let started = Instant::now();
    let candidates = vec![
        succeeds_after("stuck-a", Duration::from_secs(10), "never"),
        succeeds_after("stuck-b", Duration::from_secs(10), "never"),
    ];
    // Per-candidate timeout is looser than the deadline, so only the global
    // deadline can end this race.
    let config = RaceConfig::new(ms(100)).with_per_candidate_timeout(ms(200));

    let err = race(candidates, &config)
        .await
        .expect_err("expected deadline");
    let elapsed = started.elapsed();

    match err {
        RaceError::DeadlineExceeded { deadline, failures } => {
            assert_eq!(deadline, ms(100));
            assert_eq!(failures.len(), 2);
            assert!(failures.iter().all(|f| f.detail == FailureDetail::TimedOut));
        }
        other => panic!("expected DeadlineExceeded, got {other:?}"),
    }

    // Returns within a small margin of the deadline even though both
    // candidates would happily keep running for ten seconds.
    assert!(
        elapsed >= ms(100) && elapsed < ms(150),
        "returned at {elapsed:?}, expected about 100ms"
    );
}

#[tokio::test(start_paused = true)]
async fn per_candidate_timeout_is_reported_distinctly() {
    let candidates = vec![
        fails_after("errors-out", ms(10), 500),
        succeeds_after("too-slow", ms(500), "late"),
    ];
    let config = RaceConfig::new(ms(200)).with_per_candidate_timeout(ms(50));

    let err = race(candidates, &config)
        .await
        .expect_err("expected total failure");

    match err {
        RaceError::AllFailed { failures } => {
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0].candidate_id, "errors-out");
            assert!(matches!(
                failures[0].detail,
                FailureDetail::Api { status: 500, .. }
            ));
            assert_eq!(failures[1].candidate_id, "too-slow");
            assert_eq!(failures[1].detail, FailureDetail::TimedOut);
        }
        other => panic!("expected AllFailed, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn candidate_timeout_and_deadline_compose() {
    // A succeeds after its own timeout would have fired; B succeeds in time.
    let candidates = vec![
        succeeds_after("beyond-own-timeout", ms(80), "late"),
        succeeds_after("in-time", ms(40), "on time"),
    ];
    let config = RaceConfig::new(ms(500)).with_per_candidate_timeout(ms(60));

    let winner = race(candidates, &config).await.expect("expected a winner");
    assert_eq!(winner.candidate_id, "in-time");
}

#[tokio::test(start_paused = true)]
async fn loser_is_cancelled_after_first_success() {
    let loser_finished = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&loser_finished);

    let candidates = vec![
        succeeds_after("winner", ms(10), "first"),
        Candidate::new("loser", async move {
            sleep(ms(50)).await;
            flag.store(true, Ordering::SeqCst);
            Ok("second".to_string())
        }),
    ];
    let config = RaceConfig::new(ms(500));

    let winner = race(candidates, &config).await.expect("expected a winner");
    assert_eq!(winner.candidate_id, "winner");

    // Give the aborted task every chance to run if it were still alive.
    sleep(ms(200)).await;
    assert!(
        !loser_finished.load(Ordering::SeqCst),
        "loser kept running past cancellation"
    );
}

#[tokio::test]
async fn empty_candidate_list_fails_fast() {
    let candidates: Vec<Candidate<String>> = Vec::new();
    let config = RaceConfig::new(ms(100));

    let err = race(candidates, &config)
        .await
        .expect_err("expected config error");
    assert!(matches!(err, RaceError::InvalidConfig(_)));
}

#[tokio::test]
async fn invalid_durations_fail_fast_without_launching() {
    let launches = Arc::new(AtomicUsize::new(0));
    let counted = |id: &str| {
        let launches = Arc::clone(&launches);
        Candidate::<String>::new(id, async move {
            launches.fetch_add(1, Ordering::SeqCst);
            Ok("unreachable".to_string())
        })
    };

    let candidates = vec![counted("a"), counted("b")];
    let config = RaceConfig::new(Duration::ZERO);

    let err = race(candidates, &config)
        .await
        .expect_err("expected config error");
    assert!(matches!(err, RaceError::InvalidConfig(_)));
    assert_eq!(launches.load(Ordering::SeqCst), 0);

    let candidates = vec![counted("a"), counted("b")];
    let config = RaceConfig::new(ms(100)).with_per_candidate_timeout(Duration::ZERO);

    let err = race(candidates, &config)
        .await
        .expect_err("expected config error");
    assert!(matches!(err, RaceError::InvalidConfig(_)));
    assert_eq!(launches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn duplicate_candidate_ids_are_rejected() {
    let candidates = vec![
        succeeds_after("same", ms(10), "x"),
        succeeds_after("same", ms(20), "y"),
    ];
    let config = RaceConfig::new(ms(100));

    let err = race(candidates, &config)
        .await
        .expect_err("expected config error");
    assert!(matches!(err, RaceError::InvalidConfig(_)));
}
