// src/race.rs
//
// First-success racing across interchangeable model backends. One race
// launches every candidate at once, returns the first clean success, and
// cancels the rest. If nothing succeeds the caller gets every candidate's
// individual failure back, so operators can see which backend did what.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Input to one race invocation. Built fresh per translation request.
#[derive(Debug, Clone)]
pub struct RaceConfig {
    /// Maximum wall-clock duration for the whole race.
    pub global_deadline: Duration,
    /// Maximum duration for any single candidate. Defaults to the global
    /// deadline when unset.
    pub per_candidate_timeout: Option<Duration>,
}

impl RaceConfig {
    pub fn new(global_deadline: Duration) -> Self {
        Self {
            global_deadline,
            per_candidate_timeout: None,
        }
    }

    pub fn with_per_candidate_timeout(mut self, timeout: Duration) -> Self {
        self.per_candidate_timeout = Some(timeout);
        self
    }

    fn candidate_timeout(&self) -> Duration {
        self.per_candidate_timeout.unwrap_or(self.global_deadline)
    }
}

/// One independently-racing unit of work, tagged with the model id that
/// produced it. Candidates share nothing but the read-only request payload
/// captured in their futures.
pub struct Candidate<T> {
    id: String,
    op: BoxFuture<'static, Result<T, FailureDetail>>,
}

impl<T> Candidate<T> {
    pub fn new<F>(id: impl Into<String>, op: F) -> Self
    where
        F: Future<Output = Result<T, FailureDetail>> + Send + 'static,
    {
        Self {
            id: id.into(),
            op: op.boxed(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Terminal report of one candidate. `result` holds the payload on success or
/// the failure detail otherwise, never both; `latency_ms` is always present.
#[derive(Debug)]
pub struct CandidateOutcome<T> {
    pub candidate_id: String,
    pub latency_ms: u64,
    pub result: Result<T, FailureDetail>,
}

impl<T> CandidateOutcome<T> {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Why a candidate failed. Non-timeout transport problems and malformed
/// upstream responses are flattened into `Transport`; only timeouts get their
/// own tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureDetail {
    /// Upstream answered with a non-success status.
    Api { status: u16, body: String },
    /// The request never completed cleanly.
    Transport { message: String },
    /// The candidate exceeded its own timeout.
    TimedOut,
    /// The candidate stopped without reporting an outcome.
    Aborted,
}

/// One losing candidate's report, as surfaced in a total-failure result.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateFailure {
    pub candidate_id: String,
    pub latency_ms: u64,
    pub detail: FailureDetail,
}

/// The single successful outcome of a race.
#[derive(Debug)]
pub struct Winner<T> {
    pub candidate_id: String,
    pub latency_ms: u64,
    pub payload: T,
}

#[derive(Debug, Error)]
pub enum RaceError {
    /// The race never started; no candidate was launched.
    #[error("Invalid race configuration: {0}")]
    InvalidConfig(String),

    /// Every candidate terminated with a failure before the deadline.
    /// Failures are listed in the order their outcomes were observed.
    #[error("All {} model candidates failed", .failures.len())]
    AllFailed { failures: Vec<CandidateFailure> },

    /// The global deadline fired before any candidate succeeded. Candidates
    /// that never terminated are reported as timed out.
    #[error("Race deadline of {deadline:?} elapsed before any candidate succeeded")]
    DeadlineExceeded {
        deadline: Duration,
        failures: Vec<CandidateFailure>,
    },
}

/// Races all candidates concurrently and returns the first success.
///
/// Every candidate is bounded by the per-candidate timeout, the whole race by
/// the global deadline. The first successful outcome wins; the remaining
/// candidates are told to stop and their acknowledgement is not awaited.
/// Ties are broken by whichever outcome is observed first, which is
/// deliberately not reproducible run-to-run.
pub async fn race<T>(
    candidates: Vec<Candidate<T>>,
    config: &RaceConfig,
) -> Result<Winner<T>, RaceError>
where
    T: Send + 'static,
{
    validate(&candidates, config)?;

    let race_started = Instant::now();
    let deadline = tokio::time::sleep(config.global_deadline);
    tokio::pin!(deadline);

    let candidate_timeout = config.candidate_timeout();
    let mut pending: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();

    let mut in_flight = JoinSet::new();
    for Candidate { id, op } in candidates {
        in_flight.spawn(async move {
            let started = Instant::now();
            let result = match tokio::time::timeout(candidate_timeout, op).await {
                Ok(result) => result,
                Err(_) => Err(FailureDetail::TimedOut),
            };
            CandidateOutcome {
                candidate_id: id,
                latency_ms: started.elapsed().as_millis() as u64,
                result,
            }
        });
    }

    let mut failures: Vec<CandidateFailure> = Vec::new();

    loop {
        tokio::select! {
            joined = in_flight.join_next() => match joined {
                Some(Ok(outcome)) => {
                    pending.retain(|id| id != &outcome.candidate_id);
                    match outcome.result {
                        Ok(payload) => {
                            in_flight.abort_all();
                            return Ok(Winner {
                                candidate_id: outcome.candidate_id,
                                latency_ms: outcome.latency_ms,
                                payload,
                            });
                        }
                        Err(detail) => failures.push(CandidateFailure {
                            candidate_id: outcome.candidate_id,
                            latency_ms: outcome.latency_ms,
                            detail,
                        }),
                    }
                }
                // The task died without reporting (panic); the id stays in
                // `pending` and is attributed once the set drains.
                Some(Err(join_error)) => {
                    log::warn!("candidate task failed before reporting: {join_error}");
                }
                None => {
                    let latency_ms = race_started.elapsed().as_millis() as u64;
                    for candidate_id in pending.drain(..) {
                        failures.push(CandidateFailure {
                            candidate_id,
                            latency_ms,
                            detail: FailureDetail::Aborted,
                        });
                    }
                    return Err(RaceError::AllFailed { failures });
                }
            },
            _ = &mut deadline => {
                in_flight.abort_all();
                let latency_ms = race_started.elapsed().as_millis() as u64;
                for candidate_id in pending.drain(..) {
                    failures.push(CandidateFailure {
                        candidate_id,
                        latency_ms,
                        detail: FailureDetail::TimedOut,
                    });
                }
                return Err(RaceError::DeadlineExceeded {
                    deadline: config.global_deadline,
                    failures,
                });
            }
        }
    }
}

fn validate<T>(candidates: &[Candidate<T>], config: &RaceConfig) -> Result<(), RaceError> {
    if candidates.is_empty() {
        return Err(RaceError::InvalidConfig(
            "candidate list is empty".to_string(),
        ));
    }
    if config.global_deadline.is_zero() {
        return Err(RaceError::InvalidConfig(
            "global deadline must be positive".to_string(),
        ));
    }
    if let Some(timeout) = config.per_candidate_timeout {
        if timeout.is_zero() {
            return Err(RaceError::InvalidConfig(
                "per-candidate timeout must be positive".to_string(),
            ));
        }
    }

    let mut seen = HashSet::new();
    for candidate in candidates {
        if !seen.insert(candidate.id.as_str()) {
            return Err(RaceError::InvalidConfig(format!(
                "duplicate candidate id '{}'",
                candidate.id
            )));
        }
    }

    Ok(())
}
