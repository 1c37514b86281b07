//! Bounded, fixed-delay retry as an explicit state machine.
//!
//! ```text
//! Attempting(n) --ok--------------------------> Succeeded(n)
//! Attempting(n) --fail, n < max_retries-------> Retrying(n + 1) --delay--> Attempting(n + 1)
//! Attempting(n) --fail, n == max_retries------> Exhausted(n + 1 attempts)
//! ```
//!
//! The executor drives the transitions; the policy only decides them, so the
//! attempt bound can be tested without any I/O.

use std::time::Duration;

use crate::config::RequestConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    /// About to send; `retry_count` attempts have already failed.
    Attempting { retry_count: u32 },
    /// The last attempt failed; wait, then attempt again.
    Retrying { retry_count: u32 },
    Succeeded { retry_count: u32 },
    Exhausted { attempts: u32 },
}

impl AttemptState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptState::Succeeded { .. } | AttemptState::Exhausted { .. })
    }
}

/// Fixed-delay policy allowing `max_retries + 1` attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn from_config(config: &RequestConfig) -> Self {
        Self::new(config.max_retries, config.retry_delay)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn start(&self) -> AttemptState {
        AttemptState::Attempting { retry_count: 0 }
    }

    /// Next state after `state`. `succeeded` is only consulted while
    /// attempting; terminal states are absorbing.
    pub fn next(&self, state: AttemptState, succeeded: bool) -> AttemptState {
        match state {
            AttemptState::Attempting { retry_count } if succeeded => {
                AttemptState::Succeeded { retry_count }
            }
            AttemptState::Attempting { retry_count } if retry_count >= self.max_retries => {
                AttemptState::Exhausted {
                    attempts: retry_count + 1,
                }
            }
            AttemptState::Attempting { retry_count } => AttemptState::Retrying {
                retry_count: retry_count + 1,
            },
            AttemptState::Retrying { retry_count } => AttemptState::Attempting { retry_count },
            terminal => terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::from_millis(100))
    }

    /// Drive the machine with a fixed outcome per attempt, counting attempts.
    fn run(policy: RetryPolicy, outcomes: &[bool]) -> (AttemptState, usize) {
        let mut state = policy.start();
        let mut attempts = 0;
        while !state.is_terminal() {
            if let AttemptState::Attempting { .. } = state {
                let ok = outcomes.get(attempts).copied().unwrap_or(false);
                attempts += 1;
                state = policy.next(state, ok);
            } else {
                state = policy.next(state, false);
            }
        }
        (state, attempts)
    }

    #[test]
    fn success_on_first_attempt() {
        assert_eq!(run(policy(3), &[true]), (AttemptState::Succeeded { retry_count: 0 }, 1));
    }

    #[test]
    fn success_after_two_failures() {
        assert_eq!(
            run(policy(3), &[false, false, true]),
            (AttemptState::Succeeded { retry_count: 2 }, 3)
        );
    }

    #[test]
    fn always_failing_makes_max_retries_plus_one_attempts() {
        for max_retries in 0..6 {
            let (state, attempts) = run(policy(max_retries), &[]);
            assert_eq!(state, AttemptState::Exhausted { attempts: max_retries + 1 });
            assert_eq!(attempts as u32, max_retries + 1);
        }
    }

    #[test]
    fn success_on_last_allowed_attempt() {
        assert_eq!(
            run(policy(1), &[false, true]),
            (AttemptState::Succeeded { retry_count: 1 }, 2)
        );
    }

    #[test]
    fn retrying_resumes_attempting_with_same_count() {
        let p = policy(3);
        assert_eq!(
            p.next(AttemptState::Retrying { retry_count: 2 }, true),
            AttemptState::Attempting { retry_count: 2 }
        );
    }

    #[test]
    fn terminal_states_absorb() {
        let p = policy(3);
        let done = AttemptState::Exhausted { attempts: 4 };
        assert_eq!(p.next(done, true), done);
        let ok = AttemptState::Succeeded { retry_count: 1 };
        assert_eq!(p.next(ok, false), ok);
    }

    #[test]
    fn policy_reads_config() {
        let config = RequestConfig::default()
            .with_max_retries(5)
            .with_retry_delay(Duration::from_millis(500));
        let p = RetryPolicy::from_config(&config);
        assert_eq!(p.max_attempts(), 6);
        assert_eq!(p.delay(), Duration::from_millis(500));
    }
}
