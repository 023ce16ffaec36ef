//! In-memory data store backing the API.
//!
//! All data is synthetic: rate history and the initial poll votes are
//! generated at construction, alerts and further votes accumulate for the
//! lifetime of the process. Nothing is persisted.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{
    Alert, ForecastPoint, NewAlert, NewPoll, PollSummary, PollVote, RateSample, SignalType,
    Suggestion, VoteTally,
};

/// Base JPY→VND rate the synthetic history oscillates around.
const BASE_RATE: f64 = 172.3;
/// Days of history generated before today (inclusive range, so 31 samples).
const HISTORY_DAYS: i64 = 30;
/// Poll votes seeded at startup.
const SEED_VOTES: usize = 1400;
/// Samples considered by the trend suggestion.
const SUGGESTION_WINDOW: usize = 7;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("rate history is empty")]
    EmptyHistory,
}

struct Inner {
    history: Vec<RateSample>,
    alerts: Vec<Alert>,
    polls: Vec<PollVote>,
    rng: StdRng,
}

/// Shared in-memory store. Collections and the RNG sit behind one `RwLock`;
/// writers (submissions, forecast noise) take the write lock so concurrent
/// handlers never mutate in parallel.
pub struct MemStore {
    inner: RwLock<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic store: the seed drives history, the initial poll votes
    /// and forecast noise.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(mut rng: StdRng) -> Self {
        let today = Utc::now().date_naive();
        let now = Utc::now();

        // Smooth oscillation around the base rate plus small positive noise.
        let mut history = Vec::with_capacity(HISTORY_DAYS as usize + 1);
        for i in (0..=HISTORY_DAYS).rev() {
            let variation = (i as f64 / 5.0).sin() * 3.0 + rng.gen_range(0.0..0.5);
            history.push(RateSample {
                date: today - Duration::days(i),
                rate: round2(BASE_RATE + variation),
            });
        }

        let mut polls = Vec::with_capacity(SEED_VOTES);
        for n in 0..SEED_VOTES {
            let draw: f64 = rng.gen();
            let vote = if draw < 0.68 {
                SignalType::Buy
            } else if draw < 0.90 {
                SignalType::Hold
            } else {
                SignalType::Sell
            };
            polls.push(PollVote {
                id: (n + 1).to_string(),
                created: now,
                vote,
                email: None,
            });
        }

        tracing::debug!(
            "generated {} rate samples and {} seed votes",
            history.len(),
            polls.len()
        );

        Self {
            inner: RwLock::new(Inner {
                history,
                alerts: Vec::new(),
                polls,
                rng,
            }),
        }
    }

    /// Rate of the most recent history sample.
    pub async fn current_rate(&self) -> Result<f64, StoreError> {
        let inner = self.inner.read().await;
        inner
            .history
            .last()
            .map(|sample| sample.rate)
            .ok_or(StoreError::EmptyHistory)
    }

    /// Last `days` samples in chronological order. Non-positive `days`
    /// yields an empty slice, more days than exist yields everything.
    pub async fn rate_history(&self, days: i64) -> Vec<RateSample> {
        let inner = self.inner.read().await;
        let len = inner.history.len();
        let take = (days.max(0) as usize).min(len);
        inner.history[len - take..].to_vec()
    }

    /// Projection starting tomorrow: a mild upward drift with noise and a
    /// confidence band that widens with the horizon.
    pub async fn forecast(&self, days: i64) -> Result<Vec<ForecastPoint>, StoreError> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let current = inner
            .history
            .last()
            .map(|sample| sample.rate)
            .ok_or(StoreError::EmptyHistory)?;

        let start = Utc::now().date_naive() + Duration::days(1);
        let mut points = Vec::with_capacity(days.max(0) as usize);
        for i in 0..days.max(0) {
            let rate = current + i as f64 * 0.5 + inner.rng.gen_range(0.0..0.2);
            let spread = 0.5 + i as f64 * 0.3;
            points.push(ForecastPoint {
                date: start + Duration::days(i),
                rate: round2(rate),
                confidence: [round2(rate - spread), round2(rate + spread)],
            });
        }
        Ok(points)
    }

    /// Percent change across the last seven samples: above +1% is good,
    /// below -1% is bad, anything else (including too little data) neutral.
    pub async fn suggestion(&self) -> Suggestion {
        let inner = self.inner.read().await;
        let window = &inner.history[inner.history.len().saturating_sub(SUGGESTION_WINDOW)..];
        if window.len() < 2 {
            return Suggestion::Neutral;
        }

        let first = window[0].rate;
        let last = window[window.len() - 1].rate;
        let percent_change = (last - first) / first * 100.0;

        if percent_change > 1.0 {
            Suggestion::Good
        } else if percent_change < -1.0 {
            Suggestion::Bad
        } else {
            Suggestion::Neutral
        }
    }

    pub async fn create_alert(&self, new: NewAlert) -> Alert {
        let mut inner = self.inner.write().await;
        let alert = Alert {
            id: (inner.alerts.len() + 1).to_string(),
            created: Utc::now(),
            triggered: false,
            rate: new.rate,
            email: new.email,
            alert_type: new.alert_type,
        };
        inner.alerts.push(alert.clone());
        alert
    }

    /// All alerts in insertion order.
    pub async fn alerts(&self) -> Vec<Alert> {
        self.inner.read().await.alerts.clone()
    }

    pub async fn create_poll(&self, new: NewPoll) -> PollVote {
        let mut inner = self.inner.write().await;
        let vote = PollVote {
            id: (inner.polls.len() + 1).to_string(),
            created: Utc::now(),
            vote: new.vote,
            email: new.email,
        };
        inner.polls.push(vote.clone());
        vote
    }

    /// Tally of all votes, seeded and submitted. Percentages are rounded
    /// independently and may not sum to exactly 100.
    pub async fn poll_summary(&self) -> PollSummary {
        let inner = self.inner.read().await;
        let total = inner.polls.len();
        let tally = |vote: SignalType| {
            let count = inner.polls.iter().filter(|p| p.vote == vote).count();
            VoteTally {
                count,
                percentage: percentage(count, total),
            }
        };

        PollSummary {
            yes: tally(SignalType::Buy),
            neutral: tally(SignalType::Hold),
            no: tally(SignalType::Sell),
            total,
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}
