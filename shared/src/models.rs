use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Advisory stance carried by alerts and poll votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Buy,
    Sell,
    Hold,
}

/// Coarse signal derived from the recent rate trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suggestion {
    Good,
    Bad,
    Neutral,
}

/// One day of exchange-rate history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSample {
    pub date: NaiveDate,
    pub rate: f64,
}

/// Projected rate with a `[low, high]` confidence band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub rate: f64,
    pub confidence: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub created: DateTime<Utc>,
    pub triggered: bool,
    pub rate: f64,
    pub email: String,
    #[serde(rename = "type")]
    pub alert_type: SignalType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollVote {
    pub id: String,
    pub created: DateTime<Utc>,
    pub vote: SignalType,
    pub email: Option<String>,
}

/// Alert submission body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAlert {
    pub rate: f64,
    pub email: String,
    #[serde(rename = "type")]
    pub alert_type: SignalType,
}

/// Poll submission body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPoll {
    pub vote: SignalType,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub count: usize,
    pub percentage: u32,
}

/// Poll results keyed the way the frontend labels them: yes=buy, neutral=hold, no=sell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSummary {
    pub yes: VoteTally,
    pub neutral: VoteTally,
    pub no: VoteTally,
    pub total: usize,
}
