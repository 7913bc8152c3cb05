//! Rating observations and the keys they are indexed by.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Team identifier as it appears in the ratings data (e.g. "Boston Celtics").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(name: impl Into<String>) -> Self {
        TeamId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        TeamId(s.to_string())
    }
}

impl From<String> for TeamId {
    fn from(s: String) -> Self {
        TeamId(s)
    }
}

impl Borrow<str> for TeamId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Label of a chart period (typically a season year).
///
/// Keys order by the numeric value of their label. Labels that do not parse
/// as numbers sort after every numeric label, lexically among themselves.
/// Two keys are equal only when their labels are equal.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct PeriodKey(String);

impl PeriodKey {
    pub fn new(label: impl Into<String>) -> Self {
        PeriodKey(label.into().trim().to_string())
    }

    /// Period key for the season a calendar date falls in.
    pub fn from_year(year: i32) -> Self {
        PeriodKey(year.to_string())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_year(date.year())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// Numeric value of the label, if it has one.
    pub fn numeric(&self) -> Option<f64> {
        self.0.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Accepts a string label or a JSON number (`2023` and `"2023"` are the same key).
impl<'de> Deserialize<'de> for PeriodKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(i64),
            Float(f64),
            Label(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Int(n) => PeriodKey(n.to_string()),
            Repr::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                PeriodKey((v as i64).to_string())
            }
            Repr::Float(v) => PeriodKey(v.to_string()),
            Repr::Label(s) => PeriodKey::new(s),
        })
    }
}

impl PartialEq for PeriodKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for PeriodKey {}

impl std::hash::Hash for PeriodKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.total_cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeriodKey {
    fn from(s: &str) -> Self {
        PeriodKey::new(s)
    }
}

impl From<i32> for PeriodKey {
    fn from(year: i32) -> Self {
        PeriodKey::from_year(year)
    }
}

/// A single rating observation, one per game or rating update.
///
/// `rating` is `None` when the source carried a value that is not a finite
/// number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingObservation {
    pub period: PeriodKey,
    pub team: TeamId,
    pub rating: Option<f64>,
}

impl RatingObservation {
    pub fn new(period: impl Into<PeriodKey>, team: impl Into<TeamId>, rating: f64) -> Self {
        Self {
            period: period.into(),
            team: team.into(),
            rating: Some(rating).filter(|r| r.is_finite()),
        }
    }
}

/// Dated rating record as stored by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub date: NaiveDate,
    pub team: TeamId,
    pub rating: Option<f64>,
}

impl RatingRecord {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn to_observation(&self) -> RatingObservation {
        RatingObservation {
            period: PeriodKey::from_date(self.date),
            team: self.team.clone(),
            rating: self.rating,
        }
    }
}

/// Inclusive date bounds for a fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl DateBounds {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}
