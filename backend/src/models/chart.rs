//! Chart-facing structures produced by the trends pipeline.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ratings::{PeriodKey, TeamId};

/// One chart category: a period with at most one rating per team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub period: PeriodKey,
    pub ratings: BTreeMap<TeamId, f64>,
}

impl PivotRow {
    /// A row for `period` with no team values.
    pub fn empty(period: PeriodKey) -> Self {
        Self {
            period,
            ratings: BTreeMap::new(),
        }
    }

    pub fn rating(&self, team: &TeamId) -> Option<f64> {
        self.ratings.get(team).copied()
    }
}

/// Caller-owned selection of teams and highlighted periods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    #[serde(default)]
    pub teams: BTreeSet<TeamId>,
    #[serde(default)]
    pub global_highlight_period: Option<PeriodKey>,
    #[serde(default)]
    pub per_team_highlight_periods: BTreeMap<TeamId, BTreeSet<PeriodKey>>,
}

impl SelectionState {
    pub fn with_teams<I, T>(teams: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TeamId>,
    {
        Self {
            teams: teams.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn highlight(mut self, team: impl Into<TeamId>, period: impl Into<PeriodKey>) -> Self {
        self.per_team_highlight_periods
            .entry(team.into())
            .or_default()
            .insert(period.into());
        self
    }

    pub fn highlight_all(mut self, period: impl Into<PeriodKey>) -> Self {
        self.global_highlight_period = Some(period.into());
        self
    }

    /// Every period mentioned anywhere in the selection.
    pub fn referenced_periods(&self) -> BTreeSet<PeriodKey> {
        self.per_team_highlight_periods
            .values()
            .flatten()
            .chain(self.global_highlight_period.iter())
            .cloned()
            .collect()
    }

    /// Highlight targets of the displayed teams: per-team periods plus the
    /// global one, in (team, period) order.
    pub fn highlight_targets(&self) -> Vec<(TeamId, PeriodKey)> {
        let mut targets = Vec::new();
        for team in &self.teams {
            let mut periods: BTreeSet<&PeriodKey> = self
                .per_team_highlight_periods
                .get(team)
                .map(|set| set.iter().collect())
                .unwrap_or_default();
            if let Some(global) = &self.global_highlight_period {
                periods.insert(global);
            }
            targets.extend(periods.into_iter().map(|p| (team.clone(), p.clone())));
        }
        targets
    }
}

/// How a highlight value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorKind {
    /// The team has a value at the highlighted period itself.
    Exact,
    /// Borrowed from the nearest earlier period.
    Backward,
    /// Borrowed from the nearest later period.
    Forward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub value: f64,
    pub source_period: PeriodKey,
    pub kind: AnchorKind,
}

/// A point of a highlight overlay. Only the target period carries a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayPoint {
    pub period: PeriodKey,
    pub value: Option<f64>,
}

/// Sparse secondary series emphasising one (team, period) point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightOverlay {
    pub team: TeamId,
    pub period: PeriodKey,
    pub anchor: Anchor,
    pub points: Vec<OverlayPoint>,
}

impl HighlightOverlay {
    /// Value drawn at the target period.
    pub fn value(&self) -> f64 {
        self.anchor.value
    }
}

/// Value-axis range for the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisDomain {
    /// Let the renderer choose.
    Auto,
    Range { min: f64, max: f64 },
}

impl Serialize for AxisDomain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AxisDomain::Auto => serializer.serialize_str("auto"),
            AxisDomain::Range { min, max } => {
                let mut state = serializer.serialize_struct("AxisDomain", 2)?;
                state.serialize_field("min", min)?;
                state.serialize_field("max", max)?;
                state.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for AxisDomain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Label(String),
            Range { min: f64, max: f64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Label(s) if s == "auto" => Ok(AxisDomain::Auto),
            Repr::Label(s) => Err(serde::de::Error::custom(format!(
                "unknown axis domain '{}'",
                s
            ))),
            Repr::Range { min, max } => Ok(AxisDomain::Range { min, max }),
        }
    }
}

/// Everything a chart renderer needs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub rows: Vec<PivotRow>,
    pub teams: Vec<TeamId>,
    pub overlays: Vec<HighlightOverlay>,
    pub domain: AxisDomain,
}

impl ChartData {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            teams: Vec::new(),
            overlays: Vec::new(),
            domain: AxisDomain::Auto,
        }
    }

    /// Primary series of one team over the row axis.
    pub fn series(&self, team: &TeamId) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.rating(team)).collect()
    }
}
