// Season-long lineup mismanagement aggregation.
//
// For every team and every week with data, compares the points the manager
// actually started against the optimal lineup from the same roster pool, then
// ranks teams by how much of their optimum they captured.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::lineup::compute_optimal_score;
use crate::matchup::WeekBoxScores;
use crate::roster::{actual_score, RosterEntry, TeamId, TeamInfo};

/// Differences smaller than this are float noise from summing the same
/// players in a different order.
const SCORE_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One team's full roster pool (starters and bench) for one week.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamWeekLineup {
    pub team_id: TeamId,
    pub entries: Vec<RosterEntry>,
}

/// Everything the aggregator needs for one season.
///
/// `weeks` holds only the weeks whose data was fetched; a week missing from
/// the map is skipped for every team.
#[derive(Debug, Clone, Default)]
pub struct LeagueSchedule {
    pub teams: Vec<TeamInfo>,
    pub weeks: BTreeMap<u32, Vec<TeamWeekLineup>>,
}

impl LeagueSchedule {
    pub fn new(teams: Vec<TeamInfo>) -> Self {
        Self {
            teams,
            weeks: BTreeMap::new(),
        }
    }

    /// Add (or replace) a week's lineups.
    pub fn insert_week(&mut self, week: u32, lineups: Vec<TeamWeekLineup>) {
        self.weeks.insert(week, lineups);
    }

    /// Build a schedule from fetched box scores, one lineup per matchup side.
    pub fn from_box_scores<'a>(
        teams: Vec<TeamInfo>,
        box_scores: impl IntoIterator<Item = &'a WeekBoxScores>,
    ) -> Self {
        let mut schedule = Self::new(teams);
        for week in box_scores {
            let lineups = week
                .sides()
                .map(|side| TeamWeekLineup {
                    team_id: side.team_id,
                    entries: side.lineup.clone(),
                })
                .collect();
            schedule.insert_week(week.week, lineups);
        }
        schedule
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamWeekRecord {
    pub week: u32,
    pub optimal_score: f64,
    pub actual_score: f64,
    pub mismanagement: f64,
}

/// A team's accumulated lineup efficiency for the season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSeasonSummary {
    pub team_id: TeamId,
    pub team_name: String,
    pub owner: String,
    pub weeks: Vec<TeamWeekRecord>,
    pub total_optimal_points: f64,
    pub total_actual_points: f64,
    pub total_mismanagement: f64,
    /// `total_actual_points / total_optimal_points * 100`, or 0 when the
    /// optimal total is 0.
    pub percentage_scored: f64,
}

impl TeamSeasonSummary {
    pub fn new(info: &TeamInfo) -> Self {
        Self {
            team_id: info.team_id,
            team_name: info.team_name.clone(),
            owner: info.owner.clone(),
            weeks: Vec::new(),
            total_optimal_points: 0.0,
            total_actual_points: 0.0,
            total_mismanagement: 0.0,
            percentage_scored: 0.0,
        }
    }

    /// Fold one week into the running totals.
    pub fn record(&mut self, record: TeamWeekRecord) {
        self.total_optimal_points += record.optimal_score;
        self.total_actual_points += record.actual_score;
        self.total_mismanagement += record.mismanagement;
        self.percentage_scored =
            percentage_scored(self.total_actual_points, self.total_optimal_points);
        self.weeks.push(record);
    }
}

/// Share of the optimum actually scored, as a percentage. Zero optimum gives 0.
pub fn percentage_scored(actual: f64, optimal: f64) -> f64 {
    if optimal == 0.0 {
        0.0
    } else {
        actual / optimal * 100.0
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Score one team-week: optimal vs. actual from the same roster pool.
pub fn score_team_week(week: u32, entries: &[RosterEntry]) -> TeamWeekRecord {
    let optimal_score = compute_optimal_score(entries);
    let actual_score = actual_score(entries);

    let mut mismanagement = optimal_score - actual_score;
    if mismanagement.abs() < SCORE_EPSILON {
        mismanagement = 0.0;
    }

    TeamWeekRecord {
        week,
        optimal_score,
        actual_score,
        mismanagement,
    }
}

/// Build every team's season summary.
///
/// Teams listed in `schedule.teams` always get a summary, even with no weeks.
/// Lineups for team ids not in that list are still counted, under an
/// "Unknown" identity.
pub fn build_season_summaries(schedule: &LeagueSchedule) -> BTreeMap<TeamId, TeamSeasonSummary> {
    let mut summaries: BTreeMap<TeamId, TeamSeasonSummary> = schedule
        .teams
        .iter()
        .map(|t| (t.team_id, TeamSeasonSummary::new(t)))
        .collect();

    for (&week, lineups) in &schedule.weeks {
        debug!(week, teams = lineups.len(), "scoring week");
        for lineup in lineups {
            let record = score_team_week(week, &lineup.entries);

            if record.mismanagement < 0.0 {
                // Only possible when the league's lineup has more starting
                // slots than the solver's fixed layout.
                warn!(
                    "team {} week {}: actual {:.2} exceeds optimal {:.2}",
                    lineup.team_id, week, record.actual_score, record.optimal_score
                );
            }

            summaries
                .entry(lineup.team_id)
                .or_insert_with(|| {
                    warn!("week {} has lineup for unlisted team {}", week, lineup.team_id);
                    TeamSeasonSummary::new(&TeamInfo::unknown(lineup.team_id))
                })
                .record(record);
        }
    }

    summaries
}

/// Order summaries worst manager first (ascending `percentage_scored`).
/// Equal percentages keep team id order.
pub fn rank_by_efficiency(
    summaries: BTreeMap<TeamId, TeamSeasonSummary>,
) -> Vec<TeamSeasonSummary> {
    let mut ranked: Vec<TeamSeasonSummary> = summaries.into_values().collect();
    ranked.sort_by(|a, b| a.percentage_scored.total_cmp(&b.percentage_scored));
    ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
