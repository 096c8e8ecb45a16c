// Standings-derived reports: fraud watch and per-season team pages.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::league::{League, TeamStanding};
use crate::roster::{TeamId, TeamInfo};

// ---------------------------------------------------------------------------
// Fraud watch
// ---------------------------------------------------------------------------

/// Penalty weights applied to the points-for / points-against percentiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FraudWeights {
    pub points_for: f64,
    pub points_against: f64,
}

impl Default for FraudWeights {
    fn default() -> Self {
        Self {
            points_for: 0.75,
            points_against: 0.5,
        }
    }
}

/// How much a team's record outruns its scoring and schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FraudWatchEntry {
    #[serde(flatten)]
    pub team: TeamInfo,
    pub record: String,
    pub win_pct: f64,
    /// Position of points-for within the league range, 0..=100.
    pub pf_percentile: f64,
    /// Position of points-against within the league range, 0..=100.
    pub pa_percentile: f64,
    pub fraud_score: f64,
}

/// Rank teams by fraud score, most fraudulent first.
///
/// `fraud_score = win% - pf_percentile * w_pf - pa_percentile * w_pa`. A team
/// winning a lot while scoring little against soft opponents floats to the top.
/// Percentiles are min-max scaled; when every team has the same value the
/// percentile is 50.
pub fn fraud_watch(teams: &[TeamStanding], weights: FraudWeights) -> Vec<FraudWatchEntry> {
    let (pf_min, pf_max) = min_max(teams.iter().map(|t| t.points_for));
    let (pa_min, pa_max) = min_max(teams.iter().map(|t| t.points_against));

    let mut entries: Vec<FraudWatchEntry> = teams
        .iter()
        .map(|t| {
            let games = t.games_played();
            let win_pct = if games > 0 {
                t.wins as f64 / games as f64 * 100.0
            } else {
                0.0
            };
            let pf_percentile = range_percentile(t.points_for, pf_min, pf_max);
            let pa_percentile = range_percentile(t.points_against, pa_min, pa_max);
            let fraud_score = win_pct
                - pf_percentile * weights.points_for
                - pa_percentile * weights.points_against;

            FraudWatchEntry {
                team: t.info.clone(),
                record: t.record(),
                win_pct,
                pf_percentile,
                pa_percentile,
                fraud_score,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.fraud_score.total_cmp(&a.fraud_score));
    entries
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0))
}

fn range_percentile(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min) * 100.0
    } else {
        50.0
    }
}

// ---------------------------------------------------------------------------
// Team pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPlayer {
    pub name: String,
    pub position: String,
    pub pro_team: String,
    pub total_points: f64,
    pub avg_points: f64,
}

/// One team's season at a glance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamYearStats {
    #[serde(flatten)]
    pub team: TeamInfo,
    pub season: u16,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub record: String,
    pub playoff_placement: String,
    pub points_for: f64,
    pub points_against: f64,
    pub top_players: Vec<TopPlayer>,
}

/// Human-readable playoff outcome.
///
/// Final rank wins when known, then the playoff seed, then the current
/// standing measured against the number of playoff spots.
pub fn playoff_placement(team: &TeamStanding, playoff_teams: u32) -> String {
    if let Some(rank) = team.final_rank.filter(|&r| r > 0) {
        return match rank {
            1 => "Champion".to_string(),
            2 => "Runner-up".to_string(),
            n if n <= playoff_teams => format!("{} Place", ordinal(n)),
            _ => "Did not make playoffs".to_string(),
        };
    }
    if let Some(seed) = team.playoff_seed.filter(|&s| s > 0) {
        return format!("#{seed} Seed");
    }
    if let Some(rank) = team.current_rank.filter(|&r| r > 0) {
        return if rank <= playoff_teams {
            format!("#{rank} Seed")
        } else {
            "Did not make playoffs".to_string()
        };
    }
    "Unknown".to_string()
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Build every team's page for one season, best record first
/// (wins, then points for, both descending).
pub fn team_year_stats(league: &League, top_n: usize) -> Vec<TeamYearStats> {
    let mut pages: Vec<TeamYearStats> = league
        .teams
        .iter()
        .map(|t| TeamYearStats {
            team: t.info.clone(),
            season: league.season,
            wins: t.wins,
            losses: t.losses,
            ties: t.ties,
            record: t.record(),
            playoff_placement: playoff_placement(t, league.playoff_teams),
            points_for: t.points_for,
            points_against: t.points_against,
            top_players: top_players(league, t.info.team_id, top_n),
        })
        .collect();

    pages.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.points_for.total_cmp(&a.points_for))
    });
    pages
}

fn top_players(league: &League, team_id: TeamId, top_n: usize) -> Vec<TopPlayer> {
    let mut players: Vec<TopPlayer> = league
        .players
        .iter()
        .filter(|p| p.fantasy_team_id == Some(team_id) && p.total_points != 0.0)
        .map(|p| TopPlayer {
            name: p.name.clone(),
            position: p
                .position
                .map(|pos| pos.display_str().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            pro_team: p.pro_team.clone(),
            total_points: p.total_points,
            avg_points: p.avg_points,
        })
        .collect();

    players.sort_by(|a, b| b.total_points.total_cmp(&a.total_points));
    players.truncate(top_n);
    players
}

/// A team's pages across seasons, newest season first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamHistory {
    #[serde(flatten)]
    pub team: TeamInfo,
    pub seasons: Vec<TeamYearStats>,
}

/// Merge per-season pages by team id. The newest season's name and owner
/// label the team.
pub fn merge_team_histories(seasons: &[Vec<TeamYearStats>]) -> Vec<TeamHistory> {
    let mut merged: BTreeMap<TeamId, TeamHistory> = BTreeMap::new();

    for pages in seasons {
        for page in pages {
            let history = merged
                .entry(page.team.team_id)
                .or_insert_with(|| TeamHistory {
                    team: page.team.clone(),
                    seasons: Vec::new(),
                });
            if history.seasons.iter().all(|s| page.season > s.season) {
                history.team = page.team.clone();
            }
            history.seasons.push(page.clone());
        }
    }

    let mut histories: Vec<TeamHistory> = merged.into_values().collect();
    for history in &mut histories {
        history.seasons.sort_by(|a, b| b.season.cmp(&a.season));
    }
    histories
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
