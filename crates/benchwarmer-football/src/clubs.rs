// Boom and bust weekly scores ("200 club" / "sub-100 club").

use std::collections::BTreeMap;

use serde::Serialize;

use crate::matchup::WeekBoxScores;
use crate::roster::{TeamId, TeamInfo};

/// Score cut-offs for the two clubs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClubThresholds {
    /// Scores at or above this join the high club.
    pub high: f64,
    /// Scores strictly below this join the low club.
    pub low: f64,
}

impl Default for ClubThresholds {
    fn default() -> Self {
        Self {
            high: 200.0,
            low: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClubPerformance {
    pub team: TeamInfo,
    pub score: f64,
    pub week: u32,
    pub opponent: TeamInfo,
    pub opponent_score: f64,
    pub won: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Clubs {
    /// Highest score first.
    pub high: Vec<ClubPerformance>,
    /// Lowest score first.
    pub low: Vec<ClubPerformance>,
}

/// Collect every weekly score that crossed either threshold.
///
/// `teams` resolves team ids to names; unknown ids get an "Unknown" label.
pub fn find_club_performances<'a>(
    weeks: impl IntoIterator<Item = &'a WeekBoxScores>,
    teams: &[TeamInfo],
    thresholds: ClubThresholds,
) -> Clubs {
    let lookup: BTreeMap<TeamId, &TeamInfo> = teams.iter().map(|t| (t.team_id, t)).collect();
    let info = |id: TeamId| {
        lookup
            .get(&id)
            .map(|t| (*t).clone())
            .unwrap_or_else(|| TeamInfo::unknown(id))
    };

    let mut clubs = Clubs::default();

    for week in weeks {
        for matchup in &week.matchups {
            for (side, opponent) in matchup.sides() {
                let club = if side.score >= thresholds.high {
                    &mut clubs.high
                } else if side.score < thresholds.low {
                    &mut clubs.low
                } else {
                    continue;
                };
                club.push(ClubPerformance {
                    team: info(side.team_id),
                    score: side.score,
                    week: week.week,
                    opponent: info(opponent.team_id),
                    opponent_score: opponent.score,
                    won: side.score > opponent.score,
                });
            }
        }
    }

    clubs.high.sort_by(|a, b| b.score.total_cmp(&a.score));
    clubs.low.sort_by(|a, b| a.score.total_cmp(&b.score));
    clubs
}
