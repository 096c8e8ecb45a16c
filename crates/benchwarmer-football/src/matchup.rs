// Weekly head-to-head matchups.

use serde::{Deserialize, Serialize};

use crate::roster::{RosterEntry, TeamId, TeamInfo};

/// One team's half of a matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupSide {
    pub team_id: TeamId,
    /// Filled in from league metadata by `WeekBoxScores::label_teams`.
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub owner: String,
    pub score: f64,
    pub projected: f64,
    /// Starters and bench together.
    pub lineup: Vec<RosterEntry>,
}

impl MatchupSide {
    /// A side with no display name yet.
    pub fn new(team_id: TeamId, score: f64, projected: f64, lineup: Vec<RosterEntry>) -> Self {
        Self {
            team_id,
            team_name: String::new(),
            owner: String::new(),
            score,
            projected,
            lineup,
        }
    }

    fn label(&mut self, teams: &[TeamInfo]) {
        let info = teams
            .iter()
            .find(|t| t.team_id == self.team_id)
            .cloned()
            .unwrap_or_else(|| TeamInfo::unknown(self.team_id));
        self.team_name = info.team_name;
        self.owner = info.owner;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Away,
    Tie,
}

/// A head-to-head pairing. Bye weeks never produce a `Matchup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub home: MatchupSide,
    pub away: MatchupSide,
}

impl Matchup {
    pub fn winner(&self) -> Outcome {
        if self.home.score > self.away.score {
            Outcome::Home
        } else if self.away.score > self.home.score {
            Outcome::Away
        } else {
            Outcome::Tie
        }
    }

    /// Both sides, each paired with its opponent.
    pub fn sides(&self) -> [(&MatchupSide, &MatchupSide); 2] {
        [(&self.home, &self.away), (&self.away, &self.home)]
    }
}

/// All matchups for one scoring week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekBoxScores {
    pub week: u32,
    pub matchups: Vec<Matchup>,
}

impl WeekBoxScores {
    /// Every team's side for the week, in matchup order (home first).
    pub fn sides(&self) -> impl Iterator<Item = &MatchupSide> {
        self.matchups.iter().flat_map(|m| [&m.home, &m.away])
    }

    /// Copy team names and owners onto every side. Ids missing from `teams`
    /// get the "Unknown" identity.
    pub fn label_teams(&mut self, teams: &[TeamInfo]) {
        for matchup in &mut self.matchups {
            matchup.home.label(teams);
            matchup.away.label(teams);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(team_id: TeamId, score: f64) -> MatchupSide {
        MatchupSide::new(team_id, score, 0.0, vec![])
    }

    fn matchup(home: MatchupSide, away: MatchupSide) -> Matchup {
        Matchup { home, away }
    }

    #[test]
    fn winner_by_score() {
        assert_eq!(matchup(side(1, 110.0), side(2, 95.5)).winner(), Outcome::Home);
        assert_eq!(matchup(side(1, 80.0), side(2, 95.5)).winner(), Outcome::Away);
        assert_eq!(matchup(side(1, 100.0), side(2, 100.0)).winner(), Outcome::Tie);
    }

    #[test]
    fn sides_pair_each_team_with_opponent() {
        let m = matchup(side(1, 110.0), side(2, 95.5));
        let [(a, a_opp), (b, b_opp)] = m.sides();
        assert_eq!((a.team_id, a_opp.team_id), (1, 2));
        assert_eq!((b.team_id, b_opp.team_id), (2, 1));
    }

    #[test]
    fn week_sides_flatten_in_order() {
        let week = WeekBoxScores {
            week: 3,
            matchups: vec![
                matchup(side(1, 1.0), side(2, 2.0)),
                matchup(side(3, 3.0), side(4, 4.0)),
            ],
        };
        let ids: Vec<TeamId> = week.sides().map(|s| s.team_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn label_teams_copies_names_and_owners() {
        let mut week = WeekBoxScores {
            week: 1,
            matchups: vec![matchup(side(1, 90.0), side(7, 80.0))],
        };
        let teams = vec![TeamInfo {
            team_id: 1,
            team_name: "Bench Mob".into(),
            owner: "Jordan".into(),
        }];

        week.label_teams(&teams);

        let home = &week.matchups[0].home;
        assert_eq!((home.team_name.as_str(), home.owner.as_str()), ("Bench Mob", "Jordan"));
        let away = &week.matchups[0].away;
        assert_eq!((away.team_name.as_str(), away.owner.as_str()), ("Unknown", "Unknown"));
    }
}
