// League snapshot handed over by a data source.

use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::roster::{TeamId, TeamInfo};

/// Season record and placement for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    #[serde(flatten)]
    pub info: TeamInfo,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
    /// Seed going into the playoffs, once the league has assigned one.
    #[serde(default)]
    pub playoff_seed: Option<u32>,
    /// Final finishing position, once the season is complete.
    #[serde(default)]
    pub final_rank: Option<u32>,
    /// Current position in the regular-season standings.
    #[serde(default)]
    pub current_rank: Option<u32>,
}

impl TeamStanding {
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// "W-L", or "W-L-T" when the team has ties.
    pub fn record(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}

/// Season totals for one player, rostered or free agent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerSeasonLine {
    pub name: String,
    pub position: Option<Position>,
    pub pro_team: String,
    /// Fantasy team holding the player, if any.
    pub fantasy_team_id: Option<TeamId>,
    pub total_points: f64,
    pub avg_points: f64,
    pub games_played: u32,
    pub rushing_attempts: f64,
    pub rushing_yards: f64,
    pub rushing_tds: f64,
    pub receptions: f64,
    pub targets: f64,
    pub receiving_yards: f64,
    pub receiving_tds: f64,
    pub fumbles_lost: f64,
    #[serde(default)]
    pub injury_status: Option<String>,
}

/// Everything known about a league for one season, minus the weekly box scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub season: u16,
    pub name: String,
    pub current_week: u32,
    pub playoff_teams: u32,
    pub teams: Vec<TeamStanding>,
    pub players: Vec<PlayerSeasonLine>,
}

impl League {
    pub fn team_infos(&self) -> Vec<TeamInfo> {
        self.teams.iter().map(|t| t.info.clone()).collect()
    }

    pub fn team_info(&self, team_id: TeamId) -> Option<&TeamInfo> {
        self.teams
            .iter()
            .map(|t| &t.info)
            .find(|info| info.team_id == team_id)
    }

    /// Add unrostered players to `players`, marking them as free agents.
    /// A player whose name is already listed is skipped. Returns how many
    /// were added.
    pub fn merge_free_agents(&mut self, free_agents: Vec<PlayerSeasonLine>) -> usize {
        let mut added = 0;
        for mut player in free_agents {
            if self.players.iter().any(|p| p.name == player.name) {
                continue;
            }
            player.fantasy_team_id = None;
            self.players.push(player);
            added += 1;
        }
        added
    }

    /// Name of the fantasy team that owns a player, "Free Agent" if nobody does.
    pub fn owning_team_name(&self, player: &PlayerSeasonLine) -> String {
        match player.fantasy_team_id {
            None | Some(0) => "Free Agent".to_string(),
            Some(id) => self
                .team_info(id)
                .map(|t| t.team_name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(id: TeamId, wins: u32, losses: u32, ties: u32) -> TeamStanding {
        TeamStanding {
            info: TeamInfo {
                team_id: id,
                team_name: format!("Team {id}"),
                owner: "Owner".into(),
            },
            wins,
            losses,
            ties,
            points_for: 0.0,
            points_against: 0.0,
            playoff_seed: None,
            final_rank: None,
            current_rank: None,
        }
    }

    #[test]
    fn record_string_omits_zero_ties() {
        assert_eq!(standing(1, 9, 5, 0).record(), "9-5");
        assert_eq!(standing(1, 8, 5, 1).record(), "8-5-1");
        assert_eq!(standing(1, 8, 5, 1).games_played(), 14);
    }

    #[test]
    fn owning_team_name_lookup() {
        let league = League {
            season: 2025,
            name: "Test".into(),
            current_week: 1,
            playoff_teams: 4,
            teams: vec![standing(3, 0, 0, 0)],
            players: vec![],
        };
        let mut player = PlayerSeasonLine::default();
        assert_eq!(league.owning_team_name(&player), "Free Agent");
        player.fantasy_team_id = Some(0);
        assert_eq!(league.owning_team_name(&player), "Free Agent");
        player.fantasy_team_id = Some(3);
        assert_eq!(league.owning_team_name(&player), "Team 3");
        player.fantasy_team_id = Some(11);
        assert_eq!(league.owning_team_name(&player), "Unknown");
    }

    #[test]
    fn free_agents_merge_without_duplicates() {
        let rostered = PlayerSeasonLine {
            name: "Rostered Back".into(),
            fantasy_team_id: Some(3),
            total_points: 90.0,
            ..Default::default()
        };
        let mut league = League {
            season: 2025,
            name: "Test".into(),
            current_week: 1,
            playoff_teams: 4,
            teams: vec![standing(3, 0, 0, 0)],
            players: vec![rostered],
        };

        let waiver_dup = PlayerSeasonLine {
            name: "Rostered Back".into(),
            total_points: 1.0,
            ..Default::default()
        };
        let street = PlayerSeasonLine {
            name: "Street Free Agent".into(),
            fantasy_team_id: Some(0),
            total_points: 12.0,
            ..Default::default()
        };
        let added = league.merge_free_agents(vec![waiver_dup, street.clone(), street]);

        assert_eq!(added, 1);
        assert_eq!(league.players.len(), 2);
        assert_eq!(league.players[0].total_points, 90.0);
        assert_eq!(league.players[1].fantasy_team_id, None);
        assert_eq!(league.owning_team_name(&league.players[1]), "Free Agent");
    }
}
