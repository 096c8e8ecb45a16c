// Weekly roster snapshots and team identity.

use serde::{Deserialize, Serialize};

use crate::position::{Position, Slot};

/// League-assigned team identifier.
pub type TeamId = u32;

/// Identity of a fantasy team, as shown on reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub team_id: TeamId,
    pub team_name: String,
    pub owner: String,
}

impl TeamInfo {
    /// Placeholder identity for a team id the league metadata doesn't know.
    pub fn unknown(team_id: TeamId) -> Self {
        Self {
            team_id,
            team_name: "Unknown".to_string(),
            owner: "Unknown".to_string(),
        }
    }
}

/// One player on one team's roster for one week, with realized points.
///
/// `points` is final: nothing downstream rescores it, the lineup solver only
/// chooses which already-scored players would have started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    /// `None` for positions the solver doesn't fill (IDP, punters, ...).
    pub position: Option<Position>,
    /// Where the manager actually put this player.
    pub slot: Slot,
    pub points: f64,
    #[serde(default)]
    pub projected_points: f64,
    #[serde(default)]
    pub pro_team: Option<String>,
    /// Abbreviation of the pro team this player's team faced that week.
    #[serde(default)]
    pub pro_opponent: Option<String>,
    /// The player has a stat line for the week.
    #[serde(default)]
    pub game_played: bool,
    #[serde(default)]
    pub injury_status: Option<String>,
    #[serde(default)]
    pub on_bye: bool,
}

impl RosterEntry {
    /// Create an entry with the display-only fields at their defaults.
    pub fn new(name: &str, position: Option<Position>, slot: Slot, points: f64) -> Self {
        Self {
            name: name.to_string(),
            position,
            slot,
            points,
            projected_points: 0.0,
            pro_team: None,
            pro_opponent: None,
            game_played: false,
            injury_status: None,
            on_bye: false,
        }
    }

    /// Whether this entry was in a scoring slot.
    pub fn is_starter(&self) -> bool {
        self.slot.is_starting()
    }
}

/// Points the manager actually banked: the sum over entries in starting slots.
pub fn actual_score(entries: &[RosterEntry]) -> f64 {
    entries
        .iter()
        .filter(|e| e.is_starter())
        .map(|e| e.points)
        .sum()
}

/// Sort a lineup for display: QB, RB, WR, TE, FLEX, D/ST, K, bench, IR.
///
/// The sort is stable, so players sharing a slot keep their source order.
pub fn sort_lineup_for_display(entries: &mut [RosterEntry]) {
    entries.sort_by_key(|e| e.slot.sort_order());
}
