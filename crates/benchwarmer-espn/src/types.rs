// Raw ESPN fantasy API v3 payloads.
//
// Only the fields the converters read are declared; everything else in the
// response is ignored. Almost every field is optional or defaulted because
// ESPN omits keys freely depending on the requested views and season state.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

// ---------------------------------------------------------------------------
// League (mTeam, mRoster, mSettings, mStatus)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLeague {
    pub id: u64,
    pub season_id: u16,
    pub scoring_period_id: u32,
    pub status: RawStatus,
    pub settings: RawSettings,
    pub members: Vec<RawMember>,
    pub teams: Vec<RawTeam>,
    pub schedule: Vec<RawScheduleItem>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStatus {
    pub current_matchup_period: u32,
    pub final_scoring_period: u32,
    pub latest_scoring_period: u32,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSettings {
    pub name: String,
    pub schedule_settings: RawScheduleSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawScheduleSettings {
    pub playoff_team_count: u32,
    /// Matchup period id (as a string key) -> scoring period ids it spans.
    pub matchup_periods: HashMap<String, Vec<u32>>,
}

impl RawScheduleSettings {
    /// Matchup period containing `scoring_period`, if the league lists one.
    pub fn matchup_period_for(&self, scoring_period: u32) -> Option<u32> {
        self.matchup_periods
            .iter()
            .filter(|(_, weeks)| weeks.contains(&scoring_period))
            .filter_map(|(id, _)| id.parse().ok())
            .min()
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMember {
    pub id: String,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTeam {
    pub id: u32,
    pub name: Option<String>,
    pub location: Option<String>,
    pub nickname: Option<String>,
    pub owners: Vec<String>,
    pub primary_owner: Option<String>,
    pub record: RawRecord,
    pub playoff_seed: Option<u32>,
    pub rank_calculated_final: Option<u32>,
    pub current_projected_rank: Option<u32>,
    pub roster: Option<RawRoster>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRecord {
    pub overall: RawRecordLine,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRecordLine {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
}

// ---------------------------------------------------------------------------
// Rosters and players
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRoster {
    pub entries: Vec<RawRosterEntry>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRosterEntry {
    pub player_id: i64,
    pub lineup_slot_id: i32,
    pub player_pool_entry: RawPlayerPoolEntry,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPlayerPoolEntry {
    pub applied_stat_total: Option<f64>,
    pub player: RawPlayer,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPlayer {
    pub id: i64,
    pub full_name: String,
    pub default_position_id: i32,
    pub pro_team_id: i32,
    pub injury_status: Option<String>,
    pub stats: Vec<RawStatLine>,
}

/// One stat row. `stat_source_id` 0 = actual, 1 = projected;
/// `stat_split_type_id` 0 = season total, 1 = single scoring period.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStatLine {
    pub season_id: u16,
    pub scoring_period_id: u32,
    pub stat_source_id: u8,
    pub stat_split_type_id: u8,
    pub applied_total: Option<f64>,
    pub applied_average: Option<f64>,
    /// Stat id (string key) -> raw value.
    pub stats: BTreeMap<String, f64>,
}

// ---------------------------------------------------------------------------
// Player pool (kona_player_info)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPlayerPool {
    pub players: Vec<RawPoolPlayer>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPoolPlayer {
    pub id: i64,
    /// 0 when the player is unrostered.
    pub on_team_id: u32,
    /// "FREEAGENT", "WAIVERS" or "ONTEAM".
    pub status: Option<String>,
    pub player: RawPlayer,
}

// ---------------------------------------------------------------------------
// Pro schedule (season endpoint, proTeamSchedules_wl)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawProSchedule {
    pub settings: RawProSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProSettings {
    pub pro_teams: Vec<RawProTeam>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProTeam {
    pub id: i32,
    pub abbrev: String,
    /// Scoring period id (string key) -> games that week. Empty on a bye.
    pub pro_games_by_scoring_period: HashMap<String, Vec<RawProGame>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProGame {
    pub home_pro_team_id: i32,
    pub away_pro_team_id: i32,
    /// Kickoff, epoch milliseconds.
    pub date: i64,
}

// ---------------------------------------------------------------------------
// Schedule / box scores (mMatchupScore, mScoreboard)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawScheduleItem {
    pub id: u64,
    pub matchup_period_id: u32,
    pub home: Option<RawMatchupTeam>,
    pub away: Option<RawMatchupTeam>,
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMatchupTeam {
    pub team_id: u32,
    pub total_points: f64,
    pub total_points_live: Option<f64>,
    pub total_projected_points_live: Option<f64>,
    /// Scoring period id (string key) -> points in that period.
    pub points_by_scoring_period: HashMap<String, f64>,
    pub roster_for_current_scoring_period: Option<RawRoster>,
}
