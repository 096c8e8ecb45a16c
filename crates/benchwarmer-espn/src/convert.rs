// Raw ESPN payloads -> domain types.

use std::collections::HashMap;

use tracing::{debug, warn};

use benchwarmer_football::league::{League, PlayerSeasonLine, TeamStanding};
use benchwarmer_football::matchup::{Matchup, MatchupSide, WeekBoxScores};
use benchwarmer_football::position::{Position, Slot};
use benchwarmer_football::roster::{RosterEntry, TeamId, TeamInfo};

use crate::mapping::{self, position_from_id, pro_team_abbrev, slot_from_id};
use crate::types::{
    RawLeague, RawMatchupTeam, RawMember, RawPlayer, RawPlayerPool, RawProSchedule,
    RawRosterEntry, RawStatLine, RawTeam,
};

const SOURCE_ACTUAL: u8 = 0;
const SOURCE_PROJECTED: u8 = 1;
const SPLIT_SEASON: u8 = 0;
const SPLIT_PERIOD: u8 = 1;

/// ESPN occasionally serves NaN/inf in stat totals; those count as zero.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// League metadata
// ---------------------------------------------------------------------------

/// The league's current week: ESPN's scoring period, capped at the final
/// scoring period once the season is over.
pub fn current_week(raw: &RawLeague) -> u32 {
    let week = raw.scoring_period_id;
    match raw.status.final_scoring_period {
        0 => week,
        last => week.min(last),
    }
}

/// Display name of a team's first listed owner.
pub fn owner_name(team: &RawTeam, members: &[RawMember]) -> String {
    let owner_id = team.owners.first().or(team.primary_owner.as_ref());
    owner_id
        .and_then(|id| members.iter().find(|m| &m.id == id))
        .and_then(|m| {
            non_empty(m.display_name.as_deref()).or_else(|| non_empty(m.first_name.as_deref()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Team name, or "location nickname" for older seasons that lack `name`.
pub fn team_name(team: &RawTeam) -> String {
    if let Some(name) = non_empty(team.name.as_deref()) {
        return name.to_string();
    }
    let joined = [team.location.as_deref(), team.nickname.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        format!("Team {}", team.id)
    } else {
        joined
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

pub fn team_info(team: &RawTeam, members: &[RawMember]) -> TeamInfo {
    TeamInfo {
        team_id: team.id,
        team_name: team_name(team),
        owner: owner_name(team, members),
    }
}

fn standing(team: &RawTeam, members: &[RawMember]) -> TeamStanding {
    let overall = &team.record.overall;
    TeamStanding {
        info: team_info(team, members),
        wins: overall.wins,
        losses: overall.losses,
        ties: overall.ties,
        points_for: finite_or_zero(overall.points_for),
        points_against: finite_or_zero(overall.points_against),
        playoff_seed: team.playoff_seed.filter(|&s| s > 0),
        final_rank: team.rank_calculated_final.filter(|&r| r > 0),
        current_rank: team.current_projected_rank.filter(|&r| r > 0),
    }
}

/// Convert a league payload (mTeam, mRoster, mSettings, mStatus) into a
/// `League`. Players are every rostered player across all teams.
pub fn league_from_raw(season: u16, raw: &RawLeague) -> League {
    let week = current_week(raw);
    let teams: Vec<TeamStanding> = raw.teams.iter().map(|t| standing(t, &raw.members)).collect();

    let players: Vec<PlayerSeasonLine> = raw
        .teams
        .iter()
        .flat_map(|team| {
            team.roster
                .iter()
                .flat_map(|r| r.entries.iter())
                .map(move |entry| season_line(entry, team.id, week))
        })
        .collect();

    debug!(
        season,
        teams = teams.len(),
        players = players.len(),
        current_week = week,
        "converted league payload"
    );

    League {
        season,
        name: raw.settings.name.clone(),
        current_week: week,
        playoff_teams: raw.settings.schedule_settings.playoff_team_count,
        teams,
        players,
    }
}

// ---------------------------------------------------------------------------
// Player stat rows
// ---------------------------------------------------------------------------

fn stat_row(player: &RawPlayer, period: u32, source: u8) -> Option<&RawStatLine> {
    player
        .stats
        .iter()
        .find(|s| s.scoring_period_id == period && s.stat_source_id == source)
}

fn stat(stats: &HashMap<&str, f64>, id: &str) -> f64 {
    stats.get(id).copied().map(finite_or_zero).unwrap_or(0.0)
}

/// Season line for a rostered player.
pub fn season_line(entry: &RawRosterEntry, team_id: TeamId, current_week: u32) -> PlayerSeasonLine {
    player_season_line(
        &entry.player_pool_entry.player,
        entry.player_pool_entry.applied_stat_total,
        Some(team_id),
        current_week,
    )
}

/// Season lines for the unrostered players in a player-pool payload,
/// restricted to `position`.
pub fn free_agent_lines(
    pool: &RawPlayerPool,
    position: Position,
    current_week: u32,
) -> Vec<PlayerSeasonLine> {
    pool.players
        .iter()
        .filter(|p| p.on_team_id == 0)
        .filter(|p| position_from_id(p.player.default_position_id) == Some(position))
        .map(|p| player_season_line(&p.player, None, None, current_week))
        .collect()
}

/// Uses the season-total row when ESPN sends one; otherwise sums the weekly
/// rows for weeks 1..=`current_week`. Games played counts weekly rows with a
/// non-empty stat breakdown.
fn player_season_line(
    player: &RawPlayer,
    applied_stat_total: Option<f64>,
    fantasy_team_id: Option<TeamId>,
    current_week: u32,
) -> PlayerSeasonLine {

    let season_row = player.stats.iter().find(|s| {
        s.scoring_period_id == 0
            && s.stat_source_id == SOURCE_ACTUAL
            && s.stat_split_type_id == SPLIT_SEASON
    });
    let weekly: Vec<&RawStatLine> = player
        .stats
        .iter()
        .filter(|s| {
            s.stat_source_id == SOURCE_ACTUAL
                && s.stat_split_type_id == SPLIT_PERIOD
                && (1..=current_week).contains(&s.scoring_period_id)
                && !s.stats.is_empty()
        })
        .collect();
    let games_played = weekly.len() as u32;

    let mut breakdown: HashMap<&str, f64> = HashMap::new();
    match season_row.filter(|r| !r.stats.is_empty()) {
        Some(row) => {
            for (id, value) in &row.stats {
                breakdown.insert(id.as_str(), *value);
            }
        }
        None => {
            for row in &weekly {
                for (id, value) in &row.stats {
                    *breakdown.entry(id.as_str()).or_insert(0.0) += finite_or_zero(*value);
                }
            }
        }
    }

    let weekly_total: Option<f64> = if weekly.is_empty() {
        None
    } else {
        Some(weekly.iter().filter_map(|r| r.applied_total).map(finite_or_zero).sum())
    };
    let total_points = finite_or_zero(
        season_row
            .and_then(|r| r.applied_total)
            .or(weekly_total)
            .or(applied_stat_total)
            .unwrap_or(0.0),
    );
    let avg_points = match season_row.and_then(|r| r.applied_average) {
        Some(avg) => finite_or_zero(avg),
        None if games_played > 0 => total_points / f64::from(games_played),
        None => 0.0,
    };

    PlayerSeasonLine {
        name: player.full_name.clone(),
        position: position_from_id(player.default_position_id),
        pro_team: pro_team_abbrev(player.pro_team_id)
            .unwrap_or("FA")
            .to_string(),
        fantasy_team_id,
        total_points,
        avg_points,
        games_played,
        rushing_attempts: stat(&breakdown, mapping::STAT_RUSHING_ATTEMPTS),
        rushing_yards: stat(&breakdown, mapping::STAT_RUSHING_YARDS),
        rushing_tds: stat(&breakdown, mapping::STAT_RUSHING_TDS),
        receptions: stat(&breakdown, mapping::STAT_RECEPTIONS),
        targets: stat(&breakdown, mapping::STAT_TARGETS),
        receiving_yards: stat(&breakdown, mapping::STAT_RECEIVING_YARDS),
        receiving_tds: stat(&breakdown, mapping::STAT_RECEIVING_TDS),
        fumbles_lost: stat(&breakdown, mapping::STAT_FUMBLES_LOST),
        injury_status: player
            .injury_status
            .clone()
            .filter(|s| !s.is_empty() && s != "ACTIVE"),
    }
}

/// One week's roster entry with realized and projected points.
pub fn roster_entry(entry: &RawRosterEntry, week: u32) -> RosterEntry {
    let player = &entry.player_pool_entry.player;
    let actual = stat_row(player, week, SOURCE_ACTUAL);
    let projected = stat_row(player, week, SOURCE_PROJECTED);

    let points = actual
        .and_then(|r| r.applied_total)
        .or(entry.player_pool_entry.applied_stat_total)
        .unwrap_or(0.0);

    let slot = slot_from_id(entry.lineup_slot_id);
    if slot == Slot::Other {
        warn!(
            slot_id = entry.lineup_slot_id,
            player = %player.full_name,
            "unmapped lineup slot, counting as a starter"
        );
    }

    RosterEntry {
        name: player.full_name.clone(),
        position: position_from_id(player.default_position_id),
        slot,
        points: finite_or_zero(points),
        projected_points: finite_or_zero(projected.and_then(|r| r.applied_total).unwrap_or(0.0)),
        pro_team: pro_team_abbrev(player.pro_team_id).map(str::to_string),
        pro_opponent: None,
        game_played: actual.is_some_and(|r| !r.stats.is_empty()),
        injury_status: player
            .injury_status
            .clone()
            .filter(|s| !s.is_empty() && s != "ACTIVE"),
        // ESPN sends neither an actual nor a projected row for bye weeks.
        on_bye: actual.is_none() && projected.is_none(),
    }
}

// ---------------------------------------------------------------------------
// Box scores
// ---------------------------------------------------------------------------

fn matchup_side(team: &RawMatchupTeam, week: u32) -> MatchupSide {
    let lineup: Vec<RosterEntry> = team
        .roster_for_current_scoring_period
        .iter()
        .flat_map(|r| r.entries.iter())
        .map(|e| roster_entry(e, week))
        .collect();

    let score = team
        .points_by_scoring_period
        .get(&week.to_string())
        .copied()
        .or(team.total_points_live)
        .unwrap_or(team.total_points);

    let projected = team.total_projected_points_live.unwrap_or_else(|| {
        lineup
            .iter()
            .filter(|e| e.is_starter())
            .map(|e| e.projected_points)
            .sum()
    });

    MatchupSide::new(
        team.team_id,
        finite_or_zero(score),
        finite_or_zero(projected),
        lineup,
    )
}

/// Convert a scoreboard payload into one week of box scores.
///
/// When `matchup_period` is given, schedule items from other periods are
/// ignored. Bye entries (missing home or away) are dropped.
pub fn week_from_raw(week: u32, matchup_period: Option<u32>, raw: &RawLeague) -> WeekBoxScores {
    let matchups: Vec<Matchup> = raw
        .schedule
        .iter()
        .filter(|item| matchup_period.map_or(true, |mp| item.matchup_period_id == mp))
        .filter_map(|item| match (&item.home, &item.away) {
            (Some(home), Some(away)) => Some(Matchup {
                home: matchup_side(home, week),
                away: matchup_side(away, week),
            }),
            _ => {
                debug!(week, schedule_id = item.id, "skipping bye entry");
                None
            }
        })
        .collect();

    WeekBoxScores { week, matchups }
}

// ---------------------------------------------------------------------------
// Pro schedule
// ---------------------------------------------------------------------------

/// Pro team abbreviation -> opponent abbreviation for one scoring period.
/// Teams on bye are absent.
pub fn pro_opponents(schedule: &RawProSchedule, week: u32) -> HashMap<String, String> {
    let key = week.to_string();
    let mut opponents = HashMap::new();
    for team in &schedule.settings.pro_teams {
        let Some(game) = team
            .pro_games_by_scoring_period
            .get(&key)
            .and_then(|games| games.first())
        else {
            continue;
        };
        let opponent_id = if game.home_pro_team_id == team.id {
            game.away_pro_team_id
        } else {
            game.home_pro_team_id
        };
        if let (Some(own), Some(opp)) = (pro_team_abbrev(team.id), pro_team_abbrev(opponent_id)) {
            opponents.insert(own.to_string(), opp.to_string());
        }
    }
    opponents
}

/// Fill `pro_opponent` on every lineup entry whose pro team played.
pub fn apply_pro_opponents(scores: &mut WeekBoxScores, opponents: &HashMap<String, String>) {
    for matchup in &mut scores.matchups {
        for side in [&mut matchup.home, &mut matchup.away] {
            for entry in &mut side.lineup {
                entry.pro_opponent = entry
                    .pro_team
                    .as_ref()
                    .and_then(|team| opponents.get(team))
                    .cloned();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        RawPlayerPoolEntry, RawPoolPlayer, RawProGame, RawProSettings, RawProTeam, RawStatus,
    };
    use std::collections::BTreeMap;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn row(period: u32, source: u8, split: u8, total: Option<f64>) -> RawStatLine {
        RawStatLine {
            season_id: 2025,
            scoring_period_id: period,
            stat_source_id: source,
            stat_split_type_id: split,
            applied_total: total,
            applied_average: None,
            stats: BTreeMap::new(),
        }
    }

    fn roster(slot: i32, position: i32, stats: Vec<RawStatLine>) -> RawRosterEntry {
        RawRosterEntry {
            player_id: 1,
            lineup_slot_id: slot,
            player_pool_entry: RawPlayerPoolEntry {
                applied_stat_total: None,
                player: RawPlayer {
                    id: 1,
                    full_name: "Test Player".into(),
                    default_position_id: position,
                    pro_team_id: 8,
                    injury_status: Some("ACTIVE".into()),
                    stats,
                },
            },
        }
    }

    #[test]
    fn current_week_clamped_to_final_period() {
        let mut raw = RawLeague {
            scoring_period_id: 19,
            status: RawStatus {
                final_scoring_period: 17,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(current_week(&raw), 17);
        raw.scoring_period_id = 8;
        assert_eq!(current_week(&raw), 8);
        raw.status.final_scoring_period = 0;
        raw.scoring_period_id = 3;
        assert_eq!(current_week(&raw), 3);
    }

    #[test]
    fn owner_falls_back_to_first_name_then_unknown() {
        let members = vec![
            RawMember {
                id: "{A}".into(),
                display_name: Some("  ".into()),
                first_name: Some("Pat".into()),
                last_name: None,
            },
            RawMember {
                id: "{B}".into(),
                display_name: Some("gridiron_guru".into()),
                first_name: Some("Sam".into()),
                last_name: None,
            },
        ];
        let mut team = RawTeam {
            id: 1,
            owners: vec!["{A}".into()],
            ..Default::default()
        };
        assert_eq!(owner_name(&team, &members), "Pat");
        team.owners = vec!["{B}".into()];
        assert_eq!(owner_name(&team, &members), "gridiron_guru");
        team.owners = vec!["{Z}".into()];
        assert_eq!(owner_name(&team, &members), "Unknown");
        team.owners.clear();
        assert_eq!(owner_name(&team, &members), "Unknown");
    }

    #[test]
    fn team_name_falls_back_to_location_nickname() {
        let mut team = RawTeam {
            id: 4,
            name: None,
            location: Some("Motor City".into()),
            nickname: Some("Maulers".into()),
            ..Default::default()
        };
        assert_eq!(team_name(&team), "Motor City Maulers");
        team.name = Some("Bench Mob".into());
        assert_eq!(team_name(&team), "Bench Mob");
        team.name = None;
        team.location = None;
        team.nickname = None;
        assert_eq!(team_name(&team), "Team 4");
    }

    #[test]
    fn roster_entry_reads_week_rows() {
        let mut actual = row(8, SOURCE_ACTUAL, SPLIT_PERIOD, Some(21.4));
        actual.stats.insert("23".into(), 17.0);
        let entry = roster(
            2,
            2,
            vec![
                row(7, SOURCE_ACTUAL, SPLIT_PERIOD, Some(3.0)),
                actual,
                row(8, SOURCE_PROJECTED, SPLIT_PERIOD, Some(14.2)),
            ],
        );
        let e = roster_entry(&entry, 8);
        assert!(e.game_played);
        assert!(!roster_entry(&entry, 9).game_played);
        assert_eq!(e.slot, Slot::RunningBack);
        assert_eq!(e.position, Some(Position::RunningBack));
        assert!(approx_eq(e.points, 21.4, 1e-9));
        assert!(approx_eq(e.projected_points, 14.2, 1e-9));
        assert_eq!(e.pro_team.as_deref(), Some("DET"));
        assert!(e.injury_status.is_none());
        assert!(!e.on_bye);
    }

    #[test]
    fn roster_entry_non_finite_points_become_zero() {
        let entry = roster(20, 3, vec![row(8, SOURCE_ACTUAL, SPLIT_PERIOD, Some(f64::NAN))]);
        let e = roster_entry(&entry, 8);
        assert_eq!(e.points, 0.0);
        assert_eq!(e.slot, Slot::Bench);
    }

    #[test]
    fn roster_entry_falls_back_to_applied_stat_total() {
        let mut entry = roster(0, 1, vec![]);
        entry.player_pool_entry.applied_stat_total = Some(17.5);
        let e = roster_entry(&entry, 8);
        assert!(approx_eq(e.points, 17.5, 1e-9));
        assert!(e.on_bye);
    }

    #[test]
    fn season_line_sums_weekly_rows_without_season_total() {
        let mut w1 = row(1, SOURCE_ACTUAL, SPLIT_PERIOD, Some(10.0));
        w1.stats.insert("23".into(), 12.0);
        w1.stats.insert("53".into(), 3.0);
        let mut w2 = row(2, SOURCE_ACTUAL, SPLIT_PERIOD, Some(6.5));
        w2.stats.insert("23".into(), 8.0);
        w2.stats.insert("58".into(), 4.0);
        // Outside 1..=current_week.
        let mut w9 = row(9, SOURCE_ACTUAL, SPLIT_PERIOD, Some(40.0));
        w9.stats.insert("23".into(), 30.0);

        let line = season_line(&roster(2, 2, vec![w1, w2, w9]), 3, 2);
        assert_eq!(line.games_played, 2);
        assert!(approx_eq(line.total_points, 16.5, 1e-9));
        assert!(approx_eq(line.avg_points, 8.25, 1e-9));
        assert!(approx_eq(line.rushing_attempts, 20.0, 1e-9));
        assert!(approx_eq(line.receptions, 3.0, 1e-9));
        assert!(approx_eq(line.targets, 4.0, 1e-9));
        assert_eq!(line.fantasy_team_id, Some(3));
        assert_eq!(line.pro_team, "DET");
    }

    #[test]
    fn season_line_prefers_season_total_row() {
        let mut season = row(0, SOURCE_ACTUAL, SPLIT_SEASON, Some(120.0));
        season.applied_average = Some(15.0);
        season.stats.insert("23".into(), 100.0);
        let mut w1 = row(1, SOURCE_ACTUAL, SPLIT_PERIOD, Some(10.0));
        w1.stats.insert("23".into(), 12.0);

        let line = season_line(&roster(2, 2, vec![season, w1]), 1, 8);
        assert!(approx_eq(line.total_points, 120.0, 1e-9));
        assert!(approx_eq(line.avg_points, 15.0, 1e-9));
        assert!(approx_eq(line.rushing_attempts, 100.0, 1e-9));
        assert_eq!(line.games_played, 1);
    }

    #[test]
    fn free_agent_lines_keep_unrostered_players_at_position() {
        let player = |id: i64, name: &str, position: i32, on_team_id: u32| {
            let mut season = row(0, SOURCE_ACTUAL, SPLIT_SEASON, Some(40.0));
            season.stats.insert("23".into(), 50.0);
            RawPoolPlayer {
                id,
                on_team_id,
                status: Some("FREEAGENT".into()),
                player: RawPlayer {
                    id,
                    full_name: name.into(),
                    default_position_id: position,
                    pro_team_id: 8,
                    injury_status: None,
                    stats: vec![season],
                },
            }
        };
        let pool = RawPlayerPool {
            players: vec![
                player(1, "Waiver Back", 2, 0),
                player(2, "Waiver Receiver", 3, 0),
                player(3, "Rostered Back", 2, 4),
            ],
        };

        let lines = free_agent_lines(&pool, Position::RunningBack, 8);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name, "Waiver Back");
        assert_eq!(lines[0].fantasy_team_id, None);
        assert_eq!(lines[0].pro_team, "DET");
        assert!(approx_eq(lines[0].total_points, 40.0, 1e-9));
        assert!(approx_eq(lines[0].rushing_attempts, 50.0, 1e-9));
    }

    #[test]
    fn pro_opponents_pair_both_teams_and_skip_byes() {
        let game = RawProGame {
            home_pro_team_id: 8,
            away_pro_team_id: 9,
            date: 1_761_501_600_000,
        };
        let team = |id: i32, abbrev: &str, games: Vec<RawProGame>| RawProTeam {
            id,
            abbrev: abbrev.into(),
            pro_games_by_scoring_period: HashMap::from([("8".to_string(), games)]),
        };
        let schedule = RawProSchedule {
            settings: RawProSettings {
                pro_teams: vec![
                    team(8, "Det", vec![game.clone()]),
                    team(9, "GB", vec![game]),
                    team(12, "KC", vec![]),
                ],
            },
        };

        let opponents = pro_opponents(&schedule, 8);
        assert_eq!(opponents.get("DET").map(String::as_str), Some("GB"));
        assert_eq!(opponents.get("GB").map(String::as_str), Some("DET"));
        assert!(!opponents.contains_key("KC"));
        assert!(pro_opponents(&schedule, 9).is_empty());

        let mut entry = roster(2, 2, vec![row(8, SOURCE_ACTUAL, SPLIT_PERIOD, Some(12.0))]);
        entry.player_pool_entry.player.pro_team_id = 8;
        let mut scores = WeekBoxScores {
            week: 8,
            matchups: vec![Matchup {
                home: MatchupSide::new(1, 12.0, 0.0, vec![roster_entry(&entry, 8)]),
                away: MatchupSide::new(2, 0.0, 0.0, vec![]),
            }],
        };
        apply_pro_opponents(&mut scores, &opponents);
        let lineup = &scores.matchups[0].home.lineup;
        assert_eq!(lineup[0].pro_opponent.as_deref(), Some("GB"));
    }
}
