// Season pipeline: fetch a season week by week, then build every report
// from the fetched data.
//
// Fetching is strictly sequential. A week that fails to load is skipped and
// listed in the report; a season whose league metadata fails to load is
// skipped entirely.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use benchwarmer_core::config::{Config, ReportConfig};
use benchwarmer_football::clubs::{find_club_performances, ClubThresholds, Clubs};
use benchwarmer_football::league::League;
use benchwarmer_football::matchup::WeekBoxScores;
use benchwarmer_football::mismanagement::{
    build_season_summaries, rank_by_efficiency, LeagueSchedule, TeamSeasonSummary,
};
use benchwarmer_football::position::Position;
use benchwarmer_football::roster::sort_lineup_for_display;
use benchwarmer_football::standings::{
    fraud_watch, merge_team_histories, team_year_stats, FraudWatchEntry, FraudWeights,
    TeamYearStats,
};
use benchwarmer_football::usage::{
    target_shares, vulture_shares, ProTeamGroup, TargetShare, VultureShare,
};

use crate::report;
use crate::source::LeagueSource;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Report tuning knobs, lifted out of `ReportConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    pub clubs: ClubThresholds,
    pub fraud: FraudWeights,
    pub top_players: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            clubs: ClubThresholds::default(),
            fraud: FraudWeights::default(),
            top_players: 3,
        }
    }
}

impl From<&ReportConfig> for ReportOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            clubs: ClubThresholds {
                high: config.high_club_threshold,
                low: config.low_club_threshold,
            },
            fraud: FraudWeights {
                points_for: config.fraud_points_for_weight,
                points_against: config.fraud_points_against_weight,
            },
            top_players: config.top_players,
        }
    }
}

// ---------------------------------------------------------------------------
// Fetched data and built reports
// ---------------------------------------------------------------------------

/// Everything fetched for one season.
#[derive(Debug, Clone)]
pub struct SeasonData {
    pub league: League,
    /// Successfully fetched weeks, ascending.
    pub weeks: Vec<WeekBoxScores>,
    /// Weeks in `1..=current_week` that failed to load.
    pub skipped_weeks: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonReport {
    pub season: u16,
    pub league_name: String,
    pub current_week: u32,
    pub generated_at: DateTime<Utc>,
    pub weeks: Vec<WeekBoxScores>,
    pub skipped_weeks: Vec<u32>,
    /// Least efficient manager first.
    pub mismanagement: Vec<TeamSeasonSummary>,
    pub fraud_watch: Vec<FraudWatchEntry>,
    pub clubs: Clubs,
    pub teams: Vec<TeamYearStats>,
}

/// Backfield and receiving-corps usage for one season.
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub season: u16,
    pub generated_at: DateTime<Utc>,
    pub running_backs: Vec<ProTeamGroup<VultureShare>>,
    pub wide_receivers: Vec<ProTeamGroup<TargetShare>>,
}

/// Fetch league metadata, then every week up to the current one, one request
/// at a time.
pub async fn fetch_season(source: &dyn LeagueSource, season: u16) -> anyhow::Result<SeasonData> {
    let league = source
        .fetch_league(season)
        .await
        .with_context(|| format!("season {season}: league metadata unavailable"))?;
    info!(
        season,
        teams = league.teams.len(),
        current_week = league.current_week,
        "League loaded"
    );

    let teams = league.team_infos();
    let mut weeks = Vec::new();
    let mut skipped_weeks = Vec::new();

    for week in 1..=league.current_week {
        match source.fetch_week(season, week).await {
            Ok(mut scores) => {
                scores.label_teams(&teams);
                for matchup in &mut scores.matchups {
                    sort_lineup_for_display(&mut matchup.home.lineup);
                    sort_lineup_for_display(&mut matchup.away.lineup);
                }
                info!(season, week, matchups = scores.matchups.len(), "Week loaded");
                weeks.push(scores);
            }
            Err(e) => {
                warn!(season, week, "Skipping week: {e:#}");
                skipped_weeks.push(week);
            }
        }
    }

    Ok(SeasonData {
        league,
        weeks,
        skipped_weeks,
    })
}

/// Build every per-season report from fetched data.
///
/// `league_name` overrides ESPN's league name when set.
pub fn build_season_report(
    data: &SeasonData,
    options: &ReportOptions,
    league_name: Option<&str>,
) -> SeasonReport {
    let league = &data.league;
    let teams = league.team_infos();

    let schedule = LeagueSchedule::from_box_scores(teams.clone(), &data.weeks);
    let mismanagement = rank_by_efficiency(build_season_summaries(&schedule));

    SeasonReport {
        season: league.season,
        league_name: league_name
            .map(str::to_string)
            .unwrap_or_else(|| league.name.clone()),
        current_week: league.current_week,
        generated_at: Utc::now(),
        weeks: data.weeks.clone(),
        skipped_weeks: data.skipped_weeks.clone(),
        mismanagement,
        fraud_watch: fraud_watch(&league.teams, options.fraud),
        clubs: find_club_performances(&data.weeks, &teams, options.clubs),
        teams: team_year_stats(league, options.top_players),
    }
}

/// Positions whose free agents feed the usage report.
const USAGE_POSITIONS: [Position; 2] = [Position::RunningBack, Position::WideReceiver];

/// Merge unrostered backs and receivers into `league.players` so usage shares
/// cover whole pro-team backfields and receiving corps. A position whose
/// free agents fail to load is skipped. Returns how many players were added.
pub async fn add_free_agents(source: &dyn LeagueSource, league: &mut League) -> usize {
    let mut added = 0;
    for position in USAGE_POSITIONS {
        match source
            .fetch_free_agents(league.season, league.current_week, position)
            .await
        {
            Ok(players) => {
                let count = league.merge_free_agents(players);
                info!(season = league.season, %position, added = count, "Free agents merged");
                added += count;
            }
            Err(e) => warn!(season = league.season, %position, "Skipping free agents: {e:#}"),
        }
    }
    added
}

pub fn build_usage_report(league: &League) -> UsageReport {
    UsageReport {
        season: league.season,
        generated_at: Utc::now(),
        running_backs: vulture_shares(league),
        wide_receivers: target_shares(league),
    }
}

// ---------------------------------------------------------------------------
// Whole run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SeasonStatus {
    Written {
        teams: usize,
        weeks: usize,
        skipped_weeks: Vec<u32>,
        /// (team name, percentage scored) of the least efficient manager.
        worst_manager: Option<(String, f64)>,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonOutcome {
    pub season: u16,
    pub status: SeasonStatus,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub seasons: Vec<SeasonOutcome>,
    pub files: Vec<PathBuf>,
}

impl RunSummary {
    pub fn all_failed(&self) -> bool {
        self.seasons
            .iter()
            .all(|s| matches!(s.status, SeasonStatus::Failed { .. }))
    }
}

/// Fetch, build and write reports for every configured season in order.
///
/// Season failures are recorded in the summary rather than returned, so one
/// bad season never blocks the others.
pub async fn run(source: &dyn LeagueSource, config: &Config) -> RunSummary {
    let options = ReportOptions::from(&config.report);
    let output_dir = PathBuf::from(&config.report.output_dir);
    let default_season = config.league.default_season();

    let mut summary = RunSummary::default();
    let mut team_pages: Vec<Vec<TeamYearStats>> = Vec::new();

    for &season in &config.league.seasons {
        let outcome = match process_season(
            source,
            season,
            &options,
            config.league.name.as_deref(),
            &output_dir,
            Some(season) == default_season,
        )
        .await
        {
            Ok((report, files)) => {
                summary.files.extend(files);
                let status = SeasonStatus::Written {
                    teams: report.teams.len(),
                    weeks: report.weeks.len(),
                    skipped_weeks: report.skipped_weeks.clone(),
                    worst_manager: report
                        .mismanagement
                        .first()
                        .map(|s| (s.team_name.clone(), s.percentage_scored)),
                };
                team_pages.push(report.teams);
                status
            }
            Err(e) => {
                warn!(season, "Skipping season: {e:#}");
                SeasonStatus::Failed {
                    reason: format!("{e:#}"),
                }
            }
        };
        summary.seasons.push(SeasonOutcome {
            season,
            status: outcome,
        });
    }

    if !team_pages.is_empty() {
        let histories = merge_team_histories(&team_pages);
        match report::write_team_histories(&histories, &output_dir) {
            Ok(path) => summary.files.push(path),
            Err(e) => warn!("Failed to write team pages: {e}"),
        }
    }

    summary
}

async fn process_season(
    source: &dyn LeagueSource,
    season: u16,
    options: &ReportOptions,
    league_name: Option<&str>,
    output_dir: &Path,
    with_usage: bool,
) -> anyhow::Result<(SeasonReport, Vec<PathBuf>)> {
    let mut data = fetch_season(source, season).await?;
    let report = build_season_report(&data, options, league_name);

    let mut files = report::write_season_report(&report, output_dir)
        .with_context(|| format!("season {season}: failed to write reports"))?;

    if with_usage {
        add_free_agents(source, &mut data.league).await;
        let usage = build_usage_report(&data.league);
        files.push(
            report::write_usage_report(&usage, output_dir)
                .with_context(|| format!("season {season}: failed to write usage report"))?,
        );
    }

    info!(
        season,
        weeks = report.weeks.len(),
        skipped = report.skipped_weeks.len(),
        "Season reports written"
    );
    Ok((report, files))
}
