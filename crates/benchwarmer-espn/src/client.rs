// ESPN fantasy football API v3 client.
//
// Every call is a GET against the league endpoint with a set of `view`
// parameters selecting which parts of the league document come back.
// Private leagues authenticate with the `espn_s2` and `SWID` cookies.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use benchwarmer_core::config::Config;
use benchwarmer_football::league::{League, PlayerSeasonLine};
use benchwarmer_football::matchup::WeekBoxScores;
use benchwarmer_football::position::Position;

use crate::convert::{
    apply_pro_opponents, free_agent_lines, league_from_raw, pro_opponents, week_from_raw,
};
use crate::error::EspnError;
use crate::mapping::slot_id_for;
use crate::types::{RawLeague, RawPlayerPool, RawProSchedule, RawScheduleSettings};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const LEAGUE_VIEWS: &[&str] = &["mTeam", "mRoster", "mSettings", "mStatus"];
const WEEK_VIEWS: &[&str] = &["mMatchupScore", "mScoreboard"];
const SETTINGS_VIEWS: &[&str] = &["mSettings"];
const PLAYER_POOL_VIEWS: &[&str] = &["kona_player_info"];
const PRO_SCHEDULE_VIEWS: &[&str] = &["proTeamSchedules_wl"];
const FREE_AGENT_LIMIT: u32 = 100;
const FANTASY_FILTER_HEADER: &str = "x-fantasy-filter";

// ---------------------------------------------------------------------------
// EspnClient
// ---------------------------------------------------------------------------

pub struct EspnClient {
    http: reqwest::Client,
    base_url: String,
    league_id: u64,
    /// Schedule settings per season, for scoring period -> matchup period
    /// lookups.
    schedules: Mutex<HashMap<u16, RawScheduleSettings>>,
    /// NFL schedule per season, for pro opponents.
    pro_schedules: Mutex<HashMap<u16, RawProSchedule>>,
}

impl EspnClient {
    /// Create a client. `credentials` is `(espn_s2, swid)` for private leagues.
    pub fn new(
        base_url: &str,
        league_id: u64,
        timeout: Duration,
        credentials: Option<(&str, &str)>,
    ) -> Result<Self, EspnError> {
        let mut headers = HeaderMap::new();
        if let Some((espn_s2, swid)) = credentials {
            let mut cookie = HeaderValue::from_str(&format!("espn_s2={espn_s2}; SWID={swid}"))
                .map_err(|e| EspnError::InvalidCredentials {
                    message: e.to_string(),
                })?;
            cookie.set_sensitive(true);
            headers.insert(COOKIE, cookie);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| EspnError::Http {
                url: base_url.to_string(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            league_id,
            schedules: Mutex::new(HashMap::new()),
            pro_schedules: Mutex::new(HashMap::new()),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, EspnError> {
        let credentials = match (&config.credentials.espn_s2, &config.credentials.swid) {
            (Some(s2), Some(swid)) => Some((s2.as_str(), swid.as_str())),
            _ => None,
        };
        Self::new(
            &config.espn.base_url,
            config.league.id,
            Duration::from_secs(config.espn.timeout_secs),
            credentials,
        )
    }

    pub fn season_url(&self, season: u16) -> String {
        format!("{}/seasons/{season}", self.base_url)
    }

    pub fn league_url(&self, season: u16) -> String {
        format!("{}/segments/0/leagues/{}", self.season_url(season), self.league_id)
    }

    /// League metadata, standings and every rostered player's season line.
    pub async fn fetch_league(&self, season: u16) -> Result<League, EspnError> {
        let raw = self.get_league(season, LEAGUE_VIEWS, None, None).await?;
        self.remember_schedule(season, &raw.settings.schedule_settings);
        Ok(league_from_raw(season, &raw))
    }

    /// Box scores for one scoring period.
    pub async fn fetch_week(&self, season: u16, week: u32) -> Result<WeekBoxScores, EspnError> {
        let matchup_period = self.matchup_period(season, week).await?;
        let filter = serde_json::json!({
            "schedule": {
                "filterMatchupPeriodIds": { "value": [matchup_period] }
            }
        })
        .to_string();

        let raw = self
            .get_league(season, WEEK_VIEWS, Some(week), Some(filter))
            .await?;
        let mut scores = week_from_raw(week, Some(matchup_period), &raw);

        match self.pro_schedule(season).await {
            Ok(schedule) => apply_pro_opponents(&mut scores, &pro_opponents(&schedule, week)),
            Err(e) => warn!(season, week, "pro schedule unavailable, opponents left blank: {e}"),
        }
        Ok(scores)
    }

    /// Unrostered players (free agents and waivers) at one position, as of
    /// `week`. At most the 100 most-owned players come back.
    pub async fn fetch_free_agents(
        &self,
        season: u16,
        week: u32,
        position: Position,
    ) -> Result<Vec<PlayerSeasonLine>, EspnError> {
        let filter = free_agent_filter(position).to_string();
        let pool: RawPlayerPool = self
            .get_json(self.league_url(season), PLAYER_POOL_VIEWS, Some(week), Some(filter))
            .await?;
        let lines = free_agent_lines(&pool, position, week);
        debug!(
            season,
            week,
            %position,
            returned = pool.players.len(),
            kept = lines.len(),
            "free agents"
        );
        Ok(lines)
    }

    // ---- internals

    async fn matchup_period(&self, season: u16, week: u32) -> Result<u32, EspnError> {
        if let Some(period) = self.cached_matchup_period(season, week) {
            return Ok(period);
        }

        let cached = self
            .schedules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&season);
        if !cached {
            let raw = self.get_league(season, SETTINGS_VIEWS, None, None).await?;
            self.remember_schedule(season, &raw.settings.schedule_settings);
            if let Some(period) = self.cached_matchup_period(season, week) {
                return Ok(period);
            }
        }

        debug!(season, week, "no matchup period listed, assuming it equals the week");
        Ok(week)
    }

    async fn pro_schedule(&self, season: u16) -> Result<RawProSchedule, EspnError> {
        let cached = self
            .pro_schedules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&season)
            .cloned();
        if let Some(schedule) = cached {
            return Ok(schedule);
        }

        let schedule: RawProSchedule = self
            .get_json(self.season_url(season), PRO_SCHEDULE_VIEWS, None, None)
            .await?;
        self.pro_schedules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(season, schedule.clone());
        Ok(schedule)
    }

    fn cached_matchup_period(&self, season: u16, week: u32) -> Option<u32> {
        self.schedules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&season)
            .and_then(|s| s.matchup_period_for(week))
    }

    fn remember_schedule(&self, season: u16, schedule: &RawScheduleSettings) {
        self.schedules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(season, schedule.clone());
    }

    async fn get_league(
        &self,
        season: u16,
        views: &[&str],
        scoring_period: Option<u32>,
        filter: Option<String>,
    ) -> Result<RawLeague, EspnError> {
        self.get_json(self.league_url(season), views, scoring_period, filter).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        views: &[&str],
        scoring_period: Option<u32>,
        filter: Option<String>,
    ) -> Result<T, EspnError> {
        let mut query: Vec<(&str, String)> =
            views.iter().map(|v| ("view", (*v).to_string())).collect();
        if let Some(period) = scoring_period {
            query.push(("scoringPeriodId", period.to_string()));
        }

        let mut request = self.http.get(&url).query(&query);
        if let Some(filter) = filter {
            request = request.header(FANTASY_FILTER_HEADER, filter);
        }

        debug!(%url, ?views, ?scoring_period, "ESPN request");
        let response = request.send().await.map_err(|e| EspnError::Http {
            url: url.clone(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EspnError::from_status(&url, status.as_u16()));
        }

        let body = response.text().await.map_err(|e| EspnError::Http {
            url: url.clone(),
            source: e,
        })?;
        debug!(%url, bytes = body.len(), "ESPN response");

        serde_json::from_str(&body).map_err(|e| EspnError::Decode { url, source: e })
    }
}

/// `x-fantasy-filter` body selecting unrostered players at one position,
/// most-owned first.
fn free_agent_filter(position: Position) -> serde_json::Value {
    serde_json::json!({
        "players": {
            "filterStatus": { "value": ["FREEAGENT", "WAIVERS"] },
            "filterSlotIds": { "value": [slot_id_for(position)] },
            "limit": FREE_AGENT_LIMIT,
            "sortPercOwned": { "sortPriority": 1, "sortAsc": false },
            "sortDraftRanks": { "sortPriority": 100, "sortAsc": true, "value": "STANDARD" }
        }
    })
}
