// Where league data comes from. The pipeline only talks to this trait so it
// can be driven by the ESPN client or by canned data in tests.

use anyhow::Context;
use async_trait::async_trait;

use benchwarmer_espn::EspnClient;
use benchwarmer_football::league::{League, PlayerSeasonLine};
use benchwarmer_football::matchup::WeekBoxScores;
use benchwarmer_football::position::Position;

#[async_trait]
pub trait LeagueSource: Send + Sync {
    /// League metadata, standings and rostered players for one season.
    async fn fetch_league(&self, season: u16) -> anyhow::Result<League>;

    /// Box scores for one week of one season.
    async fn fetch_week(&self, season: u16, week: u32) -> anyhow::Result<WeekBoxScores>;

    /// Unrostered players at one position, with season lines as of `week`.
    async fn fetch_free_agents(
        &self,
        season: u16,
        week: u32,
        position: Position,
    ) -> anyhow::Result<Vec<PlayerSeasonLine>>;
}

#[async_trait]
impl LeagueSource for EspnClient {
    async fn fetch_league(&self, season: u16) -> anyhow::Result<League> {
        EspnClient::fetch_league(self, season)
            .await
            .with_context(|| format!("failed to fetch {season} league data from ESPN"))
    }

    async fn fetch_week(&self, season: u16, week: u32) -> anyhow::Result<WeekBoxScores> {
        EspnClient::fetch_week(self, season, week)
            .await
            .with_context(|| format!("failed to fetch {season} week {week} box scores from ESPN"))
    }

    async fn fetch_free_agents(
        &self,
        season: u16,
        week: u32,
        position: Position,
    ) -> anyhow::Result<Vec<PlayerSeasonLine>> {
        EspnClient::fetch_free_agents(self, season, week, position)
            .await
            .with_context(|| format!("failed to fetch {season} free agent {position}s from ESPN"))
    }
}
