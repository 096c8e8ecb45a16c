// Backfield and receiving usage shares, grouped by pro team.
//
// Vulture % = share of a backfield's touches minus share of its fantasy
// points. Positive means the back gets work without the scoring; negative
// means someone is scoring beyond their workload.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::league::{League, PlayerSeasonLine};
use crate::position::Position;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VultureShare {
    pub name: String,
    pub fantasy_team: String,
    pub touches: f64,
    pub points: f64,
    pub touch_pct: f64,
    pub points_pct: f64,
    pub vulture_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetShare {
    pub name: String,
    pub fantasy_team: String,
    pub targets: f64,
    pub points: f64,
    pub targets_pct: f64,
    pub points_pct: f64,
}

/// All backs (or receivers) from one pro team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProTeamGroup<T> {
    pub pro_team: String,
    pub players: Vec<T>,
}

/// Season lines at one position, sorted by total points descending.
pub fn players_at(league: &League, position: Position) -> Vec<&PlayerSeasonLine> {
    let mut players: Vec<&PlayerSeasonLine> = league
        .players
        .iter()
        .filter(|p| p.position == Some(position))
        .collect();
    players.sort_by(|a, b| b.total_points.total_cmp(&a.total_points));
    players
}

fn group_by_pro_team<'a>(
    players: &[&'a PlayerSeasonLine],
) -> BTreeMap<String, Vec<&'a PlayerSeasonLine>> {
    let mut groups: BTreeMap<String, Vec<&'a PlayerSeasonLine>> = BTreeMap::new();
    for &p in players {
        groups.entry(p.pro_team.clone()).or_default().push(p);
    }
    groups
}

fn share(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

/// Vulture table for every backfield. Backfields with no touches or no points
/// are left out.
pub fn vulture_shares(league: &League) -> Vec<ProTeamGroup<VultureShare>> {
    let backs = players_at(league, Position::RunningBack);

    group_by_pro_team(&backs)
        .into_iter()
        .filter_map(|(pro_team, group)| {
            let total_touches: f64 = group.iter().map(|p| touches(p)).sum();
            let total_points: f64 = group.iter().map(|p| p.total_points).sum();
            if total_touches == 0.0 || total_points == 0.0 {
                return None;
            }

            let players = group
                .iter()
                .map(|p| {
                    let touch_pct = share(touches(p), total_touches);
                    let points_pct = share(p.total_points, total_points);
                    VultureShare {
                        name: p.name.clone(),
                        fantasy_team: league.owning_team_name(p),
                        touches: touches(p),
                        points: p.total_points,
                        touch_pct,
                        points_pct,
                        vulture_pct: touch_pct - points_pct,
                    }
                })
                .collect();

            Some(ProTeamGroup { pro_team, players })
        })
        .collect()
}

/// Target-share table for every receiving corps. Groups with no targets or no
/// points are left out.
pub fn target_shares(league: &League) -> Vec<ProTeamGroup<TargetShare>> {
    let receivers = players_at(league, Position::WideReceiver);

    group_by_pro_team(&receivers)
        .into_iter()
        .filter_map(|(pro_team, group)| {
            let total_targets: f64 = group.iter().map(|p| p.targets).sum();
            let total_points: f64 = group.iter().map(|p| p.total_points).sum();
            if total_targets == 0.0 || total_points == 0.0 {
                return None;
            }

            let players = group
                .iter()
                .map(|p| TargetShare {
                    name: p.name.clone(),
                    fantasy_team: league.owning_team_name(p),
                    targets: p.targets,
                    points: p.total_points,
                    targets_pct: share(p.targets, total_targets),
                    points_pct: share(p.total_points, total_points),
                })
                .collect();

            Some(ProTeamGroup { pro_team, players })
        })
        .collect()
}

fn touches(p: &PlayerSeasonLine) -> f64 {
    p.rushing_attempts + p.receptions
}
