// Fantasy football domain: rosters, the optimal lineup solver, season
// mismanagement rankings, and the standings-based reports built on top.

pub mod clubs;
pub mod league;
pub mod lineup;
pub mod matchup;
pub mod mismanagement;
pub mod position;
pub mod roster;
pub mod standings;
pub mod usage;
