// Player positions and lineup slots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scoring positions the lineup solver understands.
///
/// Anything else a data source reports (IDP positions, punters, head coaches)
/// is carried as `None` on the roster entry and ignored by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "D/ST")]
    Defense,
    #[serde(rename = "K")]
    Kicker,
}

impl Position {
    /// Every position, in lineup display order.
    pub const ALL: [Position; 6] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Defense,
        Position::Kicker,
    ];

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Defense => "D/ST",
            Position::Kicker => "K",
        }
    }

    /// Whether a player at this position may fill the FLEX slot.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }

    /// The dedicated lineup slot for this position.
    pub fn slot(&self) -> Slot {
        match self {
            Position::Quarterback => Slot::Quarterback,
            Position::RunningBack => Slot::RunningBack,
            Position::WideReceiver => Slot::WideReceiver,
            Position::TightEnd => Slot::TightEnd,
            Position::Defense => Slot::Defense,
            Position::Kicker => Slot::Kicker,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A lineup slot a manager can place a player in.
///
/// `Bench` and `InjuredReserve` are the only non-scoring slots. `Other`
/// covers starting slots outside the standard offense/kicker/defense layout
/// (IDP, punter, head coach); players there still count toward the actual
/// score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "FLEX")]
    Flex,
    #[serde(rename = "D/ST")]
    Defense,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "BE")]
    Bench,
    #[serde(rename = "IR")]
    InjuredReserve,
    #[serde(rename = "OTHER")]
    Other,
}

impl Slot {
    pub fn display_str(&self) -> &'static str {
        match self {
            Slot::Quarterback => "QB",
            Slot::RunningBack => "RB",
            Slot::WideReceiver => "WR",
            Slot::TightEnd => "TE",
            Slot::Flex => "FLEX",
            Slot::Defense => "D/ST",
            Slot::Kicker => "K",
            Slot::Bench => "BE",
            Slot::InjuredReserve => "IR",
            Slot::Other => "OTHER",
        }
    }

    /// Whether points scored in this slot count toward the team's total.
    pub fn is_starting(&self) -> bool {
        !matches!(self, Slot::Bench | Slot::InjuredReserve)
    }

    /// Deterministic ordering index for lineup display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Slot::Quarterback => 0,
            Slot::RunningBack => 1,
            Slot::WideReceiver => 2,
            Slot::TightEnd => 3,
            Slot::Flex => 4,
            Slot::Defense => 5,
            Slot::Kicker => 6,
            Slot::Bench => 7,
            Slot::InjuredReserve => 8,
            Slot::Other => 9,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}
