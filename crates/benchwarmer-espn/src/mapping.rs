// ESPN numeric id tables: lineup slots, default positions, pro teams, stats.

use benchwarmer_football::position::{Position, Slot};

/// Map an ESPN `lineupSlotId` to a lineup slot.
///
/// IDP, punter and head-coach slots have no counterpart here and come back as
/// `Slot::Other`.
pub fn slot_from_id(id: i32) -> Slot {
    match id {
        0 | 1 => Slot::Quarterback,
        2 => Slot::RunningBack,
        4 => Slot::WideReceiver,
        6 => Slot::TightEnd,
        // RB/WR, WR/TE, OP (superflex) and RB/WR/TE
        3 | 5 | 7 | 23 => Slot::Flex,
        16 => Slot::Defense,
        17 => Slot::Kicker,
        20 | 22 => Slot::Bench,
        21 => Slot::InjuredReserve,
        _ => Slot::Other,
    }
}

/// The dedicated `lineupSlotId` for a position, as used by player-pool
/// filters.
pub fn slot_id_for(position: Position) -> i32 {
    match position {
        Position::Quarterback => 0,
        Position::RunningBack => 2,
        Position::WideReceiver => 4,
        Position::TightEnd => 6,
        Position::Defense => 16,
        Position::Kicker => 17,
    }
}

/// Map an ESPN `defaultPositionId` to a position.
pub fn position_from_id(id: i32) -> Option<Position> {
    match id {
        1 => Some(Position::Quarterback),
        2 => Some(Position::RunningBack),
        3 => Some(Position::WideReceiver),
        4 => Some(Position::TightEnd),
        5 => Some(Position::Kicker),
        16 => Some(Position::Defense),
        _ => None,
    }
}

/// Pro team abbreviation for an ESPN `proTeamId`. 0 means no team.
pub fn pro_team_abbrev(id: i32) -> Option<&'static str> {
    let abbrev = match id {
        1 => "ATL",
        2 => "BUF",
        3 => "CHI",
        4 => "CIN",
        5 => "CLE",
        6 => "DAL",
        7 => "DEN",
        8 => "DET",
        9 => "GB",
        10 => "TEN",
        11 => "IND",
        12 => "KC",
        13 => "LV",
        14 => "LAR",
        15 => "MIA",
        16 => "MIN",
        17 => "NE",
        18 => "NO",
        19 => "NYG",
        20 => "NYJ",
        21 => "PHI",
        22 => "ARI",
        23 => "PIT",
        24 => "LAC",
        25 => "SF",
        26 => "SEA",
        27 => "TB",
        28 => "WSH",
        29 => "CAR",
        30 => "JAX",
        33 => "BAL",
        34 => "HOU",
        _ => return None,
    };
    Some(abbrev)
}

// ---- stat ids used by the usage breakdown

pub const STAT_RUSHING_ATTEMPTS: &str = "23";
pub const STAT_RUSHING_YARDS: &str = "24";
pub const STAT_RUSHING_TDS: &str = "25";
pub const STAT_RECEIVING_YARDS: &str = "42";
pub const STAT_RECEIVING_TDS: &str = "43";
pub const STAT_RECEPTIONS: &str = "53";
pub const STAT_TARGETS: &str = "58";
pub const STAT_FUMBLES_LOST: &str = "72";
