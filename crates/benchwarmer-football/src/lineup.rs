// Optimal lineup solver.
//
// Given everything a team had rostered in a week (starters and bench), pick
// the highest-scoring legal lineup for the fixed slot layout
// 1 QB / 2 RB / 2 WR / 1 TE / 1 FLEX / 1 D/ST / 1 K.
//
// Each dedicated slot is filled greedily from its own position group, then
// FLEX takes the best RB/WR/TE left over. This greedy order is exact for this
// layout: pulling a dedicated-slot player into FLEX only hands the dedicated
// slot to a lower-ranked player of the same position.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::position::{Position, Slot};
use crate::roster::RosterEntry;

// ---------------------------------------------------------------------------
// Slot layout
// ---------------------------------------------------------------------------

/// Dedicated slots per position, in fill order. The FLEX pool is assembled in
/// this order too (RB leftovers, then WR, then TE).
pub const DEDICATED_SLOTS: &[(Position, usize)] = &[
    (Position::Quarterback, 1),
    (Position::RunningBack, 2),
    (Position::WideReceiver, 2),
    (Position::TightEnd, 1),
    (Position::Defense, 1),
    (Position::Kicker, 1),
];

pub const FLEX_SLOTS: usize = 1;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One player placed into one slot of the optimal lineup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineupPick<'a> {
    pub slot: Slot,
    pub entry: &'a RosterEntry,
}

/// The best legal lineup available from a roster pool.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalLineup<'a> {
    pub score: f64,
    pub picks: Vec<LineupPick<'a>>,
}

impl<'a> OptimalLineup<'a> {
    /// Whether the given entry made the optimal lineup (pointer identity).
    pub fn contains(&self, entry: &RosterEntry) -> bool {
        self.picks.iter().any(|p| std::ptr::eq(p.entry, entry))
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Highest achievable score from `players`. Never fails; missing positions
/// simply contribute nothing.
pub fn compute_optimal_score(players: &[RosterEntry]) -> f64 {
    compute_optimal_lineup(players).score
}

/// Build the optimal lineup from a roster pool.
///
/// 1. Partition by position, dropping entries with no recognized position
///    or with non-finite points.
/// 2. Sort each group by points descending. The sort is stable, so equal
///    scores keep their input order.
/// 3. Fill the dedicated slots from the top of each group. A group shorter
///    than its slot count fills what it can.
/// 4. Pool the RB/WR/TE players left over and give FLEX the best of them.
pub fn compute_optimal_lineup(players: &[RosterEntry]) -> OptimalLineup<'_> {
    let mut groups: HashMap<Position, Vec<&RosterEntry>> = HashMap::new();
    for entry in players {
        match entry.position {
            Some(pos) if entry.points.is_finite() => groups.entry(pos).or_default().push(entry),
            _ => {}
        }
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| by_points_desc(a, b));
    }

    let mut picks: Vec<LineupPick<'_>> = Vec::new();
    let mut flex_pool: Vec<&RosterEntry> = Vec::new();

    for &(pos, count) in DEDICATED_SLOTS {
        let group: &[&RosterEntry] = groups.get(&pos).map(Vec::as_slice).unwrap_or(&[]);
        // Clamp so a short group leaves an empty remainder.
        let taken = count.min(group.len());

        picks.extend(group[..taken].iter().map(|&entry| LineupPick {
            slot: pos.slot(),
            entry,
        }));

        if pos.is_flex_eligible() {
            flex_pool.extend_from_slice(&group[taken..]);
        }
    }

    flex_pool.sort_by(|a, b| by_points_desc(a, b));
    picks.extend(flex_pool.iter().take(FLEX_SLOTS).map(|&entry| LineupPick {
        slot: Slot::Flex,
        entry,
    }));

    let score = picks.iter().map(|p| p.entry.points).sum();

    OptimalLineup { score, picks }
}

fn by_points_desc(a: &RosterEntry, b: &RosterEntry) -> Ordering {
    b.points.total_cmp(&a.points)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
