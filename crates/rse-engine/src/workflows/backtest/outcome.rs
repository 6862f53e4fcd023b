use serde::{Deserialize, Serialize};

use crate::workflows::race::RunnerRecord;

/// Which bet families a ticket would have cashed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketOutcome {
    pub base_won: bool,
    pub base_placed: bool,
    pub exacta_won: bool,
    pub exacta_placed: bool,
    pub trio: bool,
}

/// Compare a ticket with the first three finishers.
///
/// Returns `None` when the arrival lists fewer than three runners or the
/// ticket is empty.
pub fn assess_ticket(ticket: &[u32], arrival: &[u32]) -> Option<TicketOutcome> {
    let top3 = arrival.get(..3)?;
    let base = *ticket.first()?;
    let placed = |number: &u32| top3.contains(number);

    Some(TicketOutcome {
        base_won: base == top3[0],
        base_placed: placed(&base),
        exacta_won: ticket.len() >= 2 && ticket[..2] == top3[..2],
        exacta_placed: ticket.len() >= 2 && ticket[..2].iter().all(placed),
        trio: ticket.len() >= 3 && ticket[..3].iter().all(placed),
    })
}

/// How the betting market's shortest prices fared in one race.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOutcome {
    pub favourite_won: bool,
    pub favourite_placed: bool,
    pub winner_in_top3_odds: bool,
}

/// Compare the lowest-odds runner and the three shortest prices with the arrival.
///
/// Returns `None` without a winner or without a single priced runner. Equal
/// odds keep card order, so the first listed runner is the favourite.
pub fn assess_market(runners: &[RunnerRecord], arrival: &[u32]) -> Option<MarketOutcome> {
    let winner = *arrival.first()?;
    let mut priced: Vec<(f64, u32)> = runners
        .iter()
        .filter_map(|record| {
            let odds = record.odds.filter(|odds| odds.is_finite())?;
            Some((odds, record.number))
        })
        .collect();
    priced.sort_by(|left, right| left.0.total_cmp(&right.0));

    let favourite = priced.first()?.1;
    let placed = &arrival[..arrival.len().min(3)];

    Some(MarketOutcome {
        favourite_won: favourite == winner,
        favourite_placed: placed.contains(&favourite),
        winner_in_top3_odds: priced.iter().take(3).any(|&(_, number)| number == winner),
    })
}
