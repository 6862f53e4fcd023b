use rse_engine::workflows::backtest::{BacktestSummary, HitCounts};
use rse_engine::workflows::race::RaceAnalysis;
use std::fmt::Write;

/// Plain-text rendering of one analysis for terminal use.
pub fn render_analysis(analysis: &RaceAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "1RSE DOMAIN ANALYSIS | {} | {} | {}",
        analysis.source_id, analysis.venue, analysis.discipline
    );
    let _ = writeln!(out, "{}", "-".repeat(70));

    if analysis.schema.is_empty() {
        let _ = writeln!(out, "no runner passed the domain filter");
    }
    for candidate in &analysis.schema {
        let _ = writeln!(out, " - {}", candidate.summary());
    }

    if !analysis.excluded.is_empty() {
        let _ = writeln!(out, "\nOutside the schema:");
        for candidate in &analysis.excluded {
            let _ = writeln!(
                out,
                " - {} {} (activity={}, rest={}, odds={})",
                candidate.number,
                candidate.name,
                u8::from(candidate.eligible_by_activity),
                u8::from(candidate.eligible_by_rest),
                u8::from(candidate.eligible_by_odds)
            );
        }
    }

    let selection = &analysis.selection;
    let _ = writeln!(out, "\nRECOMMENDED BET");
    match analysis.base() {
        Some(base) => {
            let _ = writeln!(out, "BASE: {} {}", base.number, base.name);
        }
        None => {
            let _ = writeln!(out, "BASE: none");
        }
    }
    let _ = writeln!(out, "TICKET: {:?} ({})", selection.ticket, selection.bet_type);
    let _ = writeln!(
        out,
        "Confidence: {:.2} | Face: {} | Draws: {:?} | Seed: {}",
        analysis.confidence, selection.face, selection.draws, selection.seed
    );
    out
}

pub fn render_backtest(summary: &BacktestSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "1RSE BACKTEST");
    let _ = writeln!(out, "{}", "=".repeat(70));
    render_counts(&mut out, "overall", &summary.overall);

    for (venue, counts) in &summary.by_venue {
        render_counts(&mut out, &format!("venue {venue}"), counts);
    }
    for (discipline, counts) in &summary.by_discipline {
        render_counts(&mut out, &format!("discipline {discipline}"), counts);
    }
    out
}

fn render_counts(out: &mut String, label: &str, counts: &HitCounts) {
    let pct = |hits: u32| counts.hit_rate(hits) * 100.0;
    let _ = writeln!(
        out,
        "{label}: {} races, {} playable ({:.1}%)",
        counts.races,
        counts.playable,
        counts.selection_rate() * 100.0
    );
    let _ = writeln!(
        out,
        "  base won {} ({:.1}%) | base placed {} ({:.1}%) | exacta won {} ({:.1}%) | exacta placed {} ({:.1}%) | trio {} ({:.1}%)",
        counts.base_won,
        pct(counts.base_won),
        counts.base_placed,
        pct(counts.base_placed),
        counts.exacta_won,
        pct(counts.exacta_won),
        counts.exacta_placed,
        pct(counts.exacta_placed),
        counts.trio,
        pct(counts.trio)
    );

    let market = |hits: u32| counts.market_rate(hits) * 100.0;
    let _ = writeln!(
        out,
        "  market over {} priced: favourite won {} ({:.1}%) | favourite placed {} ({:.1}%) | winner in top 3 odds {} ({:.1}%)",
        counts.priced,
        counts.favourite_won,
        market(counts.favourite_won),
        counts.favourite_placed,
        market(counts.favourite_placed),
        counts.top3_odds_won,
        market(counts.top3_odds_won)
    );
}
