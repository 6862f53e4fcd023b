use rse_engine::workflows::backtest::{assess_market, assess_ticket, BacktestSummary};
use rse_engine::workflows::race::{RaceAnalyzer, RaceCard, RunnerRecord};
use rse_engine::EngineConfig;

fn active(number: u32, rest_days: f64) -> RunnerRecord {
    RunnerRecord {
        rest_days: Some(rest_days),
        active: Some(true),
        ..RunnerRecord::new(number, format!("Runner {number}"))
    }
}

fn race(source_id: &str, venue: &str, discipline: &str, runners: Vec<RunnerRecord>) -> RaceCard {
    RaceCard {
        source_id: source_id.to_string(),
        venue: venue.to_string(),
        discipline: discipline.to_string(),
        runners,
    }
}

#[test]
fn summary_tallies_playable_races_per_slice() {
    let analyzer = RaceAnalyzer::new(EngineConfig::canonical());
    let mut summary = BacktestSummary::default();

    let won = analyzer
        .analyze(&race(
            "2025-02-01_R1C1",
            "Vincennes",
            "trot",
            vec![active(5, 14.0), active(3, 3.0), active(8, 25.0)],
        ))
        .expect("analysis succeeds");
    assert_eq!(won.base().map(|c| c.number), Some(5));
    let outcome = assess_ticket(won.ticket(), &[5, 8, 3]);
    summary.record(&won, outcome.as_ref(), None);

    let lost = analyzer
        .analyze(&race(
            "2025-02-01_R1C2",
            "pau",
            "plat",
            vec![active(1, 10.0), active(2, 12.0)],
        ))
        .expect("analysis succeeds");
    let outcome = assess_ticket(lost.ticket(), &[7, 9, 4]);
    summary.record(&lost, outcome.as_ref(), None);

    let unplayable = analyzer
        .analyze(&race("2025-02-01_R1C3", "pau", "plat", vec![active(1, 10.0)]))
        .expect("analysis succeeds");
    let outcome = assess_ticket(unplayable.ticket(), &[1, 2, 3]);
    summary.record(&unplayable, outcome.as_ref(), None);

    assert_eq!(summary.overall.races, 3);
    assert_eq!(summary.overall.playable, 2);
    assert_eq!(summary.overall.base_won, 1);
    assert_eq!(summary.overall.base_placed, 1);
    assert!((summary.overall.selection_rate() - 2.0 / 3.0).abs() < 1e-9);
    assert!((summary.overall.hit_rate(summary.overall.base_won) - 0.5).abs() < 1e-9);

    let vincennes = summary.by_venue.get("vincennes").expect("venue slice");
    assert_eq!((vincennes.races, vincennes.playable, vincennes.base_won), (1, 1, 1));
    let plat = summary.by_discipline.get("plat").expect("discipline slice");
    assert_eq!((plat.races, plat.playable, plat.base_placed), (2, 1, 0));
}

#[test]
fn missing_arrival_counts_race_without_playing_it() {
    let analyzer = RaceAnalyzer::new(EngineConfig::canonical());
    let mut summary = BacktestSummary::default();

    let analysis = analyzer
        .analyze(&race(
            "2025-02-02_R2C1",
            "cagnes",
            "monte",
            vec![active(1, 8.0), active(2, 9.0)],
        ))
        .expect("analysis succeeds");
    summary.record(&analysis, assess_ticket(analysis.ticket(), &[1]).as_ref(), None);

    assert_eq!(summary.overall.races, 1);
    assert_eq!(summary.overall.playable, 0);
    assert_eq!(summary.overall.hit_rate(summary.overall.trio), 0.0);
    assert_eq!(summary.overall.priced, 0);
}

fn quoted(number: u32, rest_days: f64, odds: f64) -> RunnerRecord {
    RunnerRecord {
        odds: Some(odds),
        ..active(number, rest_days)
    }
}

#[test]
fn market_baseline_tracks_the_shortest_prices() {
    let analyzer = RaceAnalyzer::new(EngineConfig::canonical());
    let mut summary = BacktestSummary::default();

    // favourite 3 wins
    let first = race(
        "2025-02-03_R1C1",
        "vincennes",
        "trot",
        vec![quoted(1, 10.0, 7.5), quoted(2, 12.0, 15.0), quoted(3, 40.0, 1.9)],
    );
    // favourite 2 only places, the winner is the third shortest price
    let second = race(
        "2025-02-03_R1C2",
        "pau",
        "plat",
        vec![
            quoted(1, 8.0, 9.0),
            quoted(2, 9.0, 2.2),
            quoted(3, 11.0, 30.0),
            quoted(4, 14.0, 5.0),
        ],
    );
    // nobody priced: counted as a race but not as a priced race
    let third = race(
        "2025-02-03_R1C3",
        "pau",
        "plat",
        vec![active(1, 8.0), active(2, 9.0)],
    );

    for (card, arrival) in [
        (first, vec![3, 1, 2]),
        (second, vec![1, 2, 3]),
        (third, vec![2, 1, 3]),
    ] {
        let analysis = analyzer.analyze(&card).expect("analysis succeeds");
        let outcome = assess_ticket(analysis.ticket(), &arrival);
        let market = assess_market(&card.runners, &arrival);
        summary.record(&analysis, outcome.as_ref(), market.as_ref());
    }

    let overall = summary.overall;
    assert_eq!(overall.races, 3);
    assert_eq!(overall.priced, 2);
    assert_eq!(overall.favourite_won, 1);
    assert_eq!(overall.favourite_placed, 2);
    assert_eq!(overall.top3_odds_won, 2);
    assert!((overall.market_rate(overall.favourite_won) - 0.5).abs() < 1e-9);

    let plat = summary.by_discipline.get("plat").expect("discipline slice");
    assert_eq!((plat.races, plat.priced, plat.favourite_won), (2, 1, 0));
    assert_eq!(plat.favourite_placed, 1);
}
