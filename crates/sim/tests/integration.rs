use skyduel_shared::*;
use skyduel_sim::controllers::{EvaderController, RandomController};
use skyduel_sim::{run_battle, CancelToken, NullReporter};

fn profiles() -> [AttributeProfile; 2] {
    [
        AttributeProfile::balanced("T1"),
        AttributeProfile::balanced("T2"),
    ]
}

fn config(seed: u64) -> BattleConfig {
    BattleConfig {
        seed,
        max_turns: Some(5_000),
        ..Default::default()
    }
}

fn run_seeded(seed: u64) -> BattleReport {
    let mut c1 = RandomController::seeded("random", seed);
    let mut c2 = RandomController::seeded("random", seed.wrapping_add(1));
    run_battle(
        &config(seed),
        profiles(),
        &mut c1,
        &mut c2,
        &mut NullReporter,
        &CancelToken::new(),
    )
    .expect("battle should run")
}

#[test]
fn test_battle_completes_within_limit() {
    let report = run_seeded(42);
    assert!(!report.snapshots.is_empty());
    assert!(report.final_turn <= 5_000);
    assert!(matches!(
        report.outcome,
        BattleOutcome::Team1Won | BattleOutcome::Team2Won | BattleOutcome::Cancelled
    ));
}

#[test]
fn test_deterministic_replay() {
    let report1 = run_seeded(123);
    let report2 = run_seeded(123);

    assert_eq!(report1.outcome, report2.outcome);
    assert_eq!(report1.final_turn, report2.final_turn);
    assert_eq!(report1.snapshots.len(), report2.snapshots.len());

    // identical turn-by-turn snapshots, compared on the wire encoding
    let json1 = serde_json::to_string(&report1).unwrap();
    let json2 = serde_json::to_string(&report2).unwrap();
    assert_eq!(json1, json2);
}

#[test]
fn test_evader_battles_are_deterministic_too() {
    let run = |seed: u64| {
        let mut c1 = RandomController::seeded("random", seed);
        let mut c2 = EvaderController::seeded("evader", seed);
        run_battle(
            &config(seed),
            profiles(),
            &mut c1,
            &mut c2,
            &mut NullReporter,
            &CancelToken::new(),
        )
        .unwrap()
    };

    let report1 = run(7);
    let report2 = run(7);
    assert_eq!(report1.outcome, report2.outcome);
    assert_eq!(report1.final_turn, report2.final_turn);
    assert_eq!(report1.stats.team1_shots, report2.stats.team1_shots);
    assert_eq!(report1.stats.team2_shots, report2.stats.team2_shots);
}

#[test]
fn test_report_serialization_round_trip() {
    let report = run_seeded(1);

    let json = serde_json::to_string(&report).expect("report should serialize");
    assert!(json.len() > 100);

    let decoded: BattleReport = serde_json::from_str(&json).expect("report should deserialize");
    assert_eq!(decoded.outcome, report.outcome);
    assert_eq!(decoded.final_turn, report.final_turn);
    assert_eq!(decoded.snapshots.len(), report.snapshots.len());
}

#[test]
fn test_over_budget_profile_rejected_at_construction() {
    let mut bad = AttributeProfile::balanced("T1");
    bad.defense += 1;

    let mut c1 = RandomController::seeded("random", 0);
    let mut c2 = RandomController::seeded("random", 1);
    let err = run_battle(
        &config(0),
        [bad, AttributeProfile::balanced("T2")],
        &mut c1,
        &mut c2,
        &mut NullReporter,
        &CancelToken::new(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        BattleError::AttributeBudgetExceeded { total: 101, .. }
    ));
}

#[test]
fn test_snapshot_stream_matches_report() {
    struct CountingReporter {
        turns: Vec<u32>,
    }

    impl skyduel_sim::TurnReporter for CountingReporter {
        fn report_turn(&mut self, snapshot: &TurnSnapshot) {
            self.turns.push(snapshot.turn);
        }
    }

    let mut reporter = CountingReporter { turns: Vec::new() };
    let mut c1 = RandomController::seeded("random", 3);
    let mut c2 = RandomController::seeded("random", 4);
    let report = run_battle(
        &config(3),
        profiles(),
        &mut c1,
        &mut c2,
        &mut reporter,
        &CancelToken::new(),
    )
    .unwrap();

    // one emission per turn, numbered from 1, same set the report recorded
    let expected: Vec<u32> = (1..=report.final_turn).collect();
    assert_eq!(reporter.turns, expected);
    assert_eq!(report.snapshots.len(), report.final_turn as usize);
}

#[test]
fn test_parallel_battles_match_serial_results() {
    // independent battles share nothing; running them on threads must give
    // the same outcomes as running them inline
    let serial: Vec<_> = (0..4u64)
        .map(|seed| {
            let r = run_seeded(seed);
            (r.outcome, r.final_turn)
        })
        .collect();

    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            std::thread::spawn(move || {
                let r = run_seeded(seed);
                (r.outcome, r.final_turn)
            })
        })
        .collect();
    let parallel: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(serial, parallel);
}
