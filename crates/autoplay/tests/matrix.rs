use pacerace_autoplay::{
    random_table, run_race, write_json, HarnessConfig, HarnessReport, RiskCounts, RiskLevel,
    RiskRow, Simulator,
};
use pacerace_core::{RaceConfig, RngState};

macro_rules! risk_case {
    ($name:ident, $caught:expr, $exposures:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let counts = RiskCounts {
                exposures: $exposures,
                caught: $caught,
                ..RiskCounts::default()
            };
            let row = RiskRow::new(25, 7, counts);
            assert_eq!(row.risk, $expected);
        }
    };
}

risk_case!(risk_case_none, 0, 60, RiskLevel::Acceptable);
risk_case!(risk_case_no_exposure, 0, 0, RiskLevel::Acceptable);
risk_case!(risk_case_fifteen_exact, 15, 100, RiskLevel::Acceptable);
risk_case!(risk_case_just_risked, 16, 100, RiskLevel::Risked);
risk_case!(risk_case_thirty_five_exact, 35, 100, RiskLevel::Risked);
risk_case!(risk_case_high, 36, 100, RiskLevel::HighRisk);
risk_case!(risk_case_everyone, 60, 60, RiskLevel::HighRisk);

macro_rules! label_case {
    ($name:ident, $level:expr, $label:expr) => {
        #[test]
        fn $name() {
            assert_eq!($level.label(), $label);
        }
    };
}

label_case!(label_acceptable, RiskLevel::Acceptable, "");
label_case!(label_risked, RiskLevel::Risked, "RISKED");
label_case!(label_high, RiskLevel::HighRisk, "HIGH RISK");

fn small_harness(seed: u64) -> HarnessConfig {
    HarnessConfig {
        seed,
        tables: 3,
        batch: 2,
        ..HarnessConfig::default()
    }
}

#[test]
fn random_tables_draw_from_candidates() {
    let config = HarnessConfig::default();
    let mut rng = RngState::from_seed(17);
    for _ in 0..20 {
        let table = random_table(&config.locations, &config.candidate_limits, &mut rng)
            .expect("table");
        assert_eq!(table.len(), 4);
        for checkpoint in table.iter() {
            assert!(config.locations.contains(&checkpoint.threshold));
            assert!(config.candidate_limits.contains(&checkpoint.limit));
        }
    }
}

#[test]
fn empty_candidates_are_rejected() {
    let mut rng = RngState::from_seed(1);
    assert!(random_table(&[25], &[], &mut rng).is_err());
    assert!(random_table(&[], &[5], &mut rng).is_err());
}

#[test]
fn race_tally_counts_only_crossings() {
    let tally = run_race(&RaceConfig::default(), 99).expect("race");
    assert_eq!(tally.participants, 6);
    assert!(tally.rounds > 0);
    for (threshold, counts) in &tally.by_threshold {
        assert!([25, 50, 75, 87].contains(threshold));
        assert!(counts.caught <= counts.crabs);
        assert!(counts.caught <= 6);
    }
}

#[test]
fn harness_covers_every_location_and_limit() {
    let report = Simulator::new(small_harness(5)).run().expect("harness");
    assert_eq!(report.races, 6);
    assert_eq!(report.rows.len(), 16);
    let exposures: u64 = report
        .rows
        .iter()
        .filter(|row| row.location == 25)
        .map(|row| row.counts.exposures)
        .sum();
    // every table has one limit at 25, 2 races x 6 lanes each
    assert_eq!(exposures, 36);
    for row in &report.rows {
        assert!(row.counts.caught <= row.counts.exposures);
        assert!((0.0..=100.0).contains(&row.crab_percentage));
    }
}

#[test]
fn harness_is_seeded() {
    let left = Simulator::new(small_harness(21)).run().expect("left");
    let right = Simulator::new(small_harness(21)).run().expect("right");
    assert_eq!(left.rows, right.rows);
    assert_eq!(left.summary.total_rounds, right.summary.total_rounds);
}

#[test]
fn text_report_lists_rows_and_flags() {
    let mut report = Simulator::new(small_harness(8)).run().expect("harness");
    report.rows[0] = RiskRow::new(
        25,
        5,
        RiskCounts {
            exposures: 10,
            caught: 5,
            ..RiskCounts::default()
        },
    );
    let text = report.to_text_report();
    assert!(text.contains("CRAB %"));
    assert!(text.contains("50.00%"));
    assert!(text.contains("HIGH RISK"));
}

#[test]
fn json_report_round_trips_from_disk() {
    let report = Simulator::new(small_harness(3)).run().expect("harness");
    let path = std::env::temp_dir()
        .join(format!("pacerace-harness-{}", std::process::id()))
        .join("report.json");
    write_json(&path, &report).expect("write");
    let raw = std::fs::read_to_string(&path).expect("read");
    let parsed: HarnessReport = serde_json::from_str(&raw).expect("parse");
    assert_eq!(parsed.rows.len(), report.rows.len());
    assert_eq!(parsed.seed, 3);
}
