/// Integration tests for the prediction pipeline against the bundled sample dataset
///
/// Run with: cargo test --test integration_tests -- --nocapture

use heart_safe::{
    features::{FEATURES, N_FEATURES},
    PipelineError, PredictionPipeline, RiskSchema, RiskTier, TrainingDataset,
};
use std::{io::Write, sync::Arc, thread};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/heart_sample.csv");

const KNOWN_CASE: [f64; N_FEATURES] =
    [63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, 1.0];

fn dataset() -> TrainingDataset {
    TrainingDataset::load(FIXTURE, "output").expect("fixture should load")
}

fn pipeline(k: usize) -> PredictionPipeline {
    PredictionPipeline::fit(&dataset(), k, RiskSchema::Binary).expect("fixture should fit")
}

#[test]
fn test_fixture_loads() {
    println!("\n=== Test: Fixture Loads ===");
    let ds = dataset();
    assert_eq!(ds.len(), 31);
    let counts = ds.label_counts();
    assert_eq!(counts.get(&1), Some(&15));
    assert_eq!(counts.get(&0), Some(&16));
    println!("✓ {} rows, label counts {:?}", ds.len(), counts);
}

#[test]
fn test_known_case_regression() {
    println!("\n=== Test: Known Case Regression ===");
    let p = pipeline(5);
    let r = p.predict_risk(&KNOWN_CASE).unwrap();

    // nearest five on the fixture vote 1,0,0,1,1
    assert_eq!(r.label, 1, "known case label drifted");
    assert_eq!(r.tier, RiskTier::High);
    assert_eq!(r.advice.len(), 4);
    println!("✓ known case -> {} ({})", r.label, r.tier);

    // repeated calls do not change the answer
    for _ in 0..10 {
        assert_eq!(p.predict_risk(&KNOWN_CASE).unwrap(), r);
    }
}

#[test]
fn test_low_risk_row() {
    let p = pipeline(5);
    let r = p
        .predict_risk(&[67.0, 1.0, 0.0, 160.0, 286.0, 0.0, 0.0, 108.0, 1.0, 1.5, 1.0, 3.0, 2.0])
        .unwrap();
    assert_eq!(r.label, 0);
    assert_eq!(r.tier, RiskTier::Low);
    assert_eq!(r.advice, &["Keep maintaining a healthy lifestyle"]);
}

#[test]
fn test_training_rows_round_trip_with_k1() {
    println!("\n=== Test: k=1 Training Rows ===");
    let ds = dataset();
    let p = PredictionPipeline::fit(&ds, 1, RiskSchema::Binary).unwrap();
    for (i, (row, label)) in ds.features().iter().zip(ds.labels()).enumerate() {
        let r = p.predict_risk(row).unwrap();
        assert_eq!(r.label, *label, "row {} predicted wrong label", i);
    }
    println!("✓ all {} rows matched their own label", ds.len());
}

#[test]
fn test_scaler_fit_is_deterministic() {
    let a = pipeline(5);
    let b = pipeline(5);
    assert_eq!(a.scaler(), b.scaler());
    assert_eq!(a.scaler().data_min()[0], 37.0);
    assert_eq!(a.scaler().data_max()[0], 67.0);
    assert_eq!(a.scaler().data_max()[4], 354.0);
    assert_eq!(a.scaler().data_min()[12], 1.0);
}

#[test]
fn test_transform_is_bit_identical() {
    let p = pipeline(5);
    let a = p.scaler().transform(&KNOWN_CASE);
    let b = p.scaler().transform(&KNOWN_CASE);
    assert!(a.iter().zip(&b).all(|(x, y)| x.to_bits() == y.to_bits()));
}

#[test]
fn test_any_finite_input_maps_to_a_tier() {
    println!("\n=== Test: Arbitrary Inputs ===");
    let p = pipeline(5);

    // deterministic LCG sweep, including values far outside the training range
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 11) as f64 / (1u64 << 53) as f64) * 800.0 - 200.0
    };
    for _ in 0..500 {
        let mut x = [0.0; N_FEATURES];
        for v in x.iter_mut() {
            *v = next();
        }
        let r = p.predict_risk(&x).expect("finite input must not fail");
        assert!(r.label <= 1);
    }
    println!("✓ 500 random records all mapped");
}

#[test]
fn test_invalid_submissions_do_not_poison_pipeline() {
    let p = pipeline(5);
    let mut bad = KNOWN_CASE;
    bad[0] = f64::NAN;
    assert!(matches!(
        p.predict_risk(&bad),
        Err(PipelineError::InputValidation { .. })
    ));
    assert!(p.predict_risk(&KNOWN_CASE[..12]).is_err());
    assert_eq!(p.predict_risk(&KNOWN_CASE).unwrap().label, 1);
}

#[test]
fn test_four_tier_schema_on_binary_data() {
    let p = PredictionPipeline::fit(&dataset(), 5, RiskSchema::FourTier).unwrap();
    let r = p.predict_risk(&KNOWN_CASE).unwrap();
    assert_eq!(r.tier, RiskTier::Moderate);
    assert_eq!(r.advice, &["Consider making small lifestyle changes."]);
}

#[test]
fn test_concurrent_readers_agree() {
    let p = Arc::new(pipeline(5));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let p = Arc::clone(&p);
            thread::spawn(move || p.predict_risk(&KNOWN_CASE).unwrap().label)
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 1);
    }
}

#[test]
fn test_malformed_file_is_data_access_error() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "{},output", FEATURES.join(",")).unwrap();
    writeln!(f, "63,1,3,145,233,1,0,150,0,2.3,0,0").unwrap();
    match TrainingDataset::load(f.path(), "output") {
        Err(PipelineError::DataAccess(msg)) => println!("✓ rejected: {}", msg),
        other => panic!("expected DataAccess, got {:?}", other.map(|d| d.len())),
    }
}

#[test]
fn test_constant_column_in_file_fails_fit() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "{},output", FEATURES.join(",")).unwrap();
    writeln!(f, "63,1,3,145,233,1,0,150,0,2.3,0,0,1,1").unwrap();
    writeln!(f, "67,1,0,160,286,0,1,108,1,1.5,1,3,2,0").unwrap();
    let ds = TrainingDataset::load(f.path(), "output").unwrap();
    // sex is 1 in both rows
    let err = PredictionPipeline::fit(&ds, 1, RiskSchema::Binary).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(ref m) if m.contains("sex")), "{}", err);
}
