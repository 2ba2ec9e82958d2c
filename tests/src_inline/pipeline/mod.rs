use super::*;
use crate::model::options::ThresholdPolicy;
use crate::pipeline::stage4_scores::ScoringWarning;

fn markers(classes: &[&str], rows: &[(&str, &[f64])]) -> MarkerTable {
    let mut table = MarkerTable::new(classes.iter().map(|s| s.to_string()).collect());
    for (gene, weights) in rows {
        table.push_gene(gene.to_string(), weights.to_vec());
    }
    table
}

fn expression(samples: &[&str], rows: &[(&str, &[f64])]) -> ExpressionTable {
    let mut table = ExpressionTable::new(samples.iter().map(|s| s.to_string()).collect());
    for (gene, values) in rows {
        table.push_gene(gene.to_string(), values.to_vec());
    }
    table
}

fn documented_markers() -> MarkerTable {
    markers(
        &["ClassA", "ClassB", "ClassC"],
        &[
            ("GenA", &[1.0, 0.0, 0.0]),
            ("GenB", &[1.0, 0.0, 0.0]),
            ("GenC", &[0.0, 1.0, 0.0]),
            ("GenD", &[0.0, 1.0, 0.0]),
            ("GenE", &[0.0, 0.0, 1.0]),
        ],
    )
}

fn documented_expression() -> ExpressionTable {
    expression(
        &["Sample1", "Sample2", "Sample3"],
        &[
            ("GenA", &[100.0, 10.0, 0.0]),
            ("GenB", &[120.0, 0.0, 6.0]),
            ("GenC", &[2.0, 230.0, 2.0]),
            ("GenD", &[3.0, 220.0, 8.0]),
            ("GenE", &[0.0, 0.0, 1000.0]),
        ],
    )
}

#[test]
fn test_documented_example_gives_identity() {
    let options = ScoringOptions {
        min_expression: Some(20.0),
        ..ScoringOptions::default()
    };
    let out = score_markers(&documented_markers(), &documented_expression(), &options);

    assert_eq!(out.scores.samples, vec!["Sample1", "Sample2", "Sample3"]);
    assert_eq!(out.scores.classes, vec!["ClassA", "ClassB", "ClassC"]);
    assert_eq!(out.scores.row("Sample1"), Some(&[1.0, 0.0, 0.0][..]));
    assert_eq!(out.scores.row("Sample2"), Some(&[0.0, 1.0, 0.0][..]));
    assert_eq!(out.scores.row("Sample3"), Some(&[0.0, 0.0, 1.0][..]));
    assert!(out.audit.warnings.is_empty());
}

#[test]
fn test_documented_example_with_average_filter() {
    let options = ScoringOptions {
        average_filter: true,
        ..ScoringOptions::default()
    };
    let out = score_markers(&documented_markers(), &documented_expression(), &options);
    // GenB mean 42: only Sample1 reaches it; GenD mean 77: only Sample2
    assert_eq!(out.scores.row("Sample1"), Some(&[1.0, 0.0, 0.0][..]));
    assert_eq!(out.scores.row("Sample2"), Some(&[0.0, 1.0, 0.0][..]));
    assert_eq!(out.scores.row("Sample3"), Some(&[0.0, 0.0, 1.0][..]));
}

#[test]
fn test_cpm_then_threshold() {
    let m = markers(&["ClassA"], &[("GenA", &[1.0]), ("GenB", &[1.0])]);
    let e = expression(
        &["Deep", "Shallow"],
        &[("GenA", &[1000.0, 10.0]), ("GenB", &[9000.0, 90.0]), ("GenX", &[0.0, 0.0])],
    );
    let options = ScoringOptions {
        min_expression: Some(200_000.0),
        cpm_normalization: true,
        ..ScoringOptions::default()
    };
    let out = score_markers(&m, &e, &options);
    // both samples have GenA at 100k CPM and GenB at 900k CPM
    assert_eq!(out.scores.row("Deep"), Some(&[0.5][..]));
    assert_eq!(out.scores.row("Shallow"), Some(&[0.5][..]));
    assert_eq!(out.libsizes, vec![10_000.0, 100.0]);
}

#[test]
fn test_cpm_leaves_input_untouched() {
    let e = documented_expression();
    let before = e.clone();
    let options = ScoringOptions {
        cpm_normalization: true,
        ..ScoringOptions::default()
    };
    let _ = score_markers(&documented_markers(), &e, &options);
    assert_eq!(e, before);
}

#[test]
fn test_scores_stay_in_unit_interval() {
    let m = markers(
        &["A", "B", "C"],
        &[
            ("G1", &[0.3, 2.0, 0.0]),
            ("G2", &[1.7, 0.0, 0.0]),
            ("G3", &[0.1, 0.9, 0.0]),
            ("G4", &[4.0, 0.2, 0.0]),
        ],
    );
    let e = expression(
        &["S1", "S2", "S3", "S4"],
        &[
            ("G1", &[0.0, 5.0, 17.0, 3.0]),
            ("G2", &[12.0, 0.5, 1.0, 3.0]),
            ("G3", &[7.0, 7.0, 0.0, 3.0]),
            ("G4", &[1.0, 40.0, 2.0, 3.0]),
        ],
    );
    for policy in [ThresholdPolicy::Both, ThresholdPolicy::AverageOnly] {
        for average_filter in [false, true] {
            for cpm_normalization in [false, true] {
                for min_expression in [None, Some(0.0), Some(2.5), Some(1e7)] {
                    let options = ScoringOptions {
                        min_expression,
                        average_filter,
                        cpm_normalization,
                        threshold_policy: policy,
                    };
                    let out = score_markers(&m, &e, &options);
                    for &s in out.scores.scores.iter().flatten() {
                        assert!((0.0..=1.0).contains(&s), "{s} out of range for {options:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn test_empty_intersection_end_to_end() {
    let m = markers(&["ClassA"], &[("GenA", &[1.0])]);
    let e = expression(&["S1"], &[("GenB", &[10.0])]);
    let out = score_markers(&m, &e, &ScoringOptions::default());
    assert_eq!(out.scores.row("S1"), Some(&[0.0][..]));
    assert_eq!(out.audit.warnings, vec![ScoringWarning::EmptyIntersection]);
}

#[test]
fn test_deterministic() {
    let options = ScoringOptions {
        min_expression: Some(5.0),
        average_filter: true,
        ..ScoringOptions::default()
    };
    let a = score_markers(&documented_markers(), &documented_expression(), &options);
    let b = score_markers(&documented_markers(), &documented_expression(), &options);
    assert_eq!(a.scores, b.scores);
    assert_eq!(a.audit, b.audit);
}
