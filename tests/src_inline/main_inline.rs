use super::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_markerscore_main_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn parse(args: &[&str]) -> Result<RunConfig, clap::Error> {
    let cli = Cli::try_parse_from(std::iter::once("kira-markerscore").chain(args.iter().copied()))?;
    let Command::Run(run) = cli.command;
    Ok(RunConfig::from(run))
}

#[test]
fn test_parse_args_defaults() {
    let config = parse(&["run", "-i", "expr.tsv", "-g", "markers.tsv", "-o", "out.tsv"]).unwrap();
    assert_eq!(config.input_path, PathBuf::from("expr.tsv"));
    assert_eq!(config.markers_path, PathBuf::from("markers.tsv"));
    assert_eq!(config.delimiter, "\t");
    assert_eq!(config.scoring, ScoringOptions::default());
    assert_eq!(config.summary_path, None);
    assert!(!config.verbose);
}

#[test]
fn test_parse_args_all_flags() {
    let config = parse(&[
        "run",
        "--input",
        "expr.csv",
        "--markers",
        "markers.csv",
        "--out",
        "out.csv",
        "-d",
        ",",
        "-m",
        "20",
        "-a",
        "-n",
        "--threshold-policy",
        "average-only",
        "--summary",
        "summary.json",
        "-v",
    ])
    .unwrap();
    assert_eq!(config.delimiter, ",");
    assert_eq!(
        config.scoring,
        ScoringOptions {
            min_expression: Some(20.0),
            average_filter: true,
            cpm_normalization: true,
            threshold_policy: ThresholdPolicy::AverageOnly,
        }
    );
    assert_eq!(config.summary_path, Some(PathBuf::from("summary.json")));
    assert!(config.verbose);
}

#[test]
fn test_parse_args_rejects_bad_values() {
    assert!(parse(&["run", "-i", "e", "-g", "m", "-o", "o", "-m", "abc"]).is_err());
    assert!(parse(&["run", "-i", "e", "-g", "m", "-o", "o", "-m", "inf"]).is_err());
    assert!(parse(&["run", "-i", "e", "-g", "m", "-o", "o", "-d", ""]).is_err());
    assert!(parse(&["run", "-i", "e", "-g", "m"]).is_err());
    assert!(parse(&["score"]).is_err());
}

#[test]
fn test_run_documented_example() {
    let dir = make_temp_dir();
    let markers = dir.join("markers.tsv");
    let expr = dir.join("expr.tsv");
    let out = dir.join("scores.tsv");
    fs::write(
        &markers,
        "Gene\tClassA\tClassB\tClassC\n\
         GenA\t1\t0\t0\n\
         GenB\t1\t0\t0\n\
         GenC\t0\t1\t0\n\
         GenD\t0\t1\t0\n\
         GenE\t0\t0\t1\n",
    )
    .unwrap();
    fs::write(
        &expr,
        "Gene\tSample1\tSample2\tSample3\n\
         GenA\t100\t10\t0\n\
         GenB\t120\t0\t6\n\
         GenC\t2\t230\t2\n\
         GenD\t3\t220\t8\n\
         GenE\t0\t0\t1000\n",
    )
    .unwrap();

    let config = parse(&[
        "run",
        "-i",
        expr.to_str().unwrap(),
        "-g",
        markers.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "-m",
        "20",
    ])
    .unwrap();
    run(&config).unwrap();

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "Sample\tClassA\tClassB\tClassC\n\
         Sample1\t1.0000\t0.0000\t0.0000\n\
         Sample2\t0.0000\t1.0000\t0.0000\n\
         Sample3\t0.0000\t0.0000\t1.0000\n"
    );
}

#[test]
fn test_run_reports_parse_error() {
    let dir = make_temp_dir();
    let markers = dir.join("markers.tsv");
    let expr = dir.join("expr.tsv");
    fs::write(&markers, "Gene\tClassA\nGenA\t1\n").unwrap();
    fs::write(&expr, "Gene\tS1\tS2\nGenA\t1\n").unwrap();

    let config = RunConfig {
        input_path: expr,
        markers_path: markers,
        out_path: dir.join("out.tsv"),
        summary_path: None,
        delimiter: "\t".to_string(),
        scoring: ScoringOptions::default(),
        verbose: false,
    };
    let err = run(&config).unwrap_err();
    assert!(matches!(err, AppError::Input(InputError::Parse { line: 2, .. })));
    assert!(!Path::new(&config.out_path).exists());
}
