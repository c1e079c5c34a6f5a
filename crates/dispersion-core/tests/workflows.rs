use dispersion::core::field::energy;
use dispersion::core::io::columns::{ColumnFile, ColumnOutput};
use dispersion::core::io::traits::{PointSetLoader, ResultConsumer};
use dispersion::core::models::point::Point;
use dispersion::core::models::solution::Termination;
use dispersion::engine::config::{OptimizationConfigBuilder, SearchConfigBuilder};
use dispersion::engine::error::EngineError;
use dispersion::engine::progress::{Progress, ProgressReporter};
use dispersion::workflows::{multistart, optimize};
use std::fs;
use std::sync::Mutex;

fn reference_given() -> Vec<Point> {
    vec![
        Point::new(5.42641287, -9.58496101),
        Point::new(2.6729647, 4.97607765),
        Point::new(-0.02985975, -5.50406709),
        Point::new(-6.0387427, 5.21061424),
        Point::new(-6.61778327, -8.23320372),
    ]
}

fn f64_approx_equal(a: f64, b: f64, relative: f64) -> bool {
    (a - b).abs() <= relative * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn single_point_energy_matches_closed_form() {
    let e = energy::total_energy(&[Point::ORIGIN], &[Point::new(1.0, 1.0)]);
    assert!(f64_approx_equal(e, 1.227166, 1e-6), "got {}", e);
}

#[test]
fn optimize_is_independent_of_inner_parallelism() {
    let given = reference_given();
    let initial = vec![
        Point::new(3.70719637, 9.06786692),
        Point::new(-9.92103467, 0.24384527),
        Point::new(6.25241923, 2.25052134),
        Point::new(4.43510635, -4.16247864),
    ];

    let reference = optimize::optimize(&given, &initial, 1).unwrap();
    for inner in [2, 8] {
        let solution = optimize::optimize(&given, &initial, inner).unwrap();
        assert_eq!(solution.iterations, reference.iterations);
        assert_eq!(solution.termination, reference.termination);
        assert!(f64_approx_equal(solution.value, reference.value, 1e-9));
    }
    assert!(reference.iterations <= 500);
    assert!(reference.value < energy::total_energy(&given, &initial));
}

#[test]
fn explicit_configuration_bounds_the_run() {
    let config = OptimizationConfigBuilder::new()
        .tolerance(1e-9)
        .initial_step(0.05)
        .max_iterations(3)
        .build()
        .unwrap();
    let solution =
        optimize::optimize_with(&reference_given(), &[Point::new(8.0, 8.0)], 2, &config).unwrap();
    assert_eq!(solution.iterations, 3);
    assert_eq!(solution.termination, Termination::MaxIterations);
}

#[test]
fn multi_start_with_no_candidates_is_none() {
    let result = multistart::run_multi_start(&reference_given(), &[], 4, 2).unwrap();
    assert!(result.is_none());
}

#[test]
fn multi_start_rejects_zero_parallelism() {
    let candidates = vec![vec![Point::new(1.0, 1.0)]];
    let result = multistart::run_multi_start(&reference_given(), &candidates, 0, 0);
    assert!(matches!(result, Err(EngineError::InvalidInput(_))));
}

#[test]
fn search_from_column_files_writes_the_best_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let x_in = dir.path().join("x.txt");
    let y_in = dir.path().join("y.txt");
    fs::write(&x_in, "5.42641287\n2.6729647\n-0.02985975\n").unwrap();
    fs::write(&y_in, "-9.58496101\n4.97607765\n-5.50406709\n").unwrap();

    let given = ColumnFile::read_from_paths(&x_in, &y_in).unwrap();
    assert_eq!(given.len(), 3);

    let config = SearchConfigBuilder::new()
        .restarts(8)
        .movable_points(4)
        .seed(11)
        .outer_threads(4)
        .inner_threads(2)
        .build()
        .unwrap();

    let increments = Mutex::new(0u64);
    let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
        if event == Progress::TaskIncrement {
            *increments.lock().unwrap() += 1;
        }
    }));
    let best = multistart::run_search(&given, &config, &reporter)
        .unwrap()
        .unwrap();
    drop(reporter);
    assert_eq!(increments.into_inner().unwrap(), 8);
    assert!(best.is_finite());

    let mut output = ColumnOutput::new(dir.path().join("xx.txt"), dir.path().join("yy.txt"));
    output.consume(&best).unwrap();
    let written = ColumnFile::read_from_paths(&output.x_path, &output.y_path).unwrap();
    assert_eq!(written, best.points);
    assert!(f64_approx_equal(
        energy::total_energy(&given, &written),
        best.value,
        1e-12
    ));
}
