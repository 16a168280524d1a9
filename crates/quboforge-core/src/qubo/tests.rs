use super::*;

#[test]
fn test_build_sums_duplicates() {
    let qubo = Qubo::build(
        3,
        [(0, 0, 1.0), (0, 0, -3.0), (0, 1, 1.0), (1, 0, 2.0), (0, 1, 0.5)],
    )
    .unwrap();
    assert_eq!(qubo.linear(0), -2.0);
    assert_eq!(qubo.quadratic(0, 1), 3.5);
    assert_eq!(qubo.quadratic(1, 0), 3.5);
    assert_eq!(qubo.num_couplers(), 1);
}

#[test]
fn test_build_rejects_out_of_range() {
    let err = Qubo::build(2, [(0, 2, 1.0)]).unwrap_err();
    assert!(matches!(err, QuboError::MalformedProblem(_)));
}

#[test]
fn test_build_rejects_non_finite() {
    let err = Qubo::build(2, [(0, 1, f64::NAN)]).unwrap_err();
    assert!(matches!(err, QuboError::MalformedProblem(_)));
    let err = Qubo::build(1, [(0, 0, f64::INFINITY)]).unwrap_err();
    assert!(matches!(err, QuboError::MalformedProblem(_)));
}

#[test]
fn test_cancelling_couplers_are_dropped() {
    let qubo = Qubo::build(2, [(0, 1, 1.0), (1, 0, -1.0)]).unwrap();
    assert_eq!(qubo.num_couplers(), 0);
    assert_eq!(qubo.degree(0), 0);
}

#[test]
fn test_adjacency_sorted() {
    let qubo = Qubo::build(4, [(2, 3, 1.0), (0, 2, 2.0), (2, 1, 3.0)]).unwrap();
    let row: Vec<usize> = qubo.neighbors(2).iter().map(|n| n.index).collect();
    assert_eq!(row, vec![0, 1, 3]);
    assert_eq!(qubo.degree(2), 3);
    assert_eq!(qubo.degree(0), 1);
    assert_eq!(qubo.quadratic(3, 2), 1.0);
    assert_eq!(qubo.quadratic(0, 3), 0.0);
}

#[test]
fn test_builder() {
    let qubo = Qubo::builder(2)
        .with_linear(0, -1.0)
        .with_quadratic(0, 1, 2.0)
        .build()
        .unwrap();
    assert_eq!(qubo.linear(0), -1.0);
    assert_eq!(qubo.quadratic(0, 1), 2.0);
}

#[test]
fn test_terms_order() {
    let qubo = Qubo::build(3, [(1, 2, 4.0), (2, 2, 1.0), (0, 0, -1.0)]).unwrap();
    let terms: Vec<_> = qubo.terms().collect();
    assert_eq!(terms, vec![(0, 0, -1.0), (2, 2, 1.0), (1, 2, 4.0)]);
}

#[test]
fn test_negated() {
    let qubo = Qubo::build(2, [(0, 0, -1.0), (0, 1, 2.0)]).unwrap();
    let neg = qubo.negated();
    assert_eq!(neg.linear(0), 1.0);
    assert_eq!(neg.quadratic(1, 0), -2.0);
    assert_eq!(neg.energy(&[true, true]), -qubo.energy(&[true, true]));
}

#[test]
fn test_subproblem_folds_background() {
    // path 0 - 1 - 2 - 3
    let qubo = Qubo::build(
        4,
        [
            (0, 0, 1.0),
            (1, 1, -1.0),
            (2, 2, -2.0),
            (3, 3, 0.5),
            (0, 1, -3.0),
            (1, 2, 2.0),
            (2, 3, -4.0),
        ],
    )
    .unwrap();
    let state = [true, false, true, true];
    let sub = qubo.extract_subproblem(&[1, 2], &state).unwrap();

    assert_eq!(sub.variables(), &[1, 2]);
    // 1 sees fixed neighbor 0 (set), 2 sees fixed neighbor 3 (set)
    assert_eq!(sub.qubo().linear(0), -1.0 - 3.0);
    assert_eq!(sub.qubo().linear(1), -2.0 - 4.0);
    assert_eq!(sub.qubo().quadratic(0, 1), 2.0);

    for local in [[false, false], [true, false], [false, true], [true, true]] {
        let mut full = state;
        sub.splice(&local, &mut full);
        let expected = qubo.energy(&full);
        assert!((sub.qubo().energy(&local) + sub.offset() - expected).abs() < 1e-12);
    }
}

#[test]
fn test_subproblem_local_state() {
    let qubo = Qubo::build(3, [(0, 1, 1.0)]).unwrap();
    let sub = qubo.extract_subproblem(&[2, 0], &[true, false, false]).unwrap();
    assert_eq!(sub.local_state(&[true, false, false]), vec![false, true]);
    assert_eq!(sub.len(), 2);
}

#[test]
fn test_subproblem_rejects_bad_subset() {
    let qubo = Qubo::build(3, [(0, 1, 1.0)]).unwrap();
    let state = [false; 3];
    assert!(qubo.extract_subproblem(&[0, 3], &state).is_err());
    assert!(qubo.extract_subproblem(&[1, 1], &state).is_err());
    assert!(qubo.extract_subproblem(&[0], &[false; 2]).is_err());
}
