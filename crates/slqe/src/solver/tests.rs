use super::*;
use crate::error::EquationError;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_DEGREE: u32 = 256;

fn poly(expr: &str) -> Polynomial {
    parse_to_polynomial(expr, MAX_DEGREE).unwrap()
}

fn roots(expr: &str, epsilon: f64) -> Roots {
    let cfg = SolverCfg {
        epsilon,
        ..SolverCfg::default()
    };
    parse_and_solve_and_round(expr, &cfg).unwrap()
}

fn finite(v: &[f64]) -> Roots {
    Roots::Finite(v.to_vec())
}

#[test]
fn parse_signs_and_products() {
    assert_eq!(poly("1"), Polynomial::constant(1.0));
    assert_eq!(poly("x"), Polynomial::variable());
    assert_eq!(poly("+x"), Polynomial::variable());
    assert_eq!(poly("--x"), Polynomial::variable());
    assert_eq!(poly("-+x"), Polynomial::from_terms([(1, -1.0)]));
    assert_eq!(poly("(-x)^2"), Polynomial::from_terms([(2, 1.0)]));
    assert_eq!(poly("-x^2"), Polynomial::from_terms([(2, -1.0)]));
    assert_eq!(poly("-x^2+3*2"), Polynomial::from_terms([(2, -1.0), (0, 6.0)]));
    assert_eq!(poly("x-x"), Polynomial::zero());
    assert_eq!(poly("x*-x"), Polynomial::from_terms([(2, -1.0)]));
    assert_eq!(poly("-x*-x"), Polynomial::from_terms([(2, 1.0)]));
    assert_eq!(poly("3*20*x"), Polynomial::from_terms([(1, 60.0)]));
    assert_eq!(poly("x^3/3-x"), Polynomial::from_terms([(3, 1.0 / 3.0), (1, -1.0)]));
}

#[test]
fn parse_nested_expressions() {
    assert_eq!(poly("3+4*5^2"), Polynomial::constant(103.0));
    assert_eq!(poly("1+2^2^3"), Polynomial::constant(257.0));
    assert_eq!(poly("10-2*(x+1)"), poly("8-2*x"));
    assert_eq!(poly("10-3*(x+1)^2"), poly("7-3*x^2-6*x"));
    assert_eq!(poly("(x+1)^3"), poly("x^3+3*x^2+3*x+1"));
    assert_eq!(poly("(-x+1)^2"), poly("x^2-2*x+1"));
    assert_eq!(poly("-(x+1)*2+4"), poly("2-2*x"));
    assert_eq!(poly("(x+2*(x+1))^2+1"), poly("9*x^2+12*x+5"));
    assert_eq!(poly("(x+2)^5"), poly("x^5+10*x^4+40*x^3+80*x^2+80*x+32"));
}

#[test]
fn coefficients_derivative_and_eval() {
    assert_eq!(poly("x^2-2*x").full_coefficients(), vec![1.0, -2.0, 0.0]);
    assert_eq!(poly("0").full_coefficients(), vec![0.0]);
    assert_eq!(poly("2*x^2+3*x+1").derivative(), poly("4*x+3"));
    assert_eq!(poly("10").derivative(), Polynomial::zero());
    assert_eq!(poly("2.5*x+10").eval(10.0), 35.0);
    assert_eq!(poly("x^2+2*x+1").eval(3.0), 16.0);
    assert_eq!(poly("0").eval(7.0), 0.0);
}

#[test]
fn limits_follow_leading_term() {
    let inf = f64::INFINITY;
    assert_eq!(poly("3*x^4+8*x^3-6*x^2-24*x").eval(-inf), inf);
    assert_eq!(poly("-3*x^4+8*x^3").eval(inf), -inf);
    assert_eq!(poly("3*x^3-6*x^2").eval(-inf), -inf);
    assert_eq!(poly("-3*x^3-24*x").eval(-inf), inf);
    assert_eq!(Polynomial::zero().eval(inf), 0.0);
}

#[test]
fn display_is_descending() {
    assert_eq!(poly("3*x^2-x+0.5").to_string(), "3x^2 - x + 0.5");
    assert_eq!(poly("-x^3+2").to_string(), "-x^3 + 2");
    assert_eq!(Polynomial::zero().to_string(), "0");
}

#[test]
fn evaluation_errors() {
    let err = |e: &str| parse_to_polynomial(e, MAX_DEGREE).unwrap_err();
    assert_eq!(err("x/(x+1)"), EquationError::Evaluation("Denominator must be a number".into()));
    assert_eq!(err("x/(2-2)"), EquationError::Evaluation("Divided by zero".into()));
    assert_eq!(err("2^x"), EquationError::Evaluation("Power must be a number".into()));
    assert_eq!(err("x^-2"), EquationError::Evaluation("Negative power is not supported: -2".into()));
    assert_eq!(
        err("x^0.5"),
        EquationError::Evaluation("Not integer power is not supported: 0.5".into())
    );
    assert_eq!(err("x+"), EquationError::Syntax("Invalid expression".into()));
    assert_eq!(err("2 3"), EquationError::Syntax("Token is not supported:  ".into()));
    assert_eq!(err("y+1"), EquationError::Syntax("Token is not supported: y".into()));
    assert_eq!(err("1.2.3"), EquationError::Syntax("Token is not supported: 1.2.3".into()));
}

#[test]
fn power_respects_degree_cap() {
    assert!(matches!(
        parse_to_polynomial("x^300", MAX_DEGREE),
        Err(EquationError::DepthExceeded { depth: 300, limit: 256 })
    ));
    assert!(matches!(
        parse_to_polynomial("(x^16)^17", MAX_DEGREE),
        Err(EquationError::DepthExceeded { depth: 272, .. })
    ));
    // Constant towers stay constant.
    assert_eq!(poly("2^10^2").degree(), 0);
    assert_eq!(poly("(x+1)^0"), Polynomial::constant(1.0));
}

#[test]
fn bracketing() {
    let cfg = SolverCfg::default();
    assert_eq!(lower_bound(&poly("x^3"), 1.0, &cfg).unwrap(), Some(0.0));
    assert_eq!(lower_bound(&poly("x^2+9"), -2.0, &cfg).unwrap(), None);
    assert_eq!(upper_bound(&poly("x^3"), 1.0, &cfg).unwrap(), None);
    assert_eq!(upper_bound(&poly("x^3"), -10.0, &cfg).unwrap(), Some(5.0));
}

#[test]
fn bisection() {
    let cfg = SolverCfg::default();
    let r = find_root(&poly("x^3/3-x"), 1.0, 10.0, false, &cfg).unwrap();
    assert!((r - 3f64.sqrt()).abs() < 1e-4);
    let r = find_root(&poly("x^2-x-2"), -100.0, 0.0, false, &cfg).unwrap();
    assert_eq!(r, -1.0);
    assert_eq!(find_root(&poly("x^2-x-2"), -100.0, -10.0, false, &cfg), None);
    // A root sitting on the upper end belongs to the next interval unless asked for.
    assert_eq!(find_root(&poly("x-1"), 0.0, 1.0, false, &cfg), None);
    assert_eq!(find_root(&poly("x-1"), 0.0, 1.0, true, &cfg), Some(1.0));
}

#[test]
fn solve_from_given_critical_points() {
    let cfg = SolverCfg::default();
    let r = solve_from_critical_points(&poly("x^2-6*x+1"), &[3.0], &cfg).unwrap();
    assert_eq!(r.len(), 2);
    assert!((r[0] - 0.1716).abs() < 1e-4 && (r[1] - 5.8284).abs() < 1e-4);
    let r = solve_from_critical_points(&poly("x^3+x"), &[], &cfg).unwrap();
    assert_eq!(r, vec![0.0]);
}

#[test]
fn solve_degenerate_degrees() {
    let cfg = SolverCfg {
        epsilon: 1e-4,
        ..SolverCfg::default()
    };
    assert_eq!(solve(&poly("0*x+6"), &cfg).unwrap(), finite(&[]));
    assert_eq!(solve(&poly("0*x+0"), &cfg).unwrap(), Roots::Infinite);
    assert_eq!(solve(&poly("11*x+6"), &cfg).unwrap(), finite(&[-6.0 / 11.0]));
    assert_eq!(solve(&poly("6*x^2+11*x+6"), &cfg).unwrap(), finite(&[]));
    assert_eq!(roots("x^3+6*x^2+11*x+6", 1e-4), finite(&[-3.0, -2.0, -1.0]));
    assert_eq!(roots("(x^2-1)*(x^2-4)", 1e-4), finite(&[-2.0, -1.0, 1.0, 2.0]));
}

#[test]
fn parse_and_solve_and_round_cases() {
    let eps = 1e-5;
    assert_eq!(roots("x^2-1", eps), finite(&[-1.0, 1.0]));
    assert_eq!(roots("x^2-1=0", eps), finite(&[-1.0, 1.0]));
    assert_eq!(roots("x^2-1=8", eps), finite(&[-3.0, 3.0]));
    assert_eq!(roots("x^2-1=-2*x+2", eps), finite(&[-3.0, 1.0]));
    assert_eq!(roots("x^2+2.5*x+1.5", eps), finite(&[-1.5, -1.0]));
    assert_eq!(roots("x^4-4*x^2+20*x-7", eps), finite(&[-3.2788, 0.3775]));
    assert_eq!(roots("0*x-7", eps), finite(&[]));
    assert_eq!(roots("0*x+0", eps), Roots::Infinite);
    assert_eq!(roots("x^5-5*x^3+4=0", eps), finite(&[-2.3077, 1.0, 2.1433]));
    assert_eq!(roots("x^5-6*x^4+4=0", eps), finite(&[-0.8734, 0.9431, 5.9969]));
    assert_eq!(roots("x^3+x=100", eps), finite(&[4.5698]));
    assert_eq!(roots("x+x^9=1000", eps), finite(&[2.1539]));
    assert_eq!(roots("x^4/4-x^2/2", eps), finite(&[-1.4142, 0.0, 1.4142]));
    assert_eq!(roots("(x-1)^2*(x+2)", eps), finite(&[-2.0, 1.0]));
    assert_eq!(roots("2*x^2-3*(x+1)=0", eps), finite(&[-0.6861, 2.1861]));
}

#[test]
fn zero_root_is_positive_zero() {
    match roots("x^3", 1e-5) {
        Roots::Finite(r) => {
            assert_eq!(r, vec![0.0]);
            assert!(r[0].is_sign_positive());
        }
        Roots::Infinite => panic!("x^3 has one root"),
    }
}

#[test]
fn solve_rejects_degree_above_cap() {
    let cfg = SolverCfg {
        max_degree: 4,
        ..SolverCfg::default()
    };
    let p = Polynomial::from_terms([(5, 1.0), (0, -1.0)]);
    assert_eq!(
        solve(&p, &cfg),
        Err(EquationError::DepthExceeded { depth: 5, limit: 4 })
    );
}

#[test]
fn root_on_last_fence_without_right_bracket() {
    let eps = 1e-5;
    // No critical points: the fence at 0 has |p(0)| = 1e-6 and p keeps its sign to the right.
    assert_eq!(roots("x^3+x+0.000001", eps), finite(&[0.0]));
    assert_eq!(roots("x^3+x-0.000001", eps), finite(&[0.0]));
    // Near-double root at the last critical point.
    assert_eq!(roots("x^3-3*x+2.000001", eps), finite(&[-2.0, 1.0]));
    let cfg = SolverCfg::default();
    let r = solve_from_critical_points(&poly("x^3+x+0.000001"), &[], &cfg).unwrap();
    assert_eq!(r, vec![0.0]);
}

#[test]
fn epsilon_outside_unit_interval_is_rejected() {
    for epsilon in [0.0, -1e-5, 1.0, f64::NAN] {
        let cfg = SolverCfg {
            epsilon,
            ..SolverCfg::default()
        };
        assert!(matches!(
            parse_and_solve_and_round("x^2-1", &cfg),
            Err(EquationError::Evaluation(_))
        ));
    }
    assert!(SolverCfg::default().validate().is_ok());
}

#[test]
fn roots_vanish_at_random_quadratics() {
    let mut rng = StdRng::seed_from_u64(42);
    let cfg = SolverCfg::default();
    for _ in 0..50 {
        let (a, b): (f64, f64) = (rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
        // (x - a)(x - b) expanded.
        let p = Polynomial::from_terms([(2, 1.0), (1, -(a + b)), (0, a * b)]);
        let Roots::Finite(r) = solve(&p, &cfg).unwrap() else {
            panic!("quadratic has finitely many roots");
        };
        assert!(!r.is_empty());
        for x in r {
            assert!(p.eval(x).abs() <= cfg.epsilon, "p({x}) = {}", p.eval(x));
        }
    }
}

// ---- properties ----------------------------------------------------------------

#[derive(Clone, Debug)]
enum Expr {
    X,
    Int(i32),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Pow(Box<Expr>, u32),
}

impl Expr {
    fn infix(&self) -> String {
        match self {
            Expr::X => "x".into(),
            Expr::Int(n) => n.to_string(),
            Expr::Add(a, b) => format!("({}+{})", a.infix(), b.infix()),
            Expr::Sub(a, b) => format!("({}-{})", a.infix(), b.infix()),
            Expr::Mul(a, b) => format!("{}*{}", a.infix(), b.infix()),
            Expr::Neg(a) => format!("-{}", a.infix()),
            Expr::Pow(a, n) => format!("({})^{n}", a.infix()),
        }
    }

    fn at(&self, x: f64) -> f64 {
        match self {
            Expr::X => x,
            Expr::Int(n) => f64::from(*n),
            Expr::Add(a, b) => a.at(x) + b.at(x),
            Expr::Sub(a, b) => a.at(x) - b.at(x),
            Expr::Mul(a, b) => a.at(x) * b.at(x),
            Expr::Neg(a) => -a.at(x),
            Expr::Pow(a, n) => a.at(x).powi(*n as i32),
        }
    }

    /// Upper bound on every intermediate magnitude, direct or expanded.
    fn bound(&self, x: f64) -> f64 {
        match self {
            Expr::X => x.abs(),
            Expr::Int(n) => f64::from(*n),
            Expr::Add(a, b) | Expr::Sub(a, b) => a.bound(x) + b.bound(x),
            Expr::Mul(a, b) => a.bound(x) * b.bound(x),
            Expr::Neg(a) => a.bound(x),
            Expr::Pow(a, n) => a.bound(x).powi(*n as i32),
        }
    }
}

fn expr_strategy() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![Just(Expr::X), (0..10i32).prop_map(Expr::Int)];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::Add(a.into(), b.into())),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::Sub(a.into(), b.into())),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::Mul(a.into(), b.into())),
            inner.clone().prop_map(|a| Expr::Neg(a.into())),
            (inner, 0..3u32).prop_map(|(a, n)| Expr::Pow(a.into(), n)),
        ]
    })
}

proptest! {
    #[test]
    fn postfix_evaluation_matches_substitution(e in expr_strategy(), x in -3.0f64..3.0) {
        let p = parse_to_polynomial(&e.infix(), MAX_DEGREE).unwrap();
        let direct = e.at(x);
        let tol = 1e-9 * e.bound(x).max(1.0);
        prop_assert!((p.eval(x) - direct).abs() <= tol, "{} at {x}: {} vs {direct}", e.infix(), p.eval(x));
    }

    #[test]
    fn derivative_roots_split_into_monotone_intervals(
        rs in proptest::collection::btree_set(-6i32..6, 1..4),
        lead in prop_oneof![Just(-2.0f64), Just(1.0), Just(3.0)],
    ) {
        // p' = lead * Π (x - r), p = ∫ p'.
        let derivative = rs
            .iter()
            .fold(Polynomial::constant(lead), |acc, r| {
                acc.multiply(&Polynomial::from_terms([(1, 1.0), (0, -f64::from(*r))]))
            });
        let expected: Vec<f64> = derivative_roots_of(&derivative);
        let p = Polynomial::from_terms(derivative.terms().map(|(d, c)| (d + 1, c / f64::from(d + 1))));
        let Roots::Finite(critical) = solve(&p.derivative(), &SolverCfg::default()).unwrap() else {
            panic!("non-zero derivative");
        };
        prop_assert_eq!(critical.len(), expected.len());
        for (c, r) in critical.iter().zip(&expected) {
            prop_assert!((c - r).abs() < 1e-3);
        }
        let mut fences = vec![critical[0] - 4.0];
        fences.extend(critical.iter().copied());
        fences.push(critical[critical.len() - 1] + 4.0);
        for w in fences.windows(2) {
            let samples: Vec<f64> = (1..8).map(|k| p.eval(w[0] + (w[1] - w[0]) * f64::from(k) / 8.0)).collect();
            let rising = samples.windows(2).all(|s| s[1] >= s[0]);
            let falling = samples.windows(2).all(|s| s[1] <= s[0]);
            prop_assert!(rising || falling);
        }
    }
}

fn derivative_roots_of(p: &Polynomial) -> Vec<f64> {
    // Distinct integer roots by construction: scan the integer grid.
    (-6..6)
        .map(f64::from)
        .filter(|x| p.eval(*x).abs() < 1e-9)
        .collect()
}
