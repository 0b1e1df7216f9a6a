//! Fuzzy truth values and membership functions
//!
//! Shapes form a closed set: triangular, trapezoidal and gaussian. Every
//! shape is validated when its [`MembershipFunction`] is built, so the
//! evaluator can rely on ordered breakpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::universe::{Points, Universe};
use crate::error::{AdvisorError, AdvisorResult};

/// A fuzzy truth value in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct FuzzyValue(f64);

impl FuzzyValue {
    pub const ZERO: FuzzyValue = FuzzyValue(0.0);
    pub const ONE: FuzzyValue = FuzzyValue(1.0);

    /// Clamp `value` into [0, 1]; NaN maps to 0
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Fuzzy NOT (complement)
    pub fn not(&self) -> Self {
        Self::new(1.0 - self.0)
    }

    /// Fuzzy AND (t-norm) - minimum
    pub fn and(&self, other: &Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Fuzzy OR (t-conorm) - maximum
    pub fn or(&self, other: &Self) -> Self {
        Self(self.0.max(other.0))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl From<f64> for FuzzyValue {
    fn from(v: f64) -> Self {
        Self::new(v)
    }
}

impl From<FuzzyValue> for f64 {
    fn from(v: FuzzyValue) -> Self {
        v.0
    }
}

impl fmt::Display for FuzzyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*}", p, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Membership shape and its parameters
///
/// Serialized as `{ triangular = [a, b, c] }` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ShapeParams", into = "ShapeParams")]
pub enum Shape {
    /// Triangular: (left, peak, right)
    Triangular(f64, f64, f64),
    /// Trapezoidal: (left, left_top, right_top, right)
    Trapezoidal(f64, f64, f64, f64),
    /// Gaussian: (mean, sigma)
    Gaussian(f64, f64),
}

// TOML has no tuple variants; newtype variants over arrays serialize everywhere.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ShapeParams {
    Triangular([f64; 3]),
    Trapezoidal([f64; 4]),
    Gaussian([f64; 2]),
}

impl From<ShapeParams> for Shape {
    fn from(params: ShapeParams) -> Self {
        match params {
            ShapeParams::Triangular([a, b, c]) => Shape::Triangular(a, b, c),
            ShapeParams::Trapezoidal([a, b, c, d]) => Shape::Trapezoidal(a, b, c, d),
            ShapeParams::Gaussian([mean, sigma]) => Shape::Gaussian(mean, sigma),
        }
    }
}

impl From<Shape> for ShapeParams {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Triangular(a, b, c) => ShapeParams::Triangular([a, b, c]),
            Shape::Trapezoidal(a, b, c, d) => ShapeParams::Trapezoidal([a, b, c, d]),
            Shape::Gaussian(mean, sigma) => ShapeParams::Gaussian([mean, sigma]),
        }
    }
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Triangular(..) => "triangular",
            Shape::Trapezoidal(..) => "trapezoidal",
            Shape::Gaussian(..) => "gaussian",
        }
    }

    /// Check parameter ordering; `label` only feeds the error message
    fn validate(&self, label: &str) -> AdvisorResult<()> {
        let params: Vec<f64> = match *self {
            Shape::Triangular(a, b, c) => vec![a, b, c],
            Shape::Trapezoidal(a, b, c, d) => vec![a, b, c, d],
            Shape::Gaussian(mean, sigma) => vec![mean, sigma],
        };
        if params.iter().any(|p| !p.is_finite()) {
            return Err(AdvisorError::invalid_shape(
                label,
                format!("{} parameters of '{}' must be finite: {:?}", self.kind(), label, params),
            ));
        }

        match *self {
            Shape::Gaussian(_, sigma) if sigma <= 0.0 => Err(AdvisorError::invalid_shape(
                label,
                format!("gaussian sigma of '{}' must be positive, got {}", label, sigma),
            )),
            Shape::Gaussian(..) => Ok(()),
            _ if params.windows(2).any(|w| w[0] > w[1]) => Err(AdvisorError::invalid_shape(
                label,
                format!(
                    "{} breakpoints of '{}' must be non-decreasing, got {:?}",
                    self.kind(),
                    label,
                    params
                ),
            )
            .with_hint("Order the parameters left to right")),
            _ => Ok(()),
        }
    }

    /// Raw degree of `x`; callers clamp through [`FuzzyValue`]
    fn eval(&self, x: f64) -> f64 {
        match *self {
            Shape::Triangular(a, b, c) => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            Shape::Trapezoidal(a, b, c, d) => {
                if x < a || x > d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
            Shape::Gaussian(mean, sigma) => (-((x - mean).powi(2)) / (2.0 * sigma.powi(2))).exp(),
        }
    }

    /// Interval where membership is 1
    pub fn core(&self) -> (f64, f64) {
        match *self {
            Shape::Triangular(_, b, _) => (b, b),
            Shape::Trapezoidal(_, b, c, _) => (b, c),
            Shape::Gaussian(mean, _) => (mean, mean),
        }
    }

    /// Interval where membership is positive; `None` for unbounded shapes
    pub fn support(&self) -> Option<(f64, f64)> {
        match *self {
            Shape::Triangular(a, _, c) => Some((a, c)),
            Shape::Trapezoidal(a, _, _, d) => Some((a, d)),
            Shape::Gaussian(..) => None,
        }
    }
}

/// A labelled fuzzy set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMembership")]
pub struct MembershipFunction {
    label: String,
    shape: Shape,
}

#[derive(Deserialize)]
struct RawMembership {
    label: String,
    shape: Shape,
}

impl TryFrom<RawMembership> for MembershipFunction {
    type Error = AdvisorError;

    fn try_from(raw: RawMembership) -> Result<Self, Self::Error> {
        MembershipFunction::new(raw.label, raw.shape)
    }
}

impl MembershipFunction {
    pub fn new(label: impl Into<String>, shape: Shape) -> AdvisorResult<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(AdvisorError::invalid_shape(&label, "Membership label must not be empty"));
        }
        shape.validate(&label)?;
        Ok(Self { label, shape })
    }

    pub fn triangular(label: impl Into<String>, a: f64, b: f64, c: f64) -> AdvisorResult<Self> {
        Self::new(label, Shape::Triangular(a, b, c))
    }

    pub fn trapezoidal(
        label: impl Into<String>,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
    ) -> AdvisorResult<Self> {
        Self::new(label, Shape::Trapezoidal(a, b, c, d))
    }

    pub fn gaussian(label: impl Into<String>, mean: f64, sigma: f64) -> AdvisorResult<Self> {
        Self::new(label, Shape::Gaussian(mean, sigma))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Membership degree of any real `x`, on or off the grid
    pub fn degree(&self, x: f64) -> FuzzyValue {
        FuzzyValue::new(self.shape.eval(x))
    }

    /// Sampled `(x, degree)` curve over `universe`
    pub fn grid(&self, universe: &Universe) -> Grid<'_> {
        Grid {
            membership: self,
            points: universe.points(),
        }
    }

    /// Degree capped at `activation` (Mamdani min implication)
    pub fn clipped(&self, x: f64, activation: FuzzyValue) -> FuzzyValue {
        self.degree(x).and(&activation)
    }
}

/// Lazy `(x, degree)` sequence over a universe; clone it to restart
#[derive(Debug, Clone)]
pub struct Grid<'a> {
    membership: &'a MembershipFunction,
    points: Points,
}

impl Iterator for Grid<'_> {
    type Item = (f64, FuzzyValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.points.next().map(|x| (x, self.membership.degree(x)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.points.size_hint()
    }
}

impl ExactSizeIterator for Grid<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_value_serde_clamps() {
        let high: FuzzyValue = serde_json::from_str("1.7").unwrap();
        assert_eq!(high, FuzzyValue::ONE);
        let low: FuzzyValue = serde_json::from_str("-3").unwrap();
        assert_eq!(low, FuzzyValue::ZERO);
        assert_eq!(serde_json::to_string(&FuzzyValue::new(0.25)).unwrap(), "0.25");
    }
    use crate::error::ErrorCode;
    use proptest::prelude::*;

    #[test]
    fn test_fuzzy_value_operations() {
        let a = FuzzyValue::new(0.6);
        let b = FuzzyValue::new(0.4);

        assert!((a.and(&b).value() - 0.4).abs() < 0.001);
        assert!((a.or(&b).value() - 0.6).abs() < 0.001);
        assert!((a.not().value() - 0.4).abs() < 0.001);
        assert_eq!(FuzzyValue::new(1.7), FuzzyValue::ONE);
        assert_eq!(FuzzyValue::new(-0.2), FuzzyValue::ZERO);
        assert_eq!(FuzzyValue::new(f64::NAN), FuzzyValue::ZERO);
    }

    #[test]
    fn test_triangular_membership() {
        let mf = MembershipFunction::triangular("warm", 0.0, 5.0, 10.0).unwrap();

        assert!((mf.degree(0.0).value() - 0.0).abs() < 0.001);
        assert!((mf.degree(5.0).value() - 1.0).abs() < 0.001);
        assert!((mf.degree(10.0).value() - 0.0).abs() < 0.001);
        assert!((mf.degree(2.5).value() - 0.5).abs() < 0.001);
        assert!((mf.degree(7.5).value() - 0.5).abs() < 0.001);
        assert_eq!(mf.degree(-1.0), FuzzyValue::ZERO);
        assert_eq!(mf.degree(11.0), FuzzyValue::ZERO);
    }

    #[test]
    fn test_degenerate_left_edge_is_step() {
        let low = MembershipFunction::triangular("low", 3000.0, 3000.0, 4000.0).unwrap();
        assert_eq!(low.degree(3000.0), FuzzyValue::ONE);
        assert_eq!(low.degree(2999.0), FuzzyValue::ZERO);
        assert!((low.degree(3500.0).value() - 0.5).abs() < 1e-12);
        assert_eq!(low.degree(4000.0), FuzzyValue::ZERO);
    }

    #[test]
    fn test_degenerate_right_edge_is_step() {
        let high = MembershipFunction::triangular("high", 4000.0, 5000.0, 5000.0).unwrap();
        assert_eq!(high.degree(5000.0), FuzzyValue::ONE);
        assert_eq!(high.degree(5001.0), FuzzyValue::ZERO);
        assert!((high.degree(4500.0).value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_singleton_triangle() {
        let spike = MembershipFunction::triangular("spike", 2.0, 2.0, 2.0).unwrap();
        assert_eq!(spike.degree(2.0), FuzzyValue::ONE);
        assert_eq!(spike.degree(2.1), FuzzyValue::ZERO);
    }

    #[test]
    fn test_trapezoidal_membership() {
        let mf = MembershipFunction::trapezoidal("mid", 0.0, 2.0, 4.0, 8.0).unwrap();
        assert_eq!(mf.degree(3.0), FuzzyValue::ONE);
        assert!((mf.degree(1.0).value() - 0.5).abs() < 1e-12);
        assert!((mf.degree(6.0).value() - 0.5).abs() < 1e-12);
        assert_eq!(mf.degree(9.0), FuzzyValue::ZERO);
        assert_eq!(mf.shape().core(), (2.0, 4.0));
        assert_eq!(mf.shape().support(), Some((0.0, 8.0)));
    }

    #[test]
    fn test_gaussian_membership() {
        let mf = MembershipFunction::gaussian("near", 5.0, 1.0).unwrap();

        assert!((mf.degree(5.0).value() - 1.0).abs() < 0.001);
        assert!(mf.degree(6.0).value() < 1.0);
        assert!(mf.degree(6.0).value() > 0.5);
        assert_eq!(mf.shape().support(), None);
    }

    #[test]
    fn test_malformed_shapes_rejected() {
        let err = MembershipFunction::triangular("bad", 5.0, 1.0, 10.0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidShape);
        assert_eq!(err.context_field("label"), Some("bad"));

        let err = MembershipFunction::triangular("bad", 0.0, 5.0, 4.0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidShape);

        let err = MembershipFunction::trapezoidal("bad", 0.0, 3.0, 2.0, 4.0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidShape);

        let err = MembershipFunction::gaussian("bad", 0.0, 0.0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidShape);

        let err = MembershipFunction::triangular("bad", f64::NAN, 0.0, 1.0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidShape);

        let err = MembershipFunction::triangular("  ", 0.0, 0.5, 1.0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidShape);
    }

    #[test]
    fn test_grid_follows_universe() {
        let universe = Universe::integer(0, 10).unwrap();
        let mf = MembershipFunction::triangular("mid", 0.0, 5.0, 10.0).unwrap();
        let grid = mf.grid(&universe);
        assert_eq!(grid.len(), 11);

        let points: Vec<(f64, FuzzyValue)> = grid.clone().collect();
        assert_eq!(points[5], (5.0, FuzzyValue::ONE));
        assert_eq!(points.len(), grid.count());
    }

    #[test]
    fn test_clipped() {
        let mf = MembershipFunction::triangular("buy", 50.0, 100.0, 100.0).unwrap();
        let cap = FuzzyValue::new(0.5);
        assert_eq!(mf.clipped(100.0, cap), cap);
        assert!((mf.clipped(60.0, cap).value() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_shape_deserialize_rejects_disorder() {
        let ok: MembershipFunction =
            serde_json::from_str(r#"{"label":"hold","shape":{"triangular":[25,50,75]}}"#).unwrap();
        assert_eq!(ok.label(), "hold");

        let bad: Result<MembershipFunction, _> =
            serde_json::from_str(r#"{"label":"hold","shape":{"triangular":[75,50,25]}}"#);
        assert!(bad.is_err());
    }

    fn ordered_triple() -> impl Strategy<Value = (f64, f64, f64)> {
        (-1000.0f64..1000.0, 0.0f64..500.0, 0.0f64..500.0).prop_map(|(a, d1, d2)| (a, a + d1, a + d1 + d2))
    }

    proptest! {
        #[test]
        fn prop_degree_in_unit_interval((a, b, c) in ordered_triple(), x in -3000.0f64..3000.0) {
            let mf = MembershipFunction::triangular("t", a, b, c).unwrap();
            let d = mf.degree(x).value();
            prop_assert!((0.0..=1.0).contains(&d));
        }

        #[test]
        fn prop_triangle_anchor_points((a, b, c) in ordered_triple()) {
            prop_assume!(a < b && b < c);
            let mf = MembershipFunction::triangular("t", a, b, c).unwrap();
            prop_assert_eq!(mf.degree(a), FuzzyValue::ZERO);
            prop_assert_eq!(mf.degree(b), FuzzyValue::ONE);
            prop_assert_eq!(mf.degree(c), FuzzyValue::ZERO);
        }

        #[test]
        fn prop_triangle_monotone_edges((a, b, c) in ordered_triple(), t1 in 0.0f64..1.0, t2 in 0.0f64..1.0) {
            let mf = MembershipFunction::triangular("t", a, b, c).unwrap();
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

            let rise_lo = (a + lo * (b - a)).min(b);
            let rise_hi = (a + hi * (b - a)).min(b);
            prop_assert!(mf.degree(rise_lo).value() <= mf.degree(rise_hi).value() + 1e-12);

            let fall_lo = (b + lo * (c - b)).clamp(b, c);
            let fall_hi = (b + hi * (c - b)).clamp(b, c);
            prop_assert!(mf.degree(fall_lo).value() + 1e-12 >= mf.degree(fall_hi).value());
        }
    }
}
