//! Discretized universe of discourse

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, AdvisorResult};

/// Evenly spaced sampling grid over the closed interval `[min, max]`
///
/// The grid holds `floor((max - min) / step) + 1` points; the last point is
/// `max` only when the step divides the interval exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UniverseSpec", into = "UniverseSpec")]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
    len: usize,
}

/// Raw `{min, max, step}` triple as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniverseSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Universe {
    /// Upper bound on the number of sample points
    pub const MAX_POINTS: usize = 10_000_000;

    /// Build a universe, rejecting non-finite bounds, `min >= max` and `step <= 0`
    pub fn new(min: f64, max: f64, step: f64) -> AdvisorResult<Self> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(AdvisorError::invalid_universe(format!(
                "Universe bounds must be finite (min = {}, max = {}, step = {})",
                min, max, step
            )));
        }
        if min >= max {
            return Err(AdvisorError::invalid_universe(format!(
                "Universe min ({}) must be below max ({})",
                min, max
            )));
        }
        if step <= 0.0 {
            return Err(AdvisorError::invalid_universe(format!(
                "Universe step must be positive, got {}",
                step
            ))
            .with_hint("Use step = 1 for integer-valued readings"));
        }

        // Absorbs representation error for steps like 0.1
        let intervals = ((max - min) / step + 1e-9).floor();
        if !intervals.is_finite() || intervals >= Self::MAX_POINTS as f64 {
            return Err(AdvisorError::invalid_universe(format!(
                "Universe [{}, {}] with step {} exceeds {} sample points",
                min,
                max,
                step,
                Self::MAX_POINTS
            ))
            .with_hint("Use a coarser step or a narrower range"));
        }
        let len = intervals as usize + 1;

        Ok(Self { min, max, step, len })
    }

    /// Unit-step universe over `[min, max]`
    pub fn integer(min: i64, max: i64) -> AdvisorResult<Self> {
        Self::new(min as f64, max as f64, 1.0)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of sample points
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The `i`-th sample point, if in range
    pub fn point(&self, i: usize) -> Option<f64> {
        (i < self.len).then(|| self.min + i as f64 * self.step)
    }

    /// Whether `x` lies inside the closed interval
    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Iterate the sample points from low to high
    pub fn points(&self) -> Points {
        Points {
            universe: *self,
            front: 0,
            back: self.len,
        }
    }

    pub fn spec(&self) -> UniverseSpec {
        UniverseSpec {
            min: self.min,
            max: self.max,
            step: self.step,
        }
    }
}

impl TryFrom<UniverseSpec> for Universe {
    type Error = AdvisorError;

    fn try_from(spec: UniverseSpec) -> Result<Self, Self::Error> {
        Universe::new(spec.min, spec.max, spec.step)
    }
}

impl From<Universe> for UniverseSpec {
    fn from(universe: Universe) -> Self {
        universe.spec()
    }
}

/// Restartable iterator over a universe's sample points
#[derive(Debug, Clone)]
pub struct Points {
    universe: Universe,
    front: usize,
    back: usize,
}

impl Iterator for Points {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.front >= self.back {
            return None;
        }
        let x = self.universe.min + self.front as f64 * self.universe.step;
        self.front += 1;
        Some(x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for Points {
    fn next_back(&mut self) -> Option<f64> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.universe.min + self.back as f64 * self.universe.step)
    }
}

impl ExactSizeIterator for Points {}
