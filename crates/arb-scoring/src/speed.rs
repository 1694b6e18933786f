//! Speed-point formulas
//!
//! Each venue picks one formula through its points type. The formulas only
//! compute the raw award; the caller decides whether the run is eligible.

use crate::calc::RunMeasurements;
use crate::error::ScoringError;
use arb_config::ScoringRule;
use std::collections::HashMap;
use std::fmt::Debug;

/// Pluggable speed-point computation
pub trait SpeedPointsFormula: Send + Sync + Debug {
    /// Speed points for a qualifying run
    fn speed_points(&self, rule: &ScoringRule, run: &RunMeasurements) -> f64;

    /// Formula name (for logging and registry listings)
    fn name(&self) -> &'static str;
}

/// Whole seconds under course time, scaled by the place multiplier
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalSpeed;

impl SpeedPointsFormula for NormalSpeed {
    fn speed_points(&self, rule: &ScoringRule, run: &RunMeasurements) -> f64 {
        if run.elapsed <= 0.0 || run.sct <= 0.0 {
            return 0.0;
        }
        let mut points = (run.sct - run.elapsed).trunc().max(0.0);
        if run.place > 0 {
            if let Some(multiplier) = rule.speed_multipliers.get_or_catch_all(run.place) {
                points = (points * multiplier).trunc();
            }
        }
        points
    }

    fn name(&self) -> &'static str {
        "Normal"
    }
}

/// Ten points down to one across nine 10%-of-course-time bands
///
/// A run at or under course time earns 10 in first place and 9 otherwise;
/// anything beyond the ninth band earns nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepTableSpeed;

impl StepTableSpeed {
    const TOP: f64 = 10.0;
    const BANDS: f64 = 9.0;
}

impl SpeedPointsFormula for StepTableSpeed {
    fn speed_points(&self, _rule: &ScoringRule, run: &RunMeasurements) -> f64 {
        if run.elapsed <= 0.0 || run.sct <= 0.0 {
            return 0.0;
        }
        let over = run.elapsed - run.sct;
        if over <= 0.0 {
            return if run.place == 1 { Self::TOP } else { Self::TOP - 1.0 };
        }
        // Tolerance keeps an exact band edge (e.g. 44s on 40s) in the lower band
        let band = (over * 10.0 / run.sct - 1e-9).ceil();
        if band <= Self::BANDS {
            Self::TOP - band
        } else {
            0.0
        }
    }

    fn name(&self) -> &'static str {
        "T2B"
    }
}

/// Fixed awards by place within three class-size brackets
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassSizeSpeed;

impl ClassSizeSpeed {
    const SMALL: &'static [f64] = &[8.0, 6.0, 4.0];
    const MEDIUM: &'static [f64] = &[10.0, 8.0, 6.0, 4.0, 2.0];
    const LARGE: &'static [f64] = &[12.0, 10.0, 8.0, 6.0, 4.0, 2.0];
    const BASELINE: f64 = 1.0;

    fn table(in_class: u16) -> &'static [f64] {
        match in_class {
            0..=10 => Self::SMALL,
            11..=30 => Self::MEDIUM,
            _ => Self::LARGE,
        }
    }
}

impl SpeedPointsFormula for ClassSizeSpeed {
    fn speed_points(&self, _rule: &ScoringRule, run: &RunMeasurements) -> f64 {
        let table = Self::table(run.in_class);
        usize::from(run.place)
            .checked_sub(1)
            .and_then(|i| table.get(i))
            .copied()
            .unwrap_or(Self::BASELINE)
    }

    fn name(&self) -> &'static str {
        "UKI"
    }
}

/// Speed-point formulas keyed by venue points type
///
/// The empty points type selects the normal formula.
#[derive(Debug, Default)]
pub struct FormulaRegistry {
    formulas: HashMap<String, Box<dyn SpeedPointsFormula>>,
}

impl FormulaRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            formulas: HashMap::new(),
        }
    }

    /// Create registry with the built-in formulas
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("", NormalSpeed);
        registry.register("T2B", StepTableSpeed);
        registry.register("UKI", ClassSizeSpeed);
        registry
    }

    /// Register a formula for a points type, replacing any previous one
    pub fn register(&mut self, points_type: &str, formula: impl SpeedPointsFormula + 'static) {
        self.formulas
            .insert(points_type.to_string(), Box::new(formula));
    }

    /// Formula for a venue's points type
    ///
    /// # Errors
    /// [`ScoringError::UnknownFormula`] when nothing is registered for it.
    pub fn select(&self, points_type: &str) -> Result<&dyn SpeedPointsFormula, ScoringError> {
        self.formulas
            .get(points_type)
            .map(|f| &**f)
            .ok_or_else(|| ScoringError::UnknownFormula(points_type.to_string()))
    }

    /// Check if a points type is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, points_type: &str) -> bool {
        self.formulas.contains_key(points_type)
    }

    /// Registered points types
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.formulas.keys().map(String::as_str).collect()
    }

    /// Get number of registered formulas
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_config::{MatchKey, ScoringStyle};

    fn rule() -> ScoringRule {
        ScoringRule::new(MatchKey::Wildcard, MatchKey::Wildcard, ScoringStyle::FaultsThenTime)
    }

    fn run(elapsed: f64, sct: f64, place: u16) -> RunMeasurements {
        RunMeasurements::new().with_time(elapsed, sct).with_place(place, 20)
    }

    #[test]
    fn normal_whole_seconds_under() {
        let r = rule();
        assert!((NormalSpeed.speed_points(&r, &run(30.7, 40.0, 0)) - 9.0).abs() < f64::EPSILON);
        assert!(NormalSpeed.speed_points(&r, &run(45.0, 40.0, 0)).abs() < f64::EPSILON);
        assert!(NormalSpeed.speed_points(&r, &run(30.0, 0.0, 0)).abs() < f64::EPSILON);
    }

    #[test]
    fn normal_place_multiplier() {
        let r = rule().with_speed_points(&[(1, 2.0), (2, 1.5)]);
        assert!((NormalSpeed.speed_points(&r, &run(33.0, 40.0, 1)) - 14.0).abs() < f64::EPSILON);
        assert!((NormalSpeed.speed_points(&r, &run(33.0, 40.0, 2)) - 10.0).abs() < f64::EPSILON);
        assert!((NormalSpeed.speed_points(&r, &run(33.0, 40.0, 3)) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn step_table_bands() {
        let r = rule();
        let pts = |elapsed, place| StepTableSpeed.speed_points(&r, &run(elapsed, 40.0, place));
        assert!((pts(40.0, 1) - 10.0).abs() < f64::EPSILON);
        assert!((pts(38.0, 2) - 9.0).abs() < f64::EPSILON);
        assert!((pts(44.0, 1) - 9.0).abs() < f64::EPSILON);
        assert!((pts(44.1, 1) - 8.0).abs() < f64::EPSILON);
        assert!((pts(76.0, 3) - 1.0).abs() < f64::EPSILON);
        assert!(pts(80.0, 1).abs() < f64::EPSILON);
    }

    #[test]
    fn class_size_brackets() {
        let r = rule();
        let pts = |place, in_class| {
            ClassSizeSpeed.speed_points(&r, &RunMeasurements::new().with_place(place, in_class))
        };
        assert!((pts(1, 8) - 8.0).abs() < f64::EPSILON);
        assert!((pts(4, 8) - 1.0).abs() < f64::EPSILON);
        assert!((pts(5, 30) - 2.0).abs() < f64::EPSILON);
        assert!((pts(1, 31) - 12.0).abs() < f64::EPSILON);
        assert!((pts(0, 31) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn registry_with_defaults() {
        let registry = FormulaRegistry::with_defaults();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.select("").map(|f| f.name()).ok(), Some("Normal"));
        assert_eq!(registry.select("T2B").map(|f| f.name()).ok(), Some("T2B"));
        assert!(registry.contains("UKI"));
        assert!(matches!(registry.select("CPE"), Err(ScoringError::UnknownFormula(_))));
    }

    #[test]
    fn registry_register_replaces() {
        let mut registry = FormulaRegistry::new();
        assert!(registry.is_empty());
        registry.register("X", NormalSpeed);
        registry.register("X", ClassSizeSpeed);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.select("X").map(|f| f.name()).ok(), Some("UKI"));
        assert_eq!(registry.names(), ["X"]);
    }
}
