use super::Exercise;
use crate::genomics::ConfigError;

use serde::{Deserialize, Serialize};

/// Fraction of body weight lost per MET-hour.
pub const LOSS_COEFFICIENT: f64 = 0.00013;

/// Returns the weight lost by a person weighing `weight`
/// performing an activity of the given MET `intensity`
/// for `duration` minutes.
///
/// # Examples
/// ```
/// use fitmap_schedules::phenotypes::weight_loss;
///
/// assert!((weight_loss(8.0, 30, 80.0) - 0.0416).abs() < 1e-12);
/// ```
pub fn weight_loss(intensity: f64, duration: usize, weight: f64) -> f64 {
    (LOSS_COEFFICIENT * intensity * weight * duration as f64) / 60.0
}

/// A weight-change target to be reached over
/// a number of weeks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightGoal {
    pub initial_weight: f64,
    pub target_weight: f64,
    /// Length of the plan in weeks.
    pub period: usize,
}

impl WeightGoal {
    /// Returns a validated goal.
    ///
    /// # Errors
    /// Returns an error if either weight is not a
    /// positive finite number.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::phenotypes::WeightGoal;
    ///
    /// assert!(WeightGoal::new(80.0, 75.0, 4).is_ok());
    /// assert!(WeightGoal::new(-80.0, 75.0, 4).is_err());
    /// ```
    pub fn new(
        initial_weight: f64,
        target_weight: f64,
        period: usize,
    ) -> Result<WeightGoal, ConfigError> {
        let goal = WeightGoal {
            initial_weight,
            target_weight,
            period,
        };
        goal.validate()?;
        Ok(goal)
    }

    /// Checks both weights are positive finite numbers.
    ///
    /// # Errors
    /// Returns an error describing the offending weight.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, weight) in [
            ("initial weight", self.initial_weight),
            ("target weight", self.target_weight),
        ] {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(ConfigError::InvalidGoal(format!(
                    "{} must be positive, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }

    /// Simulates `period` weeks of exercise, starting at
    /// `initial_weight`, and returns the final weight.
    ///
    /// `week` yields each day's exercises, Monday first,
    /// in the order they are performed. The weight is
    /// updated after every exercise, so the order matters.
    pub fn final_weight<'a, W, D>(&self, week: W) -> f64
    where
        W: IntoIterator<Item = D> + Clone,
        D: IntoIterator<Item = &'a Exercise>,
    {
        let mut weight = self.initial_weight;
        for _ in 0..self.period {
            for day in week.clone() {
                for exercise in day {
                    weight -= weight_loss(exercise.intensity(), exercise.duration(), weight);
                }
            }
        }
        weight
    }

    /// Returns the distance between `target_weight` and
    /// the final weight after following `week`, rounded
    /// to two decimals. Lower is better.
    pub fn fitness<'a, W, D>(&self, week: W) -> f64
    where
        W: IntoIterator<Item = D> + Clone,
        D: IntoIterator<Item = &'a Exercise>,
    {
        let distance = (self.target_weight - self.final_weight(week)).abs();
        (distance * 100.0).round() / 100.0
    }
}
