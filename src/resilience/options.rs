//! Options for the resilience likelihood rule.
use crate::resilience::errors::ResilienceResult;
use crate::resilience::validation::validate_temperature;

/// Default softmax temperature.
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// ResilienceOptions — tuning for [`rule_resilience_emission_gb`](crate::resilience::rule::rule_resilience_emission_gb).
///
/// Fields
/// ------
/// - `temperature`: `f64`
///   Multiplier on the `[1 − meanGood, meanGood]` scores before the softmax.
///   Larger values sharpen the output toward the side of 0.5 that the
///   weighted mean leans on. Defaults to [`DEFAULT_TEMPERATURE`].
///
/// Invariants
/// ----------
/// - `temperature` is finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResilienceOptions {
    temperature: f64,
}

impl ResilienceOptions {
    /// # Errors
    /// - `ResilienceError::InvalidTemperature` if `temperature` is not finite
    ///   and > 0.
    pub fn new(temperature: f64) -> ResilienceResult<Self> {
        validate_temperature(temperature)?;
        Ok(ResilienceOptions { temperature })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

impl Default for ResilienceOptions {
    fn default() -> Self {
        ResilienceOptions { temperature: DEFAULT_TEMPERATURE }
    }
}
