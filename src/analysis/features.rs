// Features module - fixed-shape EEG feature record
//
// The upstream feature extractor hands over one numeric array per frequency
// band and per band ratio (per-channel or per-epoch samples). This module
// pins that contract down to a typed record at the boundary so downstream
// stages never look anything up by name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-frame EEG features: one sample array per band and ratio
///
/// Empty arrays mean "not provided"; reductions fall back to the documented
/// defaults instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EegFeatures {
    /// Delta band power (1-4 Hz)
    pub delta: Vec<f64>,
    /// Theta band power (4-8 Hz)
    pub theta: Vec<f64>,
    /// Alpha band power (8-13 Hz)
    pub alpha: Vec<f64>,
    /// Beta band power (13-30 Hz)
    pub beta: Vec<f64>,
    /// Gamma band power (30-50 Hz)
    pub gamma: Vec<f64>,
    /// Theta/alpha ratio (drowsiness indicator)
    pub theta_alpha: Vec<f64>,
    /// Beta/alpha ratio (engagement/stress indicator)
    pub beta_alpha: Vec<f64>,
    /// Alpha/beta ratio
    pub alpha_beta: Vec<f64>,
}

impl EegFeatures {
    /// Build a record from a name -> samples map
    ///
    /// Recognised keys: delta, theta, alpha, beta, gamma, theta_alpha,
    /// beta_alpha, alpha_beta. Anything else is ignored.
    pub fn from_map(map: &HashMap<String, Vec<f64>>) -> Self {
        let take = |key: &str| map.get(key).cloned().unwrap_or_default();
        Self {
            delta: take("delta"),
            theta: take("theta"),
            alpha: take("alpha"),
            beta: take("beta"),
            gamma: take("gamma"),
            theta_alpha: take("theta_alpha"),
            beta_alpha: take("beta_alpha"),
            alpha_beta: take("alpha_beta"),
        }
    }

    /// Convenience constructor for single-valued ratio frames
    pub fn from_ratios(theta_alpha: f64, beta_alpha: f64, alpha_beta: f64) -> Self {
        Self {
            theta_alpha: vec![theta_alpha],
            beta_alpha: vec![beta_alpha],
            alpha_beta: vec![alpha_beta],
            ..Self::default()
        }
    }

    /// True when no band or ratio carries any sample
    pub fn is_empty(&self) -> bool {
        [
            &self.delta,
            &self.theta,
            &self.alpha,
            &self.beta,
            &self.gamma,
            &self.theta_alpha,
            &self.beta_alpha,
            &self.alpha_beta,
        ]
        .iter()
        .all(|samples| samples.is_empty())
    }
}

/// Arithmetic mean of `samples`, or `default` when there are none
pub fn mean_or(samples: &[f64], default: f64) -> f64 {
    if samples.is_empty() {
        return default;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_map_ignores_unknown_keys() {
        let mut map = HashMap::new();
        map.insert("theta_alpha".to_string(), vec![1.2, 1.4]);
        map.insert("alpha".to_string(), vec![3.0]);
        map.insert("heart_rate".to_string(), vec![72.0]);

        let features = EegFeatures::from_map(&map);
        assert_eq!(features.theta_alpha, vec![1.2, 1.4]);
        assert_eq!(features.alpha, vec![3.0]);
        assert!(features.beta_alpha.is_empty());
        assert!(!features.is_empty());
    }

    #[test]
    fn test_empty_map_is_empty_record() {
        let features = EegFeatures::from_map(&HashMap::new());
        assert!(features.is_empty());
        assert_eq!(features, EegFeatures::default());
    }

    #[test]
    fn test_mean_or_defaults() {
        assert_eq!(mean_or(&[], 1.0), 1.0);
        assert_eq!(mean_or(&[], 0.0), 0.0);
        assert!((mean_or(&[1.0, 2.0, 3.0], 0.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_deserialize_partial_frame() {
        let json = r#"{"theta_alpha": [2.0], "beta": [0.5, 0.7]}"#;
        let features: EegFeatures = serde_json::from_str(json).unwrap();
        assert_eq!(features.theta_alpha, vec![2.0]);
        assert_eq!(features.beta, vec![0.5, 0.7]);
        assert!(features.gamma.is_empty());
    }
}
