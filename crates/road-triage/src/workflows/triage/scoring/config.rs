use serde::{Deserialize, Serialize};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Relative weights of the four scoring factors. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub severity: f64,
    pub condition: f64,
    pub traffic: f64,
    pub proximity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            severity: 0.35,
            condition: 0.25,
            traffic: 0.20,
            proximity: 0.20,
        }
    }
}

impl ScoringWeights {
    pub const OPTION_KEYS: [&'static str; 4] = [
        "weights.severity",
        "weights.condition",
        "weights.traffic",
        "weights.proximity",
    ];

    pub fn new(
        severity: f64,
        condition: f64,
        traffic: f64,
        proximity: f64,
    ) -> Result<Self, InvalidConfig> {
        let weights = Self {
            severity,
            condition,
            traffic,
            proximity,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Builds weights from `weights.*` options, falling back to defaults for omitted keys.
    ///
    /// Keys outside the `weights.` namespace belong to other consumers and are ignored.
    pub fn from_options<'a, I>(options: I) -> Result<Self, InvalidConfig>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut weights = Self::default();
        for (key, value) in options {
            match key {
                "weights.severity" => weights.severity = value,
                "weights.condition" => weights.condition = value,
                "weights.traffic" => weights.traffic = value,
                "weights.proximity" => weights.proximity = value,
                other if other.starts_with("weights.") => {
                    return Err(InvalidConfig::UnknownOption(other.to_string()))
                }
                _ => {}
            }
        }
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), InvalidConfig> {
        for (name, value) in self.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidConfig::InvalidWeight { name, value });
            }
        }

        let sum = self.severity + self.condition + self.traffic + self.proximity;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(InvalidConfig::WeightSum { sum });
        }
        Ok(())
    }

    fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("severity", self.severity),
            ("condition", self.condition),
            ("traffic", self.traffic),
            ("proximity", self.proximity),
        ]
    }
}

/// Malformed scoring configuration. Fatal for the request that carries it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidConfig {
    #[error("weight '{name}' must be a non-negative finite number, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("weights must sum to 1.0, got {sum:.6}")]
    WeightSum { sum: f64 },
    #[error("unrecognized option '{0}'")]
    UnknownOption(String),
}
