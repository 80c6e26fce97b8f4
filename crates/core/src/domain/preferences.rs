use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// How much the shopper cares about each scored axis. Each weight is in 0.0..=1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreferenceWeights {
    pub value: f64,
    pub speed: f64,
    pub trust: f64,
    pub quality: f64,
}

impl PreferenceWeights {
    pub const EQUAL: Self = Self { value: 0.25, speed: 0.25, trust: 0.25, quality: 0.25 };

    pub const fn new(value: f64, speed: f64, trust: f64, quality: f64) -> Self {
        Self { value, speed, trust, quality }
    }

    pub fn sum(&self) -> f64 {
        self.value + self.speed + self.trust + self.quality
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (axis, weight) in self.axes() {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(ValidationError::WeightOutOfRange { axis, weight });
            }
        }
        Ok(())
    }

    /// Rescales the weights to sum to 1.0; an all-zero vector becomes equal weights.
    pub fn normalized(&self) -> Self {
        let sum = self.sum();
        if !sum.is_finite() || sum <= f64::EPSILON {
            return Self::EQUAL;
        }
        Self {
            value: self.value / sum,
            speed: self.speed / sum,
            trust: self.trust / sum,
            quality: self.quality / sum,
        }
    }

    fn axes(&self) -> [(&'static str, f64); 4] {
        [
            ("value", self.value),
            ("speed", self.speed),
            ("trust", self.trust),
            ("quality", self.quality),
        ]
    }
}

impl Default for PreferenceWeights {
    fn default() -> Self {
        PresetType::BestValue.weights()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetType {
    #[default]
    BestValue,
    FastestDelivery,
    MostTrusted,
    Custom,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SearchPreset {
    pub id: PresetType,
    pub label: &'static str,
    pub description: &'static str,
    pub weights: PreferenceWeights,
}

pub const SEARCH_PRESETS: [SearchPreset; 4] = [
    SearchPreset {
        id: PresetType::BestValue,
        label: "Best Value",
        description: "Prioritize lowest total cost",
        weights: PreferenceWeights::new(0.5, 0.15, 0.15, 0.2),
    },
    SearchPreset {
        id: PresetType::FastestDelivery,
        label: "Fastest Delivery",
        description: "Prioritize getting it quickly",
        weights: PreferenceWeights::new(0.2, 0.5, 0.15, 0.15),
    },
    SearchPreset {
        id: PresetType::MostTrusted,
        label: "Most Trusted",
        description: "Prioritize reliable retailers",
        weights: PreferenceWeights::new(0.15, 0.15, 0.5, 0.2),
    },
    SearchPreset {
        id: PresetType::Custom,
        label: "Custom",
        description: "Set your own priorities",
        weights: PreferenceWeights::EQUAL,
    },
];

impl PresetType {
    pub fn preset(&self) -> &'static SearchPreset {
        SEARCH_PRESETS.iter().find(|preset| preset.id == *self).unwrap_or(&SEARCH_PRESETS[0])
    }

    pub fn weights(&self) -> PreferenceWeights {
        self.preset().weights
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BestValue => "best_value",
            Self::FastestDelivery => "fastest_delivery",
            Self::MostTrusted => "most_trusted",
            Self::Custom => "custom",
        }
    }
}

impl std::str::FromStr for PresetType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "best_value" | "value" => Ok(Self::BestValue),
            "fastest_delivery" | "fastest" | "speed" => Ok(Self::FastestDelivery),
            "most_trusted" | "trusted" | "trust" => Ok(Self::MostTrusted),
            "custom" => Ok(Self::Custom),
            other => Err(ValidationError::UnknownPreset(other.to_string())),
        }
    }
}
