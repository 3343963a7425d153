use serde::{Deserialize, Serialize};

/// Steepness class used to color an elevation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientBand {
    Steep,
    Hard,
    Moderate,
    Easy,
    Flat,
}

impl GradientBand {
    /// Descents fall into `Flat`.
    pub fn from_gradient(gradient: f64) -> Self {
        if gradient >= 10.0 {
            GradientBand::Steep
        } else if gradient >= 6.0 {
            GradientBand::Hard
        } else if gradient >= 3.0 {
            GradientBand::Moderate
        } else if gradient >= 1.0 {
            GradientBand::Easy
        } else {
            GradientBand::Flat
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            GradientBand::Steep => "#b33939",
            GradientBand::Hard => "#ff7979",
            GradientBand::Moderate => "#ffbe76",
            GradientBand::Easy => "#eccc68",
            GradientBand::Flat => "#99cc99",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSegment {
    pub start_distance: f64,
    pub end_distance: f64,
    pub band: GradientBand,
    pub average_gradient: f64,
    pub color: String,
}
