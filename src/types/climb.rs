use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Endpoint of a detected climb.
///
/// `gradient` carries the climb's average gradient, not the local grade at
/// this point. Existing chart and marker consumers read it that way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimbPoint {
    pub distance: f64,
    pub elevation: f64,
    pub gradient: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimbCategory {
    #[serde(rename = "HC")]
    Hc,
    #[serde(rename = "CAT1")]
    Cat1,
    #[serde(rename = "CAT2")]
    Cat2,
    #[serde(rename = "CAT3")]
    Cat3,
    #[serde(rename = "CAT4")]
    Cat4,
}

impl ClimbCategory {
    /// First matching tier wins, hardest first.
    pub fn from_score(fiets_score: f64, thresholds: &CategoryThresholds) -> Self {
        if fiets_score >= thresholds.hc {
            ClimbCategory::Hc
        } else if fiets_score >= thresholds.cat1 {
            ClimbCategory::Cat1
        } else if fiets_score >= thresholds.cat2 {
            ClimbCategory::Cat2
        } else if fiets_score >= thresholds.cat3 {
            ClimbCategory::Cat3
        } else {
            ClimbCategory::Cat4
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClimbCategory::Hc => "HC",
            ClimbCategory::Cat1 => "CAT1",
            ClimbCategory::Cat2 => "CAT2",
            ClimbCategory::Cat3 => "CAT3",
            ClimbCategory::Cat4 => "CAT4",
        }
    }

    /// Overlay color with a 60% alpha suffix.
    pub fn color(&self) -> &'static str {
        match self {
            ClimbCategory::Hc => "#8B000099",
            ClimbCategory::Cat1 => "#FF000099",
            ClimbCategory::Cat2 => "#fa823199",
            ClimbCategory::Cat3 => "#f7b73199",
            ClimbCategory::Cat4 => "#228B2299",
        }
    }
}

/// Minimum FIETS score for each tier. Anything below `cat3` is CAT4.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryThresholds {
    pub hc: f64,
    pub cat1: f64,
    pub cat2: f64,
    pub cat3: f64,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            hc: 8.0,
            cat1: 6.0,
            cat2: 4.5,
            cat3: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    /// Steep-section scan, valley-aware merge, lookahead, FIETS scoring.
    #[default]
    Fiets,
    /// Flat rule: any 1 km window at 3% or more counts as climbing.
    RollingWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum step gradient (%) to open or extend a steep section.
    pub min_gradient: f64,
    pub min_length_m: f64,
    /// Moving-average window, in samples.
    pub smoothing_window: usize,
    /// Largest gap between steep sections that may still be merged.
    pub merge_gap_m: f64,
    pub min_downhill_gradient: f64,
    /// Accumulated downhill run that blocks a merge.
    pub min_downhill_length_m: f64,
    pub lookahead_distance_m: f64,
    /// End the lookahead at the first significant descent instead of
    /// scanning the whole window.
    pub lookahead_stop_on_descent: bool,
    /// Climbs whose average gradient ends up below this are dropped.
    pub final_min_gradient: f64,
    pub categories: CategoryThresholds,
    pub strategy: DetectionStrategy,
    pub remove_overlaps: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_gradient: 2.0,
            min_length_m: 1200.0,
            smoothing_window: 20,
            merge_gap_m: 10_000.0,
            min_downhill_gradient: -1.0,
            min_downhill_length_m: 600.0,
            lookahead_distance_m: 5000.0,
            lookahead_stop_on_descent: false,
            final_min_gradient: 1.5,
            categories: CategoryThresholds::default(),
            strategy: DetectionStrategy::Fiets,
            remove_overlaps: false,
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("min_gradient", self.min_gradient),
            ("min_length_m", self.min_length_m),
            ("merge_gap_m", self.merge_gap_m),
            ("min_downhill_gradient", self.min_downhill_gradient),
            ("min_downhill_length_m", self.min_downhill_length_m),
            ("lookahead_distance_m", self.lookahead_distance_m),
            ("final_min_gradient", self.final_min_gradient),
            ("categories.hc", self.categories.hc),
            ("categories.cat1", self.categories.cat1),
            ("categories.cat2", self.categories.cat2),
            ("categories.cat3", self.categories.cat3),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NonFinite(name));
        }

        if self.smoothing_window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.min_length_m <= 0.0 {
            return Err(ConfigError::NotPositive("min_length_m"));
        }
        if self.min_downhill_length_m <= 0.0 {
            return Err(ConfigError::NotPositive("min_downhill_length_m"));
        }
        if self.merge_gap_m < 0.0 {
            return Err(ConfigError::Negative("merge_gap_m"));
        }
        if self.lookahead_distance_m < 0.0 {
            return Err(ConfigError::Negative("lookahead_distance_m"));
        }

        let c = &self.categories;
        if !(c.hc >= c.cat1 && c.cat1 >= c.cat2 && c.cat2 >= c.cat3) {
            return Err(ConfigError::UnorderedCategories);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Climb {
    pub start_point: ClimbPoint,
    pub end_point: ClimbPoint,
    pub total_distance: f64,
    pub elevation_gain: f64,
    pub average_gradient: f64,
    pub fiets_score: f64,
    pub category: ClimbCategory,
    pub color: String,
    /// Ordinal within the category, counted along the route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

/// FIETS = (Δh / 1000) × (Δh / (km × 10))²
pub fn fiets_score(elevation_gain: f64, distance_km: f64) -> f64 {
    (elevation_gain / 1000.0) * (elevation_gain / (distance_km * 10.0)).powi(2)
}

/// Numbers climbs per category in route order. Expects `climbs` sorted by
/// start distance, which is how detection returns them.
pub fn number_climbs(climbs: &mut [Climb]) {
    let mut counts: HashMap<ClimbCategory, u32> = HashMap::new();
    for climb in climbs.iter_mut() {
        let count = counts.entry(climb.category).or_insert(0);
        *count += 1;
        climb.number = Some(*count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climb(start: f64, category: ClimbCategory) -> Climb {
        Climb {
            start_point: ClimbPoint {
                distance: start,
                elevation: 0.0,
                gradient: 5.0,
            },
            end_point: ClimbPoint {
                distance: start + 2000.0,
                elevation: 100.0,
                gradient: 5.0,
            },
            total_distance: 2000.0,
            elevation_gain: 100.0,
            average_gradient: 5.0,
            fiets_score: 2.5,
            category,
            color: category.color().to_string(),
            number: None,
        }
    }

    #[test]
    fn fiets_score_for_two_km_at_five_percent() {
        let score = fiets_score(100.0, 2.0);
        assert!((score - 2.5).abs() < 1e-12);
    }

    #[test]
    fn category_boundaries_are_inclusive() {
        let t = CategoryThresholds::default();
        assert_eq!(ClimbCategory::from_score(8.0, &t), ClimbCategory::Hc);
        assert_eq!(ClimbCategory::from_score(7.99, &t), ClimbCategory::Cat1);
        assert_eq!(ClimbCategory::from_score(6.0, &t), ClimbCategory::Cat1);
        assert_eq!(ClimbCategory::from_score(4.5, &t), ClimbCategory::Cat2);
        assert_eq!(ClimbCategory::from_score(3.0, &t), ClimbCategory::Cat3);
        assert_eq!(ClimbCategory::from_score(2.99, &t), ClimbCategory::Cat4);
        assert_eq!(ClimbCategory::from_score(0.0, &t), ClimbCategory::Cat4);
    }

    #[test]
    fn nan_score_falls_through_to_cat4() {
        let t = CategoryThresholds::default();
        assert_eq!(ClimbCategory::from_score(f64::NAN, &t), ClimbCategory::Cat4);
    }

    #[test]
    fn category_serializes_as_tier_name() {
        let json = serde_json::to_string(&ClimbCategory::Cat3).unwrap();
        assert_eq!(json, "\"CAT3\"");
    }

    #[test]
    fn climb_serializes_camel_case() {
        let value = serde_json::to_value(climb(0.0, ClimbCategory::Cat4)).unwrap();
        assert!(value.get("startPoint").is_some());
        assert!(value.get("totalDistance").is_some());
        assert!(value.get("fietsScore").is_some());
        assert!(value.get("number").is_none());
    }

    #[test]
    fn numbering_counts_per_category() {
        let mut climbs = vec![
            climb(0.0, ClimbCategory::Cat3),
            climb(5000.0, ClimbCategory::Cat4),
            climb(10_000.0, ClimbCategory::Cat3),
        ];
        number_climbs(&mut climbs);
        let numbers: Vec<_> = climbs.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![Some(1), Some(1), Some(2)]);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(DetectionConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let config = DetectionConfig {
            smoothing_window: 0,
            ..DetectionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroWindow));

        let config = DetectionConfig {
            min_gradient: f64::NAN,
            ..DetectionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonFinite("min_gradient")));

        let config = DetectionConfig {
            categories: CategoryThresholds {
                hc: 2.0,
                ..CategoryThresholds::default()
            },
            ..DetectionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::UnorderedCategories));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: DetectionConfig =
            serde_json::from_str(r#"{"min_gradient": 3.0, "strategy": "rolling_window"}"#).unwrap();
        assert_eq!(config.min_gradient, 3.0);
        assert_eq!(config.strategy, DetectionStrategy::RollingWindow);
        assert_eq!(config.min_length_m, 1200.0);
    }
}
