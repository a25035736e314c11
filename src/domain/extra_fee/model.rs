//! Extra fee rules
//!
//! An extra fee is a weather-dependent surcharge for one vehicle type. The
//! condition decides when it applies:
//!
//! - `AirTemperature` / `WindSpeed`: the observed value lies strictly inside
//!   the rule's range. A missing bound is open on that side.
//! - `Phenomenon`: the observed phenomenon contains the rule's phenomenon
//!   (trimmed, case-insensitive). A forbidden phenomenon rule prohibits the
//!   vehicle instead of adding a fee.
//!
//! Wind speed above a wind rule's upper bound also prohibits the vehicle.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::shared::errors::{DomainError, DomainResult};

/// Weather measurement an extra fee rule is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionType {
    AirTemperature,
    WindSpeed,
    WeatherPhenomenon,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AirTemperature => "AIR_TEMPERATURE",
            Self::WindSpeed => "WIND_SPEED",
            Self::WeatherPhenomenon => "WEATHER_PHENOMENON",
        }
    }

    pub const fn all() -> &'static [ConditionType] {
        &[
            ConditionType::AirTemperature,
            ConditionType::WindSpeed,
            ConditionType::WeatherPhenomenon,
        ]
    }
}

impl std::fmt::Display for ConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AIR_TEMPERATURE" => Ok(Self::AirTemperature),
            "WIND_SPEED" => Ok(Self::WindSpeed),
            "WEATHER_PHENOMENON" => Ok(Self::WeatherPhenomenon),
            _ => Err(DomainError::Validation(format!(
                "unknown condition type '{}', expected one of AIR_TEMPERATURE, WIND_SPEED, WEATHER_PHENOMENON",
                s
            ))),
        }
    }
}

/// Open numeric interval `(min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl ValueRange {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> DomainResult<Self> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo >= hi {
                return Err(DomainError::Validation(format!(
                    "min_value ({}) must be lower than max_value ({})",
                    lo, hi
                )));
            }
        }
        Ok(Self { min, max })
    }

    /// `min < value < max`; boundary values never match.
    pub fn contains(&self, value: Decimal) -> bool {
        let above_min = self.min.map_or(true, |min| value > min);
        let below_max = self.max.map_or(true, |max| value < max);
        above_min && below_max
    }

    /// `value > max`; an unbounded range is never exceeded.
    pub fn is_exceeded_by(&self, value: Decimal) -> bool {
        self.max.is_some_and(|max| value > max)
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) => write!(f, "({}, {})", lo, hi),
            (Some(lo), None) => write!(f, "({}, +inf)", lo),
            (None, Some(hi)) => write!(f, "(-inf, {})", hi),
            (None, None) => write!(f, "(-inf, +inf)"),
        }
    }
}

/// When an extra fee applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeCondition {
    AirTemperature(ValueRange),
    WindSpeed(ValueRange),
    Phenomenon { name: String, forbidden: bool },
}

impl FeeCondition {
    /// Build a condition from its flat column representation.
    pub fn from_columns(
        condition_type: ConditionType,
        min_value: Option<Decimal>,
        max_value: Option<Decimal>,
        phenomenon: Option<String>,
        is_forbidden: bool,
    ) -> DomainResult<Self> {
        match condition_type {
            ConditionType::AirTemperature | ConditionType::WindSpeed => {
                if is_forbidden {
                    return Err(DomainError::Validation(format!(
                        "{} rules cannot be marked forbidden; wind speed above max_value forbids the vehicle",
                        condition_type
                    )));
                }
                let range = ValueRange::new(min_value, max_value)?;
                Ok(if condition_type == ConditionType::AirTemperature {
                    Self::AirTemperature(range)
                } else {
                    Self::WindSpeed(range)
                })
            }
            ConditionType::WeatherPhenomenon => {
                let name = phenomenon
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| {
                        DomainError::Validation(
                            "WEATHER_PHENOMENON rules require a weather_phenomenon".to_string(),
                        )
                    })?;
                Ok(Self::Phenomenon {
                    name,
                    forbidden: is_forbidden,
                })
            }
        }
    }

    pub fn condition_type(&self) -> ConditionType {
        match self {
            Self::AirTemperature(_) => ConditionType::AirTemperature,
            Self::WindSpeed(_) => ConditionType::WindSpeed,
            Self::Phenomenon { .. } => ConditionType::WeatherPhenomenon,
        }
    }

    pub fn range(&self) -> Option<&ValueRange> {
        match self {
            Self::AirTemperature(range) | Self::WindSpeed(range) => Some(range),
            Self::Phenomenon { .. } => None,
        }
    }

    pub fn min_value(&self) -> Option<Decimal> {
        self.range().and_then(|r| r.min)
    }

    pub fn max_value(&self) -> Option<Decimal> {
        self.range().and_then(|r| r.max)
    }

    pub fn phenomenon(&self) -> Option<&str> {
        match self {
            Self::Phenomenon { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Phenomenon { forbidden: true, .. })
    }
}

/// Weather-dependent surcharge or prohibition for one vehicle type
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraFee {
    pub id: i32,
    pub vehicle_type: String,
    pub fee: Decimal,
    pub condition: FeeCondition,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExtraFee {
    /// Build a not-yet-persisted rule (`id == 0`).
    pub fn new(
        vehicle_type: impl Into<String>,
        fee: Decimal,
        condition: FeeCondition,
    ) -> DomainResult<Self> {
        let vehicle_type = vehicle_type.into().trim().to_string();
        if vehicle_type.is_empty() {
            return Err(DomainError::Validation(
                "vehicle_type must not be empty".to_string(),
            ));
        }
        if fee < Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "extra fee must not be negative, got {}",
                fee
            )));
        }

        let now = Utc::now();
        Ok(Self {
            id: 0,
            vehicle_type,
            fee,
            condition,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn condition_type(&self) -> ConditionType {
        self.condition.condition_type()
    }

    pub fn is_forbidden(&self) -> bool {
        self.condition.is_forbidden()
    }

    /// Whether a phenomenon rule matches the observed phenomenon.
    /// Always `false` for numeric rules.
    pub fn matches_phenomenon(&self, observed: &str) -> bool {
        self.condition
            .phenomenon()
            .is_some_and(|rule| phenomenon_matches(rule, observed))
    }
}

/// Trimmed, case-insensitive match; equal strings always match, and a rule
/// such as "snow" also matches a reported "Light snow shower".
pub fn phenomenon_matches(rule: &str, observed: &str) -> bool {
    let rule = rule.trim().to_lowercase();
    if rule.is_empty() {
        return false;
    }
    observed.trim().to_lowercase().contains(&rule)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn range(min: Decimal, max: Decimal) -> ValueRange {
        ValueRange::new(Some(min), Some(max)).unwrap()
    }

    #[test]
    fn range_is_open_at_both_ends() {
        let r = range(dec!(-10), dec!(0));
        assert!(r.contains(dec!(-5)));
        assert!(r.contains(dec!(-9.99)));
        assert!(!r.contains(dec!(-10)));
        assert!(!r.contains(dec!(0)));
        assert!(!r.contains(dec!(0.1)));
    }

    #[test]
    fn missing_bound_is_unbounded() {
        let below = ValueRange::new(None, Some(dec!(-10))).unwrap();
        assert!(below.contains(dec!(-40)));
        assert!(!below.contains(dec!(-10)));

        let above = ValueRange::new(Some(dec!(20)), None).unwrap();
        assert!(above.contains(dec!(35)));
        assert!(!above.is_exceeded_by(dec!(1000)));
    }

    #[test]
    fn exceeded_only_strictly_above_max() {
        let r = range(dec!(10), dec!(20));
        assert!(r.is_exceeded_by(dec!(20.1)));
        assert!(!r.is_exceeded_by(dec!(20)));
        assert!(!r.is_exceeded_by(dec!(15)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(ValueRange::new(Some(dec!(5)), Some(dec!(5))).is_err());
        assert!(ValueRange::new(Some(dec!(6)), Some(dec!(5))).is_err());
    }

    #[test]
    fn phenomenon_match_is_case_insensitive_and_trimmed() {
        assert!(phenomenon_matches("snow", "  SNOW "));
        assert!(phenomenon_matches(" Glaze", "glaze"));
        assert!(phenomenon_matches("snow", "Light snow shower"));
        assert!(!phenomenon_matches("rain", "Clear"));
        assert!(!phenomenon_matches("  ", "Clear"));
    }

    #[test]
    fn phenomenon_rule_requires_name() {
        let err = FeeCondition::from_columns(
            ConditionType::WeatherPhenomenon,
            None,
            None,
            Some("   ".into()),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn numeric_rule_cannot_be_forbidden() {
        let result = FeeCondition::from_columns(
            ConditionType::WindSpeed,
            Some(dec!(20)),
            None,
            None,
            true,
        );
        assert!(result.is_err());
    }

    #[test]
    fn columns_round_trip_through_condition() {
        let wind = FeeCondition::from_columns(
            ConditionType::WindSpeed,
            Some(dec!(10)),
            Some(dec!(20)),
            Some("ignored".into()),
            false,
        )
        .unwrap();
        assert_eq!(wind.condition_type(), ConditionType::WindSpeed);
        assert_eq!(wind.min_value(), Some(dec!(10)));
        assert_eq!(wind.max_value(), Some(dec!(20)));
        assert_eq!(wind.phenomenon(), None);
        assert!(!wind.is_forbidden());

        let hail = FeeCondition::from_columns(
            ConditionType::WeatherPhenomenon,
            None,
            None,
            Some(" hail ".into()),
            true,
        )
        .unwrap();
        assert_eq!(hail.phenomenon(), Some("hail"));
        assert!(hail.is_forbidden());
        assert_eq!(hail.range(), None);
    }

    #[test]
    fn condition_type_parses_case_insensitively() {
        assert_eq!(
            "air_temperature".parse::<ConditionType>().unwrap(),
            ConditionType::AirTemperature
        );
        assert_eq!(
            "WIND_SPEED".parse::<ConditionType>().unwrap(),
            ConditionType::WindSpeed
        );
        assert!("HUMIDITY".parse::<ConditionType>().is_err());
        for ct in ConditionType::all() {
            assert_eq!(ct.as_str().parse::<ConditionType>().unwrap(), *ct);
        }
    }

    #[test]
    fn numeric_rule_never_matches_phenomenon() {
        let rule = ExtraFee::new(
            "Bike",
            dec!(0.5),
            FeeCondition::AirTemperature(range(dec!(-10), dec!(0))),
        )
        .unwrap();
        assert!(!rule.matches_phenomenon("snow"));
    }

    #[test]
    fn negative_extra_fee_is_rejected() {
        let result = ExtraFee::new(
            "Bike",
            dec!(-1),
            FeeCondition::Phenomenon {
                name: "rain".into(),
                forbidden: false,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn range_display() {
        assert_eq!(range(dec!(-10), dec!(0)).to_string(), "(-10, 0)");
        assert_eq!(ValueRange::default().to_string(), "(-inf, +inf)");
    }
}
