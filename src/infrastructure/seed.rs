//! Default fee rules
//!
//! Loaded by the seed migration and by `InMemoryRepositoryProvider::seeded`.

use rust_decimal::Decimal;

use crate::domain::{BaseFee, ConditionType, DomainResult, ExtraFee, FeeCondition};

pub const CITIES: [&str; 3] = ["Tallinn", "Tartu", "Pärnu"];

/// (city, vehicle type, fee in cents)
const BASE_FEES: [(&str, &str, i64); 9] = [
    ("Tallinn", "Car", 400),
    ("Tallinn", "Scooter", 350),
    ("Tallinn", "Bike", 300),
    ("Tartu", "Car", 350),
    ("Tartu", "Scooter", 300),
    ("Tartu", "Bike", 250),
    ("Pärnu", "Car", 300),
    ("Pärnu", "Scooter", 250),
    ("Pärnu", "Bike", 200),
];

/// Row shape of a default extra fee
pub struct ExtraFeeSeed {
    pub vehicle_type: &'static str,
    pub condition_type: ConditionType,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub phenomenon: Option<&'static str>,
    pub is_forbidden: bool,
    /// Cents
    pub fee: i64,
}

const fn numeric(
    vehicle_type: &'static str,
    condition_type: ConditionType,
    min_value: Option<i64>,
    max_value: Option<i64>,
    fee: i64,
) -> ExtraFeeSeed {
    ExtraFeeSeed {
        vehicle_type,
        condition_type,
        min_value,
        max_value,
        phenomenon: None,
        is_forbidden: false,
        fee,
    }
}

const fn phenomenon(
    vehicle_type: &'static str,
    name: &'static str,
    is_forbidden: bool,
    fee: i64,
) -> ExtraFeeSeed {
    ExtraFeeSeed {
        vehicle_type,
        condition_type: ConditionType::WeatherPhenomenon,
        min_value: None,
        max_value: None,
        phenomenon: Some(name),
        is_forbidden,
        fee,
    }
}

const EXTRA_FEES: [ExtraFeeSeed; 17] = [
    numeric("Scooter", ConditionType::AirTemperature, None, Some(-10), 100),
    numeric("Scooter", ConditionType::AirTemperature, Some(-10), Some(0), 50),
    numeric("Bike", ConditionType::AirTemperature, None, Some(-10), 100),
    numeric("Bike", ConditionType::AirTemperature, Some(-10), Some(0), 50),
    numeric("Bike", ConditionType::WindSpeed, Some(10), Some(20), 50),
    phenomenon("Scooter", "snow", false, 100),
    phenomenon("Scooter", "sleet", false, 100),
    phenomenon("Scooter", "rain", false, 50),
    phenomenon("Scooter", "glaze", true, 0),
    phenomenon("Scooter", "hail", true, 0),
    phenomenon("Scooter", "thunder", true, 0),
    phenomenon("Bike", "snow", false, 100),
    phenomenon("Bike", "sleet", false, 100),
    phenomenon("Bike", "rain", false, 50),
    phenomenon("Bike", "glaze", true, 0),
    phenomenon("Bike", "hail", true, 0),
    phenomenon("Bike", "thunder", true, 0),
];

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

pub fn base_fee_rows() -> impl Iterator<Item = (&'static str, &'static str, Decimal)> {
    BASE_FEES
        .iter()
        .map(|(city, vehicle, fee)| (*city, *vehicle, cents(*fee)))
}

pub fn extra_fee_rows() -> &'static [ExtraFeeSeed] {
    &EXTRA_FEES
}

impl ExtraFeeSeed {
    pub fn fee(&self) -> Decimal {
        cents(self.fee)
    }

    pub fn min(&self) -> Option<Decimal> {
        self.min_value.map(|v| Decimal::new(v, 0))
    }

    pub fn max(&self) -> Option<Decimal> {
        self.max_value.map(|v| Decimal::new(v, 0))
    }

    pub fn to_domain(&self) -> DomainResult<ExtraFee> {
        let condition = FeeCondition::from_columns(
            self.condition_type,
            self.min(),
            self.max(),
            self.phenomenon.map(str::to_string),
            self.is_forbidden,
        )?;
        ExtraFee::new(self.vehicle_type, self.fee(), condition)
    }
}

pub fn default_base_fees() -> DomainResult<Vec<BaseFee>> {
    base_fee_rows()
        .map(|(city, vehicle, fee)| BaseFee::new(city, vehicle, fee))
        .collect()
}

pub fn default_extra_fees() -> DomainResult<Vec<ExtraFee>> {
    EXTRA_FEES.iter().map(ExtraFeeSeed::to_domain).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn every_city_prices_every_vehicle() {
        let fees = default_base_fees().unwrap();
        assert_eq!(fees.len(), 9);
        for city in CITIES {
            for vehicle in ["Car", "Scooter", "Bike"] {
                assert!(fees.iter().any(|f| f.is_for(city, vehicle)));
            }
        }
        let tallinn_car = fees.iter().find(|f| f.is_for("Tallinn", "Car")).unwrap();
        assert_eq!(tallinn_car.fee, dec!(4.00));
    }

    #[test]
    fn default_extra_fees_are_valid_rules() {
        let rules = default_extra_fees().unwrap();
        assert_eq!(rules.len(), EXTRA_FEES.len());
        assert_eq!(rules.iter().filter(|r| r.is_forbidden()).count(), 6);
    }
}
