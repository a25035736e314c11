//! Delivery fee calculation
//!
//! Total fee = base fee for (city, vehicle type) + regional weather extras.
//! Rules are evaluated against the newest observation of a station in the
//! city:
//!
//! 1. forbidden phenomenon rules (reject before pricing anything)
//! 2. air temperature rules, first rule whose open range contains the value
//! 3. wind speed rules; above a rule's max rejects, otherwise first match
//! 4. remaining phenomenon rules, first match
//!
//! Observation fields that are absent skip their step.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::domain::{
    ConditionType, DeliveryFeeRequest, DeliveryFeeResult, DomainError, DomainResult, ExtraFee,
    FeeBreakdown, RepositoryProvider, WeatherObservation,
};

/// Stateless fee engine over the rule and weather stores
pub struct DeliveryFeeService {
    repos: Arc<dyn RepositoryProvider>,
}

impl DeliveryFeeService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Validate raw input and calculate.
    pub async fn calculate_for(
        &self,
        city: &str,
        vehicle_type: &str,
    ) -> DomainResult<DeliveryFeeResult> {
        match DeliveryFeeRequest::new(city, vehicle_type) {
            Ok(request) => self.calculate(&request).await,
            Err(e) => {
                record_outcome(Err(&e));
                Err(e)
            }
        }
    }

    pub async fn calculate(&self, request: &DeliveryFeeRequest) -> DomainResult<DeliveryFeeResult> {
        let result = self.evaluate(request).await;
        record_outcome(result.as_ref().map(|_| ()));

        match &result {
            Ok(fee) => info!(
                city = request.city(),
                vehicle_type = request.vehicle_type(),
                total_fee = %fee.total_fee,
                "Delivery fee calculated"
            ),
            Err(e) => info!(
                city = request.city(),
                vehicle_type = request.vehicle_type(),
                error = %e,
                "Delivery fee rejected"
            ),
        }

        result
    }

    async fn evaluate(&self, request: &DeliveryFeeRequest) -> DomainResult<DeliveryFeeResult> {
        let city = request.city();
        let vehicle_type = request.vehicle_type();

        let base = self
            .repos
            .base_fees()
            .find_by_city_and_vehicle(city, vehicle_type)
            .await
            .map_err(calculation_failure)?
            .ok_or_else(|| DomainError::BaseFeeNotFound {
                city: city.to_string(),
                vehicle_type: vehicle_type.to_string(),
            })?;

        let mut breakdown = FeeBreakdown::base(base.fee);

        let Some(weather) = self
            .repos
            .weather()
            .find_latest_for_city(city)
            .await
            .map_err(calculation_failure)?
        else {
            debug!(city, "No weather observation for city, base fee only");
            return Ok(DeliveryFeeResult::from_breakdown(breakdown));
        };

        debug!(
            city,
            station = weather.station_name.as_str(),
            observed_at = %weather.observed_at,
            "Using weather observation"
        );

        self.apply_weather(vehicle_type, &weather, &mut breakdown)
            .await?;

        Ok(DeliveryFeeResult::from_breakdown(breakdown))
    }

    async fn apply_weather(
        &self,
        vehicle_type: &str,
        weather: &WeatherObservation,
        breakdown: &mut FeeBreakdown,
    ) -> DomainResult<()> {
        let phenomenon_rules = match weather.phenomenon.as_deref() {
            Some(_) => {
                self.rules(ConditionType::WeatherPhenomenon, vehicle_type)
                    .await?
            }
            None => Vec::new(),
        };

        if let Some(observed) = weather.phenomenon.as_deref() {
            if phenomenon_rules
                .iter()
                .any(|rule| rule.is_forbidden() && rule.matches_phenomenon(observed))
            {
                return Err(forbidden(
                    vehicle_type,
                    format!("weather phenomenon '{}'", observed.trim()),
                ));
            }
        }

        if let Some(temperature) = weather.air_temperature {
            let rules = self
                .rules(ConditionType::AirTemperature, vehicle_type)
                .await?;
            breakdown.air_temperature_fee = first_in_range(&rules, temperature);
        }

        if let Some(wind_speed) = weather.wind_speed {
            let rules = self.rules(ConditionType::WindSpeed, vehicle_type).await?;
            breakdown.wind_speed_fee = wind_speed_fee(vehicle_type, &rules, wind_speed)?;
        }

        if let Some(observed) = weather.phenomenon.as_deref() {
            breakdown.phenomenon_fee = phenomenon_rules
                .iter()
                .find(|rule| !rule.is_forbidden() && rule.matches_phenomenon(observed))
                .map(|rule| rule.fee)
                .unwrap_or(Decimal::ZERO);
        }

        Ok(())
    }

    async fn rules(
        &self,
        condition_type: ConditionType,
        vehicle_type: &str,
    ) -> DomainResult<Vec<ExtraFee>> {
        self.repos
            .extra_fees()
            .find_by_condition(condition_type, vehicle_type)
            .await
            .map_err(calculation_failure)
    }
}

fn first_in_range(rules: &[ExtraFee], value: Decimal) -> Decimal {
    rules
        .iter()
        .find(|rule| rule.condition.range().is_some_and(|r| r.contains(value)))
        .map(|rule| rule.fee)
        .unwrap_or(Decimal::ZERO)
}

fn wind_speed_fee(vehicle_type: &str, rules: &[ExtraFee], wind_speed: Decimal) -> DomainResult<Decimal> {
    for rule in rules {
        let Some(range) = rule.condition.range() else {
            continue;
        };
        if range.is_exceeded_by(wind_speed) {
            return Err(forbidden(
                vehicle_type,
                format!("wind speed {} m/s exceeds {}", wind_speed, range),
            ));
        }
        if range.contains(wind_speed) {
            return Ok(rule.fee);
        }
    }
    Ok(Decimal::ZERO)
}

fn forbidden(vehicle_type: &str, reason: String) -> DomainError {
    warn!(vehicle_type, reason = reason.as_str(), "Vehicle type forbidden by weather");
    DomainError::VehicleForbidden {
        vehicle_type: vehicle_type.to_string(),
        reason,
    }
}

fn calculation_failure(e: DomainError) -> DomainError {
    error!(error = %e, "Fee rule lookup failed");
    DomainError::CalculationFailure(e.to_string())
}

fn record_outcome(result: Result<(), &DomainError>) {
    let outcome = match result {
        Ok(()) => "ok",
        Err(DomainError::BaseFeeNotFound { .. }) => "base_fee_not_found",
        Err(DomainError::VehicleForbidden { .. }) => "forbidden",
        Err(DomainError::InvalidRequest(_)) => "invalid",
        Err(_) => "failure",
    };
    metrics::counter!("delivery_fee_calculations_total", "outcome" => outcome).increment(1);
}

// ── Tests ──────────────────────────────────────────────────────
