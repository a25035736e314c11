//! SeaORM implementation of WeatherObservationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{conflict_or, db_err, decimal_to_db, optional_decimal_from_db};
use crate::domain::weather::{WeatherObservation, WeatherObservationRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::weather_observation;

fn entity_to_domain(m: weather_observation::Model) -> DomainResult<WeatherObservation> {
    Ok(WeatherObservation {
        id: m.id,
        air_temperature: optional_decimal_from_db(
            m.air_temperature,
            "weather_observations.air_temperature",
        )?,
        wind_speed: optional_decimal_from_db(m.wind_speed, "weather_observations.wind_speed")?,
        station_name: m.station_name,
        wmo_code: m.wmo_code,
        phenomenon: m.phenomenon,
        observed_at: m.observed_at,
    })
}

/// `%`, `_` and `\` in user input must not act as wildcards
fn like_pattern(city: &str) -> String {
    let mut escaped = String::with_capacity(city.len() + 2);
    escaped.push('%');
    for c in city.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub struct SeaOrmWeatherRepository {
    db: DatabaseConnection,
}

impl SeaOrmWeatherRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WeatherObservationRepository for SeaOrmWeatherRepository {
    async fn find_latest_for_city(&self, city: &str) -> DomainResult<Option<WeatherObservation>> {
        let station = Expr::expr(Func::lower(Expr::col(
            weather_observation::Column::StationName,
        )));
        let model = weather_observation::Entity::find()
            .filter(station.like(LikeExpr::new(like_pattern(city)).escape('\\')))
            .order_by_desc(weather_observation::Column::ObservedAt)
            .order_by_desc(weather_observation::Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(entity_to_domain).transpose()
    }

    async fn exists(&self, wmo_code: i32, observed_at: DateTime<Utc>) -> DomainResult<bool> {
        let model = weather_observation::Entity::find()
            .filter(weather_observation::Column::WmoCode.eq(wmo_code))
            .filter(weather_observation::Column::ObservedAt.eq(observed_at))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.is_some())
    }

    async fn save(&self, observation: WeatherObservation) -> DomainResult<WeatherObservation> {
        let duplicate = DomainError::Conflict(format!(
            "weather observation for WMO code {} at {}",
            observation.wmo_code, observation.observed_at
        ));
        let model = weather_observation::ActiveModel {
            id: NotSet,
            station_name: Set(observation.station_name),
            wmo_code: Set(observation.wmo_code),
            air_temperature: Set(observation.air_temperature.map(decimal_to_db)),
            wind_speed: Set(observation.wind_speed.map(decimal_to_db)),
            phenomenon: Set(observation.phenomenon),
            observed_at: Set(observation.observed_at),
        };
        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_or(e, duplicate))?;
        debug!(
            "Weather observation saved: {} ({}) at {}",
            result.station_name, result.wmo_code, result.observed_at
        );
        entity_to_domain(result)
    }

    async fn find_recent(&self, limit: u64) -> DomainResult<Vec<WeatherObservation>> {
        let models = weather_observation::Entity::find()
            .order_by_desc(weather_observation::Column::ObservedAt)
            .order_by_desc(weather_observation::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(entity_to_domain).collect()
    }
}
