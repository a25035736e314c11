//! Extra fee entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored condition type
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ConditionType {
    #[sea_orm(string_value = "AIR_TEMPERATURE")]
    AirTemperature,
    #[sea_orm(string_value = "WIND_SPEED")]
    WindSpeed,
    #[sea_orm(string_value = "WEATHER_PHENOMENON")]
    WeatherPhenomenon,
}

impl From<crate::domain::ConditionType> for ConditionType {
    fn from(value: crate::domain::ConditionType) -> Self {
        use crate::domain::ConditionType as Domain;
        match value {
            Domain::AirTemperature => Self::AirTemperature,
            Domain::WindSpeed => Self::WindSpeed,
            Domain::WeatherPhenomenon => Self::WeatherPhenomenon,
        }
    }
}

impl From<ConditionType> for crate::domain::ConditionType {
    fn from(value: ConditionType) -> Self {
        match value {
            ConditionType::AirTemperature => Self::AirTemperature,
            ConditionType::WindSpeed => Self::WindSpeed,
            ConditionType::WeatherPhenomenon => Self::WeatherPhenomenon,
        }
    }
}

/// Weather-dependent surcharge rule in flat row form
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "extra_fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub condition_type: ConditionType,

    pub vehicle_type: String,

    /// Exclusive lower bound, unbounded when null
    #[sea_orm(column_type = "Double", nullable)]
    pub min_value: Option<f64>,

    /// Exclusive upper bound, unbounded when null
    #[sea_orm(column_type = "Double", nullable)]
    pub max_value: Option<f64>,

    pub weather_phenomenon: Option<String>,

    pub is_forbidden: bool,

    /// Fee in euros
    #[sea_orm(column_type = "Double")]
    pub fee: f64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
