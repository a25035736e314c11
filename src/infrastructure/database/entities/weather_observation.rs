//! Weather observation entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One imported station measurement; (wmo_code, observed_at) is unique
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weather_observations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub station_name: String,

    pub wmo_code: i32,

    /// Degrees Celsius
    #[sea_orm(column_type = "Double", nullable)]
    pub air_temperature: Option<f64>,

    /// Metres per second
    #[sea_orm(column_type = "Double", nullable)]
    pub wind_speed: Option<f64>,

    pub phenomenon: Option<String>,

    pub observed_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
