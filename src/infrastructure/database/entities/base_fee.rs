//! Base fee entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Base fee per (city, vehicle type); the pair is unique
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "base_fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub city: String,

    pub vehicle_type: String,

    /// Fee in euros
    #[sea_orm(column_type = "Double")]
    pub fee: f64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
