//! SeaORM implementation of BaseFeeRepository

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{conflict_or, db_err, decimal_from_db, decimal_to_db};
use crate::domain::base_fee::{BaseFee, BaseFeeRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::base_fee;

fn entity_to_domain(m: base_fee::Model) -> DomainResult<BaseFee> {
    Ok(BaseFee {
        id: m.id,
        fee: decimal_from_db(m.fee, "base_fees.fee")?,
        city: m.city,
        vehicle_type: m.vehicle_type,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn conflict(fee: &BaseFee) -> DomainError {
    DomainError::Conflict(format!(
        "base fee for city '{}' and vehicle type '{}'",
        fee.city, fee.vehicle_type
    ))
}

async fn find_pair<C: ConnectionTrait>(
    db: &C,
    city: &str,
    vehicle_type: &str,
) -> DomainResult<Option<base_fee::Model>> {
    base_fee::Entity::find()
        .filter(base_fee::Column::City.eq(city))
        .filter(base_fee::Column::VehicleType.eq(vehicle_type))
        .one(db)
        .await
        .map_err(db_err)
}

async fn insert<C: ConnectionTrait>(db: &C, fee: BaseFee) -> DomainResult<BaseFee> {
    if find_pair(db, &fee.city, &fee.vehicle_type).await?.is_some() {
        return Err(conflict(&fee));
    }

    let duplicate = conflict(&fee);
    let now = Utc::now();
    let model = base_fee::ActiveModel {
        id: NotSet,
        city: Set(fee.city),
        vehicle_type: Set(fee.vehicle_type),
        fee: Set(decimal_to_db(fee.fee)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let result = model
        .insert(db)
        .await
        .map_err(|e| conflict_or(e, duplicate))?;
    entity_to_domain(result)
}

pub struct SeaOrmBaseFeeRepository {
    db: DatabaseConnection,
}

impl SeaOrmBaseFeeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseFeeRepository for SeaOrmBaseFeeRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<BaseFee>> {
        let model = base_fee::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(entity_to_domain).transpose()
    }

    async fn find_by_city_and_vehicle(
        &self,
        city: &str,
        vehicle_type: &str,
    ) -> DomainResult<Option<BaseFee>> {
        find_pair(&self.db, city, vehicle_type)
            .await?
            .map(entity_to_domain)
            .transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<BaseFee>> {
        let models = base_fee::Entity::find()
            .order_by_asc(base_fee::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(entity_to_domain).collect()
    }

    async fn save(&self, fee: BaseFee) -> DomainResult<BaseFee> {
        let saved = insert(&self.db, fee).await?;
        info!(
            "Base fee saved: {} / {} = {} ({})",
            saved.city, saved.vehicle_type, saved.fee, saved.id
        );
        Ok(saved)
    }

    async fn save_all(&self, fees: Vec<BaseFee>) -> DomainResult<Vec<BaseFee>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let mut saved = Vec::with_capacity(fees.len());
        for fee in fees {
            // Dropping `txn` on error rolls the batch back
            saved.push(insert(&txn, fee).await?);
        }
        txn.commit().await.map_err(db_err)?;
        info!("Base fees saved in batch: {}", saved.len());
        Ok(saved)
    }

    async fn update(&self, fee: BaseFee) -> DomainResult<BaseFee> {
        let existing = base_fee::Entity::find_by_id(fee.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("BaseFee", fee.id))?;

        if let Some(other) = find_pair(&self.db, &fee.city, &fee.vehicle_type).await? {
            if other.id != fee.id {
                return Err(conflict(&fee));
            }
        }

        let duplicate = conflict(&fee);
        let mut model: base_fee::ActiveModel = existing.into();
        model.city = Set(fee.city);
        model.vehicle_type = Set(fee.vehicle_type);
        model.fee = Set(decimal_to_db(fee.fee));
        model.updated_at = Set(Utc::now());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| conflict_or(e, duplicate))?;
        info!("Base fee updated: {}", result.id);
        entity_to_domain(result)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = base_fee::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("BaseFee", id));
        }
        info!("Base fee deleted: {}", id);
        Ok(())
    }
}
