//! SeaORM implementation of ExtraFeeRepository

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{db_err, decimal_from_db, decimal_to_db, optional_decimal_from_db};
use crate::domain::extra_fee::{ConditionType, ExtraFee, ExtraFeeRepository, FeeCondition};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::extra_fee;

fn entity_to_domain(m: extra_fee::Model) -> DomainResult<ExtraFee> {
    let id = m.id;
    let condition = FeeCondition::from_columns(
        m.condition_type.into(),
        optional_decimal_from_db(m.min_value, "extra_fees.min_value")?,
        optional_decimal_from_db(m.max_value, "extra_fees.max_value")?,
        m.weather_phenomenon,
        m.is_forbidden,
    )
    .map_err(|e| DomainError::Storage(format!("extra fee {} is malformed: {}", id, e)))?;

    Ok(ExtraFee {
        id,
        vehicle_type: m.vehicle_type,
        fee: decimal_from_db(m.fee, "extra_fees.fee")?,
        condition,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

/// Write the flat row columns of a rule into `model`.
fn apply_columns(model: &mut extra_fee::ActiveModel, fee: &ExtraFee) {
    let condition = &fee.condition;
    model.condition_type = Set(condition.condition_type().into());
    model.vehicle_type = Set(fee.vehicle_type.clone());
    model.min_value = Set(condition.min_value().map(decimal_to_db));
    model.max_value = Set(condition.max_value().map(decimal_to_db));
    model.weather_phenomenon = Set(condition.phenomenon().map(str::to_string));
    model.is_forbidden = Set(condition.is_forbidden());
    model.fee = Set(decimal_to_db(fee.fee));
}

async fn insert<C: ConnectionTrait>(db: &C, fee: ExtraFee) -> DomainResult<ExtraFee> {
    let now = Utc::now();
    let mut model = extra_fee::ActiveModel {
        id: NotSet,
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    apply_columns(&mut model, &fee);
    let result = model.insert(db).await.map_err(db_err)?;
    entity_to_domain(result)
}

pub struct SeaOrmExtraFeeRepository {
    db: DatabaseConnection,
}

impl SeaOrmExtraFeeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ExtraFeeRepository for SeaOrmExtraFeeRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ExtraFee>> {
        let model = extra_fee::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(entity_to_domain).transpose()
    }

    async fn find_by_condition(
        &self,
        condition_type: ConditionType,
        vehicle_type: &str,
    ) -> DomainResult<Vec<ExtraFee>> {
        let models = extra_fee::Entity::find()
            .filter(extra_fee::Column::ConditionType.eq(extra_fee::ConditionType::from(condition_type)))
            .filter(extra_fee::Column::VehicleType.eq(vehicle_type))
            .order_by_asc(extra_fee::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(entity_to_domain).collect()
    }

    async fn find_all(&self) -> DomainResult<Vec<ExtraFee>> {
        let models = extra_fee::Entity::find()
            .order_by_asc(extra_fee::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(entity_to_domain).collect()
    }

    async fn save(&self, fee: ExtraFee) -> DomainResult<ExtraFee> {
        let saved = insert(&self.db, fee).await?;
        info!(
            "Extra fee saved: {} {} ({})",
            saved.condition_type(),
            saved.vehicle_type,
            saved.id
        );
        Ok(saved)
    }

    async fn save_all(&self, fees: Vec<ExtraFee>) -> DomainResult<Vec<ExtraFee>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let mut saved = Vec::with_capacity(fees.len());
        for fee in fees {
            saved.push(insert(&txn, fee).await?);
        }
        txn.commit().await.map_err(db_err)?;
        info!("Extra fees saved in batch: {}", saved.len());
        Ok(saved)
    }

    async fn update(&self, fee: ExtraFee) -> DomainResult<ExtraFee> {
        let existing = extra_fee::Entity::find_by_id(fee.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("ExtraFee", fee.id))?;

        let mut model: extra_fee::ActiveModel = existing.into();
        apply_columns(&mut model, &fee);
        model.updated_at = Set(Utc::now());

        let result = model.update(&self.db).await.map_err(db_err)?;
        info!("Extra fee updated: {}", result.id);
        entity_to_domain(result)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = extra_fee::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("ExtraFee", id));
        }
        info!("Extra fee deleted: {}", id);
        Ok(())
    }
}
