//! Service database entity for SeaORM.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;

use domain::{DomainError, NewService, Service, ServiceStatus, PRICE_SCALE};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_name: String,
    pub service_type: String,
    pub scheduled_at: DateTimeUtc,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for Service {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let price = model.price.to_f64().ok_or_else(|| {
            DomainError::internal(format!("Price of service {} is not representable", model.id))
        })?;

        Ok(Service {
            id: model.id,
            customer_name: model.customer_name,
            service_type: model.service_type,
            scheduled_at: model.scheduled_at,
            price,
            status: model.status.parse::<ServiceStatus>()?,
        })
    }
}

/// Convert a price to the column's fixed scale.
pub fn price_to_decimal(price: f64) -> Result<Decimal, DomainError> {
    Decimal::from_f64(price)
        .map(|d| d.round_dp(PRICE_SCALE))
        .ok_or_else(|| DomainError::internal(format!("Price {} is not representable", price)))
}

/// Active model for inserting a new row; the store assigns the id.
pub fn insert_model(new: &NewService) -> Result<ActiveModel, DomainError> {
    Ok(ActiveModel {
        id: ActiveValue::NotSet,
        customer_name: ActiveValue::Set(new.customer_name.clone()),
        service_type: ActiveValue::Set(new.service_type.clone()),
        scheduled_at: ActiveValue::Set(new.scheduled_at),
        price: ActiveValue::Set(price_to_decimal(new.price)?),
        status: ActiveValue::Set(new.status.to_string()),
    })
}

/// Active model that overwrites every column of an existing row.
pub fn update_model(service: &Service) -> Result<ActiveModel, DomainError> {
    Ok(ActiveModel {
        id: ActiveValue::Unchanged(service.id),
        customer_name: ActiveValue::Set(service.customer_name.clone()),
        service_type: ActiveValue::Set(service.service_type.clone()),
        scheduled_at: ActiveValue::Set(service.scheduled_at),
        price: ActiveValue::Set(price_to_decimal(service.price)?),
        status: ActiveValue::Set(service.status.to_string()),
    })
}
