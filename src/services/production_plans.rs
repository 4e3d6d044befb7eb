use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    sea_query::Query, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::entities::{building_section, item_master, plant, production_plan};
use crate::errors::ServiceError;
use crate::repositories::records::{active, find_active};

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ProductionPlanInput {
    #[validate(length(min = 1, max = 255))]
    pub order_number: String,
    #[validate(length(max = 255))]
    pub lot_number: Option<String>,
    #[validate(range(min = 0))]
    pub lot_qty: Option<i32>,
    #[validate(length(max = 255))]
    pub item_desc: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub status: Option<String>,
    #[validate(length(max = 255))]
    pub customer_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub stop_time: Option<DateTime<Utc>>,
    pub item_id: Option<i64>,
    pub section_id: Option<i64>,
}

/// Plant filters apply through the plan's section.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductionPlanFilter {
    /// Plant primary key
    pub plant: Option<i64>,
    pub plant_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub item_code: String,
    pub item_description: Option<String>,
}

/// Status card for one production order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderStatus {
    pub po_no: String,
    pub status: Option<String>,
    pub item: Option<OrderItem>,
    pub lot_number: Option<String>,
    pub lot_qty: Option<i32>,
    pub target_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct ProductionPlanService {
    db: Arc<DatabaseConnection>,
}

impl ProductionPlanService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_plans(
        &self,
        filter: &ProductionPlanFilter,
    ) -> Result<Vec<production_plan::Model>, ServiceError> {
        let mut query = active::<production_plan::Entity>();

        if let Some(plant_id) = filter.plant {
            query = query.filter(
                production_plan::Column::SectionId.in_subquery(
                    Query::select()
                        .column(building_section::Column::Id)
                        .from(building_section::Entity)
                        .and_where(building_section::Column::PlantId.eq(plant_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(code) = filter
            .plant_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            query = query.filter(
                production_plan::Column::SectionId.in_subquery(
                    Query::select()
                        .column(building_section::Column::Id)
                        .from(building_section::Entity)
                        .and_where(
                            building_section::Column::PlantId.in_subquery(
                                Query::select()
                                    .column(plant::Column::Id)
                                    .from(plant::Entity)
                                    .and_where(plant::Column::PlantCode.eq(code))
                                    .to_owned(),
                            ),
                        )
                        .to_owned(),
                ),
            );
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    async fn find_by_order(
        &self,
        order_number: &str,
    ) -> Result<Option<production_plan::Model>, ServiceError> {
        production_plan::Entity::find()
            .filter(production_plan::Column::OrderNumber.eq(order_number))
            .filter(production_plan::Column::IsActive.eq(true))
            .one(self.db.as_ref())
            .await
            .map_err(|e| {
                error!("Failed to load production plan {}: {}", order_number, e);
                ServiceError::db_error(e)
            })
    }

    #[instrument(skip(self))]
    pub async fn get_plan(&self, order_number: &str) -> Result<production_plan::Model, ServiceError> {
        self.find_by_order(order_number).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("production plan {} not found", order_number))
        })
    }

    async fn check_references(&self, input: &ProductionPlanInput) -> Result<(), ServiceError> {
        if let Some(item_id) = input.item_id {
            find_active::<item_master::Entity, _>(self.db.as_ref(), item_id)
                .await?
                .ok_or_else(|| ServiceError::InvalidInput(format!("item {} does not exist", item_id)))?;
        }
        if let Some(section_id) = input.section_id {
            find_active::<building_section::Entity, _>(self.db.as_ref(), section_id)
                .await?
                .ok_or_else(|| {
                    ServiceError::InvalidInput(format!("building {} does not exist", section_id))
                })?;
        }
        Ok(())
    }

    /// Order numbers stay unique across active and retired plans.
    async fn ensure_order_free(
        &self,
        order_number: &str,
        current: Option<i64>,
    ) -> Result<(), ServiceError> {
        let mut query = production_plan::Entity::find()
            .filter(production_plan::Column::OrderNumber.eq(order_number));
        if let Some(id) = current {
            query = query.filter(production_plan::Column::Id.ne(id));
        }
        if query.one(self.db.as_ref()).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "production plan {} already exists",
                order_number
            )));
        }
        Ok(())
    }

    fn apply(model: &mut production_plan::ActiveModel, input: ProductionPlanInput) {
        model.order_number = Set(input.order_number);
        model.lot_number = Set(input.lot_number);
        model.lot_qty = Set(input.lot_qty);
        model.item_desc = Set(input.item_desc);
        model.start_date = Set(input.start_date);
        model.target_date = Set(input.target_date);
        model.status = Set(input.status);
        model.customer_name = Set(input.customer_name);
        model.start_time = Set(input.start_time);
        model.stop_time = Set(input.stop_time);
        model.item_id = Set(input.item_id);
        model.section_id = Set(input.section_id);
        model.updated_at = Set(Utc::now());
    }

    #[instrument(skip(self))]
    pub async fn create_plan(
        &self,
        input: ProductionPlanInput,
    ) -> Result<production_plan::Model, ServiceError> {
        input.validate()?;
        self.check_references(&input).await?;
        self.ensure_order_free(&input.order_number, None).await?;

        let mut model = production_plan::ActiveModel {
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        Self::apply(&mut model, input);

        let model = model.insert(self.db.as_ref()).await.map_err(|e| {
            error!("Failed to create production plan: {}", e);
            ServiceError::db_error(e)
        })?;
        info!(order_number = %model.order_number, "production plan created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update_plan(
        &self,
        order_number: &str,
        input: ProductionPlanInput,
    ) -> Result<production_plan::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_plan(order_number).await?;
        self.check_references(&input).await?;
        self.ensure_order_free(&input.order_number, Some(existing.id))
            .await?;

        let mut model: production_plan::ActiveModel = existing.into();
        Self::apply(&mut model, input);
        model
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn delete_plan(&self, order_number: &str) -> Result<(), ServiceError> {
        let existing = self.get_plan(order_number).await?;
        let mut model: production_plan::ActiveModel = existing.into();
        model.is_active = Set(false);
        model.updated_at = Set(Utc::now());
        model
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)?;
        info!(order_number, "production plan deactivated");
        Ok(())
    }

    /// Order status lookup used by the inspection entry screens.
    #[instrument(skip(self))]
    pub async fn order_status(&self, order_number: &str) -> Result<OrderStatus, ServiceError> {
        let plan = self.get_plan(order_number).await?;

        let item = match plan.item_id {
            Some(item_id) => item_master::Entity::find_by_id(item_id)
                .one(self.db.as_ref())
                .await?
                .map(|item| OrderItem {
                    item_code: item.item_code,
                    item_description: item.item_description,
                }),
            None => None,
        };

        Ok(OrderStatus {
            po_no: plan.order_number,
            status: plan.status,
            item,
            lot_number: plan.lot_number,
            lot_qty: plan.lot_qty,
            target_date: plan.target_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_order_number_fails_validation() {
        let input: ProductionPlanInput = serde_json::from_value(serde_json::json!({
            "order_number": "",
            "lot_qty": 10
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn status_serializes_order_as_po_no() {
        let status = OrderStatus {
            po_no: "PO-1".into(),
            status: Some("Released".into()),
            item: None,
            lot_number: None,
            lot_qty: Some(5),
            target_date: None,
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["po_no"], "PO-1");
        assert_eq!(value["lot_qty"], 5);
        assert!(value["item"].is_null());
    }
}
