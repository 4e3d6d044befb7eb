//! Soft-delete aware access shared by every table keyed by an `i64` id.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Select,
};

use crate::entities::{
    building_section, inspection_schedule, item_master, operation_master, parameter, plant,
    production_plan,
};

/// Tables carrying `id`, `is_active` and `updated_at`.
pub trait SoftDeletable: EntityTrait {
    /// Singular noun used in error messages.
    const LABEL: &'static str;

    fn id_column() -> Self::Column;
    fn is_active_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;
}

macro_rules! soft_deletable {
    ($($module:ident => $label:literal),+ $(,)?) => {
        $(
            impl SoftDeletable for $module::Entity {
                const LABEL: &'static str = $label;

                fn id_column() -> Self::Column {
                    $module::Column::Id
                }

                fn is_active_column() -> Self::Column {
                    $module::Column::IsActive
                }

                fn updated_at_column() -> Self::Column {
                    $module::Column::UpdatedAt
                }
            }
        )+
    };
}

soft_deletable! {
    plant => "plant",
    building_section => "building",
    item_master => "item",
    operation_master => "operation",
    parameter => "parameter",
    production_plan => "production plan",
    inspection_schedule => "inspection schedule",
}

/// Active rows ordered by id.
pub fn active<E: SoftDeletable>() -> Select<E> {
    E::find()
        .filter(E::is_active_column().eq(true))
        .order_by_asc(E::id_column())
}

/// Active row by id.
pub async fn find_active<E, C>(conn: &C, id: i64) -> Result<Option<E::Model>, DbErr>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    E::find()
        .filter(E::id_column().eq(id))
        .filter(E::is_active_column().eq(true))
        .one(conn)
        .await
}

/// Clears `is_active`. Returns false when no active row had that id.
pub async fn deactivate<E, C>(conn: &C, id: i64) -> Result<bool, DbErr>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(E::is_active_column(), Expr::value(false))
        .col_expr(E::updated_at_column(), Expr::value(Utc::now()))
        .filter(E::id_column().eq(id))
        .filter(E::is_active_column().eq(true))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}
