use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_master_tables::Migration),
            Box::new(m20240301_000002_create_inspection_tables::Migration),
        ]
    }
}

/// Surrogate key shared by every table.
fn id_column<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

/// Soft-delete flag and timestamps carried by every row.
fn audit_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Alias::new("is_active"))
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Alias::new("updated_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
}

fn unique_index<T: IntoIden + 'static>(
    name: &str,
    table: T,
    columns: Vec<Alias>,
) -> IndexCreateStatement {
    let mut index = Index::create();
    index.if_not_exists().name(name).table(table).unique();
    for column in columns {
        index.col(column);
    }
    index.to_owned()
}

fn plain_index<T: IntoIden + 'static, C: IntoIden + 'static>(
    name: &str,
    table: T,
    column: C,
) -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name(name)
        .table(table)
        .col(column)
        .to_owned()
}

mod m20240301_000001_create_master_tables {

    use super::{audit_columns, id_column, plain_index, unique_index};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_master_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    audit_columns(
                        Table::create()
                            .table(Plants::Table)
                            .if_not_exists()
                            .col(id_column(Plants::Id))
                            .col(ColumnDef::new(Plants::PlantCode).string().not_null())
                            .col(ColumnDef::new(Plants::PlantName).string().null())
                            .col(ColumnDef::new(Plants::PlantAddress).text().null()),
                    )
                    .to_owned(),
                )
                .await?;
            manager
                .create_index(unique_index(
                    "ux_plants_plant_code",
                    Plants::Table,
                    vec![Alias::new("plant_code")],
                ))
                .await?;

            manager
                .create_table(
                    audit_columns(
                        Table::create()
                            .table(BuildingSections::Table)
                            .if_not_exists()
                            .col(id_column(BuildingSections::Id))
                            .col(
                                ColumnDef::new(BuildingSections::PlantId)
                                    .big_integer()
                                    .not_null(),
                            )
                            .col(
                                ColumnDef::new(BuildingSections::BuildingCode)
                                    .string()
                                    .not_null(),
                            )
                            .col(ColumnDef::new(BuildingSections::BuildingName).string().null())
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_building_sections_plant_id")
                                    .from(BuildingSections::Table, BuildingSections::PlantId)
                                    .to(Plants::Table, Plants::Id),
                            ),
                    )
                    .to_owned(),
                )
                .await?;
            manager
                .create_index(unique_index(
                    "ux_building_sections_plant_code",
                    BuildingSections::Table,
                    vec![Alias::new("plant_id"), Alias::new("building_code")],
                ))
                .await?;

            for (table, fk_prefix, unique_name) in [
                (ItemMasters::Table, "fk_item_masters", "ux_item_masters_code"),
                (
                    ItemMasters::FaiTable,
                    "fk_fai_item_masters",
                    "ux_fai_item_masters_code",
                ),
            ] {
                manager
                    .create_table(
                        audit_columns(
                            Table::create()
                                .table(table)
                                .if_not_exists()
                                .col(id_column(ItemMasters::Id))
                                .col(ColumnDef::new(ItemMasters::PlantId).big_integer().not_null())
                                .col(
                                    ColumnDef::new(ItemMasters::BuildingId)
                                        .big_integer()
                                        .not_null(),
                                )
                                .col(ColumnDef::new(ItemMasters::ItemCode).string().not_null())
                                .col(ColumnDef::new(ItemMasters::ItemDescription).string().null())
                                .col(ColumnDef::new(ItemMasters::Unit).string().null())
                                .col(ColumnDef::new(ItemMasters::ItemType).string().null())
                                .col(ColumnDef::new(ItemMasters::EndStore).string().null())
                                .foreign_key(
                                    ForeignKey::create()
                                        .name(format!("{fk_prefix}_plant_id"))
                                        .from(table, ItemMasters::PlantId)
                                        .to(Plants::Table, Plants::Id),
                                )
                                .foreign_key(
                                    ForeignKey::create()
                                        .name(format!("{fk_prefix}_building_id"))
                                        .from(table, ItemMasters::BuildingId)
                                        .to(BuildingSections::Table, BuildingSections::Id),
                                ),
                        )
                        .to_owned(),
                    )
                    .await?;
                manager
                    .create_index(unique_index(
                        unique_name,
                        table,
                        vec![
                            Alias::new("plant_id"),
                            Alias::new("building_id"),
                            Alias::new("item_code"),
                        ],
                    ))
                    .await?;
            }

            for (table, item_table, fk_prefix, unique_name) in [
                (
                    OperationMasters::Table,
                    ItemMasters::Table,
                    "fk_operation_masters",
                    "ux_operation_masters_code",
                ),
                (
                    OperationMasters::FaiTable,
                    ItemMasters::FaiTable,
                    "fk_fai_operation_masters",
                    "ux_fai_operation_masters_code",
                ),
            ] {
                manager
                    .create_table(
                        audit_columns(
                            Table::create()
                                .table(table)
                                .if_not_exists()
                                .col(id_column(OperationMasters::Id))
                                .col(
                                    ColumnDef::new(OperationMasters::PlantId)
                                        .big_integer()
                                        .not_null(),
                                )
                                .col(
                                    ColumnDef::new(OperationMasters::BuildingId)
                                        .big_integer()
                                        .not_null(),
                                )
                                .col(
                                    ColumnDef::new(OperationMasters::ItemId)
                                        .big_integer()
                                        .not_null(),
                                )
                                .col(
                                    ColumnDef::new(OperationMasters::OperationCode)
                                        .string()
                                        .not_null(),
                                )
                                .col(ColumnDef::new(OperationMasters::OperationName).string().null())
                                .col(
                                    ColumnDef::new(OperationMasters::OperationDescription)
                                        .string()
                                        .null(),
                                )
                                .foreign_key(
                                    ForeignKey::create()
                                        .name(format!("{fk_prefix}_plant_id"))
                                        .from(table, OperationMasters::PlantId)
                                        .to(Plants::Table, Plants::Id),
                                )
                                .foreign_key(
                                    ForeignKey::create()
                                        .name(format!("{fk_prefix}_building_id"))
                                        .from(table, OperationMasters::BuildingId)
                                        .to(BuildingSections::Table, BuildingSections::Id),
                                )
                                .foreign_key(
                                    ForeignKey::create()
                                        .name(format!("{fk_prefix}_item_id"))
                                        .from(table, OperationMasters::ItemId)
                                        .to(item_table, ItemMasters::Id),
                                ),
                        )
                        .to_owned(),
                    )
                    .await?;
                manager
                    .create_index(unique_index(
                        unique_name,
                        table,
                        vec![
                            Alias::new("building_id"),
                            Alias::new("item_id"),
                            Alias::new("operation_code"),
                        ],
                    ))
                    .await?;
            }

            manager
                .create_table(
                    audit_columns(
                        Table::create()
                            .table(Parameters::Table)
                            .if_not_exists()
                            .col(id_column(Parameters::Id))
                            .col(ColumnDef::new(Parameters::PlantId).big_integer().not_null())
                            .col(ColumnDef::new(Parameters::ParameterCode).string().not_null())
                            .col(ColumnDef::new(Parameters::ParameterName).string().null())
                            .col(ColumnDef::new(Parameters::ParameterDescription).string().null())
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_parameters_plant_id")
                                    .from(Parameters::Table, Parameters::PlantId)
                                    .to(Plants::Table, Plants::Id),
                            ),
                    )
                    .to_owned(),
                )
                .await?;
            manager
                .create_index(unique_index(
                    "ux_parameters_plant_name",
                    Parameters::Table,
                    vec![Alias::new("plant_id"), Alias::new("parameter_name")],
                ))
                .await?;

            manager
                .create_table(
                    audit_columns(
                        Table::create()
                            .table(ProductionPlans::Table)
                            .if_not_exists()
                            .col(id_column(ProductionPlans::Id))
                            .col(
                                ColumnDef::new(ProductionPlans::OrderNumber)
                                    .string()
                                    .not_null(),
                            )
                            .col(ColumnDef::new(ProductionPlans::LotNumber).string().null())
                            .col(ColumnDef::new(ProductionPlans::LotQty).integer().null())
                            .col(ColumnDef::new(ProductionPlans::ItemDesc).string().null())
                            .col(ColumnDef::new(ProductionPlans::StartDate).date().null())
                            .col(ColumnDef::new(ProductionPlans::TargetDate).date().null())
                            .col(ColumnDef::new(ProductionPlans::Status).string().null())
                            .col(ColumnDef::new(ProductionPlans::CustomerName).string().null())
                            .col(
                                ColumnDef::new(ProductionPlans::StartTime)
                                    .timestamp_with_time_zone()
                                    .null(),
                            )
                            .col(
                                ColumnDef::new(ProductionPlans::StopTime)
                                    .timestamp_with_time_zone()
                                    .null(),
                            )
                            .col(ColumnDef::new(ProductionPlans::ItemId).big_integer().null())
                            .col(ColumnDef::new(ProductionPlans::SectionId).big_integer().null())
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_production_plans_item_id")
                                    .from(ProductionPlans::Table, ProductionPlans::ItemId)
                                    .to(ItemMasters::Table, ItemMasters::Id),
                            )
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_production_plans_section_id")
                                    .from(ProductionPlans::Table, ProductionPlans::SectionId)
                                    .to(BuildingSections::Table, BuildingSections::Id),
                            ),
                    )
                    .to_owned(),
                )
                .await?;
            manager
                .create_index(unique_index(
                    "ux_production_plans_order_number",
                    ProductionPlans::Table,
                    vec![Alias::new("order_number")],
                ))
                .await?;

            manager
                .create_index(plain_index(
                    "idx_production_plans_section_id",
                    ProductionPlans::Table,
                    ProductionPlans::SectionId,
                ))
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for table in [
                ProductionPlans::Table.into_iden(),
                Parameters::Table.into_iden(),
                OperationMasters::FaiTable.into_iden(),
                OperationMasters::Table.into_iden(),
                ItemMasters::FaiTable.into_iden(),
                ItemMasters::Table.into_iden(),
                BuildingSections::Table.into_iden(),
                Plants::Table.into_iden(),
            ] {
                manager
                    .drop_table(Table::drop().table(table).if_exists().to_owned())
                    .await?;
            }
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum Plants {
        Table,
        Id,
        PlantCode,
        PlantName,
        PlantAddress,
    }

    #[derive(DeriveIden)]
    enum BuildingSections {
        Table,
        Id,
        PlantId,
        BuildingCode,
        BuildingName,
    }

    #[derive(Clone, Copy, DeriveIden)]
    enum ItemMasters {
        Table,
        #[sea_orm(iden = "fai_item_masters")]
        FaiTable,
        Id,
        PlantId,
        BuildingId,
        ItemCode,
        ItemDescription,
        Unit,
        ItemType,
        EndStore,
    }

    #[derive(Clone, Copy, DeriveIden)]
    enum OperationMasters {
        Table,
        #[sea_orm(iden = "fai_operation_masters")]
        FaiTable,
        Id,
        PlantId,
        BuildingId,
        ItemId,
        OperationCode,
        OperationName,
        OperationDescription,
    }

    #[derive(DeriveIden)]
    enum Parameters {
        Table,
        Id,
        PlantId,
        ParameterCode,
        ParameterName,
        ParameterDescription,
    }

    #[derive(DeriveIden)]
    enum ProductionPlans {
        Table,
        Id,
        OrderNumber,
        LotNumber,
        LotQty,
        ItemDesc,
        StartDate,
        TargetDate,
        Status,
        CustomerName,
        StartTime,
        StopTime,
        ItemId,
        SectionId,
    }
}

mod m20240301_000002_create_inspection_tables {

    use super::{audit_columns, id_column, plain_index};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_inspection_tables"
        }
    }

    /// Physical tables of one inspection pipeline.
    struct ChainTables {
        schedules: &'static str,
        item_masters: &'static str,
        operation_masters: &'static str,
        readings: &'static str,
        order_field: &'static str,
        actuals: &'static str,
    }

    const CHAINS: [ChainTables; 3] = [
        ChainTables {
            schedules: "inspection_schedules",
            item_masters: "item_masters",
            operation_masters: "operation_masters",
            readings: "rm_inspection_readings",
            order_field: "io_no",
            actuals: "rm_actual_readings",
        },
        ChainTables {
            schedules: "inspection_schedules",
            item_masters: "item_masters",
            operation_masters: "operation_masters",
            readings: "inprocess_inspection_readings",
            order_field: "po_no",
            actuals: "inprocess_actual_readings",
        },
        ChainTables {
            schedules: "fai_inspection_schedules",
            item_masters: "fai_item_masters",
            operation_masters: "fai_operation_masters",
            readings: "fai_inspection_readings",
            order_field: "po_no",
            actuals: "fai_actual_readings",
        },
    ];

    fn create_schedule_table(chain: &ChainTables) -> TableCreateStatement {
        let table = Alias::new(chain.schedules);
        let fk = |column: &str| format!("fk_{}_{}", chain.schedules, column);

        let mut statement = Table::create();
        statement
            .table(table.clone())
            .if_not_exists()
            .col(id_column(Schedules::Id))
            .col(ColumnDef::new(Schedules::PlantId).big_integer().not_null())
            .col(ColumnDef::new(Schedules::BuildingId).big_integer().not_null())
            .col(ColumnDef::new(Schedules::ItemId).big_integer().not_null())
            .col(ColumnDef::new(Schedules::OperationId).big_integer().null())
            .col(ColumnDef::new(Schedules::ParameterId).big_integer().not_null())
            .col(ColumnDef::new(Schedules::EndStore).string().null())
            .col(
                ColumnDef::new(Schedules::InspectionParameterName)
                    .string()
                    .null(),
            )
            .col(ColumnDef::new(Schedules::ShortText).string().null())
            .col(ColumnDef::new(Schedules::InspectionType).string().null())
            .col(ColumnDef::new(Schedules::Lsl).double().null())
            .col(ColumnDef::new(Schedules::TargetValue).double().null())
            .col(ColumnDef::new(Schedules::Usl).double().null())
            .col(ColumnDef::new(Schedules::SampleSize).integer().null())
            .col(ColumnDef::new(Schedules::InspectionFrequency).string().null())
            .col(ColumnDef::new(Schedules::InspectionMethod).string().null())
            .col(ColumnDef::new(Schedules::MachineType).string().null())
            .col(ColumnDef::new(Schedules::RecordingType).string().null())
            .col(ColumnDef::new(Schedules::AttachmentDocument).string().null())
            .col(ColumnDef::new(Schedules::ControlLimit).string().null())
            .col(
                ColumnDef::new(Schedules::LikelyDefectsClassification)
                    .string()
                    .null(),
            )
            .col(ColumnDef::new(Schedules::Remarks).string().null())
            .foreign_key(
                ForeignKey::create()
                    .name(fk("plant_id"))
                    .from(table.clone(), Schedules::PlantId)
                    .to(Alias::new("plants"), Alias::new("id")),
            )
            .foreign_key(
                ForeignKey::create()
                    .name(fk("building_id"))
                    .from(table.clone(), Schedules::BuildingId)
                    .to(Alias::new("building_sections"), Alias::new("id")),
            )
            .foreign_key(
                ForeignKey::create()
                    .name(fk("item_id"))
                    .from(table.clone(), Schedules::ItemId)
                    .to(Alias::new(chain.item_masters), Alias::new("id")),
            )
            .foreign_key(
                ForeignKey::create()
                    .name(fk("operation_id"))
                    .from(table.clone(), Schedules::OperationId)
                    .to(Alias::new(chain.operation_masters), Alias::new("id")),
            )
            .foreign_key(
                ForeignKey::create()
                    .name(fk("parameter_id"))
                    .from(table, Schedules::ParameterId)
                    .to(Alias::new("parameters"), Alias::new("id")),
            );
        audit_columns(&mut statement).to_owned()
    }

    fn create_reading_table(chain: &ChainTables) -> TableCreateStatement {
        let table = Alias::new(chain.readings);

        let mut statement = Table::create();
        statement
            .table(table.clone())
            .if_not_exists()
            .col(id_column(Readings::Id))
            .col(ColumnDef::new(Readings::ScheduleId).big_integer().not_null())
            .col(ColumnDef::new(Alias::new(chain.order_field)).string().null())
            .col(ColumnDef::new(Readings::MachineId).string().null())
            .col(ColumnDef::new(Readings::InputType).string().null())
            .col(ColumnDef::new(Readings::Remarks).string().null())
            .col(ColumnDef::new(Readings::AttachmentDocument).string().null())
            .col(ColumnDef::new(Readings::CreatedBy).string().null())
            .foreign_key(
                ForeignKey::create()
                    .name(format!("fk_{}_schedule_id", chain.readings))
                    .from(table, Readings::ScheduleId)
                    .to(Alias::new(chain.schedules), Alias::new("id")),
            );
        audit_columns(&mut statement).to_owned()
    }

    fn create_actual_table(chain: &ChainTables) -> TableCreateStatement {
        let table = Alias::new(chain.actuals);

        let mut statement = Table::create();
        statement
            .table(table.clone())
            .if_not_exists()
            .col(id_column(Actuals::Id))
            .col(ColumnDef::new(Actuals::ReadingId).big_integer().not_null())
            .col(ColumnDef::new(Actuals::RKey).string().null())
            .col(ColumnDef::new(Actuals::RValue).double().null())
            .col(ColumnDef::new(Actuals::CreatedBy).string().null())
            .foreign_key(
                ForeignKey::create()
                    .name(format!("fk_{}_reading_id", chain.actuals))
                    .from(table, Actuals::ReadingId)
                    .to(Alias::new(chain.readings), Alias::new("id")),
            );
        audit_columns(&mut statement).to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for chain in &CHAINS {
                // Inward and In-process share the standard schedule table.
                manager.create_table(create_schedule_table(chain)).await?;
                manager
                    .create_index(plain_index(
                        &format!("idx_{}_inspection_type", chain.schedules),
                        Alias::new(chain.schedules),
                        Schedules::InspectionType,
                    ))
                    .await?;

                manager.create_table(create_reading_table(chain)).await?;
                manager
                    .create_index(plain_index(
                        &format!("idx_{}_schedule_id", chain.readings),
                        Alias::new(chain.readings),
                        Readings::ScheduleId,
                    ))
                    .await?;

                manager.create_table(create_actual_table(chain)).await?;
                manager
                    .create_index(plain_index(
                        &format!("idx_{}_reading_id", chain.actuals),
                        Alias::new(chain.actuals),
                        Actuals::ReadingId,
                    ))
                    .await?;
            }
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let children = CHAINS
                .iter()
                .flat_map(|chain| [chain.actuals, chain.readings]);
            let schedules = ["inspection_schedules", "fai_inspection_schedules"];
            for table in children.chain(schedules) {
                manager
                    .drop_table(
                        Table::drop()
                            .table(Alias::new(table))
                            .if_exists()
                            .to_owned(),
                    )
                    .await?;
            }
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum Schedules {
        Id,
        PlantId,
        BuildingId,
        ItemId,
        OperationId,
        ParameterId,
        EndStore,
        InspectionParameterName,
        ShortText,
        InspectionType,
        Lsl,
        TargetValue,
        Usl,
        SampleSize,
        InspectionFrequency,
        InspectionMethod,
        MachineType,
        RecordingType,
        AttachmentDocument,
        ControlLimit,
        LikelyDefectsClassification,
        Remarks,
    }

    #[derive(DeriveIden)]
    enum Readings {
        Id,
        ScheduleId,
        MachineId,
        InputType,
        Remarks,
        AttachmentDocument,
        CreatedBy,
    }

    #[derive(DeriveIden)]
    enum Actuals {
        Id,
        ReadingId,
        RKey,
        RValue,
        CreatedBy,
    }
}
