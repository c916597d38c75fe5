use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PollutionRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PollutionRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PollutionRecords::City).text().not_null())
                    .col(ColumnDef::new(PollutionRecords::Aqi).double())
                    .col(ColumnDef::new(PollutionRecords::Pm25).double())
                    .col(ColumnDef::new(PollutionRecords::Co).double())
                    .col(ColumnDef::new(PollutionRecords::No2).double())
                    .col(
                        ColumnDef::new(PollutionRecords::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Serves the latest-per-city and history lookups.
        manager
            .create_index(
                Index::create()
                    .name("idx_pollution_records_city_timestamp")
                    .table(PollutionRecords::Table)
                    .col(PollutionRecords::City)
                    .col(PollutionRecords::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PollutionRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PollutionRecords {
    Table,
    Id,
    City,
    Aqi,
    Pm25,
    Co,
    No2,
    Timestamp,
}
