//! Pollution record entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pollution_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub city: String,
    pub aqi: Option<f64>,
    pub pm25: Option<f64>,
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for airpulse_core::domain::PollutionRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            city: model.city,
            aqi: model.aqi,
            pm25: model.pm25,
            co: model.co,
            no2: model.no2,
            timestamp: model.timestamp.into(),
        }
    }
}

impl From<airpulse_core::domain::PollutionRecord> for ActiveModel {
    fn from(record: airpulse_core::domain::PollutionRecord) -> Self {
        Self {
            id: Set(record.id),
            city: Set(record.city),
            aqi: Set(record.aqi),
            pm25: Set(record.pm25),
            co: Set(record.co),
            no2: Set(record.no2),
            timestamp: Set(record.timestamp.into()),
        }
    }
}
