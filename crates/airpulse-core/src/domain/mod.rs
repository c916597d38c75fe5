//! Domain entities - the core business objects.

mod reading;

mod record;

pub use reading::AirQualityReading;
pub use record::PollutionRecord;
