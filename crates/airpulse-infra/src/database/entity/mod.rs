//! SeaORM entities.

pub mod pollution_record;
