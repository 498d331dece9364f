pub mod aggregation;
pub mod calendar;
pub mod error;
pub mod measurement;
pub mod summary;
pub mod tariff;
pub mod unit_value;
