mod entity;
mod period;
mod risk;

pub use entity::{Entity, EntityKey, EntityRecord, MERGE_MARKER, join_datasets};
pub(crate) use entity::accumulate;
pub use period::{ColumnSchema, Period, PeriodKind, PeriodType};
pub use risk::RiskLevel;
