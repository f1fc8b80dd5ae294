pub mod etl;
pub mod summary;
pub mod transform;

pub use crate::domain::model::{
    CoercionPolicy, LocationRecord, QuerySettings, RawRow, TimeRange, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, QueryRunner, Storage};
pub use crate::utils::error::Result;
