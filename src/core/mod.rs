pub mod batcher;
pub mod engine;
pub mod filter;
pub mod paginator;
pub mod task_pool;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{
    AccessToken, Cursor, DeleteResponse, ErrorEvent, EventLevel, LocationMatch, Member,
    MemberPage, PageRequest, PartialPolicy, RemovalOutcome, RemovalTask, RunReport, RunSummary,
};
pub use crate::domain::ports::{ConfigProvider, ErrorSink, GraphApi, Selector};
pub use crate::utils::error::Result;
