use crate::domain::model::{
    AccessToken, DeleteResponse, ErrorEvent, LocationMatch, Member, MemberPage, PageRequest,
    PartialPolicy,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Remote group API. Non-2xx on the read endpoints comes back as
/// `PruneError::ResponseError`; connection faults as `TransportError`.
#[async_trait]
pub trait GraphApi: Send + Sync {
    /// `data.is_valid` of the token-debug endpoint.
    async fn debug_token(&self, credential: &AccessToken) -> Result<bool>;

    async fn member_page(&self, request: &PageRequest, credential: &AccessToken)
        -> Result<MemberPage>;

    async fn lookup_members(
        &self,
        ids: &[String],
        credential: &AccessToken,
    ) -> Result<HashMap<String, Member>>;

    async fn delete_member(
        &self,
        group_id: &str,
        member_id: &str,
        credential: &AccessToken,
    ) -> Result<DeleteResponse>;
}

/// Append-only error log. Never read back by the core.
pub trait ErrorSink: Send + Sync {
    fn record(&self, event: ErrorEvent);
}

pub trait Selector {
    fn select(&mut self, candidates: &[Member]) -> Result<Vec<Member>>;
}

pub trait ConfigProvider: Send + Sync {
    fn group_id(&self) -> &str;
    fn access_token(&self) -> &str;
    fn location(&self) -> &str;
    fn api_url(&self) -> &str;
    fn page_size(&self) -> usize;
    fn batch_size(&self) -> usize;
    fn concurrency(&self) -> usize;
    fn error_log_path(&self) -> &str;
    fn location_match(&self) -> LocationMatch;
    fn partial_policy(&self) -> PartialPolicy;
}
