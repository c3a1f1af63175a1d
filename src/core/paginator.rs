use crate::core::{
    AccessToken, ErrorEvent, ErrorSink, GraphApi, Member, PageRequest, PartialPolicy,
};

pub const DEFAULT_PAGE_SIZE: usize = 500;

/// 依 cursor 逐頁讀取群組成員
pub struct Paginator<'a, A: GraphApi + ?Sized> {
    api: &'a A,
    sink: &'a dyn ErrorSink,
    policy: PartialPolicy,
}

impl<'a, A: GraphApi + ?Sized> Paginator<'a, A> {
    pub fn new(api: &'a A, sink: &'a dyn ErrorSink) -> Self {
        Self {
            api,
            sink,
            policy: PartialPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PartialPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Walks the listing until no `next` cursor is returned.
    ///
    /// A failed page stops the walk; what was accumulated so far is returned
    /// under `PartialPolicy::KeepPartial` and dropped under `Discard`.
    pub async fn fetch_all(
        &self,
        group_id: &str,
        credential: &AccessToken,
        page_size: usize,
    ) -> Vec<Member> {
        let mut request = PageRequest::First {
            group_id: group_id.to_string(),
            limit: page_size.max(1),
        };
        let mut members = Vec::new();
        let mut page = 0usize;

        loop {
            page += 1;
            tracing::debug!(group_id, page, "📡 Requesting member page");

            let result = match self.api.member_page(&request, credential).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(group_id, page, error = %e, "Member page request failed");
                    self.sink
                        .record(ErrorEvent::error(format!("Error fetching group members: {}", e)));
                    println!(
                        "An error occurred while fetching group members. Check the error log for details."
                    );

                    if self.policy == PartialPolicy::Discard {
                        tracing::warn!(
                            group_id,
                            discarded = members.len(),
                            "Discarding partially fetched members"
                        );
                        members.clear();
                    }
                    break;
                }
            };

            members.extend(result.members);
            println!("Fetched {} members so far...", members.len());

            let next = match result.next {
                Some(next) => next,
                None => break,
            };

            // 同一個 cursor 再回傳一次代表 API 沒有前進，避免無限迴圈
            if matches!(&request, PageRequest::Next(current) if *current == next) {
                tracing::warn!(group_id, page, "Listing returned the same cursor twice, stopping");
                self.sink.record(ErrorEvent::warning(format!(
                    "Pagination for group {} stalled on cursor {}",
                    group_id,
                    next.as_str()
                )));
                break;
            }

            request = PageRequest::Next(next);
        }

        tracing::info!(group_id, pages = page, total = members.len(), "Member listing finished");
        members
    }
}
