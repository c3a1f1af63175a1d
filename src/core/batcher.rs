use crate::core::{AccessToken, ErrorEvent, ErrorSink, GraphApi, Member};
use std::collections::HashMap;

/// The bulk lookup endpoint accepts at most this many ids per call.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Contiguous, order-preserving chunks of at most `batch_size` ids.
pub fn batches(ids: &[String], batch_size: usize) -> std::slice::Chunks<'_, String> {
    ids.chunks(batch_size.max(1))
}

/// 以批次查詢補齊成員的 location 等欄位
pub struct MetadataFetcher<'a, A: GraphApi + ?Sized> {
    api: &'a A,
    sink: &'a dyn ErrorSink,
}

impl<'a, A: GraphApi + ?Sized> MetadataFetcher<'a, A> {
    pub fn new(api: &'a A, sink: &'a dyn ErrorSink) -> Self {
        Self { api, sink }
    }

    /// One lookup per chunk. A failed chunk contributes nothing and the
    /// remaining chunks still run. Keys the API returns outside the
    /// requested chunk are ignored.
    pub async fn fetch_metadata(
        &self,
        ids: &[String],
        credential: &AccessToken,
        batch_size: usize,
    ) -> HashMap<String, Member> {
        let total = ids.len();
        let mut merged = HashMap::with_capacity(total);
        let mut processed = 0usize;

        for (batch, chunk) in batches(ids, batch_size).enumerate() {
            tracing::debug!(batch, size = chunk.len(), "📡 Looking up member metadata");

            match self.api.lookup_members(chunk, credential).await {
                Ok(found) => {
                    let requested = found.len();
                    merged.extend(found.into_iter().filter(|(id, _)| chunk.contains(id)));
                    tracing::debug!(batch, returned = requested, "Metadata batch merged");
                }
                Err(e) => {
                    tracing::error!(batch, error = %e, "Metadata batch failed");
                    self.sink
                        .record(ErrorEvent::error(format!("Error fetching metadata batch: {}", e)));
                }
            }

            processed += chunk.len();
            println!("Processed {} / {} members...", processed, total);
        }

        merged
    }
}
