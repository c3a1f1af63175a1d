//! Scripted `GraphApi` / `ErrorSink` fakes shared by the core unit tests.

use crate::core::{
    AccessToken, Cursor, DeleteResponse, ErrorEvent, ErrorSink, GraphApi, Member, MemberPage,
    PageRequest,
};
use crate::utils::error::{PruneError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) enum TokenScript {
    Valid,
    Invalid,
    Unreachable,
}

pub(crate) struct FakeGraph {
    pub token: TokenScript,
    /// Response for the n-th page call; `Err(status)` simulates a non-2xx reply.
    pub pages: Vec<std::result::Result<MemberPage, u16>>,
    pub profiles: HashMap<String, Member>,
    /// 0-based lookup call numbers that fail.
    pub failing_lookups: HashSet<usize>,
    pub faulty_deletes: HashSet<String>,
    pub rejected_deletes: HashSet<String>,
    pub panicking_deletes: HashSet<String>,
    pub delete_delay: Duration,

    pub page_requests: Mutex<Vec<PageRequest>>,
    pub lookup_calls: Mutex<Vec<Vec<String>>>,
    pub delete_calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self {
            token: TokenScript::Valid,
            pages: Vec::new(),
            profiles: HashMap::new(),
            failing_lookups: HashSet::new(),
            faulty_deletes: HashSet::new(),
            rejected_deletes: HashSet::new(),
            panicking_deletes: HashSet::new(),
            delete_delay: Duration::ZERO,
            page_requests: Mutex::new(Vec::new()),
            lookup_calls: Mutex::new(Vec::new()),
            delete_calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_pages(mut self, pages: Vec<std::result::Result<MemberPage, u16>>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_profiles(mut self, profiles: impl IntoIterator<Item = Member>) -> Self {
        self.profiles = profiles.into_iter().map(|m| (m.id.clone(), m)).collect();
        self
    }

    pub fn lookup_call_count(&self) -> usize {
        self.lookup_calls.lock().unwrap().len()
    }

    pub fn page_call_count(&self) -> usize {
        self.page_requests.lock().unwrap().len()
    }
}

/// Splits `total` sequential members into pages linked by cursors.
pub(crate) fn paged_members(total: usize, page_size: usize) -> Vec<std::result::Result<MemberPage, u16>> {
    let ids: Vec<usize> = (1..=total).collect();
    let chunks: Vec<&[usize]> = ids.chunks(page_size).collect();
    let last = chunks.len().saturating_sub(1);

    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let members = chunk
                .iter()
                .map(|id| Member::new(id.to_string()).with_name(format!("Member {}", id)))
                .collect();
            let next = (index < last).then(|| {
                Cursor::new(format!(
                    "https://graph.test/g/members?limit={}&after=page{}",
                    page_size,
                    index + 1
                ))
            });
            Ok(MemberPage { members, next })
        })
        .collect()
}

#[async_trait]
impl GraphApi for FakeGraph {
    async fn debug_token(&self, _credential: &AccessToken) -> Result<bool> {
        match self.token {
            TokenScript::Valid => Ok(true),
            TokenScript::Invalid => Ok(false),
            TokenScript::Unreachable => Err(PruneError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
        }
    }

    async fn member_page(
        &self,
        request: &PageRequest,
        _credential: &AccessToken,
    ) -> Result<MemberPage> {
        let call = {
            let mut requests = self.page_requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };

        match self.pages.get(call) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(status)) => Err(PruneError::ResponseError {
                status: *status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(MemberPage::default()),
        }
    }

    async fn lookup_members(
        &self,
        ids: &[String],
        _credential: &AccessToken,
    ) -> Result<HashMap<String, Member>> {
        let call = {
            let mut calls = self.lookup_calls.lock().unwrap();
            calls.push(ids.to_vec());
            calls.len() - 1
        };

        if self.failing_lookups.contains(&call) {
            return Err(PruneError::ResponseError {
                status: 500,
                body: "lookup failed".to_string(),
            });
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.profiles.get(id).map(|m| (id.clone(), m.clone())))
            .collect())
    }

    async fn delete_member(
        &self,
        _group_id: &str,
        member_id: &str,
        _credential: &AccessToken,
    ) -> Result<DeleteResponse> {
        self.delete_calls.lock().unwrap().push(member_id.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delete_delay.is_zero() {
            tokio::time::sleep(self.delete_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panicking_deletes.contains(member_id) {
            panic!("scripted panic for {}", member_id);
        }
        if self.faulty_deletes.contains(member_id) {
            return Err(PruneError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        if self.rejected_deletes.contains(member_id) {
            return Ok(DeleteResponse {
                status: 403,
                body: "not an admin".to_string(),
            });
        }

        Ok(DeleteResponse {
            status: 200,
            body: r#"{"success":true}"#.to_string(),
        })
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    pub events: Mutex<Vec<ErrorEvent>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }
}

impl ErrorSink for RecordingSink {
    fn record(&self, event: ErrorEvent) {
        self.events.lock().unwrap().push(event);
    }
}
