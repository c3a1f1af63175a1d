use crate::domain::model::{AccessToken, Cursor, DeleteResponse, Member, MemberPage, PageRequest};
use crate::domain::ports::GraphApi;
use crate::utils::error::{PruneError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://graph.facebook.com/v16.0";

const LOOKUP_FIELDS: &str = "id,name,location";

#[derive(Debug, Deserialize)]
struct DebugTokenResponse {
    data: Option<TokenData>,
}

#[derive(Debug, Deserialize)]
struct TokenData {
    is_valid: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct MembersResponse {
    #[serde(default)]
    data: Vec<MemberRecord>,
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemberRecord {
    id: String,
    name: Option<String>,
    location: Option<LocationRecord>,
}

#[derive(Debug, Deserialize)]
struct LocationRecord {
    name: Option<String>,
}

impl From<MemberRecord> for Member {
    fn from(record: MemberRecord) -> Self {
        Member {
            id: record.id,
            name: record.name,
            location: record
                .location
                .and_then(|l| l.name)
                .filter(|name| !name.is_empty()),
        }
    }
}

/// reqwest 實作的 Graph API client
#[derive(Debug, Clone)]
pub struct GraphClient {
    client: Client,
    base_url: String,
}

impl GraphClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PruneError::ResponseError {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl GraphApi for GraphClient {
    async fn debug_token(&self, credential: &AccessToken) -> Result<bool> {
        let url = format!("{}/debug_token", self.base_url);
        let request = self.client.get(&url).query(&[
            ("input_token", credential.expose()),
            ("access_token", credential.expose()),
        ]);

        let body: DebugTokenResponse = self.send_json(request).await?;
        Ok(body.data.and_then(|d| d.is_valid).unwrap_or(false))
    }

    async fn member_page(
        &self,
        request: &PageRequest,
        credential: &AccessToken,
    ) -> Result<MemberPage> {
        let builder = match request {
            PageRequest::First { group_id, limit } => {
                let url = format!("{}/{}/members", self.base_url, group_id);
                self.client.get(&url).query(&[
                    ("access_token", credential.expose().to_string()),
                    ("limit", limit.to_string()),
                ])
            }
            // next 已經帶有 token 與 limit，原樣送出
            PageRequest::Next(cursor) => self.client.get(cursor.as_str()),
        };

        let body: MembersResponse = self.send_json(builder).await?;
        Ok(MemberPage {
            members: body.data.into_iter().map(Member::from).collect(),
            next: body.paging.and_then(|p| p.next).map(Cursor::new),
        })
    }

    async fn lookup_members(
        &self,
        ids: &[String],
        credential: &AccessToken,
    ) -> Result<HashMap<String, Member>> {
        let joined = ids.join(",");
        let request = self.client.get(&self.base_url).query(&[
            ("ids", joined.as_str()),
            ("fields", LOOKUP_FIELDS),
            ("access_token", credential.expose()),
        ]);

        let body: HashMap<String, MemberRecord> = self.send_json(request).await?;
        Ok(body
            .into_iter()
            .map(|(id, record)| (id, Member::from(record)))
            .collect())
    }

    async fn delete_member(
        &self,
        group_id: &str,
        member_id: &str,
        credential: &AccessToken,
    ) -> Result<DeleteResponse> {
        let url = format!("{}/{}/members/{}", self.base_url, group_id, member_id);
        let response = self
            .client
            .delete(&url)
            .query(&[("access_token", credential.expose())])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(DeleteResponse { status, body })
    }
}
