use std::collections::BTreeMap;
use std::time::Duration;

use hub_logging::{hub_debug, hub_warn};
use nerdhub_core::{
    Game, OperationId, OperationResult, ProgressReport, Quote, UpdateRequest, UserMapping,
    Username, VersionInfo,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ApiError, FailureKind};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Base URL the `/api/...` paths are appended to.
    pub api_root: String,
    pub connect_timeout: Duration,
    /// Whole-request deadline. `None` lets a slow status request simply delay
    /// the next poll.
    pub request_timeout: Option<Duration>,
}

impl ApiSettings {
    pub fn new(api_root: impl Into<String>) -> Self {
        Self {
            api_root: api_root.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// Backend operations the dashboard consumes.
#[async_trait::async_trait]
pub trait HubApi: Send + Sync {
    async fn games(&self) -> Result<Vec<Game>, ApiError>;
    async fn game_details(&self, appid: u32) -> Result<Game, ApiError>;
    async fn refresh_game_info(&self, appid: u32) -> Result<(), ApiError>;
    async fn usernames(&self, steam_ids: &[String])
        -> Result<BTreeMap<String, Username>, ApiError>;
    async fn user_mappings(&self) -> Result<Vec<UserMapping>, ApiError>;
    async fn save_user_mapping(&self, mapping: &UserMapping) -> Result<(), ApiError>;
    async fn start_update(&self, request: &UpdateRequest) -> Result<OperationId, ApiError>;
    async fn update_progress(&self, operation_id: &str) -> Result<ProgressReport, ApiError>;
    async fn update_result(&self, operation_id: &str) -> Result<OperationResult, ApiError>;
    async fn quotes(&self) -> Result<Vec<Quote>, ApiError>;
    async fn random_quote(&self) -> Result<Quote, ApiError>;
    async fn daily_quote(&self) -> Result<Quote, ApiError>;
    async fn delete_quote(&self, id: &str) -> Result<(), ApiError>;
    async fn version(&self) -> Result<VersionInfo, ApiError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartUpdateResponse {
    operation_id: OperationId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserMappingBody<'a> {
    steam_id: &'a str,
    username: &'a str,
    nickname: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct ReqwestHubApi {
    client: reqwest::Client,
    root: Url,
}

impl ReqwestHubApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let root = Url::parse(&settings.api_root)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if root.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{root} cannot be used as an API root"),
            ));
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, root })
    }

    /// Appends path segments to the root, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, "application/json")
    }

    fn with_json<B: Serialize + ?Sized>(
        builder: RequestBuilder,
        body: &B,
    ) -> Result<RequestBuilder, ApiError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        Ok(builder.header(CONTENT_TYPE, "application/json").body(bytes))
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn send(&self, label: &str, builder: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        hub_debug!("{}", label);
        let response = builder.send().await.map_err(|err| {
            let err = map_reqwest_error(err);
            hub_warn!("{} failed: {}", label, err);
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("");
            hub_warn!("{} failed: {}", label, status);
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{label} failed: {} {reason}", status.as_u16()).trim_end().to_string(),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(bytes.to_vec())
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        label: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(label, builder).await?;
        serde_json::from_slice(&body).map_err(|err| {
            hub_warn!("{} returned malformed JSON: {}", label, err);
            ApiError::new(FailureKind::Decode, format!("{label}: {err}"))
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments);
        let label = format!("GET {}", url.path());
        self.fetch_json(&label, self.request(Method::GET, url)).await
    }
}

#[async_trait::async_trait]
impl HubApi for ReqwestHubApi {
    async fn games(&self) -> Result<Vec<Game>, ApiError> {
        self.get_json(&["api", "games"]).await
    }

    async fn game_details(&self, appid: u32) -> Result<Game, ApiError> {
        let appid = appid.to_string();
        self.get_json(&["api", "Games", appid.as_str()]).await
    }

    async fn refresh_game_info(&self, appid: u32) -> Result<(), ApiError> {
        let appid = appid.to_string();
        let url = self.endpoint(&["api", "Games", "update-game-info", appid.as_str()]);
        let label = format!("POST {}", url.path());
        // The refreshed record comes back in the body; the dashboard reloads it instead.
        self.send(&label, self.request(Method::POST, url)).await?;
        Ok(())
    }

    async fn usernames(
        &self,
        steam_ids: &[String],
    ) -> Result<BTreeMap<String, Username>, ApiError> {
        let url = self.endpoint(&["api", "Games", "get-usernames"]);
        let label = format!("POST {}", url.path());
        let builder = Self::with_json(self.request(Method::POST, url), steam_ids)?;
        self.fetch_json(&label, builder).await
    }

    async fn user_mappings(&self) -> Result<Vec<UserMapping>, ApiError> {
        self.get_json(&["api", "Games", "get-all-usernames"]).await
    }

    async fn save_user_mapping(&self, mapping: &UserMapping) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "Games", "add-or-update-user-mapping"]);
        let label = format!("POST {}", url.path());
        let body = UserMappingBody {
            steam_id: &mapping.steam_id,
            username: &mapping.username,
            nickname: mapping.nickname.as_deref(),
        };
        let builder = Self::with_json(self.request(Method::POST, url), &body)?;
        self.send(&label, builder).await?;
        Ok(())
    }

    async fn start_update(&self, request: &UpdateRequest) -> Result<OperationId, ApiError> {
        let mut url = self.endpoint(&["api", "Games", "start-update"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("overrideExisting", &request.override_existing.to_string());
            for appid in &request.app_ids {
                query.append_pair("appIdsToUpdate", &appid.to_string());
            }
        }
        let label = format!("POST {}", url.path());
        let builder = Self::with_json(self.request(Method::POST, url), &request.steam_ids)?;
        let response: StartUpdateResponse = self.fetch_json(&label, builder).await?;
        Ok(response.operation_id)
    }

    async fn update_progress(&self, operation_id: &str) -> Result<ProgressReport, ApiError> {
        self.get_json(&["api", "Games", "update-progress", operation_id])
            .await
    }

    async fn update_result(&self, operation_id: &str) -> Result<OperationResult, ApiError> {
        self.get_json(&["api", "Games", "update-result", operation_id])
            .await
    }

    async fn quotes(&self) -> Result<Vec<Quote>, ApiError> {
        self.get_json(&["api", "Quotes"]).await
    }

    async fn random_quote(&self) -> Result<Quote, ApiError> {
        self.get_json(&["api", "Quotes", "random"]).await
    }

    async fn daily_quote(&self) -> Result<Quote, ApiError> {
        self.get_json(&["api", "Quotes", "daily"]).await
    }

    async fn delete_quote(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "Quotes", id]);
        let label = format!("DELETE {}", url.path());
        self.send(&label, self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn version(&self) -> Result<VersionInfo, ApiError> {
        self.get_json(&["api", "Version"]).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
