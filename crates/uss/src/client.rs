use std::future::Future;
use std::pin::Pin;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{SubmitEndpoint, UssConfig};
use crate::error::UssError;
use crate::schema::{AreaOfInterest, FlightPlanResponse, QueryConflictsResponse};

const QUERY_CONFLICTS_PATH: &str = "/uss/v1/flight_plan/query_conflicts";

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Backend that accepts flight plans and reports conflicting volumes.
///
/// Methods return boxed futures so the service can live behind `Arc<dyn _>`.
pub trait ConflictService: Send + Sync {
    /// Succeeds only when the USS answers 201.
    fn submit_flight_plan(
        &self,
        aoi: AreaOfInterest,
    ) -> BoxFuture<'_, Result<FlightPlanResponse, UssError>>;

    /// Succeeds only when the USS answers 200.
    fn query_conflicts(
        &self,
        aoi: AreaOfInterest,
    ) -> BoxFuture<'_, Result<QueryConflictsResponse, UssError>>;
}

/// HTTP client for a USS.
#[derive(Clone, Debug)]
pub struct UssClient {
    base_url: String,
    submit_endpoint: SubmitEndpoint,
    http: reqwest::Client,
}

impl UssClient {
    pub fn new(config: &UssConfig) -> Result<Self, UssError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(UssError::InvalidBaseUrl {
                url: config.base_url.clone(),
            });
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(UssError::Transport)?;
        Ok(Self {
            base_url,
            submit_endpoint: config.submit_endpoint,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl ConflictService for UssClient {
    fn submit_flight_plan(
        &self,
        aoi: AreaOfInterest,
    ) -> BoxFuture<'_, Result<FlightPlanResponse, UssError>> {
        let url = self.url(self.submit_endpoint.path());
        Box::pin(async move {
            debug!(%url, shape = ?aoi.volume.shape_kind(), "submitting flight plan");
            let resp = self
                .http
                .put(&url)
                .json(&aoi)
                .send()
                .await
                .map_err(UssError::Transport)?;
            read_json(resp, StatusCode::CREATED).await
        })
    }

    fn query_conflicts(
        &self,
        aoi: AreaOfInterest,
    ) -> BoxFuture<'_, Result<QueryConflictsResponse, UssError>> {
        let url = self.url(QUERY_CONFLICTS_PATH);
        Box::pin(async move {
            debug!(%url, "querying conflicts");
            let resp = self
                .http
                .post(&url)
                .json(&aoi)
                .send()
                .await
                .map_err(UssError::Transport)?;
            read_json(resp, StatusCode::OK).await
        })
    }
}

async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    expected: StatusCode,
) -> Result<T, UssError> {
    let status = resp.status();
    let bytes = resp.bytes().await.map_err(UssError::Transport)?;

    if status != expected {
        let payload = serde_json::from_slice::<serde_json::Value>(&bytes).ok();
        warn!(
            expected = expected.as_u16(),
            status = status.as_u16(),
            "USS answered with unexpected status"
        );
        return Err(UssError::UnexpectedStatus {
            expected: expected.as_u16(),
            status: status.as_u16(),
            payload,
        });
    }

    serde_json::from_slice(&bytes).map_err(UssError::Decode)
}
