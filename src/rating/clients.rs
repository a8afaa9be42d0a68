//! HTTP clients for the external rating platforms
//!
//! Each client is a thin request/parse adapter implementing [`RatingSource`].
//! Raw API payloads are parsed into strict typed shapes at this boundary; any
//! schema mismatch is a `SourceUnavailable` condition, never a panic. No
//! retries: a failed call is terminal and reported as absent by the caller.

use crate::config::RatingSettings;
use crate::error::{Result, TournamentError};
use crate::rating::source::RatingSource;
use crate::types::Platform;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("joust-core/", env!("CARGO_PKG_VERSION"));

fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| {
            TournamentError::InternalError {
                message: format!("Failed to build HTTP client: {}", e),
            }
            .into()
        })
}

fn source_unavailable(platform: Platform, reason: impl std::fmt::Display) -> anyhow::Error {
    TournamentError::SourceUnavailable {
        platform,
        reason: reason.to_string(),
    }
    .into()
}

/// Lichess public API client (`/api/user/{handle}`)
pub struct LichessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LichessUser {
    #[serde(default)]
    perfs: LichessPerfs,
}

#[derive(Debug, Default, Deserialize)]
struct LichessPerfs {
    rapid: Option<LichessPerf>,
}

#[derive(Debug, Deserialize)]
struct LichessPerf {
    rating: Option<f64>,
}

impl LichessUser {
    /// Rapid rating of the account, if it has played rapid games
    fn rapid_rating(&self) -> Option<f64> {
        self.perfs.rapid.as_ref().and_then(|perf| perf.rating)
    }
}

impl LichessClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.into(),
            token,
        })
    }
}

#[async_trait]
impl RatingSource for LichessClient {
    fn platform(&self) -> Platform {
        Platform::Lichess
    }

    async fn fetch_rating(&self, handle: &str) -> Result<Option<f64>> {
        let url = format!("{}/api/user/{}", self.base_url, urlencoding::encode(handle));
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| source_unavailable(Platform::Lichess, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(source_unavailable(
                Platform::Lichess,
                format!("API returned status {}", response.status()),
            ));
        }

        let user: LichessUser = response
            .json()
            .await
            .map_err(|e| source_unavailable(Platform::Lichess, e))?;
        Ok(user.rapid_rating())
    }
}

/// Chess.com published-data API client (`/pub/player/{handle}/stats`)
pub struct ChessComClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChessComStats {
    chess_rapid: Option<ChessComRecord>,
}

#[derive(Debug, Deserialize)]
struct ChessComRecord {
    last: Option<ChessComRatingPoint>,
}

#[derive(Debug, Deserialize)]
struct ChessComRatingPoint {
    rating: Option<f64>,
}

impl ChessComStats {
    /// Most recent rapid rating, if the account has one
    fn rapid_rating(&self) -> Option<f64> {
        self.chess_rapid
            .as_ref()
            .and_then(|record| record.last.as_ref())
            .and_then(|point| point.rating)
    }
}

impl ChessComClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl RatingSource for ChessComClient {
    fn platform(&self) -> Platform {
        Platform::ChessCom
    }

    async fn fetch_rating(&self, handle: &str) -> Result<Option<f64>> {
        let url = format!(
            "{}/pub/player/{}/stats",
            self.base_url,
            urlencoding::encode(handle)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| source_unavailable(Platform::ChessCom, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(source_unavailable(
                Platform::ChessCom,
                format!("API returned status {}", response.status()),
            ));
        }

        let stats: ChessComStats = response
            .json()
            .await
            .map_err(|e| source_unavailable(Platform::ChessCom, e))?;
        Ok(stats.rapid_rating())
    }
}

/// USCF member-search client (CiviCRM SearchDisplay endpoint)
pub struct UscfClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UscfResponse {
    run: UscfRun,
}

#[derive(Debug, Deserialize)]
struct UscfRun {
    #[serde(default)]
    values: Vec<UscfRecord>,
}

#[derive(Debug, Deserialize)]
struct UscfRecord {
    data: UscfRecordData,
}

#[derive(Debug, Deserialize)]
struct UscfRecordData {
    #[serde(rename = "Player_Details.Rating")]
    rating: Option<f64>,
}

impl UscfResponse {
    /// Regular rating of the first matched member, if present
    fn regular_rating(&self) -> Option<f64> {
        self.run.values.first().and_then(|record| record.data.rating)
    }
}

impl UscfClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    /// Build the form-encoded SearchDisplay payload for one member id
    ///
    /// The endpoint expects a `calls` parameter holding a URL-encoded JSON
    /// batch; the seed keeps intermediaries from caching the search.
    fn search_payload(member_id: &str, seed: i64) -> String {
        let call = serde_json::json!({
            "run": [
                "SearchDisplay",
                "run",
                {
                    "return": "page:1",
                    "savedSearch": "Member_Player_Search",
                    "display": "Table",
                    "sort": [["sort_name", "ASC"]],
                    "limit": 50,
                    "seed": seed,
                    "filters": {
                        "Player_Details.Rating": {},
                        "Player_Details.Quick_Rating": {},
                        "Player_Details.Blitz_Rating": {},
                        "Player_Details.Online_Regular_Rating": {},
                        "Player_Details.Online_Blitz_Rating": {},
                        "Player_Details.Online_Quick_Rating": {},
                        "Player_Details.Correspondence_Rating": {},
                        "external_identifier": member_id
                    },
                    "afform": "afsearchPlayerSearch1"
                }
            ]
        });
        format!("calls={}", urlencoding::encode(&call.to_string()))
    }
}

#[async_trait]
impl RatingSource for UscfClient {
    fn platform(&self) -> Platform {
        Platform::Uscf
    }

    async fn fetch_rating(&self, handle: &str) -> Result<Option<f64>> {
        let url = format!("{}/civicrm/ajax/api4", self.base_url);
        let payload =
            Self::search_payload(handle, crate::utils::current_timestamp().timestamp_millis());

        let response = self
            .client
            .post(&url)
            .header(
                "Content-Type",
                "application/x-www-form-urlencoded; charset=UTF-8",
            )
            .header("X-Requested-With", "XMLHttpRequest")
            .body(payload)
            .send()
            .await
            .map_err(|e| source_unavailable(Platform::Uscf, e))?;

        if !response.status().is_success() {
            return Err(source_unavailable(
                Platform::Uscf,
                format!("API returned status {}", response.status()),
            ));
        }

        let parsed: UscfResponse = response
            .json()
            .await
            .map_err(|e| source_unavailable(Platform::Uscf, e))?;
        Ok(parsed.regular_rating())
    }
}

/// Build the full set of platform clients from rating settings
pub fn build_sources(settings: &RatingSettings) -> Result<Vec<Arc<dyn RatingSource>>> {
    let timeout = settings.fetch_timeout();
    Ok(vec![
        Arc::new(ChessComClient::new(settings.chess_com_api_url.clone(), timeout)?),
        Arc::new(LichessClient::new(
            settings.lichess_api_url.clone(),
            settings.lichess_token.clone(),
            timeout,
        )?),
        Arc::new(UscfClient::new(settings.uscf_api_url.clone(), timeout)?),
    ])
}
