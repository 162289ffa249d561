//! Google Sheets v4 client.
//!
//! Authenticates as a service account: a short-lived RS256 assertion is
//! exchanged for an OAuth access token, which is cached until shortly before
//! it expires.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use trantrac_shared::SheetsConfig;

use super::{SheetClient, SheetError};

const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are renewed this long before their reported expiry.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
struct AppendBody<'a> {
    values: &'a [Vec<String>],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    #[serde(default)]
    updated_rows: usize,
}

/// [`SheetClient`] backed by the Google Sheets REST API.
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    config: SheetsConfig,
    key: EncodingKey,
    token: Mutex<Option<AccessToken>>,
}

impl GoogleSheetsClient {
    /// Creates a client from service-account settings.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::Auth` if the private key is not a valid RSA PEM.
    pub fn new(config: SheetsConfig) -> Result<Self, SheetError> {
        let key = EncodingKey::from_rsa_pem(config.private_key_pem().as_bytes())
            .map_err(|e| SheetError::auth(format!("invalid private key: {e}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            config,
            key,
            token: Mutex::new(None),
        })
    }

    /// Returns a valid access token, exchanging a new assertion when needed.
    async fn access_token(&self) -> Result<String, SheetError> {
        let mut cached = self.token.lock().await;

        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let assertion = self.sign_assertion(now)?;
        let response = self
            .http
            .post(&self.config.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::auth(format!("token exchange returned {status}: {body}")));
        }

        let token: TokenResponse = response.json().await?;
        info!(expires_in = token.expires_in, "Sheets access token refreshed");

        let access = AccessToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        };
        let value = access.value.clone();
        *cached = Some(access);
        Ok(value)
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, SheetError> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.config.client_email,
            scope: SCOPE,
            aud: &self.config.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| SheetError::auth(format!("failed to sign assertion: {e}")))
    }

    /// Builds `{base}/v4/spreadsheets/{id}/values/{range}{suffix}`.
    fn values_url(&self, range: &str, suffix: &str) -> Result<Url, SheetError> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|e| SheetError::invalid_request(e.to_string()))?;

        let target = format!("{range}{suffix}");
        url.path_segments_mut()
            .map_err(|()| SheetError::invalid_request("API base URL cannot have a path"))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.config.spreadsheet_id.as_str(),
                "values",
                target.as_str(),
            ]);

        Ok(url)
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(self.values_url(range, "")?)
            .bearer_auth(token)
            .send()
            .await?;

        let body: ValueRange = check_status(response).await?.json().await?;
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}

#[async_trait]
impl SheetClient for GoogleSheetsClient {
    async fn append(&self, sheet: &str, rows: &[Vec<String>]) -> Result<(), SheetError> {
        let used = self.get_values(&format!("{sheet}!A:A")).await?.len();
        let anchor = anchor_range(sheet, used);
        debug!(sheet, %anchor, rows = rows.len(), "Appending rows");

        let token = self.access_token().await?;
        let response = self
            .http
            .post(self.values_url(&anchor, ":append")?)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(token)
            .json(&AppendBody { values: rows })
            .send()
            .await?;

        let body: AppendResponse = check_status(response).await?.json().await?;
        let updated = body.updates.map_or(0, |updates| updates.updated_rows);
        if updated == rows.len() {
            Ok(())
        } else {
            Err(SheetError::IncompleteAppend {
                expected: rows.len(),
                updated,
            })
        }
    }

    async fn read(&self, sheet: &str, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        self.get_values(&format!("{sheet}!{range}")).await
    }
}

/// First free row below `used` occupied rows, e.g. `USCITE!A13`.
fn anchor_range(sheet: &str, used: usize) -> String {
    format!("{sheet}!A{}", used + 1)
}

/// Renders a cell as text; the API returns formatted strings by default.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SheetError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SheetError::Api {
        status: status.as_u16(),
        body,
    })
}
