// API client module: contains a small blocking HTTP client that talks to
// the LORIS REST API. One invocation of the tool performs exactly two
// calls (login, then candidate creation), so the client stays small and
// synchronous.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Base URL of the CBIGR dev instance, used when `CBIGR_API_URL` is unset.
const DEFAULT_BASE_URL: &str = "https://cbigr-dev.loris.ca/api/v0.0.3-dev";

/// Simple API client that holds a reqwest blocking client, the base URL
/// of the LORIS instance and an optional bearer token for authenticated
/// calls.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// Login request payload for `POST /login`.
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Expected response from the login endpoint. The API returns more fields
/// than the token, but the token is the only one the tool needs; the rest
/// are ignored during parsing.
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
}

/// Candidate record as the candidates endpoint expects it. The field
/// casing (`PSCID`, `EDC`, `DoB`) is part of the wire contract.
#[derive(Serialize, Deserialize, Debug)]
pub struct Candidate {
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "PSCID")]
    pub pscid: String,
    #[serde(rename = "EDC")]
    pub edc: String,
    #[serde(rename = "DoB")]
    pub dob: String,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "Site")]
    pub site: String,
}

/// Envelope for `POST /candidates/`: the record sits under a `Candidate`
/// key.
#[derive(Serialize, Deserialize, Debug)]
pub struct CandidateRequest {
    #[serde(rename = "Candidate")]
    pub candidate: Candidate,
}

/// Status and raw body of a candidate creation call. LORIS reports
/// validation problems in the body with a non-2xx status; both are handed
/// back unchanged so the caller can print whatever the server said.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiClient {
    /// Create an ApiClient configured from the environment variable
    /// `CBIGR_API_URL` or fallback to the CBIGR dev instance.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("CBIGR_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(&base_url)
    }

    /// Create an ApiClient for the given base URL. Trailing slashes are
    /// trimmed so endpoint paths join cleanly.
    pub fn new(base_url: &str) -> Result<Self> {
        // The dev instance runs with a self-signed certificate, so
        // certificate verification is disabled for both calls.
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Store a bearer token for subsequent authenticated requests.
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    /// Returns whether a token is present in the client.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Helper to build the Authorization header map when a token is set.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(t) = &self.token {
            let val = format!("Bearer {}", t);
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&val).unwrap());
        }
        headers
    }

    /// Perform login and parse the expected LoginResponse JSON. A non-2xx
    /// status or a response without a `token` field is an error, and no
    /// candidate creation call may follow one.
    pub fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        let url = format!("{}/login", &self.base_url);
        let res = self
            .client
            .post(&url)
            .json(req)
            .send()
            .context("Failed to send login request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Login failed: {} - {}", status, txt);
        }
        let resp: LoginResponse = res.json().context("Parsing login response json")?;
        Ok(resp)
    }

    /// Submit a candidate record by POSTing to /candidates/ with the
    /// bearer token attached. Unlike `login`, a non-2xx status is not an
    /// error here: the server's verdict is returned as-is for printing.
    pub fn create_candidate(&self, req: &CandidateRequest) -> Result<ApiResponse> {
        let url = format!("{}/candidates/", &self.base_url);
        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers())
            .json(req)
            .send()
            .context("Failed to send candidate creation request")?;
        let status = res.status();
        let body = res
            .text()
            .context("Reading candidate creation response body")?;
        Ok(ApiResponse { status, body })
    }
}
