use serde::Serialize;
use serde_json::Value;
use url::Url;
use verdict_logging::{verdict_debug, verdict_info, verdict_warn};

use crate::{AnalysisRequest, ClientError, ClientSettings, TransportError, TransportErrorKind};

/// Shown when the service gives no usable error message of its own.
pub const GENERIC_FAILURE: &str = "Request failed";

const PREDICT_TEXT_ROUTE: &str = "api/predict_text";
const PREDICT_URL_ROUTE: &str = "api/predict_url";
const ANALYZE_TEXT_ROUTE: &str = "api/analyze_text";

/// The remote analysis service. Payloads come back untouched; interpreting
/// them is the normalizer's job.
#[async_trait::async_trait]
pub trait AnalysisService: Send + Sync {
    async fn predict_text(&self, text: &str) -> Result<Value, TransportError>;
    async fn predict_url(&self, url: &str) -> Result<Value, TransportError>;
    /// Linguistic insights only, without classification.
    async fn analyze_text(&self, text: &str) -> Result<Value, TransportError>;
    /// The service's status message from its root route.
    async fn health(&self) -> Result<String, TransportError>;
}

/// Runs one engine request against a service.
pub async fn execute(
    service: &dyn AnalysisService,
    request: &AnalysisRequest,
) -> Result<Value, TransportError> {
    match request {
        AnalysisRequest::PredictText(text) => service.predict_text(text).await,
        AnalysisRequest::PredictUrl(url) => service.predict_url(url).await,
    }
}

#[derive(Serialize)]
struct NewsBody<'a> {
    news: &'a str,
}

#[derive(Serialize)]
struct UrlBody<'a> {
    url: &'a str,
}

#[derive(Debug, Clone)]
struct Endpoints {
    root: Url,
    predict_text: Url,
    predict_url: Url,
    analyze_text: Url,
}

impl Endpoints {
    fn resolve(base_url: &str) -> Result<Self, ClientError> {
        let invalid = |source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        };
        let mut root = Url::parse(base_url).map_err(invalid)?;
        if !matches!(root.scheme(), "http" | "https") {
            return Err(ClientError::UnsupportedScheme(base_url.to_string()));
        }
        // Keep any path prefix when joining routes onto the base.
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        Ok(Self {
            predict_text: root.join(PREDICT_TEXT_ROUTE).map_err(invalid)?,
            predict_url: root.join(PREDICT_URL_ROUTE).map_err(invalid)?,
            analyze_text: root.join(ANALYZE_TEXT_ROUTE).map_err(invalid)?,
            root,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestAnalysisClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl ReqwestAnalysisClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let endpoints = Endpoints::resolve(&settings.base_url)?;
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ClientError::Http(err.to_string()))?;
        Ok(Self { http, endpoints })
    }

    pub fn base_url(&self) -> &str {
        self.endpoints.root.as_str()
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<Value, TransportError> {
        verdict_info!("POST {}", url);
        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_payload(response).await
    }
}

#[async_trait::async_trait]
impl AnalysisService for ReqwestAnalysisClient {
    async fn predict_text(&self, text: &str) -> Result<Value, TransportError> {
        self.post_json(&self.endpoints.predict_text, &NewsBody { news: text })
            .await
    }

    async fn predict_url(&self, url: &str) -> Result<Value, TransportError> {
        self.post_json(&self.endpoints.predict_url, &UrlBody { url })
            .await
    }

    async fn analyze_text(&self, text: &str) -> Result<Value, TransportError> {
        self.post_json(&self.endpoints.analyze_text, &NewsBody { news: text })
            .await
    }

    async fn health(&self) -> Result<String, TransportError> {
        verdict_info!("GET {}", self.endpoints.root);
        let response = self
            .http
            .get(self.endpoints.root.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = read_payload(response).await?;
        match body.get("message").and_then(Value::as_str) {
            Some(message) => Ok(message.to_string()),
            None => Err(TransportError::new(
                TransportErrorKind::Decode,
                "health response has no message",
            )),
        }
    }
}

async fn read_payload(response: reqwest::Response) -> Result<Value, TransportError> {
    let status = response.status();
    if !status.is_success() {
        // The service reports validation problems as `{ "error": "..." }`.
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("error")
                    .and_then(Value::as_str)
                    .filter(|msg| !msg.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        verdict_warn!("service returned {}: {}", status, message);
        return Err(TransportError::new(
            TransportErrorKind::HttpStatus(status.as_u16()),
            message,
        ));
    }

    let body = response.json::<Value>().await.map_err(|err| {
        if err.is_timeout() {
            map_reqwest_error(err)
        } else {
            TransportError::new(
                TransportErrorKind::Decode,
                format!("{GENERIC_FAILURE}: response was not valid JSON"),
            )
        }
    })?;
    verdict_debug!("service returned {}", status);
    Ok(body)
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    verdict_warn!("transport error: {}", err);
    if err.is_timeout() {
        return TransportError::new(TransportErrorKind::Timeout, "Request timed out");
    }
    TransportError::new(
        TransportErrorKind::Network,
        format!("{GENERIC_FAILURE}: could not reach the analysis service"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_keep_base_path_prefix() {
        let endpoints = Endpoints::resolve("https://example.org/verdict").unwrap();
        assert_eq!(
            endpoints.predict_text.as_str(),
            "https://example.org/verdict/api/predict_text"
        );
        assert_eq!(endpoints.root.as_str(), "https://example.org/verdict/");
    }

    #[test]
    fn bare_host_routes() {
        let endpoints = Endpoints::resolve("http://localhost:5000").unwrap();
        assert_eq!(
            endpoints.predict_url.as_str(),
            "http://localhost:5000/api/predict_url"
        );
        assert_eq!(
            endpoints.analyze_text.as_str(),
            "http://localhost:5000/api/analyze_text"
        );
    }

    #[test]
    fn rejects_bad_base_urls() {
        assert!(matches!(
            Endpoints::resolve("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            Endpoints::resolve("ftp://example.org"),
            Err(ClientError::UnsupportedScheme(_))
        ));
    }
}
