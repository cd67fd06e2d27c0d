use crate::core::{ConfigProvider, ExportFormat, ExportRequest};
use crate::utils::error::{ExportError, Result};
use reqwest::Client;
use url::Url;

pub const WFS_VERSION: &str = "1.0.0";

/// Issues `GetFeature` requests against a single WFS endpoint.
#[derive(Debug, Clone)]
pub struct WfsClient {
    client: Client,
}

impl WfsClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Appends the `GetFeature` parameters to `endpoint`, keeping any query it already has.
    pub fn build_url(endpoint: &str, request: &ExportRequest) -> Result<Url> {
        let mut url = Url::parse(endpoint).map_err(|e| ExportError::InvalidRequestUrl {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        url.query_pairs_mut()
            .append_pair("request", "GetFeature")
            .append_pair("typeName", &request.layer)
            .append_pair("maxFeature", &request.max_features.to_string())
            .append_pair("outputFormat", request.format.wfs_identifier())
            .append_pair("version", WFS_VERSION);

        Ok(url)
    }

    /// Single attempt: any transport failure or non-2xx status is a `Retrieval` error.
    pub async fn fetch<F: ExportFormat>(
        &self,
        endpoint: &str,
        request: &ExportRequest,
    ) -> Result<F::Raw> {
        let url = Self::build_url(endpoint, request)?;

        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("WFS response status: {}", response.status());

        let body = response.error_for_status()?.text().await?;
        tracing::debug!(
            "Received {} bytes of {} for layer '{}'",
            body.len(),
            request.format,
            request.layer
        );

        F::decode(body)
    }
}
