use super::{Transport, TransportError, TransportResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use http::header::{LOCATION, USER_AGENT};
use http::{Request, Response, StatusCode, Uri};
use http_body_util::{BodyExt, Empty};
use hyper::body::{Bytes, Incoming};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use rustls::crypto::aws_lc_rs::default_provider;
use url::Url;

const USER_AGENT_VALUE: &str = concat!("urlperf/", env!("CARGO_PKG_VERSION"));

/// Redirect hops followed before a request is given up
const MAX_REDIRECTS: usize = 10;

/// Direct HTTP/HTTPS transport backed by a pooled hyper client
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        tracing::debug!("Building HTTP client with rustls connector");

        let https = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(default_provider())
            .map_err(|e| Error::Tls(format!("Failed to configure TLS: {}", e)))?
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https);

        Ok(Self { client })
    }
}

impl HttpTransport {
    async fn send(&self, url: &Url) -> std::result::Result<Response<Incoming>, TransportError> {
        let uri: Uri = url
            .as_str()
            .parse()
            .map_err(|e| TransportError::Unreachable(format!("Invalid request URI: {}", e)))?;

        let request = Request::get(uri)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .body(Empty::<Bytes>::new())
            .map_err(|e| TransportError::Unreachable(format!("Failed to build request: {}", e)))?;

        self.client.request(request).await.map_err(|e| {
            let detail = match std::error::Error::source(&e) {
                Some(source) => format!("{}: {}", e, source),
                None => e.to_string(),
            };
            if e.is_connect() {
                TransportError::Unreachable(format!(
                    "Connection refused or host unreachable ({})",
                    detail
                ))
            } else {
                TransportError::Unreachable(detail)
            }
        })
    }
}

/// Where a redirect response points, if it is one that should be followed.
///
/// A 3xx without a `Location` header is treated as the final response.
fn redirect_target(
    current: &Url,
    response: &Response<Incoming>,
) -> std::result::Result<Option<Url>, TransportError> {
    if !matches!(
        response.status(),
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    ) {
        return Ok(None);
    }

    let Some(location) = response.headers().get(LOCATION) else {
        return Ok(None);
    };

    let location = location
        .to_str()
        .map_err(|e| TransportError::Unreachable(format!("Invalid redirect location: {}", e)))?;
    let next = current.join(location).map_err(|e| {
        TransportError::Unreachable(format!("Invalid redirect location {:?}: {}", location, e))
    })?;

    if !matches!(next.scheme(), "http" | "https") {
        return Err(TransportError::Unreachable(format!(
            "Redirect to unsupported URL {}",
            next
        )));
    }

    Ok(Some(next))
}

#[async_trait]
impl Transport for HttpTransport {
    /// GET `url`, following redirects. Only the final response's body is
    /// counted.
    async fn perform(&self, url: &Url) -> std::result::Result<TransportResponse, TransportError> {
        let mut current = url.clone();
        let mut hops = 0;

        let response = loop {
            let response = self.send(&current).await?;
            let Some(next) = redirect_target(&current, &response)? else {
                break response;
            };

            if hops == MAX_REDIRECTS {
                return Err(TransportError::Unreachable(format!(
                    "Too many redirects starting at {}",
                    url
                )));
            }
            hops += 1;

            tracing::trace!("{} redirected to {}", current, next);
            current = next;
        };

        let status = response.status();
        let status_code = status.as_u16();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();

        // Count the body frame by frame instead of buffering it
        let mut body = response.into_body();
        let mut body_size_bytes = 0u64;
        while let Some(frame) = body.frame().await {
            match frame {
                Ok(frame) => {
                    if let Some(data) = frame.data_ref() {
                        body_size_bytes += data.len() as u64;
                    }
                }
                Err(e) => {
                    return Err(TransportError::Status {
                        status_code,
                        status_text,
                        reason: format!("Failed to read response body: {}", e),
                    });
                }
            }
        }

        tracing::trace!("{} -> {} ({} bytes)", current, status_code, body_size_bytes);

        Ok(TransportResponse {
            status_code,
            status_text,
            body_size_bytes,
        })
    }
}
