//! Chart publishing to repository backends
//!
//! Three upload protocols hide behind one `push` call: OCI registries go
//! through `helm push` (with a login/logout session when credentials are
//! configured), ChartMuseum takes a streaming POST to its collection
//! endpoint, and plain HTTP object stores take a PUT of the archive
//! itself. A push is a single attempt; retrying is the caller's decision.

use std::path::Path;
use std::time::Duration;

use tokio_util::io::ReaderStream;

use chartship_helm::HelmCli;

use crate::config::{RepositoryKind, RepositoryTarget};
use crate::error::{RepoError, Result};

/// Media type of a packaged chart archive
const CHART_CONTENT_TYPE: &str = "application/gzip";

/// Upload timeout for ChartMuseum collection endpoints
const CHARTMUSEUM_TIMEOUT: Duration = Duration::from_secs(60);

/// Upload timeout for generic object stores, which can be slower to
/// acknowledge large archives
const HTTP_PUT_TIMEOUT: Duration = Duration::from_secs(120);

/// Publishes packaged chart archives to a single repository target
pub struct Publisher {
    target: RepositoryTarget,
    helm: HelmCli,
}

impl Publisher {
    pub fn new(target: RepositoryTarget, helm: HelmCli) -> Self {
        Self { target, helm }
    }

    /// The target this publisher uploads to
    pub fn target(&self) -> &RepositoryTarget {
        &self.target
    }

    /// Push a packaged chart archive to the configured target
    pub async fn push(&self, archive: &Path) -> Result<()> {
        match self.target.kind {
            RepositoryKind::Oci => self.push_oci(archive).await,
            RepositoryKind::ChartMuseum => self.push_chartmuseum(archive).await,
            RepositoryKind::Http => self.push_http(archive).await,
        }
    }

    /// End the registry session, if one applies.
    ///
    /// A no-op for non-OCI targets and for anonymous pushes. Best-effort
    /// otherwise: a failed logout is reported, never fatal.
    pub async fn logout(&self) {
        if self.target.kind != RepositoryKind::Oci || self.target.credentials().is_none() {
            return;
        }
        let host = self.target.registry_host();
        if let Err(e) = self
            .helm
            .registry_logout(host, self.target.registry_config.as_deref())
            .await
        {
            tracing::warn!(host, error = %e, "registry logout failed");
        }
    }

    async fn push_oci(&self, archive: &Path) -> Result<()> {
        if let Some(creds) = self.target.credentials() {
            let host = self.target.registry_host();
            self.helm
                .registry_login(
                    host,
                    &creds.username,
                    &creds.password,
                    self.target.registry_config.as_deref(),
                )
                .await
                .map_err(|e| RepoError::LoginFailed {
                    message: e.to_string(),
                })?;
        }

        self.helm
            .push(
                archive,
                &self.target.url,
                self.target.registry_config.as_deref(),
            )
            .await
            .map_err(|e| RepoError::PushFailed {
                message: e.to_string(),
            })
    }

    async fn push_chartmuseum(&self, archive: &Path) -> Result<()> {
        let endpoint = self.target.chartmuseum_endpoint();
        tracing::debug!(endpoint, "uploading chart to ChartMuseum");

        let file = tokio::fs::File::open(archive).await?;

        let client = http_client(CHARTMUSEUM_TIMEOUT)?;
        let mut request = client
            .post(&endpoint)
            .header(reqwest::header::CONTENT_TYPE, CHART_CONTENT_TYPE)
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)));

        if let Some(creds) = self.target.credentials() {
            request = request.header(reqwest::header::AUTHORIZATION, creds.basic_header());
        }

        let response = request.send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::CREATED && status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(RepoError::UploadFailed {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn push_http(&self, archive: &Path) -> Result<()> {
        tracing::debug!(url = %self.target.url, "uploading chart via PUT");

        let file = tokio::fs::File::open(archive).await?;
        // Some object stores reject chunked uploads, so declare the size up front
        let content_length = file.metadata().await?.len();

        let client = http_client(HTTP_PUT_TIMEOUT)?;
        let mut request = client
            .put(&self.target.url)
            .header(reqwest::header::CONTENT_TYPE, CHART_CONTENT_TYPE)
            .header(reqwest::header::CONTENT_LENGTH, content_length)
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)));

        if let Some(creds) = self.target.credentials() {
            request = request.header(reqwest::header::AUTHORIZATION, creds.basic_header());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepoError::UploadFailed {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RepoError::NetworkError {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use wiremock::matchers::{basic_auth, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn archive_fixture(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("demo-1.0.0.tgz");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not really gzip but good enough").unwrap();
        path
    }

    fn publisher(target: RepositoryTarget) -> Publisher {
        Publisher::new(target, HelmCli::new("."))
    }

    #[tokio::test]
    async fn test_chartmuseum_push_created() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/charts"))
            .and(header("content-type", CHART_CONTENT_TYPE))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let archive = archive_fixture(&dir);

        let target = RepositoryTarget::new(RepositoryKind::ChartMuseum, server.uri());
        publisher(target).push(&archive).await.unwrap();
    }

    #[tokio::test]
    async fn test_chartmuseum_push_ok_status_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/charts"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let archive = archive_fixture(&dir);

        let target = RepositoryTarget::new(RepositoryKind::ChartMuseum, server.uri());
        publisher(target).push(&archive).await.unwrap();
    }

    #[tokio::test]
    async fn test_chartmuseum_push_failure_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/charts"))
            .respond_with(ResponseTemplate::new(409).set_body_string("chart already exists"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let archive = archive_fixture(&dir);

        let target = RepositoryTarget::new(RepositoryKind::ChartMuseum, server.uri());
        let err = publisher(target).push(&archive).await.unwrap_err();
        match err {
            RepoError::UploadFailed { status, body } => {
                assert_eq!(status, 409);
                assert_eq!(body, "chart already exists");
            }
            other => panic!("expected UploadFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chartmuseum_push_with_context_path_and_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/museum/api/charts"))
            .and(basic_auth("bot", "hunter2"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let archive = archive_fixture(&dir);

        let mut target = RepositoryTarget::new(RepositoryKind::ChartMuseum, server.uri());
        target.username = Some("bot".to_string());
        target.password = Some("hunter2".to_string());
        target.context_path = Some("museum".to_string());

        publisher(target).push(&archive).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_put_declares_content_length() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_fixture(&dir);
        let size = std::fs::metadata(&archive).unwrap().len();

        Mock::given(method("PUT"))
            .and(header("content-length", size.to_string().as_str()))
            .and(header("content-type", CHART_CONTENT_TYPE))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let target = RepositoryTarget::new(RepositoryKind::Http, server.uri());
        publisher(target).push(&archive).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_put_non_2xx_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let archive = archive_fixture(&dir);

        let target = RepositoryTarget::new(RepositoryKind::Http, server.uri());
        let err = publisher(target).push(&archive).await.unwrap_err();
        match err {
            RepoError::UploadFailed { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("forbidden"));
            }
            other => panic!("expected UploadFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_distinct_from_http_failure() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_fixture(&dir);

        // Nothing listens on this port
        let target = RepositoryTarget::new(RepositoryKind::Http, "http://127.0.0.1:9");
        let err = publisher(target).push(&archive).await.unwrap_err();
        assert!(
            matches!(err, RepoError::NetworkError { .. } | RepoError::Timeout { .. }),
            "expected a network-level error, got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_logout_is_noop_for_non_oci_targets() {
        let target = RepositoryTarget::new(RepositoryKind::Http, "https://example.com/x.tgz");
        // Would hang or fail if it shelled out; completing is the assertion
        publisher(target).logout().await;
    }
}
