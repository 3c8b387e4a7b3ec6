//! HTTP module catalog.
//!
//! Talks to a static JSON module API laid out as
//! `{base_url}/{academic_year}/moduleList.json` and
//! `{base_url}/{academic_year}/modules/{code}.json`.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::instrument;

use semplan_core::error::CatalogError;
use semplan_core::traits::{ModuleCatalog, ModuleDetail, ModuleSummary};

pub const DEFAULT_BASE_URL: &str = "https://api.nusmods.com/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Module catalog backed by the public module API.
pub struct HttpCatalog {
    base_url: String,
    academic_year: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: &str, academic_year: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            academic_year: academic_year.to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn academic_year(&self) -> &str {
        &self.academic_year
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.academic_year, path)
    }

    /// GET `path` and decode the JSON body. A 404 becomes `NotFound(subject)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        subject: &str,
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    CatalogError::Network(format!(
                        "module catalog not reachable at {}",
                        self.base_url
                    ))
                } else {
                    CatalogError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(CatalogError::NotFound(subject.to_string()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status,
                message: body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        serde_json::from_str(&body)
            .map_err(|e| CatalogError::InvalidResponse(format!("{subject}: {e}")))
    }
}

#[async_trait]
impl ModuleCatalog for HttpCatalog {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(year = %self.academic_year))]
    async fn list_all_modules(&self) -> Result<Vec<ModuleSummary>, CatalogError> {
        let modules: Vec<ModuleSummary> = self.get_json("moduleList.json", "module list").await?;
        tracing::debug!("module list has {} entries", modules.len());
        Ok(modules)
    }

    #[instrument(skip(self), fields(year = %self.academic_year))]
    async fn get_module_detail(&self, code: &str) -> Result<ModuleDetail, CatalogError> {
        self.get_json(&format!("modules/{code}.json"), code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog(server: &MockServer) -> HttpCatalog {
        HttpCatalog::new(&server.uri(), "2024-2025", 5).unwrap()
    }

    #[tokio::test]
    async fn lists_modules() {
        let server = MockServer::start().await;

        let body = serde_json::json!([
            {"moduleCode": "CS1101S", "title": "Programming Methodology", "semesters": [1]},
            {"moduleCode": "MA1521", "title": "Calculus for Computing"}
        ]);

        Mock::given(method("GET"))
            .and(path("/2024-2025/moduleList.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let modules = catalog(&server).list_all_modules().await.unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[1].module_code, "MA1521");
    }

    #[tokio::test]
    async fn detail_coerces_string_credit() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "moduleCode": "CS1101S",
            "title": "Programming Methodology",
            "moduleCredit": "4",
            "department": "Computer Science"
        });

        Mock::given(method("GET"))
            .and(path("/2024-2025/modules/CS1101S.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let detail = catalog(&server).get_module_detail("CS1101S").await.unwrap();
        assert_eq!(detail.module_credit, 4.0);
        assert_eq!(detail.title, "Programming Methodology");
    }

    #[tokio::test]
    async fn missing_module_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/2024-2025/modules/XX0000.json"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let err = catalog(&server).get_module_detail("XX0000").await.unwrap_err();
        assert_eq!(err, CatalogError::NotFound("XX0000".into()));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn server_error_is_retryable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/2024-2025/moduleList.json"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = catalog(&server).list_all_modules().await.unwrap_err();
        assert!(matches!(err, CatalogError::Api { status: 503, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/2024-2025/moduleList.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = catalog(&server).list_all_modules().await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/2024-2025/moduleList.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let catalog = HttpCatalog::new(&server.uri(), "2024-2025", 1).unwrap();
        let err = catalog.list_all_modules().await.unwrap_err();
        assert_eq!(err, CatalogError::Timeout(1));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let catalog = HttpCatalog::new("http://localhost:9/v2/", "2024-2025", 5).unwrap();
        assert_eq!(
            catalog.url("moduleList.json"),
            "http://localhost:9/v2/2024-2025/moduleList.json"
        );
        assert_eq!(catalog.academic_year(), "2024-2025");
    }
}
