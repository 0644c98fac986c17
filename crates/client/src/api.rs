//! HTTP client for the catalog REST API.
//!
//! Wraps the `/api/v1/product` endpoints using [`reqwest`], and knows how to
//! load each [`CatalogView`] into a [`CatalogStore`].

use serde::Deserialize;
use storefront_core::catalog::ProductSearchRequest;
use storefront_core::error::FieldError;
use storefront_core::pagination::{PageRequest, PageResponse, ProductSort};
use storefront_core::types::DbId;

use crate::models::{DataResponse, Product};
use crate::store::{CatalogStore, CatalogView};

/// Errors from the catalog client.
#[derive(Debug, thiserror::Error)]
pub enum CatalogApiError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("Catalog API error ({status} {code}): {errors:?}")]
    Api {
        status: u16,
        /// Machine-readable code from the error body, e.g. `NOT_FOUND`.
        code: String,
        errors: Vec<FieldError>,
    },

    /// The requested view has no implicit query; use a dedicated method.
    #[error("View {0:?} cannot be fetched directly")]
    UnsupportedView(CatalogView),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    #[serde(default)]
    errors: Vec<FieldError>,
}

/// Build an [`CatalogApiError::Api`] from a failed response's status and body.
///
/// Bodies that are not the API's error envelope are kept verbatim as a
/// single general message.
fn api_error(status: u16, body: &str) -> CatalogApiError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => CatalogApiError::Api {
            status,
            code: parsed.code,
            errors: parsed.errors,
        },
        Err(_) => CatalogApiError::Api {
            status,
            code: "UNKNOWN".to_string(),
            errors: vec![FieldError::general(body)],
        },
    }
}

/// HTTP client for one catalog service.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl CatalogClient {
    /// * `base_url` - Service root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach a bearer token, required for rating.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    /// GET /product?page=&limit=&sort=
    pub async fn list(
        &self,
        page: &PageRequest,
        sort: ProductSort,
    ) -> Result<PageResponse<Product>, CatalogApiError> {
        let url = self.url(&list_path(page, sort));
        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    /// GET /product/{id}
    pub async fn get(&self, id: DbId) -> Result<Product, CatalogApiError> {
        let response = self
            .client
            .get(self.url(&format!("/product/{id}")))
            .send()
            .await?;
        let body: DataResponse<Product> = Self::parse_response(response).await?;
        Ok(body.data)
    }

    /// GET /product/related/{id}
    pub async fn related(&self, id: DbId) -> Result<Vec<Product>, CatalogApiError> {
        let response = self
            .client
            .get(self.url(&format!("/product/related/{id}")))
            .send()
            .await?;
        let body: DataResponse<Vec<Product>> = Self::parse_response(response).await?;
        Ok(body.data)
    }

    /// POST /product/search
    pub async fn search(
        &self,
        request: &ProductSearchRequest,
    ) -> Result<PageResponse<Product>, CatalogApiError> {
        let response = self
            .client
            .post(self.url("/product/search"))
            .json(request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// POST /product/search/rating. Items carry `floor_average`.
    pub async fn search_with_rating(
        &self,
        request: &ProductSearchRequest,
    ) -> Result<PageResponse<Product>, CatalogApiError> {
        let response = self
            .client
            .post(self.url("/product/search/rating"))
            .json(request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// PUT /product/star/{id}. Returns the product with its updated ratings.
    pub async fn rate(&self, id: DbId, star: i16) -> Result<Product, CatalogApiError> {
        let mut request = self
            .client
            .put(self.url(&format!("/product/star/{id}")))
            .json(&serde_json::json!({ "star": star }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let body: DataResponse<Product> = Self::parse_response(response).await?;
        Ok(body.data)
    }

    // ---- store integration ----

    /// Fetch one page of `view` and merge it into `store`.
    ///
    /// `store` is flagged as loading for the duration of the call and the
    /// flag is cleared on failure too. [`CatalogView::SearchResults`] needs a
    /// request body; use [`CatalogClient::search_into`].
    pub async fn fetch_view(
        &self,
        store: &mut CatalogStore,
        view: CatalogView,
        page: &PageRequest,
    ) -> Result<(), CatalogApiError> {
        store.set_loading(true);
        let result = self.fetch_view_page(view, page).await;
        match result {
            Ok(data) => {
                store.merge_page(view, data);
                Ok(())
            }
            Err(e) => {
                store.set_loading(false);
                tracing::warn!(?view, error = %e, "Failed to load catalog view");
                Err(e)
            }
        }
    }

    /// Run a search and show exactly its results in [`CatalogView::SearchResults`].
    pub async fn search_into(
        &self,
        store: &mut CatalogStore,
        request: &ProductSearchRequest,
    ) -> Result<(), CatalogApiError> {
        store.set_loading(true);
        let result = if request.rating.is_some() {
            self.search_with_rating(request).await
        } else {
            self.search(request).await
        };
        match result {
            Ok(data) => {
                store.replace_view(CatalogView::SearchResults, data);
                Ok(())
            }
            Err(e) => {
                store.set_loading(false);
                Err(e)
            }
        }
    }

    async fn fetch_view_page(
        &self,
        view: CatalogView,
        page: &PageRequest,
    ) -> Result<PageResponse<Product>, CatalogApiError> {
        match view {
            CatalogView::AllProducts | CatalogView::NewArrivals => {
                self.list(page, ProductSort::CreatedAt).await
            }
            CatalogView::BestSellers => self.list(page, ProductSort::Sold).await,
            CatalogView::Category(id) => {
                self.search(&ProductSearchRequest {
                    category_ids: Some(vec![id]),
                    ..paged_request(page)
                })
                .await
            }
            CatalogView::Subcategory(id) => {
                self.search(&ProductSearchRequest {
                    subcategory_ids: Some(vec![id]),
                    ..paged_request(page)
                })
                .await
            }
            CatalogView::Related(id) => {
                let data = self.related(id).await?;
                Ok(PageResponse {
                    total: data.len() as i64,
                    page: 1,
                    data,
                })
            }
            CatalogView::SearchResults => Err(CatalogApiError::UnsupportedView(view)),
        }
    }

    // ---- private helpers ----

    /// Parse a successful JSON body, or turn a failure status into
    /// [`CatalogApiError::Api`].
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CatalogApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(response.json::<T>().await?)
    }
}

fn list_path(page: &PageRequest, sort: ProductSort) -> String {
    format!(
        "/product?page={}&limit={}&sort={}",
        page.page(),
        page.limit(),
        sort.as_str()
    )
}

fn paged_request(page: &PageRequest) -> ProductSearchRequest {
    ProductSearchRequest {
        page: Some(page.page()),
        limit: Some(page.limit()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = CatalogClient::new("http://shop.test/");
        assert_eq!(client.url("/product/1"), "http://shop.test/api/v1/product/1");
    }

    #[test]
    fn list_path_carries_page_and_sort() {
        let page = PageRequest::new(3, 20).unwrap();
        assert_eq!(
            list_path(&page, ProductSort::Sold),
            "/product?page=3&limit=20&sort=sold"
        );
    }

    #[test]
    fn error_envelope_is_parsed() {
        let body = r#"{"code":"VALIDATION_ERROR","errors":[{"message":"bad","field":"page"}]}"#;
        match api_error(400, body) {
            CatalogApiError::Api {
                status,
                code,
                errors,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "VALIDATION_ERROR");
                assert_eq!(errors, vec![FieldError::new("page", "bad")]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_error_body_is_kept_verbatim() {
        match api_error(502, "Bad Gateway") {
            CatalogApiError::Api { code, errors, .. } => {
                assert_eq!(code, "UNKNOWN");
                assert_eq!(errors, vec![FieldError::general("Bad Gateway")]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn view_requests_keep_paging() {
        let req = paged_request(&PageRequest::new(2, 5).unwrap());
        assert_eq!(req.page, Some(2));
        assert_eq!(req.limit, Some(5));
        assert!(req.category_ids.is_none());
    }

    #[tokio::test]
    async fn search_results_view_is_not_fetchable_directly() {
        let client = CatalogClient::new("http://127.0.0.1:9");
        let mut store = CatalogStore::new();
        let result = client
            .fetch_view(&mut store, CatalogView::SearchResults, &PageRequest::default())
            .await;
        assert!(matches!(result, Err(CatalogApiError::UnsupportedView(_))));
        assert!(!store.is_loading());
    }
}
