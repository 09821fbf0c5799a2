use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{BookId, PagingState, UserId},
    error::{ApiError, Operation},
    protocol::{
        CreateReservationRequest, CreatedReservation, ErrorBody, Reservation, ReservationPage,
        UpdateReservationRequest,
    },
};
use tracing::{debug, info, warn};
use url::Url;

pub mod form;
pub mod list_state;

pub use form::{FormController, FormStatus, ReservationFields, Submission};
pub use list_state::ListState;

/// Remote operations of the reservation service. Implementations never
/// retry and never touch local list or form state.
#[async_trait]
pub trait ReservationApi: Send + Sync {
    async fn create(&self, user_id: UserId, book_id: BookId)
        -> Result<CreatedReservation, ApiError>;
    async fn fetch_page(&self, cursor: Option<&PagingState>) -> Result<ReservationPage, ApiError>;
    async fn fetch_detail(&self, book_id: BookId) -> Result<Reservation, ApiError>;
    async fn update(
        &self,
        old_book_id: BookId,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<(), ApiError>;
    async fn delete_by_book_id(&self, book_id: BookId) -> Result<(), ApiError>;
}

/// HTTP implementation of [`ReservationApi`].
#[derive(Debug, Clone)]
pub struct ReservationClient {
    http: Client,
    base_url: Url,
}

impl ReservationClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_http_client(Client::new(), base_url)
    }

    /// Uses a caller-built client, e.g. one with a transport timeout.
    pub fn with_http_client(http: Client, base_url: &str) -> Result<Self, ApiError> {
        let mut parsed = Url::parse(base_url.trim()).map_err(|e| ApiError::RequestSetup {
            detail: format!("invalid base url {base_url:?}: {e}"),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::RequestSetup {
                detail: format!("base url must be an http(s) url, got {base_url:?}"),
            });
        }
        // Url::join drops the last path segment unless it ends with '/'.
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::RequestSetup {
                detail: format!("cannot build url for {path:?}: {e}"),
            })
    }

    async fn execute(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|err| transport_error(operation, err))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let err = error_from_response(response).await;
        warn!(
            ?operation,
            status = status.as_u16(),
            kind = ?err.kind(),
            "reservations: server rejected request"
        );
        Err(err)
    }
}

#[async_trait]
impl ReservationApi for ReservationClient {
    async fn create(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<CreatedReservation, ApiError> {
        let url = self.endpoint("reservations/")?;
        let request = self
            .http
            .post(url)
            .json(&CreateReservationRequest { user_id, book_id });
        let response = self.execute(Operation::Create, request).await?;
        let created: CreatedReservation = decode(response).await?;
        info!(
            reservation_id = %created.id,
            %user_id,
            %book_id,
            "reservations: created"
        );
        Ok(created)
    }

    async fn fetch_page(&self, cursor: Option<&PagingState>) -> Result<ReservationPage, ApiError> {
        let url = self.endpoint("api/reservations")?;
        let mut request = self.http.get(url);
        if let Some(cursor) = cursor {
            request = request.query(&[("paging_state", cursor.as_str())]);
        }
        let response = self.execute(Operation::ListPage, request).await?;
        let page: ReservationPage = decode(response).await?;
        debug!(
            items = page.reservations.len(),
            has_more = page.next_paging_state.is_some(),
            "reservations: page fetched"
        );
        Ok(page)
    }

    async fn fetch_detail(&self, book_id: BookId) -> Result<Reservation, ApiError> {
        let url = self.endpoint(&format!("api/reservations/{book_id}"))?;
        let response = self
            .execute(Operation::Detail, self.http.get(url))
            .await?;
        decode(response).await
    }

    async fn update(
        &self,
        old_book_id: BookId,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("reservations/update/")?;
        let request = self.http.put(url).json(&UpdateReservationRequest {
            old_book_id,
            user_id,
            book_id,
        });
        self.execute(Operation::Update, request).await?;
        info!(
            %old_book_id,
            %user_id,
            %book_id,
            "reservations: updated"
        );
        Ok(())
    }

    async fn delete_by_book_id(&self, book_id: BookId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("reservations/{book_id}"))?;
        self.execute(Operation::Delete, self.http.delete(url))
            .await?;
        info!(%book_id, "reservations: deleted");
        Ok(())
    }
}

fn transport_error(operation: Operation, err: reqwest::Error) -> ApiError {
    let detail = error_chain(&err);
    let classified = if err.is_builder() {
        ApiError::RequestSetup { detail }
    } else {
        ApiError::NoResponse { detail }
    };
    warn!(?operation, kind = ?classified.kind(), "reservations: request did not complete: {classified}");
    classified
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let message = match response.bytes().await {
        Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message()),
        Err(_) => None,
    };
    match message {
        Some(message) => ApiError::Server { status, message },
        None => ApiError::ServerGeneric { status },
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(|err| ApiError::NoResponse {
        detail: error_chain(&err),
    })?;
    serde_json::from_slice(&body).map_err(|e| ApiError::InvalidResponse {
        status,
        detail: e.to_string(),
    })
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
