use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::{
    domain::{BookId, PagingState, ReservationId, UserId},
    error::ApiError,
    protocol::{CreatedReservation, Reservation, ReservationPage},
};
use uuid::Uuid;

use crate::ReservationApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Create {
        user_id: UserId,
        book_id: BookId,
    },
    FetchPage(Option<PagingState>),
    FetchDetail(BookId),
    Update {
        old_book_id: BookId,
        user_id: UserId,
        book_id: BookId,
    },
    Delete(BookId),
}

/// In-memory [`ReservationApi`] that records every call.
pub(crate) struct StubApi {
    calls: Mutex<Vec<Call>>,
    pages: Mutex<VecDeque<ReservationPage>>,
    created_id: String,
    fail_with: Option<ApiError>,
}

impl StubApi {
    pub(crate) fn ok() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            pages: Mutex::new(VecDeque::new()),
            created_id: "R1".into(),
            fail_with: None,
        }
    }

    pub(crate) fn failing(err: ApiError) -> Self {
        let mut api = Self::ok();
        api.fail_with = Some(err);
        api
    }

    pub(crate) fn with_pages(pages: Vec<ReservationPage>) -> Self {
        let api = Self::ok();
        *api.pages.lock().expect("pages") = pages.into();
        api
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls").clone()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().expect("calls").push(call);
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ReservationApi for StubApi {
    async fn create(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<CreatedReservation, ApiError> {
        self.record(Call::Create { user_id, book_id })?;
        Ok(CreatedReservation {
            id: ReservationId(self.created_id.clone()),
            user_id: Some(user_id),
            book_id: Some(book_id),
            reserved_at: None,
        })
    }

    async fn fetch_page(&self, cursor: Option<&PagingState>) -> Result<ReservationPage, ApiError> {
        self.record(Call::FetchPage(cursor.cloned()))?;
        Ok(self
            .pages
            .lock()
            .expect("pages")
            .pop_front()
            .unwrap_or_default())
    }

    async fn fetch_detail(&self, book_id: BookId) -> Result<Reservation, ApiError> {
        self.record(Call::FetchDetail(book_id))?;
        Ok(reservation("detail", book_id))
    }

    async fn update(
        &self,
        old_book_id: BookId,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<(), ApiError> {
        self.record(Call::Update {
            old_book_id,
            user_id,
            book_id,
        })
    }

    async fn delete_by_book_id(&self, book_id: BookId) -> Result<(), ApiError> {
        self.record(Call::Delete(book_id))
    }
}

pub(crate) const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
pub(crate) const BOOK: &str = "144802ea-d54c-45eb-98e5-9533497e6998";

pub(crate) fn book(n: u128) -> BookId {
    BookId(Uuid::from_u128(n))
}

pub(crate) fn reservation(id: &str, book_id: BookId) -> Reservation {
    Reservation {
        id: ReservationId(id.into()),
        user_id: UserId(Uuid::from_u128(0xAA)),
        book_id,
        reserved_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        book: None,
    }
}

pub(crate) fn page(items: Vec<Reservation>, next: Option<&str>) -> ReservationPage {
    ReservationPage {
        reservations: items,
        next_paging_state: next.map(|token| PagingState::from(token.to_string())),
    }
}
