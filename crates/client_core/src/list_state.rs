use shared::{
    domain::{BookId, PagingState},
    error::ApiError,
    protocol::Reservation,
};
use tracing::debug;

use crate::ReservationApi;

/// One page of reservations plus the cursor for the page after it.
///
/// Transitions return a new value; the caller decides where to keep it.
/// Paging replaces the page rather than accumulating rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    items: Vec<Reservation>,
    cursor: Option<PagingState>,
}

impl ListState {
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Reservation] {
        &self.items
    }

    /// Token for the next page; `None` once the server reports the end.
    pub fn cursor(&self) -> Option<&PagingState> {
        self.cursor.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub async fn load_page<A>(
        &self,
        api: &A,
        cursor: Option<&PagingState>,
    ) -> Result<Self, ApiError>
    where
        A: ReservationApi + ?Sized,
    {
        let page = api.fetch_page(cursor).await?;
        debug!(
            replaced = self.items.len(),
            loaded = page.reservations.len(),
            has_more = page.next_paging_state.is_some(),
            "reservations: list page loaded"
        );
        Ok(Self {
            items: page.reservations,
            cursor: page.next_paging_state,
        })
    }

    pub fn remove_by_book_id(mut self, book_id: BookId) -> Self {
        self.items.retain(|reservation| reservation.book_id != book_id);
        self
    }

    /// Deletes remotely, then drops the row locally. On failure the current
    /// state is left as it was.
    pub async fn delete_reservation<A>(&self, api: &A, book_id: BookId) -> Result<Self, ApiError>
    where
        A: ReservationApi + ?Sized,
    {
        api.delete_by_book_id(book_id).await?;
        Ok(self.clone().remove_by_book_id(book_id))
    }
}

#[cfg(test)]
#[path = "tests/list_state_tests.rs"]
mod tests;
