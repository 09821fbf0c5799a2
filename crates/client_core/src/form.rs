use shared::{
    domain::{BookId, UserId},
    error::{ApiError, Operation},
    validation::IdentifierField,
};
use tracing::{debug, warn};

use crate::ReservationApi;

pub const INVALID_IDENTIFIERS_MESSAGE: &str = "Both User ID and Book ID must be valid UUIDs.";
pub const UPDATED_MESSAGE: &str = "Reservation updated successfully.";

/// Raw text of the create/update form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFields {
    pub user_id: String,
    pub book_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting {
        operation: Operation,
    },
    Success {
        message: String,
    },
    Error {
        error: ApiError,
        message: String,
    },
}

/// A validated request, ready to be sent exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Create {
        user_id: UserId,
        book_id: BookId,
    },
    Update {
        old_book_id: BookId,
        user_id: UserId,
        book_id: BookId,
    },
}

impl Submission {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Create { .. } => Operation::Create,
            Self::Update { .. } => Operation::Update,
        }
    }

    /// Sends the request and returns the success message to display.
    pub async fn send<A>(self, api: &A) -> Result<String, ApiError>
    where
        A: ReservationApi + ?Sized,
    {
        match self {
            Self::Create { user_id, book_id } => {
                let created = api.create(user_id, book_id).await?;
                Ok(format!("Reservation created: {}", created.id))
            }
            Self::Update {
                old_book_id,
                user_id,
                book_id,
            } => {
                api.update(old_book_id, user_id, book_id).await?;
                Ok(UPDATED_MESSAGE.to_string())
            }
        }
    }
}

/// Create/update form state machine:
/// `Idle -> Submitting -> {Success, Error}`, back to `Idle` on the next edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormController {
    fields: ReservationFields,
    status: FormStatus,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update form seeded with the reservation's current values.
    pub fn prefilled(user_id: impl Into<String>, book_id: impl Into<String>) -> Self {
        Self {
            fields: ReservationFields {
                user_id: user_id.into(),
                book_id: book_id.into(),
            },
            status: FormStatus::Idle,
        }
    }

    pub fn fields(&self) -> &ReservationFields {
        &self.fields
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.status, FormStatus::Submitting { .. })
    }

    pub fn set_user_id(mut self, value: impl Into<String>) -> Self {
        self.fields.user_id = value.into();
        self.after_edit()
    }

    pub fn set_book_id(mut self, value: impl Into<String>) -> Self {
        self.fields.book_id = value.into();
        self.after_edit()
    }

    fn after_edit(mut self) -> Self {
        if !self.is_submitting() {
            self.status = FormStatus::Idle;
        }
        self
    }

    /// Validates the fields. Returns the submission to send together with
    /// the `Submitting` controller, or no submission and an `Error`
    /// controller when validation fails.
    pub fn begin_create(self) -> (Self, Option<Submission>) {
        if self.is_submitting() {
            return self.refuse_duplicate();
        }
        match self.parse_fields() {
            Ok((user_id, book_id)) => self.submitting(Submission::Create { user_id, book_id }),
            Err(error) => (self.failed(error, INVALID_IDENTIFIERS_MESSAGE.to_string()), None),
        }
    }

    pub fn begin_update(self, old_book_id: &str) -> (Self, Option<Submission>) {
        if self.is_submitting() {
            return self.refuse_duplicate();
        }
        let (user_id, book_id) = match self.parse_fields() {
            Ok(ids) => ids,
            Err(error) => {
                return (self.failed(error, INVALID_IDENTIFIERS_MESSAGE.to_string()), None);
            }
        };
        let old_book_id = match BookId::parse(old_book_id) {
            Ok(id) => id,
            Err(error) => {
                let error = ApiError::Validation(error.for_field(IdentifierField::OldBookId));
                let message = error.user_message(Operation::Update);
                return (self.failed(error, message), None);
            }
        };
        self.submitting(Submission::Update {
            old_book_id,
            user_id,
            book_id,
        })
    }

    /// Applies the outcome of the in-flight submission. Outcomes arriving
    /// when nothing is in flight are dropped.
    pub fn settle(mut self, outcome: Result<String, ApiError>) -> Self {
        let FormStatus::Submitting { operation } = self.status else {
            warn!("reservations: dropping outcome with no submission in flight");
            return self;
        };
        self.status = match outcome {
            Ok(message) => FormStatus::Success { message },
            Err(error) => {
                let message = error.user_message(operation);
                FormStatus::Error { error, message }
            }
        };
        self
    }

    pub async fn submit_create<A>(self, api: &A) -> Self
    where
        A: ReservationApi + ?Sized,
    {
        let (controller, submission) = self.begin_create();
        controller.send(api, submission).await
    }

    pub async fn submit_update<A>(self, api: &A, old_book_id: &str) -> Self
    where
        A: ReservationApi + ?Sized,
    {
        let (controller, submission) = self.begin_update(old_book_id);
        controller.send(api, submission).await
    }

    async fn send<A>(self, api: &A, submission: Option<Submission>) -> Self
    where
        A: ReservationApi + ?Sized,
    {
        match submission {
            Some(submission) => {
                let outcome = submission.send(api).await;
                self.settle(outcome)
            }
            None => self,
        }
    }

    fn parse_fields(&self) -> Result<(UserId, BookId), ApiError> {
        let user_id = UserId::parse(&self.fields.user_id)?;
        let book_id = BookId::parse(&self.fields.book_id)?;
        Ok((user_id, book_id))
    }

    fn submitting(mut self, submission: Submission) -> (Self, Option<Submission>) {
        let operation = submission.operation();
        debug!(?operation, "reservations: submitting form");
        self.status = FormStatus::Submitting { operation };
        (self, Some(submission))
    }

    fn failed(mut self, error: ApiError, message: String) -> Self {
        debug!(kind = ?error.kind(), "reservations: form rejected locally");
        self.status = FormStatus::Error { error, message };
        self
    }

    fn refuse_duplicate(self) -> (Self, Option<Submission>) {
        warn!("reservations: submission refused while another is in flight");
        (self, None)
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
