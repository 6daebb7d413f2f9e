//! Idempotent payment submission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::api::{PaymentApi, PaymentResponse, TransportError};
use crate::notifications::NotificationCenter;
use crate::validation::{FieldError, PaymentForm};

pub const SUBMIT_SUCCESS: &str = "Payment submitted successfully.";

const CREATED_CAPACITY: usize = 16;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Payment form is invalid: {}", join(.0))]
    Invalid(Vec<FieldError>),

    #[error("Payment rejected: {0}")]
    Transport(#[from] TransportError),

    #[error("A payment is already being submitted")]
    InFlight,
}

fn join(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Submits payments under an idempotency key.
///
/// The key survives failed attempts, so resubmitting the same payment is
/// deduplicated by the service. It is replaced only after a success.
pub struct PaymentSubmitter {
    api: Arc<dyn PaymentApi>,
    notifications: NotificationCenter,
    idempotency_key: Mutex<Uuid>,
    submitting: AtomicBool,
    created: broadcast::Sender<PaymentResponse>,
}

impl PaymentSubmitter {
    pub fn new(api: Arc<dyn PaymentApi>, notifications: NotificationCenter) -> Self {
        let (created, _) = broadcast::channel(CREATED_CAPACITY);
        Self {
            api,
            notifications,
            idempotency_key: Mutex::new(Uuid::new_v4()),
            submitting: AtomicBool::new(false),
            created,
        }
    }

    /// Key the next submission will carry.
    pub fn idempotency_key(&self) -> Uuid {
        *self.idempotency_key.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Receives every successfully created payment.
    pub fn subscribe_created(&self) -> broadcast::Receiver<PaymentResponse> {
        self.created.subscribe()
    }

    /// Validate `form` and submit it.
    ///
    /// Validation failures return before anything is sent and leave the
    /// notification untouched. Transport failures show the mapped message.
    pub async fn submit(
        &self,
        form: &PaymentForm,
        currency_decimals: Option<u32>,
    ) -> Result<PaymentResponse, SubmitError> {
        let request = form.validate(currency_decimals).map_err(SubmitError::Invalid)?;

        if self.submitting.swap(true, Ordering::SeqCst) {
            return Err(SubmitError::InFlight);
        }
        let _submitting = SubmittingGuard(&self.submitting);

        self.notifications.clear();
        let key = self.idempotency_key();
        tracing::debug!(idempotency_key = %key, currency = %request.currency, "Submitting payment");

        match self.api.create_payment(&request, key).await {
            Ok(payment) => {
                tracing::info!(payment_id = %payment.id, idempotency_key = %key, "Payment submitted");
                self.notifications.show_success(SUBMIT_SUCCESS);
                *self.idempotency_key.lock().unwrap_or_else(|e| e.into_inner()) = Uuid::new_v4();
                // No subscribers is fine.
                let _ = self.created.send(payment.clone());
                Ok(payment)
            }
            Err(error) => {
                tracing::warn!(idempotency_key = %key, error = %error, "Payment submission failed");
                self.notifications.show_error(error.user_message());
                Err(error.into())
            }
        }
    }
}

struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
