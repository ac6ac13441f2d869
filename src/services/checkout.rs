use crate::models::donation::AmountSelector;
use crate::models::payment::{CheckoutMethod, GENERIC_PAYMENT_ERROR, PaymentArtifact, PaymentError};
use crate::services::mercado_pago::PaymentGateway;
use futures_util::future::{AbortHandle, Abortable};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

pub const AMOUNT_PROMPT: &str = "Por favor, escolha ou digite um valor para doar.";

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
    Idle,
    Opening { amount: Decimal, method: CheckoutMethod },
    Ready { amount: Decimal, artifact: PaymentArtifact },
    Failed { amount: Decimal, message: String },
}

impl CheckoutState {
    pub fn is_loading(&self) -> bool {
        matches!(self, CheckoutState::Opening { .. })
    }

    pub fn artifact(&self) -> Option<&PaymentArtifact> {
        match self {
            CheckoutState::Ready { artifact, .. } => Some(artifact),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CheckoutState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn amount(&self) -> Option<Decimal> {
        match self {
            CheckoutState::Idle => None,
            CheckoutState::Opening { amount, .. }
            | CheckoutState::Ready { amount, .. }
            | CheckoutState::Failed { amount, .. } => Some(*amount),
        }
    }
}

/// Result of one provider request, tagged with the session it belongs to.
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub generation: u64,
    pub amount: Decimal,
    pub result: Result<PaymentArtifact, PaymentError>,
}

/// Drives a single checkout session against the payment gateway.
///
/// Every `open` starts a new generation. Results are only applied when they
/// carry the current generation and the amount the session was opened for,
/// so closing or re-opening makes any earlier request irrelevant even if it
/// already finished. Each request reports over its own oneshot channel; when
/// the task ends without reporting, the session fails instead of waiting.
pub struct CheckoutInitiator {
    gateway: Arc<dyn PaymentGateway>,
    description: String,
    timeout: Duration,
    state: CheckoutState,
    generation: u64,
    in_flight: Option<AbortHandle>,
    pending: Option<oneshot::Receiver<CheckoutOutcome>>,
}

impl CheckoutInitiator {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        description: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            description: description.into(),
            timeout,
            state: CheckoutState::Idle,
            generation: 0,
            in_flight: None,
            pending: None,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a provider request for the selector's current amount.
    ///
    /// Returns the new generation, or a validation error holding the prompt
    /// to show the donor when there is nothing to donate. In that case the
    /// session is left untouched.
    pub fn open(
        &mut self,
        selector: &AmountSelector,
        method: CheckoutMethod,
    ) -> Result<u64, PaymentError> {
        if !selector.can_checkout() {
            return Err(PaymentError::Validation(AMOUNT_PROMPT.to_string()));
        }

        let amount = selector.amount();
        self.cancel_in_flight();
        self.generation += 1;
        self.state = CheckoutState::Opening { amount, method };

        let generation = self.generation;
        let gateway = Arc::clone(&self.gateway);
        let description = self.description.clone();
        let timeout = self.timeout;
        let (outcome_tx, outcome_rx) = oneshot::channel();

        let request = async move {
            let result =
                match tokio::time::timeout(timeout, gateway.create(method, amount, &description))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(PaymentError::Network(format!(
                        "payment provider did not answer within {:?}",
                        timeout
                    ))),
                };

            // Receiver is gone once the session is closed or replaced.
            let _ = outcome_tx.send(CheckoutOutcome {
                generation,
                amount,
                result,
            });
        };

        let (handle, registration) = AbortHandle::new_pair();
        tokio::spawn(Abortable::new(request, registration));
        self.in_flight = Some(handle);
        self.pending = Some(outcome_rx);

        info!(
            "Opening {} checkout #{} for amount {}",
            method, generation, amount
        );
        Ok(generation)
    }

    pub fn close(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
        self.state = CheckoutState::Idle;
    }

    /// Applies a finished request. Returns `false` when the outcome belongs
    /// to a session that was closed or replaced.
    pub fn apply(&mut self, outcome: CheckoutOutcome) -> bool {
        let expected_amount = match &self.state {
            CheckoutState::Opening { amount, .. } => *amount,
            _ => {
                debug!("Dropping checkout #{}: session not opening", outcome.generation);
                return false;
            }
        };

        if outcome.generation != self.generation || outcome.amount != expected_amount {
            debug!(
                "Dropping stale checkout #{} (current #{})",
                outcome.generation, self.generation
            );
            return false;
        }

        self.in_flight = None;
        self.pending = None;
        self.state = match outcome.result {
            Ok(artifact) => CheckoutState::Ready {
                amount: expected_amount,
                artifact,
            },
            Err(e) => {
                error!(
                    "Checkout #{} for amount {} failed: {}",
                    outcome.generation, expected_amount, e
                );
                CheckoutState::Failed {
                    amount: expected_amount,
                    message: GENERIC_PAYMENT_ERROR.to_string(),
                }
            }
        };
        true
    }

    /// Waits until the current session leaves `Opening`.
    ///
    /// A request task that is aborted or panics drops its sender; the
    /// session then fails with the generic message.
    pub async fn settle(&mut self) -> &CheckoutState {
        if !self.state.is_loading() {
            return &self.state;
        }
        let (Some(receiver), Some(amount)) = (self.pending.take(), self.state.amount()) else {
            return &self.state;
        };

        let outcome = receiver.await.unwrap_or_else(|_| CheckoutOutcome {
            generation: self.generation,
            amount,
            result: Err(PaymentError::Network(
                "checkout request ended without an answer".to_string(),
            )),
        });
        self.apply(outcome);

        &self.state
    }

    fn cancel_in_flight(&mut self) {
        self.pending = None;
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl Drop for CheckoutInitiator {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
