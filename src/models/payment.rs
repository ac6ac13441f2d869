use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Message shown to donors whenever a checkout could not be produced. The
/// underlying cause only goes to the logs.
pub const GENERIC_PAYMENT_ERROR: &str = "Não foi possível gerar o pagamento. Tente novamente.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Provider rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("Network error: {0}")]
    Network(String),
}

impl PaymentError {
    pub fn invalid_amount(amount: Decimal) -> Self {
        PaymentError::Validation(format!("Donation amount must be positive, got {}", amount))
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PaymentError::Gateway(GatewayError::MalformedResponse(err.to_string()))
        } else {
            PaymentError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMethod {
    #[default]
    Hosted,
    #[serde(alias = "pix")]
    Instant,
}

impl CheckoutMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMethod::Hosted => "hosted",
            CheckoutMethod::Instant => "instant",
        }
    }
}

impl fmt::Display for CheckoutMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckoutMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hosted" => Ok(CheckoutMethod::Hosted),
            "instant" | "pix" => Ok(CheckoutMethod::Instant),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedCheckout {
    pub id: String,
    pub redirect_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantPayment {
    pub payment_id: String,
    pub qr_code_image_data_uri: String,
    pub copy_paste_code: String,
}

/// What the provider handed back for a donation. Never mutated after it is
/// received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentArtifact {
    RedirectCheckout { id: String, url: String },
    PixPayment {
        payment_id: String,
        qr_code_image_data_uri: String,
        copy_paste_code: String,
    },
}

impl From<HostedCheckout> for PaymentArtifact {
    fn from(checkout: HostedCheckout) -> Self {
        PaymentArtifact::RedirectCheckout {
            id: checkout.id,
            url: checkout.redirect_url,
        }
    }
}

impl From<InstantPayment> for PaymentArtifact {
    fn from(payment: InstantPayment) -> Self {
        PaymentArtifact::PixPayment {
            payment_id: payment.payment_id,
            qr_code_image_data_uri: payment.qr_code_image_data_uri,
            copy_paste_code: payment.copy_paste_code,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DonationTotal {
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: u64,
}
