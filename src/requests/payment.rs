use crate::models::donation::{AmountSelector, DonationAmount};
use crate::models::payment::CheckoutMethod;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
}

impl PaymentRequest {
    /// Amount rounded to cents; `None` when missing or not positive after
    /// rounding.
    pub fn valid_amount(&self) -> Option<Decimal> {
        self.amount
            .and_then(|amount| DonationAmount::new(amount).ok())
            .map(|amount| amount.value())
    }

    pub fn description_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.description.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => description,
            _ => fallback,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub amount: Option<String>,
    pub custom: Option<String>,
    pub donate: Option<CheckoutMethod>,
}

impl PageQuery {
    /// Rebuilds the selector from the query string or form. Unknown presets and
    /// garbage amounts leave the default in place.
    pub fn selector(&self) -> AmountSelector {
        let mut selector = AmountSelector::new();

        if let Some(custom) = self.custom.as_deref() {
            if custom.chars().any(|c| c.is_ascii_digit()) {
                selector.set_custom_input(custom);
                return selector;
            }
        }

        if let Some(amount) = self.amount.as_deref().and_then(|a| a.trim().parse::<Decimal>().ok()) {
            if selector.presets().any(|preset| preset == amount) {
                selector.select_preset(amount);
            }
        }

        selector
    }
}
