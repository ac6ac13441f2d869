use crate::models::payment::PaymentError;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const DONATION_PRESETS: [u32; 4] = [25, 50, 100, 250];
pub const DEFAULT_DONATION: u32 = 50;

/// Amount at cents precision that is still `> 0` after rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DonationAmount(Decimal);

impl DonationAmount {
    pub fn new(amount: Decimal) -> Result<Self, PaymentError> {
        let cents = amount.round_dp(2);
        if cents <= Decimal::ZERO {
            return Err(PaymentError::invalid_amount(amount));
        }
        Ok(Self(cents))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Provider-facing value; identical to what passed validation.
    pub fn to_provider(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for DonationAmount {
    type Error = PaymentError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

/// Tracks which amount the visitor picked, either one of the preset buttons
/// or the free-form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountSelector {
    amount: Decimal,
    custom_input: String,
}

impl Default for AmountSelector {
    fn default() -> Self {
        Self {
            amount: Decimal::from(DEFAULT_DONATION),
            custom_input: String::new(),
        }
    }
}

impl AmountSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presets(&self) -> impl Iterator<Item = Decimal> {
        DONATION_PRESETS.into_iter().map(Decimal::from)
    }

    pub fn select_preset(&mut self, amount: Decimal) {
        self.amount = amount;
        self.custom_input.clear();
    }

    pub fn set_custom_input(&mut self, raw: &str) {
        self.custom_input = raw.chars().filter(char::is_ascii_digit).collect();

        self.amount = if self.custom_input.is_empty() {
            Decimal::from(DEFAULT_DONATION)
        } else {
            Decimal::from_str(&self.custom_input)
                .unwrap_or_else(|_| Decimal::from(DEFAULT_DONATION))
        };
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn custom_input(&self) -> &str {
        &self.custom_input
    }

    // A typed value equal to a preset must not light that preset up.
    pub fn is_preset_selected(&self, amount: Decimal) -> bool {
        self.custom_input.is_empty() && self.amount == amount
    }

    pub fn can_checkout(&self) -> bool {
        self.donation_amount().is_ok()
    }

    pub fn donation_amount(&self) -> Result<DonationAmount, PaymentError> {
        DonationAmount::new(self.amount)
    }
}
