#![allow(dead_code)]

use async_trait::async_trait;
use donation_page::config::settings::Settings;
use donation_page::models::payment::{
    DonationTotal, GatewayError, HostedCheckout, InstantPayment, PaymentError,
};
use donation_page::services::mercado_pago::PaymentGateway;
use donation_page::state::AppState;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

pub const REDIRECT_URL: &str = "https://pay.example/test";

#[derive(Default)]
pub struct FakeGateway {
    pub fail: bool,
    pub calls: Mutex<Vec<(Decimal, String)>>,
}

impl FakeGateway {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, amount: Decimal, description: &str) -> Result<(), PaymentError> {
        self.calls
            .lock()
            .unwrap()
            .push((amount, description.to_string()));
        if self.fail {
            return Err(GatewayError::Rejected {
                status: 502,
                body: "upstream down".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_hosted_checkout(
        &self,
        amount: Decimal,
        description: &str,
    ) -> Result<HostedCheckout, PaymentError> {
        self.record(amount, description)?;
        Ok(HostedCheckout {
            id: "pref-123".to_string(),
            redirect_url: REDIRECT_URL.to_string(),
        })
    }

    async fn create_instant_payment(
        &self,
        amount: Decimal,
        description: &str,
    ) -> Result<InstantPayment, PaymentError> {
        self.record(amount, description)?;
        Ok(InstantPayment {
            payment_id: "987".to_string(),
            qr_code_image_data_uri: "data:image/jpeg;base64,QUJD".to_string(),
            copy_paste_code: "00020126pix".to_string(),
        })
    }

    async fn donation_total(&self, _campaign_reference: &str) -> Result<DonationTotal, PaymentError> {
        if self.fail {
            return Err(PaymentError::Network("offline".to_string()));
        }
        Ok(DonationTotal {
            total: Decimal::from(1500),
            count: 12,
        })
    }
}

pub fn settings(donation_totals_enabled: bool) -> Settings {
    let builder = Settings::defaults()
        .unwrap()
        .set_override("mp_access_token", "TEST-TOKEN")
        .unwrap()
        .set_override("donation_totals_enabled", donation_totals_enabled)
        .unwrap();
    Settings::build(builder).unwrap()
}

pub fn app_state(gateway: Arc<FakeGateway>, donation_totals_enabled: bool) -> AppState {
    AppState::new(gateway, settings(donation_totals_enabled))
}
