use crate::config::settings::Settings;
use crate::services::checkout::CheckoutInitiator;
use crate::services::mercado_pago::PaymentGateway;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn PaymentGateway>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(gateway: Arc<dyn PaymentGateway>, settings: Settings) -> Self {
        Self { gateway, settings }
    }

    pub fn checkout_initiator(&self) -> CheckoutInitiator {
        CheckoutInitiator::new(
            Arc::clone(&self.gateway),
            self.settings.campaign_description.clone(),
            self.settings.gateway_timeout(),
        )
    }
}
