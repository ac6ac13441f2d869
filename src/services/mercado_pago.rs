use crate::config::settings::Settings;
use crate::models::donation::DonationAmount;
use crate::models::payment::{
    CheckoutMethod, DonationTotal, GatewayError, HostedCheckout, InstantPayment,
    PaymentArtifact, PaymentError,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

const SEARCH_PAGE_SIZE: u64 = 100;

/// Boundary to the payment provider. Implementations must refuse amounts
/// that are `<= 0` once rounded to cents, without touching the network.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_hosted_checkout(
        &self,
        amount: Decimal,
        description: &str,
    ) -> Result<HostedCheckout, PaymentError>;

    async fn create_instant_payment(
        &self,
        amount: Decimal,
        description: &str,
    ) -> Result<InstantPayment, PaymentError>;

    async fn donation_total(&self, campaign_reference: &str) -> Result<DonationTotal, PaymentError>;

    async fn create(
        &self,
        method: CheckoutMethod,
        amount: Decimal,
        description: &str,
    ) -> Result<PaymentArtifact, PaymentError> {
        match method {
            CheckoutMethod::Hosted => self
                .create_hosted_checkout(amount, description)
                .await
                .map(PaymentArtifact::from),
            CheckoutMethod::Instant => self
                .create_instant_payment(amount, description)
                .await
                .map(PaymentArtifact::from),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MercadoPagoConfig {
    pub access_token: String,
    pub api_base_url: String,
    pub campaign_reference: String,
    pub success_url: String,
    pub failure_url: String,
    pub pending_url: String,
}

impl From<&Settings> for MercadoPagoConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            access_token: settings.mp_access_token.clone(),
            api_base_url: settings.mp_api_base_url.clone(),
            campaign_reference: settings.campaign_reference.clone(),
            success_url: settings.back_url("sucesso"),
            failure_url: settings.back_url("falha"),
            pending_url: settings.back_url("pendente"),
        }
    }
}

#[derive(Debug, Serialize)]
struct PreferenceItem<'a> {
    id: &'a str,
    title: &'a str,
    quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    unit_price: Decimal,
    currency_id: &'a str,
}

#[derive(Debug, Serialize)]
struct BackUrls<'a> {
    success: &'a str,
    failure: &'a str,
    pending: &'a str,
}

#[derive(Debug, Serialize)]
struct PreferenceRequest<'a> {
    items: Vec<PreferenceItem<'a>>,
    back_urls: BackUrls<'a>,
    external_reference: &'a str,
}

#[derive(Debug, Deserialize)]
struct PreferenceResponse {
    id: String,
    init_point: Option<String>,
}

#[derive(Debug, Serialize)]
struct Payer {
    email: String,
}

#[derive(Debug, Serialize)]
struct PixPaymentRequest<'a> {
    #[serde(with = "rust_decimal::serde::float")]
    transaction_amount: Decimal,
    description: &'a str,
    payment_method_id: &'a str,
    payer: Payer,
    external_reference: &'a str,
}

#[derive(Debug, Deserialize)]
struct TransactionData {
    qr_code: Option<String>,
    qr_code_base64: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PointOfInteraction {
    transaction_data: Option<TransactionData>,
}

#[derive(Debug, Deserialize)]
struct PixPaymentResponse {
    id: serde_json::Value,
    point_of_interaction: Option<PointOfInteraction>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    transaction_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
    paging: Paging,
}

pub struct MercadoPagoGateway {
    client: Client,
    config: MercadoPagoConfig,
}

impl MercadoPagoGateway {
    pub fn new(config: MercadoPagoConfig, client: Client) -> Self {
        Self { client, config }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(settings.gateway_timeout())
            .build()?;

        Ok(Self::new(MercadoPagoConfig::from(settings), client))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.config.access_token)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Mercado Pago answered {}: {}", status, body);
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PaymentGateway for MercadoPagoGateway {
    async fn create_hosted_checkout(
        &self,
        amount: Decimal,
        description: &str,
    ) -> Result<HostedCheckout, PaymentError> {
        let amount = DonationAmount::new(amount)?;

        let body = PreferenceRequest {
            items: vec![PreferenceItem {
                id: &self.config.campaign_reference,
                title: description,
                quantity: 1,
                unit_price: amount.to_provider(),
                currency_id: "BRL",
            }],
            back_urls: BackUrls {
                success: &self.config.success_url,
                failure: &self.config.failure_url,
                pending: &self.config.pending_url,
            },
            external_reference: &self.config.campaign_reference,
        };

        let response = self
            .authorized(self.client.post(self.url("/checkout/preferences")))
            .json(&body)
            .send()
            .await?;
        let preference: PreferenceResponse = Self::read_json(response).await?;

        let redirect_url = preference.init_point.ok_or_else(|| {
            GatewayError::MalformedResponse("preference without init_point".to_string())
        })?;

        info!("Created checkout preference {} for {}", preference.id, amount.value());

        Ok(HostedCheckout {
            id: preference.id,
            redirect_url,
        })
    }

    async fn create_instant_payment(
        &self,
        amount: Decimal,
        description: &str,
    ) -> Result<InstantPayment, PaymentError> {
        let amount = DonationAmount::new(amount)?;

        let body = PixPaymentRequest {
            transaction_amount: amount.to_provider(),
            description,
            payment_method_id: "pix",
            payer: Payer {
                email: format!("doador-{}@example.com", Uuid::new_v4().simple()),
            },
            external_reference: &self.config.campaign_reference,
        };

        let response = self
            .authorized(self.client.post(self.url("/v1/payments")))
            .header("X-Idempotency-Key", Uuid::new_v4().to_string())
            .json(&body)
            .send()
            .await?;
        let payment: PixPaymentResponse = Self::read_json(response).await?;

        let transaction_data = payment
            .point_of_interaction
            .and_then(|poi| poi.transaction_data)
            .ok_or_else(|| {
                GatewayError::MalformedResponse("PIX payment without transaction data".to_string())
            })?;

        let (Some(copy_paste_code), Some(qr_code_base64)) =
            (transaction_data.qr_code, transaction_data.qr_code_base64)
        else {
            return Err(GatewayError::MalformedResponse(
                "PIX transaction data without QR code".to_string(),
            )
            .into());
        };

        let payment_id = match payment.id {
            serde_json::Value::String(id) => id,
            other => other.to_string(),
        };

        info!("Created PIX payment {} for {}", payment_id, amount.value());

        Ok(InstantPayment {
            payment_id,
            qr_code_image_data_uri: format!("data:image/jpeg;base64,{}", qr_code_base64),
            copy_paste_code,
        })
    }

    async fn donation_total(&self, campaign_reference: &str) -> Result<DonationTotal, PaymentError> {
        let mut total = Decimal::ZERO;
        let mut count = 0u64;
        let mut offset = 0u64;

        loop {
            let response = self
                .authorized(self.client.get(self.url("/v1/payments/search")))
                .query(&[
                    ("external_reference", campaign_reference.to_string()),
                    ("status", "approved".to_string()),
                    ("limit", SEARCH_PAGE_SIZE.to_string()),
                    ("offset", offset.to_string()),
                ])
                .send()
                .await?;
            let page: SearchResponse = Self::read_json(response).await?;

            if page.results.is_empty() {
                break;
            }

            offset += page.results.len() as u64;
            for result in page.results {
                total += result.transaction_amount.unwrap_or_default();
                count += 1;
            }

            if offset >= page.paging.total {
                break;
            }
        }

        Ok(DonationTotal { total, count })
    }
}
