use crate::{
    models::payment::PaymentError,
    requests::payment::PaymentRequest,
    state::AppState,
    utils::helpers::{ApiError, INVALID_AMOUNT_MESSAGE},
};
use actix_web::{HttpResponse, Result, web};
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub id: String,
    pub init_point: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixResponse {
    pub qr_code_image: String,
    pub qr_code_copy_paste: String,
    pub payment_id: String,
}

pub async fn create_checkout(
    state: web::Data<AppState>,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse> {
    let Some(amount) = request.valid_amount() else {
        warn!("Rejected checkout with amount {:?}", request.amount);
        return Ok(HttpResponse::BadRequest().json(ApiError::new(INVALID_AMOUNT_MESSAGE)));
    };
    let description = request.description_or(&state.settings.campaign_description);
    info!("Creating hosted checkout for amount {}", amount);

    match state.gateway.create_hosted_checkout(amount, description).await {
        Ok(checkout) => Ok(HttpResponse::Created().json(CheckoutResponse {
            id: checkout.id,
            init_point: checkout.redirect_url,
        })),
        Err(PaymentError::Validation(e)) => {
            warn!("Gateway refused amount {}: {}", amount, e);
            Ok(HttpResponse::BadRequest().json(ApiError::new(INVALID_AMOUNT_MESSAGE)))
        }
        Err(e) => {
            error!("Error creating Mercado Pago preference: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::new("Falha ao comunicar com o Mercado Pago.")))
        }
    }
}

pub async fn create_pix(
    state: web::Data<AppState>,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse> {
    let Some(amount) = request.valid_amount() else {
        warn!("Rejected PIX payment with amount {:?}", request.amount);
        return Ok(HttpResponse::BadRequest().json(ApiError::new(INVALID_AMOUNT_MESSAGE)));
    };
    let description = request.description_or(&state.settings.campaign_description);
    info!("Creating PIX payment for amount {}", amount);

    match state.gateway.create_instant_payment(amount, description).await {
        Ok(payment) => Ok(HttpResponse::Ok().json(PixResponse {
            qr_code_image: payment.qr_code_image_data_uri,
            qr_code_copy_paste: payment.copy_paste_code,
            payment_id: payment.payment_id,
        })),
        Err(PaymentError::Validation(e)) => {
            warn!("Gateway refused amount {}: {}", amount, e);
            Ok(HttpResponse::BadRequest().json(ApiError::new(INVALID_AMOUNT_MESSAGE)))
        }
        Err(e) => {
            error!("Error generating PIX payment: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::new("Falha ao gerar o pagamento PIX.")))
        }
    }
}
