use crate::{
    models::payment::CheckoutMethod,
    requests::payment::PageQuery,
    services::checkout::AMOUNT_PROMPT,
    state::AppState,
    views::page::{self, Campaign, PageContext, PaymentStatusPage},
};
use actix_web::{HttpResponse, Result, http::header::ContentType, web};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, warn};

/// Landing page. Never talks to the payment provider except for the raised
/// total; `donate` in the query string is ignored.
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    render_page(&state, &query, None).await
}

/// Donate form submission: opens a checkout for the posted selection.
pub async fn donate(
    state: web::Data<AppState>,
    form: web::Form<PageQuery>,
) -> Result<HttpResponse> {
    render_page(&state, &form, form.donate).await
}

async fn render_page(
    state: &AppState,
    query: &PageQuery,
    method: Option<CheckoutMethod>,
) -> Result<HttpResponse> {
    let selector = query.selector();
    let mut checkout = state.checkout_initiator();
    let mut prompt = None;

    if let Some(method) = method {
        match checkout.open(&selector, method) {
            Ok(generation) => {
                checkout.settle().await;
                info!("Checkout #{} settled", generation);
            }
            Err(_) => prompt = Some(AMOUNT_PROMPT),
        }
    }

    let html = page::render(&PageContext {
        campaign: Campaign::from(&state.settings),
        selector: &selector,
        checkout: checkout.state(),
        prompt,
        raised: raised_total(state).await,
        year: Utc::now().year(),
    });

    Ok(HttpResponse::Ok().content_type(ContentType::html()).body(html))
}

async fn raised_total(state: &AppState) -> Option<Decimal> {
    if !state.settings.donation_totals_enabled {
        return None;
    }

    match state
        .gateway
        .donation_total(&state.settings.campaign_reference)
        .await
    {
        Ok(total) => Some(total.total),
        Err(e) => {
            warn!("Raised total unavailable: {}", e);
            None
        }
    }
}

async fn status_page(state: web::Data<AppState>, kind: PaymentStatusPage) -> Result<HttpResponse> {
    info!("Donor returned from Mercado Pago: {:?}", kind);
    let html = page::render_status(kind, &state.settings.athlete_name);
    Ok(HttpResponse::Ok().content_type(ContentType::html()).body(html))
}

pub async fn success(state: web::Data<AppState>) -> Result<HttpResponse> {
    status_page(state, PaymentStatusPage::Success).await
}

pub async fn failure(state: web::Data<AppState>) -> Result<HttpResponse> {
    status_page(state, PaymentStatusPage::Failure).await
}

pub async fn pending(state: web::Data<AppState>) -> Result<HttpResponse> {
    status_page(state, PaymentStatusPage::Pending).await
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
