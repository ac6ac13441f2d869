use crate::state::AppState;
use actix_web::{HttpResponse, Result, web};
use serde_json::json;
use tracing::{error, info};

/// Approved total for the campaign, or `{}` while the counter is switched off
/// or the provider lookup fails.
pub async fn total(state: web::Data<AppState>) -> Result<HttpResponse> {
    if !state.settings.donation_totals_enabled {
        return Ok(HttpResponse::Ok().json(json!({})));
    }

    let reference = &state.settings.campaign_reference;
    info!("Fetching approved donations for {}", reference);

    match state.gateway.donation_total(reference).await {
        Ok(total) => Ok(HttpResponse::Ok().json(total)),
        Err(e) => {
            error!("Error fetching donation total: {}", e);
            Ok(HttpResponse::Ok().json(json!({})))
        }
    }
}
