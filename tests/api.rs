mod common;

use actix_web::{App, http::StatusCode, test, web};
use common::{FakeGateway, REDIRECT_URL, app_state};
use donation_page::models::payment::GENERIC_PAYMENT_ERROR;
use donation_page::routes;
use donation_page::services::checkout::AMOUNT_PROMPT;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::sync::Arc;

macro_rules! app {
    ($gateway:expr, $totals:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state($gateway, $totals)))
                .configure(routes::api::scoped_config),
        )
        .await
    };
}

async fn page_body(gateway: Arc<FakeGateway>, uri: &str, totals: bool) -> String {
    let app = app!(gateway, totals);
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

/// Submits the donate form the way the landing page does.
async fn donate_body(gateway: Arc<FakeGateway>, form: &[(&str, &str)]) -> String {
    let app = app!(gateway, false);
    let req = test::TestRequest::post().uri("/").set_form(form).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

#[actix_web::test]
async fn checkout_returns_created_with_init_point() {
    let gateway = Arc::new(FakeGateway::default());
    let app = app!(gateway.clone(), false);

    let req = test::TestRequest::post()
        .uri("/checkout")
        .set_json(json!({ "amount": 50, "description": "Passagem" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "id": "pref-123", "init_point": REDIRECT_URL }));
    assert_eq!(
        gateway.calls.lock().unwrap().as_slice(),
        &[(Decimal::from(50), "Passagem".to_string())]
    );
}

#[actix_web::test]
async fn checkout_without_description_uses_campaign_description() {
    let gateway = Arc::new(FakeGateway::default());
    let app = app!(gateway.clone(), false);

    let req = test::TestRequest::post()
        .uri("/checkout")
        .set_json(json!({ "amount": 25.5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let calls = gateway.calls.lock().unwrap();
    assert_eq!(calls[0].0, Decimal::new(255, 1));
    assert_eq!(calls[0].1, "Doação para a campanha do atleta");
}

#[actix_web::test]
async fn non_positive_amounts_are_rejected_before_the_gateway() {
    let gateway = Arc::new(FakeGateway::default());
    let app = app!(gateway.clone(), false);

    for (uri, body) in [
        ("/checkout", json!({ "amount": 0 })),
        ("/checkout", json!({ "amount": -10 })),
        ("/checkout", json!({ "description": "sem valor" })),
        ("/pix", json!({ "amount": 0 })),
        ("/checkout", json!({ "amount": 0.004 })),
        ("/pix", json!({ "amount": 0.004 })),
    ] {
        let req = test::TestRequest::post().uri(uri).set_json(body).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    assert_eq!(gateway.call_count(), 0);
}

#[actix_web::test]
async fn checkout_sends_amount_rounded_to_cents() {
    let gateway = Arc::new(FakeGateway::default());
    let app = app!(gateway.clone(), false);

    let req = test::TestRequest::post()
        .uri("/checkout")
        .set_json(json!({ "amount": 10.456 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(gateway.calls.lock().unwrap()[0].0, Decimal::new(1046, 2));
}

#[actix_web::test]
async fn malformed_body_is_a_bad_request() {
    let gateway = Arc::new(FakeGateway::default());
    let app = app!(gateway.clone(), false);

    let req = test::TestRequest::post()
        .uri("/pix")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"amount\": \"cinquenta\"")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
    assert_eq!(gateway.call_count(), 0);
}

#[actix_web::test]
async fn gateway_failure_is_a_server_error_without_details() {
    let app = app!(Arc::new(FakeGateway::failing()), false);

    let req = test::TestRequest::post()
        .uri("/checkout")
        .set_json(json!({ "amount": 100 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Falha ao comunicar com o Mercado Pago." }));
}

#[actix_web::test]
async fn pix_returns_qr_code_and_copy_paste() {
    let app = app!(Arc::new(FakeGateway::default()), false);

    let req = test::TestRequest::post()
        .uri("/pix")
        .set_json(json!({ "amount": 50, "description": "Doação" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "qrCodeImage": "data:image/jpeg;base64,QUJD",
            "qrCodeCopyPaste": "00020126pix",
            "paymentId": "987",
        })
    );
}

#[actix_web::test]
async fn pix_failure_is_a_server_error() {
    let app = app!(Arc::new(FakeGateway::failing()), false);

    let req = test::TestRequest::post()
        .uri("/pix")
        .set_json(json!({ "amount": 50 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Falha ao gerar o pagamento PIX." }));
}

#[actix_web::test]
async fn donations_are_empty_when_disabled() {
    let app = app!(Arc::new(FakeGateway::default()), false);

    let req = test::TestRequest::get().uri("/donations").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({}));
}

#[actix_web::test]
async fn donations_report_total_when_enabled() {
    let app = app!(Arc::new(FakeGateway::default()), true);

    let req = test::TestRequest::get().uri("/donations").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "total": 1500.0, "count": 12 }));
}

#[actix_web::test]
async fn donations_lookup_failure_degrades_to_empty() {
    let app = app!(Arc::new(FakeGateway::failing()), true);

    let req = test::TestRequest::get().uri("/donations").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({}));
}

#[actix_web::test]
async fn landing_page_highlights_selected_preset() {
    let html = page_body(Arc::new(FakeGateway::default()), "/?amount=100", false).await;

    assert!(html.contains(r##"<a class="preset selected" href="/?amount=100#doar">R$ 100</a>"##));
    assert_eq!(html.matches("preset selected").count(), 1);
    assert!(html.contains("Doar Agora"));
}

#[actix_web::test]
async fn landing_page_with_zero_custom_amount_disables_checkout() {
    let html = page_body(Arc::new(FakeGateway::default()), "/?custom=0", false).await;

    assert!(html.contains(r#"value="hosted" disabled>"#));
}

#[actix_web::test]
async fn donating_from_the_page_shows_the_payment_link() {
    let gateway = Arc::new(FakeGateway::default());
    let html = donate_body(gateway.clone(), &[("amount", "50"), ("donate", "hosted")]).await;

    assert!(html.contains("Ir para Pagamento Seguro"));
    assert!(html.contains(&format!(r#"href="{}""#, REDIRECT_URL)));
    assert_eq!(gateway.calls.lock().unwrap()[0].0, Decimal::from(50));
}

#[actix_web::test]
async fn donating_with_pix_from_the_page_shows_the_qr_code() {
    let html = donate_body(
        Arc::new(FakeGateway::default()),
        &[("custom", "R$123"), ("donate", "instant")],
    )
    .await;

    assert!(html.contains(r#"src="data:image/jpeg;base64,QUJD""#));
    assert!(html.contains("R$ 123,00"));
}

#[actix_web::test]
async fn donating_nothing_prompts_instead_of_opening() {
    let gateway = Arc::new(FakeGateway::default());
    let html = donate_body(gateway.clone(), &[("custom", "0"), ("donate", "hosted")]).await;

    assert!(html.contains(AMOUNT_PROMPT));
    assert!(!html.contains(r#"class="modal-card""#));
    assert!(!html.contains(r#"role="dialog""#));
    assert_eq!(gateway.call_count(), 0);
}

#[actix_web::test]
async fn loading_the_page_never_creates_a_charge() {
    let gateway = Arc::new(FakeGateway::default());
    let html = page_body(gateway.clone(), "/?amount=50&donate=hosted", false).await;

    assert!(html.contains(r##"<a class="preset selected" href="/?amount=50#doar">R$ 50</a>"##));
    assert!(!html.contains(r#"role="dialog""#));
    assert_eq!(gateway.call_count(), 0);
}

#[actix_web::test]
async fn landing_page_shows_raised_total_when_enabled() {
    let html = page_body(Arc::new(FakeGateway::default()), "/", true).await;

    assert!(html.contains("Arrecadado: R$ 1.500,00"));
}

#[actix_web::test]
async fn landing_page_hides_raised_total_when_disabled_or_unavailable() {
    let disabled = page_body(Arc::new(FakeGateway::default()), "/", false).await;
    let failing = page_body(Arc::new(FakeGateway::failing()), "/", true).await;

    assert!(!disabled.contains("Arrecadado"));
    assert!(!failing.contains("Arrecadado"));
    assert!(failing.contains("Faça parte desta vitória"));
}

#[actix_web::test]
async fn failed_checkout_shows_generic_message() {
    let html = donate_body(
        Arc::new(FakeGateway::failing()),
        &[("amount", "25"), ("donate", "hosted")],
    )
    .await;

    assert!(html.contains(GENERIC_PAYMENT_ERROR));
    assert!(!html.contains("upstream down"));
}

#[actix_web::test]
async fn back_url_pages_render() {
    let app = app!(Arc::new(FakeGateway::default()), false);

    for uri in ["/sucesso", "/falha", "/pendente?payment_id=1&status=pending", "/health"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
    }
}
