use actix_web::{HttpResponse, error::InternalError, web};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

pub const INVALID_AMOUNT_MESSAGE: &str = "O valor da doação é inválido.";

#[derive(Serialize, Debug)]
pub struct ApiError {
    error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Malformed JSON bodies get the same `{error}` shape as validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(4096)
        .error_handler(|err, _req| {
            warn!("Rejected donation body: {}", err);
            let response = HttpResponse::BadRequest().json(ApiError::new(INVALID_AMOUNT_MESSAGE));
            InternalError::from_response(err, response).into()
        })
}

/// `1500.5` -> `R$ 1.500,50`
pub fn format_brl(amount: Decimal) -> String {
    let rendered = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{}R$ {},{}", sign, grouped, fraction)
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
