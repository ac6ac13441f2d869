use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use donation_page::{
    config::settings::Settings, routes, services::mercado_pago::MercadoPagoGateway,
    state::AppState,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("donation_page=info,actix_web=info")),
        )
        .init();

    let settings = Settings::from_env().context("Failed to load configuration")?;
    info!("Configuration loaded: {:?}", settings);

    let gateway = MercadoPagoGateway::from_settings(&settings)
        .context("Failed to build Mercado Pago client")?;
    let address = settings.bind_address();
    let state = web::Data::new(AppState::new(Arc::new(gateway), settings));

    info!("Starting donation page on {}:{}", address.0, address.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            .configure(routes::api::scoped_config)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
