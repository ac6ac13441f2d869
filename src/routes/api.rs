use actix_web::web;

use crate::handlers;
use crate::utils::helpers::json_config;

pub fn scoped_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::resource("/")
                .route(web::get().to(handlers::page::index))
                .route(web::post().to(handlers::page::donate)),
        )
        .service(web::resource("/sucesso").route(web::get().to(handlers::page::success)))
        .service(web::resource("/falha").route(web::get().to(handlers::page::failure)))
        .service(web::resource("/pendente").route(web::get().to(handlers::page::pending)))
        .service(web::resource("/health").route(web::get().to(handlers::page::health)))
        .service(
            web::resource("/checkout").route(web::post().to(handlers::checkout::create_checkout)),
        )
        .service(web::resource("/pix").route(web::post().to(handlers::checkout::create_pix)))
        .service(web::resource("/donations").route(web::get().to(handlers::donations::total)));
}
