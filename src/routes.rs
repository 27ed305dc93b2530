use crate::{
    api::{attendance, employee, health, stats},
    error::{json_error_handler, path_error_handler, query_error_handler},
};
use actix_cors::Cors;
use actix_web::web;

/// The browser front end is served from another origin, so any origin may call the API.
pub fn cors() -> Cors {
    Cors::permissive()
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    // Extractor failures answer with the same `{ "error": ... }` body as the handlers.
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));

    cfg.service(health::health);

    cfg.service(
        web::scope(api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}").route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::post().to(attendance::mark_attendance)))
                    // /attendance/{employee_id}
                    .service(
                        web::resource("/{employee_id}")
                            .route(web::get().to(attendance::employee_attendance)),
                    ),
            )
            .service(
                web::scope("/stats")
                    // /stats/dashboard
                    .service(web::resource("/dashboard").route(web::get().to(stats::dashboard))),
            ),
    );
}
