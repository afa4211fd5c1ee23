use crate::{
    api::{attendance, employee, location},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let clock_limiter = Arc::new(build_limiter(config.rate_clock_per_min));
    let read_limiter = Arc::new(build_limiter(config.rate_read_per_min));
    let admin_limiter = Arc::new(build_limiter(config.rate_admin_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .wrap(admin_limiter.clone())
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{employee_id}
                    .service(
                        web::resource("/{employee_id}")
                            .wrap(read_limiter.clone())
                            .route(web::get().to(employee::get_employee)),
                    ),
            )
            .service(
                web::scope("/locations")
                    // /locations
                    .service(
                        web::resource("")
                            .wrap(admin_limiter.clone())
                            .route(web::post().to(location::create_location))
                            .route(web::get().to(location::list_locations)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/clock-in")
                            .wrap(clock_limiter.clone())
                            .route(web::post().to(attendance::clock_in)),
                    )
                    .service(
                        web::resource("/clock-out")
                            .wrap(clock_limiter.clone())
                            .route(web::post().to(attendance::clock_out)),
                    )
                    .service(
                        web::resource("/status/{employee_id}")
                            .wrap(read_limiter.clone())
                            .route(web::get().to(attendance::status)),
                    )
                    .service(
                        web::resource("/history/{employee_id}")
                            .wrap(read_limiter.clone())
                            .route(web::get().to(attendance::history)),
                    )
                    .service(
                        web::resource("/all")
                            .wrap(read_limiter.clone())
                            .route(web::get().to(attendance::all_records)),
                    ),
            ),
    );
}
