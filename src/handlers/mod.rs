pub mod dashboard;
pub mod health;
pub mod layout;
pub mod session;
pub mod stock;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(stock::config)
            .configure(dashboard::config)
            .configure(layout::config)
    );
}
