pub mod stock;
pub mod health;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::index));
    cfg.service(
        web::scope("/api")
            .configure(health::config)
            .configure(stock::config)
    );
}
