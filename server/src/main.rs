use actix_cors::Cors;
use actix_web::{App, HttpServer};

use server::config::ServerConfig;
use server::handlers;
use server::server::spawn_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = ServerConfig::from_env();
    log::info!("Starting on {}", config.bind_addr());

    let srv_tx = spawn_server(&config);
    let bind_addr = config.bind_addr();

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .data(srv_tx.clone())
            .configure(handlers::root)
    })
    .bind(bind_addr)?
    .run()
    .await
}
