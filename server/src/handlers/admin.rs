use actix_web::error;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::Result;
use askama_actix::Template;

use crate::admin::{AdminCommand, ServerDescription};
use crate::server::{ServerCommand, ServerTx};

#[derive(Template)]
#[template(path = "admin-index.html")]
pub struct AdminIndexTemplate {
    waiting: String,
    rooms: Vec<RoomListItem>,
}

pub struct RoomListItem {
    room_id: String,
    players: String,
    phase: String,
}

pub fn configure_admin_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(web::resource("/").route(web::get().to(admin_index)))
            .service(web::resource("/rooms").route(web::get().to(list_rooms))),
    );
}

async fn describe_server(srv_tx: &ServerTx) -> Result<ServerDescription> {
    let (tx, rx) = tokio::sync::oneshot::channel::<ServerDescription>();

    srv_tx
        .clone()
        .send(ServerCommand::Admin(AdminCommand::ListRooms { tx }))
        .await
        .map_err(|_| error::ErrorInternalServerError("Internal Server Error"))?;

    rx.await
        .map_err(|_| error::ErrorInternalServerError("Receiver await error"))
}

pub async fn list_rooms(srv_tx: web::Data<ServerTx>) -> Result<impl Responder> {
    let description = describe_server(srv_tx.get_ref()).await?;
    Ok(HttpResponse::Ok().json(description))
}

pub async fn admin_index(srv_tx: web::Data<ServerTx>) -> Result<impl Responder> {
    let description = describe_server(srv_tx.get_ref()).await?;

    let waiting = match description.waiting {
        Some(connection_id) => format!("connection {}", connection_id),
        None => "empty".to_string(),
    };
    let rooms = description
        .rooms
        .iter()
        .map(|room| RoomListItem {
            room_id: room.room_id.to_string(),
            players: format!("{} vs {}", room.players.one, room.players.two),
            phase: room.phase.clone(),
        })
        .collect();

    Ok(AdminIndexTemplate { waiting, rooms })
}
