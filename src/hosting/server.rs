use super::*;
use crate::gameroom::*;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;

pub struct Server;

impl Server {
    pub async fn run() -> Result<(), std::io::Error> {
        let state = web::Data::new(Parlor::default());
        log::info!("starting hosting server");
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(state.clone())
                .route("/ws", web::get().to(connect))
                .route("/api/new_game", web::post().to(new_game))
                .route("/api/move", web::post().to(submit))
        })
        .workers(4)
        .bind(std::env::var("BIND_ADDR").unwrap_or_else(|_| String::from("0.0.0.0:5000")))?
        .run()
        .await
    }
}

/// WebSocket endpoint: one connection per participant, frames are JSON
/// events, everything else happens through the Parlor.
async fn connect(
    parlor: web::Data<Parlor>,
    req: HttpRequest,
    body: web::Payload,
) -> impl Responder {
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            bridge(parlor.into_inner(), session, stream).await;
            response
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// Pumps frames between one socket and the gateway until either side
/// hangs up, then detaches the connection so its seat frees up.
async fn bridge(
    parlor: Arc<Parlor>,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    use futures::StreamExt;
    let (conn, mut rx) = parlor.attach().await;
    actix_web::rt::spawn(async move {
        'sesh: loop {
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Some(json) => if session.text(json).await.is_err() { break 'sesh },
                    None => break 'sesh,
                },
                msg = stream.next() => match msg {
                    Some(Ok(actix_ws::Message::Text(text))) => match serde_json::from_str::<Event>(&text) {
                        Ok(event) => parlor.handle(conn, event).await,
                        Err(_) => parlor.reject(conn, "malformed message").await,
                    },
                    Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                    Some(Err(_)) => break 'sesh,
                    None => break 'sesh,
                    _ => continue 'sesh,
                },
            }
        }
        parlor.detach(conn).await;
    });
}

#[derive(serde::Deserialize)]
struct NewGame {
    #[serde(default)]
    mode: Mode,
}

#[derive(serde::Deserialize)]
struct Submit {
    session: u64,
    row: usize,
    col: usize,
}

async fn new_game(parlor: web::Data<Parlor>, body: web::Json<NewGame>) -> impl Responder {
    let (id, mut state) = parlor.new_game(body.mode).await;
    state["session"] = serde_json::json!(id);
    state["mode"] = serde_json::json!(body.mode);
    HttpResponse::Ok().json(state)
}

async fn submit(parlor: web::Data<Parlor>, body: web::Json<Submit>) -> impl Responder {
    match parlor.submit(body.session, body.row, body.col).await {
        Ok(state) => HttpResponse::Ok().json(state),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}
