use crate::{ws, Result, context::ViewerContextRef};
use warp::{http::StatusCode, Reply};

const INDEX_HTML: &str = include_str!("../static/index.html");

pub async fn ws_handler(ws: warp::ws::Ws, context_ref: ViewerContextRef) -> Result<impl Reply> {
    Ok(ws.on_upgrade(move |socket| ws::frontend_connection_process(socket, context_ref)))
}

pub async fn health_handler() -> Result<impl Reply> {
    Ok(StatusCode::OK)
}

pub async fn index_handler() -> Result<impl Reply> {
    Ok(warp::reply::html(INDEX_HTML))
}
