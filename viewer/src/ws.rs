use anyhow::Context;
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;
use viewer_msgs::{viewer_msg::MarkerId, SortField, VehicleId};
use warp::ws::{Message, WebSocket};

use crate::{context::ViewerContextRef, resolution::spawn_resolution_pass, store::VehicleField};

pub async fn frontend_connection_process(ws: WebSocket, context_ref: ViewerContextRef) {
    let (frontend_ws_sender, mut frontend_ws_rcv) = ws.split();
    let (to_frontend_connection_process, frontend_connection_process_rcv) = mpsc::unbounded_channel();

    let frontend_connection_rcv_stream = UnboundedReceiverStream::new(frontend_connection_process_rcv);
    tokio::task::spawn(frontend_connection_rcv_stream.forward(frontend_ws_sender).map(|result| {
        if let Err(e) = result {
            warn!("error sending websocket msg: {e}");
        }
    }));

    let id = Uuid::new_v4().as_simple().to_string();

    {
        let mut context = context_ref.write().await;
        context.to_frontend_senders.insert(id.clone(), to_frontend_connection_process);
        context.view_generation += 1;
    }

    info!("{id} connected");

    while let Some(result) = frontend_ws_rcv.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                warn!("error receiving ws message for id {id}: {e}");
                break;
            }
        };
        if let Err(e) = client_msg(&id, msg, &context_ref).await {
            warn!("error handling message from {id}: {e:#}");
        }
    }

    context_ref.write().await.to_frontend_senders.remove(&id);
    info!("{id} disconnected");
}

/// Intents sent by the page.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ClientMsg {
    Ping,
    Sort (SortField),
    BeginEdit (VehicleId),
    EditField (VehicleField),
    Save (VehicleId),
    Delete (VehicleId),
    MarkerEnter (MarkerId),
    MarkerLeave (MarkerId),
    MarkerClick (MarkerId),
}

#[derive(Debug, PartialEq)]
pub enum ServerResponse {
    Reply (String),
    UpdateClients,
    Nothing,
}

pub async fn process_client_msg(client_msg: ClientMsg, context_ref: &ViewerContextRef) -> anyhow::Result<ServerResponse> {
    use ClientMsg::*;
    use ServerResponse::*;
    let pass = {
        let mut context = context_ref.write().await;
        match client_msg {
            Ping => return Ok(Reply("pong".to_string())),
            Sort(field) => Some(context.sort(field)),
            BeginEdit(id) => {
                if !context.begin_edit(id) {
                    return Ok(Nothing);
                }
                None
            }
            EditField(field) => {
                context.edit_field(field)?;
                None
            }
            Save(id) => match context.save(id) {
                Some(pass) => Some(pass),
                None => return Ok(Nothing),
            },
            Delete(id) => match context.delete(id) {
                Some(pass) => Some(pass),
                None => return Ok(Nothing),
            },
            MarkerEnter(marker) => {
                if !context.map.pointer_enter(marker)? {
                    return Ok(Nothing);
                }
                None
            }
            MarkerLeave(marker) => {
                if !context.map.pointer_leave(marker)? {
                    return Ok(Nothing);
                }
                None
            }
            MarkerClick(marker) => {
                context.map.click(marker)?;
                None
            }
        }
    };

    if let Some(pass) = pass {
        spawn_resolution_pass(pass, context_ref.clone());
    }
    Ok(UpdateClients)
}

async fn client_msg(id: &str, msg: Message, context_ref: &ViewerContextRef) -> anyhow::Result<()> {
    if msg.is_close() || msg.is_ping() || msg.is_pong() {
        return Ok(());
    }
    debug!("received message from {id}: {msg:?}");
    let message = msg.to_str().ok().context("could not get message")?.trim();

    let client_msg = serde_json::from_str::<ClientMsg>(message)?;

    let response = process_client_msg(client_msg, context_ref).await?;

    match response {
        ServerResponse::Reply(reply) => {
            let context = context_ref.read().await;
            let sender = context.to_frontend_senders.get(id).with_context(|| format!("could not find client with id: {id}"))?;
            let _ = sender.send(Ok(Message::text(reply)));
        }
        ServerResponse::UpdateClients => {
            context_ref.write().await.view_generation += 1;
        }
        ServerResponse::Nothing => {}
    }

    Ok(())
}
