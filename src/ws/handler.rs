//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::{InputFrame, PlayerId, RoomId, RoomMessage};
use crate::rooms::RoomError;
use crate::util::rate_limit::ConnectionRateLimiter;
use crate::ws::protocol::{ClientMsg, ServerMsg};

type WsSink = SplitSink<WebSocket, Message>;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let player_id = Uuid::new_v4();
    info!(player_id = %player_id, "New WebSocket connection");

    let (mut ws_sink, ws_stream) = socket.split();

    if let Err(e) = send_msg(&mut ws_sink, &ServerMsg::Welcome { player_id }).await {
        error!(player_id = %player_id, error = %e, "Failed to send welcome");
        return;
    }

    state.rooms.connect(player_id);

    run_session(player_id, &state, ws_sink, ws_stream).await;

    // Cleanup on disconnect
    state.rooms.disconnect(player_id);
    state.rooms.broadcast_rooms();

    info!(player_id = %player_id, "WebSocket connection closed");
}

/// Per-connection session: inbound frames, lobby pushes and room traffic
async fn run_session(
    player_id: PlayerId,
    state: &AppState,
    mut ws_sink: WsSink,
    mut ws_stream: SplitStream<WebSocket>,
) {
    let rate_limiter = ConnectionRateLimiter::new(state.config.input_rate_limit);
    let mut lobby_rx = state.rooms.subscribe_lobby();
    let mut room_rx: Option<broadcast::Receiver<RoomMessage>> = None;

    loop {
        tokio::select! {
            inbound = ws_stream.next() => {
                let text = match inbound {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) => {
                        info!(player_id = %player_id, "Client initiated close");
                        break;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        warn!(player_id = %player_id, "Received binary message, ignoring");
                        continue;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        error!(player_id = %player_id, error = %e, "WebSocket error");
                        break;
                    }
                    None => break,
                };

                let client_msg = match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!(player_id = %player_id, error = %e, "Failed to parse client message");
                        continue;
                    }
                };

                if !admit(&rate_limiter, &client_msg) {
                    debug!(player_id = %player_id, "Rate limited client message");
                    continue;
                }

                let reply = handle_client_msg(player_id, state, client_msg, &mut room_rx);
                if let Some(reply) = reply {
                    if let Err(e) = send_msg(&mut ws_sink, &reply).await {
                        debug!(player_id = %player_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
            }

            lobby = lobby_rx.recv() => {
                match lobby {
                    Ok(msg) => {
                        if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                            debug!(player_id = %player_id, error = %e, "WebSocket send failed");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(player_id = %player_id, lagged_count = n, "Lobby receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            room = recv_room(&mut room_rx) => {
                match room {
                    Ok(room_msg) => {
                        if !room_msg.is_for(&player_id) {
                            continue;
                        }
                        if let Err(e) = send_msg(&mut ws_sink, &room_msg.msg).await {
                            debug!(player_id = %player_id, error = %e, "WebSocket send failed");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(
                            player_id = %player_id,
                            lagged_count = n,
                            "Client lagged, skipping {} room messages", n
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!(player_id = %player_id, "Room channel closed");
                        room_rx = None;
                    }
                }
            }
        }
    }
}

/// Apply one client message. Returns the direct reply, if any.
fn handle_client_msg(
    player_id: PlayerId,
    state: &AppState,
    msg: ClientMsg,
    room_rx: &mut Option<broadcast::Receiver<RoomMessage>>,
) -> Option<ServerMsg> {
    let rooms = &state.rooms;

    match msg {
        ClientMsg::SetPlayerName { name } => {
            rooms.set_player_name(player_id, &name);
            debug!(player_id = %player_id, name = ?rooms.player_name(&player_id), "Player renamed");
            None
        }
        ClientMsg::CreateRoom { name } => {
            let (room_id, room_name) = rooms.create_room(&name);
            rooms.broadcast_rooms();
            Some(ServerMsg::RoomCreated { room_id, room_name })
        }
        ClientMsg::GetRooms => Some(ServerMsg::RoomsList {
            rooms: rooms.list_rooms(),
        }),
        ClientMsg::JoinRoom { room_id: raw_id } => {
            let joined = parse_room_id(&raw_id)
                .and_then(|room_id| Ok((room_id, rooms.join_room(player_id, room_id)?)));

            match joined {
                Ok((room_id, room)) => {
                    *room_rx = Some(room.subscribe());
                    rooms.broadcast_rooms();
                    Some(ServerMsg::RoomJoined { room_id })
                }
                Err(e) => {
                    debug!(player_id = %player_id, room_id = %raw_id, error = %e, "Join rejected");
                    Some(ServerMsg::Error {
                        message: e.to_string(),
                    })
                }
            }
        }
        ClientMsg::LeaveRoom => {
            rooms.leave_room(player_id);
            *room_rx = None;
            rooms.broadcast_rooms();
            None
        }
        ClientMsg::PlayerInput {
            keys,
            mouse_x,
            mouse_y,
        } => {
            rooms.handle_input(player_id, &InputFrame::from_keys(&keys, mouse_x, mouse_y));
            None
        }
    }
}

/// Per-connection quotas: inputs and room create/join have separate budgets
fn admit(limiter: &ConnectionRateLimiter, msg: &ClientMsg) -> bool {
    match msg {
        ClientMsg::PlayerInput { .. } => limiter.check_input(),
        ClientMsg::CreateRoom { .. } | ClientMsg::JoinRoom { .. } => limiter.check_room_action(),
        _ => true,
    }
}

/// Malformed ids can never name a live room
fn parse_room_id(raw: &str) -> Result<RoomId, RoomError> {
    raw.trim().parse().map_err(|_| RoomError::RoomNotFound)
}

/// Receive from the current room, or wait forever when not in one
async fn recv_room(
    room_rx: &mut Option<broadcast::Receiver<RoomMessage>>,
) -> Result<RoomMessage, broadcast::error::RecvError> {
    match room_rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Send a message over WebSocket
async fn send_msg(sink: &mut WsSink, msg: &ServerMsg) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json)).await.map_err(|e| e.to_string())
}
