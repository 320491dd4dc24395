use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::select;
use tokio::sync::mpsc;
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

use crate::core::convai::{ConvaiEvent, ConvaiSession};
use crate::core::relay::{AiAction, CallSession, CarrierAction};
use crate::core::telephony::{CarrierCommand, CarrierEvent};
use crate::state::AppState;

/// Maximum WebSocket frame size (1 MB)
const MAX_WS_FRAME_SIZE: usize = 1024 * 1024;

/// Maximum WebSocket message size (1 MB)
const MAX_WS_MESSAGE_SIZE: usize = 1024 * 1024;

pub async fn media_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    debug!("Media stream WebSocket upgrade requested");

    ws.max_frame_size(MAX_WS_FRAME_SIZE)
        .max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| {
            let session = CallSession::new();
            let span = info_span!(
                "call_session",
                session_id = %session.id(),
                stream_sid = tracing::field::Empty
            );
            handle_media_socket(socket, state, session).instrument(span)
        })
}

async fn handle_media_socket(socket: WebSocket, app_state: Arc<AppState>, mut session: CallSession) {
    info!("Twilio media stream connected");

    let (mut sender, mut receiver) = socket.split();
    let (carrier_tx, mut carrier_rx) = mpsc::unbounded_channel::<CarrierCommand>();

    // Writer for frames bound to Twilio
    let sender_task = tokio::spawn(
        async move {
            while let Some(command) = carrier_rx.recv().await {
                let json_str = match serde_json::to_string(&command) {
                    Ok(json_str) => json_str,
                    Err(e) => {
                        error!("Failed to serialize carrier frame: {}", e);
                        continue;
                    }
                };

                if let Err(e) = sender.send(Message::Text(json_str.into())).await {
                    warn!("Failed to send frame to Twilio: {}", e);
                    break;
                }
            }
        }
        .in_current_span(),
    );

    let mut ai = app_state.convai.open();
    let mut ai_done = false;

    loop {
        select! {
            msg_result = receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        handle_carrier_text(text.as_str(), &mut session, &ai);
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Twilio media stream closed");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Twilio media stream error: {}", e);
                        break;
                    }
                }
            }
            event = ai.recv(), if !ai_done => {
                match event {
                    Some(ConvaiEvent::Opened) => {
                        debug!("AI socket open, relaying caller audio");
                    }
                    Some(ConvaiEvent::Message(event)) => {
                        match session.on_ai_event(event) {
                            AiAction::ToCarrier(command) => {
                                let _ = carrier_tx.send(command);
                            }
                            AiAction::ReplyToAi(reply) => {
                                if let Err(e) = ai.send(reply) {
                                    debug!("Could not reply to AI socket: {}", e);
                                }
                            }
                            AiAction::Ignore => {}
                        }
                    }
                    Some(ConvaiEvent::Closed) | None => {
                        info!("AI socket closed");
                        ai_done = true;
                    }
                }
            }
        }
    }

    // Cleanup
    ai.close();
    sender_task.abort();

    info!("Call session terminated");
}

/// Apply one text frame from Twilio.
fn handle_carrier_text(text: &str, session: &mut CallSession, ai: &ConvaiSession) {
    let event: CarrierEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            warn!("Discarding malformed Twilio frame: {}", e);
            return;
        }
    };

    match session.on_carrier_event(event) {
        CarrierAction::StreamStarted(stream_sid) => {
            Span::current().record("stream_sid", stream_sid.as_str());
            info!(%stream_sid, "Media stream started");
        }
        CarrierAction::ForwardToAi(event) => {
            if ai.is_open() {
                let _ = ai.send(event);
            }
        }
        CarrierAction::CloseAi => {
            if ai.close() {
                info!("Media stream stopped, closing AI socket");
            }
        }
        CarrierAction::Ignore => {}
    }
}
