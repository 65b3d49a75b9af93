use crate::error::SessionError;
use crate::signaling::{SignalingEvent, SignalingOutput, SignalingTransport};
use async_trait::async_trait;
use bytes::Bytes;
use colastream_core::{OutboundMessage, PeerId, RoomId};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
struct InboundFrame {
    #[serde(rename = "UUID", default)]
    uuid: Option<String>,
    #[serde(default)]
    request: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct DataFrame<'a> {
    #[serde(rename = "UUID")]
    uuid: &'a str,
    data: &'a OutboundMessage,
}

/// Maps one text frame from the signaling server to a relay event.
/// Frames that carry no peer (room listings, acks) map to `None`.
pub fn parse_frame(text: &str) -> Option<SignalingEvent> {
    let frame: InboundFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!("Ignoring non-JSON signaling frame: {}", e);
            return None;
        }
    };

    let Some(uuid) = frame.uuid else {
        debug!("Ignoring server frame (request={:?})", frame.request);
        return None;
    };
    let peer_id = PeerId::from(uuid);

    if let Some(data) = frame.data {
        let payload = match data {
            serde_json::Value::String(s) => Bytes::from(s),
            other => Bytes::from(other.to_string()),
        };
        return Some(SignalingEvent::Data(peer_id, payload));
    }

    match frame.request.as_deref() {
        Some("peerConnected") => Some(SignalingEvent::PeerConnected(peer_id)),
        Some("peerDisconnected") | Some("bye") => Some(SignalingEvent::PeerDisconnected(peer_id)),
        other => {
            debug!("[{}] Ignoring signaling request {:?}", peer_id.short(), other);
            None
        }
    }
}

pub fn data_frame(peer_id: &PeerId, message: &OutboundMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(&DataFrame {
        uuid: peer_id.as_str(),
        data: message,
    })
}

/// `joinroom` followed by `seed`.
pub fn announce_frames(room_id: &RoomId, identity: &str) -> [String; 2] {
    [
        json!({ "request": "joinroom", "roomid": room_id.as_str() }).to_string(),
        json!({ "request": "seed", "streamID": identity }).to_string(),
    ]
}

/// A frame queued for the socket. When `ack` is set the sender task reports
/// the outcome of the write through it.
struct Outgoing {
    message: Message,
    ack: Option<oneshot::Sender<Result<(), WsError>>>,
}

impl Outgoing {
    fn frame(message: Message) -> Self {
        Self { message, ack: None }
    }
}

struct WsSignalingOutput {
    tx: mpsc::UnboundedSender<Outgoing>,
}

#[async_trait]
impl SignalingOutput for WsSignalingOutput {
    async fn send(&self, peer_id: &PeerId, message: OutboundMessage) -> Result<(), SessionError> {
        let json = data_frame(peer_id, &message).map_err(|e| SessionError::Send(e.to_string()))?;
        self.tx
            .send(Outgoing::frame(Message::text(json)))
            .map_err(|_| SessionError::Closed)
    }
}

/// Signaling session over a single WebSocket to the room server.
pub struct WsSignalingTransport {
    url: String,
    outbound: Option<mpsc::UnboundedSender<Outgoing>>,
    events: Option<mpsc::UnboundedReceiver<SignalingEvent>>,
    send_task: Option<JoinHandle<()>>,
    recv_task: Option<JoinHandle<()>>,
}

impl WsSignalingTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            outbound: None,
            events: None,
            send_task: None,
            recv_task: None,
        }
    }

    fn outbound(&self) -> Result<&mpsc::UnboundedSender<Outgoing>, SessionError> {
        self.outbound.as_ref().ok_or(SessionError::NotConnected)
    }

    /// The receiver task drops its event sender once the socket is gone.
    fn is_closed(&self) -> bool {
        self.events.as_ref().is_none_or(|events| events.is_closed())
    }

    /// Writes one frame and waits until the sender task has flushed it.
    async fn send_acked(&mut self, message: Message) -> Result<(), SessionError> {
        let closed = || SessionError::Announce("signaling session closed".to_owned());
        if self.is_closed() {
            return Err(closed());
        }

        let (ack_tx, ack_rx) = oneshot::channel();
        self.outbound()?
            .send(Outgoing {
                message,
                ack: Some(ack_tx),
            })
            .map_err(|_| closed())?;

        match ack_rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(SessionError::Announce(e.to_string())),
            Err(_) => Err(closed()),
        }
    }

    async fn sender_task(
        mut sink: SplitSink<WsStream, Message>,
        mut rx: mpsc::UnboundedReceiver<Outgoing>,
    ) {
        while let Some(Outgoing { message, ack }) = rx.recv().await {
            let closing = matches!(message, Message::Close(_));
            let result = sink.send(message).await;
            let failed = result.is_err();
            if let Err(e) = &result {
                error!("Failed to send signaling frame: {}", e);
            }
            if let Some(ack) = ack {
                let _ = ack.send(result);
            }
            if failed || closing {
                break;
            }
        }
        let _ = sink.close().await;
        debug!("Signaling sender task finished");
    }

    async fn receiver_task(
        mut stream: SplitStream<WsStream>,
        events: mpsc::UnboundedSender<SignalingEvent>,
    ) {
        while let Some(frame) = stream.next().await {
            let text = match frame {
                Ok(Message::Text(text)) => text.as_str().to_owned(),
                Ok(Message::Binary(data)) => match String::from_utf8(data.to_vec()) {
                    Ok(text) => text,
                    Err(_) => {
                        warn!("Dropping non UTF-8 binary signaling frame");
                        continue;
                    }
                },
                Ok(Message::Close(_)) => {
                    info!("Signaling connection closed by server");
                    break;
                }
                Ok(_) => continue,
                Err(e) => {
                    error!("Signaling connection error: {}", e);
                    break;
                }
            };

            if let Some(event) = parse_frame(&text) {
                if events.send(event).is_err() {
                    break;
                }
            }
        }
        debug!("Signaling receiver task finished");
    }
}

#[async_trait]
impl SignalingTransport for WsSignalingTransport {
    async fn connect(&mut self) -> Result<(), SessionError> {
        info!("Connecting to signaling server {}", self.url);

        let (ws, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| SessionError::Connect(e.to_string()))?;
        let (sink, stream) = ws.split();

        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        self.send_task = Some(tokio::spawn(Self::sender_task(sink, out_rx)));
        self.recv_task = Some(tokio::spawn(Self::receiver_task(stream, event_tx)));
        self.outbound = Some(out_tx);
        self.events = Some(event_rx);

        info!("Connected to signaling server");
        Ok(())
    }

    async fn announce(&mut self, room_id: &RoomId, identity: &str) -> Result<(), SessionError> {
        self.outbound()?;
        for frame in announce_frames(room_id, identity) {
            self.send_acked(Message::text(frame)).await?;
        }
        if self.is_closed() {
            return Err(SessionError::Announce(
                "signaling session closed during announce".to_owned(),
            ));
        }
        info!("Joined room {} as {}", room_id, identity);
        Ok(())
    }

    fn output(&self) -> Result<Arc<dyn SignalingOutput>, SessionError> {
        let tx = self.outbound()?.clone();
        Ok(Arc::new(WsSignalingOutput { tx }))
    }

    async fn next_event(&mut self) -> Option<SignalingEvent> {
        self.events.as_mut()?.recv().await
    }

    async fn disconnect(&mut self) -> Result<(), SessionError> {
        let outbound = self.outbound.take().ok_or(SessionError::NotConnected)?;
        let _ = outbound.send(Outgoing::frame(Message::Close(None)));
        drop(outbound);

        if let Some(task) = self.send_task.take() {
            if tokio::time::timeout(CLOSE_TIMEOUT, task).await.is_err() {
                warn!("Signaling socket did not close in time");
            }
        }
        if let Some(task) = self.recv_task.take() {
            task.abort();
        }
        self.events = None;
        Ok(())
    }
}
