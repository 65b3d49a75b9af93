use anyhow::Result;
use bytes::Bytes;
use tokio::sync::mpsc;

use colastream_core::{OutboundMessage, PeerId};
use colastream_relay::SignalingEvent;

use super::mock_signaling::SentMessage;

/// Timeout for a reply to arrive (ms).
pub const REPLY_TIMEOUT_MS: u64 = 5000;

/// How long to listen before concluding nothing was sent (ms).
pub const SILENCE_MS: u64 = 300;

/// Build a data event carrying `payload` from `peer_id`.
pub fn data_event(peer_id: &PeerId, payload: impl Into<String>) -> SignalingEvent {
    SignalingEvent::Data(peer_id.clone(), Bytes::from(payload.into()))
}

/// Build a `whip`/`whep` request payload.
pub fn negotiation_payload(
    kind: &str,
    stream_path: Option<&str>,
    sdp: &str,
    request_id: &str,
) -> String {
    let mut msg = serde_json::json!({
        "type": kind,
        "sdp": sdp,
        "requestId": request_id,
    });
    if let Some(path) = stream_path {
        msg["streamPath"] = serde_json::Value::from(path);
    }
    msg.to_string()
}

/// Wait for the next message the relay sends, whoever it is addressed to.
pub async fn next_sent(
    sent_rx: &mut mpsc::UnboundedReceiver<SentMessage>,
    timeout_ms: u64,
) -> Result<SentMessage> {
    match tokio::time::timeout(std::time::Duration::from_millis(timeout_ms), sent_rx.recv()).await
    {
        Ok(Some(sent)) => Ok(sent),
        Ok(None) => anyhow::bail!("Output channel closed"),
        Err(_) => anyhow::bail!("Timeout waiting for relay reply"),
    }
}

/// Wait for the next message addressed to `peer_id`, failing if it goes elsewhere.
pub async fn expect_reply_to(
    sent_rx: &mut mpsc::UnboundedReceiver<SentMessage>,
    peer_id: &PeerId,
) -> Result<OutboundMessage> {
    let sent = next_sent(sent_rx, REPLY_TIMEOUT_MS).await?;
    if &sent.peer_id != peer_id {
        anyhow::bail!(
            "Reply went to {:?} instead of {:?}: {:?}",
            sent.peer_id,
            peer_id,
            sent.message
        );
    }
    Ok(sent.message)
}

/// Assert the relay stays silent for a short while.
pub async fn expect_silence(sent_rx: &mut mpsc::UnboundedReceiver<SentMessage>) -> Result<()> {
    match next_sent(sent_rx, SILENCE_MS).await {
        Ok(sent) => anyhow::bail!("Unexpected message: {:?}", sent),
        Err(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiation_payload_omits_missing_stream_path() {
        let payload = negotiation_payload("whep", None, "v=0", "r1");
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(value["type"], "whep");
        assert_eq!(value["requestId"], "r1");
        assert!(value.get("streamPath").is_none());
    }
}
