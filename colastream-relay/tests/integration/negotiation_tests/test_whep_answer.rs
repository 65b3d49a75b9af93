use std::time::Duration;

use colastream_core::{OutboundMessage, PeerId};

use crate::integration::{create_test_relay, init_tracing, test_ice_servers};
use crate::utils::{FakeMediaServer, FakeReply, data_event, expect_reply_to, negotiation_payload};

#[tokio::test]
async fn test_whep_answer() {
    init_tracing();

    let media = FakeMediaServer::start(|req| {
        FakeReply::answer(&format!("v=0 answer for {}/{}", req.stream_path, req.endpoint))
    })
    .await
    .expect("Failed to start media server");
    let mut relay =
        create_test_relay(&media.base_url, test_ice_servers(), Duration::from_secs(5)).await;

    let peer_id = PeerId::from("viewer-1");
    relay.send(data_event(
        &peer_id,
        negotiation_payload("whep", Some("cam2"), "v=0 offer", "view-7"),
    ));

    let reply = expect_reply_to(&mut relay.sent, &peer_id)
        .await
        .expect("No answer received");

    let OutboundMessage::WhepAnswer {
        request_id,
        sdp,
        ice_servers,
    } = reply
    else {
        panic!("Expected whep-answer, got {:?}", reply);
    };
    assert_eq!(request_id.as_deref(), Some("view-7"));
    assert_eq!(sdp, "v=0 answer for cam2/whep");
    assert_eq!(ice_servers, relay.ice_servers);

    relay.stop().await;
}

#[tokio::test]
async fn test_whep_defaults_to_live_stream() {
    init_tracing();

    let media = FakeMediaServer::answering("v=0")
        .await
        .expect("Failed to start media server");
    let mut relay =
        create_test_relay(&media.base_url, test_ice_servers(), Duration::from_secs(5)).await;

    let peer_id = PeerId::from("viewer-2");
    relay.send(data_event(
        &peer_id,
        negotiation_payload("whep", None, "v=0 offer", "r2"),
    ));

    expect_reply_to(&mut relay.sent, &peer_id)
        .await
        .expect("No answer received");

    let requests = media.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].stream_path, "live");
    assert_eq!(requests[0].endpoint, "whep");

    relay.stop().await;
}
