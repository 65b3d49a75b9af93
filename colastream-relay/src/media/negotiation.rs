use crate::error::UpstreamError;
use crate::media::http_client::{HttpClient, SDP_CONTENT_TYPE};
use colastream_core::{NegotiationKind, NegotiationRequest};
use tracing::debug;

/// `<base>/<stream_path>/<whip|whep>`
pub fn endpoint_url(base_url: &str, stream_path: &str, kind: NegotiationKind) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        stream_path.trim_matches('/'),
        kind.endpoint()
    )
}

/// POSTs the peer's SDP offer to the media server and returns the SDP answer.
pub async fn negotiate(
    http: &dyn HttpClient,
    base_url: &str,
    kind: NegotiationKind,
    request: &NegotiationRequest,
) -> Result<String, UpstreamError> {
    let url = endpoint_url(base_url, request.stream_path(), kind);
    debug!("POST {} ({} bytes of SDP)", url, request.sdp().len());

    let reply = http
        .post(&url, request.sdp().to_owned(), SDP_CONTENT_TYPE)
        .await?;

    if !reply.is_success() {
        return Err(UpstreamError::status(reply.status, &reply.body));
    }

    Ok(reply.body)
}
