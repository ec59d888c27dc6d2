//! Transport seam in front of the monitoring endpoint
//!
//! The endpoint serves a single static JSON document over plain GET, so the
//! seam is exactly one operation: fetch that document. The trait exists so
//! poll-loop and client tests can script endpoint behavior (payloads,
//! statuses, outages) without binding a socket.

use async_trait::async_trait;

/// What the endpoint answered: status code plus the raw document text
#[derive(Debug, Clone)]
pub struct EndpointReply {
    pub status: u16,
    pub body: String,
}

impl EndpointReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches the raw snapshot document
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotTransport: Send + Sync {
    async fn fetch_document(&self, url: &str) -> crate::Result<EndpointReply>;
}

/// reqwest-backed transport used outside of tests
#[derive(Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[async_trait]
impl SnapshotTransport for ReqwestTransport {
    async fn fetch_document(&self, url: &str) -> crate::Result<EndpointReply> {
        let response = self.client.get(url).send().await.map_err(|e| {
            crate::MonitorError::Http(format!("Endpoint unreachable at {}: {}", url, e))
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            crate::MonitorError::Http(format!("Truncated reply from {}: {}", url, e))
        })?;

        tracing::debug!("Polled {} -> {} ({} bytes)", url, status, body.len());
        Ok(EndpointReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_success_covers_the_2xx_range() {
        let reply = |status| EndpointReply {
            status,
            body: String::new(),
        };
        assert!(reply(200).is_success());
        assert!(reply(299).is_success());
        assert!(!reply(304).is_success());
        assert!(!reply(404).is_success());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        // Port 1 is never bound, so the connection is refused outright and
        // no HTTP status ever comes back.
        let transport = ReqwestTransport::default();
        let err = transport
            .fetch_document("http://127.0.0.1:1/api/index.json")
            .await
            .unwrap_err();

        match err {
            crate::MonitorError::Http(msg) => {
                assert!(msg.contains("127.0.0.1:1"), "{msg}");
            }
            other => panic!("expected a transport error, got {other:?}"),
        }
    }
}
