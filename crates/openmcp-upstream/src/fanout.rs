//! Fan-Out Aggregator
//!
//! Queries equivalent sources concurrently and waits for all of them. The
//! winner is the first successful envelope in the caller's order, never the
//! first to arrive, so the answer does not depend on provider latency.

use futures::future::join_all;
use openmcp_core::{Envelope, FAILURE_CODE};
use std::future::Future;
use tracing::debug;

use crate::gateway::Gateway;

/// Await every future and return the first successful envelope in input order
pub async fn first_success<I, F>(calls: I) -> Option<Envelope>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Envelope>,
{
    let results = join_all(calls).await;
    let total = results.len();

    let winner = results.into_iter().enumerate().find(|(_, e)| e.is_success());
    match winner {
        Some((index, envelope)) => {
            debug!(index, total, "Fan-out resolved");
            Some(envelope)
        }
        None => {
            debug!(total, "Fan-out exhausted");
            None
        }
    }
}

/// Fetch every URL through the gateway and pick the first success, falling
/// back to a failure envelope carrying `exhausted_message`
pub async fn aggregate(gateway: &Gateway, urls: &[String], exhausted_message: &str) -> Envelope {
    first_success(urls.iter().map(|url| gateway.fetch_envelope(url)))
        .await
        .unwrap_or_else(|| Envelope::failure(FAILURE_CODE, exhausted_message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn delayed(envelope: Envelope, millis: u64) -> Envelope {
        tokio::time::sleep(Duration::from_millis(millis)).await;
        envelope
    }

    #[tokio::test]
    async fn test_list_order_beats_arrival_order() {
        let calls = vec![
            delayed(Envelope::failure(500, "down"), 5),
            delayed(Envelope::new(200).with_title("slow"), 40),
            delayed(Envelope::new(200).with_title("fast"), 1),
        ];
        let winner = first_success(calls).await.unwrap();
        assert_eq!(winner.title(), Some("slow"));
    }

    #[tokio::test]
    async fn test_exhausted() {
        let calls = vec![
            delayed(Envelope::failure(FAILURE_CODE, "a"), 1),
            delayed(Envelope::failure(404, "b"), 1),
        ];
        assert!(first_success(calls).await.is_none());

        let none: Vec<std::future::Ready<Envelope>> = Vec::new();
        assert!(first_success(none).await.is_none());
    }
}
