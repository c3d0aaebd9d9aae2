//! Relay from the LLM invoker to the client-facing event stream

use futures::Stream;
use tokio::sync::mpsc;
use tracing::{error, Instrument};

use super::StreamEvent;
use crate::llm::{LlmConfig, LlmInvoker};
use crate::prompt::Message;

/// Fragments buffered between the invoker and the client
const CHANNEL_CAPACITY: usize = 16;

/// Run one generation and expose it as client events.
///
/// Yields one `Content` per fragment in arrival order, then exactly one
/// terminal event: `Done` on success, `Error` on failure. Dropping the
/// returned stream closes the channel, which stops the upstream request.
pub fn relay(
    invoker: LlmInvoker,
    config: LlmConfig,
    messages: Vec<Message>,
) -> impl Stream<Item = StreamEvent> + Send + 'static {
    let (tx, mut rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);

    let generation = tokio::spawn(
        async move { invoker.invoke(&config, &messages, tx).await }.in_current_span(),
    );

    async_stream::stream! {
        while let Some(fragment) = rx.recv().await {
            yield StreamEvent::Content(fragment);
        }

        match generation.await {
            Ok(Ok(_)) => yield StreamEvent::Done,
            Ok(Err(e)) => yield StreamEvent::Error(e.to_string()),
            Err(e) => {
                error!(error = %e, "Generation task panicked");
                yield StreamEvent::Error("Generation failed unexpectedly".to_string());
            }
        }
    }
}
