use crate::event::InputEvent;
use crate::subscription::{Subscription, SubscriptionId};
use crossterm::event::EventStream;
use futures::StreamExt;
use std::sync::{Arc, OnceLock};
use tokio::sync::{broadcast, mpsc};
use tokio::task::AbortHandle;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

const BUS_CAPACITY: usize = 256;

static INPUT_BUS: OnceLock<broadcast::Sender<InputEvent>> = OnceLock::new();

fn bus() -> &'static broadcast::Sender<InputEvent> {
    INPUT_BUS.get_or_init(|| broadcast::channel(BUS_CAPACITY).0)
}

/// Publish an event to every running input subscription.
///
/// The runtime feeds terminal events through here. Hosts with their own
/// input source (touch screens, replay tools) can publish too. Returns the
/// number of subscriptions that received the event.
pub fn publish_input(event: InputEvent) -> usize {
    bus().send(event).unwrap_or(0)
}

/// Marker type for the default input-event subscription id.
pub struct InputEvents;

/// Subscribe to the input bus, mapping each event through `map`.
///
/// Returning `None` from `map` drops the event.
///
/// # Example
///
/// ```rust,ignore
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     vec![input_events(|event| match event {
///         InputEvent::Key(key) => Some(Msg::Key(key)),
///         InputEvent::Pointer(p) => Some(Msg::Pointer(p)),
///         _ => None,
///     })]
/// }
/// ```
pub fn input_events<Msg: Send + 'static>(
    map: impl Fn(InputEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    input_events_keyed(SubscriptionId::of::<InputEvents>(), map)
}

/// Like [`input_events`], under a caller-chosen id.
///
/// Every subscriber sees every event, so a widget can listen
/// document-wide for the duration of a session without stealing events
/// from the application's own input subscription.
pub fn input_events_keyed<Msg: Send + 'static>(
    id: SubscriptionId,
    map: impl Fn(InputEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let map = Arc::new(map);
    Subscription {
        id,
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| -> AbortHandle {
            // Subscribe before spawning so nothing published after
            // reconciliation is missed.
            let rx = bus().subscribe();
            let handle = tokio::spawn(async move {
                let mut stream = BroadcastStream::new(rx);
                while let Some(item) = stream.next().await {
                    let event = match item {
                        Ok(event) => event,
                        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "input subscriber lagged");
                            continue;
                        }
                    };
                    if let Some(msg) = map(event) {
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                }
            });
            handle.abort_handle()
        }),
    }
}

/// Read crossterm events and publish them on the input bus until aborted.
///
/// The `EventStream` is created inside the task; crossterm's global reader
/// must only be polled by one stream.
pub(crate) fn spawn_terminal_pump() -> AbortHandle {
    let handle = tokio::spawn(async move {
        let mut events = EventStream::new();
        while let Some(result) = events.next().await {
            match result {
                Ok(event) => {
                    if let Some(event) = InputEvent::from_crossterm(event) {
                        publish_input(event);
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "terminal event stream failed");
                    break;
                }
            }
        }
    });
    handle.abort_handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PointerEvent;

    #[tokio::test]
    async fn keyed_subscribers_each_see_events() {
        let (tx_a, mut rx_a) = mpsc::unbounded_channel::<String>();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel::<String>();

        let only_paste = |event: InputEvent| match event {
            InputEvent::Paste(s) if s.starts_with("bus-fanout") => Some(s),
            _ => None,
        };
        let a = input_events_keyed(SubscriptionId::new::<InputEvents>(101), only_paste);
        let b = input_events_keyed(SubscriptionId::new::<InputEvents>(102), only_paste);
        let abort_a = (a.spawn)(tx_a);
        let abort_b = (b.spawn)(tx_b);

        publish_input(InputEvent::Paste("bus-fanout-1".into()));

        assert_eq!(rx_a.recv().await.as_deref(), Some("bus-fanout-1"));
        assert_eq!(rx_b.recv().await.as_deref(), Some("bus-fanout-1"));
        abort_a.abort();
        abort_b.abort();
    }

    #[tokio::test]
    async fn map_filters_events() {
        let (tx, mut rx) = mpsc::unbounded_channel::<f32>();
        let sub = input_events_keyed(SubscriptionId::new::<InputEvents>(103), |event| {
            match event {
                InputEvent::Pointer(p) if p.x == 903.0 => Some(p.y),
                _ => None,
            }
        });
        let abort = (sub.spawn)(tx);

        publish_input(InputEvent::Paste("ignored".into()));
        publish_input(InputEvent::Pointer(PointerEvent::moved(903.0, 12.0)));

        assert_eq!(rx.recv().await, Some(12.0));
        abort.abort();
    }

    #[test]
    fn default_id_is_singleton() {
        let a = input_events(|_| Some(()));
        let b = input_events(|_| Some(()));
        assert_eq!(a.id(), b.id());
    }
}
