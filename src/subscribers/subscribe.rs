use async_trait::async_trait;

use super::EventFilter;
use crate::events::Event;

/// Observer of registry events, installed with
/// [`MoviperBuilder::with_subscribers`](crate::MoviperBuilder::with_subscribers).
///
/// Each subscriber gets its own bounded queue and worker task, so a slow
/// subscriber delays neither the router nor its peers. When the queue is full
/// the event is dropped for this subscriber alone and `SubscriberOverflow`
/// is published; a panic in [`on_event`](Subscribe::on_event) is caught and
/// published as `SubscriberPanicked`.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    async fn on_event(&self, event: &Event);

    /// Name used in logs and in delivery-problem events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Kinds delivered to [`on_event`](Subscribe::on_event).
    fn filter(&self) -> EventFilter {
        EventFilter::All
    }

    /// Queue capacity (min 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
