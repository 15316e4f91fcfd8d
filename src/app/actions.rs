use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tokio::runtime::Handle;

use crate::api::{ApiError, SoundApi};
use crate::catalog::SoundMap;
use crate::mutation::DeleteTicket;

/// Result of a network call, handed back to the event loop.
#[derive(Debug)]
pub enum RemoteEvent {
    CatalogFetched(Result<SoundMap, ApiError>),
    DeleteFinished {
        ticket: DeleteTicket,
        result: Result<(), ApiError>,
    },
}

/// Runs remote calls on the async runtime and posts their results back
/// over a channel, so state is only ever touched from the event loop.
pub struct ActionDispatcher {
    runtime: Handle,
    api: Arc<dyn SoundApi>,
    events: Sender<RemoteEvent>,
}

impl ActionDispatcher {
    pub fn new(runtime: Handle, api: Arc<dyn SoundApi>) -> (Self, Receiver<RemoteEvent>) {
        let (events, receiver) = unbounded();
        (
            Self {
                runtime,
                api,
                events,
            },
            receiver,
        )
    }

    pub fn fetch_catalog(&self) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let result = api.fetch_sounds().await;
            if events.send(RemoteEvent::CatalogFetched(result)).is_err() {
                tracing::debug!("dashboard closed before the catalog fetch finished");
            }
        });
    }

    pub fn delete_sound(&self, ticket: DeleteTicket) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let result = api.delete_sound(ticket.id()).await;
            if events
                .send(RemoteEvent::DeleteFinished { ticket, result })
                .is_err()
            {
                tracing::debug!("dashboard closed before the delete finished");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;
    use crate::api::fake::FakeSoundApi;
    use crate::app::state::AppState;
    use crate::catalog::sample_map;
    use crate::mutation::DeleteOutcome;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("runtime")
    }

    #[test]
    fn results_flow_back_through_the_channel() {
        let runtime = runtime();
        let api = Arc::new(FakeSoundApi::with_catalog(sample_map(&[
            "a", "b", "c", "d", "e", "f",
        ])));
        let (dispatcher, events) = ActionDispatcher::new(runtime.handle().clone(), api.clone());
        let mut state = AppState::new("http://fake.test", Duration::from_secs(3));

        assert!(state.begin_bootstrap());
        dispatcher.fetch_catalog();
        let fetched = events.recv_timeout(Duration::from_secs(5)).expect("fetch event");
        state.apply_remote(fetched);
        assert_eq!(state.catalog.max_page(), 2);

        state.next_page();
        state.open_delete_sound();
        let ticket = state.confirm_delete().expect("accepted");
        dispatcher.delete_sound(ticket);
        assert_eq!(state.catalog.current_page(), 1);

        let finished = events.recv_timeout(Duration::from_secs(5)).expect("delete event");
        let outcome = state.apply_remote(finished);
        assert_matches!(outcome, Some(DeleteOutcome::Deleted { ref id }) if id == "f");
        assert_eq!(api.calls(), vec!["GET /sounds", "DELETE /sound/f"]);
        assert!(!state.deletes.is_deleting());
    }
}
