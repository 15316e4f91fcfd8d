use crate::api::{ApiError, SoundApi};
use crate::catalog::Catalog;
use crate::notify::Notifier;

pub mod bootstrap;

pub use bootstrap::{BootstrapStatus, FetchBootstrap};

pub const DELETE_FAILED_MESSAGE: &str = "Failed deleting sound. Try refreshing the page.";

pub fn delete_succeeded_message(id: &str) -> String {
    format!("Successfully deleted the sound {id}")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteStatus {
    #[default]
    Idle,
    Deleting {
        id: String,
    },
}

/// Handed out for an accepted delete; must be passed back to
/// [`DeleteCoordinator::complete`] once the remote call resolves.
#[derive(Debug, PartialEq, Eq)]
pub struct DeleteTicket {
    id: String,
}

impl DeleteTicket {
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Another delete was in flight; nothing happened.
    Rejected,
    Deleted { id: String },
    Failed { id: String },
}

/// Optimistic delete with a single global in-flight guard.
///
/// While one delete is outstanding every further request is dropped, even
/// for unrelated ids. Failed remote deletes are not rolled back locally, so
/// the catalog may disagree with the server until the next fetch.
#[derive(Debug, Default)]
pub struct DeleteCoordinator {
    status: DeleteStatus,
}

impl DeleteCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &DeleteStatus {
        &self.status
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self.status, DeleteStatus::Deleting { .. })
    }

    pub fn in_flight(&self) -> Option<&str> {
        match &self.status {
            DeleteStatus::Deleting { id } => Some(id.as_str()),
            DeleteStatus::Idle => None,
        }
    }

    /// Removes `id` locally and enters `Deleting`. Returns `None` without
    /// touching the catalog when a delete is already in flight.
    pub fn begin(&mut self, catalog: &mut Catalog, id: &str) -> Option<DeleteTicket> {
        if let DeleteStatus::Deleting { id: pending } = &self.status {
            tracing::debug!(id, pending = %pending, "delete rejected, another delete is in flight");
            return None;
        }
        self.status = DeleteStatus::Deleting { id: id.to_string() };
        let removed = catalog.remove(id);
        tracing::info!(
            id,
            present = removed.is_some(),
            remaining = catalog.len(),
            page = catalog.current_page(),
            max_page = catalog.max_page(),
            "optimistically removed sound"
        );
        Some(DeleteTicket { id: id.to_string() })
    }

    /// Applies the remote result for `ticket`, notifies, and returns to
    /// `Idle` whatever the outcome.
    pub fn complete<N>(
        &mut self,
        ticket: DeleteTicket,
        result: Result<(), ApiError>,
        notifier: &mut N,
    ) -> DeleteOutcome
    where
        N: Notifier + ?Sized,
    {
        let DeleteTicket { id } = ticket;
        let outcome = match result {
            Ok(()) => {
                tracing::info!(id = %id, "remote delete confirmed");
                notifier.notify_success(&delete_succeeded_message(&id));
                DeleteOutcome::Deleted { id }
            }
            Err(err) => {
                tracing::warn!(?err, id = %id, "remote delete failed, keeping local removal");
                notifier.notify_error(DELETE_FAILED_MESSAGE);
                DeleteOutcome::Failed { id }
            }
        };
        self.status = DeleteStatus::Idle;
        outcome
    }

    /// `begin`, the remote call, then `complete`.
    pub async fn delete<A, N>(
        &mut self,
        catalog: &mut Catalog,
        api: &A,
        notifier: &mut N,
        id: &str,
    ) -> DeleteOutcome
    where
        A: SoundApi + ?Sized,
        N: Notifier + ?Sized,
    {
        let Some(ticket) = self.begin(catalog, id) else {
            return DeleteOutcome::Rejected;
        };
        let result = api.delete_sound(ticket.id()).await;
        self.complete(ticket, result, notifier)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use reqwest::StatusCode;

    use super::*;
    use crate::api::fake::FakeSoundApi;
    use crate::catalog::{sample_map, SoundItem, SoundMap};
    use crate::notify::{Notification, NotificationLevel};

    fn catalog_of(count: usize) -> Catalog {
        let mut catalog = Catalog::new();
        catalog.merge(
            (0..count)
                .map(|idx| (format!("clip-{idx:02}"), SoundItem::new(100, 1_000)))
                .collect::<SoundMap>(),
        );
        catalog
    }

    fn server_error() -> ApiError {
        ApiError::Status {
            url: "http://fake.test/sound/x".into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[test]
    fn begin_removes_locally_before_remote_confirmation() {
        let mut catalog = catalog_of(3);
        let mut coordinator = DeleteCoordinator::new();

        let ticket = coordinator.begin(&mut catalog, "clip-01").expect("accepted");
        assert_eq!(ticket.id(), "clip-01");
        assert!(!catalog.store().contains("clip-01"));
        assert_eq!(coordinator.in_flight(), Some("clip-01"));
    }

    #[test]
    fn second_request_is_rejected_while_deleting() {
        let mut catalog = catalog_of(4);
        let mut coordinator = DeleteCoordinator::new();
        let _ticket = coordinator.begin(&mut catalog, "clip-00").expect("accepted");

        assert!(coordinator.begin(&mut catalog, "clip-02").is_none());
        assert!(catalog.store().contains("clip-02"));
        assert_eq!(
            coordinator.status(),
            &DeleteStatus::Deleting {
                id: "clip-00".into()
            }
        );
    }

    #[test]
    fn failure_keeps_optimistic_removal_and_notifies_error() {
        let mut catalog = catalog_of(2);
        let mut coordinator = DeleteCoordinator::new();
        let mut sink: Vec<Notification> = Vec::new();

        let ticket = coordinator.begin(&mut catalog, "clip-00").expect("accepted");
        let outcome = coordinator.complete(ticket, Err(server_error()), &mut sink);

        assert_matches!(outcome, DeleteOutcome::Failed { ref id } if id == "clip-00");
        assert!(!catalog.store().contains("clip-00"));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].level, NotificationLevel::Error);
        assert_eq!(sink[0].message, DELETE_FAILED_MESSAGE);
        assert_eq!(coordinator.status(), &DeleteStatus::Idle);
    }

    #[test]
    fn deleting_from_last_page_clamps_cursor() {
        let mut catalog = catalog_of(11);
        assert_eq!(catalog.max_page(), 3);
        catalog.change_page(3);
        let mut coordinator = DeleteCoordinator::new();
        let mut sink: Vec<Notification> = Vec::new();

        let ticket = coordinator.begin(&mut catalog, "clip-10").expect("accepted");
        assert_eq!((catalog.current_page(), catalog.max_page()), (2, 2));
        coordinator.complete(ticket, Ok(()), &mut sink);
        assert_eq!((catalog.current_page(), catalog.max_page()), (2, 2));
    }

    #[tokio::test]
    async fn successful_delete_notifies_once_and_returns_to_idle() {
        let api = FakeSoundApi::with_catalog(sample_map(&["airhorn", "bonk"]));
        let mut catalog = Catalog::new();
        catalog.merge(sample_map(&["airhorn", "bonk"]));
        let mut coordinator = DeleteCoordinator::new();
        let mut sink: Vec<Notification> = Vec::new();

        let outcome = coordinator
            .delete(&mut catalog, &api, &mut sink, "airhorn")
            .await;

        assert_eq!(
            outcome,
            DeleteOutcome::Deleted {
                id: "airhorn".into()
            }
        );
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].level, NotificationLevel::Success);
        assert!(sink[0].message.contains("airhorn"));
        assert!(!coordinator.is_deleting());

        let next = coordinator.delete(&mut catalog, &api, &mut sink, "bonk").await;
        assert_matches!(next, DeleteOutcome::Deleted { .. });
        assert_eq!(api.calls(), vec!["DELETE /sound/airhorn", "DELETE /sound/bonk"]);
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn rejected_delete_issues_no_remote_call() {
        let api = FakeSoundApi::with_catalog(SoundMap::new());
        let mut catalog = catalog_of(2);
        let mut coordinator = DeleteCoordinator::new();
        let mut sink: Vec<Notification> = Vec::new();
        let _held = coordinator.begin(&mut catalog, "clip-00").expect("accepted");

        let outcome = coordinator
            .delete(&mut catalog, &api, &mut sink, "clip-01")
            .await;

        assert_eq!(outcome, DeleteOutcome::Rejected);
        assert!(api.calls().is_empty());
        assert!(sink.is_empty());
        assert!(catalog.store().contains("clip-01"));
    }

    #[tokio::test]
    async fn failed_remote_delete_through_api_surfaces_error() {
        let api = FakeSoundApi::with_catalog(SoundMap::new()).failing_deletes();
        let mut catalog = catalog_of(1);
        let mut coordinator = DeleteCoordinator::new();
        let mut sink: Vec<Notification> = Vec::new();

        let outcome = coordinator
            .delete(&mut catalog, &api, &mut sink, "clip-00")
            .await;

        assert_matches!(outcome, DeleteOutcome::Failed { .. });
        assert!(catalog.is_empty());
        assert!(sink[0].is_error());
        assert!(!coordinator.is_deleting());
    }

    #[tokio::test]
    async fn deleting_unknown_id_still_round_trips() {
        let api = FakeSoundApi::with_catalog(SoundMap::new());
        let mut catalog = catalog_of(6);
        catalog.change_page(2);
        let mut coordinator = DeleteCoordinator::new();
        let mut sink: Vec<Notification> = Vec::new();

        let outcome = coordinator
            .delete(&mut catalog, &api, &mut sink, "ghost")
            .await;

        assert_matches!(outcome, DeleteOutcome::Deleted { .. });
        assert_eq!(catalog.len(), 6);
        assert_eq!((catalog.current_page(), catalog.max_page()), (2, 2));
    }
}
