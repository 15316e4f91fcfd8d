use std::time::{Duration, Instant};

use crate::app::actions::RemoteEvent;
use crate::catalog::{Catalog, SoundItem};
use crate::mutation::{
    BootstrapStatus, DeleteCoordinator, DeleteOutcome, DeleteTicket, FetchBootstrap,
};
use crate::notify::ToastQueue;

#[derive(Debug, Clone)]
pub struct DeleteSoundOverlay {
    pub id: String,
    pub item: SoundItem,
}

#[derive(Debug, Clone)]
pub enum OverlayState {
    DeleteSound(DeleteSoundOverlay),
}

/// Everything the dashboard shows, owned by the event loop.
#[derive(Debug)]
pub struct AppState {
    pub catalog: Catalog,
    pub deletes: DeleteCoordinator,
    pub bootstrap: FetchBootstrap,
    /// Row index within the visible page.
    pub selected: usize,
    pub overlay: Option<OverlayState>,
    pub toasts: ToastQueue,
    pub status_message: Option<String>,
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: impl Into<String>, toast_duration: Duration) -> Self {
        Self {
            catalog: Catalog::new(),
            deletes: DeleteCoordinator::new(),
            bootstrap: FetchBootstrap::new(),
            selected: 0,
            overlay: None,
            toasts: ToastQueue::new(toast_duration),
            status_message: None,
            base_url: base_url.into(),
        }
    }

    pub fn visible_rows(&self) -> Vec<(&str, &SoundItem)> {
        self.catalog.visible_rows()
    }

    pub fn selected_row(&self) -> Option<(&str, &SoundItem)> {
        self.visible_rows().get(self.selected).copied()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_row().map(|(id, _)| id)
    }

    pub fn is_loading(&self) -> bool {
        self.bootstrap.is_pending()
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as isize + delta).clamp(0, len as isize - 1);
        self.selected = next as usize;
    }

    pub fn next_page(&mut self) -> bool {
        self.after_page_change(|catalog| catalog.next_page())
    }

    pub fn previous_page(&mut self) -> bool {
        self.after_page_change(|catalog| catalog.previous_page())
    }

    pub fn first_page(&mut self) -> bool {
        self.after_page_change(|catalog| catalog.change_page(1))
    }

    pub fn last_page(&mut self) -> bool {
        let last = self.catalog.max_page() as i64;
        self.after_page_change(|catalog| catalog.change_page(last))
    }

    fn after_page_change<F>(&mut self, change: F) -> bool
    where
        F: FnOnce(&mut Catalog) -> bool,
    {
        let moved = change(&mut self.catalog);
        if moved {
            self.selected = 0;
        }
        moved
    }

    /// Claims the activation fetch; `true` means the caller should issue it.
    pub fn begin_bootstrap(&mut self) -> bool {
        self.bootstrap.start()
    }

    pub fn open_delete_sound(&mut self) -> bool {
        let Some((id, item)) = self.selected_row() else {
            return false;
        };
        let overlay = DeleteSoundOverlay {
            id: id.to_string(),
            item: item.clone(),
        };
        self.overlay = Some(OverlayState::DeleteSound(overlay));
        true
    }

    pub fn overlay(&self) -> Option<&OverlayState> {
        self.overlay.as_ref()
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Closes the confirmation and starts the optimistic delete. `None`
    /// when there was nothing to confirm or a delete is already running.
    pub fn confirm_delete(&mut self) -> Option<DeleteTicket> {
        let Some(OverlayState::DeleteSound(overlay)) = self.overlay.take() else {
            return None;
        };
        let ticket = self.deletes.begin(&mut self.catalog, &overlay.id);
        self.normalize_selection();
        ticket
    }

    /// Applies a finished network call. Returns the delete outcome when the
    /// event was a delete.
    pub fn apply_remote(&mut self, event: RemoteEvent) -> Option<DeleteOutcome> {
        match event {
            RemoteEvent::CatalogFetched(result) => {
                self.bootstrap.apply(&mut self.catalog, result);
                if let BootstrapStatus::Loaded { count } = self.bootstrap.status() {
                    self.set_status_message(Some(format!("Loaded {count} sound(s)")));
                }
                self.normalize_selection();
                None
            }
            RemoteEvent::DeleteFinished { ticket, result } => {
                let outcome = self.deletes.complete(ticket, result, &mut self.toasts);
                self.normalize_selection();
                Some(outcome)
            }
        }
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts.expire(now);
    }

    pub fn set_status_message<S: Into<String>>(&mut self, message: Option<S>) {
        self.status_message = message.map(Into::into);
    }

    fn normalize_selection(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}
