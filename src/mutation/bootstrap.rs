use crate::api::{ApiError, SoundApi};
use crate::catalog::{Catalog, SoundMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BootstrapStatus {
    #[default]
    NotStarted,
    Pending,
    Loaded {
        count: usize,
    },
    Failed,
}

/// One-shot catalog fetch for an activation of the dashboard.
#[derive(Debug, Default)]
pub struct FetchBootstrap {
    status: BootstrapStatus,
}

impl FetchBootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> BootstrapStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == BootstrapStatus::Pending
    }

    /// Claims the single fetch for this activation. Only the first call
    /// returns `true`.
    pub fn start(&mut self) -> bool {
        if self.status != BootstrapStatus::NotStarted {
            return false;
        }
        self.status = BootstrapStatus::Pending;
        true
    }

    /// Merges a successful response into the catalog. A failure is logged
    /// and otherwise ignored: no retry, nothing shown to the user.
    pub fn apply(&mut self, catalog: &mut Catalog, result: Result<SoundMap, ApiError>) {
        match result {
            Ok(sounds) => {
                let count = sounds.len();
                catalog.merge(sounds);
                tracing::info!(
                    count,
                    total = catalog.len(),
                    max_page = catalog.max_page(),
                    "loaded sound catalog"
                );
                self.status = BootstrapStatus::Loaded { count };
            }
            Err(err) => {
                tracing::warn!(?err, "failed to fetch sound catalog");
                self.status = BootstrapStatus::Failed;
            }
        }
    }

    pub async fn run<A>(&mut self, api: &A, catalog: &mut Catalog) -> BootstrapStatus
    where
        A: SoundApi + ?Sized,
    {
        if !self.start() {
            return self.status;
        }
        let result = api.fetch_sounds().await;
        self.apply(catalog, result);
        self.status
    }
}
