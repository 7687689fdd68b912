use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use jobscroll_core::{JobId, JobPosting, Page, PageSize, Predicate};
use jobscroll_infra::{
    CursorPager, InMemoryJobStore, JobStore, JobStoreError, PageError, PostgresJobStore, Settings,
    StoreSettings, seed,
};

/// Store wiring behind the handlers.
///
/// One variant per backend so the pager stays statically dispatched.
#[derive(Clone)]
pub enum AppServices {
    InMemory {
        store: Arc<InMemoryJobStore>,
        pager: CursorPager<Arc<InMemoryJobStore>>,
        default_page_size: PageSize,
    },
    Persistent {
        store: Arc<PostgresJobStore>,
        pager: CursorPager<Arc<PostgresJobStore>>,
        default_page_size: PageSize,
    },
}

pub async fn build_services(settings: &Settings) -> anyhow::Result<AppServices> {
    match &settings.store {
        StoreSettings::InMemory { seed_file } => {
            let store = Arc::new(InMemoryJobStore::new());
            if let Some(path) = seed_file {
                seed::load_seed_file(&store, path)?;
            } else {
                tracing::warn!("no JOBSCROLL_SEED_FILE set; in-memory job store starts empty");
            }
            Ok(AppServices::in_memory(store, settings.default_page_size))
        }
        StoreSettings::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect(database_url)
                .await
                .context("failed to connect to Postgres")?;

            let store = Arc::new(PostgresJobStore::new(pool));
            store.migrate().await.context("failed to migrate job_listings schema")?;
            tracing::info!(max_connections, "using Postgres job store");

            Ok(AppServices::Persistent {
                pager: CursorPager::new(store.clone()),
                store,
                default_page_size: settings.default_page_size,
            })
        }
    }
}

impl AppServices {
    /// In-memory wiring around an existing store (dev/test).
    pub fn in_memory(store: Arc<InMemoryJobStore>, default_page_size: PageSize) -> Self {
        AppServices::InMemory {
            pager: CursorPager::new(store.clone()),
            store,
            default_page_size,
        }
    }

    pub fn default_page_size(&self) -> PageSize {
        match self {
            AppServices::InMemory { default_page_size, .. } => *default_page_size,
            AppServices::Persistent { default_page_size, .. } => *default_page_size,
        }
    }

    pub async fn page(
        &self,
        predicate: &Predicate,
        cursor: Option<JobId>,
        page_size: PageSize,
    ) -> Result<Page<JobPosting>, PageError> {
        match self {
            AppServices::InMemory { pager, .. } => pager.page(predicate, cursor, page_size).await,
            AppServices::Persistent { pager, .. } => pager.page(predicate, cursor, page_size).await,
        }
    }

    pub async fn job(&self, id: JobId) -> Result<Option<JobPosting>, JobStoreError> {
        match self {
            AppServices::InMemory { store, .. } => store.get(id).await,
            AppServices::Persistent { store, .. } => store.get(id).await,
        }
    }

    /// Backend reachability; always fine for the in-memory store.
    pub async fn ping(&self) -> Result<(), JobStoreError> {
        match self {
            AppServices::InMemory { .. } => Ok(()),
            AppServices::Persistent { store, .. } => store.ping().await,
        }
    }
}
