//! Application state wiring the store, static pages, and admin list together.
//!
//! AppState holds the concrete instances used by the operator CLI, the
//! console chat, and the REST adapter. The engines are generic over the
//! repository/content/authorizer traits; AppState pins them to the infra
//! implementations. The transport differs per surface, so the dispatcher is
//! built by each surface through [`AppState::dispatcher`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use noticeboard_core::auth::StaticAllowList;
use noticeboard_core::dispatch::{DispatchSettings, Dispatcher};
use noticeboard_core::transport::Transport;
use noticeboard_infra::config::load_board_config;
use noticeboard_infra::filesystem::{FsSectionContent, resolve_data_dir, texts_dir};
use noticeboard_infra::sqlite::pool::{DatabasePool, database_url};
use noticeboard_infra::sqlite::record::SqliteRecordRepository;
use noticeboard_types::config::BoardConfig;

/// Dispatcher pinned to the infra implementations, generic only over the
/// transport.
pub type BoardDispatcher<T> =
    Dispatcher<SqliteRecordRepository, T, FsSectionContent, StaticAllowList>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<SqliteRecordRepository>,
    pub content: Arc<FsSectionContent>,
    pub authorizer: Arc<StaticAllowList>,
    pub config: BoardConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB.
    pub async fn init(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.unwrap_or_else(resolve_data_dir);

        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;

        let config = load_board_config(&data_dir).await;

        let db_pool = DatabasePool::new(&database_url(&data_dir))
            .await
            .context("opening the record database")?;

        let texts = texts_dir(&data_dir, config.texts_dir.as_deref());
        tracing::debug!(data_dir = %data_dir.display(), texts = %texts.display(), "state initialized");

        Ok(Self {
            records: Arc::new(SqliteRecordRepository::new(db_pool.clone())),
            content: Arc::new(FsSectionContent::new(texts)),
            authorizer: Arc::new(StaticAllowList::new(config.admins.iter().copied())),
            config,
            data_dir,
            db_pool,
        })
    }

    /// Build a dispatcher that replies through `transport`.
    pub fn dispatcher<T: Transport>(&self, transport: Arc<T>) -> BoardDispatcher<T> {
        Dispatcher::new(
            self.records.clone(),
            transport,
            self.content.clone(),
            self.authorizer.clone(),
            DispatchSettings::from_config(&self.config),
        )
    }
}
