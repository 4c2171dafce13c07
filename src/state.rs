use std::sync::Arc;

use crate::config::Config;
use crate::fetch::HttpFetcher;
use crate::session::{Session, TracingRenderer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: Arc<Session>,
    pub fetcher: HttpFetcher,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout_secs)?;
        let session = Session::from_config(&config, TracingRenderer);

        Ok(Self {
            config,
            session: Arc::new(session),
            fetcher,
        })
    }

    /// Loads the article listing and the work-area list.
    ///
    /// A failed work-area fetch only leaves the options derived from results;
    /// a failed listing is returned.
    pub async fn load(&self) -> anyhow::Result<()> {
        let (results, _) = tokio::join!(
            self.session.load_results(&self.fetcher),
            self.session.load_work_areas(&self.fetcher),
        );
        results.map(|_| ())
    }
}
