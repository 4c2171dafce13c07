use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Host name of the production knowledge-base site.
pub const PRODUCTION_HOST: &str = "ntgcentral.nt.gov.au";

const LIVE_RESULTS_URL: &str = "https://ntgcentral.nt.gov.au/services-and-support/ict-services-websites/artificial-intelligence/ai-knowledge-base/configuration/listing/articles/_nocache";
const LIVE_WORK_AREAS_URL: &str = "https://ntgcentral.nt.gov.au/services-and-support/ict-services-websites/artificial-intelligence/ai-knowledge-base/configuration/listing/work-areas/_nocache";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Host name the page is served from; decides live vs local data
    pub host: String,
    /// Host name treated as production
    pub production_host: String,
    /// Live listing of knowledge-base articles
    pub live_results_url: String,
    /// Bundled copy of the article listing
    pub fallback_results_path: PathBuf,
    /// Live listing of work areas
    pub live_work_areas_url: String,
    /// Local copy of the work-area list used outside production
    pub local_work_areas_path: PathBuf,
    /// Results per page
    pub page_size: usize,
    /// Request timeout in seconds for remote sources (capped at 60)
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            host: "localhost".to_string(),
            production_host: PRODUCTION_HOST.to_string(),
            live_results_url: LIVE_RESULTS_URL.to_string(),
            fallback_results_path: PathBuf::from("./dist/search.json"),
            live_work_areas_url: LIVE_WORK_AREAS_URL.to_string(),
            local_work_areas_path: PathBuf::from("./src/data/work-areas.json"),
            page_size: 10,
            fetch_timeout_secs: 15,
        }
    }
}

/// Where the page is running. Only the production host talks to live APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    pub fn detect(host: &str, production_host: &str) -> Self {
        if host.eq_ignore_ascii_case(production_host) {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

/// A JSON source: either a remote endpoint or a file relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum DataSource {
    Remote(String),
    Local(PathBuf),
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Remote(url) => write!(f, "{url}"),
            DataSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The three sources the landing page loads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSources {
    pub environment: Environment,
    pub primary: DataSource,
    /// Only production has a fallback; locally the primary already is the bundled file.
    pub fallback: Option<DataSource>,
    pub work_areas: DataSource,
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("KB_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(host) = std::env::var("KB_SEARCH_HOST") {
            config.host = host;
        }
        if let Ok(host) = std::env::var("KB_SEARCH_PRODUCTION_HOST") {
            config.production_host = host;
        }
        if let Ok(url) = std::env::var("KB_SEARCH_LIVE_URL") {
            config.live_results_url = url;
        }
        if let Ok(path) = std::env::var("KB_SEARCH_FALLBACK_PATH") {
            config.fallback_results_path = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("KB_SEARCH_WORK_AREAS_URL") {
            config.live_work_areas_url = url;
        }
        if let Ok(path) = std::env::var("KB_SEARCH_WORK_AREAS_PATH") {
            config.local_work_areas_path = PathBuf::from(path);
        }
        if let Ok(val) = std::env::var("KB_SEARCH_PAGE_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                if v > 0 {
                    config.page_size = v;
                }
            }
        }
        if let Ok(val) = std::env::var("KB_SEARCH_FETCH_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.fetch_timeout_secs = v.min(60);
            }
        }

        config
    }

    pub fn environment(&self) -> Environment {
        Environment::detect(&self.host, &self.production_host)
    }

    pub fn data_sources(&self) -> DataSources {
        let bundled = DataSource::Local(self.fallback_results_path.clone());
        match self.environment() {
            Environment::Production => DataSources {
                environment: Environment::Production,
                primary: DataSource::Remote(self.live_results_url.clone()),
                fallback: Some(bundled),
                work_areas: DataSource::Remote(self.live_work_areas_url.clone()),
            },
            Environment::Development => DataSources {
                environment: Environment::Development,
                primary: bundled,
                fallback: None,
                work_areas: DataSource::Local(self.local_work_areas_path.clone()),
            },
        }
    }
}
