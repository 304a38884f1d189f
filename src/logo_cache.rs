//! Disk-backed logo retrieval: cached team crests fetched from the remote
//! image host on miss, plus competition art read from a local static
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::competition::Competition;
use crate::error::RetrievalError;

const TEAM_LOGO_URL_BASE: &str = "https://img.uefa.com/imgml/TP/teams/logos/32x32";

/// Canonical remote location of a team crest.
pub fn team_logo_url(team_id: &str) -> String {
    format!("{TEAM_LOGO_URL_BASE}/{team_id}.png")
}

/// Outbound request configuration. The remote host rejects anonymous
/// clients, so a browser-like identity is sent with every fetch.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:143.0) \
                         Gecko/20100101 Firefox/143.0"
                .to_string(),
        }
    }
}

static CLIENT: OnceCell<Client> = OnceCell::new();

fn shared_client() -> Result<&'static Client, RetrievalError> {
    CLIENT.get_or_try_init(|| Client::builder().build().map_err(RetrievalError::Client))
}

/// Byte-level fetch seam so cache behavior is testable without a network.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Vec<u8>, RetrievalError>;
}

pub struct HttpTransport {
    client: &'static Client,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(config: FetchConfig) -> Result<Self, RetrievalError> {
        Ok(Self {
            client: shared_client()?,
            user_agent: config.user_agent,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, RetrievalError> {
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .map_err(|source| RetrievalError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                url: url.to_string(),
                status,
            });
        }
        let bytes = resp.bytes().map_err(|source| RetrievalError::Transport {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

/// Fetch-on-miss, reuse-on-hit logo store. Writes are whole-file replaces;
/// concurrent invocations may race on the same id, last writer wins.
pub struct LogoCache<T> {
    root: PathBuf,
    transport: T,
}

impl LogoCache<HttpTransport> {
    pub fn new(root: impl Into<PathBuf>, config: FetchConfig) -> Result<Self, RetrievalError> {
        Ok(Self::with_transport(root, HttpTransport::new(config)?))
    }
}

impl<T: Transport> LogoCache<T> {
    pub fn with_transport(root: impl Into<PathBuf>, transport: T) -> Self {
        Self {
            root: root.into(),
            transport,
        }
    }

    /// Where a team's crest lives on disk.
    pub fn cache_path(&self, team_id: &str) -> PathBuf {
        self.root.join(format!("{team_id}.png"))
    }

    pub fn resolve(&self, team_id: &str, force_refresh: bool) -> Result<RgbaImage, RetrievalError> {
        let path = self.cache_path(team_id);
        if !force_refresh && path.exists() {
            tracing::debug!(team_id, path = %path.display(), "logo cache hit");
            let img = image::open(&path).map_err(|source| decode_error(team_id, &path, source))?;
            return Ok(img.to_rgba8());
        }

        let url = team_logo_url(team_id);
        tracing::info!(team_id, %url, "fetching logo");
        let bytes = self.transport.get(&url)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| RetrievalError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &bytes).map_err(|source| RetrievalError::Io {
            path: path.clone(),
            source,
        })?;

        let img = image::load_from_memory(&bytes)
            .map_err(|source| decode_error(team_id, &path, source))?;
        Ok(img.to_rgba8())
    }
}

/// Competition art is pre-supplied locally, one file per identity; it is
/// never fetched remotely.
pub fn competition_art(
    art_dir: &Path,
    competition: Competition,
) -> Result<RgbaImage, RetrievalError> {
    let path = art_dir.join(format!("{}.png", competition.code()));
    let img = image::open(&path)
        .map_err(|source| decode_error(competition.code(), &path, source))?;
    Ok(img.to_rgba8())
}

fn decode_error(id: &str, path: &Path, source: image::ImageError) -> RetrievalError {
    match source {
        image::ImageError::IoError(source) => RetrievalError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => RetrievalError::Decode {
            id: id.to_string(),
            source,
        },
    }
}
