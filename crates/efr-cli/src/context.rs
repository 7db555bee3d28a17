//! Per-invocation session shared by every command handler

use std::path::{Path, PathBuf};

use efr_boards::{BoardSource, PlatformIoLayout};
use efr_github::{OrgClient, Resources};
use efr_http::HttpClient;
use efr_plugin::CompositionReport;

use crate::config::Config;
use crate::error::{CliError, Result};

/// Plugins of this process, as composed at startup.
#[derive(Debug, Clone, Default)]
pub struct PluginState {
    pub report: CompositionReport,
    /// Package names of every discovered entry, loaded or not
    pub packages: Vec<String>,
}

/// Configuration and clients for one `efr` run.
///
/// Clients are created on first use and live until the process exits, so
/// the GitHub repository list is fetched at most once per invocation.
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub config_path: PathBuf,
    pub plugins: PluginState,
    http: HttpClient,
    github: Option<OrgClient>,
}

impl Session {
    pub fn new(config: Config, config_path: PathBuf) -> Result<Self> {
        let http = HttpClient::new(env!("CARGO_PKG_VERSION"))?;
        Ok(Self {
            config,
            config_path,
            plugins: PluginState::default(),
            http,
            github: None,
        })
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn github(&mut self) -> &OrgClient {
        let (http, config) = (&self.http, &self.config.github);
        self.github.get_or_insert_with(|| {
            OrgClient::new(http.clone().with_token(config.token.clone()), &config.org)
                .with_api_url(&config.api_url)
        })
    }

    pub fn resources(&self) -> Resources {
        Resources {
            license_base: self.config.github.license_url.clone(),
            gitignore_base: self.config.github.gitignore_url.clone(),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.config.manifest_path(&self.config_path)
    }

    /// PlatformIO layout from config, `PLATFORMIO_CORE_DIR`, or `~/.platformio`.
    pub fn platformio_layout(&self) -> Result<PlatformIoLayout> {
        let pio = &self.config.platformio;
        let core_dir = std::env::var_os("PLATFORMIO_CORE_DIR").map(PathBuf::from);
        let user_home = dirs::home_dir();
        let home = PlatformIoLayout::resolve_home(
            pio.home.as_deref(),
            core_dir.as_deref(),
            user_home.as_deref(),
        )
        .ok_or_else(|| {
            CliError::user("Cannot locate PlatformIO: set platformio.home in the config file")
        })?;

        Ok(PlatformIoLayout::new(home)
            .with_packages(&pio.framework_package, &pio.platform_package))
    }

    pub fn board_source(&self, root: &Path) -> BoardSource {
        BoardSource::new(root).with_paths(
            &self.config.motorgo.variants_path,
            &self.config.motorgo.board_json_path,
        )
    }
}
