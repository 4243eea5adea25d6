use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_ARCHIVE: &str = "Dilbert_1989-2023_complete.7z";
pub const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR_NAME: &str = "stripd";
const CONFIG_FILE_NAME: &str = "config.toml";

/// 命令行参数；未给出的项回落到配置文件，再回落到内置默认值
#[derive(Parser, Debug, Default)]
#[command(name = "stripd", version, about = "Serve dated comic strips from a 7z archive")]
pub struct Cli {
    /// Path to the strip archive
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Config file (defaults to <config dir>/stripd/config.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// 配置文件内容（所有字段可选）
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub archive: Option<PathBuf>,
    pub port: Option<u16>,
    pub bind: Option<IpAddr>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// 合并后的最终配置
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub archive: PathBuf,
    pub port: u16,
    pub bind: IpAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive: PathBuf::from(DEFAULT_ARCHIVE),
            port: DEFAULT_PORT,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        }
    }
}

impl Config {
    /// 读取配置文件（如有）并与命令行合并
    pub fn resolve(cli: Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => {
                    tracing::debug!("Loading config from {:?}", path);
                    FileConfig::load(&path)?
                }
                _ => FileConfig::default(),
            },
        };
        Ok(Self::merge(cli, file))
    }

    pub fn merge(cli: Cli, file: FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            archive: cli.archive.or(file.archive).unwrap_or(defaults.archive),
            port: cli.port.or(file.port).unwrap_or(defaults.port),
            bind: cli.bind.or(file.bind).unwrap_or(defaults.bind),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
