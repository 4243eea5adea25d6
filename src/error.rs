use std::path::PathBuf;

/// 归档层错误：打开归档 / 读取条目
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("unable to open archive {path:?}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("unable to read archive entry {entry}: {message}")]
    Read { entry: String, message: String },
}

impl ArchiveError {
    pub fn read(entry: impl Into<String>, message: impl ToString) -> Self {
        Self::Read {
            entry: entry.into(),
            message: message.to_string(),
        }
    }
}

/// 建索引阶段的致命错误（启动期）
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("no comic strips were found in archive")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
