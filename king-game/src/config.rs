//! 对局配置
//!
//! JSON 格式，保存在系统配置目录下的 `mad-king/config.json`

use std::fs;
use std::path::{Path, PathBuf};

use king_ai::SearchConfig;
use king_core::{DEFAULT_AI_PAUSE_MS, DEFAULT_STATE_LIMIT, DEFAULT_TURN_LIMIT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine the user config directory")]
    NoConfigDir,

    #[error("Failed to access config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 对局配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 回合上限，超过判和
    pub turn_limit: u32,
    /// 同一局面重复次数上限，达到判和
    pub state_limit: u32,
    /// 双 AI 对战时每步之间的停顿（毫秒）
    pub ai_pause_ms: u64,
    /// AI 搜索配置
    pub search: SearchConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_limit: DEFAULT_TURN_LIMIT,
            state_limit: DEFAULT_STATE_LIMIT,
            ai_pause_ms: DEFAULT_AI_PAUSE_MS,
            search: SearchConfig::default(),
        }
    }
}

impl GameConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("mad-king");
            path.push("config.json");
            path
        })
    }

    /// 从指定文件读取配置
    ///
    /// `max_depth` 为 null 时改用默认深度：无上限搜索在开局附近无法完成
    pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.search.max_depth.is_none() {
            let depth = SearchConfig::default().max_depth;
            warn!("配置 {:?} 未限制搜索深度，改用默认深度 {:?}", path, depth);
            config.search.max_depth = depth;
        }
        Ok(config)
    }

    /// 加载配置，未指定路径时使用默认路径；文件缺失或无效时回退到默认配置
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => {
                warn!("无法获取配置目录，使用默认配置");
                return Self::default();
            }
        };

        if !path.exists() {
            warn!("配置文件不存在: {:?}，使用默认配置", path);
            return Self::default();
        }

        match Self::read_from(&path) {
            Ok(config) => {
                info!("已加载配置: {:?}", path);
                config
            }
            Err(e) => {
                warn!("{}，使用默认配置", e);
                Self::default()
            }
        }
    }

    /// 保存到指定文件（格式化 JSON），必要时创建目录
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("配置已保存: {:?}", path);
        Ok(())
    }

    /// 保存到默认路径
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use king_ai::Algorithm;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.turn_limit, 25);
        assert_eq!(config.state_limit, 5);
        assert_eq!(config.ai_pause_ms, 1500);
        assert_eq!(config.search.algorithm, Algorithm::AlphaBeta);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = GameConfig {
            turn_limit: 10,
            state_limit: 3,
            ai_pause_ms: 0,
            search: SearchConfig {
                algorithm: Algorithm::Minimax,
                max_depth: Some(3),
            },
        };
        config.save_to(&path).unwrap();

        assert_eq!(GameConfig::read_from(&path).unwrap(), config);
        assert_eq!(GameConfig::load(Some(&path)), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "turn_limit": 40, "search": { "algorithm": "minimax" } }"#).unwrap();

        let config = GameConfig::read_from(&path).unwrap();
        assert_eq!(config.turn_limit, 40);
        assert_eq!(config.state_limit, DEFAULT_STATE_LIMIT);
        assert_eq!(config.search.algorithm, Algorithm::Minimax);
        assert_eq!(config.search.max_depth, SearchConfig::default().max_depth);
    }

    #[test]
    fn test_null_depth_clamped_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "search": { "algorithm": "minimax", "max_depth": null } }"#).unwrap();

        let config = GameConfig::read_from(&path).unwrap();
        assert_eq!(config.search.algorithm, Algorithm::Minimax);
        assert_eq!(config.search.max_depth, Some(6));
        assert_eq!(GameConfig::load(Some(&path)).search.max_depth, Some(6));
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            GameConfig::read_from(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(GameConfig::load(Some(&path)), GameConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");

        assert!(matches!(GameConfig::read_from(&path), Err(ConfigError::Io { .. })));
        assert_eq!(GameConfig::load(Some(&path)), GameConfig::default());
    }
}
