//! Loader configuration
//!
//! 原生库的位置可以来自三个地方：显式路径、打包目录、系统默认搜索路径。

use super::error::Result;
use super::platform::Platform;
use super::simd::SimdLevel;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_LIB_PATH: &str = "FASTNOISE_LIB_PATH";
pub const ENV_LIB_DIR: &str = "FASTNOISE_LIB_DIR";
pub const ENV_SIMD_LEVEL: &str = "FASTNOISE_SIMD_LEVEL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// 原生库文件的完整路径，设置后其它候选路径都不再尝试
    pub library_path: Option<PathBuf>,
    /// 打包目录，按 `<arch>/FastNoise.<ext>` 或 `<os>/<arch>/FastNoise.<ext>` 查找
    pub library_dir: Option<PathBuf>,
    /// 创建节点时请求的 SIMD 级别
    pub simd_level: SimdLevel,
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    pub fn with_library_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.library_dir = Some(dir.into());
        self
    }

    pub fn with_simd_level(mut self, level: SimdLevel) -> Self {
        self.simd_level = level;
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置，空字符串视为未设置
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let simd_level = match get(ENV_SIMD_LEVEL) {
            Some(name) => name.parse()?,
            None => SimdLevel::Auto,
        };

        Ok(Self {
            library_path: get(ENV_LIB_PATH).map(PathBuf::from),
            library_dir: get(ENV_LIB_DIR).map(PathBuf::from),
            simd_level,
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 按优先级列出需要尝试加载的路径
    pub fn candidates(&self, platform: &Platform) -> Vec<PathBuf> {
        if let Some(ref path) = self.library_path {
            return vec![path.clone()];
        }

        let mut candidates = Vec::with_capacity(3);
        if let Some(ref dir) = self.library_dir {
            candidates.push(platform.bundled_path(dir));
            candidates.push(platform.nested_bundled_path(dir));
        }
        candidates.push(PathBuf::from(platform.system_library_name()));
        candidates
    }
}
