//! A loaded FastNoise2 library together with its node metadata

use super::api::FastNoiseApi;
use crate::core::config::LoaderConfig;
use crate::core::error::{FastNoiseError, Result};
use crate::core::platform::Platform;
use crate::core::simd::SimdLevel;
use crate::noise::metadata::{Metadata, MetadataRegistry};
use crate::noise::node::FastNoise;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct FastNoiseLibrary {
    api: FastNoiseApi,
    registry: MetadataRegistry,
    simd_level: SimdLevel,
    path: Option<PathBuf>,
}

impl FastNoiseLibrary {
    /// 按配置里的候选路径依次尝试，全部失败时把尝试过的路径都带到错误里
    pub fn load(config: &LoaderConfig) -> Result<Arc<Self>> {
        // 显式指定的路径不做搜索，加载错误原样返回
        if let Some(path) = &config.library_path {
            let api = FastNoiseApi::load(path)?;
            let library = Self::build(api, config.simd_level, Some(path.clone()))?;
            library.log_loaded();
            return Ok(Arc::new(library));
        }

        let candidates = config.candidates(&Platform::detect()?);
        let mut failures = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match FastNoiseApi::load(&candidate) {
                Ok(api) => {
                    let library = Self::build(api, config.simd_level, Some(candidate))?;
                    library.log_loaded();
                    return Ok(Arc::new(library));
                },
                // 符号缺失说明文件找到了但版本不对，不再继续尝试
                Err(e @ FastNoiseError::MissingSymbol { .. }) => return Err(e),
                Err(e) => {
                    debug!("FastNoise2 candidate {} rejected: {}", candidate.display(), e);
                    let reason = match &e {
                        FastNoiseError::LibraryLoad { source, .. } => source.to_string(),
                        other => other.to_string(),
                    };
                    failures.push(format!("{} ({})", candidate.display(), reason));
                },
            }
        }

        Err(FastNoiseError::LibraryNotFound {
            tried: failures.join(", "),
        })
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Arc<Self>> {
        let api = FastNoiseApi::load(path.as_ref())?;
        Ok(Arc::new(Self::build(api, SimdLevel::Auto, Some(path.as_ref().to_path_buf()))?))
    }

    /// 使用已经准备好的函数表（静态链接或者进程内实现）
    pub fn from_api(api: FastNoiseApi, simd_level: SimdLevel) -> Result<Arc<Self>> {
        Ok(Arc::new(Self::build(api, simd_level, None)?))
    }

    fn build(api: FastNoiseApi, simd_level: SimdLevel, path: Option<PathBuf>) -> Result<Self> {
        let registry = MetadataRegistry::collect(&api);
        if registry.is_empty() {
            return Err(FastNoiseError::NativeCall("FastNoise library reports no node metadata"));
        }

        Ok(Self {
            api,
            registry,
            simd_level,
            path,
        })
    }

    fn log_loaded(&self) {
        info!(
            "Loaded FastNoise2 from {} ({} node types, simd={})",
            self.path().map(|p| p.display().to_string()).unwrap_or_default(),
            self.registry.len(),
            self.simd_level
        );
    }

    #[inline]
    pub(crate) fn api(&self) -> &FastNoiseApi {
        &self.api
    }

    #[inline]
    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }

    pub fn metadata(&self, name: &str) -> Option<&Metadata> {
        self.registry.find(name)
    }

    pub fn node_names(&self) -> Vec<String> {
        self.registry.names().map(str::to_string).collect()
    }

    #[inline]
    pub fn simd_level(&self) -> SimdLevel {
        self.simd_level
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn new_node(self: &Arc<Self>, name: &str) -> Result<FastNoise> {
        FastNoise::with_library(Arc::clone(self), name)
    }

    pub fn node_from_encoded_node_tree(self: &Arc<Self>, encoded: &str) -> Result<FastNoise> {
        FastNoise::from_encoded_node_tree_with_library(Arc::clone(self), encoded)
    }
}

impl std::fmt::Debug for FastNoiseLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastNoiseLibrary")
            .field("path", &self.path)
            .field("simd_level", &self.simd_level)
            .field("node_types", &self.registry.len())
            .field("dynamic", &self.api.is_dynamic())
            .finish()
    }
}
