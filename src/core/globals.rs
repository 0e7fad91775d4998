//! Global state management for the process-wide FastNoise2 library

use super::config::LoaderConfig;
use super::error::{FastNoiseError, Result};
use crate::native::library::FastNoiseLibrary;
use lazy_static::lazy_static;
use log::{error, warn};
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref GLOBAL_LIBRARY: RwLock<Option<Arc<FastNoiseLibrary>>> = RwLock::new(None);
    /// 最近一次加载失败的原因，成功加载后清空
    static ref UNAVAILABILITY_CAUSE: RwLock<Option<String>> = RwLock::new(None);
}

fn lock_poisoned() -> FastNoiseError {
    FastNoiseError::Unavailable("FastNoise global state lock poisoned".to_string())
}

/// 按配置加载并替换进程级的原生库
pub fn init_library(config: &LoaderConfig) -> Result<Arc<FastNoiseLibrary>> {
    match FastNoiseLibrary::load(config) {
        Ok(library) => {
            install_library(Arc::clone(&library))?;
            Ok(library)
        },
        Err(e) => {
            error!("Failed to load FastNoise2: {}", e);
            // 已经装好的库继续可用，不记录不可用原因
            let installed = GLOBAL_LIBRARY.read().map(|global| global.is_some()).unwrap_or(false);
            if !installed {
                if let Ok(mut cause) = UNAVAILABILITY_CAUSE.write() {
                    *cause = Some(e.to_string());
                }
            }
            Err(e)
        },
    }
}

/// 直接安装一个已经准备好的库，已有的节点继续持有旧库直到释放
pub fn install_library(library: Arc<FastNoiseLibrary>) -> Result<()> {
    let mut global = GLOBAL_LIBRARY.write().map_err(|_| lock_poisoned())?;
    if global.is_some() {
        warn!("FastNoise library already initialized, reinitializing...");
    }
    *global = Some(library);

    if let Ok(mut cause) = UNAVAILABILITY_CAUSE.write() {
        *cause = None;
    }
    Ok(())
}

/// 取进程级的库，第一次调用时按环境变量加载
pub fn library() -> Result<Arc<FastNoiseLibrary>> {
    if let Some(library) = GLOBAL_LIBRARY.read().map_err(|_| lock_poisoned())?.as_ref() {
        return Ok(Arc::clone(library));
    }

    // 之前失败过就不再重复尝试
    if let Some(cause) = unavailability_cause() {
        return Err(FastNoiseError::Unavailable(cause));
    }

    let mut global = GLOBAL_LIBRARY.write().map_err(|_| lock_poisoned())?;
    // 拿写锁期间可能已经有别的线程加载好了
    if let Some(library) = global.as_ref() {
        return Ok(Arc::clone(library));
    }

    let loaded = LoaderConfig::from_env().and_then(|config| FastNoiseLibrary::load(&config));
    match loaded {
        Ok(library) => {
            *global = Some(Arc::clone(&library));
            Ok(library)
        },
        Err(e) => {
            error!("FastNoise library unavailable: {}", e);
            if let Ok(mut cause) = UNAVAILABILITY_CAUSE.write() {
                *cause = Some(e.to_string());
            }
            Err(e)
        },
    }
}

pub fn is_available() -> bool {
    library().is_ok()
}

pub fn unavailability_cause() -> Option<String> {
    UNAVAILABILITY_CAUSE.read().ok().and_then(|cause| cause.clone())
}

pub fn ensure_available() -> Result<()> {
    match library() {
        Ok(_) => Ok(()),
        Err(FastNoiseError::Unavailable(cause)) => Err(FastNoiseError::Unavailable(cause)),
        Err(e) => Err(FastNoiseError::Unavailable(e.to_string())),
    }
}
