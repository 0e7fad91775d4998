//! Host platform detection for locating the bundled FastNoise2 binary

use super::error::{FastNoiseError, Result};
use std::path::{Path, PathBuf};

/// 原生库文件的基础名称，不带前缀和后缀
pub const NATIVE_LIB_NAME: &str = "FastNoise";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: &'static str,
    pub arch: &'static str,
}

impl Platform {
    pub fn detect() -> Result<Self> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// 只支持预编译了原生库的组合：
    /// darwin arm64/x86_64, windows x86_64, linux arm64/x86_64
    pub fn from_parts(os: &str, arch: &str) -> Result<Self> {
        let os_lower = os.to_ascii_lowercase();
        let arch_lower = arch.to_ascii_lowercase();

        let arm64 = arch_lower.contains("aarch64") || arch_lower.contains("arm64");
        let x86_64 = arch_lower.contains("x86_64") || arch_lower.contains("amd64");

        let resolved = if os_lower.starts_with("mac") || os_lower.starts_with("darwin") {
            match (arm64, x86_64) {
                (true, _) => Some(("darwin", "arm64")),
                (_, true) => Some(("darwin", "x86_64")),
                _ => None,
            }
        } else if os_lower.starts_with("win") {
            x86_64.then_some(("windows", "x86_64"))
        } else if os_lower.starts_with("linux") {
            match (arm64, x86_64) {
                (true, _) => Some(("linux", "arm64")),
                (_, true) => Some(("linux", "x86_64")),
                _ => None,
            }
        } else {
            None
        };

        resolved
            .map(|(os, arch)| Platform { os, arch })
            .ok_or_else(|| FastNoiseError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            })
    }

    #[inline]
    pub fn dylib_suffix(&self) -> &'static str {
        match self.os {
            "darwin" => ".dylib",
            "windows" => ".dll",
            _ => ".so",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", NATIVE_LIB_NAME, self.dylib_suffix())
    }

    /// `<dir>/<arch>/FastNoise.<ext>`
    pub fn bundled_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.arch).join(self.file_name())
    }

    /// `<dir>/<os>/<arch>/FastNoise.<ext>`
    pub fn nested_bundled_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.os).join(self.arch).join(self.file_name())
    }

    /// 交给系统加载器按默认搜索路径查找的名字，例如 libFastNoise.so
    pub fn system_library_name(&self) -> String {
        match self.os {
            "windows" => format!("{}.dll", NATIVE_LIB_NAME),
            "darwin" => format!("lib{}.dylib", NATIVE_LIB_NAME),
            _ => format!("lib{}.so", NATIVE_LIB_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_platforms() {
        let cases = [
            ("Mac OS X", "aarch64", "darwin", "arm64"),
            ("macos", "x86_64", "darwin", "x86_64"),
            ("Windows 11", "amd64", "windows", "x86_64"),
            ("linux", "aarch64", "linux", "arm64"),
            ("Linux", "x86_64", "linux", "x86_64"),
        ];

        for (os, arch, expected_os, expected_arch) in cases {
            let platform = Platform::from_parts(os, arch).unwrap();
            assert_eq!(platform.os, expected_os, "os for {}/{}", os, arch);
            assert_eq!(platform.arch, expected_arch, "arch for {}/{}", os, arch);
        }
    }

    #[test]
    fn test_unsupported_platforms() {
        for (os, arch) in [("windows", "aarch64"), ("freebsd", "x86_64"), ("linux", "riscv64")] {
            match Platform::from_parts(os, arch) {
                Err(FastNoiseError::UnsupportedPlatform { os: o, arch: a }) => {
                    assert_eq!(o, os);
                    assert_eq!(a, arch);
                },
                other => panic!("{}/{} should be unsupported, got {:?}", os, arch, other),
            }
        }
    }

    #[test]
    fn test_library_paths() {
        let linux = Platform::from_parts("linux", "x86_64").unwrap();
        assert_eq!(linux.file_name(), "FastNoise.so");
        assert_eq!(linux.bundled_path(Path::new("/opt/natives")), PathBuf::from("/opt/natives/x86_64/FastNoise.so"));
        assert_eq!(
            linux.nested_bundled_path(Path::new("/opt/natives")),
            PathBuf::from("/opt/natives/linux/x86_64/FastNoise.so")
        );
        assert_eq!(linux.system_library_name(), "libFastNoise.so");

        let windows = Platform::from_parts("windows", "x86_64").unwrap();
        assert_eq!(windows.dylib_suffix(), ".dll");
        assert_eq!(windows.system_library_name(), "FastNoise.dll");

        let mac = Platform::from_parts("darwin", "arm64").unwrap();
        assert_eq!(mac.dylib_suffix(), ".dylib");
        assert_eq!(mac.system_library_name(), "libFastNoise.dylib");
    }
}
