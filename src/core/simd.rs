//! FastSIMD instruction set levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::FastNoiseError;

/// 与 FastSIMD::eLevel 的位值一一对应
/// Auto(0) 表示让原生库在运行时选择可用的最高级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimdLevel {
    #[default]
    Auto,
    Scalar,
    Sse,
    Sse2,
    Sse3,
    Ssse3,
    Sse41,
    Sse42,
    Avx,
    Avx2,
    Avx512,
    Neon,
}

impl SimdLevel {
    pub const ALL: [SimdLevel; 12] = [
        SimdLevel::Auto,
        SimdLevel::Scalar,
        SimdLevel::Sse,
        SimdLevel::Sse2,
        SimdLevel::Sse3,
        SimdLevel::Ssse3,
        SimdLevel::Sse41,
        SimdLevel::Sse42,
        SimdLevel::Avx,
        SimdLevel::Avx2,
        SimdLevel::Avx512,
        SimdLevel::Neon,
    ];

    #[inline]
    pub fn bits(self) -> u32 {
        match self {
            SimdLevel::Auto => 0,
            SimdLevel::Scalar => 1,
            SimdLevel::Sse => 1 << 1,
            SimdLevel::Sse2 => 1 << 2,
            SimdLevel::Sse3 => 1 << 3,
            SimdLevel::Ssse3 => 1 << 4,
            SimdLevel::Sse41 => 1 << 5,
            SimdLevel::Sse42 => 1 << 6,
            SimdLevel::Avx => 1 << 7,
            SimdLevel::Avx2 => 1 << 8,
            SimdLevel::Avx512 => 1 << 9,
            SimdLevel::Neon => 1 << 16,
        }
    }

    #[inline]
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.bits() == bits)
    }

    pub fn name(self) -> &'static str {
        match self {
            SimdLevel::Auto => "auto",
            SimdLevel::Scalar => "scalar",
            SimdLevel::Sse => "sse",
            SimdLevel::Sse2 => "sse2",
            SimdLevel::Sse3 => "sse3",
            SimdLevel::Ssse3 => "ssse3",
            SimdLevel::Sse41 => "sse41",
            SimdLevel::Sse42 => "sse42",
            SimdLevel::Avx => "avx",
            SimdLevel::Avx2 => "avx2",
            SimdLevel::Avx512 => "avx512",
            SimdLevel::Neon => "neon",
        }
    }
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimdLevel {
    type Err = FastNoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // sse4.1 / SSE4_1 / sse41 都认
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let normalized = match normalized.as_str() {
            "" | "0" | "null" => "auto",
            other => other,
        };

        Self::ALL
            .into_iter()
            .find(|level| level.name() == normalized)
            .ok_or_else(|| FastNoiseError::InvalidArgument(format!("Unknown SIMD level: {}", s)))
    }
}
