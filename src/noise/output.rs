//! Min/max bounds reported by the grid and array generators

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputMinMax {
    pub min: f32,
    pub max: f32,
}

impl Default for OutputMinMax {
    /// 空区间，任何值 merge 进来都会覆盖它
    fn default() -> Self {
        Self {
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        }
    }
}

impl OutputMinMax {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// 原生接口写出的 float[2] = {min, max}
    #[inline]
    pub fn from_native(raw: [f32; 2]) -> Self {
        Self { min: raw[0], max: raw[1] }
    }

    #[inline]
    pub fn merge(&mut self, other: &OutputMinMax) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn merged(mut self, other: &OutputMinMax) -> Self {
        self.merge(other);
        self
    }

    /// 用一组数值计算边界，空切片返回 Default
    pub fn from_values(values: &[f32]) -> Self {
        values.iter().fold(Self::default(), |mut acc, &v| {
            acc.min = acc.min.min(v);
            acc.max = acc.max.max(v);
            acc
        })
    }

    #[inline]
    pub fn range(&self) -> f32 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}
