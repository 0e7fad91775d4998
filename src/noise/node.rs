//! Owned handle to a native FastNoise2 node
//!
//! 每个 `FastNoise` 持有原生 SmartNode 的一个引用，Drop 时通过 fnDeleteNodeRef 释放。
//! 节点之间的引用（Source、LHS 之类）由原生库自己计数，所以子节点先于父节点 drop 是安全的。
//! 节点同时持有 `Arc<FastNoiseLibrary>`，保证动态库在最后一个节点释放前不会被卸载。

use super::metadata::{Member, MemberType, Metadata};
use super::output::OutputMinMax;
use crate::core::error::{FastNoiseError, Result};
use crate::core::globals;
use crate::core::simd::SimdLevel;
use crate::native::library::FastNoiseLibrary;
use std::ffi::{CString, c_void};
use std::ptr::NonNull;
use std::sync::Arc;

/// `FastNoise::set` 接受的成员值
#[derive(Debug, Clone, Copy)]
pub enum MemberValue<'a> {
    Float(f32),
    Int(i32),
    Enum(&'a str),
    Node(&'a FastNoise),
}

impl From<f32> for MemberValue<'_> {
    fn from(value: f32) -> Self {
        MemberValue::Float(value)
    }
}

impl From<i32> for MemberValue<'_> {
    fn from(value: i32) -> Self {
        MemberValue::Int(value)
    }
}

impl<'a> From<&'a str> for MemberValue<'a> {
    fn from(value: &'a str) -> Self {
        MemberValue::Enum(value)
    }
}

impl<'a> From<&'a String> for MemberValue<'a> {
    fn from(value: &'a String) -> Self {
        MemberValue::Enum(value.as_str())
    }
}

impl<'a> From<&'a FastNoise> for MemberValue<'a> {
    fn from(value: &'a FastNoise) -> Self {
        MemberValue::Node(value)
    }
}

pub struct FastNoise {
    library: Arc<FastNoiseLibrary>,
    handle: NonNull<c_void>,
    metadata_id: i32,
}

// 原生节点的生成函数都是 const 的，可以多线程同时调用；修改成员需要 &mut self
unsafe impl Send for FastNoise {}
unsafe impl Sync for FastNoise {}

impl FastNoise {
    /// 使用进程级的原生库创建节点，名字大小写和空格不敏感
    pub fn new(metadata_name: &str) -> Result<Self> {
        Self::with_library(globals::library()?, metadata_name)
    }

    /// 从 NoiseTool 导出的编码节点树创建节点
    pub fn from_encoded_node_tree(encoded: &str) -> Result<Self> {
        Self::from_encoded_node_tree_with_library(globals::library()?, encoded)
    }

    pub fn with_library(library: Arc<FastNoiseLibrary>, metadata_name: &str) -> Result<Self> {
        let metadata_id = library
            .registry()
            .find_id(metadata_name)
            .ok_or_else(|| FastNoiseError::UnknownNode(metadata_name.to_string()))?;

        let raw = unsafe { (library.api().new_from_metadata)(metadata_id, library.simd_level().bits()) };
        let handle = NonNull::new(raw).ok_or(FastNoiseError::NativeCall("Failed to create node from metadata"))?;

        Ok(Self {
            library,
            handle,
            metadata_id,
        })
    }

    pub fn from_encoded_node_tree_with_library(library: Arc<FastNoiseLibrary>, encoded: &str) -> Result<Self> {
        let encoded_c = CString::new(encoded)
            .map_err(|_| FastNoiseError::InvalidArgument("encoded node tree contains a NUL byte".to_string()))?;

        let raw = unsafe { (library.api().new_from_encoded_node_tree)(encoded_c.as_ptr(), library.simd_level().bits()) };
        let handle = NonNull::new(raw).ok_or_else(|| FastNoiseError::InvalidNodeTree(encoded.to_string()))?;
        let metadata_id = unsafe { (library.api().get_metadata_id)(handle.as_ptr()) };

        // 先构造出来，校验失败时由 Drop 释放原生引用
        let node = Self {
            library,
            handle,
            metadata_id,
        };

        if node.library.registry().get(metadata_id).is_none() {
            return Err(FastNoiseError::NativeCall("Decoded node reports an unknown metadata id"));
        }

        Ok(node)
    }

    #[inline]
    pub fn library(&self) -> &Arc<FastNoiseLibrary> {
        &self.library
    }

    #[inline]
    pub fn metadata_id(&self) -> i32 {
        self.metadata_id
    }

    pub fn metadata(&self) -> &Metadata {
        self.library.registry().by_valid_id(self.metadata_id)
    }

    pub fn metadata_name(&self) -> &str {
        &self.metadata().name
    }

    /// 原生库实际选用的 SIMD 级别（位值）
    pub fn simd_level_bits(&self) -> u32 {
        unsafe { (self.library.api().get_simd_level)(self.raw()) }
    }

    pub fn simd_level(&self) -> Option<SimdLevel> {
        SimdLevel::from_bits(self.simd_level_bits())
    }

    #[inline]
    pub(crate) fn raw(&self) -> *const c_void {
        self.handle.as_ptr()
    }

    #[inline]
    fn raw_mut(&mut self) -> *mut c_void {
        self.handle.as_ptr()
    }

    fn member(&self, member_name: &str) -> Result<&Member> {
        self.metadata()
            .member(member_name)
            .ok_or_else(|| FastNoiseError::UnknownMember(member_name.to_string()))
    }

    fn member_slot(&self, member_name: &str) -> Result<(MemberType, i32)> {
        self.member(member_name).map(|m| (m.member_type, m.index))
    }

    pub fn set<'a>(&mut self, member_name: &str, value: impl Into<MemberValue<'a>>) -> Result<()> {
        match value.into() {
            MemberValue::Float(v) => self.set_float(member_name, v),
            MemberValue::Int(v) => self.set_int(member_name, v),
            MemberValue::Enum(v) => self.set_enum(member_name, v),
            MemberValue::Node(v) => self.set_node(member_name, v),
        }
    }

    /// Float 成员或者 Hybrid 成员的常量值
    pub fn set_float(&mut self, member_name: &str, value: f32) -> Result<()> {
        let (member_type, index) = self.member_slot(member_name)?;
        let setter = match member_type {
            MemberType::Float => self.library.api().set_variable_float,
            MemberType::Hybrid => self.library.api().set_hybrid_float,
            _ => return Err(Self::mismatch(member_name, MemberType::Float)),
        };

        if !unsafe { setter(self.raw_mut(), index, value) } {
            return Err(FastNoiseError::NativeCall("Failed to set float value"));
        }
        Ok(())
    }

    pub fn set_int(&mut self, member_name: &str, value: i32) -> Result<()> {
        let (member_type, index) = self.member_slot(member_name)?;
        if member_type != MemberType::Int {
            return Err(Self::mismatch(member_name, MemberType::Int));
        }

        let set_int_enum = self.library.api().set_variable_int_enum;
        if !unsafe { set_int_enum(self.raw_mut(), index, value) } {
            return Err(FastNoiseError::NativeCall("Failed to set int value"));
        }
        Ok(())
    }

    pub fn set_enum(&mut self, member_name: &str, value: &str) -> Result<()> {
        let member = self.member(member_name)?;
        if member.member_type != MemberType::Enum {
            return Err(Self::mismatch(member_name, MemberType::Enum));
        }

        let index = member.index;
        let enum_idx = member
            .enum_index(value)
            .ok_or_else(|| FastNoiseError::UnknownEnumValue(value.to_string()))?;

        let set_int_enum = self.library.api().set_variable_int_enum;
        if !unsafe { set_int_enum(self.raw_mut(), index, enum_idx) } {
            return Err(FastNoiseError::NativeCall("Failed to set enum value"));
        }
        Ok(())
    }

    /// NodeLookup 成员或者 Hybrid 成员指向另一个节点
    pub fn set_node(&mut self, member_name: &str, node: &FastNoise) -> Result<()> {
        if !Arc::ptr_eq(&self.library, &node.library) {
            return Err(FastNoiseError::LibraryMismatch);
        }

        let (member_type, index) = self.member_slot(member_name)?;
        let setter = match member_type {
            MemberType::NodeLookup => self.library.api().set_node_lookup,
            MemberType::Hybrid => self.library.api().set_hybrid_node_lookup,
            _ => return Err(Self::mismatch(member_name, MemberType::NodeLookup)),
        };

        if !unsafe { setter(self.raw_mut(), index, node.raw()) } {
            return Err(FastNoiseError::NativeCall("Failed to set node lookup"));
        }
        Ok(())
    }

    fn mismatch(member_name: &str, wanted: MemberType) -> FastNoiseError {
        FastNoiseError::TypeMismatch {
            member: member_name.to_string(),
            expected: wanted.describe(),
        }
    }

    pub fn gen_uniform_grid_2d(
        &self,
        noise_out: &mut [f32],
        x_start: i32,
        y_start: i32,
        x_size: i32,
        y_size: i32,
        frequency: f32,
        seed: i32,
    ) -> Result<OutputMinMax> {
        let required = grid_len(&[x_size, y_size])?;
        check_output(noise_out, required)?;
        if required == 0 {
            return Ok(OutputMinMax::default());
        }

        let mut min_max = [0f32; 2];
        unsafe {
            (self.library.api().gen_uniform_grid_2d)(
                self.raw(),
                noise_out.as_mut_ptr(),
                x_start,
                y_start,
                x_size,
                y_size,
                frequency,
                seed,
                min_max.as_mut_ptr(),
            );
        }
        Ok(OutputMinMax::from_native(min_max))
    }

    pub fn gen_uniform_grid_3d(
        &self,
        noise_out: &mut [f32],
        x_start: i32,
        y_start: i32,
        z_start: i32,
        x_size: i32,
        y_size: i32,
        z_size: i32,
        frequency: f32,
        seed: i32,
    ) -> Result<OutputMinMax> {
        let required = grid_len(&[x_size, y_size, z_size])?;
        check_output(noise_out, required)?;
        if required == 0 {
            return Ok(OutputMinMax::default());
        }

        let mut min_max = [0f32; 2];
        unsafe {
            (self.library.api().gen_uniform_grid_3d)(
                self.raw(),
                noise_out.as_mut_ptr(),
                x_start,
                y_start,
                z_start,
                x_size,
                y_size,
                z_size,
                frequency,
                seed,
                min_max.as_mut_ptr(),
            );
        }
        Ok(OutputMinMax::from_native(min_max))
    }

    pub fn gen_uniform_grid_4d(
        &self,
        noise_out: &mut [f32],
        x_start: i32,
        y_start: i32,
        z_start: i32,
        w_start: i32,
        x_size: i32,
        y_size: i32,
        z_size: i32,
        w_size: i32,
        frequency: f32,
        seed: i32,
    ) -> Result<OutputMinMax> {
        let required = grid_len(&[x_size, y_size, z_size, w_size])?;
        check_output(noise_out, required)?;
        if required == 0 {
            return Ok(OutputMinMax::default());
        }

        let mut min_max = [0f32; 2];
        unsafe {
            (self.library.api().gen_uniform_grid_4d)(
                self.raw(),
                noise_out.as_mut_ptr(),
                x_start,
                y_start,
                z_start,
                w_start,
                x_size,
                y_size,
                z_size,
                w_size,
                frequency,
                seed,
                min_max.as_mut_ptr(),
            );
        }
        Ok(OutputMinMax::from_native(min_max))
    }

    /// 生成可以无缝平铺的 2D 噪声
    pub fn gen_tileable_2d(
        &self,
        noise_out: &mut [f32],
        x_size: i32,
        y_size: i32,
        frequency: f32,
        seed: i32,
    ) -> Result<OutputMinMax> {
        let required = grid_len(&[x_size, y_size])?;
        check_output(noise_out, required)?;
        if required == 0 {
            return Ok(OutputMinMax::default());
        }

        let mut min_max = [0f32; 2];
        unsafe {
            (self.library.api().gen_tileable_2d)(
                self.raw(),
                noise_out.as_mut_ptr(),
                x_size,
                y_size,
                frequency,
                seed,
                min_max.as_mut_ptr(),
            );
        }
        Ok(OutputMinMax::from_native(min_max))
    }

    pub fn gen_position_array_2d(
        &self,
        noise_out: &mut [f32],
        x_pos: &[f32],
        y_pos: &[f32],
        x_offset: f32,
        y_offset: f32,
        seed: i32,
    ) -> Result<OutputMinMax> {
        let count = position_count(noise_out, &[x_pos, y_pos])?;
        if count == 0 {
            return Ok(OutputMinMax::default());
        }

        let mut min_max = [0f32; 2];
        unsafe {
            (self.library.api().gen_position_array_2d)(
                self.raw(),
                noise_out.as_mut_ptr(),
                count,
                x_pos.as_ptr(),
                y_pos.as_ptr(),
                x_offset,
                y_offset,
                seed,
                min_max.as_mut_ptr(),
            );
        }
        Ok(OutputMinMax::from_native(min_max))
    }

    pub fn gen_position_array_3d(
        &self,
        noise_out: &mut [f32],
        x_pos: &[f32],
        y_pos: &[f32],
        z_pos: &[f32],
        x_offset: f32,
        y_offset: f32,
        z_offset: f32,
        seed: i32,
    ) -> Result<OutputMinMax> {
        let count = position_count(noise_out, &[x_pos, y_pos, z_pos])?;
        if count == 0 {
            return Ok(OutputMinMax::default());
        }

        let mut min_max = [0f32; 2];
        unsafe {
            (self.library.api().gen_position_array_3d)(
                self.raw(),
                noise_out.as_mut_ptr(),
                count,
                x_pos.as_ptr(),
                y_pos.as_ptr(),
                z_pos.as_ptr(),
                x_offset,
                y_offset,
                z_offset,
                seed,
                min_max.as_mut_ptr(),
            );
        }
        Ok(OutputMinMax::from_native(min_max))
    }

    pub fn gen_position_array_4d(
        &self,
        noise_out: &mut [f32],
        x_pos: &[f32],
        y_pos: &[f32],
        z_pos: &[f32],
        w_pos: &[f32],
        x_offset: f32,
        y_offset: f32,
        z_offset: f32,
        w_offset: f32,
        seed: i32,
    ) -> Result<OutputMinMax> {
        let count = position_count(noise_out, &[x_pos, y_pos, z_pos, w_pos])?;
        if count == 0 {
            return Ok(OutputMinMax::default());
        }

        let mut min_max = [0f32; 2];
        unsafe {
            (self.library.api().gen_position_array_4d)(
                self.raw(),
                noise_out.as_mut_ptr(),
                count,
                x_pos.as_ptr(),
                y_pos.as_ptr(),
                z_pos.as_ptr(),
                w_pos.as_ptr(),
                x_offset,
                y_offset,
                z_offset,
                w_offset,
                seed,
                min_max.as_mut_ptr(),
            );
        }
        Ok(OutputMinMax::from_native(min_max))
    }

    pub fn gen_single_2d(&self, x: f32, y: f32, seed: i32) -> f32 {
        unsafe { (self.library.api().gen_single_2d)(self.raw(), x, y, seed) }
    }

    pub fn gen_single_3d(&self, x: f32, y: f32, z: f32, seed: i32) -> f32 {
        unsafe { (self.library.api().gen_single_3d)(self.raw(), x, y, z, seed) }
    }

    pub fn gen_single_4d(&self, x: f32, y: f32, z: f32, w: f32, seed: i32) -> f32 {
        unsafe { (self.library.api().gen_single_4d)(self.raw(), x, y, z, w, seed) }
    }
}

impl Drop for FastNoise {
    fn drop(&mut self) {
        unsafe { (self.library.api().delete_node_ref)(self.handle.as_ptr()) }
    }
}

impl std::fmt::Debug for FastNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastNoise")
            .field("metadata", &self.metadata_name())
            .field("handle", &self.handle)
            .finish()
    }
}

/// 各维度尺寸的乘积，负数和溢出都视为参数错误
pub(crate) fn grid_len(sizes: &[i32]) -> Result<usize> {
    sizes.iter().try_fold(1usize, |acc, &size| {
        let size = usize::try_from(size)
            .map_err(|_| FastNoiseError::InvalidArgument(format!("grid size must not be negative: {}", size)))?;
        acc.checked_mul(size)
            .ok_or_else(|| FastNoiseError::InvalidArgument("grid size overflows usize".to_string()))
    })
}

#[inline]
pub(crate) fn check_output(noise_out: &[f32], required: usize) -> Result<()> {
    if noise_out.len() < required {
        return Err(FastNoiseError::BufferTooSmall {
            required,
            actual: noise_out.len(),
        });
    }
    Ok(())
}

/// 所有坐标数组长度必须一致，输出至少能放下同样多的值
fn position_count(noise_out: &[f32], positions: &[&[f32]]) -> Result<i32> {
    let count = positions.first().map(|p| p.len()).unwrap_or(0);
    if positions.iter().any(|p| p.len() != count) {
        return Err(FastNoiseError::InvalidArgument(
            "position arrays must all have the same length".to_string(),
        ));
    }
    check_output(noise_out, count)?;
    i32::try_from(count)
        .map_err(|_| FastNoiseError::InvalidArgument(format!("too many positions: {}", count)))
}
