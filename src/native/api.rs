//! FastNoise2 C ABI function table
//!
//! 每个字段对应 FastNoise_C.h 里的一个导出函数。函数指针从动态库里拷贝出来，
//! `library` 字段保证在整个表的生命周期内动态库不会被卸载。

use crate::core::error::{FastNoiseError, Result};
use libloading::Library;
use log::debug;
use std::ffi::{CStr, c_char, c_int, c_uint, c_void};
use std::path::Path;

pub type FnNewFromMetadata = unsafe extern "C" fn(id: c_int, simd_level: c_uint) -> *mut c_void;
pub type FnNewFromEncodedNodeTree = unsafe extern "C" fn(encoded: *const c_char, simd_level: c_uint) -> *mut c_void;
pub type FnDeleteNodeRef = unsafe extern "C" fn(node: *mut c_void);
pub type FnGetSimdLevel = unsafe extern "C" fn(node: *const c_void) -> c_uint;
pub type FnGetMetadataId = unsafe extern "C" fn(node: *const c_void) -> c_int;

pub type FnGenUniformGrid2D = unsafe extern "C" fn(
    node: *const c_void,
    noise_out: *mut f32,
    x_start: c_int,
    y_start: c_int,
    x_size: c_int,
    y_size: c_int,
    frequency: f32,
    seed: c_int,
    output_min_max: *mut f32,
) -> c_uint;

pub type FnGenUniformGrid3D = unsafe extern "C" fn(
    node: *const c_void,
    noise_out: *mut f32,
    x_start: c_int,
    y_start: c_int,
    z_start: c_int,
    x_size: c_int,
    y_size: c_int,
    z_size: c_int,
    frequency: f32,
    seed: c_int,
    output_min_max: *mut f32,
) -> c_uint;

pub type FnGenUniformGrid4D = unsafe extern "C" fn(
    node: *const c_void,
    noise_out: *mut f32,
    x_start: c_int,
    y_start: c_int,
    z_start: c_int,
    w_start: c_int,
    x_size: c_int,
    y_size: c_int,
    z_size: c_int,
    w_size: c_int,
    frequency: f32,
    seed: c_int,
    output_min_max: *mut f32,
) -> c_uint;

pub type FnGenTileable2D = unsafe extern "C" fn(
    node: *const c_void,
    noise_out: *mut f32,
    x_size: c_int,
    y_size: c_int,
    frequency: f32,
    seed: c_int,
    output_min_max: *mut f32,
);

pub type FnGenPositionArray2D = unsafe extern "C" fn(
    node: *const c_void,
    noise_out: *mut f32,
    count: c_int,
    x_pos: *const f32,
    y_pos: *const f32,
    x_offset: f32,
    y_offset: f32,
    seed: c_int,
    output_min_max: *mut f32,
);

pub type FnGenPositionArray3D = unsafe extern "C" fn(
    node: *const c_void,
    noise_out: *mut f32,
    count: c_int,
    x_pos: *const f32,
    y_pos: *const f32,
    z_pos: *const f32,
    x_offset: f32,
    y_offset: f32,
    z_offset: f32,
    seed: c_int,
    output_min_max: *mut f32,
);

pub type FnGenPositionArray4D = unsafe extern "C" fn(
    node: *const c_void,
    noise_out: *mut f32,
    count: c_int,
    x_pos: *const f32,
    y_pos: *const f32,
    z_pos: *const f32,
    w_pos: *const f32,
    x_offset: f32,
    y_offset: f32,
    z_offset: f32,
    w_offset: f32,
    seed: c_int,
    output_min_max: *mut f32,
);

pub type FnGenSingle2D = unsafe extern "C" fn(node: *const c_void, x: f32, y: f32, seed: c_int) -> f32;
pub type FnGenSingle3D = unsafe extern "C" fn(node: *const c_void, x: f32, y: f32, z: f32, seed: c_int) -> f32;
pub type FnGenSingle4D = unsafe extern "C" fn(node: *const c_void, x: f32, y: f32, z: f32, w: f32, seed: c_int) -> f32;

pub type FnGetMetadataCount = unsafe extern "C" fn() -> c_int;
pub type FnGetMetadataName = unsafe extern "C" fn(id: c_int) -> *const c_char;
pub type FnGetMetadataCountById = unsafe extern "C" fn(id: c_int) -> c_int;
pub type FnGetMetadataMemberName = unsafe extern "C" fn(id: c_int, index: c_int) -> *const c_char;
pub type FnGetMetadataMemberInt = unsafe extern "C" fn(id: c_int, index: c_int) -> c_int;
pub type FnGetMetadataEnumName = unsafe extern "C" fn(id: c_int, variable_index: c_int, enum_index: c_int) -> *const c_char;

pub type FnSetFloat = unsafe extern "C" fn(node: *mut c_void, index: c_int, value: f32) -> bool;
pub type FnSetIntEnum = unsafe extern "C" fn(node: *mut c_void, index: c_int, value: c_int) -> bool;
pub type FnSetNodeLookup = unsafe extern "C" fn(node: *mut c_void, index: c_int, lookup: *const c_void) -> bool;

pub struct FastNoiseApi {
    pub(crate) new_from_metadata: FnNewFromMetadata,
    pub(crate) new_from_encoded_node_tree: FnNewFromEncodedNodeTree,
    pub(crate) delete_node_ref: FnDeleteNodeRef,
    pub(crate) get_simd_level: FnGetSimdLevel,
    pub(crate) get_metadata_id: FnGetMetadataId,

    pub(crate) gen_uniform_grid_2d: FnGenUniformGrid2D,
    pub(crate) gen_uniform_grid_3d: FnGenUniformGrid3D,
    pub(crate) gen_uniform_grid_4d: FnGenUniformGrid4D,
    pub(crate) gen_tileable_2d: FnGenTileable2D,
    pub(crate) gen_position_array_2d: FnGenPositionArray2D,
    pub(crate) gen_position_array_3d: FnGenPositionArray3D,
    pub(crate) gen_position_array_4d: FnGenPositionArray4D,
    pub(crate) gen_single_2d: FnGenSingle2D,
    pub(crate) gen_single_3d: FnGenSingle3D,
    pub(crate) gen_single_4d: FnGenSingle4D,

    pub(crate) get_metadata_count: FnGetMetadataCount,
    pub(crate) get_metadata_name: FnGetMetadataName,
    pub(crate) get_metadata_variable_count: FnGetMetadataCountById,
    pub(crate) get_metadata_variable_name: FnGetMetadataMemberName,
    pub(crate) get_metadata_variable_type: FnGetMetadataMemberInt,
    pub(crate) get_metadata_variable_dimension_idx: FnGetMetadataMemberInt,
    pub(crate) get_metadata_enum_count: FnGetMetadataMemberInt,
    pub(crate) get_metadata_enum_name: FnGetMetadataEnumName,
    pub(crate) set_variable_float: FnSetFloat,
    pub(crate) set_variable_int_enum: FnSetIntEnum,

    pub(crate) get_metadata_node_lookup_count: FnGetMetadataCountById,
    pub(crate) get_metadata_node_lookup_name: FnGetMetadataMemberName,
    pub(crate) get_metadata_node_lookup_dimension_idx: FnGetMetadataMemberInt,
    pub(crate) set_node_lookup: FnSetNodeLookup,

    pub(crate) get_metadata_hybrid_count: FnGetMetadataCountById,
    pub(crate) get_metadata_hybrid_name: FnGetMetadataMemberName,
    pub(crate) get_metadata_hybrid_dimension_idx: FnGetMetadataMemberInt,
    pub(crate) set_hybrid_node_lookup: FnSetNodeLookup,
    pub(crate) set_hybrid_float: FnSetFloat,

    /// None 表示函数表来自进程内（测试用的 mock 或者静态链接）
    pub(crate) library: Option<Library>,
}

/// 从动态库里取出一个函数指针
///
/// # Safety
/// `T` 必须和导出函数的真实签名一致
unsafe fn symbol<T: Copy>(library: &Library, name: &'static str) -> Result<T> {
    let sym = unsafe { library.get::<T>(name.as_bytes()) }
        .map_err(|source| FastNoiseError::MissingSymbol { name, source })?;
    debug!("Resolved FastNoise symbol {}", name);
    Ok(*sym)
}

impl FastNoiseApi {
    pub fn load(path: &Path) -> Result<Self> {
        let library = unsafe { Library::new(path) }.map_err(|source| FastNoiseError::LibraryLoad {
            path: path.to_path_buf(),
            source,
        })?;

        unsafe {
            Ok(Self {
                new_from_metadata: symbol(&library, "fnNewFromMetadata")?,
                new_from_encoded_node_tree: symbol(&library, "fnNewFromEncodedNodeTree")?,
                delete_node_ref: symbol(&library, "fnDeleteNodeRef")?,
                get_simd_level: symbol(&library, "fnGetSIMDLevel")?,
                get_metadata_id: symbol(&library, "fnGetMetadataID")?,
                gen_uniform_grid_2d: symbol(&library, "fnGenUniformGrid2D")?,
                gen_uniform_grid_3d: symbol(&library, "fnGenUniformGrid3D")?,
                gen_uniform_grid_4d: symbol(&library, "fnGenUniformGrid4D")?,
                gen_tileable_2d: symbol(&library, "fnGenTileable2D")?,
                gen_position_array_2d: symbol(&library, "fnGenPositionArray2D")?,
                gen_position_array_3d: symbol(&library, "fnGenPositionArray3D")?,
                gen_position_array_4d: symbol(&library, "fnGenPositionArray4D")?,
                gen_single_2d: symbol(&library, "fnGenSingle2D")?,
                gen_single_3d: symbol(&library, "fnGenSingle3D")?,
                gen_single_4d: symbol(&library, "fnGenSingle4D")?,
                get_metadata_count: symbol(&library, "fnGetMetadataCount")?,
                get_metadata_name: symbol(&library, "fnGetMetadataName")?,
                get_metadata_variable_count: symbol(&library, "fnGetMetadataVariableCount")?,
                get_metadata_variable_name: symbol(&library, "fnGetMetadataVariableName")?,
                get_metadata_variable_type: symbol(&library, "fnGetMetadataVariableType")?,
                get_metadata_variable_dimension_idx: symbol(&library, "fnGetMetadataVariableDimensionIdx")?,
                get_metadata_enum_count: symbol(&library, "fnGetMetadataEnumCount")?,
                get_metadata_enum_name: symbol(&library, "fnGetMetadataEnumName")?,
                set_variable_float: symbol(&library, "fnSetVariableFloat")?,
                set_variable_int_enum: symbol(&library, "fnSetVariableIntEnum")?,
                get_metadata_node_lookup_count: symbol(&library, "fnGetMetadataNodeLookupCount")?,
                get_metadata_node_lookup_name: symbol(&library, "fnGetMetadataNodeLookupName")?,
                get_metadata_node_lookup_dimension_idx: symbol(&library, "fnGetMetadataNodeLookupDimensionIdx")?,
                set_node_lookup: symbol(&library, "fnSetNodeLookup")?,
                get_metadata_hybrid_count: symbol(&library, "fnGetMetadataHybridCount")?,
                get_metadata_hybrid_name: symbol(&library, "fnGetMetadataHybridName")?,
                get_metadata_hybrid_dimension_idx: symbol(&library, "fnGetMetadataHybridDimensionIdx")?,
                set_hybrid_node_lookup: symbol(&library, "fnSetHybridNodeLookup")?,
                set_hybrid_float: symbol(&library, "fnSetHybridFloat")?,
                library: Some(library),
            })
        }
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.library.is_some()
    }

    // ---- metadata queries，只读取原生库里的静态表 ----

    pub fn metadata_count(&self) -> i32 {
        unsafe { (self.get_metadata_count)() }
    }

    pub fn metadata_name(&self, id: i32) -> String {
        unsafe { c_string((self.get_metadata_name)(id)) }
    }

    pub fn variable_count(&self, id: i32) -> i32 {
        unsafe { (self.get_metadata_variable_count)(id) }
    }

    pub fn variable_name(&self, id: i32, index: i32) -> String {
        unsafe { c_string((self.get_metadata_variable_name)(id, index)) }
    }

    pub fn variable_type(&self, id: i32, index: i32) -> i32 {
        unsafe { (self.get_metadata_variable_type)(id, index) }
    }

    pub fn variable_dimension_idx(&self, id: i32, index: i32) -> i32 {
        unsafe { (self.get_metadata_variable_dimension_idx)(id, index) }
    }

    pub fn enum_count(&self, id: i32, variable_index: i32) -> i32 {
        unsafe { (self.get_metadata_enum_count)(id, variable_index) }
    }

    pub fn enum_name(&self, id: i32, variable_index: i32, enum_index: i32) -> String {
        unsafe { c_string((self.get_metadata_enum_name)(id, variable_index, enum_index)) }
    }

    pub fn node_lookup_count(&self, id: i32) -> i32 {
        unsafe { (self.get_metadata_node_lookup_count)(id) }
    }

    pub fn node_lookup_name(&self, id: i32, index: i32) -> String {
        unsafe { c_string((self.get_metadata_node_lookup_name)(id, index)) }
    }

    pub fn node_lookup_dimension_idx(&self, id: i32, index: i32) -> i32 {
        unsafe { (self.get_metadata_node_lookup_dimension_idx)(id, index) }
    }

    pub fn hybrid_count(&self, id: i32) -> i32 {
        unsafe { (self.get_metadata_hybrid_count)(id) }
    }

    pub fn hybrid_name(&self, id: i32, index: i32) -> String {
        unsafe { c_string((self.get_metadata_hybrid_name)(id, index)) }
    }

    pub fn hybrid_dimension_idx(&self, id: i32, index: i32) -> i32 {
        unsafe { (self.get_metadata_hybrid_dimension_idx)(id, index) }
    }
}

/// 原生库返回的字符串属于库本身，这里只做拷贝
///
/// # Safety
/// `ptr` 为空或者指向以 NUL 结尾的字符串
unsafe fn c_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}
