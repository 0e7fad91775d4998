//! JNI methods for FastNoise node handles
//!
//! handle 是 `Box<FastNoise>` 的裸指针，由 nativeDelete 释放，0 表示空节点。

use crate::core::error::FastNoiseError;
use crate::ext::jni::{
    JniResult, JniResultExt, array_len, get_string, new_min_max_array, read_float_array, write_float_array,
};
use crate::noise::node::FastNoise;
use crate::noise::output::OutputMinMax;
use jni::JNIEnv;
use jni::objects::{JClass, JFloatArray, JString};
use jni::sys::{jfloat, jfloatArray, jint, jlong, jstring};
use log::debug;

fn into_handle(node: FastNoise) -> jlong {
    Box::into_raw(Box::new(node)) as jlong
}

/// # Safety
/// `handle` 必须是 `into_handle` 返回且尚未释放的值
unsafe fn node_ref<'a>(handle: jlong) -> JniResult<&'a FastNoise> {
    if handle == 0 {
        return Err(FastNoiseError::InvalidArgument("FastNoise handle is null".to_string()).into());
    }
    Ok(unsafe { &*(handle as *const FastNoise) })
}

/// # Safety
/// 同 `node_ref`，并且调用期间没有其它引用指向同一个节点
unsafe fn node_mut<'a>(handle: jlong) -> JniResult<&'a mut FastNoise> {
    if handle == 0 {
        return Err(FastNoiseError::InvalidArgument("FastNoise handle is null".to_string()).into());
    }
    Ok(unsafe { &mut *(handle as *mut FastNoise) })
}

/// # Safety
/// `handle` 为 0 或者是 `into_handle` 返回且尚未释放的值，释放后不能再使用
unsafe fn release_handle(handle: jlong) {
    if handle != 0 {
        drop(unsafe { Box::from_raw(handle as *mut FastNoise) });
    }
}

fn check_distinct_handles(handle: jlong, lookup_handle: jlong) -> JniResult<()> {
    if handle == lookup_handle {
        return Err(FastNoiseError::InvalidArgument("a node cannot reference itself".to_string()).into());
    }
    Ok(())
}

/// 缓冲区长度和 Java 数组一致，生成函数只写前面需要的部分，其余保持 0
fn gen_into_buffer<F>(len: usize, generate: F) -> crate::core::error::Result<(Vec<f32>, OutputMinMax)>
where
    F: FnOnce(&mut [f32]) -> crate::core::error::Result<OutputMinMax>,
{
    let mut buffer = vec![0f32; len];
    let min_max = generate(&mut buffer[..])?;
    Ok((buffer, min_max))
}

/// 按 Java 数组长度准备缓冲区，生成完成后整体写回，返回 {min, max}
fn gen_into_array<F>(env: &mut JNIEnv, noise_out: &JFloatArray, generate: F) -> JniResult<jfloatArray>
where
    F: FnOnce(&mut [f32]) -> crate::core::error::Result<OutputMinMax>,
{
    let (buffer, min_max) = gen_into_buffer(array_len(env, noise_out)?, generate)?;
    write_float_array(env, noise_out, &buffer)?;
    Ok(new_min_max_array(env, &min_max)?.into_raw())
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeNewFromMetadata(
    mut env: JNIEnv,
    _class: JClass,
    metadata_name: JString,
) -> jlong {
    (|| -> JniResult<jlong> {
        let name = get_string(&mut env, &metadata_name)?;
        Ok(into_handle(FastNoise::new(&name)?))
    })()
    .or_throw(&mut env)
}

/// 无法解码时返回 0 而不是抛异常
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeNewFromEncodedNodeTree(
    mut env: JNIEnv,
    _class: JClass,
    encoded: JString,
) -> jlong {
    (|| -> JniResult<jlong> {
        let encoded = get_string(&mut env, &encoded)?;
        match FastNoise::from_encoded_node_tree(&encoded) {
            Ok(node) => Ok(into_handle(node)),
            Err(FastNoiseError::InvalidNodeTree(tree)) => {
                debug!("Rejected encoded node tree: {}", tree);
                Ok(0)
            },
            Err(e) => Err(e.into()),
        }
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeDelete(_env: JNIEnv, _class: JClass, handle: jlong) {
    unsafe { release_handle(handle) }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGetSIMDLevel(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jint {
    (|| -> JniResult<jint> {
        let node = unsafe { node_ref(handle)? };
        Ok(node.simd_level_bits() as jint)
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGetMetadataName(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jstring {
    (|| -> JniResult<jstring> {
        let node = unsafe { node_ref(handle)? };
        Ok(env.new_string(node.metadata_name())?.into_raw())
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeSetFloat(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    member: JString,
    value: jfloat,
) {
    (|| -> JniResult<()> {
        let member = get_string(&mut env, &member)?;
        unsafe { node_mut(handle)? }.set_float(&member, value)?;
        Ok(())
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeSetInt(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    member: JString,
    value: jint,
) {
    (|| -> JniResult<()> {
        let member = get_string(&mut env, &member)?;
        unsafe { node_mut(handle)? }.set_int(&member, value)?;
        Ok(())
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeSetEnum(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    member: JString,
    value: JString,
) {
    (|| -> JniResult<()> {
        let member = get_string(&mut env, &member)?;
        let value = get_string(&mut env, &value)?;
        unsafe { node_mut(handle)? }.set_enum(&member, &value)?;
        Ok(())
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeSetNodeLookup(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    member: JString,
    lookup_handle: jlong,
) {
    (|| -> JniResult<()> {
        check_distinct_handles(handle, lookup_handle)?;
        let member = get_string(&mut env, &member)?;
        let lookup = unsafe { node_ref(lookup_handle)? };
        unsafe { node_mut(handle)? }.set_node(&member, lookup)?;
        Ok(())
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGenUniformGrid2D(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    noise_out: JFloatArray,
    x_start: jint,
    y_start: jint,
    x_size: jint,
    y_size: jint,
    frequency: jfloat,
    seed: jint,
) -> jfloatArray {
    (|| -> JniResult<jfloatArray> {
        let node = unsafe { node_ref(handle)? };
        gen_into_array(&mut env, &noise_out, |out| {
            node.gen_uniform_grid_2d(out, x_start, y_start, x_size, y_size, frequency, seed)
        })
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGenUniformGrid3D(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    noise_out: JFloatArray,
    x_start: jint,
    y_start: jint,
    z_start: jint,
    x_size: jint,
    y_size: jint,
    z_size: jint,
    frequency: jfloat,
    seed: jint,
) -> jfloatArray {
    (|| -> JniResult<jfloatArray> {
        let node = unsafe { node_ref(handle)? };
        gen_into_array(&mut env, &noise_out, |out| {
            node.gen_uniform_grid_3d(out, x_start, y_start, z_start, x_size, y_size, z_size, frequency, seed)
        })
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGenUniformGrid4D(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    noise_out: JFloatArray,
    x_start: jint,
    y_start: jint,
    z_start: jint,
    w_start: jint,
    x_size: jint,
    y_size: jint,
    z_size: jint,
    w_size: jint,
    frequency: jfloat,
    seed: jint,
) -> jfloatArray {
    (|| -> JniResult<jfloatArray> {
        let node = unsafe { node_ref(handle)? };
        gen_into_array(&mut env, &noise_out, |out| {
            node.gen_uniform_grid_4d(
                out, x_start, y_start, z_start, w_start, x_size, y_size, z_size, w_size, frequency, seed,
            )
        })
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGenTileable2D(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    noise_out: JFloatArray,
    x_size: jint,
    y_size: jint,
    frequency: jfloat,
    seed: jint,
) -> jfloatArray {
    (|| -> JniResult<jfloatArray> {
        let node = unsafe { node_ref(handle)? };
        gen_into_array(&mut env, &noise_out, |out| {
            node.gen_tileable_2d(out, x_size, y_size, frequency, seed)
        })
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGenPositionArray2D(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    noise_out: JFloatArray,
    x_pos: JFloatArray,
    y_pos: JFloatArray,
    x_offset: jfloat,
    y_offset: jfloat,
    seed: jint,
) -> jfloatArray {
    (|| -> JniResult<jfloatArray> {
        let node = unsafe { node_ref(handle)? };
        let xs = read_float_array(&env, &x_pos)?;
        let ys = read_float_array(&env, &y_pos)?;
        gen_into_array(&mut env, &noise_out, |out| {
            node.gen_position_array_2d(out, &xs, &ys, x_offset, y_offset, seed)
        })
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGenPositionArray3D(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    noise_out: JFloatArray,
    x_pos: JFloatArray,
    y_pos: JFloatArray,
    z_pos: JFloatArray,
    x_offset: jfloat,
    y_offset: jfloat,
    z_offset: jfloat,
    seed: jint,
) -> jfloatArray {
    (|| -> JniResult<jfloatArray> {
        let node = unsafe { node_ref(handle)? };
        let xs = read_float_array(&env, &x_pos)?;
        let ys = read_float_array(&env, &y_pos)?;
        let zs = read_float_array(&env, &z_pos)?;
        gen_into_array(&mut env, &noise_out, |out| {
            node.gen_position_array_3d(out, &xs, &ys, &zs, x_offset, y_offset, z_offset, seed)
        })
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGenPositionArray4D(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    noise_out: JFloatArray,
    x_pos: JFloatArray,
    y_pos: JFloatArray,
    z_pos: JFloatArray,
    w_pos: JFloatArray,
    x_offset: jfloat,
    y_offset: jfloat,
    z_offset: jfloat,
    w_offset: jfloat,
    seed: jint,
) -> jfloatArray {
    (|| -> JniResult<jfloatArray> {
        let node = unsafe { node_ref(handle)? };
        let xs = read_float_array(&env, &x_pos)?;
        let ys = read_float_array(&env, &y_pos)?;
        let zs = read_float_array(&env, &z_pos)?;
        let ws = read_float_array(&env, &w_pos)?;
        gen_into_array(&mut env, &noise_out, |out| {
            node.gen_position_array_4d(out, &xs, &ys, &zs, &ws, x_offset, y_offset, z_offset, w_offset, seed)
        })
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGenSingle2D(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    x: jfloat,
    y: jfloat,
    seed: jint,
) -> jfloat {
    (|| -> JniResult<jfloat> { Ok(unsafe { node_ref(handle)? }.gen_single_2d(x, y, seed)) })().or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGenSingle3D(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    x: jfloat,
    y: jfloat,
    z: jfloat,
    seed: jint,
) -> jfloat {
    (|| -> JniResult<jfloat> { Ok(unsafe { node_ref(handle)? }.gen_single_3d(x, y, z, seed)) })().or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGenSingle4D(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    x: jfloat,
    y: jfloat,
    z: jfloat,
    w: jfloat,
    seed: jint,
) -> jfloat {
    (|| -> JniResult<jfloat> { Ok(unsafe { node_ref(handle)? }.gen_single_4d(x, y, z, w, seed)) })()
        .or_throw(&mut env)
}
