use jni::{
    objects::{
        JByteArray, JFloatArray, JIntArray, JLongArray, JPrimitiveArray, ReleaseMode, TypeArray,
    },
    sys::{jbyte, jfloat, jint, jlong, jsize},
    JNIEnv,
};

use crate::error::{Error, Result};

/// Primitive element types that can be copied in and out of Java arrays.
pub trait ArrayElement: TypeArray + Copy {
    fn new_array<'local>(env: &mut JNIEnv<'local>, len: jsize) -> Result<JPrimitiveArray<'local, Self>>;
    fn set_region(env: &mut JNIEnv, array: &JPrimitiveArray<Self>, buf: &[Self]) -> Result<()>;
}

macro_rules! impl_array_element {
    ($elem:ty, $new:ident, $set:ident) => {
        impl ArrayElement for $elem {
            fn new_array<'local>(
                env: &mut JNIEnv<'local>,
                len: jsize,
            ) -> Result<JPrimitiveArray<'local, Self>> {
                Ok(env.$new(len)?)
            }

            fn set_region(env: &mut JNIEnv, array: &JPrimitiveArray<Self>, buf: &[Self]) -> Result<()> {
                Ok(env.$set(array, 0, buf)?)
            }
        }
    };
}

impl_array_element!(jfloat, new_float_array, set_float_array_region);
impl_array_element!(jint, new_int_array, set_int_array_region);
impl_array_element!(jbyte, new_byte_array, set_byte_array_region);
impl_array_element!(jlong, new_long_array, set_long_array_region);

/// Allocates a Java array of `buf.len()` elements and fills it in one region copy.
pub fn slice_to_java_array<'local, T: ArrayElement>(
    env: &mut JNIEnv<'local>,
    buf: &[T],
) -> Result<JPrimitiveArray<'local, T>> {
    let len = jsize::try_from(buf.len()).map_err(|_| Error::ArrayTooLong(buf.len()))?;
    let array = T::new_array(env, len)?;
    T::set_region(env, &array, buf)?;
    Ok(array)
}

/// Copies the elements of a Java array into a new `Vec`.
///
/// The elements are read through a temporary view that is released without
/// copying anything back to the VM.
pub fn java_array_to_vec<T: ArrayElement>(env: &mut JNIEnv, array: &JPrimitiveArray<T>) -> Result<Vec<T>> {
    let len = env.get_array_length(array)? as usize;
    if len == 0 {
        return Ok(Vec::new());
    }
    // Safety: the view is only read, and `array` is not touched through
    // another path while it is alive.
    let elements = unsafe { env.get_array_elements(array, ReleaseMode::NoCopyBack)? };
    Ok(elements[..len].to_vec())
}

pub fn float_slice_to_jfloatarray<'local>(env: &mut JNIEnv<'local>, buf: &[f32]) -> Result<JFloatArray<'local>> {
    slice_to_java_array(env, buf)
}

pub fn jfloatarray_to_float_vec(env: &mut JNIEnv, array: &JFloatArray) -> Result<Vec<f32>> {
    java_array_to_vec(env, array)
}

pub fn int_slice_to_jintarray<'local>(env: &mut JNIEnv<'local>, buf: &[i32]) -> Result<JIntArray<'local>> {
    slice_to_java_array(env, buf)
}

pub fn jintarray_to_int_vec(env: &mut JNIEnv, array: &JIntArray) -> Result<Vec<i32>> {
    java_array_to_vec(env, array)
}

pub fn byte_slice_to_jbytearray<'local>(env: &mut JNIEnv<'local>, buf: &[i8]) -> Result<JByteArray<'local>> {
    slice_to_java_array(env, buf)
}

pub fn jbytearray_to_byte_vec(env: &mut JNIEnv, array: &JByteArray) -> Result<Vec<i8>> {
    java_array_to_vec(env, array)
}

/// Copies 64-bit integers into a new Java `long[]`.
///
/// `jlong` and `i64` are distinct names for the same width; the values are
/// moved element by element into a `jlong` staging buffer so the
/// conversion stays explicit if either side ever changes.
pub fn int64_slice_to_jlongarray<'local>(env: &mut JNIEnv<'local>, buf: &[i64]) -> Result<JLongArray<'local>> {
    let staged: Vec<jlong> = buf.iter().map(|&v| jlong::from(v)).collect();
    slice_to_java_array(env, &staged)
}

pub fn jlongarray_to_int64_vec(env: &mut JNIEnv, array: &JLongArray) -> Result<Vec<i64>> {
    let staged = java_array_to_vec(env, array)?;
    Ok(staged.into_iter().map(i64::from).collect())
}

#[cfg(all(test, feature = "jvm-tests"))]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_float_round_trip() {
        let mut env = test_utils::attach();
        let input = [0.0f32, -1.5, f32::MAX, f32::MIN_POSITIVE, 3.25];
        let array = float_slice_to_jfloatarray(&mut env, &input).unwrap();
        assert_eq!(env.get_array_length(&array).unwrap(), 5);
        assert_eq!(jfloatarray_to_float_vec(&mut env, &array).unwrap(), input);
    }

    #[test]
    fn test_int_round_trip() {
        let mut env = test_utils::attach();
        let input = [i32::MIN, -1, 0, 1, i32::MAX];
        let array = int_slice_to_jintarray(&mut env, &input).unwrap();
        assert_eq!(jintarray_to_int_vec(&mut env, &array).unwrap(), input);
    }

    #[test]
    fn test_byte_round_trip() {
        let mut env = test_utils::attach();
        let input = [i8::MIN, -1, 0, 1, i8::MAX];
        let array = byte_slice_to_jbytearray(&mut env, &input).unwrap();

        let mut bytes = [0i8; 5];
        env.get_byte_array_region(&array, 0, &mut bytes).unwrap();
        assert_eq!(bytes, input);
        assert_eq!(jbytearray_to_byte_vec(&mut env, &array).unwrap(), input);
    }

    #[test]
    fn test_long_round_trip() {
        let mut env = test_utils::attach();
        let input = vec![i64::MIN, -42, 0, 1 << 40, i64::MAX];
        let array = int64_slice_to_jlongarray(&mut env, &input).unwrap();
        assert_eq!(jlongarray_to_int64_vec(&mut env, &array).unwrap(), input);
    }

    #[test]
    fn test_empty_array() {
        let mut env = test_utils::attach();
        let array = float_slice_to_jfloatarray(&mut env, &[]).unwrap();
        assert_eq!(env.get_array_length(&array).unwrap(), 0);
        assert!(jfloatarray_to_float_vec(&mut env, &array).unwrap().is_empty());
    }

    #[test]
    fn test_java_filled_array() {
        let mut env = test_utils::attach();
        let array = env.new_int_array(3).unwrap();
        env.set_int_array_region(&array, 0, &[7, 8, 9]).unwrap();
        assert_eq!(jintarray_to_int_vec(&mut env, &array).unwrap(), vec![7, 8, 9]);
    }
}
