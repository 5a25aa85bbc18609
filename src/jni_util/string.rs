use jni::{
    objects::{JByteArray, JString, JValue, ReleaseMode},
    JNIEnv,
};

use super::array::slice_to_java_array;
use crate::error::Result;

const UTF8_CHARSET: &str = "UTF-8";

/// Encodes a Java string as UTF-8 bytes.
///
/// Java strings are UTF-16; the encoding is done by the VM itself through
/// `String.getBytes("UTF-8")`. A null reference yields an empty buffer.
pub fn jstring_to_utf8_bytes(env: &mut JNIEnv, jstr: &JString) -> Result<Vec<u8>> {
    if jstr.is_null() {
        return Ok(Vec::new());
    }

    let charset = env.new_string(UTF8_CHARSET)?;
    let charset = env.auto_local(charset);
    let bytes = env
        .call_method(jstr, "getBytes", "(Ljava/lang/String;)[B", &[JValue::Object(&charset)])?
        .l()?;
    let bytes = env.auto_local(JByteArray::from(bytes));

    let len = env.get_array_length(&*bytes)? as usize;
    if len == 0 {
        return Ok(Vec::new());
    }
    // Safety: read-only view, released before `bytes` is deleted.
    let elements = unsafe { env.get_array_elements(&*bytes, ReleaseMode::NoCopyBack)? };
    Ok(elements[..len].iter().map(|&b| b as u8).collect())
}

/// Like [`jstring_to_utf8_bytes`], returning an owned `String`.
pub fn jstring_to_string(env: &mut JNIEnv, jstr: &JString) -> Result<String> {
    let bytes = jstring_to_utf8_bytes(env, jstr)?;
    Ok(String::from_utf8(bytes)?)
}

/// Builds a new Java string from UTF-8 bytes with `new String(byte[], "UTF-8")`.
pub fn utf8_bytes_to_jstring<'local>(env: &mut JNIEnv<'local>, bytes: &[u8]) -> Result<JString<'local>> {
    // Safety: u8 and i8 share size and alignment.
    let jbytes = unsafe { &*(bytes as *const [u8] as *const [i8]) };
    let array = slice_to_java_array(env, jbytes)?;
    let array = env.auto_local(array);
    let charset = env.new_string(UTF8_CHARSET)?;
    let charset = env.auto_local(charset);

    let obj = env.new_object(
        "java/lang/String",
        "([BLjava/lang/String;)V",
        &[JValue::Object(&array), JValue::Object(&charset)],
    )?;
    Ok(JString::from(obj))
}

pub fn str_to_jstring<'local>(env: &mut JNIEnv<'local>, s: &str) -> Result<JString<'local>> {
    utf8_bytes_to_jstring(env, s.as_bytes())
}
