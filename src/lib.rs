pub mod bitmap;
pub mod error;
pub mod image;
pub mod jni_util;
pub mod logging;

pub use error::{Error, Result};

#[cfg(all(test, feature = "jvm-tests"))]
mod test_utils;

/// Called by the VM from `System.loadLibrary`.
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn JNI_OnLoad(
    _vm: *mut jni::sys::JavaVM,
    _reserved: *mut libc::c_void,
) -> jni::sys::jint {
    logging::init();
    log::debug!("jnimarshal loaded");
    jni::sys::JNI_VERSION_1_6
}
