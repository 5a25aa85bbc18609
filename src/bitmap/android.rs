use std::marker::PhantomData;

use jni::{objects::JObject, sys, JNIEnv};
use ndk_sys as ffi;

use super::{Bitmap, BitmapInfo};
use crate::error::{Error, Result};
use crate::image::ImageBuffer;

/// An `android.graphics.Bitmap` reached through `libjnigraphics`.
pub struct AndroidBitmap<'a> {
    env: *mut sys::JNIEnv,
    bitmap: sys::jobject,
    _borrow: PhantomData<&'a ()>,
}

impl<'a> AndroidBitmap<'a> {
    pub fn new(env: &'a JNIEnv, bitmap: &'a JObject) -> Self {
        AndroidBitmap {
            env: env.get_raw(),
            bitmap: bitmap.as_raw(),
            _borrow: PhantomData,
        }
    }
}

// Safety: `AndroidBitmap_lockPixels` pins the pixel buffer, which holds
// `stride * height` bytes, until `AndroidBitmap_unlockPixels`.
unsafe impl Bitmap for AndroidBitmap<'_> {
    fn info(&self) -> Result<BitmapInfo> {
        let mut info: ffi::AndroidBitmapInfo = unsafe { std::mem::zeroed() };
        let ret = unsafe { ffi::AndroidBitmap_getInfo(self.env.cast(), self.bitmap.cast(), &mut info) };
        if ret < 0 {
            return Err(Error::BitmapInfo(ret));
        }
        Ok(BitmapInfo {
            width: info.width,
            height: info.height,
            stride: info.stride,
            format: info.format as i32,
        })
    }

    fn lock_pixels(&self) -> Result<*const u8> {
        let mut pixels: *mut libc::c_void = std::ptr::null_mut();
        let ret = unsafe { ffi::AndroidBitmap_lockPixels(self.env.cast(), self.bitmap.cast(), &mut pixels) };
        if ret < 0 {
            return Err(Error::LockPixels(ret));
        }
        Ok(pixels as *const u8)
    }

    fn unlock_pixels(&self) -> Result<()> {
        let ret = unsafe { ffi::AndroidBitmap_unlockPixels(self.env.cast(), self.bitmap.cast()) };
        if ret < 0 {
            return Err(Error::LockPixels(ret));
        }
        Ok(())
    }
}

/// Converts a Java `Bitmap` into an RGBA image. See [`super::try_bitmap_to_image`].
pub fn jbitmap_to_image(env: &JNIEnv, bitmap: &JObject, dst: &mut ImageBuffer) -> Result<()> {
    super::try_bitmap_to_image(&AndroidBitmap::new(env, bitmap), dst)
}

#[cfg(feature = "opencv")]
pub fn jbitmap_to_mat(env: &JNIEnv, bitmap: &JObject, dst: &mut opencv::core::Mat) -> Result<()> {
    super::cv::try_bitmap_to_mat(&AndroidBitmap::new(env, bitmap), dst)
}
