//! Android bitmap to RGBA image conversion.
//!
//! A [`Bitmap`] hands out its metadata and, while locked, a pointer to its
//! pixels. The conversion functions only ever read the pixels, and the lock is
//! held by a [`PixelLock`] so it is released on every return path.

use std::cell::Cell;

use log::{debug, error, trace};

use crate::error::{Error, Result};
use crate::image::{convert, ConstImageView, Image, ImageBuffer, ImageFormat};

#[cfg(target_os = "android")]
pub mod android;
#[cfg(feature = "opencv")]
pub mod cv;

pub const ANDROID_BITMAP_FORMAT_RGBA_8888: i32 = 1;
pub const ANDROID_BITMAP_FORMAT_RGB_565: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum PixelFormat {
    Rgba8888,
    Rgb565,
}

impl PixelFormat {
    pub fn from_android(code: i32) -> Option<Self> {
        match code {
            ANDROID_BITMAP_FORMAT_RGBA_8888 => Some(Self::Rgba8888),
            ANDROID_BITMAP_FORMAT_RGB_565 => Some(Self::Rgb565),
            _ => None,
        }
    }

    pub fn android_code(&self) -> i32 {
        match self {
            Self::Rgba8888 => ANDROID_BITMAP_FORMAT_RGBA_8888,
            Self::Rgb565 => ANDROID_BITMAP_FORMAT_RGB_565,
        }
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            Self::Rgba8888 => 4,
            Self::Rgb565 => 2,
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            Self::Rgba8888 => ImageFormat::Rgba,
            Self::Rgb565 => ImageFormat::Rgb565,
        }
    }
}

/// Mirrors `AndroidBitmapInfo`; `format` is the raw `ANDROID_BITMAP_FORMAT_*` code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapInfo {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub format: i32,
}

/// Geometry of a bitmap that passed validation, in the image module's units.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Geometry {
    pub format: PixelFormat,
    pub width: i32,
    pub height: i32,
    pub stride: i32,
}

impl BitmapInfo {
    pub fn pixel_format(&self) -> Result<PixelFormat> {
        PixelFormat::from_android(self.format).ok_or(Error::UnsupportedFormat(self.format))
    }

    /// Bytes the locked pixel buffer must span.
    pub fn buffer_len(&self) -> usize {
        (self.stride as usize).saturating_mul(self.height as usize)
    }

    pub(crate) fn geometry(&self) -> Result<Geometry> {
        let format = self.pixel_format()?;
        let invalid = || Error::InvalidGeometry {
            width: self.width,
            height: self.height,
            stride: self.stride,
        };
        let row_len = u64::from(self.width) * u64::from(format.bytes_per_pixel());
        if self.width == 0 || self.height == 0 || u64::from(self.stride) < row_len {
            return Err(invalid());
        }
        // Row bits of the RGBA destination, and both buffer sizes, are computed in i32.
        let fits = |v: Option<u64>| v.map_or(false, |v| v <= i32::MAX as u64);
        let dst_row_len = u64::from(self.width).checked_mul(4);
        if !fits(dst_row_len.and_then(|v| v.checked_mul(8)))
            || !fits(dst_row_len.and_then(|v| v.checked_mul(u64::from(self.height))))
            || !fits(u64::from(self.stride).checked_mul(u64::from(self.height)))
        {
            return Err(invalid());
        }
        Ok(Geometry {
            format,
            width: i32::try_from(self.width).map_err(|_| invalid())?,
            height: i32::try_from(self.height).map_err(|_| invalid())?,
            stride: i32::try_from(self.stride).map_err(|_| invalid())?,
        })
    }
}

/// A pixel source with Android bitmap semantics.
///
/// # Safety
///
/// A non-null pointer returned by `lock_pixels` must stay valid for reads of
/// `info().buffer_len()` bytes until the matching `unlock_pixels`.
pub unsafe trait Bitmap {
    fn info(&self) -> Result<BitmapInfo>;
    fn lock_pixels(&self) -> Result<*const u8>;
    fn unlock_pixels(&self) -> Result<()>;
}

/// Locked pixels of a bitmap. Unlocks on drop.
pub struct PixelLock<'a, B: Bitmap + ?Sized> {
    bitmap: &'a B,
    pixels: *const u8,
    len: usize,
}

impl<'a, B: Bitmap + ?Sized> PixelLock<'a, B> {
    pub fn acquire(bitmap: &'a B, info: &BitmapInfo) -> Result<Self> {
        let pixels = bitmap.lock_pixels()?;
        trace!("Locked bitmap pixels at {:?}", pixels);
        let lock = PixelLock {
            bitmap,
            pixels,
            len: info.buffer_len(),
        };
        if lock.pixels.is_null() {
            return Err(Error::NullPixels);
        }
        Ok(lock)
    }

    pub fn data(&self) -> &[u8] {
        // Safety: non-null and valid for `len` bytes while locked, per `Bitmap`.
        unsafe { std::slice::from_raw_parts(self.pixels, self.len) }
    }
}

impl<'a, B: Bitmap + ?Sized> Drop for PixelLock<'a, B> {
    fn drop(&mut self) {
        trace!("Unlocking bitmap pixels");
        if let Err(err) = self.bitmap.unlock_pixels() {
            error!("Cannot unlock bitmap pixels: {}", err);
        }
    }
}

/// Converts `bitmap` into a `height` x `width` RGBA image stored in `dst`.
///
/// RGBA_8888 pixels are copied as they are; RGB_565 pixels are expanded to
/// 8 bits per channel with an opaque alpha. `dst` is reallocated only when
/// its geometry differs.
pub fn try_bitmap_to_image<B: Bitmap + ?Sized>(bitmap: &B, dst: &mut ImageBuffer) -> Result<()> {
    let info = bitmap.info()?;
    let geometry = info.geometry()?;
    debug!("Converting {}x{} {:?} bitmap (stride {})",
           geometry.width, geometry.height, geometry.format, geometry.stride);

    let lock = PixelLock::acquire(bitmap, &info)?;
    let src = ConstImageView::new(
        geometry.format.image_format(),
        lock.data(),
        geometry.width,
        geometry.height,
        Some(geometry.stride),
    );

    dst.create(ImageFormat::Rgba, geometry.width, geometry.height);
    match geometry.format {
        PixelFormat::Rgba8888 => dst.copy_from(&src),
        PixelFormat::Rgb565 => convert::rgb565_to_rgba(&src, dst),
    }
    Ok(())
}

/// Like [`try_bitmap_to_image`], but any failure is a broken precondition.
///
/// # Panics
///
/// On every error `try_bitmap_to_image` reports. Called from an
/// `extern "system"` JNI entry point this aborts the process.
pub fn bitmap_to_image<B: Bitmap + ?Sized>(bitmap: &B, dst: &mut ImageBuffer) {
    if let Err(err) = try_bitmap_to_image(bitmap, dst) {
        panic!("bitmap to image conversion failed: {}", err);
    }
}

/// Bitmap backed by host memory, for desktop use and tests.
pub struct MemoryBitmap {
    info: BitmapInfo,
    pixels: Vec<u8>,
    lock_depth: Cell<u32>,
}

impl MemoryBitmap {
    /// Continuous bitmap of a supported format.
    pub fn new(format: PixelFormat, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let stride = width
            .checked_mul(format.bytes_per_pixel())
            .ok_or(Error::InvalidGeometry { width, height, stride: 0 })?;
        Self::with_stride(format.android_code(), width, height, stride, pixels)
    }

    /// Bitmap with an explicit row stride and raw format code. The code is
    /// not checked here, so unsupported formats can be represented.
    pub fn with_stride(format: i32, width: u32, height: u32, stride: u32, pixels: Vec<u8>) -> Result<Self> {
        let info = BitmapInfo { width, height, stride, format };
        if pixels.len() < info.buffer_len() {
            return Err(Error::BufferTooSmall {
                expected: info.buffer_len(),
                actual: pixels.len(),
            });
        }
        Ok(MemoryBitmap {
            info,
            pixels,
            lock_depth: Cell::new(0),
        })
    }

    pub fn is_locked(&self) -> bool {
        self.lock_depth.get() > 0
    }
}

unsafe impl Bitmap for MemoryBitmap {
    fn info(&self) -> Result<BitmapInfo> {
        Ok(self.info)
    }

    fn lock_pixels(&self) -> Result<*const u8> {
        self.lock_depth.set(self.lock_depth.get() + 1);
        Ok(self.pixels.as_ptr())
    }

    fn unlock_pixels(&self) -> Result<()> {
        let depth = self.lock_depth.get();
        if depth == 0 {
            return Err(Error::LockPixels(-1));
        }
        self.lock_depth.set(depth - 1);
        Ok(())
    }
}
