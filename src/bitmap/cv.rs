use log::debug;
use opencv as cv;
use opencv::prelude::*;

use super::{Bitmap, PixelFormat, PixelLock};
use crate::error::Result;
use crate::image::{cv_adapter, ConstImageView};

/// Converts `bitmap` into a `CV_8UC4` RGBA `Mat`, created in place in `dst`.
pub fn try_bitmap_to_mat<B: Bitmap + ?Sized>(bitmap: &B, dst: &mut cv::core::Mat) -> Result<()> {
    let info = bitmap.info()?;
    let geometry = info.geometry()?;

    let lock = PixelLock::acquire(bitmap, &info)?;
    // create leaves the pixels uninitialized; every one is written below
    unsafe { dst.create_rows_cols(geometry.height, geometry.width, cv::core::CV_8UC4)? };

    let src = ConstImageView::new(
        geometry.format.image_format(),
        lock.data(),
        geometry.width,
        geometry.height,
        Some(geometry.stride),
    );
    let tmp = unsafe { cv_adapter::cvmat_borrowing(&src)? };
    match geometry.format {
        PixelFormat::Rgba8888 => {
            debug!("bitmap_to_mat: RGBA_8888 -> CV_8UC4");
            tmp.copy_to(dst)?;
        }
        PixelFormat::Rgb565 => {
            debug!("bitmap_to_mat: RGB_565 -> CV_8UC4");
            cv::imgproc::cvt_color(&tmp, dst, cv::imgproc::COLOR_BGR5652RGBA, 0)?;
        }
    }
    Ok(())
}

/// Panicking variant of [`try_bitmap_to_mat`], see [`super::bitmap_to_image`].
pub fn bitmap_to_mat<B: Bitmap + ?Sized>(bitmap: &B, dst: &mut cv::core::Mat) {
    if let Err(err) = try_bitmap_to_mat(bitmap, dst) {
        panic!("bitmap to mat conversion failed: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::{try_bitmap_to_image, MemoryBitmap};
    use crate::image::{ConstImage, ImageBuffer};

    #[test]
    fn test_rgba_2x2() {
        let pixels: Vec<u8> = (1..=16).collect();
        let bitmap = MemoryBitmap::new(PixelFormat::Rgba8888, 2, 2, pixels.clone()).unwrap();
        let mut m = cv::core::Mat::default();

        try_bitmap_to_mat(&bitmap, &mut m).unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 2));
        assert_eq!(m.typ(), cv::core::CV_8UC4);
        assert_eq!(m.data_bytes().unwrap(), pixels.as_slice());
        assert!(!bitmap.is_locked());
    }

    #[test]
    fn test_rgb565_matches_image_path() {
        let pixels: Vec<u8> = (0..64u16).flat_map(|i| (i.wrapping_mul(0x1357)).to_le_bytes()).collect();
        let bitmap = MemoryBitmap::new(PixelFormat::Rgb565, 8, 8, pixels).unwrap();

        let mut m = cv::core::Mat::default();
        try_bitmap_to_mat(&bitmap, &mut m).unwrap();
        let mut img = ImageBuffer::default();
        try_bitmap_to_image(&bitmap, &mut img).unwrap();

        let view = cv_adapter::cvmat_image_view(&m).unwrap();
        assert_eq!(view.size(), img.size());
        assert_eq!(view.data(), img.data());
        assert!(view.data().chunks_exact(4).all(|px| px[3] == 0xff));
    }

    #[test]
    #[should_panic(expected = "unsupported bitmap pixel format")]
    fn test_unsupported_format_is_fatal() {
        let bitmap = MemoryBitmap::with_stride(9, 1, 1, 8, vec![0; 8]).unwrap();
        bitmap_to_mat(&bitmap, &mut cv::core::Mat::default());
    }
}
