use opencv as cv;
use opencv::prelude::*;

use super::*;

fn cv_type(format: ImageFormat) -> i32 {
    match format {
        ImageFormat::Rgba => cv::core::CV_8UC4,
        ImageFormat::Rgb565 => cv::core::CV_8UC2,
    }
}

pub fn cvmat_image_view(m: &cv::core::Mat) -> cv::Result<ConstImageView> {
    let format = match m.typ() {
        cv::core::CV_8UC4 => ImageFormat::Rgba,
        cv::core::CV_8UC2 => ImageFormat::Rgb565,
        typ => {
            return Err(cv::Error::new(
                cv::core::StsUnsupportedFormat,
                format!("unsupported mat type {}", typ),
            ))
        }
    };
    if !m.is_continuous() {
        return Err(cv::Error::new(
            cv::core::StsBadArg,
            "mat is not continuous".to_string(),
        ));
    }
    let data = m.data_bytes()?;
    Ok(ConstImageView::new(format, data, m.cols(), m.rows(), None))
}

/// Wraps the pixels of `img` in a `Mat` header without copying.
///
/// # Safety
///
/// The returned `Mat` borrows `img`'s storage; it must be dropped before `img`
/// is and must not be written through.
pub unsafe fn cvmat_borrowing(img: &impl ConstImage) -> cv::Result<cv::core::Mat> {
    cv::core::Mat::new_rows_cols_with_data(
        img.height(),
        img.width(),
        cv_type(img.format()),
        img.ptr(0) as *mut libc::c_void,
        img.pitch() as usize,
    )
}

pub fn cvmat_from_image(img: &impl ConstImage) -> cv::Result<cv::core::Mat> {
    let mut m = cv::core::Mat::default();
    unsafe { cvmat_borrowing(img)? }.copy_to(&mut m)?;
    Ok(m)
}
