#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("JNI call failed: {0}")]
    Jni(#[from] jni::errors::Error),

    #[error("Java string is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("buffer of {0} elements does not fit in a Java array")]
    ArrayTooLong(usize),

    #[error("cannot query bitmap info (result {0})")]
    BitmapInfo(i32),

    #[error("unsupported bitmap pixel format {0}")]
    UnsupportedFormat(i32),

    #[error("invalid bitmap geometry: width {width}, height {height}, stride {stride}")]
    InvalidGeometry { width: u32, height: u32, stride: u32 },

    #[error("cannot lock bitmap pixels (result {0})")]
    LockPixels(i32),

    #[error("bitmap pixel buffer is null")]
    NullPixels,

    #[error("pixel buffer holds {actual} bytes, {expected} required")]
    BufferTooSmall { expected: usize, actual: usize },

    #[cfg(feature = "opencv")]
    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
