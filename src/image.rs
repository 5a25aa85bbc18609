#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl<T> From<(T, T)> for Size
where
    T: Into<i32>,
{
    fn from(value: (T, T)) -> Self {
        Size {
            width: value.0.into(),
            height: value.1.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageFormat {
    Rgba,   // R, G, B, A, 8 bits each
    Rgb565, // packed 16 bit, little endian, red in the high bits
}

impl ImageFormat {
    pub fn bpp(&self) -> i32 {
        match self {
            Self::Rgba => 32,
            Self::Rgb565 => 16,
        }
    }

    pub fn channels(&self) -> i32 {
        match self {
            Self::Rgba => 4,
            Self::Rgb565 => 2,
        }
    }
}

fn minimum_pitch(bpp: i32, width: i32) -> i32 {
    (width * bpp + 7) / 8
}

fn required_len(pitch: i32, width: i32, height: i32, bpp: i32) -> usize {
    if height == 0 {
        return 0;
    }
    ((height - 1) * pitch + minimum_pitch(bpp, width)) as usize
}

#[derive(Clone, Copy, Debug)]
pub struct ImageHeader {
    format: ImageFormat,
    width: i32,
    pitch: i32,
    height: i32,
}

impl ImageHeader {
    pub fn new(format: ImageFormat, data_len: usize, width: i32, height: i32, pitch: Option<i32>) -> Self {
        let minimum_pitch = minimum_pitch(format.bpp(), width);
        let pitch = pitch.unwrap_or(minimum_pitch);
        assert!(
            pitch >= minimum_pitch,
            "invalid pitch {} for width {} with format {:?}",
            pitch,
            width,
            format
        );
        assert!(
            width > 0 && height > 0,
            "invalid width {} and height {}",
            width,
            height
        );
        assert!(
            data_len >= required_len(pitch, width, height, format.bpp()),
            "invalid data len {} for height {} and pitch {}",
            data_len,
            height,
            pitch
        );
        ImageHeader {
            format,
            width,
            pitch,
            height,
        }
    }

    fn empty(format: ImageFormat) -> Self {
        ImageHeader {
            format,
            width: 0,
            pitch: 0,
            height: 0,
        }
    }
}

pub trait HasImageHeader {
    fn header(&self) -> ImageHeader;
}

pub trait ConstImage: HasImageHeader {
    fn data(&self) -> &[u8];

    fn bpp(&self) -> i32 {
        self.header().format.bpp()
    }
    fn format(&self) -> ImageFormat {
        self.header().format
    }
    fn width(&self) -> i32 {
        self.header().width
    }
    fn height(&self) -> i32 {
        self.header().height
    }
    fn pitch(&self) -> i32 {
        self.header().pitch
    }
    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
    fn is_continuous(&self) -> bool {
        self.pitch() == minimum_pitch(self.bpp(), self.width())
    }
    fn size(&self) -> Size {
        (self.width(), self.height()).into()
    }
    fn ptr(&self, row: i32) -> *const u8 {
        self.data()[((row * self.pitch()) as usize)..].as_ptr()
    }
    /// Pixel bytes of one row, without the pitch padding.
    fn row(&self, row: i32) -> &[u8] {
        let offset = (row * self.pitch()) as usize;
        let len = minimum_pitch(self.bpp(), self.width()) as usize;
        &self.data()[offset..offset + len]
    }
}

pub trait Image: ConstImage {
    fn mut_data(&mut self) -> &mut [u8];

    fn mut_row(&mut self, row: i32) -> &mut [u8] {
        let offset = (row * self.pitch()) as usize;
        let len = minimum_pitch(self.bpp(), self.width()) as usize;
        &mut self.mut_data()[offset..offset + len]
    }
    fn copy_from<T: ConstImage + ?Sized>(&mut self, src: &T) {
        assert_eq!(self.size(), src.size());
        assert_eq!(self.format(), src.format());
        for y in 0..self.height() {
            self.mut_row(y).copy_from_slice(src.row(y));
        }
    }
}

pub struct ConstImageView<'a> {
    header: ImageHeader,
    data: &'a [u8],
}

impl<'a> ConstImageView<'a> {
    pub fn new(format: ImageFormat, data: &'a [u8], width: i32, height: i32, pitch: Option<i32>) -> Self {
        let header = ImageHeader::new(format, data.len(), width, height, pitch);
        ConstImageView { header, data }
    }
}

impl<'a> HasImageHeader for ConstImageView<'a> {
    fn header(&self) -> ImageHeader {
        self.header
    }
}

impl<'a> ConstImage for ConstImageView<'a> {
    fn data(&self) -> &[u8] {
        self.data
    }
}

/// Owned, continuous image. The default value is empty, like a default `cv::Mat`.
pub struct ImageBuffer {
    data: Vec<u8>,
    header: ImageHeader,
}

impl ImageBuffer {
    pub fn new(format: ImageFormat, width: i32, height: i32) -> Self {
        let pitch = minimum_pitch(format.bpp(), width);
        let data = vec![0; (pitch * height) as usize];
        let header = ImageHeader::new(format, data.len(), width, height, Some(pitch));
        Self { data, header }
    }

    /// Makes `self` a continuous `width` x `height` image of `format`.
    ///
    /// The storage is kept when the geometry already matches, so repeated
    /// conversions into the same buffer do not reallocate.
    pub fn create(&mut self, format: ImageFormat, width: i32, height: i32) {
        if self.format() == format && self.size() == (width, height).into() && !self.is_empty() {
            return;
        }
        *self = ImageBuffer::new(format, width, height);
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl Default for ImageBuffer {
    fn default() -> Self {
        ImageBuffer {
            data: Vec::new(),
            header: ImageHeader::empty(ImageFormat::Rgba),
        }
    }
}

impl HasImageHeader for ImageBuffer {
    fn header(&self) -> ImageHeader {
        self.header
    }
}

impl ConstImage for ImageBuffer {
    fn data(&self) -> &[u8] {
        self.data.as_slice()
    }
}

impl Image for ImageBuffer {
    fn mut_data(&mut self) -> &mut [u8] {
        self.data.as_mut_slice()
    }
}

pub mod convert;

#[cfg(feature = "opencv")]
pub mod cv_adapter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strided_view() {
        let data: Vec<u8> = (0..20).collect();
        // 2x2 RGB565 with 6 bytes of padding after the first row
        let view = ConstImageView::new(ImageFormat::Rgb565, &data[..14], 2, 2, Some(10));
        assert_eq!(view.pitch(), 10);
        assert!(!view.is_continuous());
        assert_eq!(view.row(0), &[0, 1, 2, 3]);
        assert_eq!(view.row(1), &[10, 11, 12, 13]);
    }

    #[test]
    fn test_create_reuses_storage() {
        let mut buf = ImageBuffer::default();
        assert!(buf.is_empty());

        buf.create(ImageFormat::Rgba, 3, 2);
        assert_eq!(buf.size(), (3, 2).into());
        assert_eq!(buf.pitch(), 12);
        assert_eq!(buf.data().len(), 24);

        buf.mut_row(1)[0] = 42;
        let ptr = buf.ptr(0);
        buf.create(ImageFormat::Rgba, 3, 2);
        assert_eq!(buf.ptr(0), ptr);
        assert_eq!(buf.row(1)[0], 42);

        buf.create(ImageFormat::Rgba, 2, 2);
        assert_eq!(buf.data().len(), 16);
    }

    #[test]
    fn test_copy_from_drops_padding() {
        let data: Vec<u8> = (0..24).collect();
        let src = ConstImageView::new(ImageFormat::Rgba, &data, 2, 2, Some(12));
        let mut dst = ImageBuffer::new(ImageFormat::Rgba, 2, 2);
        dst.copy_from(&src);
        assert!(dst.is_continuous());
        assert_eq!(dst.row(0), &data[0..8]);
        assert_eq!(dst.row(1), &data[12..20]);
    }

    #[test]
    #[should_panic(expected = "invalid pitch")]
    fn test_pitch_too_small() {
        let data = [0u8; 16];
        ConstImageView::new(ImageFormat::Rgba, &data, 2, 2, Some(4));
    }
}
