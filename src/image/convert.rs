use super::*;

/// Expands an RGB565 image into an RGBA image of the same size.
///
/// Low bits of each channel are left zero and alpha is 0xff, which is what
/// OpenCV's `COLOR_BGR5652RGBA` produces for Android `RGB_565` pixels.
pub fn rgb565_to_rgba(src: &impl ConstImage, dst: &mut impl Image) {
    assert_eq!(src.format(), ImageFormat::Rgb565);
    assert_eq!(dst.format(), ImageFormat::Rgba);
    assert_eq!(src.size(), dst.size());

    for y in 0..src.height() {
        let src_row = src.row(y);
        let dst_row = dst.mut_row(y);
        for (px, out) in src_row.chunks_exact(2).zip(dst_row.chunks_exact_mut(4)) {
            let v = u16::from_le_bytes([px[0], px[1]]);
            out[0] = ((v >> 8) & 0xf8) as u8;
            out[1] = ((v >> 3) & 0xfc) as u8;
            out[2] = ((v << 3) & 0xf8) as u8;
            out[3] = 0xff;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries() {
        let data: Vec<u8> = [0xf800u16, 0x07e0, 0x001f, 0xffff]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let src = ConstImageView::new(ImageFormat::Rgb565, &data, 2, 2, None);
        let mut dst = ImageBuffer::new(ImageFormat::Rgba, 2, 2);
        rgb565_to_rgba(&src, &mut dst);

        assert_eq!(dst.row(0), &[0xf8, 0, 0, 0xff, 0, 0xfc, 0, 0xff]);
        assert_eq!(dst.row(1), &[0, 0, 0xf8, 0xff, 0xf8, 0xfc, 0xf8, 0xff]);
    }

    #[test]
    fn test_padded_source_rows() {
        // one pixel per row, two bytes of padding
        let data = [0x00, 0xf8, 0xaa, 0xaa, 0x1f, 0x00];
        let src = ConstImageView::new(ImageFormat::Rgb565, &data, 1, 2, Some(4));
        let mut dst = ImageBuffer::new(ImageFormat::Rgba, 1, 2);
        rgb565_to_rgba(&src, &mut dst);
        assert_eq!(dst.data(), &[0xf8, 0, 0, 0xff, 0, 0, 0xf8, 0xff]);
    }
}
