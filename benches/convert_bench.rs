use jnimarshal::bitmap::{try_bitmap_to_image, MemoryBitmap, PixelFormat};
use jnimarshal::image::ImageBuffer;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn convert_bench(c: &mut Criterion) {
    c.bench_function("RGB_565 to RGBA, 1k*1k", |b| {
        let bitmap = MemoryBitmap::new(PixelFormat::Rgb565, 1000, 1000, vec![42; 2_000_000]).unwrap();
        let mut dst = ImageBuffer::default();
        b.iter(|| try_bitmap_to_image(black_box(&bitmap), &mut dst).unwrap());
    });

    c.bench_function("RGBA_8888 copy, 1k*1k", |b| {
        let bitmap = MemoryBitmap::new(PixelFormat::Rgba8888, 1000, 1000, vec![42; 4_000_000]).unwrap();
        let mut dst = ImageBuffer::default();
        b.iter(|| try_bitmap_to_image(black_box(&bitmap), &mut dst).unwrap());
    });
}

criterion_group!(benches, convert_bench);
criterion_main!(benches);
