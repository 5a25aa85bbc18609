use std::path::PathBuf;

use clap::Parser;
use log::info;

use jnimarshal::bitmap::{self, MemoryBitmap, PixelFormat};
use jnimarshal::image::{ConstImage, ImageBuffer};

/// Convert a raw Android bitmap dump into 8-bit RGBA.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    #[arg(long, value_enum, default_value_t = PixelFormat::Rgba8888)]
    format: PixelFormat,

    /// Row stride in bytes, defaults to width * bytes per pixel
    #[arg(long)]
    stride: Option<u32>,

    /// Raw pixel file, as returned by AndroidBitmap_lockPixels
    input: PathBuf,

    /// Raw RGBA output; png, jpg and bmp are encoded when built with opencv
    output: PathBuf,
}

#[cfg(feature = "opencv")]
fn write_encoded(bitmap: &MemoryBitmap, output: &std::path::Path) -> anyhow::Result<bool> {
    use opencv as cv;
    use opencv::prelude::*;

    let ext = output.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !matches!(ext, "png" | "jpg" | "jpeg" | "bmp") {
        return Ok(false);
    }

    let mut rgba = cv::core::Mat::default();
    bitmap::cv::try_bitmap_to_mat(bitmap, &mut rgba)?;
    let mut bgra = cv::core::Mat::default();
    cv::imgproc::cvt_color(&rgba, &mut bgra, cv::imgproc::COLOR_RGBA2BGRA, 0)?;
    let path = output.to_string_lossy();
    if !cv::imgcodecs::imwrite(&path, &bgra, &cv::core::Vector::new())? {
        anyhow::bail!("Cannot encode {}", path);
    }
    info!("Wrote {}x{} image to {}", rgba.cols(), rgba.rows(), path);
    Ok(true)
}

#[cfg(not(feature = "opencv"))]
fn write_encoded(_: &MemoryBitmap, _: &std::path::Path) -> anyhow::Result<bool> {
    Ok(false)
}

fn main() -> anyhow::Result<()> {
    jnimarshal::logging::init();
    let args = Args::parse();

    let pixels = std::fs::read(&args.input)?;
    let stride = match args.stride {
        Some(stride) => stride,
        None => args
            .width
            .checked_mul(args.format.bytes_per_pixel())
            .ok_or_else(|| anyhow::anyhow!("Width {} is too large", args.width))?,
    };
    let bitmap = MemoryBitmap::with_stride(
        args.format.android_code(),
        args.width,
        args.height,
        stride,
        pixels,
    )?;

    if write_encoded(&bitmap, &args.output)? {
        return Ok(());
    }

    let mut img = ImageBuffer::default();
    bitmap::try_bitmap_to_image(&bitmap, &mut img)?;
    info!("Wrote {}x{} RGBA to {}", img.width(), img.height(), args.output.display());
    std::fs::write(&args.output, img.data())?;
    Ok(())
}
