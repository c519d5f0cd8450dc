// export.rs - Frame buffers -> PNG files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;

/// Write one RGBA frame as `<dir>/<prefix>_<frame>.png`
pub fn write_png(dir: &Path, prefix: &str, frame: u32, w: u32, h: u32, rgba: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let img = RgbaImage::from_raw(w, h, rgba.to_vec()).context("pixel buffer does not match frame size")?;
    let path = dir.join(format!("{prefix}_{frame:04}.png"));
    img.save(&path).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
