use std::path::Path;

use crate::error::RenderResult;
use crate::framebuffer::FrameBuffer;

/// Write `buffer` as an 8-bit RGB image, top row first.
///
/// The format follows the file extension. Channels are clamped to [0, 1]
/// before quantizing, so tonemap first.
pub fn write_image(path: impl AsRef<Path>, buffer: &FrameBuffer) -> RenderResult<()> {
    let path = path.as_ref();
    buffer.to_rgb8().save(path)?;
    log::info!(
        "Wrote {}x{} image to {}",
        buffer.width(),
        buffer.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use penumbra_core::Color;

    #[test]
    fn test_write_png_flipped() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.set(0, 0, Color::new(1.0, 0.0, 0.0));

        let path = std::env::temp_dir().join(format!("penumbra_write_{}.png", std::process::id()));
        write_image(&path, &fb).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();

        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 1).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_unknown_extension_is_an_error() {
        let fb = FrameBuffer::new(2, 2);
        let path = std::env::temp_dir().join("penumbra_write.not_an_image_format");
        assert!(matches!(write_image(&path, &fb), Err(RenderError::Image(_))));
    }
}
