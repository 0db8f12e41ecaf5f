//! Image MIME detection by file extension for local uploads.

use std::path::Path;

/// MIME type for an image path, `None` for anything that is not an image.
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "heic" => "image/heic",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_image_extensions() {
        assert_eq!(image_mime_type(Path::new("cat.PNG")), Some("image/png"));
        assert_eq!(image_mime_type(Path::new("a/b/photo.jpeg")), Some("image/jpeg"));
        assert_eq!(image_mime_type(Path::new("x.webp")), Some("image/webp"));
    }

    #[test]
    fn non_images_are_none() {
        assert_eq!(image_mime_type(Path::new("notes.txt")), None);
        assert_eq!(image_mime_type(Path::new("Makefile")), None);
    }
}
