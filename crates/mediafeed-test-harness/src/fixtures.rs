use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Generate a small test video using ffmpeg's lavfi test source.
/// Returns the path to the generated file.
pub fn generate_test_video(output_dir: &Path, name: &str, duration_secs: f64) -> PathBuf {
    let output_path = output_dir.join(format!("{name}.mp4"));

    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-f",
            "lavfi",
            "-i",
            &format!("testsrc=duration={duration_secs}:size=320x240:rate=30"),
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-preset",
            "ultrafast",
        ])
        .arg(&output_path)
        .stderr(std::process::Stdio::null())
        .status()
        .expect("ffmpeg must be installed to generate test fixtures");

    assert!(
        status.success(),
        "ffmpeg failed to generate test video {name}"
    );
    assert!(output_path.exists(), "test video was not created: {name}");

    output_path
}

/// Generate a test video and read it back as inline bytes, the form a
/// video record carries.
pub fn test_video_bytes(output_dir: &Path, name: &str, duration_secs: f64) -> Vec<u8> {
    let path = generate_test_video(output_dir, name, duration_secs);
    std::fs::read(&path).expect("failed to read generated test video")
}

/// Small solid-color JPEG, the form an image record carries.
pub fn test_image_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 60, 60]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg)
        .expect("failed to encode fixture image");
    out.into_inner()
}

/// Get a temporary directory for test fixtures that persists for the test run.
pub fn fixture_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("failed to create temp dir for fixtures")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_test_video() {
        let dir = fixture_dir();
        let path = generate_test_video(dir.path(), "test_basic", 1.0);
        assert!(path.exists());
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0, "generated video should not be empty");
    }

    #[test]
    fn test_image_fixture_decodes() {
        let bytes = test_image_jpeg(64, 64);
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(img.width(), 64);
        assert_eq!(img.height(), 64);
    }
}
