use std::io::Cursor;
use std::path::Path;

use mediafeed_core::record::MediaRecord;
use tracing::warn;

use crate::decoder::{FfmpegDecoder, VideoDecoder, VideoFrame};
use crate::error::{MediaError, Result};
use crate::scratch::ScratchVideo;

/// Poster frames are taken at a fixed one-second offset into the video.
pub const POSTER_OFFSET_SECS: f64 = 1.0;

/// Extract a poster frame as JPEG bytes, or the reason it could not be done.
///
/// Videos shorter than [`POSTER_OFFSET_SECS`] yield [`MediaError::TooShort`];
/// a backward-flag seek past the end would otherwise land on an earlier
/// keyframe and hand back a frame anyway.
pub fn extract_poster(path: &Path) -> Result<Vec<u8>> {
    let mut decoder = FfmpegDecoder::open(path)?;
    let info = decoder.stream_info();
    if info.duration_secs < POSTER_OFFSET_SECS {
        return Err(MediaError::TooShort {
            duration_secs: info.duration_secs,
        });
    }
    decoder.seek_to(POSTER_OFFSET_SECS)?;
    let frame = decoder
        .decode_next_frame()?
        .ok_or_else(|| MediaError::DecoderError("no frame at poster offset".into()))?;
    encode_jpeg(&frame)
}

/// Extract a poster frame, treating every failure as "no poster".
///
/// Callers are expected to fall back to a placeholder image when this
/// returns `None`; the failure is logged, not surfaced.
pub fn poster_frame(path: &Path) -> Option<Vec<u8>> {
    match extract_poster(path) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            warn!(path = %path.display(), %err, "poster frame extraction failed");
            None
        }
    }
}

/// Poster frame for inline video bytes, bridged through a scratch file.
pub fn poster_frame_from_bytes(video: &[u8]) -> Option<Vec<u8>> {
    let scratch = match ScratchVideo::write(video) {
        Ok(scratch) => scratch,
        Err(err) => {
            warn!(%err, "failed to stage video bytes for decoding");
            return None;
        }
    };
    poster_frame(scratch.path())
}

/// Poster frame for a record's video payload. `None` for image records.
pub fn poster_for_record(record: &MediaRecord) -> Option<Vec<u8>> {
    let video = record.video_data.as_deref()?;
    poster_frame_from_bytes(video)
}

fn encode_jpeg(frame: &VideoFrame) -> Result<Vec<u8>> {
    let img: image::RgbImage =
        image::ImageBuffer::from_raw(frame.width, frame.height, frame.data.clone()).ok_or_else(
            || MediaError::DecoderError("frame buffer does not match its dimensions".into()),
        )?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg)?;
    Ok(out.into_inner())
}
