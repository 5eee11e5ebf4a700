use std::ffi::CString;
use std::path::Path;

use crate::error::{MediaError, Result};

/// Decoded video frame as RGB24 pixel data, row-major, 3 bytes per pixel.
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// Presentation timestamp in seconds.
    pub pts_secs: f64,
}

/// Trait for video decoders, enabling test mocking.
pub trait VideoDecoder: Send {
    fn open(path: &Path) -> Result<Self>
    where
        Self: Sized;

    fn decode_next_frame(&mut self) -> Result<Option<VideoFrame>>;

    fn seek_to(&mut self, timestamp_secs: f64) -> Result<()>;

    fn stream_info(&self) -> StreamInfo;
}

#[derive(Debug, Clone)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub duration_secs: f64,
    pub codec_name: String,
}

pub struct FfmpegDecoder {
    input_ctx: rsmpeg::avformat::AVFormatContextInput,
    decode_ctx: rsmpeg::avcodec::AVCodecContext,
    sws_ctx: Option<rsmpeg::swscale::SwsContext>,
    video_stream_index: usize,
    stream_info: StreamInfo,
}

impl VideoDecoder for FfmpegDecoder {
    fn open(path: &Path) -> Result<Self> {
        let path_str = path.to_string_lossy().to_string();
        let c_path = CString::new(path_str.clone())
            .map_err(|_| MediaError::OpenFailed(path_str.clone()))?;

        let input_ctx = rsmpeg::avformat::AVFormatContextInput::open(&c_path)
            .map_err(|e| MediaError::OpenFailed(format!("{path_str}: {e}")))?;

        let (video_stream_index, decoder) = input_ctx
            .streams()
            .iter()
            .enumerate()
            .find_map(|(i, stream)| {
                let codecpar = stream.codecpar();
                if codecpar.codec_type != rsmpeg::ffi::AVMEDIA_TYPE_VIDEO {
                    return None;
                }
                rsmpeg::avcodec::AVCodec::find_decoder(codecpar.codec_id).map(|d| (i, d))
            })
            .ok_or(MediaError::NoVideoStream)?;

        let mut decode_ctx = rsmpeg::avcodec::AVCodecContext::new(&decoder);
        decode_ctx
            .apply_codecpar(&input_ctx.streams()[video_stream_index].codecpar())
            .map_err(|e| MediaError::DecoderError(format!("apply_codecpar: {e}")))?;
        decode_ctx
            .open(None)
            .map_err(|e| MediaError::DecoderError(format!("open: {e}")))?;

        let stream_info = {
            let streams = input_ctx.streams();
            let video_stream = &streams[video_stream_index];
            let tb = video_stream.time_base;
            let duration_secs = if video_stream.duration > 0 {
                video_stream.duration as f64 * tb.num as f64 / tb.den as f64
            } else {
                input_ctx.duration as f64 / rsmpeg::ffi::AV_TIME_BASE as f64
            };
            let r = video_stream.r_frame_rate;
            let fps = if r.den > 0 {
                r.num as f64 / r.den as f64
            } else {
                30.0
            };
            StreamInfo {
                width: decode_ctx.width as u32,
                height: decode_ctx.height as u32,
                fps,
                duration_secs,
                codec_name: decoder.name().to_string_lossy().to_string(),
            }
        };

        Ok(Self {
            input_ctx,
            decode_ctx,
            sws_ctx: None,
            video_stream_index,
            stream_info,
        })
    }

    fn decode_next_frame(&mut self) -> Result<Option<VideoFrame>> {
        loop {
            match self.input_ctx.read_packet() {
                Ok(Some(packet)) => {
                    if packet.stream_index as usize != self.video_stream_index {
                        continue;
                    }
                    self.decode_ctx
                        .send_packet(Some(&packet))
                        .map_err(|e| MediaError::DecoderError(format!("send_packet: {e}")))?;

                    match self.decode_ctx.receive_frame() {
                        Ok(frame) => return Ok(Some(self.frame_to_rgb(&frame)?)),
                        Err(_) => continue,
                    }
                }
                Ok(None) => {
                    // EOF: flush decoder.
                    self.decode_ctx.send_packet(None).ok();
                    match self.decode_ctx.receive_frame() {
                        Ok(frame) => return Ok(Some(self.frame_to_rgb(&frame)?)),
                        Err(_) => return Ok(None),
                    }
                }
                Err(e) => {
                    return Err(MediaError::DecoderError(format!("read_packet: {e}")));
                }
            }
        }
    }

    fn seek_to(&mut self, timestamp_secs: f64) -> Result<()> {
        let tb = self.input_ctx.streams()[self.video_stream_index].time_base;
        let ts = (timestamp_secs * tb.den as f64 / tb.num as f64) as i64;

        self.input_ctx
            .seek(
                self.video_stream_index as i32,
                ts,
                rsmpeg::ffi::AVSEEK_FLAG_BACKWARD as i32,
            )
            .map_err(|e| MediaError::SeekError(format!("{e}")))?;

        self.decode_ctx.flush_buffers();

        Ok(())
    }

    fn stream_info(&self) -> StreamInfo {
        self.stream_info.clone()
    }
}

impl FfmpegDecoder {
    fn frame_to_rgb(&mut self, frame: &rsmpeg::avutil::AVFrame) -> Result<VideoFrame> {
        let width = frame.width;
        let height = frame.height;

        // Source dimensions and pixel format are fixed per file, so the
        // conversion context is created once and reused.
        if self.sws_ctx.is_none() {
            self.sws_ctx = Some(
                rsmpeg::swscale::SwsContext::get_context(
                    width,
                    height,
                    frame.format,
                    width,
                    height,
                    rsmpeg::ffi::AV_PIX_FMT_RGB24,
                    rsmpeg::ffi::SWS_FAST_BILINEAR,
                    None,
                    None,
                    None,
                )
                .ok_or_else(|| MediaError::DecoderError("failed to create sws context".into()))?,
            );
        }
        let sws = self.sws_ctx.as_mut().ok_or_else(|| {
            MediaError::DecoderError("sws context unavailable".into())
        })?;

        let mut rgb_frame = rsmpeg::avutil::AVFrame::new();
        rgb_frame.set_width(width);
        rgb_frame.set_height(height);
        rgb_frame.set_format(rsmpeg::ffi::AV_PIX_FMT_RGB24);
        rgb_frame
            .alloc_buffer()
            .map_err(|e| MediaError::DecoderError(format!("alloc_buffer: {e}")))?;

        sws.scale_frame(frame, 0, height, &mut rgb_frame)
            .map_err(|e| MediaError::DecoderError(format!("scale_frame: {e}")))?;

        let data_size = (width * height * 3) as usize;
        let data =
            unsafe { std::slice::from_raw_parts(rgb_frame.data[0] as *const u8, data_size).to_vec() };

        let tb = self.input_ctx.streams()[self.video_stream_index].time_base;
        let pts_secs = if frame.pts != rsmpeg::ffi::AV_NOPTS_VALUE {
            frame.pts as f64 * tb.num as f64 / tb.den as f64
        } else {
            0.0
        };

        Ok(VideoFrame {
            width: width as u32,
            height: height as u32,
            data,
            pts_secs,
        })
    }
}
