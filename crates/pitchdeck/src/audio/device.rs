use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::{AudioError, AudioSink};

/// Flags shared between the sink and the output callback.
#[derive(Default)]
struct Shared {
    playing: AtomicBool,
    rewind: AtomicBool,
    at_end: AtomicBool,
    ended: AtomicBool,
}

/// Fully decoded track, interleaved.
struct Track {
    samples: Vec<f32>,
    channels: usize,
    rate: u32,
}

impl Track {
    fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }
}

/// Plays one file on the default output device. The file is decoded and the
/// stream opened on the first `play`.
pub struct DeviceSink {
    path: PathBuf,
    volume: f32,
    shared: Arc<Shared>,
    stream: Option<cpal::Stream>,
}

impl DeviceSink {
    pub fn new(path: PathBuf, volume: f32) -> Self {
        Self {
            path,
            volume,
            shared: Arc::new(Shared::default()),
            stream: None,
        }
    }

    fn open(&mut self) -> Result<(), AudioError> {
        let track = decode(&self.path)?;
        log::debug!(
            "decoded {} ({} frames, {} Hz, {} ch)",
            self.path.display(),
            track.frames(),
            track.rate,
            track.channels
        );

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AudioError::Device("no output device found".to_string()))?;
        let config = device
            .default_output_config()
            .map_err(|e| AudioError::Device(e.to_string()))?;
        let out_channels = config.channels() as usize;
        let step = track.rate as f64 / config.sample_rate().0 as f64;

        let shared = Arc::clone(&self.shared);
        let volume = self.volume;
        let mut cursor = 0.0f64;
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(out_channels) {
                        if shared.rewind.swap(false, Ordering::AcqRel) {
                            cursor = 0.0;
                        }
                        if !shared.playing.load(Ordering::Acquire) {
                            frame.fill(0.0);
                            continue;
                        }
                        let index = cursor as usize;
                        if index >= track.frames() {
                            shared.playing.store(false, Ordering::Release);
                            shared.at_end.store(true, Ordering::Release);
                            shared.ended.store(true, Ordering::Release);
                            frame.fill(0.0);
                            continue;
                        }
                        let base = index * track.channels;
                        for (ch, out) in frame.iter_mut().enumerate() {
                            let src = ch.min(track.channels - 1);
                            *out = track.samples[base + src] * volume;
                        }
                        cursor += step;
                    }
                },
                |err| log::warn!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| AudioError::Device(e.to_string()))?;
        stream
            .play()
            .map_err(|e| AudioError::Device(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }
}

impl AudioSink for DeviceSink {
    fn play(&mut self) -> Result<(), AudioError> {
        if self.stream.is_none() {
            self.open()?;
        }
        if self.shared.at_end.swap(false, Ordering::AcqRel) {
            self.shared.rewind.store(true, Ordering::Release);
        }
        self.shared.playing.store(true, Ordering::Release);
        Ok(())
    }

    fn pause(&mut self) {
        self.shared.playing.store(false, Ordering::Release);
    }

    fn take_ended(&mut self) -> bool {
        self.shared.ended.swap(false, Ordering::AcqRel)
    }
}

fn decode(path: &Path) -> Result<Track, AudioError> {
    let decode_err = |reason: String| AudioError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AudioError::NotFound(path.to_path_buf())
        } else {
            decode_err(e.to_string())
        }
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_err(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| decode_err("no audio track".to_string()))?;
    let track_id = track.id;
    let rate = track.codec_params.sample_rate.unwrap_or(44_100);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(2);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_err(e.to_string()))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_err(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                channels = spec.channels.count();
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                log::trace!("skipping bad packet in {}: {e}", path.display());
            }
            Err(e) => return Err(decode_err(e.to_string())),
        }
    }

    if samples.is_empty() || channels == 0 {
        return Err(decode_err("track is empty".to_string()));
    }
    Ok(Track {
        samples,
        channels,
        rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reports_not_found() {
        let mut sink = DeviceSink::new(PathBuf::from("/nonexistent/track.mp3"), 1.0);
        assert!(matches!(sink.play(), Err(AudioError::NotFound(_))));
        assert!(!sink.take_ended());
    }
}
