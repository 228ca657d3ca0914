//! Audio output using cpal.
//!
//! Rendered notes are sent over a channel to the device callback, which mixes
//! every active buffer into all output channels and applies the master gain.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{Receiver, Sender};

use crate::error::{PlaybackError, PlaybackResult};
use crate::output::AudioSink;

/// Notes mixed at once; the oldest is dropped beyond this.
const MAX_VOICES: usize = 32;

struct PlayingBuffer {
    samples: Vec<f32>,
    pos: usize,
}

/// Runs inside the device callback.
pub(crate) struct Mixer {
    rx: Receiver<Vec<f32>>,
    voices: Vec<PlayingBuffer>,
    gain: Arc<AtomicU32>,
}

impl Mixer {
    pub(crate) fn new(rx: Receiver<Vec<f32>>, gain: Arc<AtomicU32>) -> Self {
        Self {
            rx,
            voices: Vec::with_capacity(MAX_VOICES),
            gain,
        }
    }

    fn take_pending(&mut self) {
        while let Ok(samples) = self.rx.try_recv() {
            if self.voices.len() == MAX_VOICES {
                self.voices.remove(0);
            }
            self.voices.push(PlayingBuffer { samples, pos: 0 });
        }
    }

    /// Fill an interleaved device buffer.
    pub(crate) fn fill<T>(&mut self, data: &mut [T], channels: usize)
    where
        T: Sample + FromSample<f32>,
    {
        self.take_pending();
        let gain = f32::from_bits(self.gain.load(Ordering::Relaxed));
        for frame in data.chunks_mut(channels.max(1)) {
            let mut sum = 0.0;
            for voice in self.voices.iter_mut() {
                if let Some(s) = voice.samples.get(voice.pos) {
                    sum += *s;
                    voice.pos += 1;
                }
            }
            let value = T::from_sample((sum * gain).clamp(-1.0, 1.0));
            for out in frame.iter_mut() {
                *out = value;
            }
        }
        self.voices.retain(|v| v.pos < v.samples.len());
    }

    pub(crate) fn active_voices(&self) -> usize {
        self.voices.len()
    }
}

/// The default output device, opened once.
pub struct CpalSink {
    stream: Stream,
    tx: Sender<Vec<f32>>,
    gain: Arc<AtomicU32>,
    sample_rate: u32,
    suspended: AtomicBool,
}

impl CpalSink {
    /// Open and start the default output device.
    pub fn open() -> PlaybackResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("No output device available")?;
        let config = device
            .default_output_config()
            .map_err(|e| format!("Failed to get output config: {}", e))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();

        let (tx, rx) = crossbeam_channel::unbounded();
        let gain = Arc::new(AtomicU32::new(1.0_f32.to_bits()));
        let mixer = Mixer::new(rx, Arc::clone(&gain));

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, mixer, channels)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, mixer, channels)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, mixer, channels)?,
            other => {
                return Err(PlaybackError(format!("Unsupported sample format {:?}", other)));
            }
        };
        stream
            .play()
            .map_err(|e| format!("Failed to start output stream: {}", e))?;

        log::info!(
            target: "audio::output",
            "output open: {} ({} Hz, {} channels)",
            device.name().unwrap_or_else(|_| "unknown device".to_string()),
            sample_rate,
            channels
        );

        Ok(Self {
            stream,
            tx,
            gain,
            sample_rate,
            suspended: AtomicBool::new(false),
        })
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    mut mixer: Mixer,
    channels: usize,
) -> PlaybackResult<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                mixer.fill(data, channels);
            },
            |err| {
                log::error!(target: "audio::output", "Audio output error: {}", err);
            },
            None,
        )
        .map_err(|e| PlaybackError(format!("Failed to build output stream: {}", e)))
}

impl AudioSink for CpalSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn schedule(&self, buffer: Vec<f32>) -> PlaybackResult {
        self.tx
            .send(buffer)
            .map_err(|_| PlaybackError::from("Output stream closed"))
    }

    fn set_gain(&self, gain: f32) {
        self.gain.store(gain.to_bits(), Ordering::Relaxed);
    }

    fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::Relaxed)
    }

    fn resume(&self) -> PlaybackResult {
        self.stream
            .play()
            .map_err(|e| format!("Failed to resume output stream: {}", e))?;
        self.suspended.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn suspend(&self) -> PlaybackResult {
        self.stream
            .pause()
            .map_err(|e| format!("Failed to pause output stream: {}", e))?;
        self.suspended.store(true, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixer() -> (Sender<Vec<f32>>, Arc<AtomicU32>, Mixer) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let gain = Arc::new(AtomicU32::new(1.0_f32.to_bits()));
        let mixer = Mixer::new(rx, Arc::clone(&gain));
        (tx, gain, mixer)
    }

    #[test]
    fn mixes_buffers_into_every_channel() {
        let (tx, _gain, mut mixer) = mixer();
        tx.send(vec![0.25, 0.25]).unwrap();
        tx.send(vec![0.5]).unwrap();
        let mut out = [0.0_f32; 6];
        mixer.fill(&mut out, 2);
        assert_eq!(out, [0.75, 0.75, 0.25, 0.25, 0.0, 0.0]);
        assert_eq!(mixer.active_voices(), 0);
    }

    #[test]
    fn applies_master_gain_and_clamps() {
        let (tx, gain, mut mixer) = mixer();
        gain.store(0.0_f32.to_bits(), Ordering::Relaxed);
        tx.send(vec![0.9; 4]).unwrap();
        let mut out = [1.0_f32; 2];
        mixer.fill(&mut out, 1);
        assert_eq!(out, [0.0, 0.0]);
        // gain restored mid-note; the note keeps playing from where it was
        gain.store(1.0_f32.to_bits(), Ordering::Relaxed);
        tx.send(vec![0.9; 2]).unwrap();
        mixer.fill(&mut out, 1);
        assert_eq!(out, [1.0, 1.0]);
    }

    #[test]
    fn keeps_partial_buffers_between_callbacks() {
        let (tx, _gain, mut mixer) = mixer();
        tx.send(vec![0.1, 0.2, 0.3]).unwrap();
        let mut out = [0.0_f32; 2];
        mixer.fill(&mut out, 1);
        assert_eq!(mixer.active_voices(), 1);
        mixer.fill(&mut out, 1);
        assert_eq!(out[0], 0.3);
        assert_eq!(out[1], 0.0);
        assert_eq!(mixer.active_voices(), 0);
    }

    #[test]
    fn converts_to_integer_formats() {
        let (tx, _gain, mut mixer) = mixer();
        tx.send(vec![1.0, -1.0]).unwrap();
        let mut out = [0_i16; 2];
        mixer.fill(&mut out, 1);
        assert!(out[0] > 32_000, "got {}", out[0]);
        assert!(out[1] < -32_000, "got {}", out[1]);
    }
}
