//! Output graph abstraction: where rendered notes go.
//!
//! `AudioSink` captures what the player *means* to do (queue a rendered note,
//! change the master gain, resume a suspended device) independently of how it
//! is done (a cpal output stream). This keeps the fallback chain testable
//! without a sound card.

use std::sync::{Arc, Mutex};

use crate::error::PlaybackResult;

/// The output graph: a master gain stage feeding the audio device.
pub trait AudioSink {
    /// Frames per second the sink expects scheduled buffers to use.
    fn sample_rate(&self) -> u32;

    /// Queue a mono buffer for immediate playback, mixed with anything
    /// already playing.
    fn schedule(&self, buffer: Vec<f32>) -> PlaybackResult;

    /// Set the master gain (0 silences without stopping the device).
    fn set_gain(&self, gain: f32);

    fn is_suspended(&self) -> bool;

    fn resume(&self) -> PlaybackResult;

    fn suspend(&self) -> PlaybackResult;
}

/// Builds the output graph on first use.
pub type SinkFactory = Box<dyn FnMut() -> PlaybackResult<Box<dyn AudioSink>>>;

// ─── TestSink ───────────────────────────────────────────────────────

/// An operation recorded by [`TestSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum TestOp {
    Schedule { frames: usize, peak: f32 },
    SetGain(f32),
    Resume,
    Suspend,
}

/// A sink that records all operations into a vector for assertions.
/// Uses `Mutex` for interior mutability so it can be shared through an `Arc`.
pub struct TestSink {
    sample_rate: u32,
    ops: Mutex<Vec<TestOp>>,
    buffers: Mutex<Vec<Vec<f32>>>,
    suspended: Mutex<bool>,
}

impl TestSink {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ops: Mutex::new(Vec::new()),
            buffers: Mutex::new(Vec::new()),
            suspended: Mutex::new(false),
        }
    }

    /// Start out suspended, like a device that has not been unlocked yet.
    pub fn suspended(self) -> Self {
        *self.suspended.lock().unwrap() = true;
        self
    }

    /// Return all recorded operations.
    pub fn operations(&self) -> Vec<TestOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Return every scheduled buffer.
    pub fn buffers(&self) -> Vec<Vec<f32>> {
        self.buffers.lock().unwrap().clone()
    }

    pub fn scheduled_count(&self) -> usize {
        self.buffers.lock().unwrap().len()
    }

    /// Last gain set, if any.
    pub fn gain(&self) -> Option<f32> {
        self.ops.lock().unwrap().iter().rev().find_map(|op| match op {
            TestOp::SetGain(g) => Some(*g),
            _ => None,
        })
    }

    /// Clear recorded operations and buffers.
    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
        self.buffers.lock().unwrap().clear();
    }
}

impl AudioSink for TestSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn schedule(&self, buffer: Vec<f32>) -> PlaybackResult {
        let peak = buffer.iter().fold(0.0_f32, |m, s| m.max(s.abs()));
        self.ops.lock().unwrap().push(TestOp::Schedule {
            frames: buffer.len(),
            peak,
        });
        self.buffers.lock().unwrap().push(buffer);
        Ok(())
    }

    fn set_gain(&self, gain: f32) {
        self.ops.lock().unwrap().push(TestOp::SetGain(gain));
    }

    fn is_suspended(&self) -> bool {
        *self.suspended.lock().unwrap()
    }

    fn resume(&self) -> PlaybackResult {
        *self.suspended.lock().unwrap() = false;
        self.ops.lock().unwrap().push(TestOp::Resume);
        Ok(())
    }

    fn suspend(&self) -> PlaybackResult {
        *self.suspended.lock().unwrap() = true;
        self.ops.lock().unwrap().push(TestOp::Suspend);
        Ok(())
    }
}

/// Wraps `Arc<TestSink>` so the player can own a `Box<dyn AudioSink>` while
/// tests retain an `Arc` for assertions.
pub struct SharedTestSink(pub Arc<TestSink>);

impl AudioSink for SharedTestSink {
    fn sample_rate(&self) -> u32 {
        self.0.sample_rate()
    }
    fn schedule(&self, buffer: Vec<f32>) -> PlaybackResult {
        self.0.schedule(buffer)
    }
    fn set_gain(&self, gain: f32) {
        self.0.set_gain(gain)
    }
    fn is_suspended(&self) -> bool {
        self.0.is_suspended()
    }
    fn resume(&self) -> PlaybackResult {
        self.0.resume()
    }
    fn suspend(&self) -> PlaybackResult {
        self.0.suspend()
    }
}

/// A factory handing out shared views of one test sink, counting how often
/// the graph was built.
pub fn shared_test_factory(sink: Arc<TestSink>, builds: Arc<Mutex<u32>>) -> SinkFactory {
    Box::new(move || {
        *builds.lock().unwrap() += 1;
        Ok(Box::new(SharedTestSink(Arc::clone(&sink))) as Box<dyn AudioSink>)
    })
}
