use std::time::Duration;

use rodio::source::Source;
use rodio::{OutputStream, OutputStreamHandle};

const SAMPLE_RATE: u32 = 44100;

/// Oscillator shapes matching the Web Audio API's oscillator types.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// Infinite mono tone at a fixed frequency. Shaped per sample from the
/// normalized phase, then trimmed/amplified/delayed by rodio combinators.
pub struct Tone {
    waveform: Waveform,
    frequency: f32,
    sample: u32,
}

impl Tone {
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            waveform,
            frequency,
            sample: 0,
        }
    }
}

impl Iterator for Tone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let phase = (self.sample as f32 * self.frequency / SAMPLE_RATE as f32).fract();
        self.sample = self.sample.wrapping_add(1);
        let value = match self.waveform {
            Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        };
        Some(value)
    }
}

impl Source for Tone {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Fire-and-forget tone synthesis. Holds the output stream for the life of
/// the app; if no audio device is available every trigger is a no-op.
pub struct Jukebox {
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl Jukebox {
    pub fn new() -> Self {
        Self {
            output: OutputStream::try_default().ok(),
        }
    }

    /// A jukebox with no output device. Used in tests and as the fallback
    /// when the real device cannot be opened.
    pub fn muted() -> Self {
        Self { output: None }
    }

    pub fn play_tone(&self, frequency: f32, duration: f32, waveform: Waveform, volume: f32, delay: f32) {
        let Some((_, handle)) = &self.output else {
            return;
        };
        let source = Tone::new(waveform, frequency)
            .take_duration(Duration::from_secs_f32(duration))
            .amplify(volume)
            .delay(Duration::from_secs_f32(delay));
        // Playback failure is not worth surfacing; the game plays on silent.
        let _ = handle.play_raw(source);
    }

    pub fn start(&self) {
        self.play_tone(440.0, 0.05, Waveform::Square, 0.2, 0.0);
    }

    pub fn correct(&self) {
        self.play_tone(1000.0, 0.05, Waveform::Sine, 0.3, 0.0);
    }

    pub fn incorrect(&self) {
        self.play_tone(200.0, 0.2, Waveform::Triangle, 0.3, 0.0);
    }

    pub fn eat(&self) {
        self.play_tone(800.0, 0.08, Waveform::Sine, 0.3, 0.0);
    }

    pub fn jump(&self) {
        self.play_tone(600.0, 0.08, Waveform::Sine, 0.3, 0.0);
    }

    pub fn crash(&self) {
        self.play_tone(60.0, 0.2, Waveform::Sawtooth, 0.6, 0.0);
        self.play_tone(30.0, 0.3, Waveform::Square, 0.8, 0.05);
    }

    pub fn win(&self) {
        self.play_tone(1300.0, 0.1, Waveform::Sine, 0.4, 0.0);
        self.play_tone(1500.0, 0.1, Waveform::Sine, 0.4, 0.1);
    }

    pub fn game_over(&self) {
        self.play_tone(150.0, 0.2, Waveform::Sawtooth, 0.4, 0.0);
    }
}
