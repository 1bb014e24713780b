//! Audio feedback: engine tone parameters and one-shot cues
//!
//! This module owns the data layer only. Playback is delegated to an
//! [`AudioSink`]; with no sink attached every call is a silent no-op and
//! the simulation carries on unchanged.

use log::debug;

use super::config::AudioConfig;

/// Continuous engine parameters for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineParams {
    pub volume: f32,
    /// Low-pass filter cutoff in Hz
    pub frequency: f32,
}

/// Instantaneous engine targets for a train speed, before smoothing
pub fn engine_targets(speed: f32, config: &AudioConfig) -> EngineParams {
    let speed = speed.abs();
    EngineParams {
        volume: config.idle_volume + (speed * config.volume_per_speed).min(config.volume_cap),
        frequency: config.base_frequency + speed * config.frequency_per_speed,
    }
}

/// An audio parameter that moves exponentially towards its target, like a
/// Web Audio `setTargetAtTime` ramp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedParam {
    pub value: f32,
    /// Time constant in seconds
    pub time_constant: f32,
}

impl SmoothedParam {
    pub fn new(value: f32, time_constant: f32) -> Self {
        Self {
            value,
            time_constant,
        }
    }

    /// Advance by `dt` seconds towards `target` and return the new value
    pub fn approach(&mut self, target: f32, dt: f32) -> f32 {
        if self.time_constant <= 0.0 {
            self.value = target;
        } else {
            let k = 1.0 - (-dt / self.time_constant).exp();
            self.value += (target - self.value) * k;
        }
        self.value
    }
}

/// Edge detector for the brake screech: fires on the frame speed drops from
/// above `from_speed` (previous frame) to below `to_speed`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrakeDetector {
    last_speed: f32,
    from_speed: f32,
    to_speed: f32,
}

impl BrakeDetector {
    pub fn new(from_speed: f32, to_speed: f32) -> Self {
        Self {
            last_speed: 0.0,
            from_speed,
            to_speed,
        }
    }

    pub fn update(&mut self, speed: f32) -> bool {
        let speed = speed.abs();
        let fired = self.last_speed > self.from_speed && speed < self.to_speed;
        self.last_speed = speed;
        fired
    }
}

/// Oscillator shapes used by the one-shot sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Triangle,
    Sawtooth,
}

/// Discrete sound events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Train horn chord
    Whistle,
    /// Brake squeal when the train comes to a stop
    BrakeScreech,
}

/// Exponential ramp from `start` to `end` over `duration` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpRamp {
    pub start: f32,
    pub end: f32,
    pub duration: f32,
}

impl ExpRamp {
    pub fn at(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return self.start;
        }
        if t >= self.duration {
            return self.end;
        }
        self.start * (self.end / self.start).powf(t / self.duration)
    }
}

/// One oscillator of a voice with its pitch ramp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    pub waveform: Waveform,
    pub frequency: ExpRamp,
}

/// Everything a synth backend needs to render a cue
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub oscillators: Vec<Oscillator>,
    pub gain: ExpRamp,
    /// Oscillators stop after this many seconds
    pub duration: f32,
}

impl Voice {
    /// Output gain at `t` seconds after the start; silent once stopped
    pub fn gain_at(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.duration {
            0.0
        } else {
            self.gain.at(t)
        }
    }
}

impl SoundCue {
    pub fn voice(self) -> Voice {
        match self {
            SoundCue::Whistle => {
                let steady = |hz: f32| Oscillator {
                    waveform: Waveform::Triangle,
                    frequency: ExpRamp {
                        start: hz,
                        end: hz,
                        duration: 1.0,
                    },
                };
                Voice {
                    oscillators: vec![steady(300.0), steady(360.0)],
                    gain: ExpRamp {
                        start: 0.3,
                        end: 0.01,
                        duration: 1.0,
                    },
                    duration: 1.0,
                }
            }
            SoundCue::BrakeScreech => Voice {
                oscillators: vec![Oscillator {
                    waveform: Waveform::Sawtooth,
                    frequency: ExpRamp {
                        start: 2000.0,
                        end: 100.0,
                        duration: 0.5,
                    },
                }],
                gain: ExpRamp {
                    start: 0.1,
                    end: 0.01,
                    duration: 0.5,
                },
                duration: 0.5,
            },
        }
    }
}

/// Playback backend
pub trait AudioSink: Send + Sync {
    /// Update the continuous engine sound
    fn set_engine(&mut self, params: EngineParams);
    /// Start a one-shot sound
    fn play(&mut self, cue: SoundCue);
}

/// Sink that only logs what it would play
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn set_engine(&mut self, _params: EngineParams) {}

    fn play(&mut self, cue: SoundCue) {
        debug!("audio cue {:?}", cue);
    }
}

/// Engine tone smoothing, brake detection and dispatch to the sink
pub struct AudioFeedback {
    sink: Option<Box<dyn AudioSink>>,
    volume: SmoothedParam,
    frequency: SmoothedParam,
    brake: BrakeDetector,
    config: AudioConfig,
}

impl std::fmt::Debug for AudioFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioFeedback")
            .field("sink", &self.sink.is_some())
            .field("volume", &self.volume)
            .field("frequency", &self.frequency)
            .field("brake", &self.brake)
            .field("config", &self.config)
            .finish()
    }
}

impl AudioFeedback {
    pub fn new(config: AudioConfig) -> Self {
        Self {
            sink: None,
            volume: SmoothedParam::new(config.idle_volume, config.smoothing_secs),
            frequency: SmoothedParam::new(config.base_frequency, config.smoothing_secs),
            brake: BrakeDetector::new(config.brake_from_speed, config.brake_to_speed),
            config,
        }
    }

    pub fn is_available(&self) -> bool {
        self.sink.is_some()
    }

    /// Attach a backend. Audio starts with a whistle, like a departure.
    pub fn unlock(&mut self, sink: Box<dyn AudioSink>) {
        if self.sink.is_some() {
            return;
        }
        self.sink = Some(sink);
        self.play(SoundCue::Whistle);
    }

    /// Send a one-shot to the sink, if any
    pub fn play(&mut self, cue: SoundCue) {
        if let Some(sink) = self.sink.as_mut() {
            sink.play(cue);
        }
    }

    /// Per-frame update from the current train speed. Returns the smoothed
    /// engine parameters and the cues triggered by the speed change.
    pub fn update(&mut self, speed: f32, dt: f32) -> (EngineParams, Vec<SoundCue>) {
        let targets = engine_targets(speed, &self.config);
        let params = EngineParams {
            volume: self.volume.approach(targets.volume, dt),
            frequency: self.frequency.approach(targets.frequency, dt),
        };

        let mut cues = Vec::new();
        if self.brake.update(speed) {
            cues.push(SoundCue::BrakeScreech);
        }

        if let Some(sink) = self.sink.as_mut() {
            sink.set_engine(params);
            for cue in &cues {
                sink.play(*cue);
            }
        }

        (params, cues)
    }
}
