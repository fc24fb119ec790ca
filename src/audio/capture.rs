//! Microphone capture using CPAL (Cross-Platform Audio Library).

use crate::audio::session::FrameFeeder;
use crate::error::{DubashError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// Run a closure with stderr temporarily redirected to /dev/null.
///
/// This suppresses noisy ALSA/JACK/PipeWire messages that CPAL triggers
/// when probing audio backends. The messages are harmless but confusing to users.
///
/// # Safety
/// Uses `libc::dup`/`libc::dup2` to save and restore file descriptor 2 (stderr).
/// Safe as long as no other thread is concurrently manipulating fd 2.
fn with_suppressed_stderr<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    unsafe {
        let saved_fd = libc::dup(2);
        let devnull = libc::open(c"/dev/null".as_ptr(), libc::O_WRONLY);
        if saved_fd >= 0 && devnull >= 0 {
            libc::dup2(devnull, 2);
            libc::close(devnull);
        }

        let result = f();

        if saved_fd >= 0 {
            libc::dup2(saved_fd, 2);
            libc::close(saved_fd);
        }

        result
    }
}

/// Suppress noisy JACK/ALSA error messages that occur during audio backend probing.
///
/// # Safety
/// This modifies environment variables which is safe when called before spawning threads.
pub fn suppress_audio_warnings() {
    // SAFETY: Called at startup before any threads are spawned
    unsafe {
        std::env::set_var("JACK_NO_START_SERVER", "1");
        std::env::set_var("JACK_NO_AUDIO_RESERVATION", "1");
        std::env::set_var("PIPEWIRE_DEBUG", "0");
        std::env::set_var("ALSA_DEBUG", "0");
        std::env::set_var("PW_LOG", "0");
    }
}

/// Preferred device names for GNOME/PipeWire environments.
const PREFERRED_DEVICES: &[&str] = &["pipewire", "pulse", "PulseAudio"];

/// Device name patterns to filter out (not useful for voice input).
const FILTERED_PATTERNS: &[&str] = &[
    "surround",
    "front:",
    "rear:",
    "center:",
    "side:",
    "Digital Output",
    "HDMI",
    "S/PDIF",
];

fn should_filter_device(name: &str) -> bool {
    let lower = name.to_lowercase();
    FILTERED_PATTERNS
        .iter()
        .any(|pattern| lower.contains(&pattern.to_lowercase()))
}

fn is_preferred_device(name: &str) -> bool {
    let lower = name.to_lowercase();
    PREFERRED_DEVICES
        .iter()
        .any(|pref| lower.contains(&pref.to_lowercase()))
}

/// List available audio input devices, filtering obviously unusable ones
/// and marking preferred devices with "\[recommended\]".
///
/// # Errors
/// Returns `DubashError::AudioCapture` if device enumeration fails.
pub fn list_devices() -> Result<Vec<String>> {
    let (host, devices) = with_suppressed_stderr(|| {
        let host = cpal::default_host();
        let devices = host.input_devices();
        (host, devices)
    });
    let _ = host; // keep host alive while iterating devices
    let devices = devices.map_err(|e| DubashError::AudioCapture {
        message: format!("Failed to enumerate input devices: {}", e),
    })?;

    let mut device_names = Vec::new();
    for device in devices {
        if let Ok(name) = device.name() {
            if should_filter_device(&name) {
                continue;
            }
            if is_preferred_device(&name) {
                device_names.push(format!("{} [recommended]", name));
            } else {
                device_names.push(name);
            }
        }
    }

    Ok(device_names)
}

/// Get the best default input device, preferring PipeWire/PulseAudio so the
/// desktop's device selection is respected.
fn get_best_default_device() -> Result<cpal::Device> {
    with_suppressed_stderr(|| {
        let host = cpal::default_host();

        if let Ok(devices) = host.input_devices() {
            for device in devices {
                if let Ok(name) = device.name()
                    && is_preferred_device(&name)
                {
                    return Ok(device);
                }
            }
        }

        host.default_input_device()
            .ok_or_else(|| DubashError::AudioDeviceNotFound {
                device: "default".to_string(),
            })
    })
}

fn find_device(device_name: Option<&str>) -> Result<cpal::Device> {
    with_suppressed_stderr(|| match device_name {
        Some(name) => {
            let host = cpal::default_host();
            let devices = host.input_devices().map_err(|e| DubashError::AudioCapture {
                message: format!("Failed to enumerate devices: {}", e),
            })?;
            for device in devices {
                if let Ok(dev_name) = device.name()
                    && dev_name == name
                {
                    return Ok(device);
                }
            }
            Err(DubashError::AudioDeviceNotFound {
                device: name.to_string(),
            })
        }
        None => get_best_default_device(),
    })
}

/// Wrapper for cpal::Stream to make it Send.
///
/// SAFETY: The stream is owned by exactly one MicrophoneCapture and only
/// accessed from the thread that drives it; nothing shares it.
struct SendableStream(cpal::Stream);

unsafe impl Send for SendableStream {}

/// A running microphone capture feeding frames into a capture session.
///
/// Captures mono i16 at the requested rate, falling back to f32 with
/// software conversion for devices that only expose float formats.
/// PipeWire/PulseAudio convert rate and channel count transparently.
/// Capture stops when this guard is dropped or [`MicrophoneCapture::stop`]
/// is called; finalizing the session is the caller's separate, explicit step.
pub struct MicrophoneCapture {
    _stream: SendableStream,
    device_name: String,
}

impl MicrophoneCapture {
    /// Open the device and start streaming frames into `feeder`.
    ///
    /// # Arguments
    /// * `device_name` - Optional device name; None picks the best default
    /// * `feeder` - Delivery handle of the capture session to fill
    /// * `sample_rate` - Requested capture rate in Hz
    ///
    /// # Errors
    /// Returns errors if the device is missing or no supported format works.
    pub fn start(
        device_name: Option<&str>,
        feeder: FrameFeeder,
        sample_rate: u32,
    ) -> Result<Self> {
        let device = find_device(device_name)?;
        let name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_callback = |err| {
            eprintln!("Audio stream error: {}", err);
        };

        // Try i16 mono first — the zero-conversion path.
        let i16_feeder = feeder.clone();
        let stream = match device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                i16_feeder.push(data);
            },
            err_callback,
            None,
        ) {
            Ok(stream) => stream,
            Err(_) => {
                // Fall back to f32 for devices that only expose float formats.
                let f32_feeder = feeder;
                device
                    .build_input_stream(
                        &config,
                        move |data: &[f32], _: &cpal::InputCallbackInfo| {
                            let frame: Vec<i16> = data
                                .iter()
                                .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                                .collect();
                            f32_feeder.push(&frame);
                        },
                        err_callback,
                        None,
                    )
                    .map_err(|e| DubashError::AudioCapture {
                        message: format!(
                            "Device '{}' supports neither i16 nor f32 mono capture: {}",
                            name, e
                        ),
                    })?
            }
        };

        stream.play().map_err(|e| DubashError::AudioCapture {
            message: format!("Failed to start capture on '{}': {}", name, e),
        })?;

        Ok(Self {
            _stream: SendableStream(stream),
            device_name: name,
        })
    }

    /// Name of the device being captured from.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Stop capturing. Dropping the guard has the same effect.
    pub fn stop(self) {}
}
