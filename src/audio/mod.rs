pub mod chime;

use chime::ChimeTone;

use log::debug;
use rodio::{OutputStream, Sink};
use std::thread;

// Rising two-note motif played when a phase completes
const CHIME_NOTES: [(f32, f32); 2] = [(880.0, 0.35), (1174.66, 0.55)];

/// Plays the phase-completion chime. Playback is best-effort: a missing or
/// blocked audio device degrades to silence, never to an error the timer
/// sees.
#[derive(Clone)]
pub struct Chime {
    enabled: bool,
}

impl Chime {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// For headless hosts and tests.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn play(&self) {
        if !self.enabled {
            return;
        }

        // Spawn a short-lived thread holding the non-Send audio objects
        let spawned = thread::Builder::new()
            .name("chime".to_string())
            .spawn(|| {
                if let Err(err) = play_blocking() {
                    debug!("completion chime unavailable: {err}");
                }
            });

        if let Err(err) = spawned {
            debug!("failed to spawn chime thread: {err}");
        }
    }
}

fn play_blocking() -> Result<(), String> {
    let (_stream, handle) = OutputStream::try_default()
        .map_err(|e| format!("failed to open audio output: {e}"))?;
    let sink = Sink::try_new(&handle).map_err(|e| format!("failed to create audio sink: {e}"))?;

    for (freq, duration) in CHIME_NOTES {
        sink.append(ChimeTone::new(freq, duration));
    }
    sink.sleep_until_end();

    Ok(())
}
