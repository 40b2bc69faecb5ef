/// Sound engine: the scroll swoosh and the game-over clip via rodio.
///
/// Both clips are generated procedurally as in-memory WAV buffers unless
/// config.toml points at replacement files, which are read once at
/// startup by `SoundAssets::load`. Playback is fire-and-forget
/// (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use std::io;

use crate::config::SoundConfig;

/// Raw clip bytes read from disk. `None` means "use the built-in clip".
#[derive(Default)]
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
pub struct SoundAssets {
    pub swoosh: Option<Vec<u8>>,
    pub death: Option<Vec<u8>>,
}

impl SoundAssets {
    /// Read configured clips. A configured file that cannot be read is an
    /// error; the caller treats it as a startup failure.
    pub fn load(cfg: &SoundConfig) -> io::Result<Self> {
        let read = |path: &Option<std::path::PathBuf>| -> io::Result<Option<Vec<u8>>> {
            match path {
                Some(p) => std::fs::read(p)
                    .map(Some)
                    .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", p.display()))),
                None => Ok(None),
            }
        };
        Ok(SoundAssets {
            swoosh: read(&cfg.swoosh_file)?,
            death: read(&cfg.death_file)?,
        })
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::SoundAssets;

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_swoosh: Arc<Vec<u8>>,
        sfx_death: Arc<Vec<u8>>,
        death_volume: f32,
    }

    impl SoundEngine {
        pub fn new(assets: SoundAssets, death_volume: f32) -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };

            let sfx_swoosh = Arc::new(pick_clip("swoosh", assets.swoosh, gen_swoosh));
            let sfx_death = Arc::new(pick_clip("death", assets.death, gen_death));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_swoosh,
                sfx_death,
                death_volume,
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>, volume: f32) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.set_volume(volume);
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_swoosh(&self) { self.play(&self.sfx_swoosh, 1.0); }
        pub fn play_death(&self) { self.play(&self.sfx_death, self.death_volume); }
    }

    /// Use the loaded file if rodio can decode it, else the generated clip.
    fn pick_clip(name: &str, loaded: Option<Vec<u8>>, generate: fn() -> Vec<f32>) -> Vec<u8> {
        if let Some(bytes) = loaded {
            match rodio::Decoder::new(Cursor::new(bytes.clone())) {
                Ok(_) => return bytes,
                Err(e) => log::warn!("{name} clip is not playable ({e}), using built-in sound"),
            }
        }
        make_wav(&generate())
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Swoosh: filtered noise with a rising then falling sweep
    fn gen_swoosh() -> Vec<f32> {
        let duration = 0.35;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 12345;
        let mut low = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                // One-pole low-pass whose cutoff sweeps up and back down
                let sweep = (t * std::f32::consts::PI).sin();
                let alpha = 0.05 + sweep * 0.45;
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                low += alpha * (noise - low);
                let env = sweep.powf(0.7);
                low * env * 0.5
            })
            .collect()
    }

    /// Death: sad descending tone
    fn gen_death() -> Vec<f32> {
        let notes = [440.0_f32, 370.0, 311.0, 261.0]; // A4→F#4→Eb4→C4
        let note_dur = 0.18;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin();
                samples.push(wave * env * 0.8);
            }
        }
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for (i, s) in samples.iter_mut().enumerate().skip(total - fade_len) {
            *s *= (total - i) as f32 / fade_len as f32;
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn generated_clips_are_valid_wav() {
            for samples in [gen_swoosh(), gen_death()] {
                let wav = make_wav(&samples);
                assert_eq!(&wav[0..4], b"RIFF");
                assert_eq!(&wav[8..12], b"WAVE");
                assert_eq!(wav.len(), 44 + samples.len() * 2);
                assert!(rodio::Decoder::new(Cursor::new(wav)).is_ok());
            }
        }

        #[test]
        fn undecodable_file_falls_back_to_generated_clip() {
            let clip = pick_clip("swoosh", Some(b"not a wav".to_vec()), gen_swoosh);
            assert_eq!(&clip[0..4], b"RIFF");
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(_assets: SoundAssets, _death_volume: f32) -> Option<Self> { Some(SoundEngine) }
    pub fn play_swoosh(&self) {}
    pub fn play_death(&self) {}
}
