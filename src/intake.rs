use std::path::{Path, PathBuf};
use std::thread;

use base64::{Engine as _, engine::general_purpose};
use crossbeam_channel::{Receiver, Sender, unbounded};
use image::RgbaImage;
use log::{debug, info, warn};

use crate::error::IntakeError;

/// A decoded upload: the RGBA pixels plus a data URI of the original bytes.
#[derive(Clone)]
pub struct LoadedImage {
    data_uri: String,
    pixels: RgbaImage,
}

impl LoadedImage {
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("data_uri_len", &self.data_uri.len())
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Decode image bytes and wrap the originals in a `data:<mime>;base64,…` URI.
pub fn decode_bytes(bytes: &[u8]) -> Result<LoadedImage, IntakeError> {
    let format = image::guess_format(bytes)?;
    let decoded = image::load_from_memory(bytes)?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(IntakeError::EmptyImage);
    }

    let mut data_uri = String::with_capacity(bytes.len() / 3 * 4 + 32);
    data_uri.push_str("data:");
    data_uri.push_str(format.to_mime_type());
    data_uri.push_str(";base64,");
    general_purpose::STANDARD.encode_string(bytes, &mut data_uri);

    Ok(LoadedImage {
        data_uri,
        pixels: decoded.to_rgba8(),
    })
}

fn decode_file(path: &Path) -> Result<LoadedImage, IntakeError> {
    let bytes = std::fs::read(path).map_err(|source| IntakeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_bytes(&bytes)
}

struct Completion {
    generation: u64,
    result: Result<LoadedImage, IntakeError>,
}

/// Asynchronous image loading with last-selection-wins semantics.
///
/// Each `begin_*` call bumps the generation and spawns a decode thread; only
/// completions carrying the current generation are ever surfaced by `poll`,
/// so a slow decode of an earlier selection can never clobber a newer one.
pub struct ImageIntake {
    generation: u64,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl Default for ImageIntake {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageIntake {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            generation: 0,
            tx,
            rx,
        }
    }

    /// The generation of the most recent selection.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start decoding the file at `path`; returns the new generation.
    pub fn begin_file(&mut self, path: PathBuf) -> u64 {
        let generation = self.next_generation();
        info!("loading image (generation {generation}): {}", path.display());
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = decode_file(&path);
            // The receiver only disappears on shutdown
            let _ = tx.send(Completion { generation, result });
        });
        generation
    }

    /// Start decoding in-memory bytes (drag-dropped files); returns the new generation.
    pub fn begin_bytes(&mut self, name: &str, bytes: Vec<u8>) -> u64 {
        let generation = self.next_generation();
        info!(
            "loading image (generation {generation}): {name} ({} bytes)",
            bytes.len()
        );
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = decode_bytes(&bytes);
            let _ = tx.send(Completion { generation, result });
        });
        generation
    }

    /// Invalidate any in-flight decode without starting a new one.
    pub fn cancel(&mut self) {
        self.next_generation();
    }

    /// Drain completions, discarding any that were superseded by a newer
    /// selection. Returns the current selection's result if it has arrived.
    pub fn poll(&mut self) -> Option<Result<LoadedImage, IntakeError>> {
        let mut current = None;
        while let Ok(completion) = self.rx.try_recv() {
            if completion.generation == self.generation {
                if let Err(err) = &completion.result {
                    warn!("image decode failed: {err}");
                }
                current = Some(completion.result);
            } else {
                debug!(
                    "discarding superseded decode (generation {} != {})",
                    completion.generation, self.generation
                );
            }
        }
        current
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([255, 0, 0, 255]),
        ));
        let mut buffer = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, image::ImageFormat::Png)
            .expect("encode test image");
        buffer.into_inner()
    }

    fn poll_until(intake: &mut ImageIntake) -> Result<LoadedImage, IntakeError> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(result) = intake.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "decode never completed");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn decode_bytes_produces_pixels_and_data_uri() {
        let loaded = decode_bytes(&png_bytes(4, 2)).expect("decode");
        assert_eq!(loaded.width(), 4);
        assert_eq!(loaded.height(), 2);
        assert!(loaded.data_uri().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn decode_bytes_rejects_garbage() {
        assert!(matches!(
            decode_bytes(b"definitely not an image"),
            Err(IntakeError::Decode(_))
        ));
    }

    #[test]
    fn begin_bytes_delivers_through_poll() {
        let mut intake = ImageIntake::new();
        intake.begin_bytes("test.png", png_bytes(3, 3));
        let loaded = poll_until(&mut intake).expect("decode");
        assert_eq!(loaded.width(), 3);
    }

    #[test]
    fn superseded_completion_is_never_surfaced() {
        let mut intake = ImageIntake::new();

        // Simulate file A's decode arriving after file B was selected: the
        // stale generation must be discarded, B's result applied.
        let stale_generation = intake.next_generation();
        let current_generation = intake.next_generation();

        intake
            .tx
            .send(Completion {
                generation: stale_generation,
                result: decode_bytes(&png_bytes(1, 1)),
            })
            .unwrap();
        assert!(intake.poll().is_none());

        intake
            .tx
            .send(Completion {
                generation: current_generation,
                result: decode_bytes(&png_bytes(2, 2)),
            })
            .unwrap();
        let loaded = intake.poll().expect("current result").expect("decode");
        assert_eq!(loaded.width(), 2);
    }

    #[test]
    fn stale_result_arriving_after_the_current_one_is_ignored() {
        let mut intake = ImageIntake::new();
        let stale_generation = intake.next_generation();
        let current_generation = intake.next_generation();

        // Out-of-order arrival: B first, then A. B must win.
        intake
            .tx
            .send(Completion {
                generation: current_generation,
                result: decode_bytes(&png_bytes(2, 2)),
            })
            .unwrap();
        intake
            .tx
            .send(Completion {
                generation: stale_generation,
                result: decode_bytes(&png_bytes(1, 1)),
            })
            .unwrap();

        let loaded = intake.poll().expect("current result").expect("decode");
        assert_eq!(loaded.width(), 2);
        assert!(intake.poll().is_none());
    }

    #[test]
    fn cancel_supersedes_an_in_flight_decode() {
        let mut intake = ImageIntake::new();
        let generation = intake.next_generation();
        intake.cancel();

        intake
            .tx
            .send(Completion {
                generation,
                result: decode_bytes(&png_bytes(1, 1)),
            })
            .unwrap();
        assert!(intake.poll().is_none());
    }
}
