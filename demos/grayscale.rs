//! Grayscale conversion pipeline
//!
//! Mirrors the classic extract/convert/display exercise: a source produces
//! RGB frames, the middle stage converts each to grayscale, and the sink
//! "displays" them by logging a checksum per frame. A real deployment
//! would put video capture behind the source and a window behind the sink.
//!
//! Usage: RUST_LOG=debug cargo run --example grayscale --release

use frame_pipeline::{FnSink, FrameSource, MapTransform, PipelineBuilder, Result};

const WIDTH: usize = 320;
const HEIGHT: usize = 240;

/// An RGB frame as a flat pixel buffer
struct RgbFrame {
    index: u64,
    pixels: Vec<u8>,
}

/// Synthesizes a moving gradient, standing in for a capture device.
struct SyntheticCamera {
    next_index: u64,
}

impl FrameSource for SyntheticCamera {
    type Frame = RgbFrame;

    fn next_frame(&mut self) -> Result<Option<RgbFrame>> {
        let index = self.next_index;
        self.next_index += 1;

        let mut pixels = Vec::with_capacity(WIDTH * HEIGHT * 3);
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                pixels.push((x as u64 + index) as u8);
                pixels.push((y as u64 + index) as u8);
                pixels.push(index as u8);
            }
        }
        Ok(Some(RgbFrame { index, pixels }))
    }

    fn name(&self) -> &str {
        "camera"
    }
}

/// ITU-R BT.601 luma, integer approximation
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let pipeline = PipelineBuilder::new()
        .capacity(10)
        .cutoff(72)
        .build(
            SyntheticCamera { next_index: 0 },
            MapTransform::new("grayscale", |frame: RgbFrame| {
                let gray: Vec<u8> = frame
                    .pixels
                    .chunks_exact(3)
                    .map(|px| luma(px[0], px[1], px[2]))
                    .collect();
                Ok((frame.index, gray))
            }),
            FnSink::new("display", |(index, gray): (u64, Vec<u8>)| {
                let checksum: u64 = gray.iter().map(|&p| p as u64).sum();
                println!("frame {index}: {}x{} gray, checksum {checksum}", WIDTH, HEIGHT);
                Ok(())
            }),
        )?;

    let summary = pipeline.run()?;
    println!(
        "done: produced {}, transformed {}, displayed {}",
        summary.produced, summary.transformed, summary.consumed
    );

    Ok(())
}
