use image_reconstruct::config::reconstruct::load_config;
use image_reconstruct::image::io::{load_rgba_image, save_rgba, write_json_file};
use image_reconstruct::image::RgbaBuffer;
use image_reconstruct::{ReconstructionEngine, StepStats};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::env;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let source = load_rgba_image(&config.input)?;
    let run = &config.run;
    let seed = run.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut engine =
        ReconstructionEngine::with_rng(source.as_view(), run.probability, config.engine, &mut rng)
            .map_err(|e| format!("Failed to build engine: {e}"))?;

    let (w, h) = (engine.width(), engine.height());
    let mut surface = RgbaBuffer::new(w, h);
    render_to(&engine, &mut surface, &config.output.grayscale_image, Draw::Original)?;
    render_to(&engine, &mut surface, &config.output.corrupted_image, Draw::Corrupted)?;

    let initial_rmse = engine.rmse();
    let t0 = Instant::now();
    let mut last: Option<StepStats> = None;
    for step in 1..=run.steps {
        let stats = engine
            .gradient_step(run.eta)
            .map_err(|e| format!("Gradient step failed: {e}"))?;
        if run.log_every > 0 && step % run.log_every == 0 {
            info!(
                "step {}/{} max_change={:.4} clamped={} rmse={:.3}",
                step,
                run.steps,
                stats.max_abs_change,
                stats.clamped,
                engine.rmse()
            );
        }
        last = Some(stats);
    }
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

    render_to(&engine, &mut surface, &config.output.reconstructed_image, Draw::Reconstructed)?;

    let summary = ReconstructionSummary {
        width: w,
        height: h,
        seed,
        probability: run.probability,
        corrupted_pixels: engine.mask().corrupted_count(),
        eta: run.eta,
        steps: run.steps,
        initial_rmse,
        final_rmse: engine.rmse(),
        final_energy: engine.energy(),
        last_step: last,
        elapsed_ms,
    };
    if let Some(path) = &config.output.summary_json {
        write_json_file(path, &summary)?;
        println!("Saved summary to {}", path.display());
    }

    println!(
        "Reconstructed {}x{} image ({} corrupted pixels) in {} steps: rmse {:.3} -> {:.3}",
        w, h, summary.corrupted_pixels, run.steps, initial_rmse, summary.final_rmse
    );
    println!(
        "Saved reconstruction to {}",
        config.output.reconstructed_image.display()
    );

    Ok(())
}

#[derive(Clone, Copy)]
enum Draw {
    Original,
    Corrupted,
    Reconstructed,
}

fn render_to(
    engine: &ReconstructionEngine,
    surface: &mut RgbaBuffer,
    path: &Path,
    which: Draw,
) -> Result<(), String> {
    let drawn = match which {
        Draw::Original => engine.draw_original_image(surface),
        Draw::Corrupted => engine.draw_corrupted_image(surface),
        Draw::Reconstructed => engine.draw_reconstructed_image(surface),
    };
    drawn.map_err(|e| format!("Failed to render {}: {e}", path.display()))?;
    save_rgba(surface, path)
}

fn usage() -> String {
    "Usage: reconstruct_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReconstructionSummary {
    width: usize,
    height: usize,
    seed: u64,
    probability: f64,
    corrupted_pixels: usize,
    eta: f32,
    steps: usize,
    initial_rmse: f64,
    final_rmse: f64,
    final_energy: f64,
    last_step: Option<StepStats>,
    elapsed_ms: f64,
}
