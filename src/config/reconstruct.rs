use crate::engine::EngineOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct ReconstructToolConfig {
    #[serde(rename = "input")]
    pub input: PathBuf,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub engine: EngineOptions,
    pub output: ReconstructOutputConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Probability that a pixel is corrupted.
    pub probability: f64,
    /// Gradient step size.
    pub eta: f32,
    pub steps: usize,
    /// Fixed mask seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    /// Emit a progress line every N steps (0 disables).
    pub log_every: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            probability: 0.5,
            eta: 0.2,
            steps: 200,
            seed: None,
            log_every: 25,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReconstructOutputConfig {
    pub grayscale_image: PathBuf,
    pub corrupted_image: PathBuf,
    pub reconstructed_image: PathBuf,
    #[serde(default)]
    pub summary_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ReconstructToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(json: &str) -> Result<ReconstructToolConfig, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::InitialFill;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config(
            r#"{
                "input": "in.png",
                "output": {
                    "grayscale_image": "out/gray.png",
                    "corrupted_image": "out/corrupted.png",
                    "reconstructed_image": "out/reconstructed.png"
                }
            }"#,
        )
        .expect("config parses");
        assert_eq!(cfg.input, PathBuf::from("in.png"));
        assert_eq!(cfg.run.probability, 0.5);
        assert_eq!(cfg.run.steps, 200);
        assert!(cfg.run.seed.is_none());
        assert!(cfg.output.summary_json.is_none());
        assert_eq!(cfg.engine, EngineOptions::default());
    }

    #[test]
    fn run_and_engine_sections_override_defaults() {
        let cfg = parse_config(
            r#"{
                "input": "in.png",
                "run": { "probability": 0.9, "eta": 0.1, "seed": 5 },
                "engine": { "initial_fill": "zero", "luma": { "r": 0.21, "g": 0.72, "b": 0.07 } },
                "output": {
                    "grayscale_image": "g.png",
                    "corrupted_image": "c.png",
                    "reconstructed_image": "r.png",
                    "summary_json": "s.json"
                }
            }"#,
        )
        .expect("config parses");
        assert_eq!(cfg.run.probability, 0.9);
        assert!((cfg.run.eta - 0.1).abs() < 1e-6);
        assert_eq!(cfg.run.seed, Some(5));
        assert_eq!(cfg.run.steps, 200);
        assert_eq!(cfg.engine.initial_fill, InitialFill::Zero);
        let luma = cfg.engine.luma;
        let expected = crate::LumaWeights::LUMINOSITY;
        assert!((luma.r - expected.r).abs() < 1e-6);
        assert!((luma.g - expected.g).abs() < 1e-6);
        assert!((luma.b - expected.b).abs() < 1e-6);
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_config(Path::new("/no/such/reconstruct.json")).unwrap_err();
        assert!(err.contains("reconstruct.json"));
    }
}
