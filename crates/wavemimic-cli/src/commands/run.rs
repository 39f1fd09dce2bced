use std::path::Path;

use serde::Serialize;
use wavemimic_core::{
    CrispReport, DEFAULT_ITERATIONS, ProxyCacheStats, Reconstruction, TraceSummary, WaveEngine,
    crispr_proxy,
};

use super::CommandResult;

/// Everything one driver run produces, in JSON form.
#[derive(Serialize)]
struct RunOutput<'a> {
    version: &'static str,
    final_entropy: f64,
    snapshot_means: Vec<f64>,
    summary: TraceSummary,
    fingerprint: String,
    cache: ProxyCacheStats,
    report: &'a CrispReport,
    report_text: String,
    reconstruction: &'a Reconstruction,
}

pub fn run(label: &str, json: bool, output: Option<&str>) -> CommandResult {
    let mut engine = WaveEngine::default();
    log::info!(
        "running {DEFAULT_ITERATIONS} iterations on a {}-dimensional state",
        engine.dimension()
    );
    let recon = engine.fractal_recon(DEFAULT_ITERATIONS)?;
    let report = crispr_proxy(label, recon.final_entropy);
    let means = recon.snapshot_means();

    if json || output.is_some() {
        let out = RunOutput {
            version: wavemimic_core::VERSION,
            final_entropy: recon.final_entropy,
            snapshot_means: means.clone(),
            summary: recon.summary(),
            fingerprint: recon.fingerprint(),
            cache: engine.cache_stats(),
            report: &report,
            report_text: report.to_string(),
            reconstruction: &recon,
        };
        if let Some(path) = output {
            super::write_json(Path::new(path), &out)?;
        }
        if json {
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }
    }

    println!("Final Entropy H: {:.2}", recon.final_entropy);
    println!("Node Densities Layered: {means:?}");
    println!("{report}");
    Ok(())
}
