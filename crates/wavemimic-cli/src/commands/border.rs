use wavemimic_core::{BORDER_FALLBACK, BORDER_THRESHOLD};

use super::CommandResult;

pub fn run(entropy: f64, method: &str) -> CommandResult {
    let estimator = super::parse_border_method(method);
    let border = estimator.estimate(entropy)?;
    println!("Border ({method}) at H={entropy:.4}: {border:.6}");
    if entropy >= BORDER_THRESHOLD {
        println!(
            "Note: decision reports saturate to {BORDER_FALLBACK} at H >= {BORDER_THRESHOLD}."
        );
    }
    Ok(())
}
