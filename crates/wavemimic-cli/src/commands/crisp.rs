use wavemimic_core::crispr_proxy_with;

use super::CommandResult;

pub fn run(label: &str, entropy: f64, method: &str, json: bool) -> CommandResult {
    let estimator = super::parse_border_method(method);
    let report = crispr_proxy_with(estimator.as_ref(), label, entropy)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
