//! CLI for wavemimic — run the entropy-wave reconstruction and report on it.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wavemimic")]
#[command(about = "wavemimic — memoized entropy-wave reconstruction and decision report")]
#[command(version = wavemimic_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reconstruction loop once with default parameters and print
    /// the final entropy, snapshot means and decision report (default).
    Run {
        /// Label passed to the decision report
        #[arg(long, default_value = commands::DEFAULT_LABEL)]
        label: String,

        /// Print the full result as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also write the JSON result to this path
        #[arg(long)]
        output: Option<String>,
    },

    /// Produce a decision report for an externally supplied entropy value
    Crisp {
        /// Label passed to the decision report
        #[arg(long, default_value = commands::DEFAULT_LABEL)]
        label: String,

        /// Entropy value to decide on
        #[arg(long, allow_hyphen_values = true)]
        entropy: f64,

        /// Border estimator: closed|laplace (default), quadrature|simpson|numeric
        #[arg(long, default_value = "closed")]
        method: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate the border estimator at one entropy value
    Border {
        /// Entropy value (transform argument)
        #[arg(long, allow_hyphen_values = true)]
        entropy: f64,

        /// Border estimator: closed|laplace (default), quadrature|simpson|numeric
        #[arg(long, default_value = "closed")]
        method: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run {
        label: commands::DEFAULT_LABEL.to_string(),
        json: false,
        output: None,
    });

    let result = match command {
        Commands::Run {
            label,
            json,
            output,
        } => commands::run::run(&label, json, output.as_deref()),
        Commands::Crisp {
            label,
            entropy,
            method,
            json,
        } => commands::crisp::run(&label, entropy, &method, json),
        Commands::Border { entropy, method } => commands::border::run(entropy, &method),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_accepts_aliases_and_unknown_names() {
        for name in ["laplace", "simpson", "numeric", "bogus"] {
            let args = ["wavemimic", "border", "--entropy", "0.5", "--method", name];
            let cli = Cli::try_parse_from(args).unwrap();
            match cli.command {
                Some(Commands::Border { method, .. }) => assert_eq!(method, name),
                _ => panic!("expected border subcommand"),
            }
        }
    }

    #[test]
    fn no_subcommand_defaults_to_run() {
        let cli = Cli::try_parse_from(["wavemimic"]).unwrap();
        assert!(cli.command.is_none());
    }
}
