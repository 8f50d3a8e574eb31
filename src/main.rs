//! Runs the tone sweep against the bundled reference backend.
//!
//! Exit status: 0 when every check passes, 1 when a check failed, 2 when the
//! configuration or a backend setup is invalid.
use std::process::ExitCode;

use tonecheck::{
    run_sweep_with, FftBackend, Precision, ReferenceBackend, SingleBackend, SizeReport, Summary,
    SweepConfig,
};

fn run<B: FftBackend>(backend: &B, config: &SweepConfig) -> ExitCode {
    log::info!("checking {}", backend.name());
    let outcome = run_sweep_with(backend, config, |size| print!("{}", SizeReport(size)));
    match outcome {
        Ok(outcome) => {
            print!("{}", Summary(&outcome));
            if outcome.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match SweepConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };
    match config.precision {
        Precision::Double => run(&ReferenceBackend::new(), &config),
        Precision::Single => run(&SingleBackend::new(), &config),
    }
}
