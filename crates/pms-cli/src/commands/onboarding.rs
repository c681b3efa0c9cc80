use clap::Args;
use serde_json::Value;

use pms_core::onboarding::{validate_application, OnboardingApplication};

use crate::input;

/// Arguments for onboarding application validation
#[derive(Args)]
pub struct OnboardingArgs {
    /// Path to a JSON/YAML file holding the application
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_onboarding(args: OnboardingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let application: OnboardingApplication = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("Provide --input file or pipe an application JSON via stdin".into());
    };

    let output = validate_application(&application)?;
    Ok(serde_json::to_value(output)?)
}
