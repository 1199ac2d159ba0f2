//! Built-in verification workflow
//!
//! The shipped pipeline: formatting, build, lint and test across the three
//! platform targets, with platform-specific dependency provisioning. The
//! Windows-only OEM dependency step is doubly gated: its guard denies pull
//! requests (forks never receive secrets), and it requires the OEM download
//! URL secret. Build, lint and test carry the trigger guard but no secret
//! requirement, so on a push without the secret they still attempt
//! execution against whatever the dependency step left behind.

use crate::core::{
    config::{PipelineConfig, StepConfig, UnlessConfig},
    guard::{Platform, TriggerKind},
    pipeline::PipelineRun,
    step::Step,
};
use std::collections::HashMap;

/// Secret holding the OEM download URL for the Windows packet-capture SDK
pub const NPCAP_OEM_URL: &str = "NPCAP_OEM_URL";

fn step(name: &str, run: &str) -> StepConfig {
    StepConfig {
        name: name.to_string(),
        run: run.to_string(),
        platforms: None,
        triggers: None,
        unless: Vec::new(),
        secrets: Vec::new(),
        env: HashMap::new(),
    }
}

/// The (Windows, PullRequest) denial shared by every step that cannot run
/// on fork pull requests against Windows
fn unless_windows_pull_request() -> Vec<UnlessConfig> {
    vec![UnlessConfig {
        platform: Platform::Windows,
        trigger: TriggerKind::PullRequest,
    }]
}

/// The built-in verification pipeline, steps in execution order
pub fn verification_config() -> PipelineConfig {
    PipelineConfig {
        name: "verify".to_string(),
        version: None,
        steps: vec![
            step(
                "checkout",
                "git fetch --depth 1 origin && git checkout FETCH_HEAD",
            ),
            step(
                "toolchain install",
                "rustup toolchain install stable --profile minimal --component rustfmt,clippy",
            ),
            StepConfig {
                platforms: Some(vec![Platform::Linux]),
                ..step(
                    "install linux deps",
                    "sudo apt-get update && sudo apt-get install -y libpcap-dev libasound2-dev libfontconfig1-dev libgtk-3-dev",
                )
            },
            StepConfig {
                platforms: Some(vec![Platform::Windows]),
                unless: unless_windows_pull_request(),
                secrets: vec![NPCAP_OEM_URL.to_string()],
                env: HashMap::from([("LIB".to_string(), "npcap-sdk/Lib/x64".to_string())]),
                ..step(
                    "install windows deps",
                    "curl -fsSL \"$NPCAP_OEM_URL\" -o npcap-sdk.zip && unzip -o npcap-sdk.zip -d npcap-sdk",
                )
            },
            step("fmt check", "cargo fmt --all -- --check"),
            StepConfig {
                unless: unless_windows_pull_request(),
                ..step("build", "cargo build --verbose")
            },
            StepConfig {
                unless: unless_windows_pull_request(),
                ..step("lint", "cargo clippy -- -D warnings")
            },
            StepConfig {
                unless: unless_windows_pull_request(),
                ..step("test", "cargo test --verbose")
            },
        ],
    }
}

/// The built-in verification step sequence
pub fn verification_steps() -> Vec<Step> {
    verification_config().to_steps()
}

/// Instantiate the built-in workflow for one matrix cell
pub fn verification_run(platform: Platform, trigger: TriggerKind) -> PipelineRun {
    PipelineRun::from_config(&verification_config(), platform, trigger)
}
