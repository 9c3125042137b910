use crate::trigger::{TriggerMode, TriggerPolicy, TriggerSettings};
use clap::Parser;

#[derive(Parser)]
#[command(name = "chat-study-kit")]
#[command(version = "1.3.0")]
#[command(about = "Staged finish-button triggers and survey configuration tooling for LLM chat studies")]
pub struct Args {
    /// Validate a survey configuration JSON file and report the first violation
    #[arg(long)]
    pub validate: Option<String>,

    /// Print the default survey configuration as JSON
    #[arg(long)]
    pub default_config: bool,

    /// Simulate message-based staging for N submissions
    #[arg(long)]
    pub simulate: Option<u32>,

    /// Simulate time-based staging up to N minutes (30-second ticks)
    #[arg(long)]
    pub simulate_time: Option<f64>,

    /// Use the fallback staging policy instead of the configured thresholds
    #[arg(long)]
    pub fallback: bool,

    /// Stage thresholds for simulation (messages or minutes, depending on mode)
    #[arg(long, default_value = "5")]
    pub stage1: f64,

    #[arg(long, default_value = "10")]
    pub stage2: f64,

    #[arg(long, default_value = "15")]
    pub stage3: f64,

    /// Backend base URL
    #[arg(long, default_value = "http://localhost:5000")]
    pub backend: String,

    /// Send one chat message to the backend and print the reply
    #[arg(long)]
    pub probe: Option<String>,
}

/// Build the staging policy the simulation flags describe.
pub fn simulation_policy(args: &Args) -> TriggerPolicy {
    if args.fallback {
        return TriggerPolicy::Fallback;
    }
    let mode = if args.simulate_time.is_some() {
        TriggerMode::Time
    } else {
        TriggerMode::Messages
    };
    TriggerPolicy::Configured(TriggerSettings {
        trigger_type: mode,
        stage1_messages: args.stage1 as u32,
        stage2_messages: args.stage2 as u32,
        stage3_messages: args.stage3 as u32,
        stage1_time: args.stage1,
        stage2_time: args.stage2,
        stage3_time: args.stage3,
    })
}
