use chat_study_kit::api::BackendClient;
use chat_study_kit::cli::{simulation_policy, Args};
use chat_study_kit::survey::SurveyDocument;
use chat_study_kit::trigger::{ButtonStage, TriggerEngine, CLOCK_TICK};
use clap::Parser;
use colored::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if args.default_config {
        let doc = SurveyDocument::default();
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    if let Some(path) = &args.validate {
        return validate_file(path);
    }

    if let Some(runs) = args.simulate {
        simulate_messages(&args, runs);
        return Ok(());
    }

    if let Some(minutes) = args.simulate_time {
        simulate_time(&args, minutes);
        return Ok(());
    }

    if let Some(message) = &args.probe {
        let client = BackendClient::new(&args.backend);
        eprintln!("[probe] sending 1 message to {}", args.backend);
        let reply = client.send_chat_message(message).await?;
        println!("{reply}");
        return Ok(());
    }

    eprintln!("Nothing to do. Try --simulate, --validate, --default-config, or --probe.");
    Ok(())
}

fn validate_file(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let doc: SurveyDocument =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid survey document: {e}"))?;
    match doc.validate() {
        Ok(()) => {
            println!(
                "{} {} section(s), {} enabled",
                "valid:".green().bold(),
                doc.sections.len(),
                doc.sections.values().filter(|s| s.enabled()).count()
            );
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "invalid:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn simulate_messages(args: &Args, runs: u32) {
    let mut engine = TriggerEngine::new(simulation_policy(args));
    println!("message-based staging, {runs} submissions:");
    for i in 1..=runs {
        let before = engine.stage();
        let after = engine.on_message_submitted();
        if after != before {
            print_transition(i as f64, "msg", after, &engine);
        }
    }
    println!(
        "final stage {} after {} messages",
        engine.stage(),
        engine.message_count()
    );
}

fn simulate_time(args: &Args, minutes: f64) {
    let mut engine = TriggerEngine::new(simulation_policy(args));
    let tick_minutes = CLOCK_TICK.as_secs_f64() / 60.0;
    println!("time-based staging, {minutes} minute(s) at 30s ticks:");
    let mut elapsed = 0.0;
    while elapsed <= minutes {
        let before = engine.stage();
        let after = engine.evaluate_elapsed(elapsed);
        if after != before {
            print_transition(elapsed, "min", after, &engine);
        }
        elapsed += tick_minutes;
    }
    println!("final stage {} at {minutes} minute(s)", engine.stage());
}

fn print_transition(at: f64, unit: &str, stage: ButtonStage, engine: &TriggerEngine) {
    let style = engine.style();
    let label = format!("stage {stage}");
    let colored_label = match stage {
        ButtonStage::Hidden => label.dimmed(),
        ButtonStage::Stage1 => label.yellow(),
        ButtonStage::Stage2 => label.truecolor(255, 130, 102),
        ButtonStage::Stage3 => label.truecolor(255, 130, 102).bold(),
    };
    println!(
        "  {at:>6.1} {unit}: {} (visible={}, bg={}, bounce={})",
        colored_label,
        style.visible,
        style.background.css(),
        style.bounce
    );
}
