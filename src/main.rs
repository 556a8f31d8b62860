use anyhow::{Context, Result};
use aria::speech::{ConsoleCapture, ConsoleMicrophone, ConsolePlayback};
use aria::{
    AssistantConfig, CommandProcessor, PermissionState, Role, SessionUpdate,
    VoiceSessionController,
};
use clap::Parser;
use crossbeam_channel::{bounded, select, Receiver};
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Talk to the assistant from a terminal. Typed lines are treated as speech.
#[derive(Parser, Debug)]
#[command(name = "aria", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "ARIA_CONFIG")]
    config: Option<PathBuf>,

    /// Assistant name (also the wake word)
    #[arg(long)]
    name: Option<String>,

    /// Show replies without speaking them
    #[arg(long)]
    mute: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "aria=info,warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => AssistantConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AssistantConfig::default(),
    };
    if let Some(name) = cli.name {
        config = config.with_name(name);
    }
    config.validate()?;

    info!("Starting {} voice assistant", config.assistant_name);

    let capture = ConsoleCapture::new();
    let microphone = capture.microphone();
    let playback = if cli.mute {
        ConsolePlayback::muted()
    } else {
        ConsolePlayback::new()
    };

    let processor = CommandProcessor::new(&config);
    let mut controller =
        VoiceSessionController::new(config, processor, Box::new(capture), Box::new(playback));
    let updates = controller.subscribe();

    let (line_tx, line_rx) = bounded::<String>(16);
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    print_welcome(&controller);

    loop {
        select! {
            recv(line_rx) -> line => match line {
                Ok(line) => {
                    if !handle_line(&mut controller, &microphone, &line) {
                        break;
                    }
                }
                // stdin closed
                Err(_) => break,
            },
            default(Duration::from_millis(50)) => {}
        }

        controller.pump();
        print_updates(&controller, &updates);
    }

    controller.stop_capture();
    controller.cancel_playback();
    info!("Goodbye");
    Ok(())
}

/// Returns false when the session should end
fn handle_line(
    controller: &mut VoiceSessionController,
    microphone: &ConsoleMicrophone,
    line: &str,
) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return true;
    }

    let Some(command) = line.strip_prefix('/') else {
        // Typing is speaking: open the microphone if needed
        if !controller.state().is_listening() && controller.start_capture().is_err() {
            return true;
        }
        microphone.hear(line);
        return true;
    };

    match command.to_lowercase().as_str() {
        "quit" | "exit" => return false,
        "listen" => {
            let _ = controller.toggle_capture();
        }
        "stop" => controller.cancel_playback(),
        "clear" => {
            controller.clear_conversation();
            println!("Conversation cleared.");
        }
        "status" => {
            let state = controller.state();
            println!(
                "{} ({}), microphone permission: {}",
                state.status(),
                state.hint(),
                controller.permission()
            );
        }
        "history" => match controller.transcript().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Could not export transcript: {e}"),
        },
        "shortcuts" => {
            for shortcut in &controller.config().shortcuts {
                println!("  /{:<10} {}", shortcut.label.to_lowercase(), shortcut.phrase);
            }
        }
        "commands" => print_commands(),
        label => match controller.config().shortcut(label).cloned() {
            Some(shortcut) => {
                controller.dispatch_shortcut(&shortcut.phrase);
            }
            None => println!("Unknown command /{label}. Type /commands for a list."),
        },
    }
    true
}

fn print_updates(controller: &VoiceSessionController, updates: &Receiver<SessionUpdate>) {
    let name = &controller.config().assistant_name;
    for update in updates.try_iter() {
        match update {
            SessionUpdate::MessageAppended(message) => {
                let speaker = match message.role {
                    Role::User => "You",
                    Role::Assistant => name.as_str(),
                };
                println!("{speaker}: {}", message.content);
            }
            SessionUpdate::StateChanged(state) if !state.is_idle() => {
                println!("  [{}]", state.status());
            }
            SessionUpdate::PermissionChanged(PermissionState::Denied) => {
                println!("  Microphone access required. Please allow permissions and try again.");
            }
            _ => {}
        }
    }
}

fn print_welcome(controller: &VoiceSessionController) {
    let config = controller.config();
    println!("Hello! I'm {}", config.assistant_name);
    println!(
        "Your {}. Type and press enter to speak.",
        config.assistant_title
    );
    if let Some(first) = config.shortcuts.first() {
        println!("Try: \"{}\" or \"Calculate 12 + 8\"", first.phrase);
    }
    print_commands();
}

fn print_commands() {
    println!("Commands: /listen /stop /clear /status /history /shortcuts /quit");
}
