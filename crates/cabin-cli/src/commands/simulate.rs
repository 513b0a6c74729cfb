use std::path::Path;

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use cabin_core::{
    AmbientKind, Autopilot, EventOutcome, IdleSource, Reckless, ScriptedSource, Session,
    SessionConfig, SessionEvent, SessionState, SignalSource,
};

/// Simulated time between samples.
const STEP_MS: u64 = 100;
/// Upper bound on session time; the session itself ends at 160s.
const RUN_MS: u64 = 170_000;

/// Built-in players for `cabin simulate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Player {
    /// Centered, silent, eyes open, pointer away.
    Idle,
    /// Plays every event by the rules.
    Autopilot,
    /// Stares at every face.
    Reckless,
    /// Replays a JSON signal script (`--script`).
    Script,
}

pub fn run(
    seed: Option<u64>,
    player: Player,
    script: Option<&Path>,
    config: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let mut session_config = match config {
        Some(path) => SessionConfig::load(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = seed {
        session_config = session_config.with_seed(seed);
    }

    let mut source: Box<dyn SignalSource> = match (player, script) {
        (_, Some(path)) => Box::new(
            ScriptedSource::load(path).map_err(|e| format!("{}: {e}", path.display()))?,
        ),
        (Player::Script, None) => return Err("--player script requires --script".to_string()),
        (Player::Idle, None) => Box::new(IdleSource),
        (Player::Autopilot, None) => Box::new(Autopilot::new()),
        (Player::Reckless, None) => Box::new(Reckless::new(session_config.screen_height)),
    };

    let seed = session_config.seed;
    let mut session = Session::new(session_config).map_err(|e| e.to_string())?;
    session.start(0).map_err(|e| e.to_string())?;
    session
        .drive(source.as_mut(), STEP_MS, RUN_MS)
        .map_err(|e| format!("simulation error: {e}"))?;

    if json {
        for logged in session.events().events() {
            let line = serde_json::to_string(logged).map_err(|e| e.to_string())?;
            println!("{line}");
        }
        return Ok(());
    }

    println!(
        "  {} {}",
        "Session".bold(),
        format!("(player={}, seed={seed})", source.name()).dimmed()
    );
    println!();

    println!("  {}", "Timeline".bold().underline());
    println!();
    let mut shown = 0;
    for logged in session.events().events() {
        if matches!(logged.event, SessionEvent::DeathCountdownTick { .. }) {
            continue;
        }
        let at = format!("[{:>5.1}s]", logged.elapsed_ms as f64 / 1000.0).dimmed();
        println!("  {at} {}", colorize_event(&logged.event));
        shown += 1;
    }
    if shown == 0 {
        println!("  {}", "(no events)".dimmed());
    }
    println!();

    println!("  {}", "Summary".bold().underline());
    println!();
    println!("{}", summary_table(&session));
    println!();

    Ok(())
}

fn summary_table(session: &Session) -> Table {
    let log = session.events();
    let outcome = match session.state() {
        SessionState::Won => session.state().to_string().green().bold().to_string(),
        SessionState::Lost { .. } => session.state().to_string().red().bold().to_string(),
        other => other.to_string(),
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Outcome".to_string(), outcome]);
    table.add_row(vec![
        "Survived".to_string(),
        format!("{:.1}s", session.elapsed_ms() as f64 / 1000.0),
    ]);
    table.add_row(vec![
        "Lives lost".to_string(),
        format!("{}/3", session.lost_lives()),
    ]);

    for kind in [
        AmbientKind::Footsteps,
        AmbientKind::HeavyFootsteps,
        AmbientKind::Insanity,
    ] {
        let started = log.count(|e| matches!(e, SessionEvent::EventStarted { kind: k, .. } if *k == kind));
        let survived = log.count(|e| {
            matches!(
                e,
                SessionEvent::EventResolved { kind: k, outcome: EventOutcome::Survived, .. } if *k == kind
            )
        });
        table.add_row(vec![kind.to_string(), format!("{survived}/{started} survived")]);
    }

    table.add_row(vec![
        "Faces".to_string(),
        log.count(|e| matches!(e, SessionEvent::FaceEventStarted { .. }))
            .to_string(),
    ]);
    table.add_row(vec![
        "Face jump scares".to_string(),
        log.count(|e| matches!(e, SessionEvent::FaceJumpScare { .. }))
            .to_string(),
    ]);
    table.add_row(vec![
        "Death countdowns".to_string(),
        log.count(|e| matches!(e, SessionEvent::DeathCountdownStarted { .. }))
            .to_string(),
    ]);
    table
}

fn colorize_event(event: &SessionEvent) -> colored::ColoredString {
    let text = event.to_string();
    match event {
        SessionEvent::PhaseChanged { .. } => text.bold(),
        SessionEvent::EventWarning { .. } | SessionEvent::DeathCountdownStarted { .. } => {
            text.yellow()
        }
        SessionEvent::EventStarted { .. } | SessionEvent::FaceEventStarted { .. } => text.cyan(),
        SessionEvent::EventResolved {
            outcome: EventOutcome::Failed,
            ..
        }
        | SessionEvent::LifeLost { .. }
        | SessionEvent::FaceJumpScare { .. } => text.red(),
        SessionEvent::EventResolved { .. }
        | SessionEvent::FaceEventResolved { .. }
        | SessionEvent::DeathCountdownCancelled { .. } => text.green(),
        SessionEvent::JumpScareTriggered { .. } | SessionEvent::SessionLost { .. } => {
            text.red().bold()
        }
        SessionEvent::SessionWon => text.green().bold(),
        SessionEvent::DeathCountdownTick { .. } => text.dimmed(),
    }
}
