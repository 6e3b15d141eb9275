use chrono::Utc;
use clap::Subcommand;
use zafu_core::session::{self, Outcome};
use zafu_core::timer::{recovery, Recovered, SessionLength};
use zafu_core::{Config, Database, Event};

use super::now_ms;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Begin a countdown (defaults to the last chosen duration)
    Start {
        #[arg(long)]
        hours: Option<u32>,
        #[arg(long, short)]
        minutes: Option<u32>,
        #[arg(long)]
        seconds: Option<u32>,
    },
    /// Print current timer state as JSON
    Status,
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Stop the countdown and record the session
    Stop,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let now = now_ms();

    // Reconcile durable state before dispatching anything: a countdown that
    // expired since the last invocation settles into the journal here.
    let (mut engine, recovered) = recovery::settle(&db, now)?;
    report_recovered(&recovered);

    match action {
        TimerAction::Start {
            hours,
            minutes,
            seconds,
        } => {
            let mut config = Config::load_or_default();
            let length = match (hours, minutes, seconds) {
                (None, None, None) => config.timer.last_duration,
                _ => SessionLength::new(
                    hours.unwrap_or(0),
                    minutes.unwrap_or(0),
                    seconds.unwrap_or(0),
                ),
            };
            if length.is_zero() {
                return Err("duration must be longer than zero".into());
            }

            match engine.start(length.total_ms(), now) {
                Some(event) => {
                    // Remember the choice for next time.
                    config.timer.last_duration = length;
                    if let Err(e) = config.save() {
                        log::warn!("could not persist last duration: {e}");
                    }
                    if config.alerts.do_not_disturb {
                        log::debug!(
                            "do-not-disturb intent set; muting is delegated to the environment"
                        );
                    }
                    println!("{}", serde_json::to_string_pretty(&event)?);
                }
                None => eprintln!("a session is already underway; stop it first"),
            }
        }
        TimerAction::Status => {
            if let Some(event) = engine.tick(now) {
                println!("{}", serde_json::to_string_pretty(&event)?);
                settle_completion(&db, &event)?;
            }
            let snapshot = engine.snapshot(now);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        TimerAction::Pause => match engine.pause(now) {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => eprintln!("no running countdown to pause"),
        },
        TimerAction::Resume => match engine.resume(now) {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => eprintln!("no paused countdown to resume"),
        },
        TimerAction::Stop => match engine.stop(now) {
            Some(stopped) => {
                let event = Event::TimerStopped {
                    elapsed_secs: stopped.elapsed_secs,
                    at: Utc::now(),
                };
                println!("{}", serde_json::to_string_pretty(&event)?);
                let outcome = session::record(
                    &db,
                    session::local_start_time(stopped.started_at_ms),
                    stopped.elapsed_secs,
                    stopped.planned_secs,
                )?;
                report_outcome(&outcome)?;
            }
            None => eprintln!("no countdown to stop"),
        },
    }

    recovery::save(&db, &engine)?;
    Ok(())
}

/// Record a natural completion signalled by `tick`.
fn settle_completion(db: &Database, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    if let Event::TimerCompleted {
        planned_secs,
        started_at,
        ..
    } = event
    {
        let outcome = session::record(db, *started_at, *planned_secs, *planned_secs)?;
        report_outcome(&outcome)?;
    }
    Ok(())
}

fn report_outcome(outcome: &Outcome) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{}",
        serde_json::to_string_pretty(&outcome.to_event(Utc::now()))?
    );
    if let Outcome::TooShort { .. } = outcome {
        eprintln!(
            "sessions under {} seconds are not recorded",
            zafu_core::MIN_SESSION_SECS
        );
    }
    Ok(())
}

fn report_recovered(recovered: &Recovered) {
    match recovered {
        Recovered::Nothing | Recovered::InProgress { .. } => {}
        Recovered::CompletedWhileAway(outcome) => match outcome {
            Outcome::Recorded(session) => eprintln!(
                "a session finished while zafu was closed; {}s added to the journal",
                session.duration
            ),
            Outcome::TooShort { .. } => eprintln!(
                "a countdown expired while zafu was closed but ran under {} seconds; not recorded",
                zafu_core::MIN_SESSION_SECS
            ),
        },
    }
}
