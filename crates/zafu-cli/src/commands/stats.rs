use chrono::Local;
use serde::Serialize;
use zafu_core::{stats, Database, StreakData, Totals};

/// Combined stats payload for `--json`.
#[derive(Serialize)]
struct StatsReport {
    totals: Totals,
    streaks: StreakData,
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let today = Local::now().date_naive();

    let totals = stats::totals(&db, today)?;
    let sessions = db.all_sessions()?;
    let streaks = stats::streak_data(&sessions, today);

    if json {
        let report = StatsReport { totals, streaks };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("sessions        {}", totals.sessions);
    println!("time meditated  {}", format_secs(totals.total_secs));
    println!(
        "today           {} session(s), {}",
        totals.today_sessions,
        format_secs(totals.today_secs)
    );
    println!("current streak  {} day(s)", streaks.current);
    println!("best streak     {} day(s)", streaks.best);
    Ok(())
}

fn format_secs(secs: i64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}
