mod script;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use web_time::Instant;

use script::{Clock, Player, Script};

/// Replays a gesture script against a Cramr bottom sheet.
#[derive(Debug, Parser)]
#[command(name = "sheet-demo", version)]
struct Args {
    /// TOML gesture script; a built-in scenario runs when omitted.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Frame rate of the simulated render loop.
    #[arg(long, default_value_t = 60)]
    frames_per_second: u32,

    /// Sleep between frames and timestamp them with the wall clock.
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let script = match &args.script {
        Some(path) => Script::load(path)?,
        None => Script::builtin(),
    };

    let clock = if args.realtime {
        Clock::Wall {
            start: Instant::now(),
        }
    } else {
        Clock::Simulated { now_nanos: 0 }
    };

    println!("=== Cramr sheet demo ===");
    println!(
        "anchors: top {} / middle {} / bottom {} (overscroll {}, flick at {} px/s)",
        script.sheet.top_offset,
        script.sheet.middle_offset,
        script.sheet.bottom_offset,
        script.sheet.overscroll,
        script.sheet.flick_velocity
    );
    println!();

    let mut player = Player::new(script.sheet, clock, args.frames_per_second)?;
    for report in player.run(&script.steps) {
        println!(
            "{:>3}. {:<60} -> {:<6} {:>4} frames  offset {:>7.1}",
            report.index + 1,
            format!("{:?}", report.step),
            report.target.to_string(),
            report.frames,
            report.offset
        );
    }

    Ok(())
}
