//! hand_bow interactive entry point.

use hand_bow::app::{AppConfig, run};
use bow_core::BowConfig;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::io::{self, Write};
use std::time::Duration;

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose" || a == "-v");
    if let Err(e) = SimpleLogger::new()
        .with_level(if verbose { LevelFilter::Debug } else { LevelFilter::Info })
        .init()
    {
        eprintln!("logger init failed: {}", e);
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Hand Bow — aim with your hand, shoot with Space     ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse simulation  (use --features leap for hardware)");
    println!();

    let cfg = if std::env::args().any(|a| a == "--quick") {
        println!("  Quick-start: default bow tuning\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };

    println!();
    println!("  Opening window…");
    println!();

    if let Err(e) = run(cfg) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    let d = BowConfig::default();
    println!("  Bow tuning (Enter keeps the default):");

    let max_power = read_f32("    Power cap", d.max_power, 0.1, 10.0);
    let charge_step = read_f32("    Power per tick", d.charge_step, 0.01, max_power);
    let interval_ms: u64 = read_line(&format!(
        "    Tick interval ms (default {}): ",
        d.charge_interval.as_millis()
    ))
    .trim()
    .parse()
    .unwrap_or(d.charge_interval.as_millis() as u64)
    .max(10)
    .min(1000);
    let gravity_step = read_f32("    Gravity per frame", d.gravity_step, 0.0, 1.0);
    let boundary     = read_f32("    Play boundary", d.boundary, 5.0, 200.0);
    let aim_scale    = read_f32("    Hand → world scale", d.aim_scale, 1.0, 50.0);

    AppConfig {
        bow: BowConfig {
            aim_scale,
            max_power,
            charge_step,
            charge_interval: Duration::from_millis(interval_ms),
            gravity_step,
            boundary,
        },
        ..AppConfig::default()
    }
}

fn read_f32(label: &str, default: f32, min: f32, max: f32) -> f32 {
    read_line(&format!("{} (default {}): ", label, default))
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(default)
        .clamp(min, max.max(min))
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
