//! Build script for rvc-sim
//!
//! Validates the embedded sim.toml at compile time, so a broken default
//! configuration fails the build instead of the first run.

use std::fs;
use std::path::Path;

/// Keys accepted in each section
const BOOT_KEYS: &[&str] = &["port", "settle_ms", "frame_id"];
const SIM_KEYS: &[&str] = &[
    "speed",
    "tick_ms",
    "telemetry_ms",
    "snap_epsilon",
    "homing_step_s",
    "homing_x_turnaround",
    "bounds",
    "tap_hold_ms",
    "gate_motion_on_motors",
];

fn main() {
    validate_config();
}

/// Validate sim.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=sim.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("sim.toml");

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read sim.toml", &[e.to_string()]),
    };

    let config: toml::Table = match toml::from_str(&content) {
        Ok(table) => table,
        Err(e) => fail(
            "Invalid TOML syntax in sim.toml",
            &e.to_string().lines().map(String::from).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    for key in config.keys() {
        if key != "boot" && key != "sim" {
            errors.push(format!("unknown section [{}]", key));
        }
    }
    check_keys(&config, "boot", BOOT_KEYS, &mut errors);
    check_keys(&config, "sim", SIM_KEYS, &mut errors);
    validate_boot(&config, &mut errors);
    validate_sim(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid configuration in sim.toml", &errors);
    }
}

/// Report unknown keys in a section
fn check_keys(config: &toml::Table, section: &str, allowed: &[&str], errors: &mut Vec<String>) {
    let Some(table) = config.get(section) else {
        return;
    };
    let Some(table) = table.as_table() else {
        errors.push(format!("[{}] must be a table", section));
        return;
    };
    for key in table.keys() {
        if !allowed.contains(&key.as_str()) {
            errors.push(format!("[{}] unknown key '{}'", section, key));
        }
    }
}

fn validate_boot(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(boot) = config.get("boot").and_then(|b| b.as_table()) else {
        return;
    };

    if let Some(port) = boot.get("port") {
        match port.as_str() {
            Some(p) if !p.trim().is_empty() => {}
            _ => errors.push("[boot] port must be a non-empty string".into()),
        }
    }
    if let Some(frame_id) = boot.get("frame_id") {
        match frame_id.as_str() {
            Some(f) if !f.is_empty() && f.len() <= 32 => {}
            _ => errors.push("[boot] frame_id must be a string of 1-32 bytes".into()),
        }
    }
    if let Some(settle) = boot.get("settle_ms") {
        if !matches!(settle.as_integer(), Some(ms) if ms >= 0) {
            errors.push("[boot] settle_ms must be a non-negative integer".into());
        }
    }
}

fn validate_sim(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(sim) = config.get("sim").and_then(|s| s.as_table()) else {
        return;
    };

    let number = |key: &str| {
        sim.get(key)
            .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
    };

    if let Some(speed) = number("speed") {
        if !speed.is_finite() || speed <= 0.0 {
            errors.push("[sim] speed must be positive".into());
        }
    }
    if let Some(step) = number("homing_step_s") {
        if !step.is_finite() || step <= 0.0 {
            errors.push("[sim] homing_step_s must be positive".into());
        }
    }
    if let Some(eps) = number("snap_epsilon") {
        if !eps.is_finite() || eps < 0.0 {
            errors.push("[sim] snap_epsilon must be non-negative".into());
        }
    }

    let tick = sim.get("tick_ms").and_then(|v| v.as_integer()).unwrap_or(20);
    let telemetry = sim
        .get("telemetry_ms")
        .and_then(|v| v.as_integer())
        .unwrap_or(200);
    if tick <= 0 {
        errors.push("[sim] tick_ms must be positive".into());
    } else if telemetry <= 0 || telemetry % tick != 0 {
        errors.push("[sim] telemetry_ms must be a positive multiple of tick_ms".into());
    }

    if tick > 0 {
        let speed = number("speed").unwrap_or(120.0);
        let eps = number("snap_epsilon").unwrap_or(2.4);
        if speed * (tick as f64 / 1000.0) > 2.0 * eps {
            errors.push("[sim] speed * tick_ms / 1000 must not exceed 2 * snap_epsilon".into());
        }
    }

    if let Some(bounds) = sim.get("bounds") {
        let ok = bounds
            .as_table()
            .map(|b| b.contains_key("x") && b.contains_key("y"))
            .unwrap_or(false);
        if !ok {
            errors.push("[sim.bounds] needs both x and y".into());
        }
    }
}

/// Abort the build with a boxed error report
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let line = if line.chars().count() > 62 {
                format!("{}...", line.chars().take(59).collect::<String>())
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", line)
        })
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
