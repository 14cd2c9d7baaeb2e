use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

const CHIP: &str = "STM32H743ZITx";

pub fn run(release: bool) -> Result<()> {
    let mode = if release { "release" } else { "debug" };

    println!();
    println!(
        "{}",
        format!("🔨 Building firmware ({} mode)...", mode)
            .cyan()
            .bold()
    );
    println!();

    // Build firmware for STM32H7 target
    let build_start = Instant::now();
    let mut build_cmd = Command::new("cargo");
    build_cmd
        .arg("build")
        .arg("-p")
        .arg("firmware")
        .arg("--target")
        .arg("thumbv7em-none-eabihf")
        .arg("--features")
        .arg("hardware");

    if release {
        build_cmd.arg("--release");
    }

    let build_output = build_cmd.output().context("Failed to run cargo build")?;

    if !build_output.status.success() {
        eprintln!("{}", "✗ Build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&build_output.stderr));
        anyhow::bail!("Build failed");
    }

    let build_time = build_start.elapsed();
    println!(
        "{}",
        format!("✓ Build successful in {:.2}s", build_time.as_secs_f64()).green()
    );
    println!();

    // Show binary size
    show_binary_size(release)?;
    println!();

    // Flash with probe-rs
    println!("{}", "📡 Flashing to STM32H743...".cyan().bold());
    println!("   {}", "Connecting to probe...".dimmed());

    let flash_start = Instant::now();
    let mut flash_cmd = Command::new("probe-rs");
    flash_cmd
        .arg("download")
        .arg(binary_path(release))
        .arg("--chip")
        .arg(CHIP)
        .arg("--probe-index")
        .arg("0");

    let flash_output = flash_cmd
        .output()
        .context("Failed to run probe-rs. Is probe-rs installed? (cargo install probe-rs-tools)")?;

    if !flash_output.status.success() {
        eprintln!("{}", "✗ Flash failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&flash_output.stderr));
        anyhow::bail!("Flash failed - check that the probe is connected and the device is powered");
    }

    let flash_time = flash_start.elapsed();
    println!(
        "{}",
        format!("✓ Flash successful in {:.2}s", flash_time.as_secs_f64()).green()
    );
    println!();
    println!("{}", "🎵 Jukebox firmware is running on hardware!".bold());
    println!(
        "   {}",
        format!("Use 'probe-rs attach --chip {CHIP} {}' to view RTT logs", binary_path(release)).dimmed()
    );
    println!();

    Ok(())
}

fn binary_path(release: bool) -> &'static str {
    if release {
        "target/thumbv7em-none-eabihf/release/firmware"
    } else {
        "target/thumbv7em-none-eabihf/debug/firmware"
    }
}

fn show_binary_size(release: bool) -> Result<()> {
    let output = Command::new("rust-size")
        .arg(binary_path(release))
        .arg("-A")
        .output();

    match output {
        Ok(out) if out.status.success() => {
            println!("{}", "📊 Binary size:".cyan());
            let size_output = String::from_utf8_lossy(&out.stdout);
            for line in size_output.lines() {
                println!("   {}", line.dimmed());
            }
        }
        _ => {
            // If rust-size is not available, try cargo-size
            let mut args = vec![
                "size",
                "-p",
                "firmware",
                "--bin",
                "firmware",
                "--features",
                "hardware",
                "--target",
                "thumbv7em-none-eabihf",
            ];
            if release {
                args.push("--release");
            }
            args.extend(["--", "-A"]);
            let output = Command::new("cargo").args(&args).output();

            if let Ok(out) = output {
                if out.status.success() {
                    println!("{}", "📊 Binary size:".cyan());
                    let size_output = String::from_utf8_lossy(&out.stdout);
                    for line in size_output.lines().skip(1) {
                        // Skip cargo output
                        println!("   {}", line.dimmed());
                    }
                }
            }
        }
    }

    Ok(())
}
