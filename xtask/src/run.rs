use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Command;

pub fn run(image: Option<&Path>, log: &str) -> Result<()> {
    println!();
    println!("{}", "▶ Starting headless player...".cyan().bold());
    if let Some(image) = image {
        println!("   {}", format!("store image: {}", image.display()).dimmed());
    }
    println!();

    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "-p",
        "firmware",
        "--example",
        "headless_player",
        "--features",
        "emulator",
    ])
    .env("RUST_LOG", log);
    if let Some(image) = image {
        cmd.arg("--").arg(image);
    }

    let status = cmd.status().context("Failed to start headless player")?;
    if !status.success() {
        anyhow::bail!("Headless player exited with {status}");
    }
    Ok(())
}
