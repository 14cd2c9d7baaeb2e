use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    if !integration_only {
        suite(
            "unit tests",
            &["test", "--lib", "-p", "platform", "-p", "playback", "-p", "firmware"],
        )?;
    }

    if !unit_only {
        // Boot, poll driver and driver tests run against the std mocks.
        suite("integration tests", &["test", "--tests", "-p", "playback", "-p", "firmware"])?;
    }

    println!("{}", "  Running doc tests...".cyan());
    let doc_start = Instant::now();
    let doc_output = Command::new("cargo")
        .args(["test", "--doc", "-p", "platform", "-p", "playback", "-p", "firmware"])
        .output()
        .context("Failed to run doc tests")?;

    if doc_output.status.success() {
        let summary = extract_test_summary(&String::from_utf8_lossy(&doc_output.stdout));
        println!(
            "{}",
            format!(
                "  ✓ Doc tests passed {} in {:.2}s",
                summary,
                doc_start.elapsed().as_secs_f64()
            )
            .green()
        );
    } else {
        eprintln!("{}", "  ⚠ Doc tests failed".yellow().bold());
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All tests completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

fn suite(label: &str, args: &[&str]) -> Result<()> {
    println!("{}", format!("  Running {label}...").cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run {label}"))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        for line in stdout.lines() {
            eprintln!("  {line}");
        }
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{label} failed");
    }

    println!(
        "{}",
        format!(
            "  ✓ {} passed {} in {:.2}s",
            label,
            extract_test_summary(&stdout),
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    Ok(())
}

/// Add up every "test result:" line cargo prints, one per test binary.
fn extract_test_summary(output: &str) -> String {
    let mut passed = 0u32;
    let mut failed = 0u32;
    let mut binaries = 0u32;
    for line in output.lines() {
        let Some(result) = line.split("test result:").nth(1) else {
            continue;
        };
        binaries = binaries.saturating_add(1);
        for part in result.split(';') {
            let mut words = part.split_whitespace().rev();
            let (Some(kind), Some(count)) = (words.next(), words.next()) else {
                continue;
            };
            let count: u32 = count.parse().unwrap_or(0);
            match kind {
                "passed" => passed = passed.saturating_add(count),
                "failed" => failed = failed.saturating_add(count),
                _ => {}
            }
        }
    }
    if binaries == 0 {
        return "(summary not available)".to_string();
    }
    format!("({passed} passed, {failed} failed across {binaries} binaries)")
}

#[cfg(test)]
mod tests {
    use super::extract_test_summary;

    #[test]
    fn summary_adds_up_binaries() {
        let out = "test result: ok. 5 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out\n\
                   running 3 tests\n\
                   test result: ok. 3 passed; 0 failed; 1 ignored; 0 measured; 0 filtered out";
        assert_eq!(
            extract_test_summary(out),
            "(8 passed, 0 failed across 2 binaries)"
        );
    }

    #[test]
    fn summary_missing() {
        assert_eq!(extract_test_summary("nothing"), "(summary not available)");
    }
}
