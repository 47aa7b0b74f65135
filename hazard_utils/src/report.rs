//! Report Module
//!
//! Summary output for batch classification runs.

use crate::batch::BatchSummary;
use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

pub fn print_summary_report(summary: &BatchSummary, duration: Duration) {
    println!();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║              📊 Hazard Classification Summary            ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  📁 Files Classified:   {:>10}                       ║", summary.total);
    println!("║  ✅ Accepted:           {:>10}                       ║", summary.accepted);
    println!("║  🚫 Rejected:           {:>10}                       ║", summary.rejected);
    println!("║  ⚠️  Failed Open:        {:>10}                       ║", summary.failed_open);
    println!(
        "║  📈 Acceptance Rate:    {:>9.1}%                       ║",
        summary.acceptance_rate()
    );
    println!("╠══════════════════════════════════════════════════════════╣");
    println!(
        "║  ⏱️  Total Time:         {:>10}                       ║",
        format_duration(duration)
    );
    println!("╚══════════════════════════════════════════════════════════╝");

    if !summary.failures.is_empty() {
        println!();
        println!("⚠️  Files accepted without analysis:");
        for (path, reason) in &summary.failures {
            println!("   {} → {}", path.display(), reason);
        }
    }
}

pub fn print_simple_summary(summary: &BatchSummary) {
    println!(
        "\n✅ Complete: {} accepted, {} rejected, {} failed open (total: {})",
        summary.accepted, summary.rejected, summary.failed_open, summary.total
    );
}
