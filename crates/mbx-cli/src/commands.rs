use std::io::{self, Write};

use anyhow::bail;
use colored::Colorize;
use mbx_merge::DirectionReport;
use mbx_sync::{PairOutcome, PairReport, SyncConfig, SyncEngine, SyncReport};
use mbx_types::{Container, ContainerKind};

use crate::cli::Cli;
use crate::monitor::{self, MonitorConfig};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let monitor_config = MonitorConfig::default();
    let monitor = monitor_config
        .enabled
        .then(|| monitor::spawn(monitor_config, runtime.handle()));

    let engine = SyncEngine::new(SyncConfig::default());
    let result = engine.run(&cli.profile1, &cli.profile2);
    if let Some(monitor) = monitor {
        monitor.stop();
    }
    let report = result?;

    let mut stdout = io::stdout().lock();
    render_report(&report, &mut stdout)?;

    let failed = report.pairs.iter().filter(|p| p.is_failed()).count();
    if failed > 0 {
        bail!("{failed} of {} container pairs could not be merged", report.pairs.len());
    }
    writeln!(stdout, "{}", "Finished!".green().bold())?;
    Ok(())
}

/// Console rendering of a finished run.
pub fn render_report(report: &SyncReport, out: &mut impl Write) -> io::Result<()> {
    for pair in &report.pairs {
        render_pair(pair, out)?;
    }

    render_unmatched("Only in the first profile:", &report.unique_left, out)?;
    render_unmatched("Only in the second profile:", &report.unique_right, out)
}

fn render_unmatched(heading: &str, containers: &[Container], out: &mut impl Write) -> io::Result<()> {
    if containers.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", heading.yellow())?;
    for container in containers {
        writeln!(out, "  {container}")?;
    }
    Ok(())
}

fn render_pair(pair: &PairReport, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Reading: {}", pair.left.display())?;
    writeln!(out, "Reading: {}", pair.right.display())?;

    match &pair.outcome {
        PairOutcome::Merged(merge) => {
            for direction in [&merge.into_left, &merge.into_right] {
                match merge.kind {
                    ContainerKind::MessageStore => render_messages(direction, out)?,
                    ContainerKind::StateFile => render_entries(direction, out)?,
                }
            }
        }
        PairOutcome::Failed { error } => {
            writeln!(out, "{} {}: {}", "✗".red().bold(), pair.relative.display(), error.red())?;
        }
    }
    Ok(())
}

fn render_messages(direction: &DirectionReport, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Looking for messages in: {}", direction.source.display())?;
    writeln!(out, "that are not in: {}", direction.destination.display())?;
    if direction.appended > 0 {
        writeln!(
            out,
            "{} unique messages found in: {}",
            direction.appended.to_string().bold(),
            direction.source.display()
        )?;
        writeln!(out, "They have been written to: {}", direction.destination.display())?;
    }
    if direction.sidecar_removed {
        writeln!(out, "Removing {}.msf", direction.destination.display())?;
    }
    Ok(())
}

fn render_entries(direction: &DirectionReport, out: &mut impl Write) -> io::Result<()> {
    if direction.skipped > 0 {
        writeln!(
            out,
            "{} malformed entries skipped in: {}",
            direction.skipped.to_string().yellow(),
            direction.source.display()
        )?;
    }
    if direction.appended > 0 {
        writeln!(
            out,
            "{} unique entries found in: {}",
            direction.appended.to_string().bold(),
            direction.source.display()
        )?;
        writeln!(out, "Written to: {}", direction.destination.display())?;
    }
    Ok(())
}
