use std::io::BufRead;

use anyhow::Context;
use limit_order_sdk::connections::{PairConnections, StatusEvent};
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct PairRow {
    #[tabled(rename = "Pair")]
    title: &'static str,
    #[tabled(rename = "Channels")]
    channels: String,
    #[tabled(rename = "Subscribers")]
    occupancy: String,
    #[tabled(rename = "State")]
    state: String,
}

/// Folds JSON-line status events into pair connection state. Blank lines
/// are skipped.
pub(crate) fn track<R: BufRead>(input: R) -> anyhow::Result<PairConnections> {
    let mut connections = PairConnections::default();
    for (idx, line) in input.lines().enumerate() {
        let line = line.context("reading status events")?;
        if line.trim().is_empty() {
            continue;
        }
        let event: StatusEvent = serde_json::from_str(&line)
            .with_context(|| format!("invalid status event on line {}", idx + 1))?;
        tracing::debug!(?event, "status event");
        connections.apply(&event);
    }
    Ok(connections)
}

pub(crate) fn table(connections: &PairConnections) -> Table {
    let rows = connections.iter().map(|(pair, state)| PairRow {
        title: pair.title,
        channels: pair.settings.channels.join(", "),
        occupancy: connections
            .occupancy(pair.title)
            .map_or_else(|| "-".to_string(), |n| n.to_string()),
        state: state.to_string(),
    });
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table
}

pub(crate) fn render<R: BufRead>(input: R) -> anyhow::Result<()> {
    let connections = track(input)?;
    println!("{}", table(&connections));
    Ok(())
}
