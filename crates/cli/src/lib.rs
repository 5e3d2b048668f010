pub mod args;
mod order;
mod pairs;
mod prompt;
mod tx;

use std::io::IsTerminal;

use args::{Cli, Operation};
use prompt::Prompter;

/// Runs the operation, prompting for whatever the flags leave out.
///
/// When the operation and all of its flags are provided, nothing is asked
/// and the result is printed raw, on a single line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let raw = cli.is_running_with_argv();
    let stdin = std::io::stdin();
    let terminal = stdin.is_terminal();
    let mut prompter = Prompter::new(stdin.lock(), std::io::stdout(), !raw).with_terminal(terminal);
    let operation: Operation =
        prompter.value(cli.operation, "Operation (create, fill, cancel, pairs)")?;
    tracing::debug!(?operation, raw, "running operation");

    match operation {
        Operation::Create => order::create(&cli, &mut prompter, raw),
        Operation::Fill => order::fill(&cli, &mut prompter, raw).await,
        Operation::Cancel => order::cancel(&cli, &mut prompter, raw).await,
        Operation::Pairs => pairs::render(prompter.into_input()),
    }
}
