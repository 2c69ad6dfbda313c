//! Read-eval-print loop for APRIL.
//!
//! One line in, one reply out. Confirmation round-trips and suggestions
//! are carried across turns by the assistant itself; the loop only moves
//! text. The same pipeline would serve a speech frontend unchanged.

use anyhow::Result;
use april_common::assistant::Assistant;
use april_common::config::AssistantConfig;
use console::style;
use std::io::{self, BufRead, Write};
use tracing::info;

/// Run the interactive loop until farewell or end of input.
pub fn run(config: AssistantConfig) -> Result<()> {
    let mut april = Assistant::from_config(config);
    info!("APRIL v{} online", env!("CARGO_PKG_VERSION"));

    println!("{}", style("APRIL: online. ready.").cyan());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You>").bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF: shut down cleanly
            println!("\n{}", style("APRIL: standing down.").cyan());
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            println!("{}", style("APRIL: awaiting command.").cyan());
            continue;
        }

        let reply = april.handle_turn(input);
        println!("{}", style(format!("APRIL: {}", reply.response)).cyan());

        if reply.exit {
            break;
        }
    }

    Ok(())
}
