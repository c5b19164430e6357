use std::io::{self, BufRead, Write};
use std::sync::Arc;

use prospect_research::{ResearchController, ResearchService};

use crate::output;

/// Interactive research session over one controller. Submissions run to
/// completion before the next prompt, so the single-flight rule is never
/// visible here.
pub async fn run(
    controller: &ResearchController,
    service: Arc<dyn ResearchService>,
) -> anyhow::Result<()> {
    println!("discovery console: enter a company website, or :help for commands");
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if let Some(command) = input.strip_prefix(':') {
            if !handle_command(controller, service.as_ref(), command).await {
                break;
            }
            continue;
        }
        match controller.submit(input).await {
            Ok(()) => {
                if let Some(result) = controller.result() {
                    output::print_result(&result, controller.completed_at());
                    println!("use :select <id> to inspect one prospect");
                }
            }
            Err(err) => println!("research failed: {err}"),
        }
    }
    Ok(())
}

/// Returns false when the session should end.
async fn handle_command(
    controller: &ResearchController,
    service: &dyn ResearchService,
    command: &str,
) -> bool {
    let (name, arg) = split_command(command);
    match name {
        "q" | "quit" | "exit" => return false,
        "help" => print_help(),
        "status" => match service.status().await {
            Ok(status) => match &status.message {
                Some(message) => println!("service mode: {} ({message})", status.mode),
                None => println!("service mode: {}", status.mode),
            },
            Err(err) => println!("status probe failed: {err}"),
        },
        "summary" => match controller.summary() {
            Some(summary) => output::print_summary(&summary),
            None => println!("no research result yet"),
        },
        "json" => match controller.result() {
            Some(result) => match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{json}"),
                Err(err) => println!("could not render result: {err}"),
            },
            None => println!("no research result yet"),
        },
        "select" => {
            if arg.is_empty() {
                println!("usage: :select <id>");
            } else if controller.result().is_none() {
                println!("no research result yet");
            } else {
                controller.select_buyer(arg);
                match controller.selected_buyer() {
                    Some(buyer) => output::print_buyer_detail(&buyer),
                    None => println!("no prospect with id '{arg}'"),
                }
            }
        }
        other => println!("unknown command ':{other}', try :help"),
    }
    true
}

fn split_command(command: &str) -> (&str, &str) {
    match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    }
}

fn print_help() {
    println!("  <website>      run buyer discovery for an http(s) company URL");
    println!("  :select <id>   show one prospect in detail");
    println!("  :summary       headline numbers for the current result");
    println!("  :json          dump the current result as JSON");
    println!("  :status        ask the service whether it is in mock or live mode");
    println!("  :quit          leave");
}
