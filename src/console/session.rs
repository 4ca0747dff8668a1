//! Interactive console session driving the form controller.

use crate::ConsoleConfig;
use crate::actions::Category;
use crate::api::HttpApiClient;
use crate::console::clipboard::SystemClipboard;
use crate::console::view::TerminalView;
use crate::controller::{FormController, IDLE_SWEEP_INTERVAL, TokioSleeper};
use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::time::Instant;

fn print_help() {
    println!("commands:");
    println!("  email <address>    set the target user email");
    println!("  user <name>        set the directory username");
    println!("  pass               prompt for the directory password");
    println!("  test               test backend connections");
    println!("  start              open the deprovisioning confirmation");
    println!("  confirm <text>     answer the confirmation prompt");
    println!("  cancel             close the confirmation prompt");
    println!("  actions            show the action selection");
    println!("  toggle <category>  enable/disable a category (ad|m365|mfa|org)");
    println!("  check <id>         check one action");
    println!("  uncheck <id>       uncheck one action");
    println!("  copy               copy the generated password");
    println!("  clear              clear the log");
    println!("  status             show field/control state");
    println!("  quit               leave the console");
}

fn print_actions(controller: &FormController<HttpApiClient, TerminalView, TokioSleeper>) {
    for category in Category::ALL {
        let enabled = controller.actions().is_enabled(category);
        println!(
            "  [{}] {}",
            if enabled { "x" } else { " " },
            category.wire_flag()
        );
        for (id, checked) in controller.actions().checks(category) {
            println!("      [{}] {id}", if *checked { "x" } else { " " });
        }
    }
}

/// Run the interactive session until the operator quits or stdin closes.
pub async fn run(config: ConsoleConfig, username: String, password: String) -> Result<()> {
    let api = HttpApiClient::new(&config.base_url)?;
    let mut controller = FormController::new(api, TerminalView::new(), TokioSleeper);
    controller.startup();
    controller.set_username(&username);
    controller.set_password(&password);

    let mut clipboard = SystemClipboard;
    let stdin = io::stdin();
    let mut last_activity = Instant::now();

    print_help();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        // Credential hygiene for consoles left unattended.
        if last_activity.elapsed() >= IDLE_SWEEP_INTERVAL {
            controller.idle_sweep();
        }
        last_activity = Instant::now();

        let line = line.trim();
        let (command, rest) = line
            .split_once(' ')
            .map(|(head, tail)| (head, tail.trim()))
            .unwrap_or((line, ""));

        match command {
            "" => {}
            "help" => print_help(),
            "email" => controller.set_email(rest),
            "user" => controller.set_username(rest),
            "pass" => match rpassword::prompt_password("Directory password: ") {
                Ok(secret) => controller.set_password(&secret),
                Err(err) => controller.report_error(&err.to_string()),
            },
            "test" => controller.test_connections().await,
            "start" => controller.start_deprovisioning(),
            "confirm" => {
                controller.set_confirmation(rest);
                controller.proceed_with_deprovisioning().await;
            }
            "cancel" => controller.cancel_confirmation(),
            "actions" => print_actions(&controller),
            "toggle" => match Category::parse(rest) {
                Some(category) => {
                    let enabled = controller.actions().is_enabled(category);
                    controller.toggle_category(category, !enabled);
                }
                None => println!("unknown category: {rest} (expected ad|m365|mfa|org)"),
            },
            "check" | "uncheck" => {
                if !controller.set_action_checked(rest, command == "check") {
                    println!("unknown action id: {rest}");
                }
            }
            "copy" => controller.copy_current_password(&mut clipboard),
            "clear" => controller.clear_log(),
            "status" => {
                println!("target email: {}", controller.email());
                println!("directory user: {}", controller.username());
                controller.view().render_status();
            }
            "quit" | "exit" => break,
            other => println!("unknown command: {other} (try `help`)"),
        }
    }

    if controller.is_processing() {
        println!("Warning: a deprovisioning run was still in flight at exit.");
    }
    controller.clear_sensitive_data();
    Ok(())
}
