mod adapter;
mod cli;
mod domain;
mod ports;
mod repl;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::io::{self, IsTerminal};
use std::process;

use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use domain::{DocshCommand, DocumentKind};
use ports::inbound::UseCaseRunner;
use usecase::app::DocshUseCase;
use wiring::wire_docsh;

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner;

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(&config)?;
        if cmd == DocshCommand::Help {
            print_help();
            return Ok(0);
        }
        let initial = match &cmd {
            DocshCommand::Repl { view } => *view,
            _ => DocumentKind::OnePager,
        };
        let mut app = wire_docsh(&config, initial)?;
        let command_name = cmd_name_for_log(&cmd);
        let _ = app.logger.log(
            &LogRecord::new(LogLevel::Info, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let result = match cmd {
            DocshCommand::Help => Ok(0),
            DocshCommand::Repl { view } => {
                if config.non_interactive || !io::stdin().is_terminal() {
                    repl::run_script(&mut app.use_case, app.logger.as_ref(), io::stdin().lock(), view)
                } else {
                    repl::run_interactive(&mut app.use_case, app.logger.as_ref(), &app.dirs.state_dir, view)
                }
            }
            other => run_one_shot(&mut app.use_case, other),
        };

        let code = result.as_ref().copied().unwrap_or(0);
        let _ = app.logger.log(
            &LogRecord::new(LogLevel::Info, "command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            let _ = app.logger.log(
                &LogRecord::new(LogLevel::Error, e.to_string())
                    .layer("cli")
                    .kind("error"),
            );
        }
        result
    }
}

/// ワンショットのコマンド。失敗はチャットに出した上で終了コード 1 を返す。
fn run_one_shot(use_case: &mut DocshUseCase, cmd: DocshCommand) -> Result<i32, Error> {
    let ok = match cmd {
        DocshCommand::Send { kind, text } => use_case
            .send_once(kind, &text)
            .map(|outcome| outcome.is_applied())
            .unwrap_or(false),
        DocshCommand::Show { kind } => {
            use_case.controller_mut().show(kind);
            true
        }
        DocshCommand::Reset { kind } => {
            use_case.controller_mut().reset(kind);
            true
        }
        DocshCommand::Docs => match use_case.list_documents() {
            Ok(_) => true,
            Err(e) => return Err(Error::http(format!("Could not fetch documents: {}", e))),
        },
        DocshCommand::Open { id } => use_case.open_document(&id).is_ok(),
        DocshCommand::Save { name } => use_case.save(&name).is_ok(),
        DocshCommand::Help | DocshCommand::Repl { .. } => true,
    };
    Ok(if ok { 0 } else { 1 })
}

fn cmd_name_for_log(cmd: &DocshCommand) -> &'static str {
    match cmd {
        DocshCommand::Help => "help",
        DocshCommand::Repl { .. } => "repl",
        DocshCommand::Send { .. } => "send",
        DocshCommand::Show { .. } => "show",
        DocshCommand::Reset { .. } => "reset",
        DocshCommand::Docs => "docs",
        DocshCommand::Open { .. } => "open",
        DocshCommand::Save { .. } => "save",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("docsh: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    Runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: docsh [options] [command] [args...]");
}

fn print_help() {
    println!("Usage: docsh [options] [command] [args...]");
    println!("Options:");
    println!("  -h, --help                 Show this help message");
    println!("  -v, --verbose              Mirror structured logs to stderr");
    println!("  --view <kind>              Initial view: onepager (default), briefing, report");
    println!("  --base-url <url>           Webhook base URL (default: http://localhost:5678/webhook)");
    println!("  --user <id>                User id for saving and listing documents (default: default)");
    println!("  --state-file <path>        Local state file (default: $DOCSH_HOME/state/storage.json)");
    println!("  --no-interactive           Read commands from stdin line by line (no line editing)");
    println!("  --generate <shell>         Generate shell completion script (bash, zsh, fish)");
    println!();
    println!("Commands:");
    println!("  (none) | #<kind>           Start the interactive session");
    println!("  send <kind> <message...>   Send one message and print the result");
    println!("  show <kind>                Show the stored document");
    println!("  reset <kind>               Clear a document, its chat and its session id");
    println!("  docs                       List saved one-pagers");
    println!("  open <id>                  Load a saved one-pager");
    println!("  save <name...>             Save the current one-pager");
    println!();
    println!("Environment:");
    println!("  DOCSH_HOME          Home directory. Config: $DOCSH_HOME/config/docsh.json; state and logs: $DOCSH_HOME/state/");
    println!("                      If unset, $XDG_CONFIG_HOME/docsh (e.g. ~/.config/docsh) is used.");
    println!("  DOCSH_WEBHOOK_BASE  Webhook base URL");
    println!("  DOCSH_USER_ID       User id");
    println!("  DOCSH_TIMEOUT_SECS  Request timeout in seconds (default: 120)");
    println!();
    println!("Examples:");
    println!("  docsh");
    println!("  docsh --view briefing");
    println!("  docsh send onepager start");
    println!("  docsh save \"Project Phoenix Q3 Plan\"");
}
