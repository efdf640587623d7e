use crate::domain::{DocshCommand, DocumentKind};
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    /// -v / --verbose: 構造化ログを stderr にも出す
    pub verbose: bool,
    /// --no-interactive: 行編集を使わず標準入力を 1 行ずつ処理する
    pub non_interactive: bool,
    /// --view: 起動時に表示する種別（不正なら one-pager）
    pub view: Option<String>,
    pub base_url: Option<String>,
    pub user: Option<String>,
    /// --state-file: 保存状態のファイル（既定は $DOCSH_HOME/state/storage.json）
    pub state_file: Option<PathBuf>,
    /// サブコマンドとその引数
    pub positional: Vec<String>,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("docsh")
        .about("Build one-pagers, briefings and reports by chatting with a workflow backend")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Mirror structured logs to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("no-interactive")
                .long("no-interactive")
                .help("Read commands from stdin without line editing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("view")
                .long("view")
                .value_name("kind")
                .help("Initial view: onepager, briefing or report")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("base-url")
                .long("base-url")
                .value_name("url")
                .help("Webhook base URL")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("user")
                .long("user")
                .value_name("id")
                .help("User id sent with save/list requests")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("state-file")
                .long("state-file")
                .value_name("path")
                .help("Local state file (default: $DOCSH_HOME/state/storage.json)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("positional")
                .index(1)
                .help("Command (send, show, reset, docs, open, save) and its arguments, or #kind")
                .num_args(0..)
                .trailing_var_arg(true),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        verbose: matches.get_flag("verbose"),
        non_interactive: matches.get_flag("no-interactive"),
        view: matches.get_one::<String>("view").cloned(),
        base_url: matches.get_one::<String>("base-url").cloned(),
        user: matches.get_one::<String>("user").cloned(),
        state_file: matches.get_one::<PathBuf>("state-file").cloned(),
        positional: matches
            .get_many::<String>("positional")
            .map(|i| i.cloned().collect())
            .unwrap_or_default(),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }
    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[String]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "docsh", &mut std::io::stdout());
}

fn kind_arg(word: Option<&String>, usage: &str) -> Result<DocumentKind, Error> {
    word.ok_or_else(|| Error::invalid_argument(usage.to_string()))?
        .parse()
}

/// Config を DocshCommand に変換する
pub fn config_to_command(config: &Config) -> Result<DocshCommand, Error> {
    if config.help {
        return Ok(DocshCommand::Help);
    }

    let Some((first, rest)) = config.positional.split_first() else {
        return Ok(DocshCommand::Repl {
            view: DocumentKind::from_fragment(config.view.as_deref()),
        });
    };

    match first.as_str() {
        "send" => {
            let kind = kind_arg(rest.first(), "Usage: docsh send <kind> <message...>")?;
            let text = rest.get(1..).unwrap_or_default().join(" ");
            if text.trim().is_empty() {
                return Err(Error::invalid_argument("Usage: docsh send <kind> <message...>"));
            }
            Ok(DocshCommand::Send { kind, text })
        }
        "show" => Ok(DocshCommand::Show {
            kind: kind_arg(rest.first(), "Usage: docsh show <kind>")?,
        }),
        "reset" => Ok(DocshCommand::Reset {
            kind: kind_arg(rest.first(), "Usage: docsh reset <kind>")?,
        }),
        "docs" => Ok(DocshCommand::Docs),
        "open" => rest
            .first()
            .map(|id| DocshCommand::Open { id: id.clone() })
            .ok_or_else(|| Error::invalid_argument("Usage: docsh open <id>")),
        "save" => {
            let name = rest.join(" ");
            if name.trim().is_empty() {
                return Err(Error::invalid_argument("Usage: docsh save <name>"));
            }
            Ok(DocshCommand::Save { name })
        }
        fragment if fragment.starts_with('#') && rest.is_empty() => Ok(DocshCommand::Repl {
            view: DocumentKind::from_fragment(Some(fragment)),
        }),
        other => Err(Error::invalid_argument(format!(
            "Unknown command '{}'. Run docsh --help for usage.",
            other
        ))),
    }
}
