//! 対話ループ
//!
//! 入力待ちの前に、worker スレッドから届いた応答をすべて反映する。
//! --no-interactive では行編集を使わず標準入力を 1 行ずつ読む。

use crate::domain::{DocumentKind, ReplCommand};
use crate::usecase::app::{DocshUseCase, Flow};
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::BufRead;
use std::path::Path;

const HISTORY_FILE: &str = "history.txt";

fn prompt_for(kind: DocumentKind, busy: bool) -> String {
    if busy {
        format!("{} (waiting)> ", kind.slug())
    } else {
        format!("{}> ", kind.slug())
    }
}

/// 1 行を処理する。コマンドの誤りは画面に出してループを続ける。
fn handle_line(use_case: &mut DocshUseCase, log: &dyn Log, line: &str) -> Flow {
    let result = ReplCommand::parse(line).and_then(|cmd| use_case.execute(cmd));
    match result {
        Ok(flow) => flow,
        Err(e) => {
            let _ = log.log(
                &LogRecord::new(LogLevel::Warn, e.to_string())
                    .layer("cli")
                    .kind("repl"),
            );
            use_case.controller().notice(e.to_string());
            Flow::Continue
        }
    }
}

/// rustyline で対話する
pub fn run_interactive(
    use_case: &mut DocshUseCase,
    log: &dyn Log,
    state_dir: &Path,
    view: DocumentKind,
) -> Result<i32, Error> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| Error::system(format!("Failed to initialise line editor: {}", e)))?;
    let history = state_dir.join(HISTORY_FILE);
    let _ = rl.load_history(&history);

    use_case.controller_mut().activate(view);
    use_case.controller().notice("Type /help for commands.");

    loop {
        use_case.drain();
        let active = use_case.controller().active();
        let prompt = prompt_for(active, use_case.controller().is_busy(active));
        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                if handle_line(use_case, log, &line) == Flow::Quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                let _ = rl.save_history(&history);
                return Err(Error::io_msg(format!("readline error: {}", e)));
            }
        }
    }
    let _ = rl.save_history(&history);
    Ok(0)
}

/// 標準入力（またはテスト用の Reader）から 1 行ずつ処理する。送信は行ごとに完了を待つ。
pub fn run_script<R: BufRead>(
    use_case: &mut DocshUseCase,
    log: &dyn Log,
    input: R,
    view: DocumentKind,
) -> Result<i32, Error> {
    use_case.controller_mut().activate(view);
    for line in input.lines() {
        let line = line.map_err(|e| Error::io_msg(format!("Failed to read stdin: {}", e)))?;
        let flow = handle_line(use_case, log, &line);
        use_case.wait_idle();
        if flow == Flow::Quit {
            break;
        }
    }
    use_case.wait_idle();
    Ok(0)
}
