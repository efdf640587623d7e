//! 配線: 標準アダプタで DocshUseCase を組み立てる

use std::path::PathBuf;
use std::sync::Arc;

use common::adapter::{
    DegradingKeyValueStore, FileJsonLog, FileKeyValueStore, FileSystem, KeyValueStore, Log,
    ReqwestWebhookTransport, StdClock, StdEnvResolver, StdFileSystem, StdIdGenerator,
    StderrMirrorLog, WebhookTransport,
};
use common::domain::Dirs;
use common::error::Error;
use common::ports::outbound::{EnvResolver, IdGenerator};

use crate::adapter::{
    load_config, CliOverrides, HtmlMarkdownRenderer, TerminalMarkdownRenderer, TerminalViewSink,
};
use crate::cli::Config;
use crate::domain::DocumentKind;
use crate::ports::outbound::{MarkdownRenderer, ViewSink};
use crate::usecase::app::DocshUseCase;
use crate::usecase::app_state::AppState;
use crate::usecase::document_cache::DocumentCache;
use crate::usecase::identifier_store::IdentifierStore;
use crate::usecase::library::DocumentLibrary;
use crate::usecase::remote_sync::RemoteSync;
use crate::usecase::transcript_log::TranscriptLog;
use crate::usecase::view_controller::ViewController;

/// main から使う組み立て済みのアプリ
pub struct App {
    pub logger: Arc<dyn Log>,
    pub dirs: Dirs,
    pub use_case: DocshUseCase,
}

/// 差し替え可能な外部依存（テストではスタブを渡す）
pub struct Ports {
    pub fs: Arc<dyn FileSystem>,
    pub store: Arc<dyn KeyValueStore>,
    pub transport: Arc<dyn WebhookTransport>,
    pub sink: Arc<dyn ViewSink>,
    pub renderer: Arc<dyn MarkdownRenderer>,
    pub html: Arc<dyn MarkdownRenderer>,
    pub id_gen: Arc<dyn IdGenerator>,
    pub log: Arc<dyn Log>,
}

/// ポートから DocshUseCase を組み立てる（状態はまだ表示しない）
pub fn build_use_case(ports: Ports, docsh_config: crate::domain::DocshConfig, initial: DocumentKind) -> DocshUseCase {
    let config = Arc::new(docsh_config);
    let identifiers = IdentifierStore::new(
        Arc::clone(&ports.store),
        Arc::clone(&ports.id_gen),
        Arc::clone(&ports.log),
    );
    let documents = DocumentCache::new(
        Arc::clone(&ports.store),
        Arc::clone(&ports.renderer),
        Arc::clone(&ports.sink),
        Arc::clone(&ports.log),
    );
    let transcripts = TranscriptLog::new(Arc::clone(&ports.sink));
    let state = AppState::new(initial, identifiers, documents, transcripts);
    let controller = ViewController::new(state, Arc::clone(&ports.sink), Arc::clone(&ports.log));
    let sync = RemoteSync::new(
        Arc::clone(&ports.transport),
        Arc::clone(&config),
        Arc::clone(&ports.log),
    );
    let library = DocumentLibrary::new(ports.transport, config, Arc::clone(&ports.log));
    DocshUseCase::new(controller, sync, library, ports.fs, ports.html, ports.log)
}

/// 配線: 標準アダプタで App を組み立てる
pub fn wire_docsh(cli: &Config, initial: DocumentKind) -> Result<App, Error> {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver = StdEnvResolver;
    let dirs = env_resolver.resolve_dirs()?;

    let file_log: Arc<dyn Log> = Arc::new(FileJsonLog::new(Arc::clone(&fs), dirs.log_file()));
    let logger: Arc<dyn Log> = if cli.verbose {
        Arc::new(StderrMirrorLog::new(file_log))
    } else {
        file_log
    };

    let docsh_config = load_config(
        fs.as_ref(),
        &env_resolver,
        &dirs,
        &CliOverrides {
            base_url: cli.base_url.clone(),
            user_id: cli.user.clone(),
        },
    )?;

    let state_file: PathBuf = cli.state_file.clone().unwrap_or_else(|| dirs.storage_file());
    let store: Arc<dyn KeyValueStore> = Arc::new(DegradingKeyValueStore::new(
        Arc::new(FileKeyValueStore::new(Arc::clone(&fs), state_file)),
        Arc::clone(&logger),
    ));
    let transport: Arc<dyn WebhookTransport> =
        Arc::new(ReqwestWebhookTransport::new(docsh_config.timeout)?);

    let ports = Ports {
        fs,
        store,
        transport,
        sink: Arc::new(TerminalViewSink::stdout()),
        renderer: Arc::new(TerminalMarkdownRenderer::new()),
        html: Arc::new(HtmlMarkdownRenderer::new()),
        id_gen: Arc::new(StdIdGenerator::new(Arc::new(StdClock))),
        log: Arc::clone(&logger),
    };
    Ok(App {
        logger,
        dirs,
        use_case: build_use_case(ports, docsh_config, initial),
    })
}
