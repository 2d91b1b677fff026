use std::process::ExitCode;

use textserve::config::{AppState, Config, DEFAULT_CONFIG_PATH};
use textserve::error::ServerError;
use textserve::logger;
use textserve::server::{start_signal_handler, Server};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("textserve: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ServerError> {
    // Optional config file path (without extension) as the only argument
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;

    logger::init(&cfg).map_err(ServerError::LogFile)?;
    let state = AppState::new(cfg)?;

    // 创建 Tokio 运行时，根据 workers 配置设置线程数
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = state.config.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(ServerError::Runtime)?;

    runtime.block_on(async_main(state))
}

async fn async_main(state: AppState) -> Result<(), ServerError> {
    let server = Server::bind(state)?;
    logger::log_server_start(
        &server.local_addr(),
        &server.state().root,
        &server.state().config,
    );

    start_signal_handler(server.shutdown_handle());
    server.run().await;
    Ok(())
}
