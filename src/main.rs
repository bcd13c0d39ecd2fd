use std::io;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use campus_admin::config::{AppConfig, CorsConfig};
use campus_admin::models::AppStartTime;
use campus_admin::routes;
use campus_admin::runtime::lifetime;
use campus_admin::utils::{json_error_handler, path_error_handler, query_error_handler};

/// `*` 表示不限制该项
fn build_cors(cors: &CorsConfig) -> Cors {
    let wildcard = |items: &[String]| items.iter().any(|i| i == "*");
    let mut builder = Cors::default().max_age(cors.max_age);

    builder = if wildcard(&cors.allowed_origins) {
        builder.allow_any_origin()
    } else {
        cors.allowed_origins
            .iter()
            .fold(builder, |b, origin| b.allowed_origin(origin))
    };

    builder = if wildcard(&cors.allowed_methods) {
        builder.allow_any_method()
    } else {
        builder.allowed_methods(cors.allowed_methods.iter().map(String::as_str))
    };

    if wildcard(&cors.allowed_headers) {
        builder.allow_any_header()
    } else {
        builder.allowed_headers(cors.allowed_headers.iter().map(String::as_str))
    }
}

/// 开发环境输出带源码位置的彩色日志，其余环境输出 JSON 便于日志平台采集
fn init_tracing(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(io::stdout());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.app.log_level))
        .with_writer(writer)
        .with_level(true);

    if config.is_development() {
        builder
            .with_ansi(true)
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        builder.with_ansi(false).json().init();
    }
    guard
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    setup_panic!();

    let started = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    AppConfig::init().map_err(|e| io::Error::other(format!("Invalid configuration: {e}")))?;
    let config = AppConfig::get();
    let _log_guard = init_tracing(config);

    info!(
        "{} v{} starting ({}, {} environment)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.app.system_name,
        config.app.environment
    );

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| io::Error::other(format!("Server startup failed: {e}")))?;
    let (storage, cache) = (startup.storage, startup.cache);

    info!(
        "Startup finished in {} ms, running {} worker(s)",
        (chrono::Utc::now() - started.start_datetime).num_milliseconds(),
        config.server.workers
    );

    let keep_alive = Duration::from_secs(config.server.timeouts.keep_alive);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.cors))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Keep-Alive", format!("timeout={}", keep_alive.as_secs())))
                    .add(("Cache-Control", "no-store")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(started.clone()))
            .configure(routes::configure_api_routes)
    })
    .keep_alive(keep_alive)
    .client_request_timeout(Duration::from_millis(config.server.timeouts.client_request))
    .client_disconnect_timeout(Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    #[cfg(unix)]
    let server = match config.unix_socket_path() {
        Some(socket_path) => {
            // 上次异常退出可能留下旧的套接字文件
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            warn!("Listening on unix socket {}", socket_path);
            server.bind_uds(socket_path)?
        }
        None => {
            warn!("Listening on http://{}", config.server_bind_address());
            server.bind(config.server_bind_address())?
        }
    };

    #[cfg(not(unix))]
    let server = {
        warn!("Listening on http://{}", config.server_bind_address());
        server.bind(config.server_bind_address())?
    };

    let server = server.run();
    tokio::spawn(lifetime::shutdown::stop_on_signal(server.handle()));
    server.await
}
