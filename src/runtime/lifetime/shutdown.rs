use actix_web::dev::ServerHandle;
use tokio::signal;
use tracing::{error, info, warn};

/// Ctrl+C 或 SIGTERM（容器停止）任一到达即返回
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// 收到停止信号后让服务器处理完在途请求再退出
pub async fn stop_on_signal(handle: ServerHandle) {
    wait_for_signal().await;
    warn!("Shutdown signal received, draining in-flight requests...");
    handle.stop(true).await;
    info!("Server stopped");
}
