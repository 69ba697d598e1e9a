// 日志工具模块
//
// 封装 flexi_logger 的初始化和关闭，异步写入的日志在退出前需要 flush

use crate::config::LogConfig;
use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
    WriteMode,
};
use parking_lot::Mutex;

/// 全局日志句柄
static LOGGER_HANDLE: Mutex<Option<LoggerHandle>> = parking_lot::const_mutex(None);

/// 初始化日志系统
///
/// 重复初始化时直接返回，保留第一次的配置。
pub fn init(config: &LogConfig) -> Result<(), FlexiLoggerError> {
    let mut guard = LOGGER_HANDLE.lock();
    if guard.is_some() {
        return Ok(());
    }

    let handle = Logger::try_with_env_or_str(&config.level)?
        .log_to_file(
            FileSpec::default()
                .basename(&config.file)
                .directory(&config.dir),
        )
        .rotate(
            Criterion::Size(config.max_file_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.max_files),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .write_mode(WriteMode::Async)
        .append()
        .start()?;
    *guard = Some(handle);

    log::info!("日志系统初始化完成: {}/{}", config.dir, config.file);
    Ok(())
}

/// 刷新并关闭日志系统
pub fn shutdown() {
    if let Some(handle) = LOGGER_HANDLE.lock().take() {
        handle.flush();
    }
}

pub fn is_initialized() -> bool {
    LOGGER_HANDLE.lock().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_init_and_shutdown() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = LogConfig {
            dir: dir.path().to_string_lossy().into_owned(),
            ..LogConfig::default()
        };

        init(&config).expect("日志初始化失败");
        assert!(is_initialized());
        log::info!("测试日志消息");

        shutdown();
        assert!(!is_initialized());
    }
}
