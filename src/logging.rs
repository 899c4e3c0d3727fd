use flexi_logger::{opt_format, Logger};

pub fn setup_logging() {
    Logger::try_with_env_or_str("info")  // Use the log level from the environment or fallback to "info"
        .unwrap()
        .log_to_stderr()
        .format(opt_format)
        .start()
        .unwrap();
}
