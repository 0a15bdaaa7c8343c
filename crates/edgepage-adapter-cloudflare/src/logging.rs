use edgepage_core::logging::Logging;
use log::{Level, LevelFilter};

/// Route the `log` facade to the Workers console through a `fern` dispatch.
///
/// The runtime stamps every console line itself, so records carry only level, target and message.
pub fn init_logger(level: LevelFilter) -> bool {
    Logging::init_with(Box::new(move || {
        fern::Dispatch::new()
            .level(level)
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} {} {}",
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(fern::Output::call(|record| {
                let line = record.args().to_string();
                if record.level() <= Level::Warn {
                    worker::console_error!("{}", line);
                } else {
                    worker::console_log!("{}", line);
                }
            }))
            .apply()?;
        log::set_max_level(level);
        Ok(())
    }))
}
