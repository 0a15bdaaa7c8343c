use std::sync::OnceLock;

pub type LoggerInit = Box<dyn Fn() -> Result<(), log::SetLoggerError> + Send + Sync + 'static>;

static LOGGER_INSTALLED: OnceLock<bool> = OnceLock::new();

pub struct Logging;

impl Logging {
    /// Run `init` at most once per process and report whether a logger ended up installed.
    ///
    /// Later calls return the first outcome without invoking their initializer, so adapters can
    /// call this on every request (Workers have no separate startup hook).
    pub fn init_with(init: LoggerInit) -> bool {
        *LOGGER_INSTALLED.get_or_init(|| match init() {
            Ok(()) => true,
            Err(err) => {
                // Another logger owns the facade already; keep using it.
                log::debug!("logger already installed: {err}");
                false
            }
        })
    }

    pub fn is_initialized() -> bool {
        LOGGER_INSTALLED.get().is_some()
    }
}
