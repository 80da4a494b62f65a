// crates/citysuggest-core/src/logging.rs
use crate::error::CitySuggestError;
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Install a `tracing` fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to everything.
/// Calling this more than once is a no-op, so tests and binaries can both
/// call it freely.
///
/// ```rust
/// use citysuggest_core::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), citysuggest_core::CitySuggestError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), CitySuggestError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(level.into().to_string())?,
        };

        // A global subscriber may already exist (e.g. set by a host binary).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
        Ok(())
    })
}
