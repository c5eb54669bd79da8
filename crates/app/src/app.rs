use paths::PathContext;
use std::marker::PhantomData;
#[cfg(debug_assertions)]
use std::path::PathBuf;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application infrastructure context.
///
/// Contains path management, version info, and logging infrastructure.
pub struct AppContext {
    pub path_context: PathContext,
    pub version: &'static str,
    /// The log guard must be kept alive for the duration of the application
    /// to ensure log messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }
}

/// Application metadata trait.
///
/// Define your application's identity by implementing this trait.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const STUDIO: &'static str = "chicken105";
    const PROJECT_ID: &'static str = "dynamic_form";
}

/// Name of the environment variable holding the log filter, e.g. `DYNAMIC_FORM_LOG`.
pub fn log_env_var(app_id: &str) -> String {
    format!("{}_LOG", app_id.to_uppercase())
}

/// Default filter directive when the log environment variable is unset.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "info"
    } else {
        "warn"
    }
}

/// Builder for creating applications with proper initialization.
///
/// Nothing happens until [`AppBuilder::build`]: the path context is created,
/// directories are ensured and the global tracing subscriber is installed.
pub struct AppBuilder<A: Application> {
    version: &'static str,
    console_logging: bool,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    pub fn new(version: &'static str) -> Self {
        Self {
            version,
            console_logging: true,
            _marker: PhantomData,
        }
    }

    /// Mirror log output to stderr.
    ///
    /// Terminal UIs own the screen and must turn this off.
    pub fn console_logging(mut self, enabled: bool) -> Self {
        self.console_logging = enabled;
        self
    }

    fn path_context() -> PathContext {
        #[cfg(debug_assertions)]
        {
            PathContext::with_base_path(
                PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                    .join("..")
                    .join("..")
                    .join(".out"),
                A::STUDIO,
                A::PROJECT_ID,
                A::APP_ID,
            )
        }
        #[cfg(not(debug_assertions))]
        {
            PathContext::new(A::STUDIO, A::PROJECT_ID, A::APP_ID)
        }
    }

    pub fn build(self) -> Result<AppContext, BoxError> {
        let path_context = Self::path_context();
        path_context.ensure_directories()?;

        let log_file_path = path_context.log_file_now();
        let log_dir = log_file_path
            .parent()
            .ok_or("log file path has no parent directory")?;
        let log_filename = log_file_path
            .file_name()
            .ok_or("log file path has no file name")?;

        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let filter = EnvFilter::try_from_env(log_env_var(A::APP_ID))
            .unwrap_or_else(|_| EnvFilter::new(default_log_level()));

        let file_layer = fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking);

        let console_layer = self.console_logging.then(|| {
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .with(ErrorLayer::default())
            .try_init()?;

        tracing::info!(
            app = A::APP_ID,
            version = self.version,
            log_file = %log_file_path.display(),
            "logging initialized"
        );

        Ok(AppContext {
            path_context,
            version: self.version,
            _log_guard: guard,
        })
    }
}
