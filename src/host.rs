//! Capability seams toward the host runtime
//!
//! The host's loading machinery is consumed abstractly: the provider never
//! reaches into a concrete launcher, it is handed capability objects at
//! construction or launch time. The crash reporter in particular used to be
//! discovered through a cross-loader service lookup; here it is an explicit
//! optional collaborator passed in by the caller.

use crate::resolver::DelegatingResolver;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How invoking the game's entry method can fail
#[derive(Debug)]
pub enum InvokeError {
    /// The entry method was invoked and the game's own code failed
    Crashed(Box<dyn Error + Send + Sync>),
    /// The entry method could not be invoked at all
    NotInvokable(String),
}

/// Capabilities the host runtime lends the provider for launch
pub trait HostLauncher {
    /// Register a resolver into the loader chain, before any game class is
    /// loaded
    fn install_resolver(&mut self, resolver: Arc<DelegatingResolver>);

    /// Append one archive to the classpath the entrypoint will see
    fn add_to_classpath(&mut self, path: &Path);

    /// One-shot pre-launch hook: hand the archive list to the bytecode
    /// transform pipeline
    fn transform(&mut self, archives: &[PathBuf]) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Invoke the named class's static entry method with the given args,
    /// after classpath and transforms are finalized
    fn invoke_main(&mut self, class_name: &str, args: &[String]) -> Result<(), InvokeError>;
}

/// Optional crash-reporting collaborator
pub trait CrashReporter: Send + Sync {
    /// Record a crash; called at most once per boot
    fn log_crash(&self, error: &(dyn Error + 'static));
}
