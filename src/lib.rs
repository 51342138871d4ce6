//! wildermyth-provider: a game provider for a mod-loading host runtime
//!
//! Teaches a generic mod loader how to find, classify, and boot Wildermyth,
//! then exposes the hooks its bytecode-weaving pipeline needs to rewrite
//! the game's startup path before the entrypoint runs. The pieces:
//!
//! - Jar indexing and entrypoint discovery over candidate archives
//! - Classpath assembly with precedence-ordered classification rules
//! - A three-tier delegating class/resource resolver (Outer, Local, Inner)
//! - Entrypoint retargeting at whole-class granularity for the transform
//!   pipeline
//!
//! # Example
//!
//! ```no_run
//! use wildermyth_provider::{GameProvider, ProviderConfig};
//!
//! let config = ProviderConfig::new(".");
//! let mut provider = GameProvider::new(config, None);
//! let located = provider.locate_game(std::env::args().skip(1).collect())?;
//! println!("booting {} {}", located.entrypoint.class_name, located.version);
//! # Ok::<(), wildermyth_provider::error::ProviderError>(())
//! ```

// Core modules
pub mod archive;
pub mod classpath;
pub mod config;
pub mod error;
pub mod host;
pub mod patch;
pub mod provider;
pub mod resolver;

// Re-export commonly used types
pub use archive::{class_entry_name, ArchiveHandle, ArchiveSet, EntrypointDescriptor};
pub use classpath::{assemble, Classification, ClasspathPlan, LibraryCandidate, ARCHIVE_SUFFIX};
pub use config::{detect_game_version, ProviderConfig, ProviderSettings};
pub use error::{ProviderError, Result};
pub use host::{CrashReporter, HostLauncher, InvokeError};
pub use patch::{
    locate_rewrite_target, ClassEmitter, ClassNode, ClassRewriteDecision, ClassSource, MethodRef,
};
pub use provider::{BootPhase, GameProvider, LocatedGame, GAME_ID, GAME_NAME};
pub use resolver::{ClassDefinition, DelegatingResolver, LoaderScope, LocalScope};
