//! The Wildermyth game provider
//!
//! Drives the one-shot boot pipeline: locate the game jar and its
//! entrypoint, assemble the classpath, detect the version, then launch
//! through the host's capabilities. Everything runs single-threaded and
//! exactly once per process; archives opened during discovery are closed
//! before the pipeline proceeds past that phase.

use crate::archive::{locate, ArchiveSet, EntrypointDescriptor};
use crate::classpath::{assemble, ClasspathPlan};
use crate::config::{detect_game_version, ProviderConfig};
use crate::error::{ProviderError, Result};
use crate::host::{CrashReporter, HostLauncher, InvokeError};
use crate::resolver::DelegatingResolver;
use std::sync::Arc;
use tracing::info;

/// Stable identifier of the provided game
pub const GAME_ID: &str = "wildermyth";

/// Display name of the provided game
pub const GAME_NAME: &str = "Wildermyth";

/// Argument keys whose values are stripped from sanitized launch args
pub const SENSITIVE_ARGS: &[&str] = &[];

/// Everything the locate phase resolves
#[derive(Debug, Clone)]
pub struct LocatedGame {
    /// Where the startup class lives and what it is called
    pub entrypoint: EntrypointDescriptor,
    /// Ordered classpath plan, game archive first
    pub classpath: ClasspathPlan,
    /// Normalized game version from `version.txt`
    pub version: String,
}

/// Boot pipeline for one process lifetime
pub struct GameProvider {
    config: ProviderConfig,
    arguments: Vec<String>,
    crash_reporter: Option<Arc<dyn CrashReporter>>,
    located: Option<LocatedGame>,
}

impl GameProvider {
    /// Build a provider; the crash reporter is an optional collaborator
    /// supplied by the caller, not looked up at run time
    pub fn new(config: ProviderConfig, crash_reporter: Option<Arc<dyn CrashReporter>>) -> Self {
        Self {
            config,
            arguments: Vec::new(),
            crash_reporter,
            located: None,
        }
    }

    pub fn game_id(&self) -> &'static str {
        GAME_ID
    }

    pub fn game_name(&self) -> &'static str {
        GAME_NAME
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// The locate phase's result, once it has run
    pub fn located(&self) -> Option<&LocatedGame> {
        self.located.as_ref()
    }

    /// Resolved entrypoint class name, once located
    pub fn entrypoint(&self) -> Option<&str> {
        self.located.as_ref().map(|l| l.entrypoint.class_name.as_str())
    }

    /// Normalized game version, once located
    pub fn game_version(&self) -> Option<&str> {
        self.located.as_ref().map(|l| l.version.as_str())
    }

    /// Locate phase: resolve the game jar, its entrypoint, the classpath,
    /// and the game version
    ///
    /// Every archive opened here is closed before this returns, on success
    /// and on every failure path.
    pub fn locate_game(&mut self, args: Vec<String>) -> Result<&LocatedGame> {
        self.arguments = args;

        let game_archive = self.config.game_archive_path();
        if !game_archive.exists() {
            return Err(ProviderError::GameArchiveMissing(game_archive));
        }

        // Scoped discovery pass: the set closes its handles on drop even if
        // location fails midway.
        let entrypoint = {
            let mut archives = ArchiveSet::new();
            archives.open(&game_archive)?;
            let found = locate(archives.handles(), &self.config.entrypoint_candidates);
            archives.close_all();
            debug_assert_eq!(archives.open_count(), 0);

            found.ok_or_else(|| ProviderError::EntrypointNotFound {
                candidates: self.config.entrypoint_candidates.clone(),
            })?
        };

        let classpath = assemble(&self.config)?;
        let version = detect_game_version(&self.config.launch_dir)?;

        info!(
            entrypoint = %entrypoint.class_name,
            version = %version,
            libraries = classpath.libraries().count(),
            "located game"
        );

        self.located = Some(LocatedGame {
            entrypoint,
            classpath,
            version,
        });
        Ok(self.located.as_ref().expect("just set"))
    }

    /// Launch phase: install the resolver, expose the classpath, run the
    /// transform hook, then invoke the entrypoint
    ///
    /// The resolver is optional because its Outer and Inner scopes belong
    /// to the host; an embedder that manages its own loader chain may pass
    /// `None` and install one itself.
    pub fn launch(
        &self,
        host: &mut dyn HostLauncher,
        resolver: Option<Arc<DelegatingResolver>>,
    ) -> Result<()> {
        let located = self.located.as_ref().ok_or_else(|| ProviderError::LaunchFailed {
            game: GAME_NAME.to_string(),
            reason: "locate phase has not run".to_string(),
        })?;

        if let Some(resolver) = resolver {
            host.install_resolver(resolver);
        }

        let classpath = located.classpath.classpath();
        for path in &classpath {
            host.add_to_classpath(path);
        }

        host.transform(&classpath)
            .map_err(|source| ProviderError::LaunchFailed {
                game: GAME_NAME.to_string(),
                reason: format!("entrypoint transform failed: {source}"),
            })?;

        match host.invoke_main(&located.entrypoint.class_name, &self.arguments) {
            Ok(()) => Ok(()),
            Err(InvokeError::Crashed(source)) => Err(ProviderError::GameCrashed {
                game: GAME_NAME.to_string(),
                source,
            }),
            Err(InvokeError::NotInvokable(reason)) => Err(ProviderError::LaunchFailed {
                game: GAME_NAME.to_string(),
                reason,
            }),
        }
    }

    /// Forward a crash to the reporting collaborator, when one was supplied
    ///
    /// Returns whether a reporter handled the crash.
    pub fn display_crash(&self, error: &(dyn std::error::Error + 'static)) -> bool {
        match &self.crash_reporter {
            Some(reporter) => {
                reporter.log_crash(error);
                true
            }
            None => false,
        }
    }

    /// Launch arguments as given, or with sensitive `--key value` pairs
    /// stripped
    pub fn launch_arguments(&self, sanitize: bool) -> Vec<String> {
        if !sanitize {
            return self.arguments.clone();
        }
        sanitize_arguments(&self.arguments, SENSITIVE_ARGS)
    }
}

/// Drop the value of every `--key value` pair whose key is sensitive
fn sanitize_arguments(args: &[String], sensitive: &[&str]) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if i + 1 < args.len()
            && arg.starts_with("--")
            && sensitive
                .iter()
                .any(|s| s.eq_ignore_ascii_case(&arg[2..]))
        {
            i += 2; // skip key and value
        } else {
            out.push(arg.clone());
            i += 1;
        }
    }
    out
}

/// Where an in-progress boot stands; purely informational
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    /// Nothing resolved yet
    Unlocated,
    /// Locate phase completed, classpath and entrypoint known
    Located,
}

impl GameProvider {
    pub fn phase(&self) -> BootPhase {
        if self.located.is_some() {
            BootPhase::Located
        } else {
            BootPhase::Unlocated
        }
    }
}
