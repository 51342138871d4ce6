//! Entrypoint retargeting
//!
//! Before any game class is loaded, the host's transform pipeline asks this
//! module which class definition to re-emit so the weaving subsystem can
//! rewrite the game's startup path. The bytecode parser and emitter are
//! external collaborators behind the [`ClassSource`] and [`ClassEmitter`]
//! seams; this module only decides, at whole-class granularity, what gets
//! handed to them.

use crate::error::{ProviderError, Result};
use tracing::debug;

/// Name of the designated initializer: the class-level static initializer
pub const INITIALIZER_NAME: &str = "<clinit>";

/// Descriptor of the designated initializer: no arguments, void
pub const INITIALIZER_DESCRIPTOR: &str = "()V";

/// A method as seen by the bytecode parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRef {
    pub name: String,
    pub descriptor: String,
}

/// A parsed class: the name it declares plus its methods
///
/// `name` is what the class file itself declares, which may differ from the
/// name it was requested under when the game's packaging introduces an
/// indirection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    pub name: String,
    pub methods: Vec<MethodRef>,
}

impl ClassNode {
    /// Find a method by exact name and descriptor
    pub fn method(&self, name: &str, descriptor: &str) -> Option<&MethodRef> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.descriptor == descriptor)
    }
}

/// Parses archive entries into class representations
pub trait ClassSource {
    /// Load the class node for a fully qualified name, or `None` when the
    /// source has no such class
    fn load(&mut self, name: &str) -> Result<Option<ClassNode>>;
}

/// Emits class representations into the transform pipeline
pub trait ClassEmitter {
    fn emit(&mut self, node: &ClassNode) -> Result<()>;
}

/// Which class definition gets re-emitted for transformation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassRewriteDecision {
    /// The requested entry class, unchanged
    EmitRequested(ClassNode),
    /// The class that actually declares the initializer, which differs from
    /// the one requested. Found-the-real-owner correction, not a fallback.
    EmitDeclaring {
        requested: String,
        declaring: ClassNode,
    },
}

impl ClassRewriteDecision {
    /// The class definition chosen for re-emission
    pub fn target(&self) -> &ClassNode {
        match self {
            Self::EmitRequested(node) => node,
            Self::EmitDeclaring { declaring, .. } => declaring,
        }
    }
}

/// Decide which class to re-emit for the given entrypoint
///
/// Loads the node for the requested class and requires a static initializer
/// `<clinit>()V`; its absence means the game build has an unexpected entry
/// shape and is a fatal error, never a silent fallback.
pub fn locate_rewrite_target(
    source: &mut dyn ClassSource,
    requested: &str,
) -> Result<ClassRewriteDecision> {
    let node = source
        .load(requested)?
        .ok_or_else(|| ProviderError::ClassNotFound(requested.to_string()))?;

    let initializer = node
        .method(INITIALIZER_NAME, INITIALIZER_DESCRIPTOR)
        .ok_or_else(|| ProviderError::MissingInitializer {
            class: node.name.clone(),
        })?;

    debug!(
        class = %node.name,
        method = %format!("{}{}", initializer.name, initializer.descriptor),
        "found entrypoint initializer"
    );

    if node.name != requested {
        debug!(
            requested = requested,
            declaring = %node.name,
            "initializer declared by a different class, retargeting"
        );
        Ok(ClassRewriteDecision::EmitDeclaring {
            requested: requested.to_string(),
            declaring: node,
        })
    } else {
        Ok(ClassRewriteDecision::EmitRequested(node))
    }
}

/// Decide and immediately re-emit the chosen class
pub fn apply(
    source: &mut dyn ClassSource,
    emitter: &mut dyn ClassEmitter,
    requested: &str,
) -> Result<ClassRewriteDecision> {
    let decision = locate_rewrite_target(source, requested)?;
    emitter.emit(decision.target())?;
    Ok(decision)
}
