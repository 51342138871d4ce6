//! Three-tier delegating class and resource resolver
//!
//! The resolver sits in the host's loading chain and answers lookups
//! through three cooperating scopes in a fixed, non-default order: Outer,
//! then Local, then Inner. A typical loader searches itself before its
//! parent; this one does the opposite on purpose. The threat model is an
//! untrusted local archive trying to impersonate a class the Outer scope
//! already knows, so Outer always wins and can never be shadowed.

use crate::archive::{class_entry_name, ArchiveHandle};
use crate::error::{ProviderError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::trace;

/// A resolved class: fully qualified name plus its defining bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// One delegation target in the lookup chain
///
/// Outer and Inner are owned by the host and passed in at construction;
/// Local is owned by the resolver itself. Implementations must be safe to
/// call from whatever threads the host's loading machinery runs on.
pub trait LoaderScope: Send + Sync {
    /// Find a class by fully qualified name
    fn find_class(&self, name: &str) -> Option<Arc<ClassDefinition>>;

    /// Find every resource under the given name, in this scope's order
    fn find_resources(&self, name: &str) -> Vec<String>;
}

/// The Local scope: archives this resolver owns directly
pub struct LocalScope {
    archives: Mutex<Vec<ArchiveHandle>>,
}

impl LocalScope {
    pub fn new(archives: Vec<ArchiveHandle>) -> Self {
        Self {
            archives: Mutex::new(archives),
        }
    }
}

impl LoaderScope for LocalScope {
    fn find_class(&self, name: &str) -> Option<Arc<ClassDefinition>> {
        let entry = class_entry_name(name);
        let mut archives = self.archives.lock().expect("local scope poisoned");
        for handle in archives.iter_mut() {
            if handle.contains(&entry) {
                if let Ok(bytes) = handle.read_entry(&entry) {
                    return Some(Arc::new(ClassDefinition {
                        name: name.to_string(),
                        bytes,
                    }));
                }
            }
        }
        None
    }

    fn find_resources(&self, name: &str) -> Vec<String> {
        let archives = self.archives.lock().expect("local scope poisoned");
        archives
            .iter()
            .filter(|handle| handle.contains(name))
            .map(|handle| format!("jar:{}!/{}", handle.path().display(), name))
            .collect()
    }
}

/// Class and resource lookups delegated Outer first, Local second, Inner
/// last
pub struct DelegatingResolver {
    outer: Arc<dyn LoaderScope>,
    local: Arc<dyn LoaderScope>,
    inner: Arc<dyn LoaderScope>,
    resolved: Mutex<HashMap<String, Arc<ClassDefinition>>>,
}

impl DelegatingResolver {
    /// Build a resolver over the three scopes
    ///
    /// The Outer scope is mandatory. When the host cannot determine it,
    /// construction fails with a configuration error instead of silently
    /// degrading to Inner-only lookups.
    pub fn new(
        outer: Option<Arc<dyn LoaderScope>>,
        local: Arc<dyn LoaderScope>,
        inner: Arc<dyn LoaderScope>,
    ) -> Result<Self> {
        let outer = outer.ok_or(ProviderError::OuterScopeMissing)?;
        Ok(Self {
            outer,
            local,
            inner,
            resolved: Mutex::new(HashMap::new()),
        })
    }

    /// Resolve a class by fully qualified name
    ///
    /// Checks the resolved cache, then Outer, then Local, then Inner; the
    /// first scope that produces a definition wins and the result is
    /// cached. Redundant resolution under a race is harmless since results
    /// are immutable, so the cache is not held locked across scope calls.
    pub fn find_class(&self, name: &str) -> Option<Arc<ClassDefinition>> {
        if let Some(hit) = self.resolved.lock().expect("cache poisoned").get(name) {
            return Some(Arc::clone(hit));
        }

        let found = self
            .outer
            .find_class(name)
            .or_else(|| {
                trace!(class = name, "not in outer scope, trying local");
                self.local.find_class(name)
            })
            .or_else(|| {
                trace!(class = name, "not in local scope, trying inner");
                self.inner.find_class(name)
            })?;

        let mut cache = self.resolved.lock().expect("cache poisoned");
        let cached = cache
            .entry(name.to_string())
            .or_insert_with(|| Arc::clone(&found));
        Some(Arc::clone(cached))
    }

    /// First resource found, in Outer, Local, Inner order
    pub fn find_resource(&self, name: &str) -> Option<String> {
        [&self.outer, &self.local, &self.inner]
            .into_iter()
            .flat_map(|scope| scope.find_resources(name))
            .next()
    }

    /// Every resource from every scope, Outer then Local then Inner
    ///
    /// Never short-circuits: multiple scopes may legitimately contribute
    /// same-named resources (service registration files, say) and all must
    /// stay visible. Exact duplicates are removed, order preserved.
    pub fn find_all_resources(&self, name: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut resources = Vec::new();
        for scope in [&self.outer, &self.local, &self.inner] {
            for resource in scope.find_resources(name) {
                if seen.insert(resource.clone()) {
                    resources.push(resource);
                }
            }
        }
        resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-answer scope for delegation-order tests
    struct StaticScope {
        classes: HashMap<String, Arc<ClassDefinition>>,
        resources: HashMap<String, Vec<String>>,
    }

    impl StaticScope {
        fn new() -> Self {
            Self {
                classes: HashMap::new(),
                resources: HashMap::new(),
            }
        }

        fn with_class(mut self, name: &str, bytes: &[u8]) -> Self {
            self.classes.insert(
                name.to_string(),
                Arc::new(ClassDefinition {
                    name: name.to_string(),
                    bytes: bytes.to_vec(),
                }),
            );
            self
        }

        fn with_resource(mut self, name: &str, urls: &[&str]) -> Self {
            self.resources.insert(
                name.to_string(),
                urls.iter().map(|s| s.to_string()).collect(),
            );
            self
        }
    }

    impl LoaderScope for StaticScope {
        fn find_class(&self, name: &str) -> Option<Arc<ClassDefinition>> {
            self.classes.get(name).cloned()
        }

        fn find_resources(&self, name: &str) -> Vec<String> {
            self.resources.get(name).cloned().unwrap_or_default()
        }
    }

    fn empty_scope() -> Arc<dyn LoaderScope> {
        Arc::new(StaticScope::new())
    }

    #[test]
    fn test_outer_scope_is_mandatory() {
        let result = DelegatingResolver::new(None, empty_scope(), empty_scope());
        assert!(matches!(result, Err(ProviderError::OuterScopeMissing)));
    }

    #[test]
    fn test_outer_wins_over_local_and_inner() {
        let outer: Arc<dyn LoaderScope> =
            Arc::new(StaticScope::new().with_class("pkg.Same", b"outer"));
        let local = Arc::new(StaticScope::new().with_class("pkg.Same", b"local"));
        let inner = Arc::new(StaticScope::new().with_class("pkg.Same", b"inner"));

        let resolver = DelegatingResolver::new(Some(outer), local, inner).unwrap();
        let class = resolver.find_class("pkg.Same").unwrap();
        assert_eq!(class.bytes, b"outer");
    }

    #[test]
    fn test_local_wins_over_inner() {
        let local = Arc::new(StaticScope::new().with_class("pkg.Dep", b"local"));
        let inner = Arc::new(StaticScope::new().with_class("pkg.Dep", b"inner"));

        let resolver = DelegatingResolver::new(Some(empty_scope()), local, inner).unwrap();
        assert_eq!(resolver.find_class("pkg.Dep").unwrap().bytes, b"local");
    }

    #[test]
    fn test_inner_fallback() {
        let inner = Arc::new(StaticScope::new().with_class("pkg.Only", b"inner"));
        let resolver =
            DelegatingResolver::new(Some(empty_scope()), empty_scope(), inner).unwrap();
        assert_eq!(resolver.find_class("pkg.Only").unwrap().bytes, b"inner");
        assert!(resolver.find_class("pkg.Absent").is_none());
    }

    #[test]
    fn test_result_is_cached() {
        let outer: Arc<dyn LoaderScope> =
            Arc::new(StaticScope::new().with_class("pkg.A", b"outer"));
        let resolver =
            DelegatingResolver::new(Some(outer), empty_scope(), empty_scope()).unwrap();

        let first = resolver.find_class("pkg.A").unwrap();
        let second = resolver.find_class("pkg.A").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_resource_union_order_and_dedup() {
        let outer: Arc<dyn LoaderScope> = Arc::new(StaticScope::new().with_resource(
            "META-INF/services/s",
            &["jar:outer.jar!/META-INF/services/s"],
        ));
        let local = Arc::new(StaticScope::new().with_resource(
            "META-INF/services/s",
            &[
                "jar:local.jar!/META-INF/services/s",
                "jar:outer.jar!/META-INF/services/s",
            ],
        ));
        let inner = Arc::new(StaticScope::new().with_resource(
            "META-INF/services/s",
            &["jar:inner.jar!/META-INF/services/s"],
        ));

        let resolver = DelegatingResolver::new(Some(outer), local, inner).unwrap();
        let all = resolver.find_all_resources("META-INF/services/s");
        assert_eq!(
            all,
            vec![
                "jar:outer.jar!/META-INF/services/s",
                "jar:local.jar!/META-INF/services/s",
                "jar:inner.jar!/META-INF/services/s",
            ]
        );
    }

    #[test]
    fn test_single_resource_lookup_order() {
        let local =
            Arc::new(StaticScope::new().with_resource("conf.properties", &["jar:local!/conf"]));
        let inner =
            Arc::new(StaticScope::new().with_resource("conf.properties", &["jar:inner!/conf"]));

        let resolver = DelegatingResolver::new(Some(empty_scope()), local, inner).unwrap();
        assert_eq!(
            resolver.find_resource("conf.properties").unwrap(),
            "jar:local!/conf"
        );
        assert!(resolver.find_resource("absent").is_none());
    }

    #[test]
    fn test_local_scope_reads_from_archives() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;
        use zip::ZipWriter;

        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("dep.jar");
        {
            let file = std::fs::File::create(&jar).unwrap();
            let mut writer = ZipWriter::new(file);
            writer
                .start_file("pkg/Thing.class", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"\xca\xfe\xba\xbe").unwrap();
            writer.finish().unwrap();
        }

        let local = LocalScope::new(vec![ArchiveHandle::open(&jar).unwrap()]);
        let class = local.find_class("pkg.Thing").unwrap();
        assert_eq!(class.name, "pkg.Thing");
        assert_eq!(class.bytes, b"\xca\xfe\xba\xbe");

        let resources = local.find_resources("pkg/Thing.class");
        assert_eq!(resources.len(), 1);
        assert!(resources[0].starts_with("jar:"));
    }
}
