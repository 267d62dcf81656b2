//! Context injection for components.
//!
//! A component wrapped by [`with_registries`] receives, on every render, a
//! shared handle to the [`InjectionContext`] (`neos`), its own props, and
//! props derived from the global registry. The context is passed in
//! explicitly; there is no ambient global.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::trace;

use crate::registry::MetaRegistry;

/// Configuration, registry tree and routes shared by all components.
///
/// Created once after bootstrap and read-only afterwards.
#[derive(Clone)]
pub struct InjectionContext {
    pub configuration: Arc<Value>,
    pub global_registry: Arc<MetaRegistry>,
    pub routes: Arc<Value>,
}

impl InjectionContext {
    pub fn new(configuration: Value, global_registry: Arc<MetaRegistry>, routes: Value) -> Self {
        Self {
            configuration: Arc::new(configuration),
            global_registry,
            routes: Arc::new(routes),
        }
    }

    /// Equal configuration and routes (by value) and the same registry tree.
    fn same_fields(&self, other: &InjectionContext) -> bool {
        same_value(&self.configuration, &other.configuration)
            && Arc::ptr_eq(&self.global_registry, &other.global_registry)
            && same_value(&self.routes, &other.routes)
    }
}

fn same_value(a: &Arc<Value>, b: &Arc<Value>) -> bool {
    Arc::ptr_eq(a, b) || a == b
}

/// Single-slot memo for the `neos` handle.
///
/// Returns the previous handle while the context fields are unchanged, so
/// downstream equality checks on `neos` stay cheap and stable.
#[derive(Default)]
pub struct ContextMemo {
    last: Mutex<Option<Arc<InjectionContext>>>,
}

impl ContextMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self, context: &InjectionContext) -> Arc<InjectionContext> {
        let mut last = self.last.lock();
        if let Some(cached) = last.as_ref() {
            if cached.same_fields(context) {
                return cached.clone();
            }
        }
        let fresh = Arc::new(context.clone());
        *last = Some(fresh.clone());
        fresh
    }
}

/// Props handed to a decorated component.
pub struct InjectedProps<O, D> {
    pub neos: Arc<InjectionContext>,
    pub own: O,
    /// Props computed from the global registry by the decorator's map.
    /// Kept apart from `own`; a component that sees the same value in both
    /// decides which one wins.
    pub derived: D,
}

/// Something that renders props into an output.
pub trait Component {
    type Props;
    type Output;

    fn name(&self) -> &str;

    fn render(&self, props: Self::Props) -> Self::Output;
}

/// Wrapper factory returned by [`with_registries`].
pub struct Decorator<M> {
    map: M,
}

/// Build a decorator from a function mapping the global registry to props.
pub fn with_registries<M>(map: M) -> Decorator<M> {
    Decorator { map }
}

impl<M> Decorator<M> {
    pub fn wrap<C: Component>(self, inner: C) -> Decorated<C, M> {
        let display_name = format!("Neos({})", inner.name());
        Decorated {
            inner,
            map: self.map,
            memo: ContextMemo::new(),
            display_name,
        }
    }
}

/// A component with registry-derived props and the `neos` handle injected.
pub struct Decorated<C, M> {
    inner: C,
    map: M,
    memo: ContextMemo,
    display_name: String,
}

impl<C, M> Decorated<C, M> {
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The wrapped component.
    pub fn original(&self) -> &C {
        &self.inner
    }
}

impl<C, M, O, D> Decorated<C, M>
where
    C: Component<Props = InjectedProps<O, D>>,
    M: Fn(&MetaRegistry) -> D,
{
    /// Render with the given context.
    ///
    /// Returns `None` when no context is available yet, e.g. during early
    /// bootstrap.
    pub fn render(&self, context: Option<&InjectionContext>, own: O) -> Option<C::Output> {
        let Some(context) = context else {
            trace!(component = %self.display_name, "No injection context, rendering nothing");
            return None;
        };

        let derived = (self.map)(&*context.global_registry);
        let neos = self.memo.handle(context);
        Some(self.inner.render(InjectedProps { neos, own, derived }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{OverwritePolicy, Registry};
    use serde_json::json;

    struct EditorList;

    impl Component for EditorList {
        type Props = InjectedProps<&'static str, Vec<String>>;
        type Output = (Arc<InjectionContext>, String);

        fn name(&self) -> &str {
            "EditorList"
        }

        fn render(&self, props: Self::Props) -> Self::Output {
            (props.neos, format!("{}: {}", props.own, props.derived.join(",")))
        }
    }

    fn registry() -> Arc<MetaRegistry> {
        let global = MetaRegistry::new("Global registry");
        let editors = global
            .add_registry("editors", Registry::<u8>::new("editors", OverwritePolicy::Reject))
            .unwrap();
        editors.add("TextField", 1).unwrap();
        editors.add("SelectBox", 2).unwrap();
        Arc::new(global)
    }

    fn editor_keys(global: &MetaRegistry) -> Vec<String> {
        global
            .registry::<Registry<u8>>("editors")
            .map(|r| r.keys())
            .unwrap_or_default()
    }

    #[test]
    fn test_renders_nothing_without_context() {
        let decorated = with_registries(editor_keys).wrap(EditorList);
        assert!(decorated.render(None, "editors").is_none());
    }

    #[test]
    fn test_render_merges_props() {
        let decorated = with_registries(editor_keys).wrap(EditorList);
        let context = InjectionContext::new(json!({}), registry(), json!({}));

        let (_, text) = decorated.render(Some(&context), "editors").unwrap();
        assert_eq!(text, "editors: TextField,SelectBox");
    }

    #[test]
    fn test_display_name_and_original() {
        let decorated = with_registries(editor_keys).wrap(EditorList);
        assert_eq!(decorated.display_name(), "Neos(EditorList)");
        assert_eq!(decorated.original().name(), "EditorList");
    }

    #[test]
    fn test_neos_handle_stable_for_equal_fields() {
        let decorated = with_registries(editor_keys).wrap(EditorList);
        let global = registry();

        let first = InjectionContext::new(json!({"a": 1}), global.clone(), json!({"home": "/"}));
        // Rebuilt context with equal values but fresh allocations.
        let second = InjectionContext::new(json!({"a": 1}), global, json!({"home": "/"}));

        let (neos1, _) = decorated.render(Some(&first), "x").unwrap();
        let (neos2, _) = decorated.render(Some(&second), "x").unwrap();
        assert!(Arc::ptr_eq(&neos1, &neos2));
    }

    #[test]
    fn test_neos_handle_changes_with_fields() {
        let decorated = with_registries(editor_keys).wrap(EditorList);
        let global = registry();

        let first = InjectionContext::new(json!({"a": 1}), global.clone(), json!({}));
        let changed_config = InjectionContext::new(json!({"a": 2}), global.clone(), json!({}));
        let changed_routes = InjectionContext::new(json!({"a": 2}), global, json!({"x": "/x"}));
        let changed_registry = InjectionContext::new(json!({"a": 2}), registry(), json!({"x": "/x"}));

        let (neos1, _) = decorated.render(Some(&first), "x").unwrap();
        let (neos2, _) = decorated.render(Some(&changed_config), "x").unwrap();
        let (neos3, _) = decorated.render(Some(&changed_routes), "x").unwrap();
        let (neos4, _) = decorated.render(Some(&changed_registry), "x").unwrap();

        assert!(!Arc::ptr_eq(&neos1, &neos2));
        assert!(!Arc::ptr_eq(&neos2, &neos3));
        assert!(!Arc::ptr_eq(&neos3, &neos4));
        assert_eq!(*neos2.configuration, json!({"a": 2}));
    }

    #[test]
    fn test_missing_registry_degrades() {
        let decorated = with_registries(editor_keys).wrap(EditorList);
        let context = InjectionContext::new(
            json!({}),
            Arc::new(MetaRegistry::new("empty")),
            json!({}),
        );

        let (_, text) = decorated.render(Some(&context), "editors").unwrap();
        assert_eq!(text, "editors: ");
    }
}
