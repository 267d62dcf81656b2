    use super::*;
    use crate::registry::Registry;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CreateEditors;

    impl Manifest for CreateEditors {
        fn name(&self) -> &str {
            "main"
        }

        fn bootstrap(&self, registry: &MetaRegistry, ctx: &ManifestContext) -> Result<(), BootstrapError> {
            let inspector = registry.add_registry("inspector", MetaRegistry::new("Inspector"))?;
            let editors =
                inspector.add_registry("editors", Registry::<String>::new("editors", ctx.leaf_policy))?;
            editors.add("TextField", "TextInput".to_string())?;
            Ok(())
        }
    }

    struct AddEditor {
        key: &'static str,
        depends_on_main: bool,
    }

    impl Manifest for AddEditor {
        fn name(&self) -> &str {
            self.key
        }

        fn dependencies(&self) -> Vec<String> {
            if self.depends_on_main {
                vec!["main".to_string()]
            } else {
                Vec::new()
            }
        }

        fn bootstrap(&self, registry: &MetaRegistry, _ctx: &ManifestContext) -> Result<(), BootstrapError> {
            let editors = registry.resolve_as::<Registry<String>>("inspector/editors")?;
            editors.add("TextField", self.key.to_string())?;
            Ok(())
        }
    }

    struct Counting(Arc<AtomicUsize>);

    impl Manifest for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn bootstrap(&self, _registry: &MetaRegistry, _ctx: &ManifestContext) -> Result<(), BootstrapError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_bootstrap_populates_and_freezes() {
        let mut bootstrapper = Bootstrapper::new(ManifestContext::default()).with_manifest(CreateEditors);
        assert_eq!(bootstrapper.state(), BootstrapState::Uninitialized);

        let registry = bootstrapper.run().unwrap();
        assert_eq!(bootstrapper.state(), BootstrapState::Populated);

        let editors = registry.resolve_as::<Registry<String>>("inspector/editors").unwrap();
        assert_eq!(editors.get("TextField").unwrap().as_str(), "TextInput");
        assert!(editors.is_frozen());
        assert!(registry.is_frozen());
    }

    #[test]
    fn test_bootstrap_runs_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut bootstrapper =
            Bootstrapper::new(ManifestContext::default()).with_manifest(Counting(count.clone()));

        bootstrapper.run().unwrap();
        let second = bootstrapper.run();
        assert!(matches!(second, Err(BootstrapError::AlreadyBootstrapped)));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_key_aborts_bootstrap() {
        let mut bootstrapper = Bootstrapper::new(ManifestContext::default())
            .with_manifest(CreateEditors)
            .with_manifest(AddEditor {
                key: "site",
                depends_on_main: true,
            });

        let result = bootstrapper.run();
        assert!(matches!(
            result,
            Err(BootstrapError::Registry(RegistryError::DuplicateKey(ref key))) if key == "TextField"
        ));
        assert_eq!(bootstrapper.state(), BootstrapState::Failed);
        assert!(bootstrapper.run().is_err());
    }

    #[test]
    fn test_overwrite_policy_lets_later_manifest_win() {
        let ctx = ManifestContext::new(Value::Null, OverwritePolicy::Overwrite);
        let mut bootstrapper = Bootstrapper::new(ctx)
            .with_manifest(CreateEditors)
            .with_manifest(AddEditor {
                key: "site",
                depends_on_main: true,
            });

        let registry = bootstrapper.run().unwrap();
        let editors = registry.resolve_as::<Registry<String>>("inspector/editors").unwrap();
        assert_eq!(editors.get("TextField").unwrap().as_str(), "site");
        assert_eq!(editors.len(), 1);
    }

    #[test]
    fn test_missing_dependency() {
        let mut bootstrapper = Bootstrapper::new(ManifestContext::default()).with_manifest(AddEditor {
            key: "site",
            depends_on_main: true,
        });

        let result = bootstrapper.run();
        match result {
            Err(BootstrapError::DependencyNotSatisfied { manifest, dependency }) => {
                assert_eq!(manifest, "site");
                assert_eq!(dependency, "main");
            }
            _ => panic!("expected DependencyNotSatisfied"),
        }
    }

    #[test]
    fn test_missing_path_is_fatal_at_bootstrap() {
        let mut bootstrapper = Bootstrapper::new(ManifestContext::default()).with_manifest(AddEditor {
            key: "site",
            depends_on_main: false,
        });

        let result = bootstrapper.run();
        assert!(matches!(
            result,
            Err(BootstrapError::Registry(RegistryError::PathNotFound { .. }))
        ));
    }

    #[test]
    fn test_duplicate_manifest_name() {
        let mut bootstrapper = Bootstrapper::new(ManifestContext::default())
            .with_manifest(CreateEditors)
            .with_manifest(CreateEditors);

        assert!(bootstrapper.run().is_err());
    }

    #[test]
    fn test_manifest_names() {
        let bootstrapper = Bootstrapper::new(ManifestContext::default())
            .with_manifest(CreateEditors)
            .with_manifest(AddEditor {
                key: "site",
                depends_on_main: true,
            });
        assert_eq!(bootstrapper.manifest_names(), vec!["main", "site"]);
    }

    #[test]
    fn test_manifest_context_settings() {
        let ctx = ManifestContext::new(
            json!({"flash_messages": {"success_timeout_ms": 3000}}),
            OverwritePolicy::Reject,
        );
        assert_eq!(ctx.get_setting::<u64>("flash_messages.success_timeout_ms"), Some(3000));
        assert_eq!(ctx.get_setting::<u64>("flash_messages.missing"), None);
        assert_eq!(ctx.get_setting::<String>("flash_messages.success_timeout_ms"), None);
    }
