#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use blade_core::{BladeError, Result};
    use blade_runtime::registry::BehaviorFactory;
    use blade_runtime::{Behavior, BehaviorRegistry, Capability, builtin_factories};

    struct Named {
        name: &'static str,
        priority: i32,
        caps: &'static [Capability],
        enabled: AtomicBool,
    }

    impl Named {
        fn new(name: &'static str, priority: i32, caps: &'static [Capability]) -> Self {
            Self {
                name,
                priority,
                caps,
                enabled: AtomicBool::new(true),
            }
        }
    }

    #[async_trait]
    impl Behavior for Named {
        fn name(&self) -> &str {
            self.name
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn enabled(&self) -> bool {
            self.enabled.load(Ordering::SeqCst)
        }
        fn capabilities(&self) -> &[Capability] {
            self.caps
        }
    }

    fn names(list: &[Arc<blade_runtime::BehaviorEntry>]) -> Vec<&str> {
        list.iter().map(|e| e.name()).collect()
    }

    const UPDATE: &[Capability] = &[Capability::Update];

    fn alpha() -> Result<Arc<dyn Behavior>> {
        Ok(Arc::new(Named::new("alpha", 5, UPDATE)))
    }
    fn beta() -> Result<Arc<dyn Behavior>> {
        Ok(Arc::new(Named::new("beta", 1, UPDATE)))
    }
    fn gamma() -> Result<Arc<dyn Behavior>> {
        Ok(Arc::new(Named::new("gamma", 5, UPDATE)))
    }
    fn delta() -> Result<Arc<dyn Behavior>> {
        Ok(Arc::new(Named::new("delta", 5, UPDATE)))
    }
    fn broken() -> Result<Arc<dyn Behavior>> {
        Err(BladeError::Discovery {
            candidate: "broken".into(),
            reason: "needs arguments".into(),
        })
    }
    fn panicky() -> Result<Arc<dyn Behavior>> {
        panic!("cannot construct")
    }
    fn inert() -> Result<Arc<dyn Behavior>> {
        Ok(Arc::new(Named::new("inert", 0, &[])))
    }
    fn multi() -> Result<Arc<dyn Behavior>> {
        Ok(Arc::new(Named::new(
            "multi",
            3,
            &[Capability::Start, Capability::Stop, Capability::WebUpdate],
        )))
    }

    // ── Ordering ───────────────────────────────────────────────

    #[test]
    fn test_lists_sorted_by_priority() {
        let registry = BehaviorRegistry::discover(
            &[
                BehaviorFactory::new("alpha", alpha),
                BehaviorFactory::new("beta", beta),
            ],
            &[],
        );
        assert_eq!(names(&registry.lists().update), vec!["beta", "alpha"]);
    }

    #[test]
    fn test_equal_priorities_keep_discovery_order() {
        let registry = BehaviorRegistry::discover(
            &[
                BehaviorFactory::new("gamma", gamma),
                BehaviorFactory::new("alpha", alpha),
                BehaviorFactory::new("beta", beta),
                BehaviorFactory::new("delta", delta),
            ],
            &[],
        );
        assert_eq!(
            names(&registry.lists().update),
            vec!["beta", "gamma", "alpha", "delta"]
        );

        // Reversed manifest, reversed ties
        let registry = BehaviorRegistry::discover(
            &[
                BehaviorFactory::new("delta", delta),
                BehaviorFactory::new("alpha", alpha),
                BehaviorFactory::new("gamma", gamma),
            ],
            &[],
        );
        assert_eq!(
            names(&registry.lists().update),
            vec!["delta", "alpha", "gamma"]
        );
    }

    #[test]
    fn test_every_list_non_decreasing() {
        let behaviors: Vec<Arc<dyn Behavior>> = (0..20)
            .map(|i| {
                let priority = (i * 7) % 5 - 2;
                Arc::new(Named::new(
                    "n",
                    priority,
                    &[Capability::Update, Capability::Stop],
                )) as Arc<dyn Behavior>
            })
            .collect();
        let registry = BehaviorRegistry::from_behaviors(behaviors, &[]);
        for cap in Capability::ALL {
            let list = registry.lists().list(cap);
            assert!(list.windows(2).all(|w| w[0].priority() <= w[1].priority()));
        }
        assert_eq!(registry.total(), 40);
    }

    // ── Classification ─────────────────────────────────────────

    #[test]
    fn test_multi_capability_joins_each_list() {
        let registry = BehaviorRegistry::discover(&[BehaviorFactory::new("multi", multi)], &[]);
        let lists = registry.lists();
        assert_eq!(names(&lists.start), vec!["multi"]);
        assert_eq!(names(&lists.stop), vec!["multi"]);
        assert_eq!(names(&lists.web_update), vec!["multi"]);
        assert!(lists.update.is_empty());
        assert_eq!(registry.entries().len(), 1);
        assert_eq!(registry.total(), 3);
        // Same entry in every list
        assert!(Arc::ptr_eq(&lists.start[0], &lists.stop[0]));
    }

    #[test]
    fn test_failed_candidates_are_skipped() {
        let registry = BehaviorRegistry::discover(
            &[
                BehaviorFactory::new("broken", broken),
                BehaviorFactory::new("alpha", alpha),
                BehaviorFactory::new("panicky", panicky),
                BehaviorFactory::new("inert", inert),
            ],
            &[],
        );
        assert_eq!(registry.entries().len(), 1);
        assert_eq!(names(&registry.lists().update), vec!["alpha"]);
        assert!(registry.get("broken").is_none());
        assert!(registry.get("inert").is_none());
    }

    // ── Enabled switch ─────────────────────────────────────────

    #[test]
    fn test_disabled_config_switches_off() {
        let registry = BehaviorRegistry::discover(
            &[
                BehaviorFactory::new("alpha", alpha),
                BehaviorFactory::new("beta", beta),
            ],
            &["beta".to_string()],
        );
        // Still registered, just off
        assert_eq!(registry.lists().update.len(), 2);
        assert!(registry.get("alpha").unwrap().is_enabled());
        assert!(!registry.get("beta").unwrap().is_enabled());
    }

    #[test]
    fn test_set_enabled_toggles() {
        let registry = BehaviorRegistry::discover(&[BehaviorFactory::new("multi", multi)], &[]);
        assert!(registry.set_enabled("multi", false));
        assert!(!registry.lists().stop[0].is_enabled());
        assert!(registry.set_enabled("multi", true));
        assert!(registry.lists().web_update[0].is_enabled());
        assert!(!registry.set_enabled("nope", false));
    }

    #[test]
    fn test_behavior_own_enabled_flag_is_respected() {
        let named = Arc::new(Named::new("self-managed", 0, UPDATE));
        let registry = BehaviorRegistry::from_behaviors(vec![named.clone()], &[]);
        assert!(registry.get("self-managed").unwrap().is_enabled());
        named.enabled.store(false, Ordering::SeqCst);
        assert!(!registry.get("self-managed").unwrap().is_enabled());
    }

    // ── Builtins ───────────────────────────────────────────────

    #[test]
    fn test_builtin_manifest() {
        let registry = BehaviorRegistry::discover(&builtin_factories(), &[]);
        let lists = registry.lists();
        assert_eq!(names(&lists.start), vec!["lifecycle-log"]);
        assert_eq!(names(&lists.stop), vec!["lifecycle-log"]);
        assert_eq!(names(&lists.web_update), vec!["request-log", "ping"]);
        assert!(lists.update.is_empty());
    }
}
