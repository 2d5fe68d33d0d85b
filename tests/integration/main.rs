//! Integration tests driving full build cycles against a real directory

mod cycle_tests {
    use changed_entries::{CacheConfig, EntryPointInfo, RebuildPlugin};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Run one full cycle for a single entry and report whether it was
    /// scheduled.
    async fn run_cycle(plugin: &mut RebuildPlugin, entry: &str, deps: &[PathBuf]) -> bool {
        plugin.begin_cycle();

        let mut scheduled = false;
        plugin
            .filter_entry(entry, deps, || scheduled = true, || {})
            .unwrap();

        let infos = vec![EntryPointInfo::new(entry, deps.iter().cloned())];
        plugin.complete_cycle(&infos).await.unwrap();
        scheduled
    }

    fn write_source(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "export {};").unwrap();
        path
    }

    #[tokio::test]
    async fn cold_start_then_stable() {
        let dir = TempDir::new().unwrap();
        let src = write_source(dir.path(), "a.js");
        let config = CacheConfig::new(dir.path());

        let mut plugin = RebuildPlugin::new(&config).unwrap();
        let deps = vec![src];

        // First-ever build: no cache record.
        assert!(run_cycle(&mut plugin, "main", &deps).await);

        // Nothing changed, same process.
        assert!(!run_cycle(&mut plugin, "main", &deps).await);

        // Nothing changed, new process: the decision survives the restart.
        let mut fresh = RebuildPlugin::new(&config).unwrap();
        assert!(!run_cycle(&mut fresh, "main", &deps).await);
    }

    #[tokio::test]
    async fn touched_file_triggers_rebuild() {
        let dir = TempDir::new().unwrap();
        let src = write_source(dir.path(), "a.js");
        let config = CacheConfig::new(dir.path());

        let mut plugin = RebuildPlugin::new(&config).unwrap();
        let deps = vec![src.clone()];
        assert!(run_cycle(&mut plugin, "main", &deps).await);

        // Backdate the cached timestamp so the live mtime mismatches, as a
        // touch of the file would.
        let cache_file = config.cache_file();
        let mut doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&cache_file).unwrap()).unwrap();
        doc["main"][src.to_str().unwrap()] = serde_json::json!(1000);
        std::fs::write(&cache_file, doc.to_string()).unwrap();

        assert!(run_cycle(&mut plugin, "main", &deps).await);

        // The rebuild cycle re-cached the live timestamp; next cycle is fresh.
        assert!(!run_cycle(&mut plugin, "main", &deps).await);
    }

    #[tokio::test]
    async fn transitive_change_triggers_rebuild() {
        let dir = TempDir::new().unwrap();
        let entry = write_source(dir.path(), "a.js");
        let imported = write_source(dir.path(), "b.js");
        let config = CacheConfig::new(dir.path());

        let mut plugin = RebuildPlugin::new(&config).unwrap();

        // The resolved dependency set is larger than the declared list, the
        // way a transitive import discovered by the host would be.
        plugin.begin_cycle();
        plugin
            .filter_entry("main", &[entry.clone()], || {}, || {})
            .unwrap();
        let infos = vec![EntryPointInfo::new(
            "main",
            [entry.clone(), imported.clone()],
        )];
        plugin.complete_cycle(&infos).await.unwrap();

        // Backdate only the transitive dependency.
        let cache_file = config.cache_file();
        let mut doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&cache_file).unwrap()).unwrap();
        doc["main"][imported.to_str().unwrap()] = serde_json::json!(500);
        std::fs::write(&cache_file, doc.to_string()).unwrap();

        // The declared list still only names a.js, which is unchanged.
        let mut fresh = RebuildPlugin::new(&config).unwrap();
        assert!(run_cycle(&mut fresh, "main", &[entry]).await);
    }

    #[tokio::test]
    async fn untouched_entries_keep_their_records() {
        let dir = TempDir::new().unwrap();
        let main_src = write_source(dir.path(), "main.js");
        let admin_src = write_source(dir.path(), "admin.js");
        let config = CacheConfig::new(dir.path());

        let mut plugin = RebuildPlugin::new(&config).unwrap();

        // Cycle 1 builds both entries.
        plugin.begin_cycle();
        plugin
            .filter_entry("main", &[main_src.clone()], || {}, || {})
            .unwrap();
        plugin
            .filter_entry("admin", &[admin_src.clone()], || {}, || {})
            .unwrap();
        plugin
            .complete_cycle(&[
                EntryPointInfo::new("main", [main_src.clone()]),
                EntryPointInfo::new("admin", [admin_src.clone()]),
            ])
            .await
            .unwrap();

        // Cycle 2: "admin" has been dropped from the configuration, only
        // "main" gets scheduled and resolved. Backdate main so it rebuilds.
        let cache_file = config.cache_file();
        let mut doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&cache_file).unwrap()).unwrap();
        doc["main"][main_src.to_str().unwrap()] = serde_json::json!(1000);
        std::fs::write(&cache_file, doc.to_string()).unwrap();

        let mut fresh = RebuildPlugin::new(&config).unwrap();
        assert!(run_cycle(&mut fresh, "main", &[main_src]).await);

        // "admin" survives the overlay verbatim.
        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&cache_file).unwrap()).unwrap();
        assert!(doc["admin"][admin_src.to_str().unwrap()].is_i64());
    }

    #[tokio::test]
    async fn unresolvable_dependency_stays_stable() {
        let dir = TempDir::new().unwrap();
        let src = write_source(dir.path(), "a.js");
        let optional = dir.path().join("optional.js");
        let config = CacheConfig::new(dir.path());

        let mut plugin = RebuildPlugin::new(&config).unwrap();

        // The resolver hands over a path it could not locate; the cycle
        // records the missing-file sentinel for it.
        let deps = vec![src, optional];
        assert!(run_cycle(&mut plugin, "main", &deps).await);

        // Still missing next cycle: sentinel matches sentinel, no rebuild
        // loop.
        assert!(!run_cycle(&mut plugin, "main", &deps).await);
    }

    #[tokio::test]
    async fn corrupt_cache_file_fails_the_decision() {
        let dir = TempDir::new().unwrap();
        let src = write_source(dir.path(), "a.js");
        let config = CacheConfig::new(dir.path());

        let mut plugin = RebuildPlugin::new(&config).unwrap();
        std::fs::write(config.cache_file(), "{truncated").unwrap();

        plugin.begin_cycle();
        let result = plugin.filter_entry("main", &[src], || {}, || {});
        assert!(result.is_err());
    }
}
