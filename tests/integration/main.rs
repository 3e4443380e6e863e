//! Integration tests for depstash

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use depstash::cache::CacheKey;
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{"type":"application"}"#;

    /// A project directory with its own dependency home and config dirs
    struct Project {
        dir: TempDir,
    }

    impl Project {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("elm.json"), MANIFEST).unwrap();
            Self { dir }
        }

        fn without_manifest() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn path(&self) -> &Path {
            self.dir.path()
        }

        fn home(&self) -> PathBuf {
            self.path().join("elm-home")
        }

        fn key(&self) -> CacheKey {
            CacheKey::from_bytes(MANIFEST.as_bytes())
        }

        fn slot(&self, name: &str) -> PathBuf {
            self.path().join(".depstash").join(name)
        }

        fn depstash(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("depstash");
            cmd.current_dir(self.path())
                .env("HOME", self.path().join("user"))
                .env("XDG_CONFIG_HOME", self.path().join("user/.config"))
                .env("ELM_HOME", self.home())
                .env_remove("DEPSTASH_CONFIG")
                .env_remove("DEPSTASH_MANIFEST")
                .env_remove("DEPSTASH_CACHE_DIR");
            cmd
        }
    }

    #[cfg(unix)]
    const FETCH: &str =
        "mkdir -p \"$ELM_HOME/0.19.1/packages\" && echo registry > \"$ELM_HOME/0.19.1/packages/registry.dat\"";

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("depstash")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Content-addressed CI cache"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("depstash")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("depstash"));
    }

    #[test]
    fn missing_manifest_fails() {
        let project = Project::without_manifest();
        project
            .depstash()
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read manifest"));
    }

    #[test]
    fn missing_manifest_fails_clean() {
        let project = Project::without_manifest();
        project
            .depstash()
            .arg("--clean")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read manifest"));
    }

    #[test]
    fn print_key_outputs_only_the_key() {
        let project = Project::new();
        project
            .depstash()
            .arg("--print-key")
            .assert()
            .success()
            .stdout(format!("{}\n", project.key()));
    }

    #[cfg(unix)]
    #[test]
    fn miss_then_hit() {
        let project = Project::new();

        project
            .depstash()
            .args(["--", "sh", "-c", FETCH])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cached dependencies for next run"));

        let slot = project.slot(project.key().as_str());
        assert_eq!(
            fs::read_to_string(slot.join("0.19.1/packages/registry.dat")).unwrap(),
            "registry\n"
        );

        // Fresh dependency home; a fetch would fail, so success proves a restore
        fs::remove_dir_all(project.home()).unwrap();
        project
            .depstash()
            .args(["--", "false"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Restored dependencies from cache"));

        assert_eq!(
            fs::read_to_string(project.home().join("0.19.1/packages/registry.dat")).unwrap(),
            "registry\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_in_home_is_cached_without_it() {
        let project = Project::new();
        let fetch = format!("{} && ln -s missing \"$ELM_HOME/0.19.1/stale-link\"", FETCH);

        project
            .depstash()
            .args(["--", "sh", "-c", &fetch])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 skipped"));

        fs::remove_dir_all(project.home()).unwrap();
        project
            .depstash()
            .args(["--", "false"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Restored dependencies from cache"));

        assert!(project
            .home()
            .join("0.19.1/packages/registry.dat")
            .is_file());
    }

    #[cfg(unix)]
    #[test]
    fn fetch_failure_is_fatal() {
        let project = Project::new();
        project
            .depstash()
            .args(["--", "false"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Dependency fetch failed"));

        assert!(!project.slot(project.key().as_str()).exists());
    }

    #[cfg(unix)]
    #[test]
    fn home_flag_overrides_environment() {
        let project = Project::new();
        let other_home = project.path().join("other-home");

        project
            .depstash()
            .arg("--home")
            .arg(&other_home)
            .args(["--", "sh", "-c", FETCH])
            .assert()
            .success();

        assert!(other_home.join("0.19.1/packages/registry.dat").is_file());
        assert!(!project.home().exists());
    }

    #[test]
    fn clean_keeps_current_slot() {
        let project = Project::new();
        let current = project.key().to_string();
        for name in ["stale-a", "stale-b", current.as_str()] {
            fs::create_dir_all(project.slot(name).join("0.19.1")).unwrap();
        }

        project
            .depstash()
            .arg("--clean")
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 2 slot(s), kept 1"));

        assert!(project.slot(&current).is_dir());
        assert!(!project.slot("stale-a").exists());
        assert!(!project.slot("stale-b").exists());
    }

    #[test]
    fn clean_dry_run_deletes_nothing() {
        let project = Project::new();
        fs::create_dir_all(project.slot("stale")).unwrap();

        project
            .depstash()
            .args(["--clean", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Would remove stale"));

        assert!(project.slot("stale").is_dir());
    }

    #[test]
    fn clean_without_cache_dir() {
        let project = Project::new();
        project
            .depstash()
            .arg("--clean")
            .assert()
            .success()
            .stdout(predicate::str::contains("nothing to clean"));
    }

    #[test]
    fn list_json_marks_current_slot() {
        let project = Project::new();
        fs::create_dir_all(project.slot(project.key().as_str())).unwrap();
        fs::create_dir_all(project.slot("stale")).unwrap();

        project
            .depstash()
            .args(["--list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"current\": true"))
            .stdout(predicate::str::contains("\"name\": \"stale\""));
    }

    #[test]
    fn list_empty() {
        let project = Project::new();
        project
            .depstash()
            .arg("--list")
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache slots found."));
    }

    #[test]
    fn local_config_changes_cache_dir() {
        let project = Project::new();
        fs::write(
            project.path().join(".depstash.toml"),
            "[cache]\ndir = \"ci-cache\"\n",
        )
        .unwrap();
        fs::create_dir_all(project.path().join("ci-cache/stale")).unwrap();

        project.depstash().arg("--clean").assert().success();

        assert!(!project.path().join("ci-cache/stale").exists());
    }

    #[test]
    fn explicit_missing_config_fails() {
        let project = Project::new();
        project
            .depstash()
            .args(["--config", "missing.toml", "--print-key"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Configuration file not found"));
    }
}
