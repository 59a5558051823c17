//! Integration tests for utoo-setup

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use serial_test::serial;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Command with the runner's variables cleared so tests see a clean slate
    fn utoo_setup() -> Command {
        let mut cmd = cargo_bin_cmd!("utoo-setup");
        for var in [
            "GITHUB_ACTIONS",
            "GITHUB_OUTPUT",
            "GITHUB_PATH",
            "GITHUB_STATE",
            "STATE_cache",
            "UTOO_SETUP_CONFIG",
            "UTOO_SETUP_CACHE_DIR",
            "INPUT_UTOO-VERSION",
            "INPUT_REGISTRY",
            "INPUT_CACHE-UTOO",
            "INPUT_CACHE-STORE",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    fn write_config(dir: &Path, package_manager: &Path) -> PathBuf {
        let path = dir.join("config.toml");
        let content = format!(
            "[install]\nprefix = {:?}\nstore_dir = {:?}\npackage_manager = {:?}\nretries = 1\nretry_delay_ms = 0\n\n[cache]\nstate_dir = {:?}\n",
            dir.join("prefix").display().to_string(),
            dir.join("store").display().to_string(),
            package_manager.display().to_string(),
            dir.join("state").display().to_string(),
        );
        std::fs::write(&path, content).unwrap();
        path
    }

    #[cfg(unix)]
    fn fake_npm(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = r#"#!/bin/sh
echo "$@" >> "$FAKE_NPM_LOG"
prefix=""
for arg in "$@"; do
  case "$arg" in
    --prefix=*) prefix="${arg#--prefix=}" ;;
  esac
done
mkdir -p "$prefix/bin"
printf '#!/bin/sh\necho "utoo 1.2.3"\n' > "$prefix/bin/utoo"
chmod +x "$prefix/bin/utoo"
"#;
        let path = dir.join("fake-npm");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    #[serial]
    fn help_displays() {
        utoo_setup()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Cache-aware installer for the utoo package manager"));
    }

    #[test]
    #[serial]
    fn version_displays() {
        utoo_setup()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("utoo-setup"));
    }

    #[test]
    #[serial]
    fn save_without_state_is_noop() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), Path::new("npm"));

        utoo_setup()
            .args(["--config", config.to_str().unwrap(), "save"])
            .assert()
            .success()
            .stderr(predicate::str::contains("No cache state found"));
    }

    #[test]
    #[serial]
    fn save_with_corrupt_state_still_succeeds() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), Path::new("npm"));

        utoo_setup()
            .args(["--config", config.to_str().unwrap(), "save"])
            .env("GITHUB_STATE", temp.path().join("github_state"))
            .env("STATE_cache", "{not json")
            .assert()
            .success()
            .stderr(predicate::str::contains("Failed to save cache"));
    }

    #[test]
    #[serial]
    fn save_with_invalid_config_still_succeeds() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        std::fs::write(&config, "[install\nretries = ").unwrap();

        utoo_setup()
            .args(["--config", config.to_str().unwrap(), "save"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Failed to save cache"))
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    #[serial]
    fn install_with_invalid_config_fails() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        std::fs::write(&config, "[install\nretries = ").unwrap();

        utoo_setup()
            .args(["--config", config.to_str().unwrap(), "install"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    #[serial]
    fn install_fails_when_package_manager_missing() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), &temp.path().join("no-such-npm"));

        utoo_setup()
            .args(["--config", config.to_str().unwrap(), "install"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Command failed"));
    }

    #[test]
    #[serial]
    fn install_rejects_bad_boolean_input() {
        utoo_setup()
            .args(["install", "--cache-store", "yes"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("is not a boolean"));
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn install_save_and_reuse_binary_cache() {
        let temp = TempDir::new().unwrap();
        let npm = fake_npm(temp.path());
        let config = write_config(temp.path(), &npm);
        let cache_dir = temp.path().join("cache-backend");
        let npm_log = temp.path().join("npm.log");
        let outputs = temp.path().join("github_output");
        let path_file = temp.path().join("github_path");
        let state_file = temp.path().join("github_state");

        // First run: miss, install, record state
        utoo_setup()
            .args([
                "--config",
                config.to_str().unwrap(),
                "--cache-dir",
                cache_dir.to_str().unwrap(),
                "install",
                "--tool-version",
                "1.2.3",
            ])
            .env("FAKE_NPM_LOG", &npm_log)
            .env("GITHUB_OUTPUT", &outputs)
            .env("GITHUB_PATH", &path_file)
            .env("GITHUB_STATE", &state_file)
            .assert()
            .success();

        let output_content = std::fs::read_to_string(&outputs).unwrap();
        assert!(output_content.contains("utoo-version<<"));
        assert!(output_content.contains("\n1.2.3\n"));
        assert!(output_content.contains("cache-hit<<"));
        assert!(output_content.contains("\nfalse\n"));

        let bin_dir = temp.path().join("prefix").join("bin");
        assert_eq!(
            std::fs::read_to_string(&path_file).unwrap(),
            format!("{}\n", bin_dir.display())
        );
        assert!(std::fs::read_to_string(&npm_log)
            .unwrap()
            .contains("utoo@1.2.3"));

        // Post step: save the binary tier
        let state_json = std::fs::read_to_string(&state_file)
            .unwrap()
            .lines()
            .nth(1)
            .unwrap()
            .to_string();
        utoo_setup()
            .args([
                "--config",
                config.to_str().unwrap(),
                "--cache-dir",
                cache_dir.to_str().unwrap(),
                "save",
            ])
            .env("GITHUB_STATE", temp.path().join("post_state"))
            .env("STATE_cache", &state_json)
            .assert()
            .success()
            .stderr(predicate::str::contains("Saving binary cache"));

        // Fresh worker: the binary comes from cache, npm is not run again
        std::fs::remove_dir_all(temp.path().join("prefix")).unwrap();
        std::fs::remove_file(&outputs).unwrap();
        utoo_setup()
            .args([
                "--config",
                config.to_str().unwrap(),
                "--cache-dir",
                cache_dir.to_str().unwrap(),
                "install",
                "--tool-version",
                "1.2.3",
            ])
            .env("FAKE_NPM_LOG", &npm_log)
            .env("GITHUB_OUTPUT", &outputs)
            .assert()
            .success();

        let output_content = std::fs::read_to_string(&outputs).unwrap();
        assert!(output_content.contains("\ntrue\n"));
        assert_eq!(std::fs::read_to_string(&npm_log).unwrap().lines().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn local_state_is_saved_once() {
        let temp = TempDir::new().unwrap();
        let npm = fake_npm(temp.path());
        let config = write_config(temp.path(), &npm);
        let cache_dir = temp.path().join("cache-backend");
        let state_file = temp.path().join("state").join("cache.json");

        utoo_setup()
            .args([
                "--config",
                config.to_str().unwrap(),
                "--cache-dir",
                cache_dir.to_str().unwrap(),
                "install",
                "--tool-version",
                "1.2.3",
            ])
            .env("FAKE_NPM_LOG", temp.path().join("npm.log"))
            .assert()
            .success();
        assert!(state_file.exists());

        let save = || {
            let mut cmd = utoo_setup();
            cmd.args([
                "--config",
                config.to_str().unwrap(),
                "--cache-dir",
                cache_dir.to_str().unwrap(),
                "save",
            ]);
            cmd
        };
        save()
            .assert()
            .success()
            .stderr(predicate::str::contains("Saving binary cache"));
        assert!(!state_file.exists());

        // Nothing new was installed, so there is nothing to save
        save()
            .assert()
            .success()
            .stderr(predicate::str::contains("No cache state found"));
    }

    #[test]
    #[serial]
    fn failed_install_clears_stale_state() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), &temp.path().join("no-such-npm"));
        let state_dir = temp.path().join("state");
        std::fs::create_dir_all(&state_dir).unwrap();
        std::fs::write(state_dir.join("cache.json"), "{\"stale\":true}").unwrap();

        utoo_setup()
            .args(["--config", config.to_str().unwrap(), "install"])
            .assert()
            .failure();
        assert!(!state_dir.join("cache.json").exists());

        utoo_setup()
            .args(["--config", config.to_str().unwrap(), "save"])
            .assert()
            .success()
            .stderr(predicate::str::contains("No cache state found"));
    }
}
