//! Integration tests for devkit

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn devkit() -> Command {
        cargo_bin_cmd!("devkit")
    }

    /// Config pointing the cache and log into a tempdir so tests never touch
    /// the real home directory.
    fn write_config(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        let contents = format!(
            "[cache]\ndir = \"{}\"\n\n[log]\nfile = \"{}\"\n",
            dir.path().join("cache").display(),
            dir.path().join("install.log").display(),
        );
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        devkit()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Interactive developer workspace installer",
            ));
    }

    #[test]
    fn version_displays() {
        devkit()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("devkit"));
    }

    #[test]
    fn config_path() {
        devkit()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        devkit()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"));
    }

    #[test]
    fn config_set_unknown_key() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        devkit()
            .args(["--config", config.to_str().unwrap(), "config", "set", "cache.bogus", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown configuration key"));
    }

    #[test]
    fn cache_info_reports_empty_cache() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        devkit()
            .args(["--config", config.to_str().unwrap(), "cache", "info"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Entries"));
    }

    #[test]
    fn cache_clear_with_yes() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        devkit()
            .args(["--config", config.to_str().unwrap(), "cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cache cleared"));
    }

    #[test]
    fn log_before_any_install() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        devkit()
            .args(["--config", config.to_str().unwrap(), "log"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No installation log yet."));
    }

    #[test]
    fn install_rejects_unknown_package() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        devkit()
            .args(["--config", config.to_str().unwrap(), "install", "emacs"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown package 'emacs'"));
    }

    #[test]
    fn install_requires_a_selection() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        devkit()
            .args(["--config", config.to_str().unwrap(), "install"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--all"));
    }

    #[test]
    fn menu_exits_on_zero() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        devkit()
            .args(["--config", config.to_str().unwrap(), "menu"])
            .write_stdin("0\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Goodbye"));
    }

    #[test]
    fn menu_redisplays_on_invalid_input() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        let assert = devkit()
            .args(["--config", config.to_str().unwrap(), "menu"])
            .write_stdin("abc\n0\n")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Please enter a number between 0 and 9",
            ));

        // Menu shown again after rejecting the input
        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
        assert!(stdout.matches("9)  Install all of the above").count() >= 2);
    }

    #[test]
    fn menu_declined_package_only_logs_skip() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        devkit()
            .args(["--config", config.to_str().unwrap(), "menu"])
            .write_stdin("5\nn\n0\n")
            .assert()
            .success();

        let log = std::fs::read_to_string(dir.path().join("install.log")).unwrap();
        assert!(log.contains("Skipping Redis"));
        assert!(!log.contains("Installing"));
    }

    #[test]
    fn menu_install_all_declined_installs_nothing() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        devkit()
            .args(["--config", config.to_str().unwrap(), "menu"])
            .write_stdin("9\nn\n0\n")
            .assert()
            .success();

        let log = std::fs::read_to_string(dir.path().join("install.log")).unwrap();
        assert!(log.contains("Install-all cancelled"));
        assert!(!log.contains("Installing"));
    }

    #[test]
    fn menu_eof_exits_cleanly() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        devkit()
            .args(["--config", config.to_str().unwrap(), "menu"])
            .write_stdin("")
            .assert()
            .success();
    }
}
