//! Integration tests for the `catbase` binary: argument surface, early
//! failures, and full command runs against a stub `catalina.sh`.
//!
//! Resolution failures must happen before any state directory exists, so
//! every failing invocation also checks that the runtime directory stays
//! empty.

#![allow(clippy::expect_used, deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn catbase() -> Command {
    let mut cmd = Command::cargo_bin("catbase").expect("catbase binary should exist");
    let _ = cmd
        .env_remove("CONDA_PREFIX")
        .env_remove("CATALINA_HOME")
        .env_remove("RUST_LOG");
    cmd
}

fn entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).expect("read dir").count()
}

// --- Usage ---

#[test]
fn help_flag_prints_usage_and_exits_zero() {
    catbase()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("restart"))
        .stdout(predicate::str::contains("--state-dir"));
}

#[test]
fn short_help_flag_exits_zero() {
    catbase().arg("-h").assert().success();
}

#[test]
fn missing_command_is_a_usage_error() {
    catbase().assert().code(2);
}

#[test]
fn flags_without_command_are_a_usage_error() {
    catbase().arg("--keep").assert().code(2);
}

#[test]
fn unknown_argument_is_a_usage_error() {
    catbase()
        .args(["--bogus", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn unknown_command_is_a_usage_error() {
    catbase().arg("deploy").assert().code(2);
}

// --- Configuration failures ---

#[test]
fn missing_env_root_fails_without_creating_directories() {
    let runtime = tempfile::tempdir().expect("runtime dir");
    catbase()
        .env("XDG_RUNTIME_DIR", runtime.path())
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("CONDA_PREFIX is not set"));
    assert_eq!(entries(runtime.path()), 0);
}

#[test]
fn empty_env_root_counts_as_missing() {
    let runtime = tempfile::tempdir().expect("runtime dir");
    catbase()
        .env("CONDA_PREFIX", "")
        .env("XDG_RUNTIME_DIR", runtime.path())
        .arg("start")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("CONDA_PREFIX"));
    assert_eq!(entries(runtime.path()), 0);
}

#[test]
fn nonexistent_env_root_fails() {
    let runtime = tempfile::tempdir().expect("runtime dir");
    catbase()
        .env("CONDA_PREFIX", "/nonexistent/catbase/env")
        .env("XDG_RUNTIME_DIR", runtime.path())
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"));
    assert_eq!(entries(runtime.path()), 0);
}

#[test]
fn failed_resolution_does_not_create_explicit_state_dir() {
    let runtime = tempfile::tempdir().expect("runtime dir");
    let requested = runtime.path().join("instance");
    catbase()
        .args(["--state-dir"])
        .arg(&requested)
        .arg("status")
        .assert()
        .code(1);
    assert!(!requested.exists());
}

// --- Provisioned instances ---
//
// These run the real binary against a fake environment root. The
// deployment root is whatever this build baked in; debug builds default
// to the fixture bundle, and the tests are skipped when none was baked.

const STUB_CATALINA: &str = r#"#!/bin/sh
echo "$1" >> "$STUB_RECORD/invocations.log"
case "$1" in
  run)
    trap 'echo stopped >> "$CATALINA_BASE/logs/shutdown.log" || exit 99; exit 143' TERM
    echo "$$" > "$STUB_RECORD/run.pid"
    while :; do sleep 0.1; done
    ;;
  start)
    sleep 30 </dev/null >/dev/null 2>&1 &
    echo "$!" > "$CATALINA_PID"
    ;;
  stop)
    [ -f "$CATALINA_PID" ] || exit 1
    kill "$(cat "$CATALINA_PID")"
    rm -f "$CATALINA_PID"
    ;;
esac
exit 0
"#;

struct Instance {
    dir: tempfile::TempDir,
}

impl Instance {
    fn new() -> Option<Self> {
        if option_env!("CATBASE_DEPLOY_ROOT").is_none() {
            return None;
        }
        let instance = Self {
            dir: tempfile::tempdir().expect("sandbox"),
        };
        let env = instance.env_root();
        write_exec(&env.join("bin/java"), "#!/bin/sh\nexit 0\n");
        let home = env.join("opt/apache-tomcat-10.1.24");
        write_exec(&home.join("bin/catalina.sh"), STUB_CATALINA);
        std::fs::create_dir_all(home.join("conf")).expect("mkdir conf");
        std::fs::write(home.join("conf/server.xml"), "<Server port=\"8005\"/>").expect("server.xml");
        std::fs::create_dir_all(instance.runtime()).expect("mkdir runtime");
        std::fs::create_dir_all(instance.record()).expect("mkdir record");
        Some(instance)
    }

    fn env_root(&self) -> std::path::PathBuf {
        self.dir.path().join("env")
    }

    fn runtime(&self) -> std::path::PathBuf {
        self.dir.path().join("runtime")
    }

    fn record(&self) -> std::path::PathBuf {
        self.dir.path().join("record")
    }

    fn vars(&self) -> Vec<(&'static str, std::ffi::OsString)> {
        vec![
            ("CONDA_PREFIX", self.env_root().into_os_string()),
            ("XDG_RUNTIME_DIR", self.runtime().into_os_string()),
            ("STUB_RECORD", self.record().into_os_string()),
            ("PATH", "/usr/bin:/bin".into()),
        ]
    }

    fn command(&self) -> Command {
        let mut cmd = catbase();
        let _ = cmd.envs(self.vars());
        cmd
    }

    fn invocations(&self) -> Vec<String> {
        std::fs::read_to_string(self.record().join("invocations.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

fn write_exec(path: &std::path::Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(path, body).expect("write");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
}

#[test]
fn status_in_auto_created_dir_exits_one_and_removes_it() {
    let Some(instance) = Instance::new() else {
        return;
    };
    instance
        .command()
        .arg("status")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("catalina-base"))
        .stdout(predicate::str::contains("Tomcat is not running"));
    assert_eq!(entries(&instance.runtime()), 0);
}

#[test]
fn keep_retains_provisioned_directory() {
    let Some(instance) = Instance::new() else {
        return;
    };
    instance.command().args(["--keep", "status"]).assert().code(1);

    let kept: Vec<_> = std::fs::read_dir(instance.runtime())
        .expect("read runtime")
        .map(|e| e.expect("entry").path())
        .collect();
    assert_eq!(kept.len(), 1);
    let base = kept[0].join("catalina-base");
    assert!(base.join("conf/server.xml").is_file());
    assert!(base.join("logs").is_dir());
    assert!(
        kept[0]
            .file_name()
            .expect("name")
            .to_string_lossy()
            .starts_with("tomcat-")
    );
}

#[test]
fn status_follows_start_and_stop_in_explicit_state_dir() {
    let Some(instance) = Instance::new() else {
        return;
    };
    let state = instance.dir.path().join("instance");
    let run = |cmd: &str| {
        let mut c = instance.command();
        let _ = c.arg("--state-dir").arg(&state).arg(cmd);
        c.assert()
    };

    run("start")
        .success()
        .stdout(predicate::str::contains("Tomcat started"));
    run("status")
        .success()
        .stdout(predicate::str::contains("Tomcat is running (pid"));
    run("stop")
        .success()
        .stdout(predicate::str::contains("Tomcat stopped"));
    run("status")
        .code(1)
        .stdout(predicate::str::contains("Tomcat is not running"));

    assert!(state.join("catalina-base/conf/server.xml").is_file());
    assert_eq!(instance.invocations(), vec!["start", "stop"]);
    assert_eq!(entries(&instance.runtime()), 0);
}

#[test]
fn run_forwards_termination_to_tomcat_and_removes_directory() {
    use std::time::{Duration, Instant};

    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Some(instance) = Instance::new() else {
        return;
    };
    let mut launcher = std::process::Command::new(assert_cmd::cargo::cargo_bin("catbase"))
        .arg("run")
        .env_remove("CATALINA_HOME")
        .env_remove("RUST_LOG")
        .envs(instance.vars())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .expect("spawn catbase run");

    let pid_file = instance.record().join("run.pid");
    let deadline = Instant::now() + Duration::from_secs(10);
    while !pid_file.exists() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    let child_pid: i32 = std::fs::read_to_string(&pid_file)
        .expect("catalina.sh run started")
        .trim()
        .parse()
        .expect("numeric pid");
    assert_eq!(entries(&instance.runtime()), 1);

    let launcher_pid = i32::try_from(launcher.id()).expect("pid fits i32");
    kill(Pid::from_raw(launcher_pid), Signal::SIGTERM).expect("signal launcher");
    let status = launcher.wait().expect("wait for launcher");

    assert_eq!(status.code(), Some(143));
    assert!(kill(Pid::from_raw(child_pid), None).is_err());
    assert_eq!(entries(&instance.runtime()), 0);
    assert_eq!(instance.invocations(), vec!["run"]);
}
