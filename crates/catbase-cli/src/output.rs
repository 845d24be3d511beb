//! Formatted output helpers for CLI commands.

use std::fmt::Write;
use std::path::Path;

use catbase_runtime::controller::StatusReport;
use catbase_runtime::pid::PidStatus;

const LABEL_WIDTH: usize = 18;

/// Renders the `status` report: one aligned line per path, then the verdict.
#[must_use]
pub fn render_status(report: &StatusReport) -> String {
    let rows: [(&str, &Path); 9] = [
        ("environment root", report.env_root.as_path()),
        ("deployment root", report.deploy_root.as_path()),
        ("java", report.java.as_path()),
        ("catalina home", report.catalina_home.as_path()),
        ("state directory", report.state_dir.as_path()),
        ("log directory", report.log_dir.as_path()),
        ("bundled webapps", report.deploy_webapps.as_path()),
        ("instance webapps", report.instance_webapps.as_path()),
        ("pid file", report.pid_file.as_path()),
    ];

    let mut out = String::new();
    for (label, path) in rows {
        let _ = writeln!(out, "{:<LABEL_WIDTH$} {}", format!("{label}:"), path.display());
    }
    let _ = writeln!(out, "{}", describe_pid(report.pid_status));
    out
}

/// One-line liveness verdict.
#[must_use]
pub fn describe_pid(status: PidStatus) -> String {
    match status {
        PidStatus::Running(pid) => format!("Tomcat is running (pid {pid})"),
        PidStatus::NotRunning(Some(pid)) => format!("Tomcat is not running (stale pid {pid})"),
        PidStatus::NotRunning(None) => "Tomcat is not running".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn report(pid_status: PidStatus) -> StatusReport {
        StatusReport {
            env_root: PathBuf::from("/env"),
            deploy_root: PathBuf::from("/srv/bundle"),
            java: PathBuf::from("/env/bin/java"),
            catalina_home: PathBuf::from("/env/opt/tomcat"),
            state_dir: PathBuf::from("/run/user/1000/tomcat-abc"),
            log_dir: PathBuf::from("/run/user/1000/tomcat-abc/catalina-base/logs"),
            deploy_webapps: PathBuf::from("/srv/bundle/webapps"),
            instance_webapps: PathBuf::from("/run/user/1000/tomcat-abc/catalina-base/webapps"),
            pid_file: PathBuf::from("/run/user/1000/tomcat-abc/catalina-base/catalina.pid"),
            pid_status,
        }
    }

    #[test]
    fn render_status_lists_every_path() {
        let text = render_status(&report(PidStatus::NotRunning(None)));
        assert_eq!(text.lines().count(), 10);
        assert!(text.contains("environment root:  /env\n"));
        assert!(text.contains("bundled webapps:   /srv/bundle/webapps\n"));
        assert!(text.ends_with("Tomcat is not running\n"));
    }

    #[test]
    fn describe_pid_running() {
        assert_eq!(
            describe_pid(PidStatus::Running(4242)),
            "Tomcat is running (pid 4242)"
        );
    }

    #[test]
    fn describe_pid_stale() {
        assert_eq!(
            describe_pid(PidStatus::NotRunning(Some(17))),
            "Tomcat is not running (stale pid 17)"
        );
    }
}
