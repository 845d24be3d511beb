//! Environment variable names, fixed directory names, and search lists.

/// Environment variable naming the environment root that hosts Java and Tomcat.
pub const ENV_ROOT_VAR: &str = "CONDA_PREFIX";

/// Optional override pointing at a Tomcat installation.
pub const CATALINA_HOME_VAR: &str = "CATALINA_HOME";

/// Optional hint for where auto-created state directories live.
pub const RUNTIME_DIR_VAR: &str = "XDG_RUNTIME_DIR";

/// Search path consulted when the environment root has no match.
pub const SEARCH_PATH_VAR: &str = "PATH";

/// Build-time variable holding the absolute deployment root.
pub const DEPLOY_ROOT_BUILD_VAR: &str = "CATBASE_DEPLOY_ROOT";

/// Selects the log line format (`json` or the default human format).
pub const LOG_FORMAT_VAR: &str = "CATBASE_LOG_FORMAT";

/// Name of the Java launcher binary.
pub const JAVA_BIN: &str = "java";

/// Name of Tomcat's control script.
pub const CONTROL_SCRIPT: &str = "catalina.sh";

/// Candidate control-script locations relative to the environment root.
///
/// Evaluated strictly in this order; the first executable match wins.
pub const CONTROL_SCRIPT_CANDIDATES: &[&str] = &[
    "bin/catalina.sh",
    "opt/tomcat/bin/catalina.sh",
    "opt/apache-tomcat-*/bin/catalina.sh",
    "share/tomcat/bin/catalina.sh",
    "share/tomcat*/bin/catalina.sh",
    "libexec/tomcat/bin/catalina.sh",
    "tomcat/bin/catalina.sh",
    "apache-tomcat-*/bin/catalina.sh",
];

/// Directory inside the state directory that becomes `CATALINA_BASE`.
pub const CATALINA_BASE_DIR: &str = "catalina-base";

/// Subdirectories created under `CATALINA_BASE`.
pub const BASE_SUBDIRS: &[&str] = &["conf", "logs", "temp", "work", "webapps"];

/// Configuration subdirectory of both the Tomcat home and `CATALINA_BASE`.
pub const CONF_DIR: &str = "conf";

/// Log subdirectory of `CATALINA_BASE`.
pub const LOGS_DIR: &str = "logs";

/// Temp subdirectory of `CATALINA_BASE`.
pub const TEMP_DIR: &str = "temp";

/// Web application subdirectory, in both the deployment root and `CATALINA_BASE`.
pub const WEBAPPS_DIR: &str = "webapps";

/// File whose presence marks a `conf` directory as already seeded.
pub const SERVER_XML: &str = "server.xml";

/// PID record written by `catalina.sh start`.
pub const PID_FILE: &str = "catalina.pid";

/// Console log written by `catalina.sh start`.
pub const CATALINA_OUT: &str = "catalina.out";

/// Prefix of auto-created state directories.
pub const STATE_DIR_PREFIX: &str = "tomcat-";

/// Number of random hex characters appended to [`STATE_DIR_PREFIX`].
pub const STATE_DIR_SUFFIX_LEN: usize = 12;

/// Attempts made before giving up on a unique state directory name.
pub const STATE_DIR_ATTEMPTS: usize = 8;

/// Exit status used after a termination signal when no child is attached.
pub const SIGNAL_EXIT_CODE: u8 = 130;

