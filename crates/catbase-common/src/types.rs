//! Domain types shared between the resolver and the process controller.

use std::fmt;
use std::path::{Path, PathBuf};

/// Java installation hint handed to `catalina.sh`.
///
/// A JDK-style layout exports `JAVA_HOME`; anything else falls back to
/// `JRE_HOME` so `setclasspath.sh` can still locate `bin/java`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JavaHome {
    /// Directory whose `bin/java` is the resolved executable.
    Jdk(PathBuf),
    /// Fallback directory exported when no JDK layout was recognised.
    Jre(PathBuf),
}

impl JavaHome {
    /// Environment variable this hint is exported under.
    #[must_use]
    pub const fn var_name(&self) -> &'static str {
        match self {
            Self::Jdk(_) => "JAVA_HOME",
            Self::Jre(_) => "JRE_HOME",
        }
    }

    /// The exported directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Jdk(p) | Self::Jre(p) => p,
        }
    }
}

impl fmt::Display for JavaHome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.var_name(), self.path().display())
    }
}

/// Paths resolved once per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnvironment {
    /// Canonical environment root.
    pub env_root: PathBuf,
    /// Immutable deployment root holding `webapps/`.
    pub deploy_root: PathBuf,
    /// Java executable that will run Tomcat.
    pub java: PathBuf,
    /// Java home hint derived from [`Self::java`].
    pub java_home: JavaHome,
    /// Tomcat installation directory (`CATALINA_HOME`).
    pub catalina_home: PathBuf,
    /// Canonical path of `catalina.sh`.
    pub control_script: PathBuf,
}

impl RuntimeEnvironment {
    /// `webapps` directory of the deployment root.
    #[must_use]
    pub fn deploy_webapps(&self) -> PathBuf {
        self.deploy_root.join(crate::constants::WEBAPPS_DIR)
    }
}

/// Mode argument accepted by `catalina.sh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlMode {
    /// Foreground run; the script does not return until Tomcat exits.
    Run,
    /// Background start; Tomcat's PID lands in `CATALINA_PID`.
    Start,
    /// Shutdown of a background instance.
    Stop,
}

impl ControlMode {
    /// Argument string passed to the control script.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
