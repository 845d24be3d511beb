//! Idempotent preparation of an instance before any command runs.

use catbase_common::error::Result;
use catbase_common::types::RuntimeEnvironment;

use crate::state::StateDir;
use crate::webapps::{self, PopulateReport};

/// What one provisioning pass changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    /// Whether `conf` was seeded from the Tomcat home on this pass.
    pub seeded_conf: bool,
    /// Outcome of linking the deployment webapps.
    pub webapps: PopulateReport,
}

/// Lays out `catalina-base`, seeds `conf` once, and links webapps.
///
/// Safe to run against the same state directory any number of times.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or a copy fails.
pub fn provision(env: &RuntimeEnvironment, state: &StateDir) -> Result<Provisioned> {
    state.ensure_layout()?;
    let seeded_conf = state.seed_conf(&env.catalina_home)?;
    let webapps = webapps::populate(&env.deploy_webapps(), &state.webapps())?;
    tracing::info!(
        base = %state.base().display(),
        seeded_conf,
        webapps = webapps.total(),
        "instance provisioned"
    );
    Ok(Provisioned {
        seeded_conf,
        webapps,
    })
}
