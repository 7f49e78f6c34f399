//! Wiring of every service from one repository bundle.

use std::sync::Arc;

use cardvault_auth::AccessResolver;
use cardvault_core::config::LedgerConfig;
use cardvault_core::traits::AuditSink;
use cardvault_database::Repositories;

use crate::audit::AuditRecorder;
use crate::favorite::FavoriteService;
use crate::ledger::LedgerService;
use crate::resource::ResourceService;
use crate::share::ShareService;

/// A complete set of services sharing one access resolver and audit sink.
#[derive(Debug, Clone)]
pub struct Services {
    /// Access checks.
    pub access: AccessResolver,
    /// Resource lifecycle.
    pub resources: ResourceService,
    /// Share management.
    pub shares: ShareService,
    /// Gift card ledger.
    pub ledger: LedgerService,
    /// Favorite toggle.
    pub favorites: FavoriteService,
}

impl Services {
    /// Wire services over `repos`, auditing to the repositories' own
    /// audit log.
    pub fn new(repos: &Repositories, ledger_config: LedgerConfig) -> Self {
        let sink: Arc<dyn AuditSink> = Arc::new(repos.audit_sink());
        Self::with_audit_sink(repos, sink, ledger_config)
    }

    /// Wire services over `repos`, auditing to `sink`.
    pub fn with_audit_sink(
        repos: &Repositories,
        sink: Arc<dyn AuditSink>,
        ledger_config: LedgerConfig,
    ) -> Self {
        let access = AccessResolver::new(Arc::clone(&repos.resources), Arc::clone(&repos.shares));
        let audit = AuditRecorder::new(sink);

        Self {
            resources: ResourceService::new(
                Arc::clone(&repos.resources),
                access.clone(),
                audit.clone(),
            ),
            shares: ShareService::new(
                Arc::clone(&repos.shares),
                Arc::clone(&repos.users),
                access.clone(),
                audit.clone(),
            ),
            ledger: LedgerService::new(
                Arc::clone(&repos.ledger),
                access.clone(),
                audit,
                ledger_config,
            ),
            favorites: FavoriteService::new(Arc::clone(&repos.favorites), access.clone()),
            access,
        }
    }
}
