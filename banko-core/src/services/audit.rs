//! Audit service - free-text trail of who did what

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::{Actor, AuditEntry, NewAuditEntry};

pub struct AuditService {
    repository: Arc<DuckDbRepository>,
    default_limit: usize,
}

impl AuditService {
    pub fn new(repository: Arc<DuckDbRepository>, default_limit: usize) -> Self {
        Self {
            repository,
            default_limit,
        }
    }

    /// Append one entry on its own
    pub fn record(&self, actor: &str, action: &str, details: &str) -> Result<i64> {
        let entry = NewAuditEntry::new(actor, action, details);
        self.repository
            .write(|uow| uow.insert_audit(&entry, &Utc::now()))
    }

    /// Newest entries first (admins only)
    pub fn list(&self, actor: &Actor, limit: Option<usize>) -> Result<Vec<AuditEntry>> {
        actor.require_admin()?;
        let limit = limit.unwrap_or(self.default_limit);
        self.repository.read(|uow| uow.list_audit(limit))
    }
}
