//! Admin service - staff bootstrap, login and management

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::Error;
use crate::domain::{
    Actor, Admin, AdminRole, NewAuditEntry, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME,
};
use crate::services::CredentialService;

pub struct AdminService {
    repository: Arc<DuckDbRepository>,
    credentials: CredentialService,
}

impl AdminService {
    pub fn new(repository: Arc<DuckDbRepository>, credentials: CredentialService) -> Self {
        Self {
            repository,
            credentials,
        }
    }

    /// Create the bootstrap superadmin if it is missing
    ///
    /// Returns true when the admin was created by this call.
    pub fn ensure_default_admin(&self) -> Result<bool> {
        if self
            .repository
            .read(|uow| uow.admin_exists(DEFAULT_ADMIN_USERNAME))?
        {
            return Ok(false);
        }

        let hash = self.credentials.hash(DEFAULT_ADMIN_PASSWORD)?;
        let admin = Admin::new(
            DEFAULT_ADMIN_USERNAME,
            Some(DEFAULT_ADMIN_USERNAME.to_string()),
            AdminRole::Superadmin,
        );
        self.repository.write(|uow| {
            // another process may have won the race since the read above
            if uow.admin_exists(&admin.username)? {
                return Ok(false);
            }
            uow.insert_admin(&admin, &hash)?;
            Ok(true)
        })
    }

    /// Check staff credentials without recording anything
    pub fn validate_admin(&self, username: &str, password: &str) -> Result<bool> {
        let stored = self
            .repository
            .read(|uow| uow.admin_password_hash(username))?;
        Ok(match stored {
            Some(hash) => self.credentials.verify(password, &hash),
            None => false,
        })
    }

    /// Log a staff member in and audit the login
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Actor> {
        if !self.validate_admin(username, password)? {
            return Err(Error::AuthenticationFailed.into());
        }

        self.repository.write(|uow| {
            let admin = uow
                .get_admin(username)?
                .ok_or(Error::AuthenticationFailed)?;
            uow.insert_audit(
                &NewAuditEntry::new(&admin.username, "login", "admin login"),
                &Utc::now(),
            )?;
            Ok(Actor::Admin {
                username: admin.username,
                role: admin.role,
            })
        })
    }

    /// Add a staff member (superadmin only)
    pub fn add_admin(
        &self,
        actor: &Actor,
        username: &str,
        password: &str,
        fullname: Option<&str>,
        role: AdminRole,
    ) -> Result<Admin> {
        actor.require_superadmin()?;

        let username = username.trim();
        if username.is_empty() {
            return Err(Error::validation("Username cannot be empty").into());
        }
        CredentialService::validate_password(password)?;

        let hash = self.credentials.hash(password)?;
        let admin = Admin::new(
            username,
            fullname.map(str::trim).filter(|f| !f.is_empty()).map(String::from),
            role,
        );

        self.repository.write(|uow| {
            if uow.admin_exists(&admin.username)? {
                return Err(Error::validation(format!(
                    "Admin {} already exists",
                    admin.username
                ))
                .into());
            }
            uow.insert_admin(&admin, &hash)?;
            uow.insert_audit(
                &NewAuditEntry::new(
                    actor.name(),
                    "add_admin",
                    format!("{}|{}", admin.username, admin.role),
                ),
                &Utc::now(),
            )?;
            Ok(admin.clone())
        })
    }

    pub fn list_admins(&self, actor: &Actor) -> Result<Vec<Admin>> {
        actor.require_admin()?;
        self.repository.read(|uow| uow.list_admins())
    }
}
