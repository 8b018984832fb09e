// crates/content-trash-core/src/runtime/admin.rs
// ============================================================================
// Module: Content Trash Admin Actions
// Description: Privileged list, restore, delete, and empty actions.
// Purpose: Gate operator actions behind an admin check and log their results.
// Dependencies: crate::{core, interfaces, runtime}, thiserror
// ============================================================================

//! ## Overview
//! Admin actions wrap the engine operations for an authenticated caller. The
//! caller's identity is supplied by the host; non-admin callers are refused
//! before any storage is touched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::events::EventLevel;
use crate::core::identifiers::ArchiveItemId;
use crate::core::records::TrashedItemSummary;
use crate::interfaces::ArchiveError;
use crate::interfaces::ArchiveStore;
use crate::interfaces::ContentCache;
use crate::interfaces::ContentRepository;
use crate::runtime::engine::TrashEngine;
use crate::runtime::restore::RestoreError;
use crate::runtime::restore::RestoreResult;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Operation label for admin events.
const OPERATION: &str = "admin";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Authenticated caller of an admin action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    /// Caller login, recorded on restored rows.
    pub login: String,
    /// True when the caller holds admin privileges.
    pub is_admin: bool,
}

impl AdminContext {
    /// Creates an admin caller.
    #[must_use]
    pub fn admin(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            is_admin: true,
        }
    }
}

/// Admin action failures.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The caller is not an admin.
    #[error("no permission: {0} is not an administrator")]
    Forbidden(String),
    /// No archive entry with this id.
    #[error("archive entry {0} not found")]
    NotFound(ArchiveItemId),
    /// A delete transaction failed and was rolled back.
    #[error("archive transaction failed: {0}")]
    Transaction(#[from] ArchiveError),
    /// The restore failed.
    #[error(transparent)]
    Restore(RestoreError),
}

impl From<RestoreError> for AdminError {
    fn from(error: RestoreError) -> Self {
        match error {
            RestoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Restore(other),
        }
    }
}

// ============================================================================
// SECTION: Actions
// ============================================================================

impl<A, R, C> TrashEngine<A, R, C>
where
    A: ArchiveStore,
    R: ContentRepository,
    C: ContentCache,
{
    /// Lists archive entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError`] when the caller is not an admin or the query fails.
    pub fn admin_list(&self, caller: &AdminContext) -> Result<Vec<TrashedItemSummary>, AdminError> {
        self.authorize(caller, "list")?;
        Ok(self.archive.list_items()?)
    }

    /// Restores one archive entry as the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError`] when the caller is not an admin or the restore fails.
    pub fn admin_restore(
        &self,
        caller: &AdminContext,
        archive_id: ArchiveItemId,
    ) -> Result<RestoreResult, AdminError> {
        self.authorize(caller, "restore")?;
        Ok(self.restore_as(archive_id, &caller.login)?)
    }

    /// Permanently deletes one archive entry.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError`] when the caller is not an admin, the entry is
    /// missing, or the transaction fails.
    pub fn admin_delete(
        &self,
        caller: &AdminContext,
        archive_id: ArchiveItemId,
    ) -> Result<(), AdminError> {
        self.authorize(caller, "delete")?;
        match self.archive.delete_item(archive_id) {
            Ok(true) => {
                self.emit(
                    &self
                        .event("admin_deleted", EventLevel::Info, OPERATION, caller.login.clone())
                        .with_archive_id(archive_id.get()),
                );
                Ok(())
            }
            Ok(false) => Err(AdminError::NotFound(archive_id)),
            Err(err) => {
                self.emit(
                    &self
                        .event("admin_delete_failed", EventLevel::Error, OPERATION, err.to_string())
                        .with_archive_id(archive_id.get()),
                );
                Err(AdminError::Transaction(err))
            }
        }
    }

    /// Permanently deletes every archive entry and returns the item count.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError`] when the caller is not an admin or the
    /// transaction fails.
    pub fn admin_empty(&self, caller: &AdminContext) -> Result<u64, AdminError> {
        self.authorize(caller, "empty")?;
        match self.archive.delete_all() {
            Ok(count) => {
                self.emit(&self.event(
                    "admin_emptied",
                    EventLevel::Info,
                    OPERATION,
                    format!("{count} entries removed by {}", caller.login),
                ));
                Ok(count)
            }
            Err(err) => {
                self.emit(&self.event("admin_empty_failed", EventLevel::Error, OPERATION, err.to_string()));
                Err(AdminError::Transaction(err))
            }
        }
    }

    /// Refuses non-admin callers.
    fn authorize(&self, caller: &AdminContext, action: &str) -> Result<(), AdminError> {
        if caller.is_admin {
            return Ok(());
        }
        self.emit(&self.event(
            "admin_forbidden",
            EventLevel::Warn,
            OPERATION,
            format!("{} denied {action}", caller.login),
        ));
        Err(AdminError::Forbidden(caller.login.clone()))
    }
}
