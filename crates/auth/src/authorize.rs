//! Authorization decision engine.
//!
//! Two orthogonal gating primitives (role gate, permission gate) plus the
//! ownership-aware content visibility rule.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy checks)
//!
//! Disclosure policy: a resource the caller may not view is reported
//! `NotFound`, identical to true absence, from every access path. The list
//! filter and the get-by-id check share one predicate ([`is_visible_to`]) so
//! the two paths cannot diverge into an existence leak.

use quillpress_core::{AuthError, AuthResult};

use crate::{ContentStatus, ContentView, Permission, Principal, Role};

/// Action requested against a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentAction {
    View,
    Publish,
    Archive,
}

/// Role gate: the caller's role must be a member of the allowed set.
pub fn role_gate(principal: &Principal, allowed: &[Role]) -> AuthResult<()> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(AuthError::forbidden(format!(
            "role '{}' is not permitted for this action",
            principal.role
        )))
    }
}

/// Permission gate: any-of semantics over the required set.
pub fn permission_gate(principal: &Principal, required: &[Permission]) -> AuthResult<()> {
    if principal.permissions.intersects(required) {
        Ok(())
    } else {
        Err(AuthError::forbidden("missing required permission"))
    }
}

/// The single visibility predicate, shared by list filtering and get-by-id.
///
/// - Anonymous caller: published only.
/// - Authenticated caller: published, or their own content.
/// - Admin: everything.
pub fn is_visible_to(caller: Option<&Principal>, content: &ContentView) -> bool {
    match caller {
        None => content.status == ContentStatus::Published,
        Some(principal) => {
            principal.role.is_admin()
                || content.status == ContentStatus::Published
                || content.owner == principal.account_id
        }
    }
}

/// Pre-filter for collection ("list") access paths.
pub fn filter_visible(caller: Option<&Principal>, items: Vec<ContentView>) -> Vec<ContentView> {
    items
        .into_iter()
        .filter(|item| is_visible_to(caller, item))
        .collect()
}

/// Post-check for the get-by-id access path.
pub fn check_view(caller: Option<&Principal>, content: &ContentView) -> AuthResult<()> {
    if is_visible_to(caller, content) {
        Ok(())
    } else {
        Err(AuthError::NotFound)
    }
}

/// Gate a publish transition: ownership-or-admin, then status precondition.
///
/// Archived is terminal here; there is no unarchive path.
pub fn check_publish(caller: &Principal, content: &ContentView) -> AuthResult<()> {
    check_ownership(caller, content)?;
    match content.status {
        ContentStatus::Draft => Ok(()),
        ContentStatus::Published => Err(AuthError::validation("content is already published")),
        ContentStatus::Archived => Err(AuthError::validation("archived content cannot be published")),
    }
}

/// Gate an archive transition: ownership-or-admin, then status precondition.
pub fn check_archive(caller: &Principal, content: &ContentView) -> AuthResult<()> {
    check_ownership(caller, content)?;
    match content.status {
        ContentStatus::Draft | ContentStatus::Published => Ok(()),
        ContentStatus::Archived => Err(AuthError::validation("content is already archived")),
    }
}

/// Single entry point mirroring the boundary operation shape.
pub fn authorize_content(
    caller: Option<&Principal>,
    action: ContentAction,
    content: &ContentView,
) -> AuthResult<()> {
    match action {
        ContentAction::View => check_view(caller, content),
        ContentAction::Publish => {
            let principal = require_caller(caller, content)?;
            check_publish(principal, content)
        }
        ContentAction::Archive => {
            let principal = require_caller(caller, content)?;
            check_archive(principal, content)
        }
    }
}

/// Mutations by anonymous callers report the same way a view would: a
/// published item is `Unauthenticated` territory for the transport layer,
/// but this engine never sees token failures, so the consistent report here
/// is `NotFound` for invisible content and `Forbidden` for visible content.
fn require_caller<'a>(
    caller: Option<&'a Principal>,
    content: &ContentView,
) -> AuthResult<&'a Principal> {
    match caller {
        Some(principal) => Ok(principal),
        None if content.status == ContentStatus::Published => {
            Err(AuthError::forbidden("authentication required"))
        }
        None => Err(AuthError::NotFound),
    }
}

/// Ownership-or-admin rule for state transitions. Invisible content reads as
/// absent; visible-but-unowned content is a plain forbidden.
fn check_ownership(caller: &Principal, content: &ContentView) -> AuthResult<()> {
    if caller.role.is_admin() || content.owner == caller.account_id {
        return Ok(());
    }
    if is_visible_to(Some(caller), content) {
        Err(AuthError::forbidden("only the owner may modify this content"))
    } else {
        Err(AuthError::NotFound)
    }
}
