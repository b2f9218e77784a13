//! Authorization predicate shared by every endpoint.
//!
//! Handlers never compare role strings themselves; they describe what they are
//! about to do as an [`Action`] on a [`Resource`] and ask [`can`].

use crate::roles::UserRole;
use crate::types::DbId;

/// The caller of a request, resolved from its session and current profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: DbId,
    pub role: UserRole,
    pub is_active: bool,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Task,
    Comment,
    History,
    Category,
    /// Name/email listing used to pick assignees.
    ProfileDirectory,
    /// Role and active-flag management of other accounts.
    UserAccounts,
    Analytics,
    Dashboard,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Comment => "comment",
            Self::History => "history",
            Self::Category => "category",
            Self::ProfileDirectory => "profile_directory",
            Self::UserAccounts => "user_accounts",
            Self::Analytics => "analytics",
            Self::Dashboard => "dashboard",
        }
    }
}

/// Decide whether `identity` may perform `action` on `resource`.
///
/// Deactivated identities are denied everything. Admins are allowed
/// everything. Regular users work on tasks and their threads but cannot reach
/// the admin surfaces.
pub fn can(identity: &Identity, action: Action, resource: Resource) -> bool {
    if !identity.is_active {
        return false;
    }
    if identity.is_admin() {
        return true;
    }

    use Action::*;
    match resource {
        Resource::Task => true,
        Resource::Comment => matches!(action, Read | Create),
        Resource::History
        | Resource::Category
        | Resource::ProfileDirectory
        | Resource::Dashboard => action == Read,
        Resource::UserAccounts | Resource::Analytics => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: UserRole, is_active: bool) -> Identity {
        Identity {
            user_id: 1,
            role,
            is_active,
        }
    }

    #[test]
    fn admin_can_do_everything() {
        let admin = identity(UserRole::Admin, true);
        for resource in [
            Resource::Task,
            Resource::Comment,
            Resource::History,
            Resource::Category,
            Resource::ProfileDirectory,
            Resource::UserAccounts,
            Resource::Analytics,
            Resource::Dashboard,
        ] {
            for action in [Action::Read, Action::Create, Action::Update, Action::Delete] {
                assert!(can(&admin, action, resource), "{action:?} {resource:?}");
            }
        }
    }

    #[test]
    fn user_manages_tasks() {
        let user = identity(UserRole::User, true);
        assert!(can(&user, Action::Read, Resource::Task));
        assert!(can(&user, Action::Create, Resource::Task));
        assert!(can(&user, Action::Update, Resource::Task));
        assert!(can(&user, Action::Delete, Resource::Task));
    }

    #[test]
    fn comments_and_history_are_append_or_read_only() {
        let user = identity(UserRole::User, true);
        assert!(can(&user, Action::Create, Resource::Comment));
        assert!(!can(&user, Action::Update, Resource::Comment));
        assert!(!can(&user, Action::Delete, Resource::Comment));
        assert!(can(&user, Action::Read, Resource::History));
        assert!(!can(&user, Action::Create, Resource::History));
    }

    #[test]
    fn user_is_kept_out_of_admin_surfaces() {
        let user = identity(UserRole::User, true);
        assert!(!can(&user, Action::Read, Resource::Analytics));
        assert!(!can(&user, Action::Read, Resource::UserAccounts));
        assert!(!can(&user, Action::Update, Resource::UserAccounts));
        assert!(!can(&user, Action::Create, Resource::Category));
        assert!(can(&user, Action::Read, Resource::Category));
    }

    #[test]
    fn inactive_identity_is_denied_even_as_admin() {
        let admin = identity(UserRole::Admin, false);
        assert!(!can(&admin, Action::Read, Resource::Task));
        assert!(!can(&admin, Action::Read, Resource::Analytics));
    }
}
