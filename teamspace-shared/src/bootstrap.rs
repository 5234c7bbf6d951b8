/// Account bootstrap
///
/// Provisioning a first-seen identity touches five rows: the user, its
/// provider account, a default workspace, an owner-role membership, and
/// the user's current-workspace pointer. This module wraps all five in one
/// database transaction so no request ever observes a user without its
/// account/workspace/member graph. Any failure aborts the whole
/// transaction and propagates unchanged.
///
/// Two entry points share the transactional core:
///
/// - [`register_account`] for local email/password registration
/// - [`login_or_create_account`] for external-provider sign-in, which
///   only provisions when the identity's email is not yet known
///
/// The duplicate-email pre-check is a friendly fast path; the actual
/// guarantee is the `users_email_key` unique index, whose violation maps
/// to the same [`BootstrapError::EmailTaken`].

use sqlx::{PgPool, Postgres, Transaction};

use crate::models::account::{Account, AuthProvider, CreateAccount};
use crate::models::member::{CreateMember, Member};
use crate::models::role::{Role, RoleName};
use crate::models::user::{CreateUser, User};
use crate::models::workspace::{CreateWorkspace, Workspace};

/// Name given to every user's default workspace
const DEFAULT_WORKSPACE_NAME: &str = "My Workspace";

/// Error type for account bootstrap
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The email is already registered
    #[error("email is already registered")]
    EmailTaken,

    /// The external identity carried no email to key the user on
    #[error("identity provider supplied no email")]
    EmailMissing,

    /// The seeded "owner" role is missing: a deployment fault, not a
    /// user error
    #[error("owner role is not seeded in the roles table")]
    OwnerRoleMissing,

    /// An existing user's current workspace row is gone
    #[error("user {0} has no resolvable current workspace")]
    WorkspaceMissing(uuid::Uuid),

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Input for local registration (password already hashed by the caller)
#[derive(Debug, Clone)]
pub struct LocalRegistration {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

/// A verified identity handed back by an external provider
#[derive(Debug, Clone)]
pub struct ExternalIdentity {
    pub provider: AuthProvider,
    pub provider_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub picture: Option<String>,
}

/// The user/workspace pair a bootstrap produces
#[derive(Debug, Clone)]
pub struct ProvisionedAccount {
    pub user: User,
    pub workspace: Workspace,
}

/// Registers a local email/password account.
///
/// Fails fast with [`BootstrapError::EmailTaken`] when the email is known,
/// then provisions the full account graph in one transaction.
pub async fn register_account(
    pool: &PgPool,
    registration: LocalRegistration,
) -> Result<ProvisionedAccount, BootstrapError> {
    let mut tx = pool.begin().await?;

    if User::find_by_email(&mut *tx, &registration.email)
        .await?
        .is_some()
    {
        return Err(BootstrapError::EmailTaken);
    }

    let user = create_user_guarded(
        &mut tx,
        CreateUser {
            email: registration.email,
            name: registration.name,
            password_hash: Some(registration.password_hash),
            profile_picture: None,
        },
    )
    .await?;

    let provider_id = user.email.clone();
    let provisioned = provision_account_graph(&mut tx, user, AuthProvider::Email, provider_id).await?;

    tx.commit().await?;

    tracing::info!(
        user_id = %provisioned.user.id,
        workspace_id = %provisioned.workspace.id,
        "registered new account"
    );

    Ok(provisioned)
}

/// Handles an external-provider sign-in.
///
/// Returns the existing user and its active workspace when the identity's
/// email is already registered; otherwise provisions a new account graph
/// in one transaction.
pub async fn login_or_create_account(
    pool: &PgPool,
    identity: ExternalIdentity,
) -> Result<ProvisionedAccount, BootstrapError> {
    let email = identity.email.ok_or(BootstrapError::EmailMissing)?;

    let mut tx = pool.begin().await?;

    if let Some(user) = User::find_by_email(&mut *tx, &email).await? {
        let workspace_id = user
            .current_workspace
            .ok_or(BootstrapError::WorkspaceMissing(user.id))?;
        let workspace = Workspace::find_by_id(&mut *tx, workspace_id)
            .await?
            .ok_or(BootstrapError::WorkspaceMissing(user.id))?;
        tx.commit().await?;

        tracing::debug!(user_id = %user.id, "provider sign-in for existing user");
        return Ok(ProvisionedAccount { user, workspace });
    }

    let user = create_user_guarded(
        &mut tx,
        CreateUser {
            email,
            name: identity.display_name,
            password_hash: None,
            profile_picture: identity.picture,
        },
    )
    .await?;

    let provisioned =
        provision_account_graph(&mut tx, user, identity.provider, identity.provider_id).await?;

    tx.commit().await?;

    tracing::info!(
        user_id = %provisioned.user.id,
        workspace_id = %provisioned.workspace.id,
        "provisioned account for first-seen provider identity"
    );

    Ok(provisioned)
}

/// Creates the user row, translating the email unique violation into the
/// duplicate-email failure the pre-check would have produced.
async fn create_user_guarded(
    tx: &mut Transaction<'_, Postgres>,
    data: CreateUser,
) -> Result<User, BootstrapError> {
    match User::create(&mut **tx, data).await {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.constraint() == Some("users_email_key") => {
            Err(BootstrapError::EmailTaken)
        }
        Err(e) => Err(e.into()),
    }
}

/// The shared transactional core: account, workspace, owner membership,
/// current-workspace pointer. Assumes the user row was just created inside
/// the same transaction.
async fn provision_account_graph(
    tx: &mut Transaction<'_, Postgres>,
    user: User,
    provider: AuthProvider,
    provider_id: String,
) -> Result<ProvisionedAccount, BootstrapError> {
    let account = Account::create(
        &mut **tx,
        CreateAccount {
            user_id: user.id,
            provider,
            provider_id,
        },
    )
    .await?;

    let workspace = Workspace::create(
        &mut **tx,
        CreateWorkspace {
            name: DEFAULT_WORKSPACE_NAME.to_string(),
            description: Some(format!("Workspace created for {}", user.name)),
            owner_id: user.id,
        },
    )
    .await?;

    let owner_role = Role::find_by_name(&mut **tx, RoleName::Owner)
        .await?
        .ok_or(BootstrapError::OwnerRoleMissing)?;

    Member::create(
        &mut **tx,
        CreateMember {
            user_id: user.id,
            workspace_id: workspace.id,
            role_id: owner_role.id,
        },
    )
    .await?;

    let user = User::set_current_workspace(&mut **tx, user.id, workspace.id).await?;

    tracing::debug!(
        user_id = %user.id,
        account_id = %account.id,
        workspace_id = %workspace.id,
        "account graph assembled"
    );

    Ok(ProvisionedAccount { user, workspace })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_error_messages() {
        assert_eq!(
            BootstrapError::EmailTaken.to_string(),
            "email is already registered"
        );
        assert_eq!(
            BootstrapError::OwnerRoleMissing.to_string(),
            "owner role is not seeded in the roles table"
        );
    }
}
