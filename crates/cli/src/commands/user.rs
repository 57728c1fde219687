//! Account management commands.

use nexussphere_site::db::users::PgUserRepository;
use nexussphere_site::services::auth::{AuthService, Registration};

use super::{CommandError, connect};

/// Create an account, optionally with staff rights.
pub async fn create(
    username: &str,
    password: &str,
    email: Option<&str>,
    staff: bool,
) -> Result<(), CommandError> {
    let pool = connect().await?;
    let users = PgUserRepository::new(pool);

    let account = AuthService::new(&users)
        .register(Registration {
            username,
            email,
            password,
            is_staff: staff,
        })
        .await?;

    tracing::info!(
        "Account created successfully! ID: {}, Username: {}, Staff: {}",
        account.id,
        account.username,
        account.is_staff
    );
    Ok(())
}
