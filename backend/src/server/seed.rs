//! Bootstrap seeding for the administrator account.

use chrono::Utc;
use tracing::{info, warn};
use vpet_backend::domain::ports::{PasswordHasher, UserRepository};
use vpet_backend::domain::user::{EmailAddress, Role, User, UserId, Username};

/// Default administrator credentials for local development.
const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "password";

/// Ensure an administrator account exists.
///
/// Credentials come from `ADMIN_EMAIL`, `ADMIN_USERNAME`, and
/// `ADMIN_PASSWORD`, falling back to development defaults. Failures are
/// logged rather than fatal so a transiently unavailable database does not
/// prevent startup; the probe endpoints stay healthy and the next restart
/// retries.
pub(crate) async fn seed_admin<U, H>(users: &U, hasher: &H)
where
    U: UserRepository,
    H: PasswordHasher,
{
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.into());
    let username =
        std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.into());
    let password =
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.into());

    let email = match EmailAddress::new(&email) {
        Ok(email) => email,
        Err(err) => {
            warn!(%err, "ADMIN_EMAIL is invalid; skipping admin bootstrap");
            return;
        }
    };
    let username = match Username::new(&username) {
        Ok(username) => username,
        Err(err) => {
            warn!(%err, "ADMIN_USERNAME is invalid; skipping admin bootstrap");
            return;
        }
    };

    match users.email_exists(&email).await {
        Ok(true) => {
            info!(email = email.as_ref(), "admin account already present");
            return;
        }
        Ok(false) => {}
        Err(err) => {
            warn!(%err, "could not check for admin account; skipping bootstrap");
            return;
        }
    }

    let admin = User::new(
        UserId::random(),
        username,
        email,
        hasher.hash(&password),
        vec![Role::Admin],
        Utc::now(),
    );

    match users.insert(&admin).await {
        Ok(()) => info!(email = admin.email().as_ref(), "seeded admin account"),
        Err(err) => warn!(%err, "admin bootstrap insert failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpet_backend::domain::ports::InMemoryUserRepository;
    use vpet_backend::outbound::security::ShaPasswordHasher;

    #[tokio::test]
    async fn seeds_admin_once() {
        let users = InMemoryUserRepository::new();
        let hasher = ShaPasswordHasher::with_iterations(2);

        seed_admin(&users, &hasher).await;
        seed_admin(&users, &hasher).await;

        let accounts = users.list().await.expect("list");
        assert_eq!(accounts.len(), 1);
        assert!(accounts[0].is_admin());
    }
}
