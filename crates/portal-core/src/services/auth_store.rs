// ============================================================================
// Portal Core - Auth Store
// File: crates/portal-core/src/services/auth_store.rs
// ============================================================================
//! Login, registration, and the persisted current session

use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{error, info, warn};
use validator::Validate;

use portal_security::PasswordService;
use portal_shared::constants::{KEY_CURRENT_USER, KEY_USERS, USERS_SCHEMA_VERSION};
use portal_shared::utils::mask_email;

use crate::collection::{EntityCollection, Observers, SubscriptionId};
use crate::domain::{Credential, NewCredential, SeedAccount, User, UserPatch, UserRole};
use crate::error::{DomainError, StorageError};
use crate::repositories::{BackingStore, BackingStoreExt};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Unauthenticated => None,
        }
    }
}

#[derive(Validate)]
struct Registration {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    name: String,
    #[validate(email(message = "Invalid email address"))]
    email: String,
}

/// Verified against when no account matches, so an unknown email costs the
/// same argon2 work as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| PasswordService::hash("portal-dummy-secret").ok());

/// Authentication store: credential collection plus session state machine
pub struct AuthStore<S: BackingStore> {
    store: Arc<S>,
    credentials: EntityCollection<Credential, S>,
    session: SessionState,
    observers: Observers<SessionState>,
}

impl<S: BackingStore> AuthStore<S> {
    /// Seed accounts are hashed only when no compatible credential
    /// collection is persisted yet.
    pub fn new(store: Arc<S>, seed_accounts: Vec<SeedAccount>) -> Self {
        let credentials = EntityCollection::initialize_with(
            store.clone(),
            KEY_USERS,
            USERS_SCHEMA_VERSION,
            || hash_seed_accounts(seed_accounts),
        );
        let session = restore_session(&*store, &credentials);

        Self { store, credentials, session, observers: Observers::default() }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Public profile of a registered user, without the secret.
    pub fn user_by_id(&self, id: &str) -> Option<User> {
        self.credentials.get_by_id(id).map(|c| c.user.clone())
    }

    pub fn users(&self) -> Vec<User> {
        self.credentials.list().iter().map(|c| c.user.clone()).collect()
    }

    /// Unknown email and wrong password fail the same way.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, DomainError> {
        info!("Login attempt for email: {}", mask_email(email));

        let user = match self.credentials.list().iter().find(|c| c.user.email == email) {
            Some(credential) if verify_secret(password, credential) => credential.user.clone(),
            Some(_) => {
                warn!("Login failed for: {}", mask_email(email));
                return Err(DomainError::InvalidCredentials);
            }
            None => {
                burn_verify(password);
                warn!("Login failed for: {}", mask_email(email));
                return Err(DomainError::InvalidCredentials);
            }
        };

        self.set_session(SessionState::Authenticated(user.clone()));
        info!(user_id = %user.id, "Login successful");
        Ok(user)
    }

    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, DomainError> {
        info!("Registration attempt for email: {}", mask_email(email));

        let registration = Registration { name: name.trim().to_string(), email: email.trim().to_string() };
        registration.validate()?;
        PasswordService::check_policy(password)?;

        if self.email_taken(&registration.email) {
            warn!("Registration failed: email already exists: {}", mask_email(email));
            return Err(DomainError::EmailAlreadyExists(registration.email));
        }

        let password_hash = PasswordService::hash(password)?;
        let credential = self.credentials.add(NewCredential {
            name: registration.name,
            email: registration.email,
            role,
            password_hash,
        });

        let user = credential.user;
        self.set_session(SessionState::Authenticated(user.clone()));
        info!(user_id = %user.id, "Registration successful");
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current_user() {
            info!(user_id = %user.id, "Logout");
        }
        self.set_session(SessionState::Unauthenticated);
    }

    /// Updates the signed-in user's profile and the session record with it.
    pub fn update_profile(&mut self, patch: UserPatch) -> Result<User, DomainError> {
        let user_id = self
            .current_user()
            .map(|u| u.id.clone())
            .ok_or(DomainError::NotAuthenticated)?;
        patch.validate()?;

        let updated = self
            .credentials
            .update(&user_id, patch)
            .map(|c| c.user)
            .ok_or_else(|| DomainError::not_found("User", &user_id))?;

        self.set_session(SessionState::Authenticated(updated.clone()));
        Ok(updated)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn last_write_error(&self) -> Option<&StorageError> {
        self.credentials.last_write_error()
    }

    fn email_taken(&self, email: &str) -> bool {
        self.credentials
            .list()
            .iter()
            .any(|c| c.user.email.eq_ignore_ascii_case(email))
    }

    fn set_session(&mut self, session: SessionState) {
        let result = match &session {
            SessionState::Authenticated(user) => self.store.write_json(KEY_CURRENT_USER, user),
            SessionState::Unauthenticated => self.store.remove(KEY_CURRENT_USER),
        };
        if let Err(e) = result {
            error!(error = %e, "Failed to persist session record");
        }
        self.session = session;
        self.observers.notify(&self.session);
    }
}

fn verify_secret(password: &str, credential: &Credential) -> bool {
    match PasswordService::verify(password, &credential.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            error!(user_id = %credential.user.id, error = %e, "Stored password hash is unreadable");
            false
        }
    }
}

fn burn_verify(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = PasswordService::verify(password, hash);
    }
}

fn hash_seed_accounts(accounts: Vec<SeedAccount>) -> Vec<Credential> {
    accounts
        .into_iter()
        .filter_map(|account| match PasswordService::hash(&account.password) {
            Ok(password_hash) => Some(Credential { user: account.user, password_hash }),
            Err(e) => {
                error!(user_id = %account.user.id, error = %e, "Failed to hash seed account, skipping");
                None
            }
        })
        .collect()
}

/// The stored session is trusted only while its user still exists.
fn restore_session<S: BackingStore>(
    store: &S,
    credentials: &EntityCollection<Credential, S>,
) -> SessionState {
    match store.read_json::<User>(KEY_CURRENT_USER) {
        Ok(Some(user)) => match credentials.get_by_id(&user.id) {
            Some(credential) => {
                info!(user_id = %user.id, "Restored session");
                SessionState::Authenticated(credential.user.clone())
            }
            None => {
                warn!(user_id = %user.id, "Session refers to an unknown user, clearing it");
                clear_session_record(store);
                SessionState::Unauthenticated
            }
        },
        Ok(None) => SessionState::Unauthenticated,
        Err(e) => {
            warn!(error = %e, "Session record unreadable, clearing it");
            clear_session_record(store);
            SessionState::Unauthenticated
        }
    }
}

fn clear_session_record<S: BackingStore>(store: &S) {
    if let Err(e) = store.remove(KEY_CURRENT_USER) {
        error!(error = %e, "Failed to clear session record");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryBackingStore;
    use crate::seed;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn open(store: &Arc<MemoryBackingStore>) -> AuthStore<MemoryBackingStore> {
        AuthStore::new(store.clone(), seed::accounts())
    }

    #[test]
    fn test_starts_unauthenticated() {
        let store = Arc::new(MemoryBackingStore::new());
        let auth = open(&store);
        assert_eq!(auth.session(), &SessionState::Unauthenticated);
        assert_eq!(auth.users().len(), 3);
    }

    #[test]
    fn test_seed_passwords_are_hashed_at_rest() {
        let store = Arc::new(MemoryBackingStore::new());
        open(&store);
        let raw = store.read(KEY_USERS).unwrap().unwrap();
        assert!(!raw.contains("admin123"));
        assert!(raw.contains("$argon2"));
    }

    #[test]
    fn test_login_success_persists_session() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut auth = open(&store);

        let user = auth.login("student@example.com", "student123").unwrap();
        assert_eq!(user.role, UserRole::Student);
        assert!(auth.is_authenticated());

        let raw = store.read(KEY_CURRENT_USER).unwrap().unwrap();
        assert!(raw.contains("student@example.com"));
        assert!(!raw.contains("password"));
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut auth = open(&store);

        let wrong_secret = auth.login("student@example.com", "nope").unwrap_err();
        let unknown_email = auth.login("ghost@example.com", "student123").unwrap_err();

        assert!(matches!(wrong_secret, DomainError::InvalidCredentials));
        assert!(matches!(unknown_email, DomainError::InvalidCredentials));
        assert_eq!(wrong_secret.to_string(), unknown_email.to_string());
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_unknown_email_still_runs_argon2_verify() {
        let hash = DUMMY_HASH.as_deref().expect("dummy hash");
        assert!(hash.starts_with("$argon2"));
        assert!(!PasswordService::verify("student123", hash).unwrap());
    }

    #[test]
    fn test_failed_login_keeps_current_session() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut auth = open(&store);
        auth.login("admin@example.com", "admin123").unwrap();
        assert!(auth.login("admin@example.com", "wrong").is_err());
        assert_eq!(auth.current_user().map(|u| u.email.as_str()), Some("admin@example.com"));
    }

    #[test]
    fn test_register_then_login() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut auth = open(&store);

        let user = auth
            .register("New Student", "new@example.com", "correct horse", UserRole::default())
            .unwrap();
        assert_eq!(user.role, UserRole::Student);
        assert!(user.id.starts_with("user_"));
        assert_eq!(auth.current_user(), Some(&user));

        auth.logout();
        assert!(!auth.is_authenticated());
        assert_eq!(store.read(KEY_CURRENT_USER).unwrap(), None);

        let again = auth.login("new@example.com", "correct horse").unwrap();
        assert_eq!(again.id, user.id);
    }

    #[test]
    fn test_register_duplicate_email_leaves_credential_untouched() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut auth = open(&store);
        let before = store.read(KEY_USERS).unwrap();

        let err = auth
            .register("Impostor", "admin@example.com", "something long", UserRole::Admin)
            .unwrap_err();

        assert!(matches!(err, DomainError::EmailAlreadyExists(_)));
        assert_eq!(store.read(KEY_USERS).unwrap(), before);
        assert!(!auth.is_authenticated());
        assert!(auth.login("admin@example.com", "admin123").is_ok());
    }

    #[test]
    fn test_register_validation() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut auth = open(&store);
        assert!(matches!(
            auth.register("X", "not-an-email", "long enough", UserRole::Student),
            Err(DomainError::ValidationError(_))
        ));
        assert!(matches!(
            auth.register("", "x@example.com", "long enough", UserRole::Student),
            Err(DomainError::ValidationError(_))
        ));
        assert!(matches!(
            auth.register("X", "x@example.com", "short", UserRole::Student),
            Err(DomainError::PasswordTooShort)
        ));
        assert_eq!(auth.users().len(), 3);
    }

    #[test]
    fn test_session_survives_restart() {
        let store = Arc::new(MemoryBackingStore::new());
        let user = {
            let mut auth = open(&store);
            auth.login("lecturer@example.com", "lecturer123").unwrap()
        };

        let auth = open(&store);
        assert_eq!(auth.current_user().map(|u| u.id.clone()), Some(user.id));
    }

    #[test]
    fn test_orphaned_session_is_cleared() {
        let store = Arc::new(MemoryBackingStore::new());
        {
            let mut auth = open(&store);
            auth.register("Temp", "temp@example.com", "temporary pw", UserRole::Student).unwrap();
        }
        // Credential collection reset under a new schema version wipes the user.
        store.write("users_version", "0").unwrap();

        let auth = open(&store);
        assert!(!auth.is_authenticated());
        assert_eq!(store.read(KEY_CURRENT_USER).unwrap(), None);
    }

    #[test]
    fn test_corrupt_session_record_is_cleared() {
        let store = Arc::new(MemoryBackingStore::new());
        store.write(KEY_CURRENT_USER, "{oops").unwrap();
        let auth = open(&store);
        assert!(!auth.is_authenticated());
        assert_eq!(store.read(KEY_CURRENT_USER).unwrap(), None);
    }

    #[test]
    fn test_update_profile() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut auth = open(&store);
        assert!(matches!(auth.update_profile(UserPatch::default()), Err(DomainError::NotAuthenticated)));

        let before = auth.login("student@example.com", "student123").unwrap();
        let after = auth
            .update_profile(UserPatch { skills: Some(vec!["Rust".to_string()]), ..Default::default() })
            .unwrap();

        assert_eq!(after.skills, vec!["Rust"]);
        assert_eq!(after.name, before.name);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(auth.current_user(), Some(&after));
        assert_eq!(auth.user_by_id(&after.id), Some(after));
    }

    #[test]
    fn test_update_profile_rejects_blank_name() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut auth = open(&store);
        let before = auth.login("student@example.com", "student123").unwrap();

        let result = auth.update_profile(UserPatch { name: Some("   ".to_string()), ..Default::default() });

        assert!(matches!(result, Err(DomainError::ValidationError(_))));
        assert_eq!(auth.current_user(), Some(&before));
        assert_eq!(auth.user_by_id(&before.id).unwrap().name, before.name);
    }

    #[test]
    fn test_observers_follow_session_changes() {
        let store = Arc::new(MemoryBackingStore::new());
        let mut auth = open(&store);
        let signed_in = Arc::new(AtomicUsize::new(0));
        let counter = signed_in.clone();
        auth.subscribe(move |state: &SessionState| {
            if state.user().is_some() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        auth.login("admin@example.com", "admin123").unwrap();
        auth.logout();
        let _ = auth.login("admin@example.com", "bad");

        assert_eq!(signed_in.load(Ordering::SeqCst), 1);
    }
}
