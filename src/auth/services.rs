use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::remote::identity::{Identity, IdentityAdmin, IdentityError, NewIdentity};
use crate::remote::table::TableClient;
use crate::roles::Role;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Profile row written alongside a fresh identity.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
}

/// Role assignment row; every fresh identity starts as a student.
#[derive(Debug, Clone, Serialize)]
pub struct NewRoleAssignment {
    pub user_id: Uuid,
    pub role: Role,
}

/// The writes that follow identity creation. Both are best-effort.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn insert_profile(&self, profile: &NewProfile) -> anyhow::Result<()>;
    async fn insert_role(&self, assignment: &NewRoleAssignment) -> anyhow::Result<()>;
}

#[async_trait]
impl RegistrationStore for TableClient {
    async fn insert_profile(&self, profile: &NewProfile) -> anyhow::Result<()> {
        self.insert("user_profiles", profile).await
    }

    async fn insert_role(&self, assignment: &NewRoleAssignment) -> anyhow::Result<()> {
        self.insert("user_roles", assignment).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryStep {
    Profile,
    Role,
}

/// A best-effort write that did not land. Reported next to success, never
/// as a failure.
#[derive(Debug, Clone, Serialize)]
pub struct SecondaryWarning {
    pub step: SecondaryStep,
    pub message: String,
}

enum SecondaryOutcome {
    Completed,
    Warned(SecondaryWarning),
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("email, password and full_name are required")]
    MissingFields,
    #[error("invalid email address")]
    InvalidEmail,
    #[error(transparent)]
    Identity(IdentityError),
}

impl From<RegisterError> for ApiError {
    fn from(e: RegisterError) -> Self {
        match e {
            RegisterError::MissingFields | RegisterError::InvalidEmail => {
                ApiError::Validation(e.to_string())
            }
            RegisterError::Identity(IdentityError::Rejected { status, message }) => {
                ApiError::IdentityCreation { status, message }
            }
            // Transport failures carry no upstream status to mirror.
            RegisterError::Identity(err @ IdentityError::Transport(_)) => {
                ApiError::IdentityCreation {
                    status: 502,
                    message: err.to_string(),
                }
            }
        }
    }
}

#[derive(Debug)]
pub struct Registration {
    pub identity: Identity,
    pub warnings: Vec<SecondaryWarning>,
}

/// Creates the auth identity, then the profile and default role records.
///
/// Identity creation is all-or-nothing; once it succeeds the registration
/// is committed. The two follow-up writes run concurrently and failures
/// are downgraded to warnings, since the identity alone is what login
/// needs — a missing profile or role row is degraded, not failed.
pub async fn register_user(
    identity: &dyn IdentityAdmin,
    store: &dyn RegistrationStore,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<Registration, RegisterError> {
    let email = email.trim().to_lowercase();
    let full_name = full_name.trim();
    if email.is_empty() || password.is_empty() || full_name.is_empty() {
        return Err(RegisterError::MissingFields);
    }
    if !is_valid_email(&email) {
        return Err(RegisterError::InvalidEmail);
    }

    let created = identity
        .create_identity(&NewIdentity {
            email,
            password: password.to_string(),
            full_name: full_name.to_string(),
        })
        .await
        .map_err(RegisterError::Identity)?;

    let (profile, role) = tokio::join!(
        write_profile(store, &created, full_name),
        write_role(store, created.id),
    );

    let warnings = [profile, role]
        .into_iter()
        .filter_map(|outcome| match outcome {
            SecondaryOutcome::Completed => None,
            SecondaryOutcome::Warned(w) => Some(w),
        })
        .collect();

    Ok(Registration {
        identity: created,
        warnings,
    })
}

async fn write_profile(
    store: &dyn RegistrationStore,
    identity: &Identity,
    full_name: &str,
) -> SecondaryOutcome {
    let profile = NewProfile {
        id: identity.id,
        email: identity.email.clone(),
        full_name: full_name.to_string(),
    };
    match store.insert_profile(&profile).await {
        Ok(()) => SecondaryOutcome::Completed,
        Err(e) => {
            warn!(user_id = %identity.id, error = %e, "profile insert failed; identity remains usable");
            SecondaryOutcome::Warned(SecondaryWarning {
                step: SecondaryStep::Profile,
                message: e.to_string(),
            })
        }
    }
}

async fn write_role(store: &dyn RegistrationStore, user_id: Uuid) -> SecondaryOutcome {
    let assignment = NewRoleAssignment {
        user_id,
        role: Role::Student,
    };
    match store.insert_role(&assignment).await {
        Ok(()) => SecondaryOutcome::Completed,
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "role insert failed; identity remains usable");
            SecondaryOutcome::Warned(SecondaryWarning {
                step: SecondaryStep::Role,
                message: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubIdentity {
        calls: AtomicUsize,
        reject: Option<(u16, String)>,
    }

    #[async_trait]
    impl IdentityAdmin for StubIdentity {
        async fn create_identity(&self, new: &NewIdentity) -> Result<Identity, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some((status, message)) = &self.reject {
                return Err(IdentityError::Rejected {
                    status: *status,
                    message: message.clone(),
                });
            }
            Ok(Identity {
                id: Uuid::new_v4(),
                email: new.email.clone(),
                user_metadata: serde_json::json!({ "full_name": new.full_name }),
            })
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        profiles: Mutex<Vec<NewProfile>>,
        roles: Mutex<Vec<NewRoleAssignment>>,
        fail_profile: bool,
        fail_role: bool,
    }

    #[async_trait]
    impl RegistrationStore for RecordingStore {
        async fn insert_profile(&self, profile: &NewProfile) -> anyhow::Result<()> {
            if self.fail_profile {
                anyhow::bail!("profile insert rejected");
            }
            self.profiles.lock().unwrap().push(profile.clone());
            Ok(())
        }

        async fn insert_role(&self, assignment: &NewRoleAssignment) -> anyhow::Result<()> {
            if self.fail_role {
                anyhow::bail!("role insert rejected");
            }
            self.roles.lock().unwrap().push(assignment.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn missing_fields_fail_before_any_network_call() {
        let identity = StubIdentity::default();
        let store = RecordingStore::default();
        for (email, password, full_name) in [
            ("", "secret1", "Ana Gómez"),
            ("a@x.com", "", "Ana Gómez"),
            ("a@x.com", "secret1", ""),
            ("", "", ""),
            ("   ", "secret1", "   "),
        ] {
            let err = register_user(&identity, &store, email, password, full_name)
                .await
                .unwrap_err();
            assert!(matches!(err, RegisterError::MissingFields));
        }
        assert_eq!(identity.calls.load(Ordering::SeqCst), 0);
        assert!(store.profiles.lock().unwrap().is_empty());
        assert!(store.roles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_email_is_rejected_locally() {
        let identity = StubIdentity::default();
        let store = RecordingStore::default();
        let err = register_user(&identity, &store, "not-an-email", "secret1", "Ana Gómez")
            .await
            .unwrap_err();
        assert!(matches!(err, RegisterError::InvalidEmail));
        assert_eq!(identity.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn identity_rejection_aborts_without_secondary_writes() {
        let identity = StubIdentity {
            reject: Some((422, "A user with this email address has already been registered".into())),
            ..Default::default()
        };
        let store = RecordingStore::default();
        let err = register_user(&identity, &store, "a@x.com", "secret1", "Ana Gómez")
            .await
            .unwrap_err();
        match err {
            RegisterError::Identity(IdentityError::Rejected { status, message }) => {
                assert_eq!(status, 422);
                assert!(message.contains("already been registered"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.profiles.lock().unwrap().is_empty());
        assert!(store.roles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_failure_is_downgraded_to_a_warning() {
        let identity = StubIdentity::default();
        let store = RecordingStore {
            fail_profile: true,
            ..Default::default()
        };
        let registration = register_user(&identity, &store, "a@x.com", "secret1", "Ana Gómez")
            .await
            .unwrap();
        assert_eq!(registration.warnings.len(), 1);
        assert_eq!(registration.warnings[0].step, SecondaryStep::Profile);
        // the role write is independent and still lands
        assert_eq!(store.roles.lock().unwrap().len(), 1);
        assert!(store.profiles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn role_failure_is_downgraded_to_a_warning() {
        let identity = StubIdentity::default();
        let store = RecordingStore {
            fail_role: true,
            ..Default::default()
        };
        let registration = register_user(&identity, &store, "a@x.com", "secret1", "Ana Gómez")
            .await
            .unwrap();
        assert_eq!(registration.warnings.len(), 1);
        assert_eq!(registration.warnings[0].step, SecondaryStep::Role);
        assert!(store.roles.lock().unwrap().is_empty());
        assert_eq!(store.profiles.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clean_registration_has_no_warnings() {
        let identity = StubIdentity::default();
        let store = RecordingStore::default();
        let registration = register_user(&identity, &store, "a@x.com", "secret1", "Ana Gómez")
            .await
            .unwrap();
        assert!(registration.warnings.is_empty());

        let profiles = store.profiles.lock().unwrap();
        let roles = store.roles.lock().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(roles.len(), 1);
        assert_eq!(profiles[0].id, registration.identity.id);
        assert_eq!(roles[0].user_id, registration.identity.id);
        assert_eq!(roles[0].role, Role::Student);
    }

    #[tokio::test]
    async fn email_is_trimmed_and_lowercased() {
        let identity = StubIdentity::default();
        let store = RecordingStore::default();
        let registration = register_user(&identity, &store, "  Ana@X.Com ", "secret1", "Ana Gómez")
            .await
            .unwrap();
        assert_eq!(registration.identity.email, "ana@x.com");
        assert_eq!(store.profiles.lock().unwrap()[0].email, "ana@x.com");
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a x@y.com"));
        assert!(!is_valid_email("@x.com"));
    }
}
