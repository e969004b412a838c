//! Application lifecycle domain service.
//!
//! Implements the driving ports for submitting, listing, and deciding
//! applications. The decision guard is a [`DecisionPolicy`] injected at
//! construction so the "may an admin re-decide" question is a deployment
//! choice, not an accident of missing validation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::domain::application::{Application, DecisionPolicy};
use crate::domain::ports::{
    ApplicationPersistenceError, ApplicationRepository, ApplicationsCommand, ApplicationsQuery,
    DecideApplication, SubmitApplication,
};
use crate::domain::user::UserId;
use crate::domain::Error;

/// Application lifecycle service implementing the driving ports.
#[derive(Clone)]
pub struct ApplicationService<R> {
    repo: Arc<R>,
    policy: DecisionPolicy,
}

impl<R> ApplicationService<R> {
    /// Create a new service over the given repository and decision policy.
    pub fn new(repo: Arc<R>, policy: DecisionPolicy) -> Self {
        Self { repo, policy }
    }
}

fn map_persistence_error(error: ApplicationPersistenceError) -> Error {
    match error {
        ApplicationPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("application repository unavailable: {message}"))
        }
        ApplicationPersistenceError::Query { message } => {
            Error::internal(format!("application repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> ApplicationsCommand for ApplicationService<R>
where
    R: ApplicationRepository,
{
    async fn submit(&self, request: SubmitApplication) -> Result<Application, Error> {
        let application = Application::submit(request.form, request.submitted_by, Utc::now());
        self.repo
            .insert(&application)
            .await
            .map_err(map_persistence_error)?;
        Ok(application)
    }

    async fn decide(&self, request: DecideApplication) -> Result<Application, Error> {
        let current = self
            .repo
            .find_by_id(&request.application_id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("Application not found"))?;

        if !self.policy.permits(current.status()) {
            return Err(Error::conflict(format!(
                "application is already {}",
                current.status()
            ))
            .with_details(json!({ "currentStatus": current.status().as_str() })));
        }

        self.repo
            .apply_decision(&request.application_id, request.decision)
            .await
            .map_err(map_persistence_error)?
            // The record can vanish between the read and the write; the
            // caller sees the same outcome as an unknown identifier.
            .ok_or_else(|| Error::not_found("Application not found"))
    }
}

#[async_trait]
impl<R> ApplicationsQuery for ApplicationService<R>
where
    R: ApplicationRepository,
{
    async fn list(&self, submitted_by: Option<UserId>) -> Result<Vec<Application>, Error> {
        self.repo
            .list(submitted_by)
            .await
            .map_err(map_persistence_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::application::{
        ApplicationForm, ApplicationId, ApplicationStatus, Decision, ServiceCategory,
    };
    use crate::domain::ports::MockApplicationRepository;
    use crate::domain::user::Gender;
    use crate::domain::ErrorCode;

    fn sample_form() -> ApplicationForm {
        ApplicationForm {
            full_name: "Asha Roy".to_owned(),
            age: 30,
            contact_number: "9000000000".to_owned(),
            gender: Gender::Female,
            district: "Kamrup".to_owned(),
            revenue_circle: "X".to_owned(),
            category: ServiceCategory::Education,
            village_ward: "Ward".to_owned(),
            remarks: None,
            document_url: None,
        }
    }

    fn stored(status: ApplicationStatus) -> Application {
        Application::restore(
            ApplicationId::random(),
            sample_form(),
            status,
            Some(UserId::random()),
            Utc::now(),
        )
    }

    fn make_service(
        repo: MockApplicationRepository,
        policy: DecisionPolicy,
    ) -> ApplicationService<MockApplicationRepository> {
        ApplicationService::new(Arc::new(repo), policy)
    }

    #[tokio::test]
    async fn submit_persists_a_pending_application() {
        let mut repo = MockApplicationRepository::new();
        repo.expect_insert()
            .withf(|application: &Application| {
                application.status() == ApplicationStatus::Pending
            })
            .times(1)
            .return_once(|_| Ok(()));

        let service = make_service(repo, DecisionPolicy::default());
        let request = SubmitApplication {
            form: sample_form(),
            submitted_by: Some(UserId::random()),
        };

        let stored_record = service.submit(request).await.expect("submit succeeds");
        assert_eq!(stored_record.status(), ApplicationStatus::Pending);
        assert_eq!(stored_record.full_name(), "Asha Roy");
    }

    #[tokio::test]
    async fn submit_surfaces_connection_failures_as_service_unavailable() {
        let mut repo = MockApplicationRepository::new();
        repo.expect_insert()
            .times(1)
            .return_once(|_| Err(ApplicationPersistenceError::connection("refused")));

        let service = make_service(repo, DecisionPolicy::default());
        let request = SubmitApplication {
            form: sample_form(),
            submitted_by: Some(UserId::random()),
        };

        let error = service.submit(request).await.expect_err("unavailable");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn decide_unknown_application_is_not_found_and_writes_nothing() {
        let mut repo = MockApplicationRepository::new();
        repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
        repo.expect_apply_decision().times(0);

        let service = make_service(repo, DecisionPolicy::default());
        let request = DecideApplication {
            application_id: ApplicationId::random(),
            decision: Decision::Approved,
        };

        let error = service.decide(request).await.expect_err("not found");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn decide_moves_a_pending_application_to_the_target_status() {
        let pending = stored(ApplicationStatus::Pending);
        let id = *pending.id();
        let mut decided = pending.clone();
        decided.decide(Decision::Approved);

        let mut repo = MockApplicationRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(pending)));
        repo.expect_apply_decision()
            .withf(move |candidate, decision| {
                *candidate == id && *decision == Decision::Approved
            })
            .times(1)
            .return_once(move |_, _| Ok(Some(decided)));

        let service = make_service(repo, DecisionPolicy::default());
        let request = DecideApplication {
            application_id: id,
            decision: Decision::Approved,
        };

        let updated = service.decide(request).await.expect("decide succeeds");
        assert_eq!(updated.status(), ApplicationStatus::Approved);
    }

    #[tokio::test]
    async fn guarded_policy_rejects_a_second_decision() {
        let approved = stored(ApplicationStatus::Approved);
        let id = *approved.id();

        let mut repo = MockApplicationRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(approved)));
        repo.expect_apply_decision().times(0);

        let service = make_service(repo, DecisionPolicy::PendingOnly);
        let request = DecideApplication {
            application_id: id,
            decision: Decision::Rejected,
        };

        let error = service.decide(request).await.expect_err("conflict");
        assert_eq!(error.code(), ErrorCode::Conflict);
        let details = error.details().expect("details present");
        assert_eq!(details["currentStatus"], "Approved");
    }

    #[tokio::test]
    async fn override_policy_allows_re_deciding() {
        let approved = stored(ApplicationStatus::Approved);
        let id = *approved.id();
        let mut re_decided = approved.clone();
        re_decided.decide(Decision::Rejected);

        let mut repo = MockApplicationRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(approved)));
        repo.expect_apply_decision()
            .times(1)
            .return_once(move |_, _| Ok(Some(re_decided)));

        let service = make_service(repo, DecisionPolicy::AllowOverride);
        let request = DecideApplication {
            application_id: id,
            decision: Decision::Rejected,
        };

        let updated = service.decide(request).await.expect("override succeeds");
        assert_eq!(updated.status(), ApplicationStatus::Rejected);
    }

    #[tokio::test]
    async fn list_passes_the_owner_filter_through() {
        let owner = UserId::random();
        let mine = Application::restore(
            ApplicationId::random(),
            sample_form(),
            ApplicationStatus::Pending,
            Some(owner),
            Utc::now(),
        );

        let mut repo = MockApplicationRepository::new();
        repo.expect_list()
            .withf(move |filter| *filter == Some(owner))
            .times(1)
            .return_once(move |_| Ok(vec![mine]));

        let service = make_service(repo, DecisionPolicy::default());
        let listed = service.list(Some(owner)).await.expect("list succeeds");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].submitted_by(), Some(owner));
    }
}
