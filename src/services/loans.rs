//! Loan listings and the loan renewal workflow

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::{BookInstance, LoanedCopy},
        pagination::{PageRequest, Paginated},
        renewal::{RenewBookForm, RenewalPolicy, RenewalStep},
    },
    repository::Repository,
};

/// Result of submitting the renewal form
#[derive(Debug)]
pub enum RenewalOutcome {
    /// New due date saved
    Renewed(BookInstance),
    /// Submission rejected; nothing was saved
    Rejected(RenewalStep),
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    policy: RenewalPolicy,
}

impl LoansService {
    pub fn new(repository: Repository, policy: RenewalPolicy) -> Self {
        Self { repository, policy }
    }

    /// Copies on loan to one borrower, soonest due first
    pub async fn loaned_to(&self, user_id: i32, page: PageRequest) -> AppResult<Paginated<LoanedCopy>> {
        let (copies, total) = self.repository.book_instances.list_on_loan(Some(user_id), page).await?;
        Paginated::new(copies, total, page)
    }

    /// Every copy on loan, soonest due first
    pub async fn all_on_loan(&self, page: PageRequest) -> AppResult<Paginated<LoanedCopy>> {
        let (copies, total) = self.repository.book_instances.list_on_loan(None, page).await?;
        Paginated::new(copies, total, page)
    }

    /// Renewal form pre-filled with the proposed date. Read only.
    pub async fn renewal_form(&self, id: Uuid, today: NaiveDate) -> AppResult<RenewalStep> {
        let instance = self.repository.book_instances.get_by_id(id).await?;
        instance.check_invariants()?;
        Ok(RenewalStep::proposed(instance, self.policy.proposed_date(today)))
    }

    /// Validate a submitted renewal date and save it as the copy's new due date.
    /// Status and borrower are left as they are.
    pub async fn submit_renewal(
        &self,
        id: Uuid,
        form: RenewBookForm,
        today: NaiveDate,
    ) -> AppResult<RenewalOutcome> {
        let instance = self.repository.book_instances.get_by_id(id).await?;
        instance.check_invariants()?;

        match form.clean(today, self.policy) {
            Ok(renewal_date) => {
                let renewed = self.repository.book_instances.set_due_back(id, renewal_date).await?;
                tracing::info!("Renewed copy {} until {}", id, renewal_date);
                Ok(RenewalOutcome::Renewed(renewed))
            }
            Err(errors) => {
                tracing::debug!("Rejected renewal of copy {}: {:?}", id, form.renewal_date);
                Ok(RenewalOutcome::Rejected(RenewalStep::rejected(instance, form, errors)))
            }
        }
    }
}
