//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::LoanStatus;
use crate::error::{AppError, AppResult};

/// A loanable copy of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: String,
    /// Only meaningful while the copy is on loan
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    /// Set only while the copy is on loan
    pub borrower_id: Option<i32>,
}

impl BookInstance {
    pub fn is_on_loan(&self) -> bool {
        self.status == LoanStatus::OnLoan
    }

    /// A borrower may only be recorded on a copy that is on loan
    pub fn check_invariants(&self) -> AppResult<()> {
        if self.borrower_id.is_some() && !self.is_on_loan() {
            return Err(AppError::Validation(format!(
                "Copy {} has a borrower but its status is '{}'",
                self.id, self.status
            )));
        }
        Ok(())
    }
}

/// Copy on loan, joined with its book and borrower for loan listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanedCopy {
    pub id: Uuid,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub book_id: i32,
    pub book_title: String,
    pub borrower_id: Option<i32>,
    pub borrower_username: Option<String>,
    pub is_overdue: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(status: LoanStatus, borrower_id: Option<i32>) -> BookInstance {
        BookInstance {
            id: Uuid::new_v4(),
            book_id: 1,
            imprint: "Ace, 1990".to_string(),
            due_back: NaiveDate::from_ymd_opt(2024, 1, 10),
            status,
            borrower_id,
        }
    }

    #[test]
    fn test_borrower_requires_loan() {
        assert!(instance(LoanStatus::OnLoan, Some(3)).check_invariants().is_ok());
        assert!(instance(LoanStatus::OnLoan, None).check_invariants().is_ok());
        assert!(instance(LoanStatus::Available, None).check_invariants().is_ok());

        for status in [LoanStatus::Available, LoanStatus::Maintenance, LoanStatus::Reserved] {
            assert!(instance(status, Some(3)).check_invariants().is_err());
        }
    }
}
