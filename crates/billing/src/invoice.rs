use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campuserp_core::{DomainError, DomainResult, StudentId};

/// Identifier of an invoice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(Uuid);

campuserp_core::impl_uuid_newtype!(InvoiceId, "InvoiceId");

/// Invoice status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Open,
    PartiallyPaid,
    Paid,
    Void,
}

/// A charge raised against a student.
///
/// Amounts are in the smallest currency unit. `amount_paid` is the running
/// total of accepted payments; status is derived from it whenever a payment
/// lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub student_id: StudentId,
    /// Human-facing reference, e.g. `"INV-2025-0042"`.
    pub reference: String,
    pub description: String,
    pub amount: u64,
    pub amount_paid: u64,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInvoice {
    pub student_id: StudentId,
    pub reference: String,
    pub description: String,
    pub amount: u64,
    pub due_date: NaiveDate,
}

impl Invoice {
    pub fn create(new: NewInvoice, now: DateTime<Utc>) -> DomainResult<Self> {
        let reference = new.reference.trim().to_uppercase();
        if reference.is_empty() {
            return Err(DomainError::validation("invoice reference cannot be empty"));
        }
        if new.amount == 0 {
            return Err(DomainError::validation("invoice amount must be positive"));
        }
        Ok(Self {
            id: InvoiceId::new(),
            student_id: new.student_id,
            reference,
            description: new.description.trim().to_string(),
            amount: new.amount,
            amount_paid: 0,
            due_date: new.due_date,
            status: InvoiceStatus::Open,
            created_at: now,
        })
    }

    pub fn outstanding(&self) -> u64 {
        self.amount.saturating_sub(self.amount_paid)
    }

    /// Cannot pay a void or settled invoice.
    pub fn can_accept_payment(&self) -> bool {
        self.status != InvoiceStatus::Void && self.outstanding() > 0
    }

    /// Apply a payment of `amount`, updating the running total and status.
    ///
    /// Rejects zero amounts, payments against void or settled invoices, and
    /// anything that would exceed the outstanding balance.
    pub fn register_payment(&mut self, amount: u64) -> DomainResult<()> {
        if !self.can_accept_payment() {
            return Err(DomainError::conflict(
                "cannot register payment on void or settled invoice",
            ));
        }
        if amount == 0 {
            return Err(DomainError::validation("payment amount must be positive"));
        }
        if amount > self.outstanding() {
            return Err(DomainError::validation(
                "payment exceeds outstanding balance",
            ));
        }
        self.amount_paid += amount;
        self.status = if self.amount_paid >= self.amount {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::PartiallyPaid
        };
        Ok(())
    }

    pub fn void(&mut self) -> DomainResult<()> {
        if self.status == InvoiceStatus::Void {
            return Err(DomainError::conflict("invoice is already void"));
        }
        if self.amount_paid > 0 {
            return Err(DomainError::conflict(
                "cannot void an invoice with recorded payments",
            ));
        }
        self.status = InvoiceStatus::Void;
        Ok(())
    }
}
