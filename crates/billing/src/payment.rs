use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campuserp_core::{DomainError, DomainResult};

use crate::invoice::InvoiceId;

/// Identifier of a payment row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

campuserp_core::impl_uuid_newtype!(PaymentId, "PaymentId");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Card,
}

/// A payment received against one invoice.
///
/// The invoice itself is the source of truth for balances; the store applies
/// `Invoice::register_payment` and appends this record in the same step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub invoice_id: InvoiceId,
    pub amount: u64,
    pub method: PaymentMethod,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPayment {
    pub invoice_id: InvoiceId,
    pub amount: u64,
    pub method: PaymentMethod,
}

impl Payment {
    pub fn record(new: NewPayment, now: DateTime<Utc>) -> DomainResult<Self> {
        if new.amount == 0 {
            return Err(DomainError::validation("payment amount must be positive"));
        }
        Ok(Self {
            id: PaymentId::new(),
            invoice_id: new.invoice_id,
            amount: new.amount,
            method: new.method,
            received_at: now,
        })
    }
}
