//! Billing: student invoices and payments against them.

pub mod invoice;
pub mod payment;

pub use invoice::{Invoice, InvoiceId, InvoiceStatus, NewInvoice};
pub use payment::{NewPayment, Payment, PaymentId, PaymentMethod};
