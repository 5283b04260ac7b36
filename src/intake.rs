//! Customer intake: store, re-sort, and tell the customer where they stand.

use tracing::info;

use crate::error::Result;
use crate::models::Customer;
use crate::notify::{announce_position, PositionNotifier, QueuePositionMessage};
use crate::sorter::CustomerSorter;
use crate::store::CustomerStore;

/// Outcome of a successful admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// Identifier of the admitted customer.
    pub id: String,
    /// 1-based position after re-sorting.
    pub position: usize,
    /// Queue length after admission.
    pub total: usize,
    /// Whether the position notice was accepted by the notifier.
    pub notified: bool,
}

/// Inserts a customer in sorted order and sends a position notice.
///
/// Storage errors (validation, I/O) are returned and nothing is sent.
/// A notification failure is logged and reflected in
/// [`Admission::notified`] only.
pub fn admit_customer<N>(
    store: &mut CustomerStore,
    sorter: &CustomerSorter,
    notifier: &N,
    customer: Customer,
) -> Result<Admission>
where
    N: PositionNotifier + ?Sized,
{
    let id = customer.id.clone();
    let email = customer.email.clone();
    let name = customer.name.clone();

    let position = store.insert_sorted(customer, sorter)?;
    let total = store.len();

    let message = QueuePositionMessage::new(email, name, position, total);
    let notified = announce_position(notifier, &message);
    info!(id = %id, position, total, notified, "admitted customer");

    Ok(Admission {
        id,
        position,
        total,
        notified,
    })
}
