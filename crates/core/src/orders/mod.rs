//! Orders

pub mod notes;
pub mod pricing;
pub mod status;
pub mod tracking;

pub use notes::{Note, NoteError, NoteKind, NoteLedger, TaggedNote};
pub use pricing::{LineItem, OrderTotals, PricingError, subtotal};
pub use status::{
    AppliedPatch, NotificationKind, OrderLifecycle, OrderStatus, PaymentStatus, StatusChange,
    StatusMachine, StatusPatch, TransitionError, TransitionPolicy, UnknownPolicy, UnknownStatus,
};
pub use tracking::TrackingInfo;
