pub mod event;
pub mod record;
pub mod reply;
pub mod user_state;

pub use event::{EventPayload, InboundEvent};
pub use record::InsertOperationRecord;
pub use reply::Reply;
pub use user_state::{CurrentOperation, OperationKind, UserState};
