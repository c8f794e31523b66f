pub mod dispatcher;
pub mod error;
pub mod event;
pub mod fields;
pub mod registry;

pub use dispatcher::{
    handler::{ChangeHandler, HandlerResult},
    observer::{DispatchObserver, TracingObserver},
    BatchReport, Dispatcher,
};
pub use error::{DispatchError, EventError, RegistryError};
pub use event::{ChangeEvent, ChangeType, CommitHeader, EventContext, Operation};
pub use fields::{has_interesting_change, FieldSet};
pub use registry::HandlerRegistry;
