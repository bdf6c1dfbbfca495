// Sales target domain module
// Target periods, the target aggregate, its events and the service that
// reconciles targets against paid invoices

#![allow(clippy::module_inception)]

pub mod errors;
pub mod events;
pub mod sales_target;
pub mod service;
pub mod value_objects;

pub use errors::{SalesTargetError, SalesTargetResult};
pub use events::{EventPublisher, SalesTargetEvent};
pub use sales_target::{SalesTarget, SalesTargetInput, SalesTargetWithUser};
pub use service::{ChartPoint, SalesTargetService};
pub use value_objects::{DateRange, PeriodError, TargetPeriod, TargetType};
