// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod invoice;
pub mod navigation;
pub mod repositories;
pub mod sales_target;
pub mod user;
