mod quote;
mod route;
mod vehicle;

pub use quote::{Quote, QuoteRequest};
pub use route::{RouteEstimate, TripSource};
pub use vehicle::VehicleSummary;
