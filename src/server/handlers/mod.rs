pub mod coupons;
pub mod quotes;
pub mod routes;
pub mod vehicles;
