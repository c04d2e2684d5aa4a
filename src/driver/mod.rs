pub mod ms56xx;
pub mod settle;
