pub mod assignment;
pub mod company;
mod db;
pub mod employee;
pub mod notification;
pub mod project;
pub mod testing;
pub mod training;

pub use db::*;
