pub mod assignment;
pub mod company;
pub mod employee;
pub mod notification;
pub mod project;
pub mod training;

// Re-export models for easier access
pub use assignment::*;
pub use company::*;
pub use employee::*;
pub use notification::*;
pub use project::*;
pub use training::*;
