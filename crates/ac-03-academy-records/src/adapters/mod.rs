pub mod dispatch;

pub use dispatch::invoke;
