pub mod clock;
pub mod host;
pub mod notifier;
