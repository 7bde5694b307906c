//! Observability subsystem
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Begin/complete scopes
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. The validation core never logs; callers log around it
//! 3. No async or background threads
//! 4. Deterministic field order
//!
//! # Usage
//!
//! ```ignore
//! use platecert::observability::{log_event_with_fields, Event, ObservationScope};
//!
//! let scope = ObservationScope::new("CERTIFY");
//! log_event_with_fields(Event::RuleSkipped, &[("rule", "position-in-bounds")]);
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
