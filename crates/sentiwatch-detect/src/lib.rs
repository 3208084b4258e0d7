//! The anomaly detection engine: decide, once per invocation, whether the
//! negative-sentiment share of recent activity is abnormal.
//!
//! Two ordered trigger policies, first match wins. The absolute policy is
//! the safety net — it needs no baseline and fires whenever the current
//! window's negative share crosses a fixed threshold. The relative-spike
//! policy only runs when the absolute one did not fire and the baseline
//! window actually has negative data to compare against.

mod engine;
mod notify;
mod policy;
mod window;

pub use engine::{run_detection, DetectError, DetectionConfig, DetectionOutcome};
pub use notify::{NotifyError, WebhookNotifier};
pub use policy::{absolute_trigger, alert_body, alert_subject, spike_trigger, AlertTrigger};
pub use window::DetectionWindows;
