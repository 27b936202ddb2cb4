//! Directive and argument names understood by the dashboard.

/// Open the customers view, optionally filtered by days since last order.
pub const SHOW_CUSTOMERS: &str = "show_customers";

/// Open the email preview modal.
pub const SEND_EMAILS: &str = "send_emails";

/// Numeric "days since last order" filter carried by [`SHOW_CUSTOMERS`].
pub const DAYS_AGO_ARG: &str = "daysAgo";
