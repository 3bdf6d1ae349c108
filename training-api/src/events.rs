//! Employee lifecycle events and the writer that turns them into
//! notifications.
//!
//! Workflows return the events they produced. Whoever owns the connection
//! publishes them once the write they describe has succeeded.

use chrono::{Local, NaiveDateTime};
use diesel::sqlite::SqliteConnection;

use crate::models::{Employee, Notification};
use crate::orm::notification::insert_notification;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeEvent {
    Registered { employee_id: i32, fullname: String },
    Accepted { employee_id: i32, fullname: String },
}

impl EmployeeEvent {
    pub fn registered(employee: &Employee) -> Self {
        EmployeeEvent::Registered {
            employee_id: employee.id,
            fullname: employee.fullname.clone(),
        }
    }

    pub fn accepted(employee: &Employee) -> Self {
        EmployeeEvent::Accepted {
            employee_id: employee.id,
            fullname: employee.fullname.clone(),
        }
    }

    pub fn employee_id(&self) -> i32 {
        match self {
            EmployeeEvent::Registered { employee_id, .. }
            | EmployeeEvent::Accepted { employee_id, .. } => *employee_id,
        }
    }

    pub fn message(&self) -> String {
        match self {
            EmployeeEvent::Registered { fullname, .. } => {
                format!("New employee registered: {}", fullname)
            }
            EmployeeEvent::Accepted { fullname, .. } => format!("Employee accepted: {}", fullname),
        }
    }
}

/// Consumer of employee events.
pub trait NotificationSink {
    fn publish(&mut self, event: &EmployeeEvent) -> Result<Notification, diesel::result::Error>;
}

/// Appends one row to `notifications` per event.
pub struct NotificationWriter<'a> {
    conn: &'a mut SqliteConnection,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl<'a> NotificationWriter<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        NotificationWriter { conn, clock: local_now }
    }

    /// Uses `clock` instead of the local wall clock for timestamps.
    pub fn with_clock(conn: &'a mut SqliteConnection, clock: fn() -> NaiveDateTime) -> Self {
        NotificationWriter { conn, clock }
    }

    /// Publishes every event in order, stopping at the first failure.
    pub fn publish_all(
        &mut self,
        events: &[EmployeeEvent],
    ) -> Result<Vec<Notification>, diesel::result::Error> {
        events.iter().map(|event| self.publish(event)).collect()
    }
}

impl NotificationSink for NotificationWriter<'_> {
    fn publish(&mut self, event: &EmployeeEvent) -> Result<Notification, diesel::result::Error> {
        let notification = insert_notification(self.conn, event.message(), (self.clock)())?;
        info!(
            "Notification {} for employee {}: {}",
            notification.id,
            event.employee_id(),
            notification.message
        );
        Ok(notification)
    }
}
