//! ICS generation for exported events.

use chrono::{Duration, NaiveTime};
use icalendar::{Alarm, Calendar, Component, EventLike, Property, Trigger, ValueType};

use crate::event::CalendarEvent;

const PRODID: &str = "-//gitcal//EN";

/// Generate a VCALENDAR containing all `events`, in order.
pub fn generate_calendar(events: &[CalendarEvent]) -> String {
    let mut cal = Calendar::new();
    for event in events {
        cal.push(to_ics_event(event));
    }
    let cal = cal.done();

    strip_ics_bloat(&cal.to_string())
}

fn to_ics_event(event: &CalendarEvent) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.name);

    // DTSTAMP from the record's last update keeps reruns byte-identical
    let dtstamp = event
        .stamp
        .unwrap_or_else(|| event.start.and_time(NaiveTime::MIN).and_utc())
        .format("%Y%m%dT%H%M%SZ")
        .to_string();
    ics_event.add_property("DTSTAMP", &dtstamp);

    add_date_property(&mut ics_event, "DTSTART", event.start);
    add_date_property(&mut ics_event, "DTEND", event.end());

    ics_event.add_property("CATEGORIES", event.category.as_str());

    if !event.description.is_empty() {
        ics_event.description(&event.description);
    }

    ics_event.location(&event.location);

    if let Some(reminder) = event.reminder {
        let trigger = Trigger::before_start(Duration::days(i64::from(reminder.days)));
        let mut alarm = Alarm::display(&event.name, trigger);
        // icalendar writes the offset in seconds; keep it in days
        alarm.add_property("TRIGGER", format!("-P{}D", reminder.days));
        ics_event.alarm(alarm);
    }

    ics_event.done()
}

/// All-day dates carry VALUE=DATE
fn add_date_property(ics_event: &mut icalendar::Event, name: &str, date: chrono::NaiveDate) {
    let mut prop = Property::new(name, date.format("%Y%m%d").to_string());
    prop.append_parameter(ValueType::Date);
    ics_event.append_property(prop);
}

/// Our PRODID, no CALSCALE, and alarms without their own UID or DTSTAMP.
fn strip_ics_bloat(ics: &str) -> String {
    let mut out = String::with_capacity(ics.len());
    let mut in_alarm = false;

    for line in ics.lines() {
        match line {
            "BEGIN:VALARM" => in_alarm = true,
            "END:VALARM" => in_alarm = false,
            "CALSCALE:GREGORIAN" => continue,
            _ if line.starts_with("PRODID:") => {
                out.push_str("PRODID:");
                out.push_str(PRODID);
                out.push_str("\r\n");
                continue;
            }
            _ if in_alarm && (line.starts_with("UID:") || line.starts_with("DTSTAMP:")) => {
                continue;
            }
            _ => {}
        }

        out.push_str(line);
        out.push_str("\r\n");
    }

    out
}
