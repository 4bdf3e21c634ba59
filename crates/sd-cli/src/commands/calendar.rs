use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use sd_calendar::{navigate, DayBucket, Direction, MonthCell, MonthView, ViewMode};
use sd_schemas::Appointment;

use super::{print_json, Session};

pub fn parse_view_mode(s: &str) -> Result<ViewMode, String> {
    ViewMode::parse(s).ok_or_else(|| format!("expected month | week | day, got '{s}'"))
}

pub fn parse_direction(s: &str) -> Result<Direction, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "prev" | "previous" => Ok(Direction::Prev),
        "next" => Ok(Direction::Next),
        other => Err(format!("expected prev | next, got '{other}'")),
    }
}

pub fn show(
    session: &Session,
    mode: ViewMode,
    date: Option<NaiveDate>,
    nav: Option<Direction>,
    json: bool,
) -> Result<()> {
    let today = session.calendar.today(session.now);
    let base = date.unwrap_or(today);
    let reference = nav.map_or(base, |dir| navigate(base, mode, dir));
    let appts = session.store.appointments();
    let tz = session.calendar.tz();

    match mode {
        ViewMode::Month => {
            let view = session
                .calendar
                .month_view(appts, reference.year(), reference.month(), today)
                .ok_or_else(|| anyhow!("date {reference} is out of range"))?;
            if json {
                return print_json(&view);
            }
            print!("{}", render_month(&view, tz));
        }
        ViewMode::Week => {
            let view = session.calendar.week_view(appts, reference, today);
            if json {
                return print_json(&view);
            }
            println!("{}", view.title);
            for day in &view.days {
                print!("{}", render_day(day, tz));
            }
        }
        ViewMode::Day => {
            let view = session.calendar.day_view(appts, reference, today);
            if json {
                return print_json(&view);
            }
            println!("{}", view.title);
            print!("{}", render_day(&view.day, tz));
        }
    }
    Ok(())
}

pub fn upcoming(session: &Session, limit: Option<usize>, json: bool) -> Result<()> {
    let settings = &session.config.calendar;
    let list = sd_calendar::upcoming(
        session.store.appointments(),
        session.now,
        settings.upcoming_days,
        Some(limit.unwrap_or(settings.upcoming_limit)),
    );
    if json {
        return print_json(&list);
    }

    if list.is_empty() {
        println!("No shoots in the next {} days.", settings.upcoming_days);
        return Ok(());
    }
    let tz = session.calendar.tz();
    for a in &list {
        let local = a.date.with_timezone(&tz);
        println!(
            "{}  {}",
            local.format("%a %d %b %H:%M"),
            describe(a)
        );
    }
    Ok(())
}

fn describe(a: &Appointment) -> String {
    if a.location.is_empty() {
        format!("{} [{}]", a.title, a.kind.label())
    } else {
        format!("{} [{}] @ {}", a.title, a.kind.label(), a.location)
    }
}

/// Text grid, one 5-wide column per weekday. `*` marks days with shoots;
/// today is bracketed. Shoots are listed under the grid.
pub fn render_month(view: &MonthView, tz: Tz) -> String {
    let mut out = format!("{}\n", view.title);
    out.push_str("  Sun  Mon  Tue  Wed  Thu  Fri  Sat\n");

    for row in view.rows() {
        let line: String = row
            .iter()
            .map(|cell| match cell {
                MonthCell::Blank => "     ".to_string(),
                MonthCell::Day(d) => {
                    let n = d.date.day();
                    let mark = if d.appointments.is_empty() { ' ' } else { '*' };
                    if d.is_today {
                        format!("{}[{n:>2}]", if mark == '*' { "*" } else { " " })
                    } else {
                        format!("  {n:>2}{mark}")
                    }
                }
            })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }

    for day in view.days().filter(|d| !d.appointments.is_empty()) {
        for a in &day.appointments {
            out.push_str(&format!(
                "{:>2} {}  {}\n",
                day.date.day(),
                a.date.with_timezone(&tz).format("%H:%M"),
                describe(a)
            ));
        }
    }
    out
}

fn render_day(day: &DayBucket, tz: Tz) -> String {
    let marker = if day.is_today { " (today)" } else { "" };
    let mut out = format!("{}{}\n", day.date.format("%a %d %b"), marker);
    if day.appointments.is_empty() {
        out.push_str("  -\n");
    }
    for a in &day.appointments {
        out.push_str(&format!(
            "  {}  {}\n",
            a.date.with_timezone(&tz).format("%H:%M"),
            describe(a)
        ));
    }
    out
}
