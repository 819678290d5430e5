use std::io::{self, IsTerminal, Write};

use unicode_width::UnicodeWidthStr;

use crate::calendar::CalendarDay;
use crate::event::{Event, EventCategory};
use crate::filter::CategoryCounts;
use crate::layout::{DayLayout, TimeSlot};
use crate::stats::EventStats;
use crate::theme::{Palette, ResolvedTheme};

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    palette: Palette,
}

impl Renderer {
    pub fn new(color: bool, theme: ResolvedTheme) -> Self {
        Self {
            color: color && io::stdout().is_terminal(),
            palette: theme.palette(),
        }
    }

    #[tracing::instrument(skip_all, fields(day = %layout.day))]
    pub fn print_day_layout<W: Write>(
        &self,
        out: &mut W,
        layout: &DayLayout,
        events: &[Event],
    ) -> anyhow::Result<()> {
        if layout.is_empty() {
            writeln!(out, "No events on {}.", layout.day)?;
            return Ok(());
        }

        let headers = ["ID", "Time", "Col", "Top", "Height", "Left", "Width", "Title"]
            .map(str::to_string)
            .to_vec();

        let mut rows = Vec::with_capacity(layout.items.len());
        for item in &layout.items {
            let event = events.iter().find(|event| event.id == item.id);
            let time = event
                .map(|e| format!("{}-{}", e.start.format("%H:%M"), e.end.format("%H:%M")))
                .unwrap_or_default();
            let title = event.map(|e| e.title.clone()).unwrap_or_default();
            let time = match event {
                Some(e) if e.is_malformed() => self.paint(&time, self.palette.malformed),
                _ => time,
            };

            rows.push(vec![
                self.paint(&item.id, self.palette.id),
                time,
                format!("{}/{}", item.column + 1, item.total_columns),
                format!("{:.0}", item.top),
                format!("{:.0}", item.height),
                format!("{:.0}%", item.left_fraction * 100.0),
                format!("{:.0}%", item.width_fraction * 100.0),
                title,
            ]);
        }

        write_table(out, headers, rows)
    }

    pub fn print_slots<W: Write>(&self, out: &mut W, slots: &[TimeSlot]) -> anyhow::Result<()> {
        for slot in slots {
            if slot.is_hour_start() {
                writeln!(out, "{:>8} |", slot.label)?;
            } else {
                writeln!(out, "{:>8} .", "")?;
            }
        }
        Ok(())
    }

    pub fn print_month<W: Write>(&self, out: &mut W, days: &[CalendarDay]) -> anyhow::Result<()> {
        let headers = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
            .map(str::to_string)
            .to_vec();

        let rows = days
            .chunks(7)
            .map(|week| {
                week.iter()
                    .map(|day| {
                        let mut cell = day.date.format("%e").to_string();
                        if !day.events.is_empty() {
                            cell.push_str(&format!(" ({})", day.events.len()));
                        }
                        if day.is_today {
                            self.paint(&cell, self.palette.today)
                        } else if !day.is_current_month {
                            self.paint(&cell, self.palette.muted)
                        } else {
                            cell
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        write_table(out, headers, rows)
    }

    pub fn print_stats<W: Write>(
        &self,
        out: &mut W,
        stats: &EventStats,
        counts: &CategoryCounts,
    ) -> anyhow::Result<()> {
        writeln!(out, "total     {}", stats.total)?;
        writeln!(out, "today     {}", stats.today)?;
        writeln!(out, "upcoming  {}", stats.upcoming)?;
        writeln!(out, "hours     {}", stats.total_hours)?;
        writeln!(out)?;
        writeln!(out, "{:<9} {}", "all", counts.all)?;
        for category in EventCategory::ALL {
            writeln!(out, "{:<9} {}", category.as_key(), counts.get(category))?;
        }
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    writer: &mut W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    let line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(header, *width))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{}", line.trim_end())?;

    let rule = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{rule}")?;

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line.trim_end())?;
    }

    Ok(())
}

fn pad(cell: &str, width: usize) -> String {
    let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
    format!("{cell}{}", " ".repeat(width.saturating_sub(visible_width)))
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Renderer, strip_ansi, write_table};
    use crate::calendar::month_grid;
    use crate::config::DayTimeRange;
    use crate::event::{Event, EventCategory};
    use crate::layout::{layout_day, time_slots};
    use crate::theme::ResolvedTheme;

    fn plain() -> Renderer {
        Renderer {
            color: false,
            palette: ResolvedTheme::Light.palette(),
        }
    }

    fn colored(theme: ResolvedTheme) -> Renderer {
        Renderer {
            color: true,
            palette: theme.palette(),
        }
    }

    #[test]
    fn strip_ansi_removes_escape_sequences() {
        assert_eq!(strip_ansi("\x1b[33mevent-1\x1b[0m"), "event-1");
    }

    #[test]
    fn table_pads_wide_characters_by_display_width() {
        let mut out = Vec::new();
        write_table(
            &mut out,
            vec!["Title".to_string(), "Col".to_string()],
            vec![
                vec!["会議".to_string(), "1/2".to_string()],
                vec!["Standup".to_string(), "2/2".to_string()],
            ],
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Title   Col");
        assert_eq!(lines[2], "会議    1/2");
        assert_eq!(lines[3], "Standup 2/2");
    }

    #[test]
    fn day_layout_table_lists_every_event() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let events = vec![
            Event {
                id: "overlap-1".to_string(),
                title: "Morning Meeting".to_string(),
                description: None,
                start: day.and_hms_opt(9, 0, 0).unwrap(),
                end: day.and_hms_opt(10, 0, 0).unwrap(),
                color: "#0ea5e9".to_string(),
                category: EventCategory::Meeting,
            },
            Event {
                id: "overlap-2".to_string(),
                title: "Design Review".to_string(),
                description: None,
                start: day.and_hms_opt(9, 30, 0).unwrap(),
                end: day.and_hms_opt(11, 0, 0).unwrap(),
                color: "#8b5cf6".to_string(),
                category: EventCategory::Work,
            },
        ];
        let layout = layout_day(day, &events, &DayTimeRange::default()).unwrap();

        let mut out = Vec::new();
        plain()
            .print_day_layout(&mut out, &layout, &events)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("09:30-11:00"));
        assert!(text.contains("2/2"));
        assert!(text.contains("Design Review"));
    }

    #[test]
    fn slots_label_only_full_hours() {
        let range = DayTimeRange {
            start_hour: 9,
            end_hour: 10,
            ..DayTimeRange::default()
        };
        let mut out = Vec::new();
        plain()
            .print_slots(&mut out, &time_slots(&range))
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "    9 AM |\n         .\n");
    }

    #[test]
    fn today_highlight_follows_theme() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let days = month_grid(day, day, &[]);

        let mut light = Vec::new();
        colored(ResolvedTheme::Light)
            .print_month(&mut light, &days)
            .unwrap();
        let mut dark = Vec::new();
        colored(ResolvedTheme::Dark)
            .print_month(&mut dark, &days)
            .unwrap();

        let light = String::from_utf8(light).unwrap();
        let dark = String::from_utf8(dark).unwrap();
        assert!(light.contains("\x1b[1;34m10\x1b[0m"));
        assert!(dark.contains("\x1b[1;36m10\x1b[0m"));
        assert_eq!(strip_ansi(&light), strip_ansi(&dark));
    }
}
