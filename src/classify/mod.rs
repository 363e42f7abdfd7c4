// src/classify/mod.rs

use crate::process::csv::RawRecord;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A record that carries a parsed date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub date: NaiveDate,
    pub record: RawRecord,
}

impl Event {
    pub fn new(date: NaiveDate, record: RawRecord) -> Self {
        Self { date, record }
    }
}

/// Temporal bucket an event is shown under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bucket {
    Today,
    ThisWeek,
    NextWeek,
    Future,
    Past,
}

impl Bucket {
    /// Display order.
    pub const ALL: [Bucket; 5] = [
        Bucket::Today,
        Bucket::ThisWeek,
        Bucket::NextWeek,
        Bucket::Future,
        Bucket::Past,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Today => "today",
            Bucket::ThisWeek => "this_week",
            Bucket::NextWeek => "next_week",
            Bucket::Future => "future",
            Bucket::Past => "past",
        }
    }
}

/// Which weekday a week starts on. The week ends the day before.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    /// Days from `date` to the last day of its week (0 when `date` is that day).
    pub fn days_until_week_end(self, date: NaiveDate) -> u64 {
        let into_week = match self {
            WeekStart::Monday => date.weekday().num_days_from_monday(),
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        };
        u64::from(6 - into_week)
    }
}

/// Day boundaries for one classification pass. All ends are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeekBounds {
    pub today: NaiveDate,
    pub end_of_week: NaiveDate,
    pub start_of_next_week: NaiveDate,
    pub end_of_next_week: NaiveDate,
}

impl WeekBounds {
    /// Boundaries past the last representable date clamp to `NaiveDate::MAX`.
    pub fn new(today: NaiveDate, week_start: WeekStart) -> Self {
        let end_of_week = add_days(today, week_start.days_until_week_end(today));
        let start_of_next_week = add_days(end_of_week, 1);
        let end_of_next_week = add_days(start_of_next_week, 6);
        Self {
            today,
            end_of_week,
            start_of_next_week,
            end_of_next_week,
        }
    }

    /// First matching rule wins.
    pub fn bucket_for(&self, date: NaiveDate) -> Bucket {
        if date == self.today {
            Bucket::Today
        } else if date > self.today && date <= self.end_of_week {
            Bucket::ThisWeek
        } else if date >= self.start_of_next_week && date <= self.end_of_next_week {
            Bucket::NextWeek
        } else if date > self.end_of_next_week {
            Bucket::Future
        } else {
            Bucket::Past
        }
    }
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassifyOptions {
    pub week_start: WeekStart,
    /// Maximum number of past events kept, most recent first.
    pub past_limit: usize,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Monday,
            past_limit: 3,
        }
    }
}

/// Events partitioned into buckets, each in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agenda {
    bounds: WeekBounds,
    today: Vec<Event>,
    this_week: Vec<Event>,
    next_week: Vec<Event>,
    future: Vec<Event>,
    past: Vec<Event>,
}

impl Agenda {
    pub fn bounds(&self) -> &WeekBounds {
        &self.bounds
    }

    pub fn bucket(&self, bucket: Bucket) -> &[Event] {
        match bucket {
            Bucket::Today => &self.today,
            Bucket::ThisWeek => &self.this_week,
            Bucket::NextWeek => &self.next_week,
            Bucket::Future => &self.future,
            Bucket::Past => &self.past,
        }
    }

    /// Whether anything is scheduled today; drives the "nothing today" placeholder.
    pub fn has_today(&self) -> bool {
        !self.today.is_empty()
    }

    /// Total events shown across all buckets.
    pub fn len(&self) -> usize {
        Bucket::ALL.iter().map(|b| self.bucket(*b).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `events` relative to `today`.
///
/// Upcoming buckets are ascending by date; ties keep input order. Past is
/// descending and capped at `options.past_limit`.
pub fn classify(mut events: Vec<Event>, today: NaiveDate, options: &ClassifyOptions) -> Agenda {
    let bounds = WeekBounds::new(today, options.week_start);
    events.sort_by_key(|e| e.date);

    let mut past: Vec<Event> = events.iter().filter(|e| e.date < today).cloned().collect();
    past.sort_by(|a, b| b.date.cmp(&a.date));
    past.truncate(options.past_limit);

    let mut agenda = Agenda {
        bounds,
        today: Vec::new(),
        this_week: Vec::new(),
        next_week: Vec::new(),
        future: Vec::new(),
        past,
    };

    for event in events {
        match bounds.bucket_for(event.date) {
            Bucket::Today => agenda.today.push(event),
            Bucket::ThisWeek => agenda.this_week.push(event),
            Bucket::NextWeek => agenda.next_week.push(event),
            Bucket::Future => agenda.future.push(event),
            Bucket::Past => {}
        }
    }

    debug!(
        today = agenda.today.len(),
        this_week = agenda.this_week.len(),
        next_week = agenda.next_week.len(),
        future = agenda.future.len(),
        past = agenda.past.len(),
        "classified events"
    );
    agenda
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ev(date: NaiveDate, title: &str) -> Event {
        let mut fields = BTreeMap::new();
        fields.insert("Titulo".to_string(), title.to_string());
        Event::new(date, RawRecord::new(0, fields))
    }

    fn titles(events: &[Event]) -> Vec<&str> {
        events
            .iter()
            .map(|e| e.record.get("Titulo").unwrap())
            .collect()
    }

    // a Wednesday
    fn wed() -> NaiveDate {
        d(2024, 6, 12)
    }

    #[test]
    fn reference_week_is_bucketed() {
        let bounds = WeekBounds::new(wed(), WeekStart::Monday);
        assert_eq!(bounds.end_of_week, d(2024, 6, 16));
        assert_eq!(bounds.start_of_next_week, d(2024, 6, 17));
        assert_eq!(bounds.end_of_next_week, d(2024, 6, 23));

        assert_eq!(bounds.bucket_for(d(2024, 6, 12)), Bucket::Today);
        assert_eq!(bounds.bucket_for(d(2024, 6, 16)), Bucket::ThisWeek);
        assert_eq!(bounds.bucket_for(d(2024, 6, 17)), Bucket::NextWeek);
        assert_eq!(bounds.bucket_for(d(2024, 6, 23)), Bucket::NextWeek);
        assert_eq!(bounds.bucket_for(d(2024, 6, 24)), Bucket::Future);
        assert_eq!(bounds.bucket_for(d(2024, 7, 1)), Bucket::Future);
        assert_eq!(bounds.bucket_for(d(2024, 6, 1)), Bucket::Past);
        assert_eq!(bounds.bucket_for(d(2024, 6, 11)), Bucket::Past);
    }

    #[test]
    fn bounds_clamp_at_last_date() {
        let today = NaiveDate::MAX.checked_sub_days(Days::new(2)).unwrap();
        let bounds = WeekBounds::new(today, WeekStart::Monday);
        assert!(bounds.end_of_week >= today);
        assert_eq!(bounds.end_of_next_week, NaiveDate::MAX);

        assert_eq!(bounds.bucket_for(today), Bucket::Today);
        assert_eq!(bounds.bucket_for(NaiveDate::MAX - Days::new(5)), Bucket::Past);

        let agenda = classify(
            vec![ev(today, "hoy"), ev(NaiveDate::MAX, "fin")],
            today,
            &ClassifyOptions::default(),
        );
        assert_eq!(titles(agenda.bucket(Bucket::Today)), vec!["hoy"]);
        assert_eq!(agenda.len(), 2);
    }

    #[test]
    fn sunday_ends_its_own_week() {
        let sunday = d(2024, 6, 16);
        let bounds = WeekBounds::new(sunday, WeekStart::Monday);
        assert_eq!(bounds.end_of_week, sunday);
        assert_eq!(bounds.bucket_for(d(2024, 6, 17)), Bucket::NextWeek);
        assert_eq!(bounds.end_of_next_week, d(2024, 6, 23));
    }

    #[test]
    fn sunday_start_week_ends_saturday() {
        let bounds = WeekBounds::new(wed(), WeekStart::Sunday);
        assert_eq!(bounds.end_of_week, d(2024, 6, 15));
        assert_eq!(bounds.bucket_for(d(2024, 6, 16)), Bucket::NextWeek);
        assert_eq!(bounds.end_of_next_week, d(2024, 6, 22));
    }

    #[test]
    fn every_date_lands_in_exactly_one_bucket() {
        let agenda_day = wed();
        let events: Vec<Event> = (-40i64..60)
            .map(|offset| {
                let date = agenda_day + chrono::Duration::days(offset);
                ev(date, &offset.to_string())
            })
            .collect();
        let options = ClassifyOptions {
            past_limit: usize::MAX,
            ..Default::default()
        };
        let agenda = classify(events.clone(), agenda_day, &options);
        assert_eq!(agenda.len(), events.len());

        for event in &events {
            let hits = Bucket::ALL
                .iter()
                .filter(|b| agenda.bucket(**b).contains(event))
                .count();
            assert_eq!(hits, 1, "event on {} found {} times", event.date, hits);
        }
    }

    #[test]
    fn upcoming_buckets_ascend_and_past_descends() {
        let events = vec![
            ev(d(2024, 7, 9), "f2"),
            ev(d(2024, 6, 14), "w2"),
            ev(d(2024, 5, 1), "p1"),
            ev(d(2024, 6, 13), "w1"),
            ev(d(2024, 6, 30), "f1"),
            ev(d(2024, 6, 10), "p3"),
            ev(d(2024, 6, 1), "p2"),
            ev(d(2024, 6, 20), "n1"),
        ];
        let agenda = classify(events, wed(), &ClassifyOptions::default());
        assert_eq!(titles(agenda.bucket(Bucket::ThisWeek)), vec!["w1", "w2"]);
        assert_eq!(titles(agenda.bucket(Bucket::NextWeek)), vec!["n1"]);
        assert_eq!(titles(agenda.bucket(Bucket::Future)), vec!["f1", "f2"]);
        assert_eq!(titles(agenda.bucket(Bucket::Past)), vec!["p3", "p2", "p1"]);
        assert!(!agenda.has_today());

        for bucket in [Bucket::ThisWeek, Bucket::NextWeek, Bucket::Future] {
            let evs = agenda.bucket(bucket);
            assert!(evs.windows(2).all(|w| w[0].date <= w[1].date));
        }
        let past = agenda.bucket(Bucket::Past);
        assert!(past.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn past_is_capped_to_most_recent() {
        let events: Vec<Event> = (1..=10).map(|day| ev(d(2024, 5, day), "p")).collect();
        let agenda = classify(events, wed(), &ClassifyOptions::default());
        let past: Vec<NaiveDate> = agenda.bucket(Bucket::Past).iter().map(|e| e.date).collect();
        assert_eq!(past, vec![d(2024, 5, 10), d(2024, 5, 9), d(2024, 5, 8)]);
        for bucket in [Bucket::Today, Bucket::ThisWeek, Bucket::NextWeek, Bucket::Future] {
            assert!(agenda.bucket(bucket).is_empty());
        }
    }

    #[test]
    fn same_day_ties_keep_input_order() {
        let events = vec![
            ev(wed(), "first"),
            ev(wed(), "second"),
            ev(d(2024, 6, 2), "old-a"),
            ev(d(2024, 6, 2), "old-b"),
        ];
        let agenda = classify(events, wed(), &ClassifyOptions::default());
        assert!(agenda.has_today());
        assert_eq!(titles(agenda.bucket(Bucket::Today)), vec!["first", "second"]);
        assert_eq!(titles(agenda.bucket(Bucket::Past)), vec!["old-a", "old-b"]);
    }

    #[test]
    fn no_events_means_empty_agenda() {
        let agenda = classify(Vec::new(), wed(), &ClassifyOptions::default());
        assert!(agenda.is_empty());
        assert!(!agenda.has_today());
    }
}
