//! Pure aggregation over an in-memory skill collection.
//!
//! Everything here is side-effect free and recomputed per call. "Now" is an
//! explicit parameter so callers route it through [`crate::Clock`] and tests
//! stay deterministic. All functions tolerate empty entry sequences and
//! unparsable hours; nothing in this module can divide by zero.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::model::{ColorTag, Entry, Skill};

/// Progress bars track this many days of cumulative practice against the
/// daily target: `ratio = total / (target_hours * PROGRESS_WINDOW_DAYS)`.
pub const PROGRESS_WINDOW_DAYS: f64 = 10.0;

/// Trailing window, in days, used by [`week_progress`].
const WEEK_WINDOW_DAYS: i64 = 7;

/// An entry annotated with its owning skill, as shown in per-day views.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry<'a> {
    pub entry: &'a Entry,
    pub skill_name: &'a str,
    pub skill_color: ColorTag,
}

/// All-time practice hours for a skill, summed in stored entry order.
///
/// No rounding is applied; display layers round for presentation.
#[must_use]
pub fn total_hours(skill: &Skill) -> f64 {
    skill.entries().iter().map(Entry::hours_value).sum()
}

/// Hours logged in the trailing week: entries whose date, taken at UTC
/// midnight, is at or after `now` minus seven days. The lower bound is
/// inclusive, so an entry dated exactly seven days ago still counts.
#[must_use]
pub fn week_progress(skill: &Skill, now: DateTime<Utc>) -> f64 {
    let week_ago = now - Duration::days(WEEK_WINDOW_DAYS);
    skill
        .entries()
        .iter()
        .filter(|entry| day_start_utc(entry.date()) >= week_ago)
        .map(Entry::hours_value)
        .sum()
}

/// Entries across all skills logged on exactly `date`, each annotated with
/// its skill's name and color. Outer order follows the collection, inner
/// order follows each skill's entry sequence.
#[must_use]
pub fn day_entries(skills: &[Skill], date: NaiveDate) -> Vec<DayEntry<'_>> {
    let mut matches = Vec::new();
    for skill in skills {
        for entry in skill.entries() {
            if entry.date() == date {
                matches.push(DayEntry {
                    entry,
                    skill_name: skill.name(),
                    skill_color: skill.color(),
                });
            }
        }
    }
    matches
}

/// Total hours logged on `date` across all skills.
#[must_use]
pub fn day_total_hours(skills: &[Skill], date: NaiveDate) -> f64 {
    day_entries(skills, date)
        .iter()
        .map(|day| day.entry.hours_value())
        .sum()
}

/// Bounded progress fraction in `[0, 1]` for a skill's indicator.
///
/// A non-positive or non-finite daily target yields `0.0` rather than
/// letting `Infinity`/`NaN` reach a rendered width.
#[must_use]
pub fn progress_ratio(skill: &Skill) -> f64 {
    let target = skill.target_hours();
    if !target.is_finite() || target <= 0.0 {
        return 0.0;
    }
    (total_hours(skill) / (target * PROGRESS_WINDOW_DAYS)).clamp(0.0, 1.0)
}

/// Parses the longest leading numeric prefix of `raw` as hours.
///
/// Matches the permissive parse the entry form always allowed: "1.5h"
/// reads as 1.5, while fully unparsable or non-finite input counts as zero
/// so a single bad entry cannot poison a sum.
#[must_use]
pub fn parse_hours(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let mut parsed = None;
    for end in 1..=trimmed.len() {
        if !trimmed.is_char_boundary(end) {
            continue;
        }
        if let Ok(value) = trimmed[..end].parse::<f64>() {
            parsed = Some(value);
        }
    }
    match parsed {
        Some(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

fn day_start_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryId, SkillId};
    use crate::time::fixed_now;

    fn entry(id: u64, date: NaiveDate, hours: &str) -> Entry {
        Entry::from_parts(EntryId::new(id), date, hours.into(), "practice".into())
    }

    fn skill_with(target_hours: f64, entries: Vec<Entry>) -> Skill {
        Skill::from_parts(
            SkillId::new("s-1"),
            "Guitar".into(),
            "Music".into(),
            target_hours,
            ColorTag::Green,
            entries,
        )
    }

    fn today() -> NaiveDate {
        fixed_now().date_naive()
    }

    fn days_ago(days: i64) -> NaiveDate {
        today() - Duration::days(days)
    }

    #[test]
    fn empty_entries_aggregate_to_zero() {
        let skill = skill_with(1.0, Vec::new());
        assert_eq!(total_hours(&skill), 0.0);
        assert_eq!(week_progress(&skill, fixed_now()), 0.0);
        assert_eq!(day_total_hours(std::slice::from_ref(&skill), today()), 0.0);
    }

    #[test]
    fn total_hours_sums_parsed_entries() {
        let skill = skill_with(
            1.0,
            vec![entry(1, today(), "1.0"), entry(2, today(), "2.5")],
        );
        assert_eq!(total_hours(&skill), 3.5);
    }

    #[test]
    fn non_numeric_hours_contribute_zero_everywhere() {
        let skill = skill_with(
            1.0,
            vec![
                entry(1, today(), "2"),
                entry(2, today(), "plenty"),
                entry(3, today(), ""),
            ],
        );
        assert_eq!(total_hours(&skill), 2.0);
        assert_eq!(week_progress(&skill, fixed_now()), 2.0);
        assert_eq!(day_total_hours(std::slice::from_ref(&skill), today()), 2.0);
    }

    #[test]
    fn parse_hours_reads_leading_prefix() {
        assert_eq!(parse_hours("1.5"), 1.5);
        assert_eq!(parse_hours(" 2.25 "), 2.25);
        assert_eq!(parse_hours("1.5h"), 1.5);
        assert_eq!(parse_hours("2.5e2x"), 250.0);
        assert_eq!(parse_hours("-0.5"), -0.5);
    }

    #[test]
    fn parse_hours_rejects_garbage_and_non_finite() {
        assert_eq!(parse_hours(""), 0.0);
        assert_eq!(parse_hours("abc"), 0.0);
        assert_eq!(parse_hours("h1.5"), 0.0);
        assert_eq!(parse_hours("inf"), 0.0);
        assert_eq!(parse_hours("NaN"), 0.0);
    }

    #[test]
    fn week_boundary_is_inclusive() {
        let skill = skill_with(1.0, vec![entry(1, days_ago(7), "2.0")]);
        // fixed_now() is a UTC midnight, so "seven days ago at midnight"
        // lands exactly on the window's lower bound.
        assert_eq!(week_progress(&skill, fixed_now()), 2.0);
    }

    #[test]
    fn entries_older_than_a_week_are_excluded() {
        let skill = skill_with(
            1.0,
            vec![entry(1, days_ago(8), "4.0"), entry(2, days_ago(3), "1.0")],
        );
        assert_eq!(week_progress(&skill, fixed_now()), 1.0);
    }

    #[test]
    fn week_progress_never_exceeds_total() {
        let skill = skill_with(
            1.0,
            vec![
                entry(1, days_ago(30), "5.0"),
                entry(2, days_ago(2), "1.5"),
                entry(3, today(), "0.5"),
            ],
        );
        assert!(week_progress(&skill, fixed_now()) <= total_hours(&skill));
        assert_eq!(week_progress(&skill, fixed_now()), 2.0);
        assert_eq!(total_hours(&skill), 7.0);
    }

    #[test]
    fn week_progress_follows_the_clock() {
        let skill = skill_with(1.0, vec![entry(1, days_ago(5), "1.0")]);
        assert_eq!(week_progress(&skill, fixed_now()), 1.0);
        // Re-evaluated with a later "now", the same entry drops out.
        assert_eq!(week_progress(&skill, fixed_now() + Duration::days(4)), 0.0);
    }

    #[test]
    fn day_entries_annotate_and_preserve_order() {
        let guitar = skill_with(1.0, vec![entry(1, today(), "1"), entry(2, today(), "2")]);
        let chess = Skill::from_parts(
            SkillId::new("s-2"),
            "Chess".into(),
            "Games".into(),
            2.0,
            ColorTag::Red,
            vec![entry(3, days_ago(1), "9"), entry(4, today(), "0.5")],
        );
        let skills = vec![guitar, chess];

        let day = day_entries(&skills, today());
        let ids: Vec<_> = day.iter().map(|d| d.entry.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        assert_eq!(day[0].skill_name, "Guitar");
        assert_eq!(day[0].skill_color, ColorTag::Green);
        assert_eq!(day[2].skill_name, "Chess");
        assert_eq!(day[2].skill_color, ColorTag::Red);
    }

    #[test]
    fn day_total_sums_only_matching_dates() {
        let skill = skill_with(
            1.0,
            vec![entry(1, today(), "1.5"), entry(2, days_ago(1), "4.0")],
        );
        assert_eq!(day_total_hours(std::slice::from_ref(&skill), today()), 1.5);
    }

    #[test]
    fn progress_ratio_scales_against_the_window() {
        let skill = skill_with(1.0, vec![entry(1, today(), "3.5")]);
        // 3.5 hours against a 1h/day target over a 10-day window.
        assert_eq!(progress_ratio(&skill), 0.35);
    }

    #[test]
    fn progress_ratio_is_clamped_to_one() {
        let skill = skill_with(0.1, vec![entry(1, today(), "50")]);
        assert_eq!(progress_ratio(&skill), 1.0);
    }

    #[test]
    fn progress_ratio_guards_bad_targets() {
        for target in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let skill = skill_with(target, vec![entry(1, today(), "3")]);
            let ratio = progress_ratio(&skill);
            assert!(ratio.is_finite());
            assert!((0.0..=1.0).contains(&ratio));
            assert_eq!(ratio, 0.0);
        }
    }
}
