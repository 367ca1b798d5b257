use time::{Duration, OffsetDateTime, Time};

/// Completed/total as a percentage, rounded to one decimal. Zero when empty.
pub fn completion_rate(completed: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = (completed as f64 / total as f64) * 100.0;
    (rate * 10.0).round() / 10.0
}

pub fn productivity_level(completion_rate: f64) -> &'static str {
    if completion_rate >= 80.0 {
        "high"
    } else if completion_rate >= 60.0 {
        "medium"
    } else if completion_rate >= 40.0 {
        "moderate"
    } else {
        "low"
    }
}

/// The overdue nudge only applies below the lowest completion tier.
pub fn motivational_message(completion_rate: f64, overdue_tasks: i64) -> &'static str {
    if completion_rate >= 80.0 {
        "Excellent work! You're crushing your goals! 🎉"
    } else if completion_rate >= 60.0 {
        "Great progress! Keep up the momentum! 💪"
    } else if completion_rate >= 40.0 {
        "You're making steady progress. Stay focused! 🎯"
    } else if overdue_tasks > 5 {
        "You have some overdue tasks. Let's tackle them! ⚡"
    } else {
        "Every step forward counts. You've got this! 🌟"
    }
}

pub fn start_of_month(now: OffsetDateTime) -> anyhow::Result<OffsetDateTime> {
    Ok(now.replace_day(1)?.replace_time(Time::MIDNIGHT))
}

/// Start of the current week; weeks start on Sunday.
pub fn start_of_week(now: OffsetDateTime) -> OffsetDateTime {
    let days_from_sunday = now.weekday().number_days_from_sunday() as i64;
    (now - Duration::days(days_from_sunday)).replace_time(Time::MIDNIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn completion_rate_rounds_to_one_decimal() {
        assert_eq!(completion_rate(1, 3), 33.3);
        assert_eq!(completion_rate(2, 3), 66.7);
        assert_eq!(completion_rate(1, 1), 100.0);
        assert_eq!(completion_rate(0, 5), 0.0);
    }

    #[test]
    fn completion_rate_zero_when_empty() {
        assert_eq!(completion_rate(0, 0), 0.0);
    }

    #[test]
    fn productivity_tiers() {
        assert_eq!(productivity_level(95.0), "high");
        assert_eq!(productivity_level(80.0), "high");
        assert_eq!(productivity_level(79.9), "medium");
        assert_eq!(productivity_level(60.0), "medium");
        assert_eq!(productivity_level(40.0), "moderate");
        assert_eq!(productivity_level(39.9), "low");
        assert_eq!(productivity_level(0.0), "low");
    }

    #[test]
    fn message_tiers_and_overdue_override() {
        assert!(motivational_message(85.0, 100).contains("Excellent"));
        assert!(motivational_message(65.0, 0).contains("momentum"));
        assert!(motivational_message(45.0, 0).contains("steady"));
        // below 40 with many overdue tasks -> overdue nudge
        assert!(motivational_message(10.0, 6).contains("overdue"));
        // below 40 with few overdue tasks -> fallback
        assert!(motivational_message(10.0, 5).contains("Every step"));
    }

    #[test]
    fn month_start_is_first_midnight() {
        let now = datetime!(2024-03-17 15:30:00 UTC);
        let start = start_of_month(now).unwrap();
        assert_eq!(start, datetime!(2024-03-01 00:00:00 UTC));
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-03-20 is a Wednesday
        let now = datetime!(2024-03-20 15:30:00 UTC);
        assert_eq!(start_of_week(now), datetime!(2024-03-17 00:00:00 UTC));
        // a Sunday maps to itself at midnight
        let sunday = datetime!(2024-03-17 09:00:00 UTC);
        assert_eq!(start_of_week(sunday), datetime!(2024-03-17 00:00:00 UTC));
    }
}
