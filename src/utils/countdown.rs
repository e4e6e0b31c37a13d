// ============================================================================
// COUNTDOWN - Tiempo restante hasta un timestamp
// ============================================================================
// Cada tick recalcula desde el reloj de pared (target - now), nunca desde un
// contador que se decrementa: los ticks atrasados se corrigen solos.
// ============================================================================

use chrono::{DateTime, Duration, Utc};

pub const EXPIRED_DISPLAY: &str = "00:00:00";

/// Fuente de "ahora"; inyectable para tests
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Cómo mostrar el campo de horas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HourDisplay {
    /// Siempre `HH:MM:SS`
    #[default]
    Always,
    /// `MM:SS` mientras las horas sean cero
    WhenNonZero,
}

/// Parsea un timestamp ISO-8601. `None` si está mal formado.
pub fn parse_target(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Postgres a veces devuelve "2026-10-20 20:00:00+00"
    DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%#z")
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Tiempo restante, nunca negativo
pub fn remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let diff = target.signed_duration_since(now);
    if diff <= Duration::zero() {
        Duration::zero()
    } else {
        diff
    }
}

/// Redondea hacia arriba: con 500ms restantes se muestra `00:00:01`
pub fn format_remaining(remaining: Duration, hours: HourDisplay) -> String {
    let millis = remaining.num_milliseconds().max(0);
    let total = (millis + 999) / 1000;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;

    match hours {
        HourDisplay::WhenNonZero if h == 0 => format!("{:02}:{:02}", m, s),
        _ => format!("{:02}:{:02}:{:02}", h, m, s),
    }
}

fn parse_or_warn(target: &str) -> Option<DateTime<Utc>> {
    let parsed = parse_target(target);
    if parsed.is_none() {
        log::warn!("⚠️ [COUNTDOWN] Timestamp inválido '{}', se trata como expirado", target);
    }
    parsed
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTick {
    pub display: String,
    pub expired: bool,
    /// true en un único tick por cada (re)inicio
    pub just_expired: bool,
}

/// Secuencia infinita de ticks. Cada `next()` lee el reloj.
pub struct Countdown<C: Clock = SystemClock> {
    clock: C,
    target: Option<DateTime<Utc>>,
    hours: HourDisplay,
    expiry_signaled: bool,
}

impl<C: Clock> Countdown<C> {
    /// `target` mal formado => expirado desde el primer tick
    pub fn new(clock: C, target: &str, hours: HourDisplay) -> Self {
        Self {
            clock,
            target: parse_or_warn(target),
            hours,
            expiry_signaled: false,
        }
    }

    /// Reutiliza el reloj con un nuevo objetivo; vuelve a armar la señal de expiración
    pub fn restart(&mut self, target: &str, hours: HourDisplay) {
        self.target = parse_or_warn(target);
        self.hours = hours;
        self.expiry_signaled = false;
    }

    pub fn tick(&mut self) -> CountdownTick {
        let left = match self.target {
            Some(target) => remaining(target, self.clock.now()),
            None => Duration::zero(),
        };

        if left <= Duration::zero() {
            let just_expired = !self.expiry_signaled;
            self.expiry_signaled = true;
            return CountdownTick {
                display: EXPIRED_DISPLAY.to_string(),
                expired: true,
                just_expired,
            };
        }

        CountdownTick {
            display: format_remaining(left, self.hours),
            expired: false,
            just_expired: false,
        }
    }
}

impl<C: Clock> Iterator for Countdown<C> {
    type Item = CountdownTick;

    fn next(&mut self) -> Option<CountdownTick> {
        Some(self.tick())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct ManualClock {
        now: Rc<Cell<DateTime<Utc>>>,
    }

    impl ManualClock {
        fn at(rfc3339: &str) -> Self {
            Self {
                now: Rc::new(Cell::new(parse_target(rfc3339).unwrap())),
            }
        }

        fn advance_ms(&self, ms: i64) {
            self.now.set(self.now.get() + Duration::milliseconds(ms));
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.now.get()
        }
    }

    const NOW: &str = "2026-10-16T12:00:00Z";

    #[test]
    fn reaches_zero_at_ten_seconds_and_never_goes_negative() {
        let clock = ManualClock::at(NOW);
        let mut countdown = Countdown::new(clock.clone(), "2026-10-16T12:00:10Z", HourDisplay::Always);

        let mut expired_signals = 0;
        for second in 0..=15 {
            let tick = countdown.next().unwrap();
            assert!(!tick.display.contains('-'));
            if second < 10 {
                assert!(!tick.expired, "expiró antes de tiempo en {}s", second);
                assert_eq!(tick.display, format!("00:00:{:02}", 10 - second));
            } else {
                assert_eq!(tick.display, EXPIRED_DISPLAY);
                assert!(tick.expired);
            }
            if tick.just_expired {
                expired_signals += 1;
            }
            clock.advance_ms(1000);
        }
        assert_eq!(expired_signals, 1);
    }

    #[test]
    fn half_second_left_is_not_expired() {
        let clock = ManualClock::at("2026-10-16T12:00:09.500Z");
        let mut countdown = Countdown::new(clock.clone(), "2026-10-16T12:00:10Z", HourDisplay::Always);

        let tick = countdown.tick();
        assert!(!tick.expired);
        assert!(!tick.just_expired);
        assert_eq!(tick.display, "00:00:01");

        clock.advance_ms(499);
        assert!(!countdown.tick().expired);

        clock.advance_ms(1);
        let tick = countdown.tick();
        assert!(tick.expired && tick.just_expired);
        assert_eq!(tick.display, EXPIRED_DISPLAY);
    }

    #[test]
    fn restart_can_switch_hour_display() {
        let clock = ManualClock::at(NOW);
        let mut countdown = Countdown::new(clock, "2026-10-16T12:01:00Z", HourDisplay::Always);
        assert_eq!(countdown.tick().display, "00:01:00");
        countdown.restart("2026-10-16T12:02:00Z", HourDisplay::WhenNonZero);
        assert_eq!(countdown.tick().display, "02:00");
    }

    #[test]
    fn delayed_ticks_recompute_from_the_clock() {
        let clock = ManualClock::at(NOW);
        let mut countdown = Countdown::new(clock.clone(), "2026-10-16T12:05:00Z", HourDisplay::WhenNonZero);
        assert_eq!(countdown.tick().display, "05:00");

        // Pestaña en segundo plano: un solo tick tras 2m30s
        clock.advance_ms(150_000);
        assert_eq!(countdown.tick().display, "02:30");
    }

    #[test]
    fn past_target_is_expired_on_first_tick() {
        let clock = ManualClock::at(NOW);
        let mut countdown = Countdown::new(clock, "2026-10-16T11:59:00Z", HourDisplay::Always);
        let first = countdown.next().unwrap();
        assert_eq!(first.display, EXPIRED_DISPLAY);
        assert!(first.expired && first.just_expired);
        assert!(!countdown.next().unwrap().just_expired);
    }

    #[test]
    fn malformed_target_counts_as_expired() {
        let clock = ManualClock::at(NOW);
        let mut countdown = Countdown::new(clock, "mañana a las 8", HourDisplay::Always);
        let tick = countdown.tick();
        assert!(tick.expired);
        assert_eq!(tick.display, EXPIRED_DISPLAY);
    }

    #[test]
    fn restart_rearms_the_expiry_signal() {
        let clock = ManualClock::at(NOW);
        let mut countdown = Countdown::new(clock.clone(), "2026-10-16T11:00:00Z", HourDisplay::Always);
        assert!(countdown.tick().just_expired);

        countdown.restart("2026-10-16T12:00:02Z", HourDisplay::Always);
        assert!(!countdown.tick().expired);
        clock.advance_ms(2000);
        assert!(countdown.tick().just_expired);
    }

    #[test]
    fn hours_are_totals_not_wrapped_days() {
        assert_eq!(
            format_remaining(Duration::seconds(49 * 3600 + 61), HourDisplay::Always),
            "49:01:01"
        );
        assert_eq!(
            format_remaining(Duration::seconds(3600), HourDisplay::WhenNonZero),
            "01:00:00"
        );
    }

    #[test]
    fn parses_postgres_timestamps() {
        let pg = parse_target("2026-10-20 20:00:00+00").unwrap();
        let iso = parse_target("2026-10-20T20:00:00Z").unwrap();
        assert_eq!(pg, iso);
    }
}
