//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use crate::types::{Brightness, Micros};

/// Berechnet die Zündverzögerung relativ zur steigenden Flanke
///
/// `delay = (1 - brightness/100) * period + zero_crossing_offset`,
/// ganzzahlig gerechnet (abgerundet) und auf `u32` begrenzt.
///
/// # Beispiele
///
/// ```
/// # use dimmer_core::{Brightness, trigger_delay};
/// let delay = trigger_delay(Brightness::clamped(50), 10_000, 100);
/// assert_eq!(delay, 5_100);
/// ```
pub fn trigger_delay(brightness: Brightness, period: Micros, zero_crossing_offset: Micros) -> Micros {
    let off_share = u64::from(100 - brightness.percent());
    let delay = off_share * u64::from(period) / 100 + u64::from(zero_crossing_offset);
    delay.min(u64::from(Micros::MAX)) as Micros
}

/// Schätzt den Offset zum echten Nulldurchgang
///
/// Der Impuls der Nulldurchgangs-Erkennung liegt symmetrisch um den
/// echten Nulldurchgang, also liegt dieser in der Mitte des Impulses.
pub fn zero_crossing_offset(rising_time: Micros, falling_time: Micros) -> Micros {
    falling_time.wrapping_sub(rising_time) / 2
}

/// Totzone: eine Verzögerung ab einer vollen Periode zündet nicht
pub fn is_dead_zone(trigger_delay: Micros, period: Micros) -> bool {
    trigger_delay >= period
}

/// Liest eine Helligkeit wie C `atoi()`: führende Leerzeichen, optionales
/// Vorzeichen, dann Ziffern bis zum ersten anderen Zeichen
///
/// Gibt `None` zurück, wenn keine Ziffer gefunden wurde. Zu große oder
/// negative Werte werden auf `0..=100` begrenzt.
///
/// # Beispiele
///
/// ```
/// # use dimmer_core::parse_brightness;
/// assert_eq!(parse_brightness("75").map(|b| b.percent()), Some(75));
/// assert_eq!(parse_brightness("900").map(|b| b.percent()), Some(100));
/// assert_eq!(parse_brightness("abc"), None);
/// ```
pub fn parse_brightness(raw: &str) -> Option<Brightness> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        // Sättigen, alles über i32::MAX landet ohnehin bei 100
        value = (value * 10 + i64::from(byte - b'0')).min(i64::from(i32::MAX));
    }

    if !seen_digit {
        return None;
    }

    let value = if negative { -value } else { value };
    Some(Brightness::clamped(value as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_delay_half_brightness() {
        assert_eq!(trigger_delay(Brightness::clamped(50), 10_000, 100), 5_100);
    }

    #[test]
    fn test_trigger_delay_full_brightness_is_offset() {
        assert_eq!(trigger_delay(Brightness::FULL, 10_000, 100), 100);
    }

    #[test]
    fn test_trigger_delay_off_is_dead_zone() {
        let delay = trigger_delay(Brightness::OFF, 10_000, 100);
        assert_eq!(delay, 10_100);
        assert!(is_dead_zone(delay, 10_000));
    }

    #[test]
    fn test_trigger_delay_off_without_offset_is_dead_zone() {
        let delay = trigger_delay(Brightness::OFF, 8_333, 0);
        assert!(is_dead_zone(delay, 8_333));
    }

    #[test]
    fn test_trigger_delay_monotonic_in_brightness() {
        for period in [0, 1, 8_333, 10_000, 20_000, Micros::MAX] {
            for offset in [0, 100, 4_000] {
                let mut previous = Micros::MAX;
                for percent in 0..=100 {
                    let delay = trigger_delay(Brightness::clamped(percent), period, offset);
                    assert!(delay <= previous, "b={} p={} z={}", percent, period, offset);
                    previous = delay;
                }
            }
        }
    }

    #[test]
    fn test_trigger_delay_saturates() {
        assert_eq!(trigger_delay(Brightness::OFF, Micros::MAX, 100), Micros::MAX);
    }

    #[test]
    fn test_zero_crossing_offset_symmetric_pulse() {
        assert_eq!(zero_crossing_offset(1_000, 1_200), 100);
    }

    #[test]
    fn test_zero_crossing_offset_across_timer_wrap() {
        let rising = Micros::MAX - 99;
        let falling = rising.wrapping_add(200);
        assert_eq!(zero_crossing_offset(rising, falling), 100);
    }

    #[test]
    fn test_dead_zone_before_first_period() {
        // Vor der ersten vollen Periode ist period = 0: nie zünden
        assert!(is_dead_zone(0, 0));
    }

    #[test]
    fn test_parse_brightness_atoi_like() {
        assert_eq!(parse_brightness("  42"), Some(Brightness::clamped(42)));
        assert_eq!(parse_brightness("+7"), Some(Brightness::clamped(7)));
        assert_eq!(parse_brightness("60abc"), Some(Brightness::clamped(60)));
        assert_eq!(parse_brightness("-5"), Some(Brightness::OFF));
        assert_eq!(parse_brightness("99999999999999"), Some(Brightness::FULL));
    }

    #[test]
    fn test_parse_brightness_rejects_non_numeric() {
        assert_eq!(parse_brightness(""), None);
        assert_eq!(parse_brightness("-"), None);
        assert_eq!(parse_brightness("hell"), None);
    }
}
