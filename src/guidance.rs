// Navigation banner rendering.
//
// Static per-octant glyph tables (direction arrow, compass diagram) and
// distance formatting, composed into the message a hunting user sees.
// A missing octant (coincident points) falls back to the pin glyphs.

use crate::geo::Octant;

const COMPASS_NORTH: &str = "⠀⠀⠀🔴⠀⠀⠀
⠀⠀⠀⠀↑⠀⠀⠀
⚪ ← ⚫ → ⚪
⠀⠀⠀⠀↓⠀⠀⠀
⠀⠀⠀⠀⚪⠀⠀⠀";

const COMPASS_NORTH_EAST: &str = "⠀⠀⠀⚪⠀🔴⠀
⠀⠀⠀⠀↑⠀↗⠀
⚪ ← ⚫ → ⚪
⠀⠀⠀⠀↓⠀⠀⠀
⠀⠀⠀⠀⚪⠀⠀⠀";

const COMPASS_EAST: &str = "⠀⠀⠀⠀⚪⠀⠀⠀
⠀⠀⠀⠀↑⠀⠀⠀
⚪ ← ⚫ → 🔴
⠀⠀⠀⠀↓⠀⠀⠀
⠀⠀⠀⠀⚪⠀⠀⠀";

const COMPASS_SOUTH_EAST: &str = "⠀⠀⠀⠀⚪⠀⠀⠀
⠀⠀⠀⠀↑⠀⠀⠀
⚪ ← ⚫ → ⚪
⠀⠀⠀⠀↓⠀↘⠀
⠀⠀⠀⠀⚪⠀🔴⠀";

const COMPASS_SOUTH: &str = "⠀⠀⠀⠀⚪⠀⠀⠀
⠀⠀⠀⠀↑⠀⠀⠀
⚪ ← ⚫ → ⚪
⠀⠀⠀⠀↓⠀⠀⠀
⠀⠀⠀⠀🔴⠀⠀⠀";

const COMPASS_SOUTH_WEST: &str = "⠀⠀⠀⠀⚪⠀⠀⠀
⠀⠀⠀⠀↑⠀⠀⠀
⚪ ← ⚫ → ⚪
⠀⠀↙⠀↓⠀⠀⠀
🔴⠀⠀⚪⠀⠀⠀";

const COMPASS_WEST: &str = "⠀⠀⠀⠀⚪⠀⠀⠀
⠀⠀⠀⠀↑⠀⠀⠀
🔴 ← ⚫ → ⚪
⠀⠀⠀⠀↓⠀⠀⠀
⠀⠀⠀⠀⚪⠀⠀⠀";

const COMPASS_NORTH_WEST: &str = "🔴⠀⠀⚪⠀⠀⠀
⠀↖⠀⠀↑⠀⠀⠀
⚪ ← ⚫ → ⚪
⠀⠀⠀⠀↓⠀⠀⠀
⠀⠀⠀⠀⚪⠀⠀⠀";

const COMPASS_HERE: &str = "⠀⠀⠀📍⠀⠀⠀
⠀⠀⠀⠀↑⠀⠀⠀
⚪ ← ⚫ → ⚪
⠀⠀⠀⠀↓⠀⠀⠀
⠀⠀⠀⠀⚪⠀⠀⠀";

fn arrow(octant: Option<Octant>) -> &'static str {
    match octant {
        Some(Octant::North) => "⬆️⬆️",
        Some(Octant::NorthEast) => "↗️↗️",
        Some(Octant::East) => "➡️➡️",
        Some(Octant::SouthEast) => "↘️↘️",
        Some(Octant::South) => "⬇️⬇️",
        Some(Octant::SouthWest) => "↙️↙️",
        Some(Octant::West) => "⬅️⬅️",
        Some(Octant::NorthWest) => "↖️↖️",
        None => "📍📍",
    }
}

fn label(octant: Option<Octant>) -> &'static str {
    match octant {
        Some(Octant::North) => "NORTH",
        Some(Octant::NorthEast) => "NORTH-EAST",
        Some(Octant::East) => "EAST",
        Some(Octant::SouthEast) => "SOUTH-EAST",
        Some(Octant::South) => "SOUTH",
        Some(Octant::SouthWest) => "SOUTH-WEST",
        Some(Octant::West) => "WEST",
        Some(Octant::NorthWest) => "NORTH-WEST",
        None => "RIGHT HERE",
    }
}

fn compass(octant: Option<Octant>) -> &'static str {
    match octant {
        Some(Octant::North) => COMPASS_NORTH,
        Some(Octant::NorthEast) => COMPASS_NORTH_EAST,
        Some(Octant::East) => COMPASS_EAST,
        Some(Octant::SouthEast) => COMPASS_SOUTH_EAST,
        Some(Octant::South) => COMPASS_SOUTH,
        Some(Octant::SouthWest) => COMPASS_SOUTH_WEST,
        Some(Octant::West) => COMPASS_WEST,
        Some(Octant::NorthWest) => COMPASS_NORTH_WEST,
        None => COMPASS_HERE,
    }
}

/// Integer meters below one kilometer, otherwise kilometers to one decimal.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters as i64)
    }
}

/// The navigation banner sent (or edited in place) on every accepted fix.
/// Identical inputs render byte-identical text, which is what the engine
/// diffs against to suppress redundant output.
pub fn render(distance_m: f64, octant: Option<Octant>) -> String {
    format!(
        "🧭 Direction to the cache:\n\n ═══ NAVIGATION ═══\n{}\n\n   {} *{}* {}\n\n📏 Distance: *{}*\n\n═══════════════════",
        compass(octant),
        arrow(octant),
        label(octant),
        arrow(octant),
        format_distance(distance_m),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance_meters() {
        assert_eq!(format_distance(42.0), "42 m");
        assert_eq!(format_distance(850.7), "850 m");
        assert_eq!(format_distance(999.0), "999 m");
    }

    #[test]
    fn test_format_distance_kilometers() {
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(1234.0), "1.2 km");
        assert_eq!(format_distance(5678.0), "5.7 km");
    }

    #[test]
    fn test_render_east() {
        let text = render(850.0, Some(Octant::East));
        assert!(text.contains("═══ NAVIGATION ═══"));
        assert!(text.contains("*EAST*"));
        assert!(text.contains("➡️➡️"));
        assert!(text.contains("*850 m*"));
        assert!(text.contains(COMPASS_EAST));
    }

    #[test]
    fn test_render_same_distance_same_octant_is_stable() {
        assert_eq!(render(500.0, Some(Octant::North)), render(500.0, Some(Octant::North)));
    }

    #[test]
    fn test_render_coincident_fallback() {
        let text = render(0.0, None);
        assert!(text.contains("📍"));
        assert!(text.contains("RIGHT HERE"));
    }

    #[test]
    fn test_every_octant_has_distinct_compass() {
        let octants = [
            Octant::North,
            Octant::NorthEast,
            Octant::East,
            Octant::SouthEast,
            Octant::South,
            Octant::SouthWest,
            Octant::West,
            Octant::NorthWest,
        ];
        for (i, a) in octants.iter().enumerate() {
            for b in octants.iter().skip(i + 1) {
                assert_ne!(compass(Some(*a)), compass(Some(*b)));
                assert_ne!(arrow(Some(*a)), arrow(Some(*b)));
            }
        }
    }
}
