use crate::geo;
use crate::models::{InstructionStep, RouteResult};

/// Shown in place of the step list when the backend returned none.
pub const NO_INSTRUCTIONS: &str = "No instructions available";

/// Whole minutes, rounded up.
pub fn minutes_ceil(seconds: f64) -> u64 {
    (seconds.max(0.0) / 60.0).ceil() as u64
}

/// Render one step as
/// `"{index}. {maneuver} onto {street} ({minutes} min) [Turn angle: {angle}°]"`.
/// Each clause after the index appears only when its field is present.
pub fn format_step(index: usize, step: &InstructionStep) -> String {
    let mut line = format!("{index}.");
    if let Some(maneuver) = &step.maneuver {
        line.push(' ');
        line.push_str(maneuver);
    }
    if let Some(street) = &step.street_name {
        line.push_str(&format!(" onto {street}"));
    }
    if let Some(seconds) = step.duration_seconds {
        line.push_str(&format!(" ({} min)", minutes_ceil(seconds)));
    }
    if let Some(angle) = step.turn_angle_degrees {
        line.push_str(&format!(" [Turn angle: {angle}°]"));
    }
    line
}

/// Instruction panel content, 1-based, or the placeholder line.
pub fn panel_lines(result: &RouteResult) -> Vec<String> {
    if result.instructions.is_empty() {
        return vec![NO_INSTRUCTIONS.to_string()];
    }
    result
        .instructions
        .iter()
        .enumerate()
        .map(|(i, step)| format_step(i + 1, step))
        .collect()
}

/// Sum of the step durations that are known.
pub fn total_duration_s(result: &RouteResult) -> f64 {
    result
        .instructions
        .iter()
        .filter_map(|s| s.duration_seconds)
        .sum()
}

pub fn route_length_m(result: &RouteResult) -> f64 {
    geo::path_length_m(&result.geometry)
}

/// One-line route summary, e.g. `"1.2 km, 15 min"`.
pub fn summary(result: &RouteResult) -> String {
    format!(
        "{:.1} km, {} min",
        route_length_m(result) / 1000.0,
        minutes_ceil(total_duration_s(result))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn step(
        maneuver: Option<&str>,
        street: Option<&str>,
        duration: Option<f64>,
        angle: Option<f64>,
    ) -> InstructionStep {
        InstructionStep {
            maneuver: maneuver.map(str::to_string),
            street_name: street.map(str::to_string),
            duration_seconds: duration,
            turn_angle_degrees: angle,
        }
    }

    #[test]
    fn test_full_step() {
        let s = step(Some("turn left"), Some("West 4th Street"), Some(61.0), Some(-90.0));
        assert_eq!(
            format_step(1, &s),
            "1. turn left onto West 4th Street (2 min) [Turn angle: -90°]"
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        assert_eq!(format_step(3, &step(Some("depart"), None, None, None)), "3. depart");
        assert_eq!(
            format_step(2, &step(None, Some("Broadway"), None, None)),
            "2. onto Broadway"
        );
        assert_eq!(
            format_step(4, &step(Some("arrive"), None, Some(0.0), None)),
            "4. arrive (0 min)"
        );
        assert_eq!(format_step(5, &InstructionStep::default()), "5.");
    }

    #[test]
    fn test_minutes_round_up() {
        assert_eq!(minutes_ceil(0.0), 0);
        assert_eq!(minutes_ceil(1.0), 1);
        assert_eq!(minutes_ceil(60.0), 1);
        assert_eq!(minutes_ceil(60.5), 2);
        assert_eq!(minutes_ceil(-5.0), 0);
    }

    #[test]
    fn test_fractional_turn_angle() {
        let s = step(Some("turn slight right"), None, None, Some(22.5));
        assert_eq!(format_step(1, &s), "1. turn slight right [Turn angle: 22.5°]");
    }

    #[test]
    fn test_panel_lines_numbered_in_order() {
        let result = RouteResult {
            geometry: vec![GeoPoint::new(40.70, -74.00), GeoPoint::new(40.71, -74.00)],
            instructions: vec![
                step(Some("depart"), Some("Hudson Street"), Some(30.0), None),
                step(Some("arrive"), None, Some(0.0), None),
            ],
        };
        assert_eq!(
            panel_lines(&result),
            vec!["1. depart onto Hudson Street (1 min)", "2. arrive (0 min)"]
        );
    }

    #[test]
    fn test_panel_lines_placeholder_when_empty() {
        let result = RouteResult {
            geometry: vec![GeoPoint::new(40.70, -74.00), GeoPoint::new(40.71, -74.00)],
            instructions: vec![],
        };
        assert_eq!(panel_lines(&result), vec![NO_INSTRUCTIONS.to_string()]);
    }

    #[test]
    fn test_summary() {
        let result = RouteResult {
            geometry: vec![GeoPoint::new(40.70, -74.00), GeoPoint::new(40.71, -74.00)],
            instructions: vec![
                step(Some("depart"), None, Some(400.0), None),
                step(Some("turn left"), None, None, Some(-90.0)),
                step(Some("arrive"), None, Some(400.0), None),
            ],
        };
        assert_eq!(total_duration_s(&result), 800.0);
        assert_eq!(summary(&result), "1.1 km, 14 min");
    }
}
