/// Render a kilometer distance for nearby results.
///
/// Distances up to `max_distance_km` keep two decimals, farther ones are
/// whole kilometers. Halves round away from zero. An exact zero is left
/// unrounded and renders as "0".
pub fn format_distance_km(km: f64, max_distance_km: f64) -> String {
    if km == 0.0 {
        return km.to_string();
    }
    if km <= max_distance_km {
        format!("{:.2}", (km * 100.0).round() / 100.0)
    } else {
        format!("{:.0}", km.round())
    }
}
