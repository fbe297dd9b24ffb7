/// Loyalty tier for a points balance. Derived, never stored independently of points.
pub fn points_rank(points: i64) -> &'static str {
    match points {
        p if p >= 1000 => "Gold",
        p if p >= 500 => "Silver",
        p if p > 0 => "Bronze",
        _ => "",
    }
}
