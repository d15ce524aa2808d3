use std::cmp::Ordering;

/// Returns -1, 0 or +1 depending on the sign of `value`.
pub fn sign(value: i32) -> i32 {
    match value.cmp(&0) {
        Ordering::Greater => 1,
        Ordering::Less => -1,
        Ordering::Equal => 0,
    }
}

/// Integer midpoint of two raw sensor values.
pub fn midpoint(a: i32, b: i32) -> i32 {
    (a + b) / 2
}
