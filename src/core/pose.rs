/// 2D field-position estimate. Owned and written by whichever odometry
/// task maintains it; the control loop only ever reads it.
#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading_deg: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, heading_deg: f64) -> Self {
        Pose { x, y, heading_deg }
    }

    pub fn heading_rad(&self) -> f64 {
        self.heading_deg.to_radians()
    }
}

#[cfg(test)]
mod pose_tests {
    use super::*;

    #[test]
    fn test_heading_conversion() {
        let pose = Pose::new(0.0, 0.0, 180.0);
        assert!(
            (pose.heading_rad() - std::f64::consts::PI).abs() < 1e-9,
            "180 degrees is pi radians"
        );
    }
}
