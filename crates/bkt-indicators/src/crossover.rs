/// Sign change of `fast - slow` between readings.
///
/// Equal readings do not reset the reference side, so a touch followed by a
/// move back is not a cross.
#[derive(Debug, Clone, Default)]
pub struct CrossOver {
    last_side: i8,
}

impl CrossOver {
    pub fn new() -> Self {
        Self::default()
    }

    /// +1 when fast crosses above slow, -1 when it crosses below, 0 otherwise.
    pub fn next(&mut self, fast: f64, slow: f64) -> i8 {
        let diff = fast - slow;
        let side: i8 = if diff > 0.0 {
            1
        } else if diff < 0.0 {
            -1
        } else {
            return 0;
        };

        let cross = if self.last_side != 0 && side != self.last_side {
            side
        } else {
            0
        };
        self.last_side = side;
        cross
    }
}
