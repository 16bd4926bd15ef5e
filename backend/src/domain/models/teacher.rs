use super::availability::TeacherId;

/// Declared weekly teaching load, as entered on the teacher profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeeklyLoad {
    pub hours: u32,
    pub minutes: u32,
}

impl WeeklyLoad {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    /// Load normalized to decimal hours (e.g. 19h 30m => 19.5)
    pub fn as_decimal_hours(&self) -> f64 {
        self.hours as f64 + self.minutes as f64 / 60.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub weekly_load: WeeklyLoad,
}
