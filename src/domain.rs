use crate::config::LINE_HEIGHT;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum Metric {
    #[display(fmt = "Stroom")]
    Power,
    #[display(fmt = "Co2")]
    Co2,
    #[display(fmt = "Tempratuur")]
    Temperature,
    #[display(fmt = "Bar")]
    Pressure,
    #[display(fmt = "Vochtigheid")]
    Humidity,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Power,
        Metric::Co2,
        Metric::Temperature,
        Metric::Pressure,
        Metric::Humidity,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            Metric::Power => "stroom.php",
            Metric::Co2 => "co2.php",
            Metric::Temperature => "temp.php",
            Metric::Pressure => "bar.php",
            Metric::Humidity => "hum.php",
        }
    }

    pub fn row(self) -> i32 {
        self as i32 * LINE_HEIGHT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "{} {}", metric, value)]
pub struct Reading {
    pub metric: Metric,
    pub value: String,
}

impl Reading {
    pub fn new(metric: Metric, value: impl Into<String>) -> Self {
        Reading { metric, value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Readings(Vec<Reading>);

impl Readings {
    pub fn push(&mut self, reading: Reading) {
        self.0.push(reading);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.0.iter()
    }

    pub fn lines(&self) -> Vec<(String, i32)> {
        self.iter()
            .map(|reading| (reading.to_string(), reading.metric.row()))
            .collect()
    }
}

impl From<Vec<Reading>> for Readings {
    fn from(readings: Vec<Reading>) -> Self {
        Readings(readings)
    }
}
