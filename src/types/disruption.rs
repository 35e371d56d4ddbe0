use super::option::{Category, TravelOption};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive range of 1-based trip nights affected by a disruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_night: u32,
    pub end_night: u32,
}

impl TimeWindow {
    pub fn new(start_night: u32, end_night: u32) -> Self {
        Self {
            start_night: start_night.min(end_night),
            end_night: start_night.max(end_night),
        }
    }

    pub fn night(night: u32) -> Self {
        Self::new(night, night)
    }

    pub fn whole_trip(nights: u32) -> Self {
        Self::new(1, nights.max(1))
    }

    pub fn contains(&self, night: u32) -> bool {
        (self.start_night..=self.end_night).contains(&night)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_night == self.end_night {
            write!(f, "night {}", self.start_night)
        } else {
            write!(f, "nights {}-{}", self.start_night, self.end_night)
        }
    }
}

/// What a disruption hits: a whole category, or specific catalog options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionTarget {
    Category(Category),
    Options(Vec<String>),
}

impl DisruptionTarget {
    pub fn matches(&self, option: &TravelOption) -> bool {
        match self {
            DisruptionTarget::Category(category) => option.category == *category,
            DisruptionTarget::Options(ids) => ids.iter().any(|id| id == &option.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

/// An external event that may invalidate part of a committed plan.
///
/// Disruptions are consumed by a single replanning call and never stored as
/// session state beyond the step log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Disruption {
    WeatherAlert {
        window: TimeWindow,
        target: DisruptionTarget,
        severity: Severity,
        /// Whether the weather rules out outdoor activities
        outdoor_impact: bool,
    },
    DelayEvent {
        window: TimeWindow,
        target: DisruptionTarget,
        severity: Severity,
        delay_minutes: u32,
    },
    ClosureEvent {
        window: TimeWindow,
        target: DisruptionTarget,
        severity: Severity,
    },
}

impl Disruption {
    /// Outdoor-impacting weather over the given nights, aimed at activities.
    pub fn outdoor_weather(window: TimeWindow, severity: Severity) -> Self {
        Disruption::WeatherAlert {
            window,
            target: DisruptionTarget::Category(Category::Activity),
            severity,
            outdoor_impact: true,
        }
    }

    /// A delay on the transport leg.
    pub fn transport_delay(delay_minutes: u32, nights: u32) -> Self {
        let severity = match delay_minutes {
            0..=60 => Severity::Minor,
            61..=180 => Severity::Moderate,
            _ => Severity::Severe,
        };
        Disruption::DelayEvent {
            window: TimeWindow::whole_trip(nights),
            target: DisruptionTarget::Category(Category::Transport),
            severity,
            delay_minutes,
        }
    }

    /// Closure of specific catalog options over the given nights.
    pub fn closure<I, S>(ids: I, window: TimeWindow) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Disruption::ClosureEvent {
            window,
            target: DisruptionTarget::Options(ids.into_iter().map(Into::into).collect()),
            severity: Severity::Severe,
        }
    }

    pub fn window(&self) -> TimeWindow {
        match self {
            Disruption::WeatherAlert { window, .. }
            | Disruption::DelayEvent { window, .. }
            | Disruption::ClosureEvent { window, .. } => *window,
        }
    }

    pub fn target(&self) -> &DisruptionTarget {
        match self {
            Disruption::WeatherAlert { target, .. }
            | Disruption::DelayEvent { target, .. }
            | Disruption::ClosureEvent { target, .. } => target,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Disruption::WeatherAlert { severity, .. }
            | Disruption::DelayEvent { severity, .. }
            | Disruption::ClosureEvent { severity, .. } => *severity,
        }
    }

    /// True for a weather alert that rules out outdoor activities.
    pub fn is_outdoor_weather(&self) -> bool {
        matches!(
            self,
            Disruption::WeatherAlert {
                outdoor_impact: true,
                ..
            }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Disruption::WeatherAlert { .. } => "weather_alert",
            Disruption::DelayEvent { .. } => "delay_event",
            Disruption::ClosureEvent { .. } => "closure_event",
        }
    }
}

impl fmt::Display for Disruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disruption::WeatherAlert {
                window,
                outdoor_impact,
                ..
            } => write!(
                f,
                "weather alert over {} (outdoor impact: {})",
                window, outdoor_impact
            ),
            Disruption::DelayEvent {
                window,
                delay_minutes,
                ..
            } => write!(f, "{} minute delay over {}", delay_minutes, window),
            Disruption::ClosureEvent { window, target, .. } => match target {
                DisruptionTarget::Category(category) => {
                    write!(f, "{} closure over {}", category, window)
                }
                DisruptionTarget::Options(ids) => {
                    write!(f, "closure of {} over {}", ids.join(", "), window)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_window_contains() {
        let window = TimeWindow::new(3, 2);
        assert_eq!(window.start_night, 2);
        assert!(window.contains(2));
        assert!(window.contains(3));
        assert!(!window.contains(1));
    }

    #[test]
    fn test_disruption_tagging() {
        let disruption = Disruption::outdoor_weather(TimeWindow::night(2), Severity::Severe);
        let value = serde_json::to_value(&disruption).unwrap();

        assert_eq!(value["kind"], "weather_alert");
        assert_eq!(value["target"], json!({"category": "activity"}));
        assert_eq!(value["outdoor_impact"], true);

        let parsed: Disruption = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, disruption);
    }

    #[test]
    fn test_delay_severity_buckets() {
        assert_eq!(Disruption::transport_delay(30, 2).severity(), Severity::Minor);
        assert_eq!(
            Disruption::transport_delay(120, 2).severity(),
            Severity::Moderate
        );
        assert_eq!(
            Disruption::transport_delay(300, 2).severity(),
            Severity::Severe
        );
    }
}
