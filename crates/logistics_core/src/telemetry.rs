//! Observation values: read-only KPIs pulled from components on demand.

use std::fmt;

use crate::model::SimTime;

pub const OBS_SIZE: &str = "size";
pub const OBS_WAIT: &str = "wait";
pub const OBS_WAITING: &str = "waiting";
pub const OBS_TIME_IN_TRANSIT: &str = "time-in-transit";
pub const OBS_TRANSPORT_LATENESS: &str = "transport-lateness";
pub const OBS_WAIT_TRANSPORT_TIME: &str = "wait-transport-time";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    Integer(usize),
    Real(f64),
}

impl Observation {
    pub fn as_integer(self) -> Option<usize> {
        match self {
            Observation::Integer(value) => Some(value),
            Observation::Real(_) => None,
        }
    }

    pub fn as_real(self) -> Option<f64> {
        match self {
            Observation::Real(value) => Some(value),
            Observation::Integer(_) => None,
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observation::Integer(value) => write!(f, "{value}"),
            Observation::Real(value) => write!(f, "{value}"),
        }
    }
}

/// Mean of `delay(now)` over `items`; 0 for an empty collection.
///
/// Delays are expected to be clamped at zero by the caller.
pub fn mean_delay<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a T>,
    now: SimTime,
    delay: impl Fn(&T, SimTime) -> f64,
) -> f64 {
    let (total, count) = items
        .into_iter()
        .fold((0.0, 0usize), |(total, count), item| {
            (total + delay(item, now), count + 1)
        });
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_zero() {
        let items: Vec<f64> = Vec::new();
        assert_eq!(mean_delay(&items, 10.0, |v, now| now - v), 0.0);
    }

    #[test]
    fn mean_averages_delays() {
        let arrivals = vec![2.0, 4.0, 12.0];
        let mean = mean_delay(&arrivals, 10.0, |arrival, now| (now - arrival).max(0.0));
        assert!((mean - 14.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn observation_accessors() {
        assert_eq!(Observation::Integer(3).as_integer(), Some(3));
        assert_eq!(Observation::Integer(3).as_real(), None);
        assert_eq!(Observation::Real(1.5).as_real(), Some(1.5));
    }
}
