use serde::Deserialize;
use std::time::Duration;

use super::error::ScenarioError;
use crate::config::GpsMode;
use crate::display::SkyEvent;
use crate::render::Viewport;
use crate::sensors::{LocationFix, OrientationSample, SatelliteReading, Vec3};

/// Recorded sequence of updates and frame requests.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub viewport: Option<Viewport>,
    pub mode: Option<GpsMode>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Accel(Vec3),
    Mag(Vec3),
    Orientation(OrientationSample),
    Fix(Option<LocationFix>),
    Satellites(Option<Vec<SatelliteReading>>),
    LocationServiceMissing,
    /// Lets time pass, so notices on screen can run out.
    Wait(Duration),
    Render,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Accel(_) => "accel",
            Step::Mag(_) => "mag",
            Step::Orientation(_) => "orientation",
            Step::Fix(Some(_)) => "fix",
            Step::Fix(None) => "fix (none)",
            Step::Satellites(Some(_)) => "satellites",
            Step::Satellites(None) => "satellites (none)",
            Step::LocationServiceMissing => "location_service_missing",
            Step::Wait(_) => "wait",
            Step::Render => "render",
        }
    }

    /// Whether the step delivers an update rather than controlling the replay.
    pub fn is_update(&self) -> bool {
        !matches!(self, Step::Wait(_) | Step::Render)
    }

    /// The update this step delivers; `None` for waits and frame requests.
    pub fn event(&self) -> Option<SkyEvent> {
        match self {
            Step::Accel(v) => Some(SkyEvent::Orientation(OrientationSample::accel(*v))),
            Step::Mag(v) => Some(SkyEvent::Orientation(OrientationSample::mag(*v))),
            Step::Orientation(sample) => Some(SkyEvent::Orientation(*sample)),
            Step::Fix(fix) => Some(SkyEvent::Location(fix.clone())),
            Step::Satellites(readings) => Some(SkyEvent::SatelliteStatus(readings.clone())),
            Step::LocationServiceMissing => Some(SkyEvent::LocationServiceMissing),
            Step::Wait(_) | Step::Render => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OrientationStep {
    #[serde(default)]
    accel: Option<[f64; 3]>,
    #[serde(default)]
    mag: Option<[f64; 3]>,
}

impl Scenario {
    pub fn from_file(path: &str) -> Result<Self, ScenarioError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_str(&yaml)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ScenarioError> {
        let root: serde_yaml::Value = serde_yaml::from_str(yaml)?;

        let viewport: Option<Viewport> = root
            .get("viewport")
            .map(|v| serde_yaml::from_value(v.clone()))
            .transpose()?;
        if let Some(v) = viewport {
            if v.width == 0 || v.height == 0 {
                return Err(ScenarioError::Viewport(format!(
                    "width and height must be non-zero, got {}x{}",
                    v.width, v.height
                )));
            }
        }

        let mode = root
            .get("mode")
            .map(|v| serde_yaml::from_value(v.clone()))
            .transpose()?;

        let steps = root
            .get("steps")
            .and_then(|v| v.as_sequence())
            .ok_or_else(|| ScenarioError::Step(0, "missing 'steps'".into()))?
            .iter()
            .enumerate()
            .map(|(i, v)| parse_step(i, v))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Scenario {
            viewport,
            mode,
            steps,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.steps.iter().filter(|s| **s == Step::Render).count()
    }
}

fn parse_step(i: usize, value: &serde_yaml::Value) -> Result<Step, ScenarioError> {
    let err = |msg: &str| ScenarioError::Step(i, msg.into());

    if let Some(word) = value.as_str() {
        return match word.trim() {
            "render" => Ok(Step::Render),
            "location_service_missing" => Ok(Step::LocationServiceMissing),
            other => Err(err(&format!("unknown step: {}", other))),
        };
    }

    let map = value
        .as_mapping()
        .ok_or_else(|| err("expected mapping or a bare step name"))?;
    if map.len() != 1 {
        return Err(err("expected exactly one key"));
    }
    let (key, value) = map.iter().next().ok_or_else(|| err("empty step"))?;
    let key = key.as_str().ok_or_else(|| err("step key must be string"))?;

    let step = match key {
        "accel" => Step::Accel(Vec3::from(from_value::<[f64; 3]>(i, value)?)),
        "mag" => Step::Mag(Vec3::from(from_value::<[f64; 3]>(i, value)?)),
        "orientation" => {
            let o: OrientationStep = from_value(i, value)?;
            Step::Orientation(OrientationSample {
                accel: o.accel.map(Vec3::from),
                mag: o.mag.map(Vec3::from),
            })
        }
        "wait" => {
            let text = value
                .as_str()
                .ok_or_else(|| err("wait needs a duration such as '3s'"))?;
            let duration = humantime::parse_duration(text.trim())
                .map_err(|e| err(&format!("invalid wait '{}': {}", text, e)))?;
            Step::Wait(duration)
        }
        "fix" => Step::Fix(from_value(i, value)?),
        "satellites" => Step::Satellites(from_value(i, value)?),
        _ => return Err(err(&format!("unknown step: {}", key))),
    };

    validate_step(&step).map_err(|msg| err(&msg))?;
    Ok(step)
}

fn from_value<T: serde::de::DeserializeOwned>(
    i: usize,
    value: &serde_yaml::Value,
) -> Result<T, ScenarioError> {
    serde_yaml::from_value(value.clone()).map_err(|e| ScenarioError::Step(i, e.to_string()))
}

fn validate_step(step: &Step) -> Result<(), String> {
    let check_vector = |v: &Vec3| {
        if v.iter().all(|c| c.is_finite()) {
            Ok(())
        } else {
            Err(format!("non-finite vector {:?}", v))
        }
    };

    match step {
        Step::Accel(v) | Step::Mag(v) => check_vector(v),
        Step::Orientation(sample) => {
            if sample.accel.is_none() && sample.mag.is_none() {
                return Err("orientation needs accel or mag".into());
            }
            sample.accel.iter().chain(sample.mag.iter()).try_for_each(check_vector)
        }
        Step::Fix(Some(fix)) => {
            if !(-90.0..=90.0).contains(&fix.latitude) {
                return Err(format!("latitude {} out of range", fix.latitude));
            }
            if !(-180.0..=180.0).contains(&fix.longitude) {
                return Err(format!("longitude {} out of range", fix.longitude));
            }
            if !(fix.altitude.is_finite() && fix.bearing_deg.is_finite() && fix.speed.is_finite()) {
                return Err("non-finite fix".into());
            }
            if fix.time().is_none() {
                return Err(format!("timestamp {} ms is out of range", fix.timestamp_ms));
            }
            Ok(())
        }
        Step::Satellites(Some(readings)) => readings.iter().try_for_each(|r| {
            if !(-90.0..=90.0).contains(&r.elevation_deg) {
                return Err(format!("satellite {}: elevation {} out of range", r.id, r.elevation_deg));
            }
            if !r.azimuth_deg.is_finite() {
                return Err(format!("satellite {}: non-finite azimuth", r.id));
            }
            if !(r.cn0_dbhz.is_finite() && r.cn0_dbhz >= 0.0) {
                return Err(format!("satellite {}: negative signal strength", r.id));
            }
            Ok(())
        }),
        Step::Fix(None)
        | Step::Satellites(None)
        | Step::LocationServiceMissing
        | Step::Wait(_)
        | Step::Render => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
viewport: { width: 320, height: 320 }
mode: ambient
steps:
  - accel: [0.0, 0.0, 9.81]
  - mag: [0.0, 22.0, -40.0]
  - orientation: { accel: [0.0, 0.0, 9.81] }
  - fix:
      latitude: 42.55
      longitude: -70.88
      altitude: 10.0
      timestamp_ms: 1760000000000
      bearing_deg: 90.0
      speed: 1.2
  - satellites:
      - { id: 5, azimuth_deg: 45.0, elevation_deg: 30.0, cn0_dbhz: 30.0, used_in_fix: true }
      - { id: 12, azimuth_deg: 200.0, elevation_deg: 5.0, cn0_dbhz: 14.0 }
  - render
  - fix: null
  - satellites: null
  - render
"#;

    #[test]
    fn parses_all_step_kinds() {
        let scenario = Scenario::from_str(SAMPLE).unwrap();
        assert_eq!(scenario.viewport, Some(Viewport { width: 320, height: 320 }));
        assert_eq!(scenario.mode, Some(GpsMode::Ambient));
        assert_eq!(scenario.steps.len(), 9);
        assert_eq!(scenario.frame_count(), 2);

        assert_eq!(scenario.steps[0], Step::Accel(Vec3::new(0.0, 0.0, 9.81)));
        assert!(matches!(
            scenario.steps[2],
            Step::Orientation(OrientationSample { accel: Some(_), mag: None })
        ));
        match &scenario.steps[4] {
            Step::Satellites(Some(readings)) => {
                assert_eq!(readings.len(), 2);
                assert!(readings[0].used_in_fix);
                assert!(!readings[1].used_in_fix);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(scenario.steps[6], Step::Fix(None));
        assert_eq!(scenario.steps[7], Step::Satellites(None));
        assert_eq!(scenario.steps[8].event(), None);
    }

    #[test]
    fn header_is_optional() {
        let scenario = Scenario::from_str("steps: [render]").unwrap();
        assert_eq!(scenario.viewport, None);
        assert_eq!(scenario.mode, None);
        assert_eq!(scenario.steps, vec![Step::Render]);
    }

    #[test]
    fn missing_steps_is_an_error() {
        let err = Scenario::from_str("viewport: { width: 1, height: 1 }").unwrap_err();
        assert!(matches!(err, ScenarioError::Step(0, _)));
    }

    #[test]
    fn errors_name_the_step() {
        let yaml = "steps:\n  - render\n  - compass: 12\n";
        match Scenario::from_str(yaml).unwrap_err() {
            ScenarioError::Step(i, msg) => {
                assert_eq!(i, 1);
                assert!(msg.contains("compass"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_out_of_range_elevation() {
        let yaml = r#"
steps:
  - satellites:
      - { id: 1, azimuth_deg: 0.0, elevation_deg: 95.0, cn0_dbhz: 10.0 }
"#;
        assert!(matches!(
            Scenario::from_str(yaml).unwrap_err(),
            ScenarioError::Step(0, _)
        ));
    }

    #[test]
    fn accepts_negative_elevation() {
        let yaml = r#"
steps:
  - satellites:
      - { id: 1, azimuth_deg: 0.0, elevation_deg: -5.0, cn0_dbhz: 10.0 }
"#;
        assert!(Scenario::from_str(yaml).is_ok());
    }

    #[test]
    fn rejects_negative_signal_and_empty_orientation() {
        let yaml = r#"
steps:
  - satellites:
      - { id: 1, azimuth_deg: 0.0, elevation_deg: 5.0, cn0_dbhz: -1.0 }
"#;
        assert!(Scenario::from_str(yaml).is_err());
        assert!(Scenario::from_str("steps: [{ orientation: {} }]").is_err());
    }

    #[test]
    fn rejects_multi_key_steps() {
        let yaml = "steps:\n  - { accel: [0, 0, 1], mag: [0, 1, 0] }\n";
        assert!(Scenario::from_str(yaml).is_err());
    }

    #[test]
    fn parses_waits_and_missing_service() {
        let yaml = r#"
steps:
  - location_service_missing
  - wait: 2s 500ms
  - render
"#;
        let scenario = Scenario::from_str(yaml).unwrap();
        assert_eq!(
            scenario.steps,
            vec![
                Step::LocationServiceMissing,
                Step::Wait(Duration::from_millis(2500)),
                Step::Render,
            ]
        );
        assert!(scenario.steps[0].is_update());
        assert!(!scenario.steps[1].is_update());
        assert_eq!(scenario.steps[1].event(), None);
    }

    #[test]
    fn rejects_bad_wait() {
        assert!(Scenario::from_str("steps: [{ wait: soon }]").is_err());
        assert!(Scenario::from_str("steps: [{ wait: 3 }]").is_err());
    }

    #[test]
    fn rejects_unrepresentable_timestamp() {
        let yaml = r#"
steps:
  - fix: { latitude: 10.0, longitude: 20.0, timestamp_ms: -9223372036854775808 }
  - render
"#;
        match Scenario::from_str(yaml).unwrap_err() {
            ScenarioError::Step(0, msg) => assert!(msg.contains("timestamp"), "{}", msg),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_zero_sized_viewport() {
        let yaml = "viewport: { width: 0, height: 320 }\nsteps: [render]\n";
        assert!(matches!(
            Scenario::from_str(yaml).unwrap_err(),
            ScenarioError::Viewport(_)
        ));
    }

    #[test]
    fn vectors_must_have_three_finite_components() {
        assert!(Scenario::from_str("steps: [{ accel: [0.0, 9.81] }]").is_err());
        assert!(Scenario::from_str("steps: [{ mag: [.nan, 1.0, 2.0] }]").is_err());
    }
}
