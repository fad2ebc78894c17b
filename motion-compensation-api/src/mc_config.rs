use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use crate::{MCError, MCResult};

/// Fixed set of tunables understood by the tracker pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum MCConfigKey {
    Enabled,
    TrackerType,
    TrackerSide,
    TrackerOffsetForward,
    TrackerOffsetDown,
    TrackerOffsetRight,
    TransOrder,
    TransStrength,
    RotOrder,
    RotStrength,
}

impl MCConfigKey {
    pub const ALL: [MCConfigKey; 10] = [
        MCConfigKey::Enabled,
        MCConfigKey::TrackerType,
        MCConfigKey::TrackerSide,
        MCConfigKey::TrackerOffsetForward,
        MCConfigKey::TrackerOffsetDown,
        MCConfigKey::TrackerOffsetRight,
        MCConfigKey::TransOrder,
        MCConfigKey::TransStrength,
        MCConfigKey::RotOrder,
        MCConfigKey::RotStrength,
    ];

    pub fn section(&self) -> &'static str {
        match *self {
            MCConfigKey::Enabled => "startup",
            MCConfigKey::TrackerType
            | MCConfigKey::TrackerSide
            | MCConfigKey::TrackerOffsetForward
            | MCConfigKey::TrackerOffsetDown
            | MCConfigKey::TrackerOffsetRight => "tracker",
            MCConfigKey::TransOrder | MCConfigKey::TransStrength => "translation_filter",
            MCConfigKey::RotOrder | MCConfigKey::RotStrength => "rotation_filter",
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            MCConfigKey::Enabled => "enabled",
            MCConfigKey::TrackerType => "type",
            MCConfigKey::TrackerSide => "side",
            MCConfigKey::TrackerOffsetForward => "offset_forward",
            MCConfigKey::TrackerOffsetDown => "offset_down",
            MCConfigKey::TrackerOffsetRight => "offset_right",
            MCConfigKey::TransOrder | MCConfigKey::RotOrder => "order",
            MCConfigKey::TransStrength | MCConfigKey::RotStrength => "strength",
        }
    }

    /// Keys whose value is written back when the configuration is saved.
    pub fn is_saved(&self) -> bool {
        match *self {
            MCConfigKey::TransStrength | MCConfigKey::RotStrength => true,
            _ => false,
        }
    }
}

impl fmt::Display for MCConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.name())
    }
}

/// Typed access to the configuration store.
/// Numeric conversions return a `Parse` error instead of failing hard,
/// the caller decides whether to fall back to a default.
pub trait MCConfig {
    fn get_string(&self, key: MCConfigKey) -> MCResult<String>;

    fn set_value(&mut self, key: MCConfigKey, value: &str);

    fn get_int(&self, key: MCConfigKey) -> MCResult<i32> {
        parse_value(key, self.get_string(key)?)
    }

    fn get_float(&self, key: MCConfigKey) -> MCResult<f32> {
        parse_value(key, self.get_string(key)?)
    }

    fn get_bool(&self, key: MCConfigKey) -> MCResult<bool> {
        let value = self.get_string(key)?;
        match value.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            other => Err(MCError::Parse {
                key: key.to_string(),
                value: other.to_owned(),
                reason: "expected 0 or 1".to_owned(),
            }),
        }
    }

    fn set_int(&mut self, key: MCConfigKey, value: i32) {
        self.set_value(key, &value.to_string());
    }

    fn set_float(&mut self, key: MCConfigKey, value: f32) {
        self.set_value(key, &value.to_string());
    }

    fn set_bool(&mut self, key: MCConfigKey, value: bool) {
        self.set_value(key, if value { "1" } else { "0" });
    }

    /// Controller used for the action-pose binding, `left` unless configured otherwise.
    fn controller_side(&self) -> String {
        match self.get_string(MCConfigKey::TrackerSide) {
            Ok(ref side) if side == "left" || side == "right" => side.clone(),
            Ok(side) => {
                error!("invalid controller side: {}, defaulting to 'left'", side);
                "left".to_owned()
            }
            Err(e) => {
                error!("unable to determine controller side ({}), defaulting to 'left'", e);
                "left".to_owned()
            }
        }
    }
}

fn parse_value<T>(key: MCConfigKey, value: String) -> MCResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value.trim().parse::<T>() {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            error!("unable to convert value ({}) for key ({}): {}", value, key, e);
            Err(MCError::Parse {
                key: key.to_string(),
                value,
                reason: e.to_string(),
            })
        }
    }
}

// Values are kept as strings, the same way they are read from and written to
// the ini sections of the persisted configuration.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct MCMemoryConfig {
    values: HashMap<MCConfigKey, String>,
}

impl MCMemoryConfig {
    pub fn new() -> MCMemoryConfig {
        MCMemoryConfig {
            values: HashMap::new(),
        }
    }

    pub fn with_defaults() -> MCMemoryConfig {
        let mut config = MCMemoryConfig::new();
        config.set_value(MCConfigKey::Enabled, "1");
        config.set_value(MCConfigKey::TrackerType, "controller");
        config.set_value(MCConfigKey::TrackerSide, "left");
        config.set_value(MCConfigKey::TrackerOffsetForward, "0.0");
        config.set_value(MCConfigKey::TrackerOffsetDown, "0.0");
        config.set_value(MCConfigKey::TrackerOffsetRight, "0.0");
        config.set_value(MCConfigKey::TransOrder, "2");
        config.set_value(MCConfigKey::TransStrength, "0.5");
        config.set_value(MCConfigKey::RotOrder, "2");
        config.set_value(MCConfigKey::RotStrength, "0.5");
        config
    }

    pub fn remove(&mut self, key: MCConfigKey) -> Option<String> {
        self.values.remove(&key)
    }

    /// Entries flagged for saving, sorted by key.
    pub fn values_to_save(&self) -> Vec<(MCConfigKey, String)> {
        let mut result: Vec<_> = self
            .values
            .iter()
            .filter(|&(key, _)| key.is_saved())
            .map(|(key, value)| (*key, value.clone()))
            .collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }
}

impl MCConfig for MCMemoryConfig {
    fn get_string(&self, key: MCConfigKey) -> MCResult<String> {
        self.values
            .get(&key)
            .cloned()
            .ok_or_else(|| MCError::MissingValue(key.to_string()))
    }

    fn set_value(&mut self, key: MCConfigKey, value: &str) {
        self.values.insert(key, value.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_key() {
        let config = MCMemoryConfig::with_defaults();
        for key in MCConfigKey::ALL.iter() {
            assert!(config.get_string(*key).is_ok(), "missing default for {}", key);
        }
        assert_eq!(config.get_int(MCConfigKey::TransOrder), Ok(2));
        assert_eq!(config.get_float(MCConfigKey::RotStrength), Ok(0.5));
        assert_eq!(config.get_bool(MCConfigKey::Enabled), Ok(true));
    }

    #[test]
    fn parse_failure_is_returned() {
        let mut config = MCMemoryConfig::new();
        config.set_value(MCConfigKey::TransOrder, "two");
        match config.get_int(MCConfigKey::TransOrder) {
            Err(MCError::Parse { ref value, .. }) => assert_eq!(value, "two"),
            other => panic!("unexpected result {:?}", other),
        }
        config.set_value(MCConfigKey::Enabled, "yes");
        assert!(config.get_bool(MCConfigKey::Enabled).is_err());
    }

    #[test]
    fn missing_key_is_reported() {
        let config = MCMemoryConfig::new();
        assert_eq!(
            config.get_float(MCConfigKey::TrackerOffsetDown),
            Err(MCError::MissingValue("tracker.offset_down".to_owned()))
        );
    }

    #[test]
    fn typed_setters_round_trip() {
        let mut config = MCMemoryConfig::new();
        config.set_float(MCConfigKey::TransStrength, 0.25);
        config.set_int(MCConfigKey::RotOrder, 3);
        config.set_bool(MCConfigKey::Enabled, false);
        assert_eq!(config.get_float(MCConfigKey::TransStrength), Ok(0.25));
        assert_eq!(config.get_int(MCConfigKey::RotOrder), Ok(3));
        assert_eq!(config.get_bool(MCConfigKey::Enabled), Ok(false));
    }

    #[test]
    fn controller_side_defaults_to_left() {
        let mut config = MCMemoryConfig::new();
        assert_eq!(config.controller_side(), "left");
        config.set_value(MCConfigKey::TrackerSide, "right");
        assert_eq!(config.controller_side(), "right");
        config.set_value(MCConfigKey::TrackerSide, "middle");
        assert_eq!(config.controller_side(), "left");
    }

    #[test]
    fn only_strengths_are_saved() {
        let config = MCMemoryConfig::with_defaults();
        let saved: Vec<_> = config.values_to_save().into_iter().map(|(k, _)| k).collect();
        assert_eq!(saved, vec![MCConfigKey::TransStrength, MCConfigKey::RotStrength]);
    }
}
