use serde::{Deserialize, Serialize};

use crate::geometry::Orientation;

fn yes() -> bool {
    true
}

fn no() -> bool {
    false
}

fn default_animation_duration() -> f64 {
    250.0
}

/// Reorder semantics of a container.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Behaviour {
    /// Items leave the source container when dropped elsewhere.
    #[default]
    Move,
    /// Items are duplicated on drop; the source keeps its copy and
    /// refuses incoming drags.
    Copy,
    /// A fixed single-slot drop target; no sorting inside.
    DropZone,
}

/// Per-container configuration, resolved once at registration.
///
/// Deserializable with per-field defaults so hosts can ship partial
/// configs; [`ContainerOptions::validate`] is the fatal-precondition
/// gate rejecting malformed values before a container is armed.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct ContainerOptions {
    /// Containers sharing a non-empty group name accept each other's
    /// drags even without an acceptance predicate.
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub behaviour: Behaviour,
    #[serde(default)]
    pub orientation: Orientation,
    /// Duration of sibling slide animations, milliseconds. Consumed by
    /// the host when applying translations; carried here so one record
    /// configures both sides.
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: f64,
    #[serde(default = "yes")]
    pub auto_scroll_enabled: bool,
    /// When set, a drop outside any target still commits the removal
    /// from this container.
    #[serde(default = "no")]
    pub remove_on_drop_out: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            group_name: None,
            behaviour: Behaviour::default(),
            orientation: Orientation::default(),
            animation_duration_ms: default_animation_duration(),
            auto_scroll_enabled: true,
            remove_on_drop_out: false,
        }
    }
}

impl ContainerOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.animation_duration_ms.is_finite() || self.animation_duration_ms < 0.0 {
            return Err(OptionsError::InvalidAnimationDuration(self.animation_duration_ms));
        }
        if let Some(name) = &self.group_name
            && name.is_empty()
        {
            return Err(OptionsError::EmptyGroupName);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OptionsError {
    #[error("animation duration must be a finite non-negative number of milliseconds, got {0}")]
    InvalidAnimationDuration(f64),
    #[error("group name must be non-empty when present")]
    EmptyGroupName,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_empty_config() {
        let parsed: ContainerOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, ContainerOptions::default());
        assert_eq!(parsed.behaviour, Behaviour::Move);
        assert_eq!(parsed.orientation, Orientation::Vertical);
        assert_eq!(parsed.animation_duration_ms, 250.0);
        assert!(parsed.auto_scroll_enabled);
        assert!(!parsed.remove_on_drop_out);
    }

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        let parsed: ContainerOptions = serde_json::from_str(
            r#"{"behaviour": "drop-zone", "orientation": "horizontal", "group_name": "cards"}"#,
        )
        .unwrap();
        assert_eq!(parsed.behaviour, Behaviour::DropZone);
        assert_eq!(parsed.orientation, Orientation::Horizontal);
        assert_eq!(parsed.group_name.as_deref(), Some("cards"));
        assert_eq!(parsed.animation_duration_ms, 250.0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed: Result<ContainerOptions, _> = serde_json::from_str(r#"{"behavior": "move"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut options = ContainerOptions {
            animation_duration_ms: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(OptionsError::InvalidAnimationDuration(_))
        ));

        options.animation_duration_ms = 250.0;
        options.group_name = Some(String::new());
        assert_eq!(options.validate(), Err(OptionsError::EmptyGroupName));

        options.group_name = Some("cards".into());
        assert_eq!(options.validate(), Ok(()));
    }
}
