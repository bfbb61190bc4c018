// User controls - commands and keyboard shortcuts
use crate::domain::telemetry::Channel;
use serde::Deserialize;

/// Everything a viewer can ask the playback controller to do
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    TogglePlay,
    Play,
    Pause,
    Stop,
    Seek { second: i64 },
    Step { delta: i64 },
    SetSpeed { multiplier: f64 },
    SetChannels { left: Channel, right: Channel },
    SetSmoothing { radius: usize },
}

/// Where keyboard focus sits when the key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Focus {
    #[default]
    Page,
    TextInput,
    Select,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyInput {
    pub key: String,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub focus: Focus,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, shift: bool, focus: Focus) -> Self {
        Self {
            key: key.into(),
            shift,
            focus,
        }
    }
}

/// Space toggles play, arrows step one second (ten with shift).
/// Keys typed into text or selection controls are left alone.
pub fn map_key(input: &KeyInput) -> Option<Command> {
    if input.focus != Focus::Page {
        return None;
    }
    let stride = if input.shift { 10 } else { 1 };
    match input.key.as_str() {
        " " | "Space" | "Spacebar" => Some(Command::TogglePlay),
        "ArrowLeft" | "Left" => Some(Command::Step { delta: -stride }),
        "ArrowRight" | "Right" => Some(Command::Step { delta: stride }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(&KeyInput::new(" ", false, Focus::Page)), Some(Command::TogglePlay));
        assert_eq!(
            map_key(&KeyInput::new("ArrowLeft", false, Focus::Page)),
            Some(Command::Step { delta: -1 })
        );
        assert_eq!(
            map_key(&KeyInput::new("ArrowRight", true, Focus::Page)),
            Some(Command::Step { delta: 10 })
        );
        assert_eq!(map_key(&KeyInput::new("Enter", false, Focus::Page)), None);
    }

    #[test]
    fn test_keys_ignored_inside_controls() {
        assert_eq!(map_key(&KeyInput::new(" ", false, Focus::TextInput)), None);
        assert_eq!(map_key(&KeyInput::new("ArrowLeft", true, Focus::Select)), None);
    }

    #[test]
    fn test_command_from_json() {
        let cmd: Command = serde_json::from_str(r#"{"type":"seek","second":73001}"#).unwrap();
        assert_eq!(cmd, Command::Seek { second: 73001 });

        let cmd: Command =
            serde_json::from_str(r#"{"type":"setChannels","left":"torque1","right":"verticalSpeed"}"#)
                .unwrap();
        assert_eq!(
            cmd,
            Command::SetChannels {
                left: Channel::Torque1,
                right: Channel::VerticalSpeed
            }
        );

        let key: KeyInput = serde_json::from_str(r#"{"key":"ArrowRight"}"#).unwrap();
        assert_eq!(key.focus, Focus::Page);
    }
}
