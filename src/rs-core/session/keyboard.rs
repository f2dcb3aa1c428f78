/// Action bound to a keyboard key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    TogglePlay,
    ToggleFullscreen,
    ToggleMute,
    SeekBackward,
    SeekForward,
    VolumeUp,
    VolumeDown,
    NextEpisode,
    PreviousEpisode,
}

impl KeyCommand {
    /// Returns the command bound to the given `KeyboardEvent.key` value, if one.
    ///
    /// Letters are matched regardless of case.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Spacebar" => return Some(KeyCommand::TogglePlay),
            "ArrowLeft" => return Some(KeyCommand::SeekBackward),
            "ArrowRight" => return Some(KeyCommand::SeekForward),
            "ArrowUp" => return Some(KeyCommand::VolumeUp),
            "ArrowDown" => return Some(KeyCommand::VolumeDown),
            _ => {}
        }
        let mut chars = key.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_lowercase(),
            _ => return None,
        };
        match letter {
            'k' => Some(KeyCommand::TogglePlay),
            'f' => Some(KeyCommand::ToggleFullscreen),
            'm' => Some(KeyCommand::ToggleMute),
            'n' => Some(KeyCommand::NextEpisode),
            'p' => Some(KeyCommand::PreviousEpisode),
            _ => None,
        }
    }
}
