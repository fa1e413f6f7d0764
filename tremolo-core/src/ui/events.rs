//! Commands produced by the UI state machine

/// Commands the UI asks the controller to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiCommand {
    /// Load the drawn profile and start playback
    Start,
    /// Stop playback and hold the motor at zero
    Stop,
    /// Drawn profile was finalized
    Saved,
    /// Drawn profile was cleared
    Deleted,
    /// A slider moved
    SliderMoved,
    /// Save or delete pressed while the motor runs
    Rejected,
}

impl UiCommand {
    /// Check if this command changes the motor state
    pub fn is_motor_command(&self) -> bool {
        matches!(self, UiCommand::Start | UiCommand::Stop)
    }
}
