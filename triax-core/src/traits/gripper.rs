//! Gripper actuator trait

/// Trait for the pick gripper (servo or pneumatic)
///
/// Both operations only command the actuator; mechanical settling time is
/// handled by the pick sequencer's hold delays, not here.
pub trait Gripper {
    /// Open the gripper (release)
    fn open(&mut self);

    /// Close the gripper (grip)
    fn close(&mut self);

    /// Check whether the gripper is commanded closed
    fn is_closed(&self) -> bool;
}
