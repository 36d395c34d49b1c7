use crate::platform::Update;

/// True only for messages written by the authorized user.
///
/// Updates without a message or without a sender are rejected.
pub fn is_authorized(update: &Update, authorized_id: u64) -> bool {
    update
        .message
        .as_ref()
        .and_then(|msg| msg.sender.as_ref())
        .is_some_and(|sender| sender.id == authorized_id)
}
