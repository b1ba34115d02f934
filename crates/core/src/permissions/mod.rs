use crate::chat::MessageClass;
use crate::participant::Participant;
use bitflags::bitflags;

bitflags! {
    /// Roles held by a participant. A participant may hold several at once.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u8 {
        const GUEST = 0x01;
        const MEMBER = 0x02;
        const OPERATOR = 0x04;
        const ADMIN = 0x08;
    }
}

impl Permissions {
    pub fn is_admin(self) -> bool {
        self.contains(Permissions::ADMIN)
    }
}

/// The permission a participant needs before a message of `class` is handled,
/// or `None` if anyone may send it.
pub fn required_for(class: MessageClass) -> Option<Permissions> {
    match class {
        MessageClass::ServerBroadcast | MessageClass::AdminChannel => Some(Permissions::ADMIN),
        MessageClass::Command | MessageClass::NormalChat => None,
    }
}

/// Decides whether `participant` may send a message of `class`.
pub fn allows(participant: &Participant, class: MessageClass) -> bool {
    match required_for(class) {
        Some(needed) => participant.permissions().contains(needed),
        None => true,
    }
}
