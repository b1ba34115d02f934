use super::format::FormattedMessage;
use crate::participant::Participant;
use crate::permissions::Permissions;
use mcchat_text::ChatEnvelope;
use std::sync::Arc;
use tracing::error;

/// Who receives a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Everyone,
    SenderOnly,
    Admins,
    Operators,
    Guests,
    EveryoneExceptSender,
}

impl Audience {
    fn admits(self, sender: &Participant, candidate: &Participant) -> bool {
        if !candidate.is_logged_in() {
            return false;
        }
        match self {
            Audience::Everyone => true,
            Audience::SenderOnly => candidate.uid == sender.uid,
            Audience::Admins => candidate.has_permission(Permissions::ADMIN),
            Audience::Operators => candidate.has_permission(Permissions::OPERATOR),
            Audience::Guests => candidate.has_permission(Permissions::GUEST),
            Audience::EveryoneExceptSender => candidate.uid != sender.uid,
        }
    }
}

/// Picks the recipients of `audience` out of a roster snapshot.
///
/// `SenderOnly` always resolves to the sender, even when the sender is not
/// part of the roster (the server console is never connected).
pub fn resolve<'a>(
    audience: Audience,
    sender: &'a Participant,
    roster: &'a [Arc<Participant>],
) -> Vec<&'a Participant> {
    if audience == Audience::SenderOnly {
        return vec![sender];
    }
    roster
        .iter()
        .map(Arc::as_ref)
        .filter(|candidate| audience.admits(sender, candidate))
        .collect()
}

/// The connection subsystem's side of message delivery.
///
/// Implementors provide the roster and a way to write to one connection; the
/// fan out methods are built on top of those two. Failing to write to a single
/// connection is the implementor's problem and is never reported back.
pub trait Delivery {
    /// Snapshot of every connected participant.
    fn roster(&self) -> Vec<Arc<Participant>>;

    fn send_packet(&self, recipient: &Participant, envelope: &ChatEnvelope);

    fn send_to_one(&self, recipient: &Participant, envelope: &ChatEnvelope) {
        self.send_packet(recipient, envelope);
    }

    fn send_to_all(&self, sender: &Participant, envelope: &ChatEnvelope) {
        fan_out(self, Audience::Everyone, sender, envelope);
    }

    fn send_to_admins(&self, sender: &Participant, envelope: &ChatEnvelope) {
        fan_out(self, Audience::Admins, sender, envelope);
    }

    fn send_to_operators(&self, sender: &Participant, envelope: &ChatEnvelope) {
        fan_out(self, Audience::Operators, sender, envelope);
    }

    fn send_to_guests(&self, sender: &Participant, envelope: &ChatEnvelope) {
        fan_out(self, Audience::Guests, sender, envelope);
    }

    fn send_to_all_except(&self, sender: &Participant, envelope: &ChatEnvelope) {
        fan_out(self, Audience::EveryoneExceptSender, sender, envelope);
    }
}

fn fan_out<D: Delivery + ?Sized>(
    delivery: &D,
    audience: Audience,
    sender: &Participant,
    envelope: &ChatEnvelope,
) {
    let roster = delivery.roster();
    for recipient in resolve(audience, sender, &roster) {
        delivery.send_packet(recipient, envelope);
    }
}

/// Wraps `message` in a chat envelope and hands it to `delivery` for
/// `audience`. Returns `false` only if the envelope could not be built.
pub fn send_msg<D: Delivery + ?Sized>(
    delivery: &D,
    sender: &Participant,
    message: &FormattedMessage,
    audience: Audience,
) -> bool {
    let envelope = match ChatEnvelope::new(message.as_str()) {
        Ok(envelope) => envelope,
        Err(err) => {
            error!("Failed to encode chat message from {}: {}", sender.name, err);
            return false;
        }
    };

    match audience {
        Audience::Everyone => delivery.send_to_all(sender, &envelope),
        Audience::SenderOnly => delivery.send_to_one(sender, &envelope),
        Audience::Admins => delivery.send_to_admins(sender, &envelope),
        Audience::Operators => delivery.send_to_operators(sender, &envelope),
        Audience::Guests => delivery.send_to_guests(sender, &envelope),
        Audience::EveryoneExceptSender => delivery.send_to_all_except(sender, &envelope),
    }

    true
}
