use crate::permissions::Permissions;
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{PoisonError, RwLock};

pub type Uid = i32;

/// The uid reserved for the server console. No connection is ever given it.
pub const SERVER_CONSOLE_UID: Uid = -1;

/// A connected participant, as seen by the chat layer.
///
/// The connection subsystem owns these and hands out shared references. The
/// mutable flags use atomics so a chat invocation can read them, and grant
/// admin, without requiring exclusive access to the roster.
pub struct Participant {
    pub uid: Uid,
    pub name: String,
    permissions: AtomicU8,
    muted: AtomicBool,
    dnd: AtomicBool,
    logged_in: AtomicBool,
    /// Communication categories this participant may not use, e.g. `"chat"`.
    restricted: RwLock<FxHashSet<String>>,
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Participant")
            .field("name", &self.name)
            .field("uid", &self.uid)
            .field("permissions", &self.permissions())
            .finish()
    }
}

impl Participant {
    /// Creates a logged in participant holding `permissions`.
    pub fn new(uid: Uid, name: impl Into<String>, permissions: Permissions) -> Participant {
        Participant {
            uid,
            name: name.into(),
            permissions: AtomicU8::new(permissions.bits()),
            muted: AtomicBool::new(false),
            dnd: AtomicBool::new(false),
            logged_in: AtomicBool::new(true),
            restricted: RwLock::new(FxHashSet::default()),
        }
    }

    /// The identity used for lines typed into the server console.
    pub fn console(name: impl Into<String>) -> Participant {
        Participant::new(SERVER_CONSOLE_UID, name, Permissions::ADMIN)
    }

    pub fn is_server_console(&self) -> bool {
        self.uid == SERVER_CONSOLE_UID
    }

    pub fn permissions(&self) -> Permissions {
        Permissions::from_bits_truncate(self.permissions.load(Ordering::Acquire))
    }

    pub fn has_permission(&self, permission: Permissions) -> bool {
        self.permissions().contains(permission)
    }

    pub fn is_admin(&self) -> bool {
        self.permissions().is_admin()
    }

    pub fn set_admin(&self, admin: bool) {
        let bits = Permissions::ADMIN.bits();
        if admin {
            self.permissions.fetch_or(bits, Ordering::AcqRel);
        } else {
            self.permissions.fetch_and(!bits, Ordering::AcqRel);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Acquire)
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Release);
    }

    pub fn is_dnd(&self) -> bool {
        self.dnd.load(Ordering::Acquire)
    }

    pub fn set_dnd(&self, dnd: bool) {
        self.dnd.store(dnd, Ordering::Release);
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::Acquire)
    }

    pub fn set_logged_in(&self, logged_in: bool) {
        self.logged_in.store(logged_in, Ordering::Release);
    }

    pub fn restrict(&self, category: &str) {
        self.restricted
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(category.to_owned());
    }

    pub fn unrestrict(&self, category: &str) {
        self.restricted
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(category);
    }

    /// Muting silences every category; restrictions silence one.
    pub fn can_communicate(&self, category: &str) -> bool {
        if self.is_muted() {
            return false;
        }
        !self
            .restricted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(category)
    }
}
