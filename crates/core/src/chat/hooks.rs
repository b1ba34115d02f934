use super::format::Timestamp;

/// Extension points invoked while a chat line is handled.
///
/// Every hook runs synchronously on the thread handling the line and must
/// return before handling continues.
pub trait ChatHooks: Send + Sync {
    /// Runs before anything else. Returning `true` vetoes the message.
    fn pre_chat(&self, _name: &str, _timestamp: &Timestamp, _text: &str) -> bool {
        false
    }

    /// Runs for every message that was not vetoed, whatever its class.
    fn post_chat(&self, _name: &str, _timestamp: &Timestamp, _text: &str) {}

    /// Receives every command except a successful `/auth`.
    fn on_command(&self, _name: &str, _command: &str, _args: &[String]) {}
}

#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Box<dyn ChatHooks>>,
}

impl HookRegistry {
    pub fn new() -> HookRegistry {
        Default::default()
    }

    pub fn register(&mut self, hooks: impl ChatHooks + 'static) {
        self.hooks.push(Box::new(hooks));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Runs `pre_chat` in registration order, stopping at the first veto.
    pub fn run_pre_chat(&self, name: &str, timestamp: &Timestamp, text: &str) -> bool {
        self.hooks
            .iter()
            .any(|hooks| hooks.pre_chat(name, timestamp, text))
    }

    pub fn run_post_chat(&self, name: &str, timestamp: &Timestamp, text: &str) {
        for hooks in &self.hooks {
            hooks.post_chat(name, timestamp, text);
        }
    }

    pub fn run_command(&self, name: &str, command: &str, args: &[String]) {
        for hooks in &self.hooks {
            hooks.on_command(name, command, args);
        }
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        veto: bool,
        pre: Arc<AtomicUsize>,
        post: Arc<AtomicUsize>,
    }

    impl ChatHooks for Counting {
        fn pre_chat(&self, _: &str, _: &Timestamp, _: &str) -> bool {
            self.pre.fetch_add(1, Ordering::SeqCst);
            self.veto
        }

        fn post_chat(&self, _: &str, _: &Timestamp, _: &str) {
            self.post.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Silent;
    impl ChatHooks for Silent {}

    #[test]
    fn first_veto_stops_pre_chat() {
        let pre = Arc::new(AtomicUsize::new(0));
        let post = Arc::new(AtomicUsize::new(0));
        let mut registry = HookRegistry::new();
        for veto in [false, true, false] {
            registry.register(Counting {
                veto,
                pre: pre.clone(),
                post: post.clone(),
            });
        }

        let ts = Timestamp::now();
        assert!(registry.run_pre_chat("Alice", &ts, "hi"));
        assert_eq!(pre.load(Ordering::SeqCst), 2);

        registry.run_post_chat("Alice", &ts, "hi");
        assert_eq!(post.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn defaults_never_veto() {
        let mut registry = HookRegistry::new();
        assert!(registry.is_empty());
        registry.register(Silent);
        assert_eq!(registry.len(), 1);
        assert!(!registry.run_pre_chat("Alice", &Timestamp::now(), "hi"));
    }
}
