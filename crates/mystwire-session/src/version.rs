//! Per-category change counters.
//!
//! A handler bumps its category only after the state write is done, with
//! `Release` ordering. A reader that loads the counter with `Acquire` and then
//! sees a larger value is guaranteed to find the new state behind it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

macro_rules! categories {
    ($( $(#[$doc:meta])* $name:ident ),+ $(,)?) => {
        /// A slice of session state with its own version counter.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum Category {
            $( $(#[$doc])* $name, )+
        }

        impl Category {
            /// Every category, in declaration order.
            pub const ALL: &'static [Category] = &[$(Category::$name),+];

            /// Position in [`Category::ALL`].
            pub const fn index(self) -> usize {
                self as usize
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $(Category::$name => stringify!($name),)+
                }
            }
        }
    };
}

categories! {
    /// Pings echoed or answered.
    Keepalive,
    /// Authentication and login queue.
    Auth,
    /// Account character roster and create results.
    Characters,
    /// Map, controller, channels, waypoints.
    World,
    /// Entity spawn, despawn and appearance.
    Entities,
    Movement,
    /// Unit variables (health, level, ...).
    Variables,
    Combat,
    Auras,
    Spells,
    Inventory,
    Bank,
    Loot,
    Vendor,
    Exp,
    Quest,
    Gossip,
    Chat,
    Guild,
    Party,
    Trade,
    Duel,
    Arena,
    Inspect,
    WorldError,
    /// Frames with no handler.
    Unhandled,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One monotonic counter per [`Category`].
///
/// Counters start at zero and only ever go up. Share it behind an `Arc`.
#[derive(Debug)]
pub struct VersionCounters {
    counters: Vec<AtomicU64>,
}

impl VersionCounters {
    pub fn new() -> Self {
        Self {
            counters: Category::ALL.iter().map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// Current version of `category`.
    pub fn get(&self, category: Category) -> u64 {
        self.counters[category.index()].load(Ordering::Acquire)
    }

    /// Advances `category` and returns its new version.
    pub fn bump(&self, category: Category) -> u64 {
        self.counters[category.index()].fetch_add(1, Ordering::Release) + 1
    }

    /// Advances each category once, even if it is listed twice.
    pub fn bump_all(&self, categories: &[Category]) {
        for (i, category) in categories.iter().enumerate() {
            if !categories[..i].contains(category) {
                self.bump(*category);
            }
        }
    }

    /// Every `(category, version)` pair, for logging and debugging.
    pub fn snapshot(&self) -> Vec<(Category, u64)> {
        Category::ALL.iter().map(|&c| (c, self.get(c))).collect()
    }
}

impl Default for VersionCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_index() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
        assert_eq!(Category::ALL.len(), 26);
    }

    #[test]
    fn test_bump_is_per_category() {
        let v = VersionCounters::new();
        assert_eq!(v.get(Category::Inventory), 0);
        assert_eq!(v.bump(Category::Inventory), 1);
        assert_eq!(v.bump(Category::Inventory), 2);
        assert_eq!(v.get(Category::Inventory), 2);
        assert_eq!(v.get(Category::Bank), 0);
    }

    #[test]
    fn test_bump_all_dedups() {
        let v = VersionCounters::new();
        v.bump_all(&[Category::World, Category::Entities, Category::World]);
        assert_eq!(v.get(Category::World), 1);
        assert_eq!(v.get(Category::Entities), 1);
    }

    #[test]
    fn test_snapshot_and_display() {
        let v = VersionCounters::new();
        v.bump(Category::Chat);
        let snap = v.snapshot();
        assert_eq!(snap.len(), Category::ALL.len());
        assert!(snap.contains(&(Category::Chat, 1)));
        assert_eq!(Category::WorldError.to_string(), "WorldError");
    }

    #[test]
    fn test_counters_are_shared_across_threads() {
        use std::sync::Arc;
        let v = Arc::new(VersionCounters::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let v = Arc::clone(&v);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        v.bump(Category::Quest);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(v.get(Category::Quest), 400);
    }
}
