//! Handle types for schema storage.
//!
//! Schema entities reference each other through opaque arena handles instead
//! of pointers, which sidesteps ownership questions in the cross-referential
//! module graph. Using `NonZeroU32` enables `Option<T>` niche optimization
//! (no extra space).

use core::num::NonZeroU32;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Create from a raw value (1-based).
            #[must_use]
            pub const fn from_raw(raw: u32) -> Option<Self> {
                match NonZeroU32::new(raw) {
                    Some(n) => Some(Self(n)),
                    None => None,
                }
            }

            /// Create from a 0-based index.
            #[must_use]
            pub fn from_index(index: usize) -> Option<Self> {
                let raw = u32::try_from(index + 1).ok()?;
                Self::from_raw(raw)
            }

            /// Get the raw value (1-based).
            #[must_use]
            pub const fn to_raw(self) -> u32 {
                self.0.get()
            }

            /// Get the 0-based index.
            #[must_use]
            pub const fn to_index(self) -> usize {
                (self.0.get() - 1) as usize
            }
        }
    };
}

define_id!(
    /// Module handle into a context registry.
    ModuleId
);

define_id!(
    /// Submodule handle into a context registry.
    SubmoduleId
);

define_id!(
    /// Parsed schema node handle into the owning unit's node arena.
    ParsedNodeId
);

define_id!(
    /// Compiled schema node handle into the context node arena.
    CompiledNodeId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_zero() {
        assert!(ModuleId::from_raw(0).is_none());
    }

    #[test]
    fn test_from_raw_nonzero() {
        let id = ModuleId::from_raw(1).unwrap();
        assert_eq!(id.to_raw(), 1);
        assert_eq!(id.to_index(), 0);
    }

    #[test]
    fn test_from_index() {
        let id = CompiledNodeId::from_index(0).unwrap();
        assert_eq!(id.to_raw(), 1);
        assert_eq!(id.to_index(), 0);

        let id = CompiledNodeId::from_index(99).unwrap();
        assert_eq!(id.to_raw(), 100);
        assert_eq!(id.to_index(), 99);
    }

    #[test]
    fn test_option_size() {
        // Option<ModuleId> should be the same size as ModuleId due to niche
        // optimization.
        assert_eq!(
            core::mem::size_of::<Option<ModuleId>>(),
            core::mem::size_of::<ModuleId>()
        );
    }
}
