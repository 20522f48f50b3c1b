//! Macros for ergonomic state definitions.

/// Generate a state enum together with its `State` implementation.
///
/// # Example
///
/// ```
/// use fsmloop::core::State;
/// use fsmloop::state_enum;
///
/// state_enum! {
///     pub enum BombState {
///         Setting,
///         Timing,
///     }
/// }
///
/// assert_eq!(BombState::Timing.name(), "Timing");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
