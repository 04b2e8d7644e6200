//! Macros for declaring lifecycle status enums.

/// Declare a unit-variant enum and implement [`State`](crate::core::State) for it.
///
/// Besides the trait, the macro generates `ALL` (every variant in declaration
/// order), `from_name` and a `Display` impl that prints the variant name, which
/// is also the serialized form.
///
/// # Example
///
/// ```
/// use vlm::state_enum;
/// use vlm::core::State;
///
/// state_enum! {
///     #[derive(Copy, Eq, Hash)]
///     pub enum InspectionState {
///         Scheduled,
///         Passed,
///         Failed,
///     }
///     final: [Passed, Failed]
/// }
///
/// assert_eq!(InspectionState::ALL.len(), 3);
/// assert_eq!(InspectionState::from_name("Passed"), Some(InspectionState::Passed));
/// assert!(InspectionState::Failed.is_final());
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

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Resolve a variant from its wire name.
            #[allow(dead_code)]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}
