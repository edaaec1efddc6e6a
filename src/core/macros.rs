//! Macros for declaring entity state enums.

/// Generate a state enum together with its serde and `State` impls.
///
/// Each variant is paired with its wire name; the serialized form and
/// `State::name()` are guaranteed to agree. An optional `terminal: [..]`
/// list marks terminal states.
///
/// # Example
///
/// ```
/// use accord::state_enum;
///
/// state_enum! {
///     pub enum DocumentState {
///         Draft => "draft",
///         Review => "review",
///         Archived => "archived",
///     }
///     terminal: [Archived]
/// }
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),* $(,)?
        }

        $(terminal: [$($terminal:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),*
                }
            }

            fn is_terminal(&self) -> bool {
                match self {
                    $($(Self::$terminal => true,)*)?
                    _ => false,
                }
            }
        }
    };
}
