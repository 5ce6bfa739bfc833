//! Choice enums: small fixed code sets with display labels.
//!
//! Several entities persist a single-character code (beverage type, stock
//! state, order state, gender) that also has a human-readable label. Each
//! such set is a tagged enum declared through the [`choices!`] macro, which
//! wires up the pure code/label lookups without any runtime introspection.

/// A fixed set of choices, each with a persisted code and a display label.
pub trait Choice: Sized + Copy {
    /// The single-character code stored for this choice.
    fn code(&self) -> char;

    /// The human-readable label of this choice.
    fn label(&self) -> &'static str;

    /// Look up a choice from its persisted code.
    fn from_code(code: char) -> Option<Self>;

    /// All `(code, label)` pairs of the set, in declaration order.
    fn choices() -> &'static [(char, &'static str)];
}

/// Declare a [`Choice`] enum.
///
/// ```ignore
/// choices! {
///     /// The different types of beverages in the shop.
///     pub enum BeverageType {
///         Coffee => ('C', "COFFEE"),
///         Tea => ('T', "TEA"),
///     }
/// }
/// ```
#[macro_export]
macro_rules! choices {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::choice::Choice for $name {
            fn code(&self) -> char {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            fn from_code(code: char) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn choices() -> &'static [(char, &'static str)] {
                &[$(($code, $label)),+]
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str($crate::choice::Choice::label(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::Choice;

    choices! {
        /// Test fixture: cardinal directions.
        pub enum Direction {
            North => ('N', "NORTH"),
            South => ('S', "SOUTH"),
        }
    }

    #[test]
    fn code_and_label_lookups_agree() {
        assert_eq!(Direction::North.code(), 'N');
        assert_eq!(Direction::North.label(), "NORTH");
        assert_eq!(Direction::from_code('S'), Some(Direction::South));
        assert_eq!(Direction::from_code('X'), None);
    }

    #[test]
    fn choices_lists_all_pairs_in_order() {
        assert_eq!(Direction::choices(), &[('N', "NORTH"), ('S', "SOUTH")]);
    }

    #[test]
    fn display_uses_the_label() {
        assert_eq!(Direction::South.to_string(), "SOUTH");
    }
}
