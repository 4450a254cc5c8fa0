//! Macro for implementing Display and FromStr for lowercase-named enums
//!
//! Categories, entry origins and period presets are all persisted and
//! exchanged as short lowercase tokens. This macro keeps the token table in
//! one place per enum.
//!
//! # Example
//!
//! ```rust
//! use tally_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Billing {
//!     Hourly,
//!     Fixed,
//! }
//!
//! impl_domain_status_conversions!(Billing {
//!     Hourly => "hourly",
//!     Fixed => "fixed",
//! });
//!
//! assert_eq!("HOURLY".parse::<Billing>().unwrap(), Billing::Hourly);
//! assert_eq!(Billing::Fixed.to_string(), "fixed");
//! ```

/// Implements Display and FromStr traits for token enums
///
/// - Display writes the token
/// - FromStr parses case-insensitively and fails with
///   [`TallyError::InvalidInput`](crate::TallyError::InvalidInput)
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// The persisted token for this variant.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::TallyError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::TallyError::InvalidInput(format!(
                        "Invalid {}: {}",
                        stringify!($enum_name),
                        s
                    ))),
                }
            }
        }
    };
}
